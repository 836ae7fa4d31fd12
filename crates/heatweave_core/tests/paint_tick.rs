use chrono::NaiveDate;
use heatweave_core::service::paint::{ObserveError, ObservedCountSource, OverrunNotifier};
use heatweave_core::{
    blank_grid, ExecutionOutcome, FsPatternStore, PaintError, PaintService, PatternDocument,
    PatternStore, ScheduleDecision,
};
use std::cell::{Cell, RefCell};
use std::io::BufRead;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Observed-count stub with a mutable reading, mimicking an external
/// counter that moves between ticks.
struct FixedCount(Cell<u32>);

impl ObservedCountSource for &FixedCount {
    fn observed_on(&self, _date: NaiveDate) -> Result<u32, ObserveError> {
        Ok(self.0.get())
    }
}

struct FailingSource;

impl ObservedCountSource for FailingSource {
    fn observed_on(&self, _date: NaiveDate) -> Result<u32, ObserveError> {
        Err(ObserveError(String::from("simulated outage")))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    alerts: RefCell<Vec<(u32, u32)>>,
}

impl OverrunNotifier for &RecordingNotifier {
    fn notify(&self, observed: u32, target: u32, _identity: &str) {
        self.alerts.borrow_mut().push((observed, target));
    }
}

fn write_single_cell_doc(dir: &TempDir, target: u8) {
    let mut grid = blank_grid(4);
    grid[0][0] = target;
    let doc = PatternDocument::from_grid(grid, date(2024, 1, 7)).unwrap();
    FsPatternStore::new(dir.path()).save(&doc).unwrap();
}

fn artifact_lines(dir: &TempDir, day: &str) -> usize {
    let path = dir.path().join("heatmap").join(format!("{day}.txt"));
    let file = std::fs::File::open(path).unwrap();
    std::io::BufReader::new(file).lines().count()
}

#[test]
fn active_day_appends_the_remaining_delta() {
    let dir = TempDir::new().unwrap();
    write_single_cell_doc(&dir, 9);

    let counter = FixedCount(Cell::new(3));
    let notifier = RecordingNotifier::default();
    let service = PaintService::new(dir.path(), "heatmap", "bot", &counter, &notifier);

    let report = service.tick(date(2024, 1, 7)).unwrap();
    assert_eq!(report.decision, ScheduleDecision::Active { target: 9 });
    assert_eq!(report.outcome, ExecutionOutcome::Write { units: 6 });
    assert_eq!(
        report.artifact.as_deref().unwrap().to_string_lossy(),
        "heatmap/2024-01-07.txt"
    );
    assert_eq!(artifact_lines(&dir, "2024-01-07"), 6);
    assert!(notifier.alerts.borrow().is_empty());
}

#[test]
fn repeated_ticks_on_the_same_day_converge_to_overrun() {
    let dir = TempDir::new().unwrap();
    write_single_cell_doc(&dir, 5);

    let counter = FixedCount(Cell::new(0));
    let notifier = RecordingNotifier::default();
    let service = PaintService::new(dir.path(), "heatmap", "bot", &counter, &notifier);
    let today = date(2024, 1, 7);

    let first = service.tick(today).unwrap();
    assert_eq!(first.outcome, ExecutionOutcome::Write { units: 5 });
    // The written units become visible commits before the next tick.
    counter.0.set(5);

    let second = service.tick(today).unwrap();
    assert_eq!(
        second.outcome,
        ExecutionOutcome::Overrun {
            observed: 5,
            target: 5
        }
    );
    assert_eq!(second.artifact, None);
    // Overrun ticks write nothing more.
    assert_eq!(artifact_lines(&dir, "2024-01-07"), 5);
    assert_eq!(notifier.alerts.borrow().as_slice(), &[(5, 5)]);
}

#[test]
fn inactive_day_is_a_noop_without_observation() {
    let dir = TempDir::new().unwrap();
    write_single_cell_doc(&dir, 9);

    // The failing source proves inactive days never query the counter.
    let notifier = RecordingNotifier::default();
    let service = PaintService::new(dir.path(), "heatmap", "bot", FailingSource, &notifier);

    let report = service.tick(date(2024, 1, 6)).unwrap();
    assert_eq!(report.outcome, ExecutionOutcome::NoOp);
    assert!(!dir.path().join("heatmap").exists());
}

#[test]
fn unreachable_counter_aborts_an_active_tick() {
    let dir = TempDir::new().unwrap();
    write_single_cell_doc(&dir, 9);

    let notifier = RecordingNotifier::default();
    let service = PaintService::new(dir.path(), "heatmap", "bot", FailingSource, &notifier);

    let err = service.tick(date(2024, 1, 7)).unwrap_err();
    assert!(matches!(err, PaintError::Observe(_)));
    assert!(
        !dir.path().join("heatmap").exists(),
        "no write may happen without a trusted observation"
    );
}

#[test]
fn missing_document_is_a_store_error() {
    let dir = TempDir::new().unwrap();
    let counter = FixedCount(Cell::new(0));
    let notifier = RecordingNotifier::default();
    let service = PaintService::new(dir.path(), "heatmap", "bot", &counter, &notifier);

    let err = service.tick(date(2024, 1, 7)).unwrap_err();
    assert!(matches!(err, PaintError::Store(_)));
}

#[test]
fn artifact_lines_carry_index_and_target() {
    let dir = TempDir::new().unwrap();
    write_single_cell_doc(&dir, 3);

    let counter = FixedCount(Cell::new(0));
    let notifier = RecordingNotifier::default();
    let service = PaintService::new(dir.path(), "heatmap", "bot", &counter, &notifier);
    service.tick(date(2024, 1, 7)).unwrap();

    let path = dir.path().join("heatmap/2024-01-07.txt");
    let body = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    for (idx, line) in lines.iter().enumerate() {
        assert!(line.contains(&format!("#{}/3", idx + 1)));
    }
}
