use chrono::NaiveDate;
use heatweave_core::{
    blank_grid, FsPatternStore, PatternDocument, PatternStore, StoreError, GRID_ROWS,
};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_doc() -> PatternDocument {
    let mut grid = blank_grid(4);
    grid[0][0] = 9;
    grid[3][2] = 5;
    PatternDocument::from_grid(grid, date(2024, 1, 7)).unwrap()
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = FsPatternStore::new(dir.path());

    let doc = sample_doc();
    store.save(&doc).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn missing_file_is_a_distinct_error() {
    let dir = TempDir::new().unwrap();
    let store = FsPatternStore::new(dir.path());
    assert!(matches!(store.load(), Err(StoreError::Missing(_))));
}

#[test]
fn malformed_json_fails_strict_load() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pattern.json"), "{not json").unwrap();
    let store = FsPatternStore::new(dir.path());
    assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
}

#[test]
fn invalid_grid_fails_strict_load() {
    let dir = TempDir::new().unwrap();
    // Six rows instead of seven.
    let body = r#"{
        "mode": "pattern",
        "start_date": "2024-01-07",
        "pattern": [[0],[0],[0],[0],[0],[0]],
        "daily_commit_count": 0
    }"#;
    std::fs::write(dir.path().join("pattern.json"), body).unwrap();
    let store = FsPatternStore::new(dir.path());
    assert!(matches!(store.load(), Err(StoreError::Validation(_))));
}

#[test]
fn save_refuses_invalid_documents() {
    let dir = TempDir::new().unwrap();
    let store = FsPatternStore::new(dir.path());

    let mut doc = sample_doc();
    doc.grid[1][1] = 11;
    assert!(matches!(store.save(&doc), Err(StoreError::Validation(_))));
    assert!(!store.path().exists(), "nothing may be written on failure");
}

#[test]
fn edit_preload_resizes_the_persisted_grid() {
    let dir = TempDir::new().unwrap();
    let store = FsPatternStore::new(dir.path());
    store.save(&sample_doc()).unwrap();

    let wider = store.load_grid_for_edit(10);
    assert_eq!(wider.len(), GRID_ROWS);
    assert!(wider.iter().all(|row| row.len() == 10));
    assert_eq!(wider[0][0], 9, "existing cells survive widening");
    assert_eq!(wider[0][9], 0, "new columns are zero-filled");

    let narrower = store.load_grid_for_edit(2);
    assert!(narrower.iter().all(|row| row.len() == 2));
}

#[test]
fn edit_preload_falls_back_to_blank() {
    let dir = TempDir::new().unwrap();
    let store = FsPatternStore::new(dir.path());

    // Missing file.
    assert_eq!(store.load_grid_for_edit(3), blank_grid(3));

    // Malformed file.
    std::fs::write(dir.path().join("pattern.json"), "][").unwrap();
    assert_eq!(store.load_grid_for_edit(3), blank_grid(3));
}
