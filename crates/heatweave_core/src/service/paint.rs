//! Per-tick paint orchestration.
//!
//! # Responsibility
//! - Run one scheduler tick end to end: load the document, resolve the
//!   day, observe the external count, decide, and apply the decision's
//!   file side effect.
//!
//! # Invariants
//! - The observed count is re-read fresh on every tick; nothing from a
//!   previous invocation is cached. Repeated ticks on the same day
//!   therefore converge instead of compounding.
//! - An unreachable observed-count source aborts the tick; it is never
//!   treated as zero.
//! - Two overlapping ticks can overshoot by one delta before the next
//!   fresh observation reports the overrun; this lock-free trade-off is
//!   inherited from the design and deliberately not "fixed" here.

use crate::artifacts;
use crate::git::{self, GitError};
use crate::schedule::guard::{decide, ExecutionOutcome};
use crate::schedule::resolver::{resolve, ScheduleDecision};
use crate::store::{FsPatternStore, PatternStore, StoreError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub type PaintResult<T> = Result<T, PaintError>;

#[derive(Debug)]
pub enum PaintError {
    /// The pattern document is missing, malformed or invalid.
    Store(StoreError),
    /// The observed-count source could not answer; the tick must stop
    /// because `write` vs `overrun` cannot be decided safely.
    Observe(ObserveError),
    /// Appending the per-day artifact failed.
    Io(io::Error),
}

impl Display for PaintError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Observe(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "per-day artifact write failed: {err}"),
        }
    }
}

impl Error for PaintError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Observe(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<StoreError> for PaintError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ObserveError> for PaintError {
    fn from(value: ObserveError) -> Self {
        Self::Observe(value)
    }
}

impl From<io::Error> for PaintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Failure to query the external observed-count source.
#[derive(Debug)]
pub struct ObserveError(pub String);

impl Display for ObserveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "observed-count source unavailable: {}", self.0)
    }
}

impl Error for ObserveError {}

impl From<GitError> for ObserveError {
    fn from(value: GitError) -> Self {
        Self(value.to_string())
    }
}

/// Black-box query for work already completed on a date.
pub trait ObservedCountSource {
    fn observed_on(&self, date: NaiveDate) -> Result<u32, ObserveError>;
}

/// Counts commits authored today in the target repo via `git log`.
pub struct GitLogCountSource {
    repo: PathBuf,
    /// Author filter; `None` counts every commit of the day.
    identity: Option<String>,
}

impl GitLogCountSource {
    pub fn new(repo: impl Into<PathBuf>, identity: Option<String>) -> Self {
        Self {
            repo: repo.into(),
            identity,
        }
    }
}

impl ObservedCountSource for GitLogCountSource {
    fn observed_on(&self, date: NaiveDate) -> Result<u32, ObserveError> {
        git::count_commits_on(&self.repo, date, self.identity.as_deref()).map_err(ObserveError::from)
    }
}

/// Alert sink for the overrun outcome.
pub trait OverrunNotifier {
    fn notify(&self, observed: u32, target: u32, identity: &str);
}

/// Notifier that records the overrun in the structured log.
pub struct LogNotifier;

impl OverrunNotifier for LogNotifier {
    fn notify(&self, observed: u32, target: u32, identity: &str) {
        warn!(
            "event=overrun identity={identity} observed={observed} target={target} \
             action=halted detail=\"external count already meets the target; check the pattern or wait for tomorrow\""
        );
    }
}

/// What one tick did, for logging and exit-code decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub date: NaiveDate,
    pub decision: ScheduleDecision,
    pub outcome: ExecutionOutcome,
    /// Repo-relative artifact touched by a `Write` outcome, for staging.
    pub artifact: Option<PathBuf>,
}

/// One-tick orchestrator over injected collaborators.
pub struct PaintService<S: ObservedCountSource, N: OverrunNotifier> {
    repo_root: PathBuf,
    data_dir: String,
    identity: String,
    source: S,
    notifier: N,
}

impl<S: ObservedCountSource, N: OverrunNotifier> PaintService<S, N> {
    pub fn new(
        repo_root: impl Into<PathBuf>,
        data_dir: impl Into<String>,
        identity: impl Into<String>,
        source: S,
        notifier: N,
    ) -> Self {
        Self {
            repo_root: repo_root.into(),
            data_dir: data_dir.into(),
            identity: identity.into(),
            source,
            notifier,
        }
    }

    /// Executes one scheduler tick for `today`.
    ///
    /// # Contract
    /// - `Inactive` days and overruns produce no file writes.
    /// - `Write` outcomes append exactly the remaining delta to the
    ///   date-named artifact; staging/committing stays with the caller.
    pub fn tick(&self, today: NaiveDate) -> PaintResult<TickReport> {
        let doc = FsPatternStore::new(&self.repo_root).load()?;
        let decision = resolve(today, &doc);

        let (outcome, day_target) = match decision {
            ScheduleDecision::Inactive => (ExecutionOutcome::NoOp, 0),
            ScheduleDecision::Active { target } => {
                let observed = self.source.observed_on(today)?;
                (decide(decision, observed), target)
            }
        };

        let mut artifact = None;
        match outcome {
            ExecutionOutcome::NoOp => {
                info!("event=tick date={today} outcome=no_op");
            }
            ExecutionOutcome::Overrun { observed, target } => {
                self.notifier.notify(observed, target, &self.identity);
            }
            ExecutionOutcome::Write { units } => {
                let target = day_target;
                let (relative, appended) =
                    artifacts::append_filler_lines(&self.repo_root, &self.data_dir, today, units, target)?;
                info!(
                    "event=tick date={today} outcome=write units={appended} artifact={}",
                    relative.display()
                );
                artifact = Some(relative);
            }
        }

        Ok(TickReport {
            date: today,
            decision,
            outcome,
            artifact,
        })
    }
}
