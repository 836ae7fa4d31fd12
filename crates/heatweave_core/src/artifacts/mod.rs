//! Generated artifacts inside the target repository.
//!
//! # Responsibility
//! - Materialize the runtime file set on save: `pattern.json`, the
//!   scheduler workflow and the usage agreement.
//! - Append per-day filler lines that back each painted commit.
//! - Auto-stage, commit and push the generated set.
//!
//! # Invariants
//! - Workflow and agreement bodies are static boilerplate with only
//!   committer/data-dir values substituted; no scheduling logic lives in
//!   them beyond invoking the painter.

use crate::config::Config;
use crate::git::{self, GitError};
use crate::model::pattern::PatternDocument;
use crate::store::{FsPatternStore, PatternStore, StoreError, PATTERN_FILE};
use chrono::NaiveDate;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Repo-relative paths staged by the auto-commit step.
pub const GENERATED_ARTIFACTS: [&str; 3] = [
    PATTERN_FILE,
    "AGREEMENT.md",
    ".github/workflows/heatmap.yml",
];

const AUTO_COMMIT_MESSAGE: &str = "chore: update heatmap workflow artifacts";

pub type ArtifactResult<T> = Result<T, ArtifactError>;

#[derive(Debug)]
pub enum ArtifactError {
    Io(io::Error),
    Store(StoreError),
    Git(GitError),
}

impl Display for ArtifactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "artifact I/O error: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Git(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ArtifactError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Git(err) => Some(err),
        }
    }
}

impl From<io::Error> for ArtifactError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<StoreError> for ArtifactError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<GitError> for ArtifactError {
    fn from(value: GitError) -> Self {
        Self::Git(value)
    }
}

/// Writes the full generated file set into the repo root.
pub fn write_all(config: &Config, doc: &PatternDocument, repo_root: &Path) -> ArtifactResult<()> {
    FsPatternStore::new(repo_root).save(doc)?;
    write_workflow(config, repo_root)?;
    write_agreement(repo_root)?;
    Ok(())
}

/// Appends `units` filler lines to the per-day artifact file.
///
/// Each line carries a timestamp, a running `#index/target` marker and a
/// random alphanumeric payload so consecutive commits differ. Returns the
/// repo-relative artifact path (for staging) and the number of lines
/// appended.
pub fn append_filler_lines(
    repo_root: &Path,
    data_dir: &str,
    date: NaiveDate,
    units: u32,
    target: u32,
) -> io::Result<(PathBuf, u32)> {
    let relative = Path::new(data_dir).join(format!("{date}.txt"));
    let absolute = repo_root.join(&relative);
    if let Some(parent) = absolute.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let existing = match std::fs::File::open(&absolute) {
        Ok(file) => BufReader::new(file).lines().count() as u32,
        Err(err) if err.kind() == io::ErrorKind::NotFound => 0,
        Err(err) => return Err(err),
    };

    let mut file = OpenOptions::new().create(true).append(true).open(&absolute)?;
    let mut rng = rand::thread_rng();
    for index in existing + 1..=existing + units {
        let payload: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        let stamp = chrono::Utc::now().to_rfc3339();
        writeln!(file, "{stamp} #{index}/{target} {payload}")?;
    }

    Ok((relative, units))
}

/// Stages the generated artifact set, commits and pushes.
///
/// Returns `false` when there was nothing to stage or commit. Push
/// failures propagate; the CLI pairs them with `git::push_failure_hint`.
pub fn auto_commit_and_push(config: &Config, repo_root: &Path) -> ArtifactResult<bool> {
    let mut staged_any = false;
    for relative in GENERATED_ARTIFACTS {
        if repo_root.join(relative).exists() {
            git::stage(repo_root, relative)?;
            staged_any = true;
        }
    }
    if !staged_any || !git::has_staged_changes(repo_root)? {
        return Ok(false);
    }

    git::set_committer(repo_root, &config.committer_name, &config.committer_email)?;
    if !git::commit(repo_root, AUTO_COMMIT_MESSAGE)? {
        return Ok(false);
    }
    git::push(repo_root)?;
    Ok(true)
}

fn write_workflow(config: &Config, repo_root: &Path) -> io::Result<()> {
    let workflow_dir = repo_root.join(".github/workflows");
    std::fs::create_dir_all(&workflow_dir)?;

    // JSON string literals are valid single-line YAML scalars, which keeps
    // arbitrary committer names safe to substitute.
    let data_dir = quote(&config.data_dir);
    let name = quote(&config.committer_name);
    let email = quote(&config.committer_email);

    let body = format!(
        r#"name: Heatmap Painter

on:
  schedule:
    - cron: "*/30 * * * *"
  workflow_dispatch:

permissions:
  contents: write

concurrency:
  group: heatmap-daily
  cancel-in-progress: false

env:
  DATA_DIR: {data_dir}
  COMMITTER_NAME: {name}
  COMMITTER_EMAIL: {email}

jobs:
  paint:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: dtolnay/rust-toolchain@stable
      - uses: Swatinem/rust-cache@v2
        with:
          shared-key: heatweave-paint
      - name: Install painter
        run: cargo install heatweave_cli --locked
      - name: Run heatmap painter
        run: heatweave paint --repo . --data-dir "$DATA_DIR" --identity "$COMMITTER_NAME"
      - name: Commit and push
        run: |
          if [ -z "$(git status --porcelain)" ]; then
            echo "No changes to commit"
            exit 0
          fi
          git config user.name "$COMMITTER_NAME"
          git config user.email "$COMMITTER_EMAIL"
          git commit -am "chore: paint heatmap"
          git push
"#
    );
    std::fs::write(workflow_dir.join("heatmap.yml"), body)
}

fn write_agreement(repo_root: &Path) -> io::Result<()> {
    std::fs::write(repo_root.join("AGREEMENT.md"), AGREEMENT_TEXT)
}

fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

const AGREEMENT_TEXT: &str = r#"# Heatweave AGREEMENT

By using this repository and the bundled automation you acknowledge:

1. The tooling only automates commits that style a public contribution
   graph. It provides no intrusion, privilege escalation, or unauthorized
   access capability of any kind.
2. You run the automation at your own risk; unattended execution remains
   your responsibility.
3. SSH keys, passwords, and other credentials are never requested or
   persisted by this project. Pushes from the scheduled workflow use only
   the platform-provided workflow token.
4. Automated commit activity may trigger the hosting platform's
   anti-abuse checks. You must comply with its Terms of Service.
5. The project is delivered as is, without warranty of availability or
   correctness. All liability remains with the user.
"#;
