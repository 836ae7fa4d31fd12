//! Tool configuration.
//!
//! # Responsibility
//! - Define the explicit configuration value threaded through the flow.
//! - Load, normalize and persist the JSON config file.
//!
//! # Invariants
//! - There is no ambient configuration singleton; callers own a `Config`
//!   and pass it (or fields of it) down explicitly.
//! - `validate()` names the first missing required field so the caller
//!   can re-run its setup wizard.

use crate::model::pattern::{Mode, MAX_WEEKS, MIN_WEEKS};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Malformed(serde_json::Error),
    /// A required field is empty or absent.
    MissingField(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config I/O error: {err}"),
            Self::Malformed(err) => write!(f, "config is not valid JSON: {err}"),
            Self::MissingField(field) => write!(f, "config is missing `{field}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(err) => Some(err),
            Self::MissingField(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

fn default_data_dir() -> String {
    String::from("heatmap")
}

fn default_weeks() -> usize {
    52
}

/// Everything the flow needs, loaded once and passed by value/reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SSH URL of the target repository (`git@host:owner/repo.git`).
    pub repo_ssh_url: String,
    /// Local working copy path; cloned on demand when absent.
    pub repo_path: String,
    /// Account whose public heatmap is previewed.
    pub github_username: String,
    /// Committer identity written into the target repo config.
    pub committer_name: String,
    pub committer_email: String,
    /// Directory (relative to the repo root) holding per-day artifacts.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Grid width in week columns, 1..=104.
    #[serde(default = "default_weeks")]
    pub weeks: usize,
    /// Align pattern start to the next Sunday (inclusive).
    #[serde(default)]
    pub start_from_next_sunday: bool,
    /// Painting mode for generated documents.
    #[serde(default)]
    pub mode: Mode,
    /// Daily target; meaningful only for `Mode::Daily`.
    #[serde(default)]
    pub daily_commit_count: u32,
}

impl Config {
    /// Loads the config file, returning `None` when it does not exist.
    pub fn load(path: &Path) -> ConfigResult<Option<Self>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut config: Self = serde_json::from_str(&raw)?;
        config.normalize();
        Ok(Some(config))
    }

    /// Persists the config as pretty JSON.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let mut body = serde_json::to_string_pretty(self)?;
        body.push('\n');
        std::fs::write(path, body)?;
        Ok(())
    }

    /// Clamps numeric fields into their supported ranges.
    pub fn normalize(&mut self) {
        self.weeks = self.weeks.clamp(MIN_WEEKS, MAX_WEEKS);
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }

    /// Checks that all required fields are present.
    ///
    /// # Errors
    /// - `MissingField` with the first empty required field.
    pub fn validate(&self) -> ConfigResult<()> {
        let required: [(&'static str, &str); 5] = [
            ("repo_ssh_url", &self.repo_ssh_url),
            ("repo_path", &self.repo_path),
            ("github_username", &self.github_username),
            ("committer_name", &self.committer_name),
            ("committer_email", &self.committer_email),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            repo_ssh_url: String::from("git@github.com:octo/heatmap.git"),
            repo_path: String::from("./heatmap-repo"),
            github_username: String::from("octo"),
            committer_name: String::from("Heatmap Bot"),
            committer_email: String::from("bot@example.com"),
            data_dir: String::from("heatmap"),
            weeks: 52,
            start_from_next_sunday: true,
            mode: Mode::Pattern,
            daily_commit_count: 0,
        }
    }

    #[test]
    fn validate_names_first_missing_field() {
        let mut config = sample();
        config.github_username.clear();
        match config.validate() {
            Err(ConfigError::MissingField(field)) => assert_eq!(field, "github_username"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn normalize_clamps_weeks_and_fills_data_dir() {
        let mut config = sample();
        config.weeks = 500;
        config.data_dir = String::from("  ");
        config.normalize();
        assert_eq!(config.weeks, MAX_WEEKS);
        assert_eq!(config.data_dir, "heatmap");
    }
}
