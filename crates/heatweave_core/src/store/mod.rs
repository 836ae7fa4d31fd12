//! Pattern document persistence.
//!
//! # Responsibility
//! - Load and save `pattern.json` inside a target repository root.
//! - Offer the strict load used by the paint tick and the lenient preload
//!   used by the editor.
//!
//! # Invariants
//! - `save` and the strict `load` run full document validation; a grid
//!   that fails validation never reaches or leaves disk through them.
//! - Serialized bytes round-trip: saving a loaded document reproduces an
//!   equal document.

use crate::model::pattern::{
    blank_grid, resize_grid, PatternDocument, PatternValidationError,
};
use log::warn;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

/// File name of the durable schedule artifact inside the target repo.
pub const PATTERN_FILE: &str = "pattern.json";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// The document file does not exist.
    Missing(PathBuf),
    Io(io::Error),
    /// The file exists but is not well-formed JSON for the schema.
    Malformed(serde_json::Error),
    /// The file parsed but violates grid invariants.
    Validation(PatternValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "pattern document not found: {}", path.display()),
            Self::Io(err) => write!(f, "pattern document I/O error: {err}"),
            Self::Malformed(err) => write!(f, "pattern document is not valid JSON: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Missing(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

impl From<PatternValidationError> for StoreError {
    fn from(value: PatternValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Storage contract for the pattern document.
pub trait PatternStore {
    /// Strict load: missing, malformed or invalid documents are errors.
    fn load(&self) -> StoreResult<PatternDocument>;
    /// Validates and persists the document wholesale.
    fn save(&self, doc: &PatternDocument) -> StoreResult<()>;
}

/// Filesystem-backed store rooted at a target repository.
pub struct FsPatternStore {
    root: PathBuf,
}

impl FsPatternStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(PATTERN_FILE)
    }

    /// Lenient grid preload for the editor.
    ///
    /// Returns the persisted grid reshaped to `weeks` columns, or a blank
    /// grid when the file is missing or unreadable. Malformed input is
    /// logged and replaced, never propagated; the editor must always be
    /// able to start from something.
    pub fn load_grid_for_edit(&self, weeks: usize) -> Vec<Vec<u8>> {
        let path = self.path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return blank_grid(weeks);
            }
            Err(err) => {
                warn!("could not read {}: {err}; starting blank", path.display());
                return blank_grid(weeks);
            }
        };

        // Only the grid matters for editing; tolerate any surrounding shape.
        #[derive(Deserialize)]
        struct GridOnly {
            #[serde(default)]
            pattern: Vec<Vec<u8>>,
        }

        match serde_json::from_str::<GridOnly>(&raw) {
            Ok(parsed) => resize_grid(&parsed.pattern, weeks),
            Err(err) => {
                warn!(
                    "{} is malformed ({err}); starting from a blank grid",
                    path.display()
                );
                blank_grid(weeks)
            }
        }
    }
}

impl PatternStore for FsPatternStore {
    fn load(&self) -> StoreResult<PatternDocument> {
        let path = self.path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(path));
            }
            Err(err) => return Err(err.into()),
        };
        let doc: PatternDocument = serde_json::from_str(&raw)?;
        doc.validate()?;
        Ok(doc)
    }

    fn save(&self, doc: &PatternDocument) -> StoreResult<()> {
        doc.validate()?;
        let mut body = serde_json::to_string_pretty(doc)?;
        body.push('\n');
        std::fs::write(self.path(), body)?;
        Ok(())
    }
}
