//! Predefined word source and the immutable candidate pool.
//!
//! The pool is read once at startup from a newline-delimited text file.
//! If the file cannot be used, a built-in list is substituted so the pool
//! is never empty; the failure is logged and never reaches callers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::WordError;

/// Words used when the predefined list cannot be loaded.
pub const FALLBACK_WORDS: [&str; 14] = [
    "innovation",
    "créativité",
    "partage",
    "avenir",
    "équipe",
    "progrès",
    "vision",
    "collaboration",
    "succès",
    "inspiration",
    "dynamisme",
    "excellence",
    "passion",
    "synergie",
];

/// Errors that can occur when loading the predefined word list.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The word file could not be read.
    #[error("failed to read word list {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The word file contained no non-blank lines.
    #[error("word list {path} contains no words")]
    Empty {
        /// Path that was read.
        path: PathBuf,
    },
}

/// The full predefined word list. Immutable and never empty.
///
/// Cloning is cheap; clones share the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    words: Arc<[String]>,
}

impl CandidatePool {
    /// Build a pool from an ordered list of words.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::InvariantViolation`] if `words` is empty.
    pub fn new(words: Vec<String>) -> Result<Self, WordError> {
        if words.is_empty() {
            return Err(WordError::InvariantViolation(
                "candidate pool must contain at least one word".to_owned(),
            ));
        }
        Ok(Self {
            words: words.into(),
        })
    }

    /// The built-in fallback pool.
    pub fn fallback() -> Self {
        Self {
            words: FALLBACK_WORDS.iter().map(|w| (*w).to_owned()).collect(),
        }
    }

    /// Parse newline-delimited text. Lines are trimmed; blank lines are
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::InvariantViolation`] if no words remain.
    pub fn parse(text: &str) -> Result<Self, WordError> {
        Self::new(parse_lines(text))
    }

    /// Load the pool from a word file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read and
    /// [`SourceError::Empty`] if it has no words.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let words = parse_lines(&contents);
        if words.is_empty() {
            return Err(SourceError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            words: words.into(),
        })
    }

    /// Load the pool from a word file, substituting [`FALLBACK_WORDS`] on
    /// any failure.
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::load(path) {
            Ok(pool) => {
                info!(path = %path.display(), words = pool.len(), "Predefined words loaded");
                pool
            }
            Err(e) => {
                warn!(error = %e, "Using built-in fallback word list");
                Self::fallback()
            }
        }
    }

    /// All candidate words, in file order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of candidate words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
