//! Unified Error Type
//!
//! Centralized error type for the crate.
//!
//! The path-matching and budget-planning algorithms are total and never
//! produce errors; everything here comes from the edges of the system
//! (filesystem access, configuration, parsing collaborators, user input).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodemapError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Indexing Errors
    // -------------------------------------------------------------------------
    /// The index root could not be read. Fatal for the whole run.
    #[error("Cannot index {}: {source}", path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedLanguage(String),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Symbol {symbol:?} not found in {path}")]
    SymbolNotFound { symbol: String, path: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CodemapError>;

impl CodemapError {
    /// Create a parse error for a file
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Whether the error only affects a single file and the run can continue
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::UnsupportedLanguage(_) | Self::Io(_)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
