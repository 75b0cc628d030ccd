// model-catalog/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Per-file problems (malformed JSON, schema violations) are
/// reported in results instead and never surface here.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("models directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("read {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("{}: invalid JSON - {message} at line {line} column {column}", path.display())]
    Json { path: PathBuf, message: String, line: usize, column: usize },

    #[error("schema {}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("config {}: {source}", path.display())]
    Config { path: PathBuf, #[source] source: toml::de::Error },

    #[error("invalid file pattern {pattern:?}: {source}")]
    Pattern { pattern: String, #[source] source: globset::Error },

    #[error("serialize bundle: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Syntax errors keep the position serde_json reports (1-based).
    pub(crate) fn json(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        Self::Json { path: path.into(), message: strip_position(err), line: err.line(), column: err.column() }
    }
}

/// serde_json appends " at line X column Y" to its Display; we print the
/// position ourselves.
pub(crate) fn strip_position(err: &serde_json::Error) -> String {
    let text = err.to_string();
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    text.strip_suffix(&suffix).map(str::to_owned).unwrap_or(text)
}

pub type Result<T> = std::result::Result<T, CatalogError>;
