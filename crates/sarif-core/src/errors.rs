use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while reading, converting or writing SARIF documents.
///
/// Structural anomalies inside a well-formed document are never reported
/// here; the transforms recover from those locally.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error at {path}: {error}")]
    IoWithPath {
        error: std::io::Error,
        path: PathBuf,
    },

    /// The document has no top-level `version` property.
    #[error("unable to determine SARIF version of document")]
    MissingVersion,

    #[error("unsupported SARIF version '{0}' (supported: 1.0.0, 2.1.0)")]
    UnsupportedVersion(String),
}

/// Errors surfaced by the ordered artifact enumerator.
#[derive(Error, Debug)]
pub enum EnumerationError {
    #[error("failed to list {path}: {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },

    #[error("invalid file filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    /// The directory walker panicked; the payload is rendered as text.
    #[error("directory enumeration worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("failed to start directory enumeration worker: {0}")]
    WorkerSpawn(std::io::Error),

    /// An enumerated path that cannot be expressed as a `file:` URI.
    #[error("not an absolute file path: {0}")]
    InvalidPath(PathBuf),
}

pub type TransformResult<T> = std::result::Result<T, TransformError>;
