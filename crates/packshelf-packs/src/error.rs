//! Error types for the pack subsystem.

use std::path::PathBuf;

/// Pack-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("registry root `{path}` is unavailable: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("registry root `{path}` is not a directory")]
    RootNotDirectory { path: PathBuf },

    #[error("invalid pack metadata in `{path}`: {reason}")]
    InvalidMetadata { path: PathBuf, reason: String },

    #[error("pack not found: `{0}`")]
    NotFound(String),

    #[error("pack `{name}` is already installed at `{path}`")]
    AlreadyInstalled { name: String, path: PathBuf },

    #[error("`{path}` holds pack `{name}` but it has no install receipt")]
    NotInstalled { name: String, path: PathBuf },

    #[error("cannot install pack `{name}` into its own directory `{path}`")]
    TargetInsideSource { name: String, path: PathBuf },

    #[error("`{path}` already exists")]
    AlreadyExists { path: PathBuf },

    #[error("invalid pack name `{name}`: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PackError {
    /// Shorthand for building an [`PackError::InvalidMetadata`].
    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PackError>;
