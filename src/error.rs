//! Error types shared by the organize, restore and query engines.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigError;
use crate::file_organizer::OperationLog;

/// Result type for engine operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Errors surfaced by the core.
///
/// Raw I/O errors are classified with [`OrganizeError::from_io`] so a shell can
/// tell a missing path from a permission problem without inspecting `io::ErrorKind`.
#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid history file {}: {reason}", path.display())]
    InvalidHistory { path: PathBuf, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl OrganizeError {
    /// Classifies an I/O error raised while working on `path`.
    pub fn from_io(source: io::Error, context: impl Into<String>, path: &Path) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                context: format!("{} {}", context.into(), path.display()),
                source,
            },
        }
    }

    /// Short label used by the shell when rendering the error.
    pub fn title(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "File Error",
            Self::PermissionDenied { .. } => "Permission Error",
            Self::Io { .. } => "I/O Error",
            Self::InvalidInput(_) => "Input Error",
            Self::InvalidHistory { .. } => "History Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// A fail-fast organize error together with the moves that succeeded before it.
///
/// The partial log is valid: every record in it describes a move that really
/// happened, so it can be handed to restore like any other log.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct OrganizeFailure {
    #[source]
    pub error: OrganizeError,
    pub partial_log: OperationLog,
}

impl OrganizeFailure {
    pub fn new(error: OrganizeError, partial_log: OperationLog) -> Self {
        Self { error, partial_log }
    }

    pub fn into_error(self) -> OrganizeError {
        self.error
    }
}
