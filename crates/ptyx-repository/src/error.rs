//! Repository error types.
//!
//! Repositories absorb most failures as logged no-ops. The variants here are
//! produced by scan builders and by construction helpers that register
//! parameters.

use std::path::PathBuf;
use thiserror::Error;

use ptyx_params::ParamsError;

/// Repository or builder operation error.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Parameter registration failed (duplicate name).
    #[error(transparent)]
    Params(#[from] ParamsError),

    /// A builder could not produce its output from the current parameters.
    #[error("{kind} builder failed: {reason}")]
    Builder { kind: &'static str, reason: String },

    /// A position file could not be read or decoded.
    #[error("failed to read position file {path}: {source}")]
    PositionFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Unknown builder or item name.
    #[error("unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },
}

impl RepositoryError {
    pub(crate) fn builder(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Builder {
            kind,
            reason: reason.into(),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Params(error) => error.user_message(),
            Self::Builder { kind, reason } => format!("The {kind} could not be built: {reason}"),
            Self::PositionFile { path, .. } => {
                format!("The position file at {} could not be read.", path.display())
            }
            Self::UnknownName { kind, name } => format!("There is no {kind} named '{name}'."),
        }
    }
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
