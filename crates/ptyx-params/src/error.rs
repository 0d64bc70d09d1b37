//! Parameter and settings error types.
//!
//! Only [`ParamsError::DuplicateName`] is returned from the public
//! construction APIs. The remaining variants describe failures that the
//! registry absorbs and reports through `tracing` before degrading to a
//! no-op; they are public so that lower-level helpers can still be used
//! directly by tools that want the detail.

use std::path::PathBuf;
use thiserror::Error;

/// Parameter, group or settings operation error.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// A parameter, group or section name is already registered in its scope.
    #[error("{scope} \"{name}\" already exists")]
    DuplicateName { scope: &'static str, name: String },

    /// A textual value could not be converted into the parameter's type.
    #[error("failed to parse {kind} value \"{text}\": {reason}")]
    Parse {
        kind: &'static str,
        text: String,
        reason: String,
    },

    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid TOML.
    #[error("failed to parse settings document {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The settings document could not be rendered.
    #[error("failed to serialize settings document")]
    Serialize {
        #[source]
        source: toml::ser::Error,
    },
}

impl ParamsError {
    pub(crate) fn duplicate(scope: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            scope,
            name: name.into(),
        }
    }

    pub(crate) fn parse(kind: &'static str, text: &str, reason: impl ToString) -> Self {
        Self::Parse {
            kind,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::DuplicateName { scope, name } => {
                format!("A {scope} named '{name}' is already registered.")
            }
            Self::Parse { kind, text, .. } => {
                format!("'{text}' is not a valid {kind} value.")
            }
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::Toml { path, .. } => {
                format!(
                    "The settings file at {} could not be read. It may be corrupted.",
                    path.display()
                )
            }
            Self::Serialize { .. } => "An error occurred while writing the settings.".to_string(),
        }
    }
}

/// Result type alias for parameter operations.
pub type Result<T> = std::result::Result<T, ParamsError>;
