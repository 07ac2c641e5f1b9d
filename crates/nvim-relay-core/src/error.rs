//! Error types for nvim-relay.
//!
//! Errors fall into two groups: fatal ones that end the invocation with a
//! non-zero exit code, and best-effort remote failures that are logged and
//! otherwise ignored.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to record a server address in the registry slot.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Another invocation already holds the slot.
    #[error("registry slot already exists: {path}")]
    Occupied { path: PathBuf },

    #[error("cannot write server file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Main error type for nvim-relay.
#[derive(Debug, Error)]
pub enum RelayError {
    // Invocation errors
    #[error("{message}")]
    Argument { flag: String, message: String },

    #[error("no file arguments provided")]
    NoTargets,

    // Registry errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    // Process errors
    #[error("failed to start {editor}: {message}")]
    Launch {
        editor: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // Remote editor errors
    #[error("remote call to {address} failed: {message}")]
    Remote { address: String, message: String },

    #[error("remote call to {address} timed out after {after:?}")]
    Timeout {
        address: String,
        after: std::time::Duration,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Result type alias for nvim-relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        RelayError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl RelayError {
    /// Build an argument error for `flag`.
    pub fn argument(flag: impl Into<String>, message: impl Into<String>) -> Self {
        RelayError::Argument {
            flag: flag.into(),
            message: message.into(),
        }
    }

    /// Whether this error ends the invocation.
    ///
    /// Remote failures and timeouts are best-effort: a failed probe means
    /// "not alive" and a failed dispatch is swallowed.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RelayError::Remote { .. } | RelayError::Timeout { .. }
        )
    }

    /// Whether the invocation should pause before exiting so the message
    /// stays visible in a console window the IDE opened for us.
    pub fn wants_visible_delay(&self) -> bool {
        matches!(self, RelayError::Argument { .. } | RelayError::NoTargets)
    }
}
