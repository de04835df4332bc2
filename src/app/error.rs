//! Error type shared by the launcher, the stores and the login-item registrar.
//!
//! Nothing here is fatal to the process: every caller either logs the error
//! and carries on, or folds it into a partial result.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Startie operations
#[derive(Error, Debug)]
pub enum StartieError {
    /// The launch target is missing from disk
    #[error("Application not found: {}", path.display())]
    ApplicationNotFound { path: PathBuf },

    /// The OS declined to open the application
    #[error("Launch of '{name}' rejected: {reason}")]
    LaunchRequestRejected { name: String, reason: String },

    /// A store file exists but could not be read or decoded
    #[error("Failed to read {}: {source}", path.display())]
    PersistenceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A store file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    PersistenceWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OS declined to register or unregister the login item
    #[error("Login item registration failed: {0}")]
    LoginItemRegistration(String),

    /// Entity not found errors
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl StartieError {
    pub fn application_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ApplicationNotFound { path: path.into() }
    }

    pub fn launch_rejected(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LaunchRequestRejected {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn read_failure(path: impl Into<PathBuf>, source: impl Into<std::io::Error>) -> Self {
        Self::PersistenceRead {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn write_failure(path: impl Into<PathBuf>, source: impl Into<std::io::Error>) -> Self {
        Self::PersistenceWrite {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn login_item(msg: impl Into<String>) -> Self {
        Self::LoginItemRegistration(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type alias for Startie operations
pub type Result<T> = std::result::Result<T, StartieError>;
