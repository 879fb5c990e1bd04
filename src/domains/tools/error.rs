//! Tool-specific error types.
//!
//! Every tool failure is one of five kinds. The kind travels with the
//! message all the way to the result envelope, so callers can tell a
//! missing configuration apart from a remote outage without parsing text.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::core::security::PathSecurityError;

/// Result type returned by every tool operation.
pub type ToolResult<T> = Result<T, ToolError>;

/// Classification of a tool failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigurationMissing,
    NotFound,
    AccessDenied,
    RemoteFailure,
    InvalidInput,
}

/// Errors that can occur during tool operations.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// A required backend setting is absent. Raised before any I/O.
    #[error("{0}")]
    ConfigurationMissing(String),

    /// The file, repository, ref, record or tool does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The path escapes the sandbox root, or the OS refused access.
    #[error("{0}")]
    AccessDenied(String),

    /// The driver, remote service or subprocess reported a failure.
    #[error("{0}")]
    RemoteFailure(String),

    /// Malformed or missing arguments.
    #[error("{0}")]
    InvalidInput(String),
}

impl ToolError {
    pub fn configuration_missing(msg: impl Into<String>) -> Self {
        Self::ConfigurationMissing(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteFailure(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AccessDenied(_) => ErrorKind::AccessDenied,
            Self::RemoteFailure(_) => ErrorKind::RemoteFailure,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// The wire form of this error: `{"error": message, "kind": kind}`.
    pub fn to_payload(&self) -> Value {
        json!({
            "error": self.to_string(),
            "kind": self.kind(),
        })
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::AccessDenied(err.to_string()),
            std::io::ErrorKind::InvalidData | std::io::ErrorKind::InvalidInput => {
                Self::InvalidInput(err.to_string())
            }
            _ => Self::RemoteFailure(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("Invalid JSON: {}", err))
    }
}

impl From<sqlx::Error> for ToolError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound(err.to_string()),
            other => Self::RemoteFailure(other.to_string()),
        }
    }
}

impl From<mongodb::error::Error> for ToolError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::RemoteFailure(err.to_string())
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteFailure(err.to_string())
    }
}

impl From<git2::Error> for ToolError {
    fn from(err: git2::Error) -> Self {
        let message = err.message().to_string();
        match err.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::UnbornBranch => Self::NotFound(message),
            git2::ErrorCode::InvalidSpec
            | git2::ErrorCode::Ambiguous
            | git2::ErrorCode::Invalid
            | git2::ErrorCode::Exists => Self::InvalidInput(message),
            _ => Self::RemoteFailure(message),
        }
    }
}

impl From<PathSecurityError> for ToolError {
    fn from(err: PathSecurityError) -> Self {
        match err {
            PathSecurityError::OutsideRoot { .. } => Self::AccessDenied(err.to_string()),
            PathSecurityError::Io { .. } => Self::RemoteFailure(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ToolError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::RemoteFailure(format!("Background task failed: {}", err))
    }
}
