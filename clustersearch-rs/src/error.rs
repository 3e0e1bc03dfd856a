//! Error types and exit codes for clustersearch.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes used by the CLI.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const UNAUTHORIZED: i32 = 2;
    pub const DELETE_FAILED: i32 = 3;
    pub const INVALID_INPUT: i32 = 4;
}

/// Main error type for clustersearch operations.
///
/// Query compilation never produces an error; malformed search text degrades
/// instead. These variants cover the delete flow, persistence and the CLI.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("You are not authorized to delete this resource.")]
    Unauthorized,

    #[error("Access review for {kind} '{name}' is still loading")]
    AccessPending { kind: String, name: String },

    #[error("A delete is already in progress for {kind} '{name}'")]
    DeleteInFlight { kind: String, name: String },

    #[error("No delete is in progress for {kind} '{name}'")]
    DeleteNotStarted { kind: String, name: String },

    #[error("Delete dialog for {kind} '{name}' is closed")]
    DialogClosed { kind: String, name: String },

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Cache snapshot not found: {0}")]
    SnapshotNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl SearchError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SearchError::Unauthorized | SearchError::AccessPending { .. } => {
                exit_code::UNAUTHORIZED
            }
            SearchError::DeleteFailed(_)
            | SearchError::DeleteInFlight { .. }
            | SearchError::DeleteNotStarted { .. }
            | SearchError::DialogClosed { .. } => exit_code::DELETE_FAILED,
            SearchError::InvalidInput(_) | SearchError::JsonError(_) => exit_code::INVALID_INPUT,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

/// Result type alias for clustersearch operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    GeneralError,
    Unauthorized,
    DeleteFailed,
    InvalidInput,
}

impl ExitCode {
    /// Convert to exit code integer.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => exit_code::SUCCESS,
            ExitCode::GeneralError => exit_code::GENERAL_ERROR,
            ExitCode::Unauthorized => exit_code::UNAUTHORIZED,
            ExitCode::DeleteFailed => exit_code::DELETE_FAILED,
            ExitCode::InvalidInput => exit_code::INVALID_INPUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(SearchError::Unauthorized.exit_code(), exit_code::UNAUTHORIZED);
        assert_eq!(
            SearchError::DeleteFailed("boom".to_string()).exit_code(),
            exit_code::DELETE_FAILED
        );
        assert_eq!(
            SearchError::DeleteNotStarted {
                kind: "pod".to_string(),
                name: "web-1".to_string(),
            }
            .exit_code(),
            exit_code::DELETE_FAILED
        );
        assert_eq!(
            SearchError::InvalidInput("bad".to_string()).exit_code(),
            exit_code::INVALID_INPUT
        );
        assert_eq!(
            SearchError::CacheError("x".to_string()).exit_code(),
            exit_code::GENERAL_ERROR
        );
    }

    #[test]
    fn test_unauthorized_message() {
        assert_eq!(
            SearchError::Unauthorized.to_string(),
            "You are not authorized to delete this resource."
        );
    }
}
