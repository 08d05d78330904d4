//! Custom error types for taskboard.
//!
//! Expected absences (a missing date, an unknown status, a line that is not a
//! checklist line) are never errors. Errors are reserved for configuration
//! problems and for document I/O during write-back.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for taskboard operations
#[derive(Error, Debug)]
pub enum BoardError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load or save settings
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    /// No board with the requested id
    #[error("Unknown board: {id}")]
    UnknownBoard { id: String },

    /// The last remaining board cannot be deleted
    #[error("Cannot delete the last board ({id})")]
    LastBoard { id: String },

    // =========================================================================
    // Task Errors
    // =========================================================================
    /// Task id not present in the current task list
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },

    /// Task id could not be parsed as `document:line`
    #[error("Invalid task id '{id}': expected <document>:<line>")]
    InvalidTaskId { id: String },

    /// The task's line no longer exists in its document
    #[error("Line {line} is out of range for {document} ({len} lines)")]
    LineOutOfRange {
        document: String,
        line: usize,
        len: usize,
    },

    /// The task's line is no longer a checklist line
    #[error("Line {line} of {document} is no longer a task line")]
    NotATaskLine { document: String, line: usize },

    /// A field value supplied for an edit could not be understood
    #[error("Invalid {field} value: {value}")]
    InvalidField { field: String, value: String },

    // =========================================================================
    // Document Store Errors
    // =========================================================================
    /// Document does not exist in the store
    #[error("Document not found: {path}")]
    DocumentNotFound { path: String },

    /// Document store failed to read a document
    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    /// Document store rejected a write
    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoardError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create a task-not-found error
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::TaskNotFound { id: id.into() }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a read failure
    pub fn read_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a write failure
    pub fn write_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if this error came from the document store.
    ///
    /// Store errors affect a single task or document; the rest of the board
    /// stays usable.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Self::DocumentNotFound { .. }
                | Self::ReadFailed { .. }
                | Self::WriteFailed { .. }
                | Self::Io(_)
        )
    }

    /// Check if the task list is probably stale and should be refreshed
    pub fn needs_refresh(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound { .. }
                | Self::LineOutOfRange { .. }
                | Self::NotATaskLine { .. }
                | Self::DocumentNotFound { .. }
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TaskNotFound { .. } | Self::InvalidTaskId { .. } => 2,
            Self::LineOutOfRange { .. } | Self::NotATaskLine { .. } => 3,
            Self::DocumentNotFound { .. } | Self::ReadFailed { .. } | Self::WriteFailed { .. } => {
                4
            }
            Self::InvalidField { .. } => 5,
            Self::UnknownBoard { .. } | Self::LastBoard { .. } => 6,
            Self::Config { .. } | Self::InvalidConfig { .. } => 7,
            _ => 1,
        }
    }
}

/// Type alias for taskboard results
pub type Result<T> = std::result::Result<T, BoardError>;

/// Extension trait for converting foreign errors to BoardError
pub trait IntoBoardError<T> {
    fn into_board_config(self) -> Result<T>;
    fn into_board_write(self, path: &str) -> Result<T>;
}

impl<T, E: Into<anyhow::Error>> IntoBoardError<T> for std::result::Result<T, E> {
    fn into_board_config(self) -> Result<T> {
        self.map_err(|e| BoardError::config(e.into().to_string()))
    }

    fn into_board_write(self, path: &str) -> Result<T> {
        self.map_err(|e| BoardError::write_failed(path, e.into().to_string()))
    }
}
