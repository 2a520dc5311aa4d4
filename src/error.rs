//! Error types for taskrank
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in taskrank
#[derive(Debug, Error)]
pub enum RankError {
    /// A dependency id references a task that is not in the batch
    #[error("Task {task} has invalid dependency {dependency}")]
    ReferentialIntegrity { task: String, dependency: String },

    /// The dependency graph contains a cycle; `path` starts and ends on the repeated task
    #[error("Circular dependency detected: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    /// A task record failed input normalization
    #[error("Invalid task input: {0}")]
    InvalidInput(String),

    /// No batch has been scored successfully in this process
    #[error("No previously analyzed tasks found")]
    NoPriorAnalysis,

    /// IPC communication error
    #[error("IPC error: {0}")]
    Ipc(String),

    /// The daemon answered with an error
    #[error("Daemon error {code}: {message}")]
    Daemon { code: i32, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RankError {
    /// Returns true if the caller must fix its input before retrying.
    ///
    /// Everything else is an internal failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RankError::ReferentialIntegrity { .. } | RankError::CyclicDependency { .. } | RankError::InvalidInput(_)
        )
    }
}

/// Result type alias for taskrank operations
pub type Result<T> = std::result::Result<T, RankError>;
