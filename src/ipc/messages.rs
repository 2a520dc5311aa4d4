//! IPC message types for CLI ↔ daemon communication.
//!
//! Uses JSON Lines (newline-delimited JSON) over Unix stream socket.
//! Message schema uses familiar field names (id, method, params, result, error)
//! but does NOT implement JSON-RPC 2.0.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TaskInput;
use crate::error::RankError;

/// Request sent from a client to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    /// Unique request ID for correlating responses.
    pub id: u64,
    /// Method name (e.g., "tasks.analyze").
    pub method: String,
    /// Method parameters as JSON value.
    #[serde(default)]
    pub params: Value,
}

impl DaemonRequest {
    /// Create a new request with the given method and params.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Create a request with no parameters.
    pub fn no_params(id: u64, method: impl Into<String>) -> Self {
        Self::new(id, method, Value::Object(Default::default()))
    }
}

/// Response sent from the daemon to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    /// Request ID this response corresponds to.
    pub id: u64,
    /// Result value on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DaemonError>,
}

impl DaemonResponse {
    /// Create a success response.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: u64, error: DaemonError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Check if this response indicates success.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Error details in a daemon response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaemonError {
    /// Error code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl DaemonError {
    /// Create a new error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error with additional data.
    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PARSE_ERROR, message)
    }

    /// Invalid request error (-32600): well-formed JSON that is not a request.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_REQUEST, message)
    }

    /// Method not found error (-32601).
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::METHOD_NOT_FOUND,
            format!("Unknown method: {}", method.into()),
        )
    }

    /// Invalid params error (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_PARAMS, message)
    }

    /// Internal error (-32603).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INTERNAL_ERROR, format!("Internal error: {}", message.into()))
    }
}

impl From<&RankError> for DaemonError {
    fn from(err: &RankError) -> Self {
        match err {
            RankError::InvalidInput(_) => Self::invalid_params(err.to_string()),
            RankError::ReferentialIntegrity { task, dependency } => Self::with_data(
                ErrorCode::INVALID_TASKS,
                err.to_string(),
                serde_json::json!({ "task": task, "dependency": dependency }),
            ),
            RankError::CyclicDependency { path } => Self::with_data(
                ErrorCode::INVALID_TASKS,
                err.to_string(),
                serde_json::json!({ "cycle": path }),
            ),
            RankError::NoPriorAnalysis => Self::new(
                ErrorCode::NO_PRIOR_ANALYSIS,
                format!("{}. Call {} first or pass tasks.", err, Methods::ANALYZE),
            ),
            RankError::Daemon { code, message } => Self::new(*code, message.clone()),
            RankError::Ipc(_) | RankError::Io(_) | RankError::Json(_) => Self::internal_error(err.to_string()),
        }
    }
}

impl From<DaemonError> for RankError {
    fn from(err: DaemonError) -> Self {
        match err.code {
            ErrorCode::NO_PRIOR_ANALYSIS => RankError::NoPriorAnalysis,
            code => RankError::Daemon {
                code,
                message: err.message,
            },
        }
    }
}

/// Standard error codes.
pub struct ErrorCode;

impl ErrorCode {
    /// Invalid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Unknown method.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid parameters, including task records that fail normalization.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal daemon error.
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Missing dependency or dependency cycle in the submitted batch.
    pub const INVALID_TASKS: i32 = 1001;
    /// Suggestion requested before any batch was analyzed.
    pub const NO_PRIOR_ANALYSIS: i32 = 1002;
}

/// Known method names as constants.
pub struct Methods;

impl Methods {
    pub const PING: &'static str = "ping";
    /// Score a batch and return the full ranked list.
    pub const ANALYZE: &'static str = "tasks.analyze";
    /// Return the top of a fresh batch or of the last analysis.
    pub const SUGGEST: &'static str = "tasks.suggest";
}

/// Parameters of `tasks.analyze`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeParams {
    pub tasks: Vec<TaskInput>,
}

/// Parameters of `tasks.suggest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestParams {
    /// Fresh batch to score; when absent the last analysis is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskInput>>,
    /// How many tasks to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}
