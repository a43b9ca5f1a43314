//! API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::operations::OperationInfo;

/// Body of every operation call.
///
/// `data` is kept as raw JSON here; each operation validates it against its
/// own input shape (flat list, pair of lists, pair of matrices).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    pub data: Value,
}

/// Error body, returned both for declared operation errors and for
/// rejected request bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Number of registered operations
    pub operations: usize,
}

/// Response for the operations listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OperationsResponse {
    pub operations: Vec<OperationInfo>,
}
