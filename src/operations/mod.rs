//! Named operations exposed by the service.
//!
//! An [`Operation`] takes the raw `data` field of a request, validates it
//! against its own input shape and returns a result mapping. The
//! [`OperationRegistry`] is built once at startup and handed to the HTTP
//! layer, which mounts one route per registered operation.

mod builtin;

pub use builtin::{DotProduct, MatrixMultiply, Mean, Sum, Variance};
pub use crate::numeric::MatrixLimits;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::numeric::OperationError;

/// Failure of a single operation call.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// `data` does not match the declared input shape. Rejected at the
    /// boundary as a bad request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One of the operation's declared error conditions. Handed back to the
    /// caller as an `error` value.
    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Information about an operation for display purposes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OperationInfo {
    pub name: String,
    pub description: String,
}

/// Trait for implementing operations.
pub trait Operation: Send + Sync {
    /// The unique name of this operation. Also its route.
    fn name(&self) -> &'static str;

    /// A description of what this operation computes.
    fn description(&self) -> &str;

    /// Key under which a successful result is returned.
    fn result_field(&self) -> &str;

    /// Execute the operation on the request's `data` value.
    fn execute(&self, data: Value) -> Result<Value, ExecuteError>;
}

/// Registry of available operations.
#[derive(Clone)]
pub struct OperationRegistry {
    operations: HashMap<String, Arc<dyn Operation>>,
}

impl OperationRegistry {
    /// Create a registry with all built-in operations and default limits.
    pub fn new() -> Self {
        Self::with_limits(MatrixLimits::default())
    }

    /// Create a registry with all built-in operations, bounding matrix
    /// products by `limits`.
    pub fn with_limits(limits: MatrixLimits) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(Mean));
        registry.register(Arc::new(Sum));
        registry.register(Arc::new(DotProduct));
        registry.register(Arc::new(MatrixMultiply::new(limits)));
        registry.register(Arc::new(Variance));
        registry
    }

    /// Create an empty registry (no built-in operations).
    pub fn empty() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Register an operation, replacing any previous one with the same name.
    pub fn register(&mut self, operation: Arc<dyn Operation>) {
        let name = operation.name().to_string();
        if self.operations.insert(name.clone(), operation).is_some() {
            tracing::warn!("Operation {} registered twice; keeping the latest", name);
        }
    }

    /// Look up an operation by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Operation>> {
        self.operations.get(name).cloned()
    }

    /// All operations, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Operation>> {
        let mut ops: Vec<_> = self.operations.values().collect();
        ops.sort_by(|a, b| a.name().cmp(b.name()));
        ops.into_iter()
    }

    /// Names and descriptions of all operations, sorted by name.
    pub fn list(&self) -> Vec<OperationInfo> {
        self.iter()
            .map(|op| OperationInfo {
                name: op.name().to_string(),
                description: op.description().to_string(),
            })
            .collect()
    }

    /// Execute an operation by name.
    ///
    /// Returns `None` if no operation with that name is registered.
    pub fn execute(&self, name: &str, data: Value) -> Option<Result<Value, ExecuteError>> {
        self.get(name).map(|op| op.execute(data))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
