//! # Numeric Service
//!
//! A small stateless HTTP service exposing named numeric operations over
//! JSON array payloads.
//!
//! This library provides:
//! - Pure numeric computations (`numeric`)
//! - The `Operation` trait and the registry of built-in operations (`operations`)
//! - An HTTP API mounting one POST route per operation (`api`)
//!
//! ## Request Flow
//! 1. Receive `{"data": ...}` on `POST /<operation>`
//! 2. Validate `data` against the operation's input shape
//! 3. Compute the result
//! 4. Respond with `{"<field>": result}` or `{"error": message}`
//!
//! ## Example
//!
//! ```rust,ignore
//! use numeric_service::operations::OperationRegistry;
//!
//! let registry = OperationRegistry::new();
//! let result = registry.execute("sum", serde_json::json!([1, 2, 3]));
//! ```

pub mod api;
pub mod config;
pub mod numeric;
pub mod operations;

pub use config::Config;
pub use operations::{Operation, OperationRegistry};
