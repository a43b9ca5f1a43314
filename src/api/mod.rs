//! HTTP API for the numeric service.
//!
//! ## Endpoints
//!
//! - `POST /mean` - Arithmetic mean of `data`
//! - `POST /sum` - Sum of `data`
//! - `POST /dot_product` - Dot product of the two lists in `data`
//! - `POST /matrix_multiply` - Product of the two matrices in `data`
//! - `POST /variance` - Population variance of `data`
//! - `GET /operations` - List registered operations
//! - `GET /health` - Health check
//!
//! Operation errors (wrong arity, mismatched shapes, empty statistics) come
//! back as `200 {"error": "..."}`. Bodies that do not match the operation's
//! input shape are rejected with `400 {"error": "..."}`.

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;
