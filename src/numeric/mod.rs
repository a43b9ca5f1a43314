//! Pure numeric computations behind the service endpoints.
//!
//! Every function here is a pure function of its arguments: nothing is
//! cached, nothing is shared between calls, and nothing performs I/O.
//! Failures are reported as [`OperationError`] values so the boundary can
//! hand them back to the caller without tearing down the request.

mod linalg;
mod stats;

pub use linalg::{
    dot_product, matrix_multiply, shape, MatrixLimits, DEFAULT_MAX_MULTIPLY_ADDS,
    DEFAULT_MAX_RESULT_ELEMENTS,
};
pub use stats::{mean, sum, variance};

use thiserror::Error;

/// A flat sequence of numbers.
pub type Vector = Vec<f64>;

/// A row-major matrix. Each inner vector is one row.
pub type Matrix = Vec<Vec<f64>>;

/// Declared error conditions of the numeric operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    #[error("Cannot compute {operation} of an empty list.")]
    EmptyInput { operation: &'static str },

    #[error("Please provide exactly two {operands} for {operation} (got {actual}).")]
    WrongArity {
        operation: &'static str,
        operands: &'static str,
        actual: usize,
    },

    #[error("Vectors must have the same length (got {left} and {right}).")]
    LengthMismatch { left: usize, right: usize },

    #[error("Matrix {operand} is ragged: row {row} has {actual} columns, expected {expected}.")]
    RaggedMatrix {
        operand: usize,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Incompatible matrix shapes {}x{} and {}x{}: inner dimensions must match.",
        .left.0, .left.1, .right.0, .right.1
    )]
    IncompatibleShapes {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Result of {operation} is not a finite number.")]
    NonFinite { operation: &'static str },

    #[error("{operation} would need {actual} {quantity}, above the limit of {limit}.")]
    LimitExceeded {
        operation: &'static str,
        quantity: &'static str,
        actual: u128,
        limit: u128,
    },
}

/// Sum starting from positive zero, so an empty slice totals `0.0`
/// rather than `-0.0`.
fn total<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// Reject results that JSON cannot represent.
fn finite(operation: &'static str, value: f64) -> Result<f64, OperationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OperationError::NonFinite { operation })
    }
}
