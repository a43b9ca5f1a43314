//! The built-in numeric operations.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{ExecuteError, Operation};
use crate::numeric::{self, Matrix, MatrixLimits, OperationError, Vector};

/// Deserialize `data` into the operation's typed input.
fn parse<T: DeserializeOwned>(operation: &str, data: Value) -> Result<T, ExecuteError> {
    serde_json::from_value(data)
        .map_err(|e| ExecuteError::InvalidInput(format!("{}: {}", operation, e)))
}

/// Split the operands of a binary operation. `operands` names what the
/// caller should send ("lists", "matrices").
fn pair<T>(
    operation: &'static str,
    operands: &'static str,
    data: Vec<T>,
) -> Result<(T, T), ExecuteError> {
    let actual = data.len();
    let [left, right]: [T; 2] = data.try_into().map_err(|_| OperationError::WrongArity {
        operation,
        operands,
        actual,
    })?;
    Ok((left, right))
}

/// Wrap a result value as `{ field: value }`.
fn result(field: &str, value: impl Into<Value>) -> Value {
    let mut map = Map::new();
    map.insert(field.to_string(), value.into());
    Value::Object(map)
}

/// Arithmetic mean of a list of numbers.
pub struct Mean;

impl Operation for Mean {
    fn name(&self) -> &'static str {
        "mean"
    }

    fn description(&self) -> &str {
        "Calculate the mean of a list of numbers."
    }

    fn result_field(&self) -> &str {
        "mean"
    }

    fn execute(&self, data: Value) -> Result<Value, ExecuteError> {
        let values: Vector = parse(self.name(), data)?;
        Ok(result(self.result_field(), numeric::mean(&values)?))
    }
}

/// Sum of a list of numbers.
pub struct Sum;

impl Operation for Sum {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn description(&self) -> &str {
        "Calculate the sum of a list of numbers."
    }

    fn result_field(&self) -> &str {
        "sum"
    }

    fn execute(&self, data: Value) -> Result<Value, ExecuteError> {
        let values: Vector = parse(self.name(), data)?;
        Ok(result(self.result_field(), numeric::sum(&values)?))
    }
}

/// Dot product of two lists of numbers.
pub struct DotProduct;

impl Operation for DotProduct {
    fn name(&self) -> &'static str {
        "dot_product"
    }

    fn description(&self) -> &str {
        "Calculate the dot product of two lists of numbers."
    }

    fn result_field(&self) -> &str {
        "dot_product"
    }

    fn execute(&self, data: Value) -> Result<Value, ExecuteError> {
        let vectors: Vec<Vector> = parse(self.name(), data)?;
        let (a, b) = pair(self.name(), "lists", vectors)?;
        Ok(result(self.result_field(), numeric::dot_product(&a, &b)?))
    }
}

/// Product of two matrices, bounded by [`MatrixLimits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixMultiply {
    limits: MatrixLimits,
}

impl MatrixMultiply {
    pub fn new(limits: MatrixLimits) -> Self {
        Self { limits }
    }
}

impl Operation for MatrixMultiply {
    fn name(&self) -> &'static str {
        "matrix_multiply"
    }

    fn description(&self) -> &str {
        "Multiply two matrices."
    }

    fn result_field(&self) -> &str {
        "product"
    }

    fn execute(&self, data: Value) -> Result<Value, ExecuteError> {
        let matrices: Vec<Matrix> = parse(self.name(), data)?;
        let (a, b) = pair(self.name(), "matrices", matrices)?;
        let product = numeric::matrix_multiply(&a, &b, &self.limits)?;
        Ok(result(self.result_field(), product))
    }
}

/// Population variance of a list of numbers.
pub struct Variance;

impl Operation for Variance {
    fn name(&self) -> &'static str {
        "variance"
    }

    fn description(&self) -> &str {
        "Calculate the variance of a list of numbers."
    }

    fn result_field(&self) -> &str {
        "variance"
    }

    fn execute(&self, data: Value) -> Result<Value, ExecuteError> {
        let values: Vector = parse(self.name(), data)?;
        Ok(result(self.result_field(), numeric::variance(&values)?))
    }
}
