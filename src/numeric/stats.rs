//! Summary statistics over a flat sequence.

use tracing::debug;

use super::{finite, total, OperationError};

/// Total of all values. The sum of an empty sequence is `0`.
pub fn sum(values: &[f64]) -> Result<f64, OperationError> {
    debug!(len = values.len(), "computing sum");
    finite("sum", total(values))
}

/// Mean of a non-empty slice. Falls back to dividing each term first when
/// the plain total overflows.
fn average(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let plain = total(values) / n;
    if plain.is_finite() {
        plain
    } else {
        values.iter().fold(0.0, |acc, v| acc + v / n)
    }
}

/// Arithmetic mean.
///
/// # Errors
///
/// Returns [`OperationError::EmptyInput`] for an empty sequence.
pub fn mean(values: &[f64]) -> Result<f64, OperationError> {
    debug!(len = values.len(), "computing mean");
    if values.is_empty() {
        return Err(OperationError::EmptyInput { operation: "mean" });
    }
    finite("mean", average(values))
}

/// Population variance (divides by N, not N - 1).
///
/// Computed in two passes around the mean so large offsets do not cancel
/// out the spread.
///
/// # Errors
///
/// Returns [`OperationError::EmptyInput`] for an empty sequence.
pub fn variance(values: &[f64]) -> Result<f64, OperationError> {
    debug!(len = values.len(), "computing variance");
    if values.is_empty() {
        return Err(OperationError::EmptyInput {
            operation: "variance",
        });
    }
    let mean = average(values);
    let squared = values.iter().fold(0.0, |acc, v| acc + (v - mean).powi(2));
    finite("variance", squared / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        assert_eq!(sum(&[]), Ok(0.0));
    }

    #[test]
    fn test_empty_sum_is_positive_zero() {
        let value = sum(&[]).unwrap();
        assert!(value.is_sign_positive());
        assert_eq!(serde_json::to_string(&value).unwrap(), "0.0");
    }

    #[test]
    fn test_sum_basic() {
        assert_eq!(sum(&[1.0, 2.0, 3.0]), Ok(6.0));
        assert_eq!(sum(&[-1.5, 0.5]), Ok(-1.0));
    }

    #[test]
    fn test_sum_overflow_is_rejected() {
        assert_eq!(
            sum(&[f64::MAX, f64::MAX]),
            Err(OperationError::NonFinite { operation: "sum" })
        );
    }

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Ok(2.0));
        assert_eq!(mean(&[4.0]), Ok(4.0));
    }

    #[test]
    fn test_mean_near_overflow_is_finite() {
        assert_eq!(mean(&[f64::MAX, f64::MAX]), Ok(f64::MAX));
        assert_eq!(variance(&[f64::MAX, f64::MAX]), Ok(0.0));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(
            mean(&[]),
            Err(OperationError::EmptyInput { operation: "mean" })
        );
    }

    #[test]
    fn test_variance_is_population_variance() {
        let v = variance(&[1.0, 2.0, 3.0]).unwrap();
        assert!(approx(v, 2.0 / 3.0), "got {v}");
    }

    #[test]
    fn test_variance_of_constant_is_zero() {
        assert_eq!(variance(&[7.0, 7.0, 7.0]), Ok(0.0));
        assert_eq!(variance(&[3.0]), Ok(0.0));
    }

    #[test]
    fn test_variance_with_large_offset() {
        let v = variance(&[1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0]).unwrap();
        assert!((v - 2.0 / 3.0).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn test_variance_empty() {
        assert_eq!(
            variance(&[]),
            Err(OperationError::EmptyInput {
                operation: "variance"
            })
        );
    }
}
