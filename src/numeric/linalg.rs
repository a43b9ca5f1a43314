//! Vector and matrix products.

use tracing::debug;

use super::{finite, Matrix, OperationError};

/// Default cap on the number of elements in a matrix product.
pub const DEFAULT_MAX_RESULT_ELEMENTS: usize = 1_000_000;

/// Default cap on the multiply-adds one matrix product may perform.
pub const DEFAULT_MAX_MULTIPLY_ADDS: u64 = 100_000_000;

/// Size bounds for [`matrix_multiply`]. The product of an `n x 1` and a
/// `1 x m` matrix is `n * m` elements, so the request size alone does not
/// bound it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixLimits {
    /// Largest allowed `rows * cols` of the result
    pub max_result_elements: usize,
    /// Largest allowed `rows * inner * cols`
    pub max_multiply_adds: u64,
}

impl Default for MatrixLimits {
    fn default() -> Self {
        Self {
            max_result_elements: DEFAULT_MAX_RESULT_ELEMENTS,
            max_multiply_adds: DEFAULT_MAX_MULTIPLY_ADDS,
        }
    }
}

impl MatrixLimits {
    fn check(&self, rows: usize, inner: usize, cols: usize) -> Result<(), OperationError> {
        let elements = rows as u128 * cols as u128;
        if elements > self.max_result_elements as u128 {
            return Err(OperationError::LimitExceeded {
                operation: "matrix_multiply",
                quantity: "result elements",
                actual: elements,
                limit: self.max_result_elements as u128,
            });
        }
        let work = elements * inner as u128;
        if work > self.max_multiply_adds as u128 {
            return Err(OperationError::LimitExceeded {
                operation: "matrix_multiply",
                quantity: "multiply-adds",
                actual: work,
                limit: self.max_multiply_adds as u128,
            });
        }
        Ok(())
    }
}

/// Sum of elementwise products of two equal-length vectors.
///
/// # Errors
///
/// Returns [`OperationError::LengthMismatch`] when the lengths differ.
pub fn dot_product(a: &[f64], b: &[f64]) -> Result<f64, OperationError> {
    debug!(left = a.len(), right = b.len(), "computing dot product");
    if a.len() != b.len() {
        return Err(OperationError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    finite(
        "dot_product",
        a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y),
    )
}

/// Shape `(rows, cols)` of a matrix, checking that every row has the same
/// length. A matrix without rows is `0x0`.
///
/// `operand` is the position of the matrix in the request and only feeds the
/// error message.
pub fn shape(matrix: &Matrix, operand: usize) -> Result<(usize, usize), OperationError> {
    let cols = matrix.first().map_or(0, Vec::len);
    for (row, values) in matrix.iter().enumerate() {
        if values.len() != cols {
            return Err(OperationError::RaggedMatrix {
                operand,
                row,
                expected: cols,
                actual: values.len(),
            });
        }
    }
    Ok((matrix.len(), cols))
}

/// Standard matrix product `a x b`.
///
/// # Errors
///
/// - [`OperationError::RaggedMatrix`] if either operand has rows of
///   different lengths.
/// - [`OperationError::IncompatibleShapes`] if the column count of `a`
///   differs from the row count of `b`.
/// - [`OperationError::LimitExceeded`] if the product is larger than
///   `limits` allow. Checked before anything is allocated.
pub fn matrix_multiply(
    a: &Matrix,
    b: &Matrix,
    limits: &MatrixLimits,
) -> Result<Matrix, OperationError> {
    let (rows, inner) = shape(a, 0)?;
    let (b_rows, cols) = shape(b, 1)?;
    debug!(rows, inner, b_rows, cols, "computing matrix product");

    if inner != b_rows {
        return Err(OperationError::IncompatibleShapes {
            left: (rows, inner),
            right: (b_rows, cols),
        });
    }
    limits.check(rows, inner, cols)?;

    let mut product = vec![vec![0.0; cols]; rows];
    for (out_row, a_row) in product.iter_mut().zip(a) {
        for (k, &a_ik) in a_row.iter().enumerate() {
            for (out, &b_kj) in out_row.iter_mut().zip(&b[k]) {
                *out += a_ik * b_kj;
            }
        }
        for &value in out_row.iter() {
            finite("matrix_multiply", value)?;
        }
    }
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product_basic() {
        assert_eq!(dot_product(&[1.0, 2.0], &[3.0, 4.0]), Ok(11.0));
    }

    #[test]
    fn test_dot_product_of_empty_vectors() {
        assert_eq!(dot_product(&[], &[]), Ok(0.0));
    }

    #[test]
    fn test_dot_product_of_empty_vectors_is_positive_zero() {
        assert!(dot_product(&[], &[]).unwrap().is_sign_positive());
    }

    #[test]
    fn test_dot_product_length_mismatch() {
        assert_eq!(
            dot_product(&[1.0, 2.0, 3.0], &[1.0]),
            Err(OperationError::LengthMismatch { left: 3, right: 1 })
        );
    }

    #[test]
    fn test_identity_multiply() {
        let identity = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let m = vec![vec![5.0, 6.0], vec![7.0, 8.0]];
        assert_eq!(matrix_multiply(&identity, &m, &MatrixLimits::default()), Ok(m.clone()));
        assert_eq!(matrix_multiply(&m, &identity, &MatrixLimits::default()), Ok(m));
    }

    #[test]
    fn test_rectangular_multiply() {
        // 2x3 . 3x1
        let a = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let b = vec![vec![1.0], vec![0.0], vec![-1.0]];
        assert_eq!(matrix_multiply(&a, &b, &MatrixLimits::default()), Ok(vec![vec![-2.0], vec![-2.0]]));
    }

    #[test]
    fn test_incompatible_shapes() {
        let a = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(
            matrix_multiply(&a, &a, &MatrixLimits::default()),
            Err(OperationError::IncompatibleShapes {
                left: (2, 3),
                right: (2, 3),
            })
        );
    }

    #[test]
    fn test_ragged_operand() {
        let a = vec![vec![1.0, 2.0], vec![3.0]];
        let b = vec![vec![1.0], vec![1.0]];
        assert_eq!(
            matrix_multiply(&a, &b, &MatrixLimits::default()),
            Err(OperationError::RaggedMatrix {
                operand: 0,
                row: 1,
                expected: 2,
                actual: 1,
            })
        );
        assert!(matches!(
            matrix_multiply(&b, &a, &MatrixLimits::default()),
            Err(OperationError::RaggedMatrix { operand: 1, .. })
        ));
    }

    #[test]
    fn test_empty_matrices() {
        assert_eq!(matrix_multiply(&vec![], &vec![], &MatrixLimits::default()), Ok(vec![]));
        // 2x0 . 0x0
        let a = vec![vec![], vec![]];
        assert_eq!(matrix_multiply(&a, &vec![], &MatrixLimits::default()), Ok(vec![vec![], vec![]]));
    }

    #[test]
    fn test_result_element_limit() {
        // 3x1 . 1x4 has 12 elements
        let a = vec![vec![1.0], vec![2.0], vec![3.0]];
        let b = vec![vec![1.0, 2.0, 3.0, 4.0]];
        let limits = MatrixLimits {
            max_result_elements: 11,
            ..MatrixLimits::default()
        };
        assert_eq!(
            matrix_multiply(&a, &b, &limits),
            Err(OperationError::LimitExceeded {
                operation: "matrix_multiply",
                quantity: "result elements",
                actual: 12,
                limit: 11,
            })
        );

        let limits = MatrixLimits {
            max_result_elements: 12,
            ..MatrixLimits::default()
        };
        assert_eq!(matrix_multiply(&a, &b, &limits).unwrap().len(), 3);
    }

    #[test]
    fn test_multiply_add_limit() {
        // 1x3 . 3x1 is a single element but three multiply-adds
        let a = vec![vec![1.0, 2.0, 3.0]];
        let b = vec![vec![1.0], vec![1.0], vec![1.0]];
        let limits = MatrixLimits {
            max_result_elements: 1,
            max_multiply_adds: 2,
        };
        assert!(matches!(
            matrix_multiply(&a, &b, &limits),
            Err(OperationError::LimitExceeded {
                quantity: "multiply-adds",
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_shape() {
        assert_eq!(shape(&vec![vec![1.0, 2.0, 3.0]], 0), Ok((1, 3)));
        assert_eq!(shape(&vec![], 0), Ok((0, 0)));
    }
}
