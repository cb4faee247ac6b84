/// Fixed-shape numeric matrix used for points and small transforms
use nalgebra::DMatrix;
use std::ops::Index;

use crate::error::{Error, Result};

/// An R×C grid of `f64`.
///
/// Points are 3×1 column vectors; the projection works with 2×4 scale
/// matrices. Math helpers always return a fresh matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: DMatrix<f64>,
}

impl Matrix {
    /// Create a zero-filled matrix. Both dimensions must be non-zero.
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(Error::EmptyMatrix);
        }
        Ok(Self {
            data: DMatrix::zeros(rows, columns),
        })
    }

    /// Build a matrix from row slices. All rows must have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyMatrix)?.as_ref().len();
        if first == 0 {
            return Err(Error::EmptyMatrix);
        }

        let mut values = Vec::with_capacity(rows.len() * first);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != first {
                return Err(Error::RaggedRows {
                    row: index,
                    expected: first,
                    found: row.len(),
                });
            }
            values.extend_from_slice(row);
        }

        Ok(Self {
            data: DMatrix::from_row_slice(rows.len(), first, &values),
        })
    }

    /// Build a matrix from a fixed-size row array.
    ///
    /// # Panics
    ///
    /// If either dimension is zero.
    pub fn from_array<const R: usize, const C: usize>(rows: [[f64; C]; R]) -> Self {
        assert!(R > 0 && C > 0, "matrix must have at least one row and one column");
        Self {
            data: DMatrix::from_fn(R, C, |r, c| rows[r][c]),
        }
    }

    /// Build an N×1 column vector.
    pub fn column(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::EmptyMatrix);
        }
        Ok(Self {
            data: DMatrix::from_column_slice(values.len(), 1, values),
        })
    }

    /// A 3×1 point.
    pub fn point(x: f64, y: f64, z: f64) -> Self {
        Self {
            data: DMatrix::from_column_slice(3, 1, &[x, y, z]),
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn columns(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.data.get((row, column)).copied()
    }

    /// Standard matrix product `self * rhs`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        multiply(self, rhs)
    }
}

/// Standard matrix product `left * right`.
///
/// Fails with [`Error::DimensionMismatch`] unless `left.columns() == right.rows()`.
pub fn multiply(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    if left.columns() != right.rows() {
        return Err(Error::DimensionMismatch {
            left: left.shape(),
            right: right.shape(),
        });
    }
    Ok(Matrix {
        data: &left.data * &right.data,
    })
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn reference_multiply(a: &[Vec<f64>], b: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let rows = a.len();
        let inner = b.len();
        let columns = b[0].len();
        let mut result = vec![vec![0.0; columns]; rows];
        for r in 0..rows {
            for k in 0..inner {
                for c in 0..columns {
                    result[r][c] += a[r][k] * b[k][c];
                }
            }
        }
        result
    }

    fn random_rows(rng: &mut impl Rng, rows: usize, columns: usize) -> Vec<Vec<f64>> {
        (0..rows)
            .map(|_| (0..columns).map(|_| rng.gen_range(-10.0..10.0)).collect())
            .collect()
    }

    #[test]
    fn test_from_rows_layout() {
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_from_array_matches_from_rows() {
        let rows = [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        assert_eq!(Matrix::from_array(rows), Matrix::from_rows(&rows).unwrap());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            Matrix::from_rows(&rows),
            Err(Error::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_empty_matrices_rejected() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert_eq!(Matrix::from_rows(&rows), Err(Error::EmptyMatrix));
        assert_eq!(Matrix::column(&[]), Err(Error::EmptyMatrix));
        assert_eq!(Matrix::zeros(0, 3), Err(Error::EmptyMatrix));
    }

    #[test]
    fn test_multiply_known_values() {
        let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let b = Matrix::column(&[5.0, 6.0]).unwrap();
        let product = multiply(&a, &b).unwrap();
        assert_eq!(product.shape(), (2, 1));
        assert_eq!(product[(0, 0)], 17.0);
        assert_eq!(product[(1, 0)], 39.0);
    }

    #[test]
    fn test_multiply_matches_reference() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let rows = rng.gen_range(1..5);
            let inner = rng.gen_range(1..5);
            let columns = rng.gen_range(1..5);
            let a = random_rows(&mut rng, rows, inner);
            let b = random_rows(&mut rng, inner, columns);

            let product = multiply(
                &Matrix::from_rows(&a).unwrap(),
                &Matrix::from_rows(&b).unwrap(),
            )
            .unwrap();
            let expected = reference_multiply(&a, &b);

            assert_eq!(product.shape(), (rows, columns));
            for r in 0..rows {
                for c in 0..columns {
                    assert!((product[(r, c)] - expected[r][c]).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_multiply_incompatible_shapes() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let rows = rng.gen_range(1..5);
            let inner = rng.gen_range(1..5);
            let other = (inner + rng.gen_range(1..4)) % 5 + 1;
            if other == inner {
                continue;
            }
            let a = Matrix::zeros(rows, inner).unwrap();
            let b = Matrix::zeros(other, 2).unwrap();
            assert_eq!(
                a.multiply(&b),
                Err(Error::DimensionMismatch {
                    left: (rows, inner),
                    right: (other, 2)
                })
            );
        }
    }

    #[test]
    fn test_multiply_leaves_operands_untouched() {
        let a = Matrix::from_rows(&[[2.0, 0.0], [0.0, 2.0]]).unwrap();
        let b = Matrix::column(&[1.0, 1.0]).unwrap();
        let before = (a.clone(), b.clone());
        let _ = multiply(&a, &b).unwrap();
        assert_eq!((a, b), before);
    }
}
