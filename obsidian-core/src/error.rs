/// Errors raised by matrix math and mesh/object editing
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Inner dimensions of a product disagree, or a matrix has the wrong
    /// shape for the slot it is placed in. Shapes are `(rows, columns)`.
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Indexed replace outside the sequence.
    IndexOutOfRange { index: usize, len: usize },
    /// A row passed to `Matrix::from_rows` has a different length than the first.
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A matrix needs at least one row and one column.
    EmptyMatrix,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DimensionMismatch { left, right } => write!(
                f,
                "dimension mismatch: {}x{} is incompatible with {}x{}",
                left.0, left.1, right.0, right.1
            ),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            Error::RaggedRows {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} columns, expected {}",
                row, found, expected
            ),
            Error::EmptyMatrix => write!(f, "matrix must have at least one row and one column"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_dimension_mismatch() {
        let err = Error::DimensionMismatch {
            left: (2, 4),
            right: (3, 1),
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: 2x4 is incompatible with 3x1"
        );
    }

    #[test]
    fn test_display_index_out_of_range() {
        let err = Error::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range for length 3");
    }
}
