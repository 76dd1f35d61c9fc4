use crate::shape::Shape;
use crate::unit::SiDimensions;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputErrorKind {
    #[error("cannot create a matrix from an empty array")]
    Empty,
    #[error("cannot create a matrix from rows with zero values")]
    EmptyRow,
    #[error("row {row} has {len} values, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}

pub type MResult<T> = Result<T, MError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MError {
    #[error("shape mismatch in {op}: {left} vs {right}")]
    ShapeMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },
    #[error("empty or ragged input: {0}")]
    EmptyOrRaggedInput(InputErrorKind),
    #[error("sum of all cells is 0; cannot normalize")]
    DegenerateNormalization,
    #[error("index ({row}, {col}) out of range for {shape} matrix")]
    IndexOutOfRange { row: usize, col: usize, shape: Shape },
    #[error("row index {row} out of range for {shape} matrix")]
    RowOutOfRange { row: usize, shape: Shape },
    #[error("column index {col} out of range for {shape} matrix")]
    ColumnOutOfRange { col: usize, shape: Shape },
    #[error("matrix is not square: {0}")]
    NotSquare(Shape),
    #[error("malformed sparse data: {0}")]
    MalformedSparse(&'static str),
    #[error("dimension mismatch: expected [{expected}], got [{got}]")]
    DimensionMismatch {
        expected: SiDimensions,
        got: SiDimensions,
    },
    #[error("Unexpected: {0}")]
    Unexpected(String),
}

impl From<InputErrorKind> for MError {
    fn from(e: InputErrorKind) -> Self {
        MError::EmptyOrRaggedInput(e)
    }
}

impl From<&str> for MError {
    fn from(e: &str) -> Self {
        MError::Unexpected(e.to_string())
    }
}

impl From<String> for MError {
    fn from(e: String) -> Self {
        MError::Unexpected(e)
    }
}

impl From<MError> for String {
    fn from(e: MError) -> Self {
        format!("{}", e)
    }
}
