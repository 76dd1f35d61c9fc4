use super::error::{InputErrorKind, MError, MResult};
use std::fmt;

/// Row and column count of a matrix store. Fixed for the lifetime of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    pub const fn new(rows: usize, cols: usize) -> Shape {
        Shape { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims2(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn elem_count(&self) -> usize {
        self.rows * self.cols
    }

    //行优先
    #[inline(always)]
    pub fn linear_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline(always)]
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// A store needs at least one cell.
    pub(crate) fn check_non_empty(&self) -> MResult<()> {
        if self.elem_count() == 0 {
            return Err(InputErrorKind::Empty.into());
        }
        Ok(())
    }

    pub(crate) fn ensure_same(&self, other: &Shape, op: &'static str) -> MResult<()> {
        if self != other {
            return Err(MError::ShapeMismatch {
                op,
                left: *self,
                right: *other,
            });
        }
        Ok(())
    }

    pub(crate) fn check_index(&self, row: usize, col: usize) -> MResult<()> {
        if row >= self.rows || col >= self.cols {
            return Err(MError::IndexOutOfRange {
                row,
                col,
                shape: *self,
            });
        }
        Ok(())
    }

    pub(crate) fn check_row(&self, row: usize) -> MResult<()> {
        if row >= self.rows {
            return Err(MError::RowOutOfRange { row, shape: *self });
        }
        Ok(())
    }

    pub(crate) fn check_col(&self, col: usize) -> MResult<()> {
        if col >= self.cols {
            return Err(MError::ColumnOutOfRange { col, shape: *self });
        }
        Ok(())
    }

    pub(crate) fn check_square(&self) -> MResult<()> {
        if !self.is_square() {
            return Err(MError::NotSquare(*self));
        }
        Ok(())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Checks that `values` is non-empty and rectangular, returning its shape.
pub fn check_rectangular<A, R: AsRef<[A]>>(values: &[R]) -> MResult<Shape> {
    let first = match values.first() {
        Some(r) => r.as_ref().len(),
        None => return Err(InputErrorKind::Empty.into()),
    };
    for (row, r) in values.iter().enumerate().skip(1) {
        let len = r.as_ref().len();
        if len != first {
            return Err(InputErrorKind::Ragged {
                row,
                len,
                expected: first,
            }
            .into());
        }
    }
    if first == 0 {
        return Err(InputErrorKind::EmptyRow.into());
    }
    Ok(Shape::new(values.len(), first))
}
