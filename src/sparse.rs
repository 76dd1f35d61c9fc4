use crate::dense::DenseData;
use crate::element::Element;
use crate::error::{MError, MResult};
use crate::shape::Shape;
use crate::zip::CellZip;
use crate::MatrixData;
use log::trace;

/// Non-zero cells addressed by sorted linear index. Every other cell is zero.
///
/// `indices` is strictly increasing and parallel to `values`. A value can be
/// an exact zero only after `set` or a scalar broadcast; such stale entries
/// survive until the next structural rebuild.
#[derive(Debug)]
pub struct SparseData<T> {
    shape: Shape,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Element> SparseData<T> {
    /// Construct from raw parts, dropping any exact zeros.
    ///
    /// Indices must be strictly increasing and inside the shape, and both
    /// vectors must have the same length.
    pub fn from_parts(shape: Shape, indices: Vec<usize>, values: Vec<T>) -> MResult<Self> {
        shape.check_non_empty()?;
        if indices.len() != values.len() {
            return Err(MError::MalformedSparse("indices and values differ in length"));
        }
        if !indices.windows(2).all(|w| w[0] < w[1]) {
            return Err(MError::MalformedSparse("indices must be sorted, without duplicates"));
        }
        if indices.last().map_or(false, |&i| i >= shape.elem_count()) {
            return Err(MError::MalformedSparse("index exceeds matrix size"));
        }
        Ok(Self {
            shape,
            indices,
            values,
        }
        .pruned())
    }

    /// Construct from `(row, col, value)` entries in any order. A later entry
    /// for the same cell replaces an earlier one.
    pub fn from_triplets<I>(shape: Shape, entries: I) -> MResult<Self>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        shape.check_non_empty()?;
        let mut cells: Vec<(usize, T)> = Vec::new();
        for (row, col, value) in entries {
            shape.check_index(row, col)?;
            cells.push((shape.linear_index(row, col), value));
        }
        // stable, so duplicates keep insertion order
        cells.sort_by_key(|&(i, _)| i);

        let mut indices: Vec<usize> = Vec::with_capacity(cells.len());
        let mut values: Vec<T> = Vec::with_capacity(cells.len());
        for (i, v) in cells {
            if indices.last() == Some(&i) {
                if let Some(last) = values.last_mut() {
                    *last = v;
                }
            } else {
                indices.push(i);
                values.push(v);
            }
        }
        Ok(Self {
            shape,
            indices,
            values,
        }
        .pruned())
    }

    pub(crate) fn from_dense_slice(shape: Shape, dense: &[T]) -> Self {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (i, &v) in dense.iter().enumerate().filter(|(_, v)| !v.is_zero()) {
            indices.push(i);
            values.push(v);
        }
        Self {
            shape,
            indices,
            values,
        }
    }

    pub(crate) fn zeros(shape: Shape) -> Self {
        Self {
            shape,
            indices: vec![],
            values: vec![],
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of stored entries, stale zeros included.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn get_linear(&self, index: usize) -> T {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => T::zero(),
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.get_linear(self.shape.linear_index(row, col))
    }

    /// Overwrite a stored entry, or insert a new one when `value` is non-zero.
    /// Writing zero over a stored entry leaves it in place.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let index = self.shape.linear_index(row, col);
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos] = value,
            Err(pos) => {
                if !value.is_zero() {
                    self.indices.insert(pos, index);
                    self.values.insert(pos, value);
                }
            }
        }
    }

    pub fn to_dense(&self) -> DenseData<T> {
        let mut dense = vec![T::zero(); self.shape.elem_count()];
        for (&i, &v) in self.indices.iter().zip(self.values.iter()) {
            dense[i] = v;
        }
        DenseData::from_vec_unchecked(dense, self.shape)
    }

    /// Fresh sparse copy without stale zeros.
    pub fn to_sparse(&self) -> SparseData<T> {
        self.copy()
    }

    pub fn copy(&self) -> SparseData<T> {
        let mut indices = Vec::with_capacity(self.indices.len());
        let mut values = Vec::with_capacity(self.values.len());
        for (&i, &v) in self.indices.iter().zip(self.values.iter()) {
            if !v.is_zero() {
                indices.push(i);
                values.push(v);
            }
        }
        SparseData {
            shape: self.shape,
            indices,
            values,
        }
    }

    fn pruned(self) -> Self {
        if self.values.iter().any(|v| v.is_zero()) {
            self.copy()
        } else {
            self
        }
    }

    pub fn cardinality(&self) -> usize {
        self.values.iter().filter(|v| !v.is_zero()).count()
    }

    pub fn sum(&self) -> T {
        self.values.iter().fold(T::zero(), |a, &b| a + b)
    }

    /// Apply `f` to stored values only; implicit zeros are not visited.
    pub(crate) fn map_stored<F>(&mut self, f: F)
    where
        F: Fn(T) -> T,
    {
        self.values.iter_mut().for_each(|v| *v = f(*v));
    }

    /// Recompute every logical cell as `f(self, other)` and regenerate the
    /// index and value arrays from scratch. The other operand may hold
    /// non-zeros where this store has implicit zeros, so all cells are
    /// visited. Single sequential pass, indices come out increasing.
    pub(crate) fn rebuild<F>(&mut self, other: &MatrixData<T>, f: F)
    where
        F: Fn(T, T) -> T,
    {
        let shape = self.shape;
        let left = MatrixData::Sparse(std::mem::replace(self, SparseData::zeros(shape)));
        let mut indices = Vec::new();
        let mut values = Vec::new();
        for (i, a, b) in CellZip::new(&left, other) {
            let v = f(a, b);
            if !v.is_zero() {
                indices.push(i);
                values.push(v);
            }
        }
        trace!(
            "sparse rebuild {}: {} -> {} stored values",
            shape,
            left.nnz(),
            values.len()
        );
        self.indices = indices;
        self.values = values;
    }
}

impl<T: Element> Clone for SparseData<T> {
    fn clone(&self) -> Self {
        self.copy()
    }
}
