use crate::config::use_parallel;
use crate::element::Element;
use crate::error::{MError, MResult};
use crate::shape::{check_rectangular, Shape};
use crate::sparse::SparseData;
use rayon::prelude::*;

const SUM_CHUNK: usize = 1024;

/// Flat row-major buffer with one slot per cell.
#[derive(Clone, Debug)]
pub struct DenseData<T> {
    shape: Shape,
    values: Vec<T>,
}

impl<T: Element> DenseData<T> {
    pub fn new(values: Vec<T>, shape: Shape) -> MResult<Self> {
        shape.check_non_empty()?;
        if values.len() != shape.elem_count() {
            return Err(MError::Unexpected(format!(
                "dense buffer holds {} values, {} shape needs {}",
                values.len(),
                shape,
                shape.elem_count()
            )));
        }
        Ok(Self { shape, values })
    }

    pub(crate) fn from_vec_unchecked(values: Vec<T>, shape: Shape) -> Self {
        debug_assert_eq!(values.len(), shape.elem_count());
        Self { shape, values }
    }

    pub(crate) fn zeros(shape: Shape) -> Self {
        Self {
            shape,
            values: vec![T::zero(); shape.elem_count()],
        }
    }

    /// Build from rows, mapping every cell through `f`.
    pub fn from_rows_with<A, R, F>(rows: &[R], f: F) -> MResult<Self>
    where
        A: Copy + Sync,
        R: AsRef<[A]> + Sync,
        F: Fn(A) -> T + Sync + Send,
    {
        let shape = check_rectangular(rows)?;
        let mut values = vec![T::zero(); shape.elem_count()];
        let cols = shape.cols();
        if use_parallel(shape.elem_count()) {
            values
                .par_chunks_mut(cols)
                .zip(rows.par_iter())
                .for_each(|(dst, src)| {
                    for (d, s) in dst.iter_mut().zip(src.as_ref()) {
                        *d = f(*s);
                    }
                });
        } else {
            for (dst, src) in values.chunks_mut(cols).zip(rows.iter()) {
                for (d, s) in dst.iter_mut().zip(src.as_ref()) {
                    *d = f(*s);
                }
            }
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.values[self.shape.linear_index(row, col)]
    }

    #[inline]
    pub fn get_linear(&self, index: usize) -> T {
        self.values[index]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let index = self.shape.linear_index(row, col);
        self.values[index] = value;
    }

    pub fn to_sparse(&self) -> SparseData<T> {
        SparseData::from_dense_slice(self.shape, &self.values)
    }

    pub fn cardinality(&self) -> usize {
        if use_parallel(self.values.len()) {
            self.values.par_iter().filter(|v| !v.is_zero()).count()
        } else {
            self.values.iter().filter(|v| !v.is_zero()).count()
        }
    }

    /// Partial sums over fixed chunks, folded in chunk order. Both paths add
    /// in the same order, so the result does not depend on the thread count.
    pub fn sum(&self) -> T {
        let partial = |c: &[T]| c.iter().fold(T::zero(), |a, &b| a + b);
        if use_parallel(self.values.len()) {
            self.values
                .par_chunks(SUM_CHUNK)
                .map(partial)
                .collect::<Vec<T>>()
                .into_iter()
                .fold(T::zero(), |a, b| a + b)
        } else {
            self.values
                .chunks(SUM_CHUNK)
                .map(partial)
                .fold(T::zero(), |a, b| a + b)
        }
    }

    /// Apply `f` to every cell in place.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Sync + Send,
    {
        if use_parallel(self.values.len()) {
            self.values.par_iter_mut().for_each(|v| *v = f(*v));
        } else {
            self.values.iter_mut().for_each(|v| *v = f(*v));
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.values
            .chunks(self.shape.cols())
            .map(|r| r.to_vec())
            .collect()
    }
}
