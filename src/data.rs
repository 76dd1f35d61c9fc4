use crate::dense::DenseData;
use crate::element::Element;
use crate::error::MResult;
use crate::shape::Shape;
use crate::sparse::SparseData;
use crate::zip::CellZip;
use log::trace;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    Dense,
    Sparse,
}

/// Numeric backing store of a matrix, values in SI units.
#[derive(Debug)]
pub enum MatrixData<T = f64> {
    Dense(DenseData<T>),
    Sparse(SparseData<T>),
}

impl<T: Element> MatrixData<T> {
    /// Build a store from rows of raw values, converting each through `to_si`.
    pub fn instantiate<A, R, F>(rows: &[R], to_si: F, storage: StorageType) -> MResult<Self>
    where
        A: Copy + Sync,
        R: AsRef<[A]> + Sync,
        F: Fn(A) -> T + Sync + Send,
    {
        let dense = DenseData::from_rows_with(rows, to_si)?;
        Ok(match storage {
            StorageType::Dense => MatrixData::Dense(dense),
            StorageType::Sparse => MatrixData::Sparse(dense.to_sparse()),
        })
    }

    pub fn from_si_rows<R: AsRef<[T]> + Sync>(rows: &[R], storage: StorageType) -> MResult<Self> {
        Self::instantiate(rows, |v| v, storage)
    }

    /// Build a store from `(row, col, value)` entries; unlisted cells are zero.
    pub fn from_triplets<I>(shape: Shape, entries: I, storage: StorageType) -> MResult<Self>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        let sparse = SparseData::from_triplets(shape, entries)?;
        Ok(match storage {
            StorageType::Dense => MatrixData::Dense(sparse.to_dense()),
            StorageType::Sparse => MatrixData::Sparse(sparse),
        })
    }

    pub fn zeros(shape: Shape, storage: StorageType) -> MResult<Self> {
        shape.check_non_empty()?;
        Ok(match storage {
            StorageType::Dense => MatrixData::Dense(DenseData::zeros(shape)),
            StorageType::Sparse => MatrixData::Sparse(SparseData::zeros(shape)),
        })
    }

    pub fn shape(&self) -> Shape {
        match self {
            MatrixData::Dense(d) => d.shape(),
            MatrixData::Sparse(s) => s.shape(),
        }
    }

    pub fn rows(&self) -> usize {
        self.shape().rows()
    }

    pub fn cols(&self) -> usize {
        self.shape().cols()
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            MatrixData::Dense(_) => StorageType::Dense,
            MatrixData::Sparse(_) => StorageType::Sparse,
        }
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, MatrixData::Dense(_))
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, MatrixData::Sparse(_))
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        match self {
            MatrixData::Dense(d) => d.get(row, col),
            MatrixData::Sparse(s) => s.get(row, col),
        }
    }

    #[inline]
    pub fn get_linear(&self, index: usize) -> T {
        match self {
            MatrixData::Dense(d) => d.get_linear(index),
            MatrixData::Sparse(s) => s.get_linear(index),
        }
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        match self {
            MatrixData::Dense(d) => d.set(row, col, value),
            MatrixData::Sparse(s) => s.set(row, col, value),
        }
    }

    pub fn to_dense(&self) -> MatrixData<T> {
        match self {
            MatrixData::Dense(d) => MatrixData::Dense(d.clone()),
            MatrixData::Sparse(s) => {
                trace!("sparse -> dense {}", s.shape());
                MatrixData::Dense(s.to_dense())
            }
        }
    }

    pub fn to_sparse(&self) -> MatrixData<T> {
        match self {
            MatrixData::Dense(d) => {
                trace!("dense -> sparse {}", d.shape());
                MatrixData::Sparse(d.to_sparse())
            }
            MatrixData::Sparse(s) => MatrixData::Sparse(s.to_sparse()),
        }
    }

    pub fn into_dense(self) -> MatrixData<T> {
        match self {
            MatrixData::Dense(_) => self,
            MatrixData::Sparse(_) => self.to_dense(),
        }
    }

    pub fn into_sparse(self) -> MatrixData<T> {
        match self {
            MatrixData::Dense(_) => self.to_sparse(),
            MatrixData::Sparse(_) => self,
        }
    }

    /// Deep copy in the same layout. Sparse copies drop stale zeros.
    pub fn copy(&self) -> MatrixData<T> {
        self.clone()
    }

    /// Number of cells whose value is not zero.
    pub fn cardinality(&self) -> usize {
        match self {
            MatrixData::Dense(d) => d.cardinality(),
            MatrixData::Sparse(s) => s.cardinality(),
        }
    }

    /// Number of physically stored values.
    pub fn nnz(&self) -> usize {
        match self {
            MatrixData::Dense(d) => d.as_slice().len(),
            MatrixData::Sparse(s) => s.nnz(),
        }
    }

    pub fn sum(&self) -> T {
        match self {
            MatrixData::Dense(d) => d.sum(),
            MatrixData::Sparse(s) => s.sum(),
        }
    }

    /// Apply `f` to every logical cell, keeping the layout. A sparse store is
    /// densified first so that `f(0) != 0` is honoured.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(T) -> T + Sync + Send,
    {
        match self {
            MatrixData::Dense(d) => d.apply(f),
            MatrixData::Sparse(s) => {
                let mut d = s.to_dense();
                d.apply(f);
                *s = d.to_sparse();
            }
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        match self {
            MatrixData::Dense(d) => d.to_rows(),
            MatrixData::Sparse(s) => s.to_dense().to_rows(),
        }
    }

    pub fn row(&self, row: usize) -> MResult<Vec<T>> {
        self.shape().check_row(row)?;
        Ok((0..self.cols()).map(|c| self.get(row, c)).collect())
    }

    pub fn column(&self, col: usize) -> MResult<Vec<T>> {
        self.shape().check_col(col)?;
        Ok((0..self.rows()).map(|r| self.get(r, col)).collect())
    }

    pub fn diagonal(&self) -> MResult<Vec<T>> {
        self.shape().check_square()?;
        Ok((0..self.rows()).map(|i| self.get(i, i)).collect())
    }
}

impl<T: Element> Clone for MatrixData<T> {
    fn clone(&self) -> Self {
        match self {
            MatrixData::Dense(d) => MatrixData::Dense(d.clone()),
            MatrixData::Sparse(s) => MatrixData::Sparse(s.copy()),
        }
    }
}

impl<T: Element> PartialEq for MatrixData<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() || self.storage_type() != other.storage_type() {
            return false;
        }
        match (self, other) {
            (MatrixData::Dense(a), MatrixData::Dense(b)) => a.as_slice() == b.as_slice(),
            _ => CellZip::new(self, other).all(|(_, a, b)| a == b),
        }
    }
}

impl<T: Element> Hash for MatrixData<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shape().hash(state);
        self.storage_type().hash(state);
        // zero cells are skipped so that stale zeros and -0.0 hash like implicit zeros
        let mut put = |i: usize, v: T| {
            if !v.is_zero() {
                i.hash(state);
                v.bits().hash(state);
            }
        };
        match self {
            MatrixData::Dense(d) => d
                .as_slice()
                .iter()
                .enumerate()
                .for_each(|(i, &v)| put(i, v)),
            MatrixData::Sparse(s) => s
                .indices()
                .iter()
                .zip(s.values())
                .for_each(|(&i, &v)| put(i, v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InputErrorKind, MError};
    use crate::{dense, sparse};
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(d: &MatrixData) -> u64 {
        let mut h = DefaultHasher::new();
        d.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_dense_to_sparse_scenario() {
        let d = dense![[1.0, 0.0], [0.0, 2.0]];
        let s = d.to_sparse();
        match &s {
            MatrixData::Sparse(sp) => {
                assert_eq!(sp.indices(), &[0, 3]);
                assert_eq!(sp.values(), &[1.0, 2.0]);
            }
            MatrixData::Dense(_) => panic!("expected sparse"),
        }
        assert_eq!(s.cardinality(), 2);
        assert_eq!(s.sum(), 3.0);
        assert_eq!(d.cardinality(), 2);
        assert_eq!(d.sum(), 3.0);
    }

    #[test]
    fn test_instantiate_with_scale() {
        let d = MatrixData::instantiate(&[[1.0, 2.0], [0.0, 3.0]], |v: f64| v * 1000.0, StorageType::Sparse)
            .unwrap();
        assert!(d.is_sparse());
        assert_eq!(d.get(0, 1), 2000.0);
        assert_eq!(d.get(1, 0), 0.0);
        assert_eq!(d.nnz(), 3);
    }

    #[test]
    fn test_instantiate_rejects_bad_input() {
        let empty: Vec<Vec<f64>> = vec![];
        assert_eq!(
            MatrixData::from_si_rows(&empty, StorageType::Dense),
            Err(MError::EmptyOrRaggedInput(InputErrorKind::Empty))
        );
        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            MatrixData::from_si_rows(&ragged, StorageType::Sparse),
            Err(MError::EmptyOrRaggedInput(InputErrorKind::Ragged { .. }))
        ));
    }

    #[test]
    fn test_round_trip() {
        let d = dense![[1.5, 0.0, -2.0], [0.0, 0.0, 4.0]];
        let back = d.to_sparse().to_dense();
        assert_eq!(back, d);
        let s = sparse![[0.0, 7.0], [8.0, 0.0]];
        assert_eq!(s.to_dense().to_sparse(), s);
    }

    #[test]
    fn test_equality_includes_layout() {
        let d = dense![[1.0, 0.0], [0.0, 2.0]];
        let s = sparse![[1.0, 0.0], [0.0, 2.0]];
        assert_ne!(d, s);
        assert_eq!(d, s.to_dense());
        assert_ne!(d, dense![[1.0, 0.0], [0.0, 3.0]]);
        assert_ne!(dense![[1.0, 2.0]], dense![[1.0], [2.0]]);
    }

    #[test]
    fn test_stale_zero_invisible_to_eq_and_hash() {
        let mut s = sparse![[1.0, 0.0], [0.0, 2.0]];
        s.set(0, 0, 0.0);
        let clean = sparse![[0.0, 0.0], [0.0, 2.0]];
        assert_eq!(s.nnz(), 2);
        assert_eq!(s, clean);
        assert_eq!(hash_of(&s), hash_of(&clean));
    }

    #[test]
    fn test_copy_is_deep() {
        let a = dense![[1.0, 2.0]];
        let mut b = a.copy();
        b.set(0, 0, 9.0);
        assert_eq!(a.get(0, 0), 1.0);
        assert!(b.is_dense());

        let mut s = sparse![[1.0, 2.0]];
        s.set(0, 1, 0.0);
        assert_eq!(s.copy().nnz(), 1);
        assert!(s.copy().is_sparse());
    }

    #[test]
    fn test_apply_sparse_sees_implicit_zeros() {
        let mut s = sparse![[0.0, 2.0], [0.0, 0.0]];
        s.apply(|v| v + 1.0);
        assert!(s.is_sparse());
        assert_eq!(s.to_rows(), vec![vec![1.0, 3.0], vec![1.0, 1.0]]);
        assert_eq!(s.cardinality(), 4);
    }

    #[test]
    fn test_rows_columns_diagonal() {
        let d = sparse![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(d.row(1).unwrap(), vec![3.0, 4.0]);
        assert_eq!(d.column(0).unwrap(), vec![1.0, 3.0]);
        assert_eq!(d.diagonal().unwrap(), vec![1.0, 4.0]);
        assert!(d.row(2).is_err());
        assert!(dense![[1.0, 2.0]].diagonal().is_err());
    }

    #[test]
    fn test_from_triplets_layouts() {
        let entries = vec![(0, 1, 5.0), (1, 0, 2.0)];
        let d = MatrixData::from_triplets(Shape::new(2, 2), entries.clone(), StorageType::Dense).unwrap();
        let s = MatrixData::from_triplets(Shape::new(2, 2), entries, StorageType::Sparse).unwrap();
        assert!(d.is_dense());
        assert_eq!(d, s.to_dense());
    }

    #[test]
    fn test_zero_size_shape_rejected() {
        let empty = Err(MError::EmptyOrRaggedInput(InputErrorKind::Empty));
        let none: Vec<(usize, usize, f64)> = vec![];
        assert_eq!(MatrixData::from_triplets(Shape::new(2, 0), none, StorageType::Dense), empty);
        assert_eq!(MatrixData::<f64>::zeros(Shape::new(0, 0), StorageType::Sparse), empty);
        assert!(MatrixData::<f64>::zeros(Shape::new(1, 1), StorageType::Sparse).is_ok());
    }

    #[test]
    fn test_f32_store() {
        let d: MatrixData<f32> = dense![[1.0, 0.0], [0.0, 2.0]];
        assert_eq!(d.sum(), 3.0f32);
        assert_eq!(d.to_sparse().nnz(), 2);
    }
}
