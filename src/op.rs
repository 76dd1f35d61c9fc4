use crate::config::use_parallel;
use crate::dense::DenseData;
use crate::element::Element;
use crate::error::{MError, MResult};
use crate::MatrixData;
use rayon::prelude::*;

/// Layout of the store produced by a binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayoutRule {
    /// Sparse only when both operands are sparse.
    SparseIfBothSparse,
    /// Dense only when both operands are dense.
    DenseIfBothDense,
}

pub(crate) trait Map2: Sync {
    const OP: &'static str;
    const LAYOUT: LayoutRule;
    fn f<T: Element>(&self, a: T, b: T) -> T;
}

struct Plus;

impl Map2 for Plus {
    const OP: &'static str = "plus";
    const LAYOUT: LayoutRule = LayoutRule::SparseIfBothSparse;
    #[inline]
    fn f<T: Element>(&self, a: T, b: T) -> T {
        a + b
    }
}

struct Minus;

impl Map2 for Minus {
    const OP: &'static str = "minus";
    const LAYOUT: LayoutRule = LayoutRule::SparseIfBothSparse;
    #[inline]
    fn f<T: Element>(&self, a: T, b: T) -> T {
        a - b
    }
}

struct Times;

impl Map2 for Times {
    const OP: &'static str = "times";
    const LAYOUT: LayoutRule = LayoutRule::DenseIfBothDense;
    #[inline]
    fn f<T: Element>(&self, a: T, b: T) -> T {
        a * b
    }
}

struct Divide;

impl Map2 for Divide {
    const OP: &'static str = "divide";
    const LAYOUT: LayoutRule = LayoutRule::DenseIfBothDense;
    #[inline]
    fn f<T: Element>(&self, a: T, b: T) -> T {
        a / b
    }
}

fn map_cells<T, O>(left: &MatrixData<T>, right: &MatrixData<T>, op: &O) -> Vec<T>
where
    T: Element,
    O: Map2,
{
    let n = left.shape().elem_count();
    if use_parallel(n) {
        (0..n)
            .into_par_iter()
            .map(|i| op.f(left.get_linear(i), right.get_linear(i)))
            .collect()
    } else {
        (0..n)
            .map(|i| op.f(left.get_linear(i), right.get_linear(i)))
            .collect()
    }
}

impl<T: Element> MatrixData<T> {
    fn binary<O: Map2>(&self, right: &MatrixData<T>, op: O) -> MResult<MatrixData<T>> {
        self.shape().ensure_same(&right.shape(), O::OP)?;
        let shape = self.shape();
        let cells = DenseData::from_vec_unchecked(map_cells(self, right, &op), shape);
        let sparse = match O::LAYOUT {
            LayoutRule::SparseIfBothSparse => self.is_sparse() && right.is_sparse(),
            LayoutRule::DenseIfBothDense => !(self.is_dense() && right.is_dense()),
        };
        Ok(if sparse {
            MatrixData::Sparse(cells.to_sparse())
        } else {
            MatrixData::Dense(cells)
        })
    }

    /// Cell-wise sum. Sparse only when both operands are sparse.
    pub fn plus(&self, right: &MatrixData<T>) -> MResult<MatrixData<T>> {
        self.binary(right, Plus)
    }

    /// Cell-wise difference. Sparse only when both operands are sparse.
    pub fn minus(&self, right: &MatrixData<T>) -> MResult<MatrixData<T>> {
        self.binary(right, Minus)
    }

    /// Cell-wise product. Dense only when both operands are dense.
    pub fn times(&self, right: &MatrixData<T>) -> MResult<MatrixData<T>> {
        self.binary(right, Times)
    }

    /// Cell-wise quotient. Dense only when both operands are dense. Zero
    /// divisors yield infinities or NaN.
    pub fn divide(&self, right: &MatrixData<T>) -> MResult<MatrixData<T>> {
        self.binary(right, Divide)
    }

    fn assign_binary<O: Map2>(&mut self, right: &MatrixData<T>, op: O) -> MResult<()> {
        self.shape().ensure_same(&right.shape(), O::OP)?;
        match self {
            MatrixData::Dense(d) => {
                let values = d.as_mut_slice();
                if use_parallel(values.len()) {
                    values
                        .par_iter_mut()
                        .enumerate()
                        .for_each(|(i, v)| *v = op.f(*v, right.get_linear(i)));
                } else {
                    values
                        .iter_mut()
                        .enumerate()
                        .for_each(|(i, v)| *v = op.f(*v, right.get_linear(i)));
                }
            }
            MatrixData::Sparse(s) => s.rebuild(right, |a, b| op.f(a, b)),
        }
        Ok(())
    }

    /// Add `right` cell by cell, keeping this store's layout.
    pub fn increment_by(&mut self, right: &MatrixData<T>) -> MResult<()> {
        self.assign_binary(right, Plus)
    }

    pub fn decrement_by(&mut self, right: &MatrixData<T>) -> MResult<()> {
        self.assign_binary(right, Minus)
    }

    pub fn multiply_by(&mut self, right: &MatrixData<T>) -> MResult<()> {
        self.assign_binary(right, Times)
    }

    pub fn divide_by(&mut self, right: &MatrixData<T>) -> MResult<()> {
        self.assign_binary(right, Divide)
    }

    /// Map stored values only. A sparse store keeps its implicit zeros as they
    /// are, and stored values that become zero stay stored.
    fn assign_scalar<O: Map2>(&mut self, value: T, op: O) {
        match self {
            MatrixData::Dense(d) => d.apply(|v| op.f(v, value)),
            MatrixData::Sparse(s) => s.map_stored(|v| op.f(v, value)),
        }
    }

    pub fn increment_by_scalar(&mut self, value: T) {
        self.assign_scalar(value, Plus)
    }

    pub fn decrement_by_scalar(&mut self, value: T) {
        self.assign_scalar(value, Minus)
    }

    pub fn multiply_by_scalar(&mut self, value: T) {
        self.assign_scalar(value, Times)
    }

    pub fn divide_by_scalar(&mut self, value: T) {
        self.assign_scalar(value, Divide)
    }

    /// Scale so that the sum of all cells becomes 1.
    pub fn normalize(&mut self) -> MResult<()> {
        let sum = self.sum();
        if sum.is_zero() {
            return Err(MError::DegenerateNormalization);
        }
        self.divide_by_scalar(sum);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::sparse::SparseData;
    use crate::{dense, sparse, StorageType};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn sparse_parts(d: &MatrixData) -> (Vec<usize>, Vec<f64>) {
        match d {
            MatrixData::Sparse(s) => (s.indices().to_vec(), s.values().to_vec()),
            MatrixData::Dense(_) => panic!("expected sparse store"),
        }
    }

    #[test]
    fn test_layout_policy() {
        let da = dense![[1.0, 2.0], [3.0, 4.0]];
        let db = dense![[5.0, 0.0], [7.0, 8.0]];
        let sa = sparse![[1.0, 0.0], [0.0, 4.0]];
        let sb = sparse![[0.0, 2.0], [0.0, 4.0]];

        assert!(da.plus(&db).unwrap().is_dense());
        assert!(sa.plus(&sb).unwrap().is_sparse());
        assert!(sa.plus(&db).unwrap().is_dense());
        assert!(da.minus(&sb).unwrap().is_dense());
        assert!(sa.minus(&sb).unwrap().is_sparse());

        assert!(da.times(&db).unwrap().is_dense());
        assert!(sa.times(&db).unwrap().is_sparse());
        assert!(da.times(&sb).unwrap().is_sparse());
        assert!(sa.divide(&sb).unwrap().is_sparse());
        assert!(da.divide(&db).unwrap().is_dense());
    }

    #[test]
    fn test_plus_scenario() {
        let a = dense![[1.0, 0.0], [0.0, 2.0]].to_sparse();
        let b = MatrixData::Sparse(
            SparseData::from_parts(Shape::new(2, 2), vec![1], vec![5.0]).unwrap(),
        );
        let c = a.plus(&b).unwrap();
        assert_eq!(sparse_parts(&c), (vec![0, 1, 3], vec![1.0, 5.0, 2.0]));

        let dense_sum = a.to_dense().plus(&b).unwrap();
        assert!(dense_sum.is_dense());
        assert_eq!(dense_sum.to_rows(), vec![vec![1.0, 5.0], vec![0.0, 2.0]]);
    }

    #[test]
    fn test_shape_mismatch_before_compute() {
        let a = dense![[1.0, 2.0]];
        let b = dense![[1.0], [2.0]];
        match a.plus(&b) {
            Err(MError::ShapeMismatch { op, left, right }) => {
                assert_eq!(op, "plus");
                assert_eq!(left, Shape::new(1, 2));
                assert_eq!(right, Shape::new(2, 1));
            }
            other => panic!("unexpected {:?}", other),
        }
        let mut m = a.clone();
        assert!(m.increment_by(&b).is_err());
        assert_eq!(m, a);
    }

    #[test]
    fn test_divide_by_zero_propagates() {
        let a = dense![[1.0, -1.0, 0.0]];
        let b = dense![[0.0, 0.0, 0.0]];
        let c = a.divide(&b).unwrap();
        assert_eq!(c.get(0, 0), f64::INFINITY);
        assert_eq!(c.get(0, 1), f64::NEG_INFINITY);
        assert!(c.get(0, 2).is_nan());
    }

    #[test]
    fn test_in_place_keeps_receiver_layout() {
        let mut d = dense![[1.0, 0.0], [0.0, 2.0]];
        d.increment_by(&sparse![[0.0, 3.0], [0.0, 0.0]]).unwrap();
        assert!(d.is_dense());
        assert_eq!(d.to_rows(), vec![vec![1.0, 3.0], vec![0.0, 2.0]]);

        let mut s = sparse![[1.0, 0.0], [0.0, 2.0]];
        s.increment_by(&dense![[0.0, 3.0], [4.0, -2.0]]).unwrap();
        assert!(s.is_sparse());
        assert_eq!(sparse_parts(&s), (vec![0, 1, 2], vec![1.0, 3.0, 4.0]));

        s.multiply_by(&dense![[2.0, 0.0], [1.0, 1.0]]).unwrap();
        assert_eq!(sparse_parts(&s), (vec![0, 2], vec![2.0, 4.0]));

        s.decrement_by(&sparse![[2.0, 0.0], [0.0, 0.0]]).unwrap();
        assert_eq!(sparse_parts(&s), (vec![2], vec![4.0]));

        s.divide_by(&dense![[1.0, 1.0], [2.0, 1.0]]).unwrap();
        assert_eq!(sparse_parts(&s), (vec![2], vec![2.0]));
    }

    #[test]
    fn test_stale_zero_then_rebuild() {
        let mut s = sparse![[3.0, 0.0], [0.0, 2.0]];
        s.set(0, 0, 0.0);
        // stale read: index still present, value zero
        assert_eq!(sparse_parts(&s), (vec![0, 3], vec![0.0, 2.0]));
        assert_eq!(s.get(0, 0), 0.0);

        s.increment_by(&MatrixData::zeros(Shape::new(2, 2), StorageType::Dense).unwrap())
            .unwrap();
        assert_eq!(sparse_parts(&s), (vec![3], vec![2.0]));
    }

    #[test]
    fn test_scalar_broadcast_touches_stored_only() {
        let mut s = sparse![[1.0, 0.0], [0.0, 2.0]];
        s.increment_by_scalar(1.0);
        assert_eq!(sparse_parts(&s), (vec![0, 3], vec![2.0, 3.0]));
        assert_eq!(s.get(0, 1), 0.0);

        s.decrement_by_scalar(2.0);
        // a stored value that became zero stays stored
        assert_eq!(sparse_parts(&s), (vec![0, 3], vec![0.0, 1.0]));
        assert_eq!(s.cardinality(), 1);

        let mut d = dense![[1.0, 0.0]];
        d.increment_by_scalar(1.0);
        assert_eq!(d.to_rows(), vec![vec![2.0, 1.0]]);
        d.multiply_by_scalar(3.0);
        d.divide_by_scalar(2.0);
        assert_eq!(d.to_rows(), vec![vec![3.0, 1.5]]);
    }

    #[test]
    fn test_normalize() {
        let mut d = dense![[1.0, 3.0], [0.0, 4.0]];
        d.normalize().unwrap();
        assert_abs_diff_eq!(d.sum(), 1.0);
        assert_abs_diff_eq!(d.get(1, 1), 0.5);

        let mut z = sparse![[1.0, -1.0]];
        assert_eq!(z.normalize(), Err(MError::DegenerateNormalization));
        assert_eq!(z, sparse![[1.0, -1.0]]);
    }

    fn store(storage: StorageType) -> impl Strategy<Value = MatrixData> {
        prop::collection::vec(prop_oneof![Just(0.0), -100.0..100.0f64], 12)
            .prop_map(move |v| {
                let rows: Vec<Vec<f64>> = v.chunks(4).map(|c| c.to_vec()).collect();
                MatrixData::from_si_rows(&rows, storage).unwrap()
            })
    }

    fn any_store() -> impl Strategy<Value = MatrixData> {
        prop_oneof![store(StorageType::Dense), store(StorageType::Sparse)]
    }

    fn assert_cells_close(a: &MatrixData, b: &MatrixData) {
        assert_eq!(a.shape(), b.shape());
        for i in 0..a.shape().elem_count() {
            assert_abs_diff_eq!(a.get_linear(i), b.get_linear(i), epsilon = 1e-9);
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip(s in any_store()) {
            let via_sparse = s.to_sparse().to_dense();
            let via_dense = s.to_dense().to_sparse();
            for i in 0..s.shape().elem_count() {
                prop_assert_eq!(via_sparse.get_linear(i), s.get_linear(i));
                prop_assert_eq!(via_dense.get_linear(i), s.get_linear(i));
            }
        }

        #[test]
        fn prop_plus_commutes(a in any_store(), b in any_store()) {
            let ab = a.plus(&b).unwrap();
            let ba = b.plus(&a).unwrap();
            prop_assert_eq!(ab.storage_type(), ba.storage_type());
            assert_cells_close(&ab, &ba);
        }

        #[test]
        fn prop_plus_associates(a in any_store(), b in any_store(), c in any_store()) {
            let left = a.plus(&b).unwrap().plus(&c).unwrap();
            let right = a.plus(&b.plus(&c).unwrap()).unwrap();
            assert_cells_close(&left, &right);
        }

        #[test]
        fn prop_in_place_matches_new_result(a in any_store(), b in any_store()) {
            let mut m = a.clone();
            m.increment_by(&b).unwrap();
            prop_assert_eq!(m.storage_type(), a.storage_type());
            assert_cells_close(&m, &a.plus(&b).unwrap());
            if let MatrixData::Sparse(s) = &m {
                prop_assert!(s.values().iter().all(|v| *v != 0.0));
                prop_assert!(s.indices().windows(2).all(|w| w[0] < w[1]));
            }
        }

        #[test]
        fn prop_shape_invariant(s in any_store()) {
            match &s {
                MatrixData::Dense(d) => prop_assert_eq!(d.as_slice().len(), s.shape().elem_count()),
                MatrixData::Sparse(sp) => {
                    prop_assert_eq!(sp.indices().len(), sp.values().len());
                    prop_assert!(sp.nnz() <= s.shape().elem_count());
                }
            }
        }
    }
}
