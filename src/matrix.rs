use crate::cow::{CowData, CowState};
use crate::element::Element;
use crate::error::{MError, MResult};
use crate::quantity;
use crate::scalar::{RelScalar, Scalar};
use crate::shape::{check_rectangular, Shape};
use crate::unit::{Abs, Absolute, KindOf, Quantity, Rel, Relative, SiDimensions, Unit};
use crate::{MatrixData, StorageType};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Read access shared by immutable and mutable typed matrices.
///
/// Values live in the store in SI units; the display unit only matters when
/// values enter or leave in another unit.
pub trait MatrixValue {
    type Quantity: Quantity;
    type Kind: KindOf<Self::Quantity>;
    type Elem: Element;

    fn data(&self) -> &MatrixData<Self::Elem>;

    fn unit(&self) -> Unit<Self::Quantity>;

    fn shape(&self) -> Shape {
        self.data().shape()
    }

    fn rows(&self) -> usize {
        self.data().rows()
    }

    fn cols(&self) -> usize {
        self.data().cols()
    }

    fn storage_type(&self) -> StorageType {
        self.data().storage_type()
    }

    fn get_si(&self, row: usize, col: usize) -> MResult<Self::Elem> {
        self.shape().check_index(row, col)?;
        Ok(self.data().get(row, col))
    }

    fn get(&self, row: usize, col: usize) -> MResult<Scalar<Self::Quantity, Self::Kind>> {
        let si = self.get_si(row, col)?;
        Ok(Scalar::from_si(si.as_f64(), self.unit()))
    }

    fn get_in_unit(&self, row: usize, col: usize, unit: Unit<Self::Quantity>) -> MResult<f64> {
        let si = self.get_si(row, col)?;
        Ok(unit.from_standard_unit(si.as_f64()))
    }

    fn row_si(&self, row: usize) -> MResult<Vec<Self::Elem>> {
        self.data().row(row)
    }

    fn column_si(&self, col: usize) -> MResult<Vec<Self::Elem>> {
        self.data().column(col)
    }

    fn diagonal_si(&self) -> MResult<Vec<Self::Elem>> {
        self.data().diagonal()
    }

    fn values_si(&self) -> Vec<Vec<Self::Elem>> {
        self.data().to_rows()
    }

    fn values_in_unit(&self, unit: Unit<Self::Quantity>) -> Vec<Vec<f64>> {
        self.data()
            .to_rows()
            .into_iter()
            .map(|r| {
                r.into_iter()
                    .map(|v| unit.from_standard_unit(v.as_f64()))
                    .collect()
            })
            .collect()
    }

    fn cardinality(&self) -> usize {
        self.data().cardinality()
    }

    /// Sum of all cells, in SI units.
    fn sum(&self) -> Self::Elem {
        self.data().sum()
    }

    /// Determinant of the SI values. Fails with `NotSquare` unless the matrix
    /// is square.
    fn determinant(&self) -> MResult<f64> {
        self.data().determinant()
    }
}

fn scalar_rows_unit<Q, K, R>(values: &[R]) -> MResult<Unit<Q>>
where
    Q: Quantity,
    K: KindOf<Q>,
    R: AsRef<[Scalar<Q, K>]>,
{
    check_rectangular(values)?;
    values
        .first()
        .and_then(|r| r.as_ref().first())
        .map(|s| s.unit())
        .ok_or_else(|| MError::from("scalar rows hold no values"))
}

/// Immutable matrix of quantity `Q`. Cloning shares the store.
pub struct Matrix<Q, K, T = f64> {
    data: Arc<MatrixData<T>>,
    unit: Unit<Q>,
    _kind: PhantomData<K>,
}

pub type AbsMatrix<Q, T = f64> = Matrix<Q, Abs, T>;
pub type RelMatrix<Q, T = f64> = Matrix<Q, Rel, T>;

impl<Q: Quantity, K: KindOf<Q>, T: Element> Matrix<Q, K, T> {
    /// Rows of values expressed in `unit`.
    pub fn new<R>(values: &[R], unit: Unit<Q>, storage: StorageType) -> MResult<Self>
    where
        R: AsRef<[f64]> + Sync,
    {
        let scale = unit.scale();
        let data = MatrixData::instantiate(
            values,
            move |v: f64| T::from_f64(scale.to_standard_unit(v)),
            storage,
        )?;
        Ok(Self::from_data(data, unit))
    }

    /// Rows of typed scalars. The display unit is taken from the first one.
    pub fn from_scalars<R>(values: &[R], storage: StorageType) -> MResult<Self>
    where
        R: AsRef<[Scalar<Q, K>]> + Sync,
    {
        let unit = scalar_rows_unit(values)?;
        let data = MatrixData::instantiate(
            values,
            |s: Scalar<Q, K>| T::from_f64(s.si_value()),
            storage,
        )?;
        Ok(Self::from_data(data, unit))
    }

    /// `(row, col, scalar)` entries on a matrix of `shape`; other cells are zero.
    pub fn from_triplets<I>(
        shape: Shape,
        entries: I,
        unit: Unit<Q>,
        storage: StorageType,
    ) -> MResult<Self>
    where
        I: IntoIterator<Item = (usize, usize, Scalar<Q, K>)>,
    {
        let entries = entries
            .into_iter()
            .map(|(r, c, s)| (r, c, T::from_f64(s.si_value())));
        let data = MatrixData::from_triplets(shape, entries, storage)?;
        Ok(Self::from_data(data, unit))
    }

    pub fn from_data(data: MatrixData<T>, unit: Unit<Q>) -> Self {
        Self::from_arc(Arc::new(data), unit)
    }

    fn from_arc(data: Arc<MatrixData<T>>, unit: Unit<Q>) -> Self {
        Matrix {
            data,
            unit,
            _kind: PhantomData,
        }
    }

    pub fn to_dense(&self) -> Self {
        Self::from_data(self.data.to_dense(), self.unit)
    }

    pub fn to_sparse(&self) -> Self {
        Self::from_data(self.data.to_sparse(), self.unit)
    }

    /// Deep copy with its own store.
    pub fn copy(&self) -> Self {
        Self::from_data(self.data.copy(), self.unit)
    }

    /// Same store, shown in another unit.
    pub fn with_unit(&self, unit: Unit<Q>) -> Self {
        Self::from_arc(Arc::clone(&self.data), unit)
    }

    /// Mutable matrix sharing this store until either side writes.
    pub fn mutable(&self) -> MutableMatrix<Q, K, T> {
        MutableMatrix::from_cow(CowData::from_arc(Arc::clone(&self.data)), self.unit)
    }

    /// Mutable matrix taking over this store. Owned when nothing else shares it.
    pub fn into_mutable(self) -> MutableMatrix<Q, K, T> {
        MutableMatrix::from_cow(CowData::from_arc(self.data), self.unit)
    }
}

impl<Q: Quantity, K: KindOf<Q>, T: Element> MatrixValue for Matrix<Q, K, T> {
    type Quantity = Q;
    type Kind = K;
    type Elem = T;

    fn data(&self) -> &MatrixData<T> {
        &self.data
    }

    fn unit(&self) -> Unit<Q> {
        self.unit
    }
}

impl<Q, K, T> Clone for Matrix<Q, K, T> {
    fn clone(&self) -> Self {
        Matrix {
            data: Arc::clone(&self.data),
            unit: self.unit,
            _kind: PhantomData,
        }
    }
}

/// Mutable matrix of quantity `Q`, writing through a copy-on-write store.
pub struct MutableMatrix<Q, K, T = f64> {
    data: CowData<T>,
    unit: Unit<Q>,
    _kind: PhantomData<K>,
}

pub type MutableAbsMatrix<Q, T = f64> = MutableMatrix<Q, Abs, T>;
pub type MutableRelMatrix<Q, T = f64> = MutableMatrix<Q, Rel, T>;

impl<Q: Quantity, K: KindOf<Q>, T: Element> MutableMatrix<Q, K, T> {
    pub fn new<R>(values: &[R], unit: Unit<Q>, storage: StorageType) -> MResult<Self>
    where
        R: AsRef<[f64]> + Sync,
    {
        Matrix::new(values, unit, storage).map(Matrix::into_mutable)
    }

    pub fn from_scalars<R>(values: &[R], storage: StorageType) -> MResult<Self>
    where
        R: AsRef<[Scalar<Q, K>]> + Sync,
    {
        Matrix::from_scalars(values, storage).map(Matrix::into_mutable)
    }

    pub fn from_triplets<I>(
        shape: Shape,
        entries: I,
        unit: Unit<Q>,
        storage: StorageType,
    ) -> MResult<Self>
    where
        I: IntoIterator<Item = (usize, usize, Scalar<Q, K>)>,
    {
        Matrix::from_triplets(shape, entries, unit, storage).map(Matrix::into_mutable)
    }

    pub fn from_data(data: MatrixData<T>, unit: Unit<Q>) -> Self {
        Self::from_cow(CowData::new(data), unit)
    }

    fn from_cow(data: CowData<T>, unit: Unit<Q>) -> Self {
        MutableMatrix {
            data,
            unit,
            _kind: PhantomData,
        }
    }

    pub fn copy_on_write_state(&self) -> CowState {
        self.data.state()
    }

    /// Immutable view on the current store. Later writes here privatize first,
    /// so the view never changes.
    pub fn immutable(&self) -> Matrix<Q, K, T> {
        Matrix::from_arc(self.data.share(), self.unit)
    }

    /// Another mutable matrix sharing this store until either side writes.
    pub fn mutable(&self) -> MutableMatrix<Q, K, T> {
        Self::from_cow(self.data.clone(), self.unit)
    }

    pub fn copy(&self) -> Self {
        Self::from_data(self.data.data().copy(), self.unit)
    }

    pub fn to_dense(&self) -> Self {
        Self::from_data(self.data.data().to_dense(), self.unit)
    }

    pub fn to_sparse(&self) -> Self {
        Self::from_data(self.data.data().to_sparse(), self.unit)
    }

    pub fn set_display_unit(&mut self, unit: Unit<Q>) {
        self.unit = unit;
    }

    pub fn set_si(&mut self, row: usize, col: usize, value: T) -> MResult<()> {
        self.shape().check_index(row, col)?;
        self.data.make_mut().set(row, col, value);
        Ok(())
    }

    pub fn set(&mut self, row: usize, col: usize, value: Scalar<Q, K>) -> MResult<()> {
        self.set_si(row, col, T::from_f64(value.si_value()))
    }

    pub fn set_in_unit(&mut self, row: usize, col: usize, value: f64, unit: Unit<Q>) -> MResult<()> {
        self.set_si(row, col, T::from_f64(unit.to_standard_unit(value)))
    }

    /// Apply `f` to every SI cell, implicit zeros included.
    pub fn assign<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(T) -> T + Sync + Send,
    {
        self.data.make_mut().apply(f);
        self
    }

    pub fn abs(&mut self) -> &mut Self {
        self.assign(|v| v.abs())
    }

    pub fn ceil(&mut self) -> &mut Self {
        self.assign(|v| v.ceil())
    }

    pub fn floor(&mut self) -> &mut Self {
        self.assign(|v| v.floor())
    }

    pub fn neg(&mut self) -> &mut Self {
        self.assign(|v| -v)
    }

    pub fn round(&mut self) -> &mut Self {
        self.assign(|v| v.round())
    }

    /// Rounds half-way values to the nearest even integer.
    pub fn rint(&mut self) -> &mut Self {
        self.assign(|v| v.rint())
    }

    /// Scales stored values; implicit zeros of a sparse store stay zero.
    pub fn multiply_by_scalar(&mut self, factor: T) -> &mut Self {
        self.data.make_mut().multiply_by_scalar(factor);
        self
    }

    pub fn divide_by_scalar(&mut self, divisor: T) -> &mut Self {
        self.data.make_mut().divide_by_scalar(divisor);
        self
    }

    /// Scales the values so that they sum to one.
    pub fn normalize(&mut self) -> MResult<&mut Self> {
        if self.sum().is_zero() {
            return Err(MError::DegenerateNormalization);
        }
        self.data.make_mut().normalize()?;
        Ok(self)
    }

    /// Shape is checked before the store is privatized, so a failed call leaves
    /// sharing untouched.
    fn mutate_with<F>(&mut self, other: &MatrixData<T>, op: &'static str, f: F) -> MResult<()>
    where
        F: FnOnce(&mut MatrixData<T>, &MatrixData<T>) -> MResult<()>,
    {
        self.shape().ensure_same(&other.shape(), op)?;
        f(self.data.make_mut(), other)
    }
}

impl<Q: Quantity, K: KindOf<Q>, T: Element> MatrixValue for MutableMatrix<Q, K, T> {
    type Quantity = Q;
    type Kind = K;
    type Elem = T;

    fn data(&self) -> &MatrixData<T> {
        self.data.data()
    }

    fn unit(&self) -> Unit<Q> {
        self.unit
    }
}

impl<Q: Relative, T: Element> MutableMatrix<Q, Rel, T> {
    pub fn increment_by<M>(&mut self, other: &M) -> MResult<&mut Self>
    where
        M: MatrixValue<Quantity = Q, Kind = Rel, Elem = T>,
    {
        self.mutate_with(other.data(), "increment_by", |d, o| d.increment_by(o))?;
        Ok(self)
    }

    pub fn decrement_by<M>(&mut self, other: &M) -> MResult<&mut Self>
    where
        M: MatrixValue<Quantity = Q, Kind = Rel, Elem = T>,
    {
        self.mutate_with(other.data(), "decrement_by", |d, o| d.decrement_by(o))?;
        Ok(self)
    }

    /// Cell-wise product with factors held in the same quantity, keeping this
    /// matrix's quantity and layout.
    pub fn multiply_by<M>(&mut self, other: &M) -> MResult<&mut Self>
    where
        M: MatrixValue<Quantity = Q, Kind = Rel, Elem = T>,
    {
        self.mutate_with(other.data(), "multiply_by", |d, o| d.multiply_by(o))?;
        Ok(self)
    }

    pub fn divide_by<M>(&mut self, other: &M) -> MResult<&mut Self>
    where
        M: MatrixValue<Quantity = Q, Kind = Rel, Elem = T>,
    {
        self.mutate_with(other.data(), "divide_by", |d, o| d.divide_by(o))?;
        Ok(self)
    }

    /// Adds to stored values only; implicit zeros of a sparse store stay zero.
    pub fn increment_by_scalar(&mut self, value: RelScalar<Q>) -> &mut Self {
        self.data
            .make_mut()
            .increment_by_scalar(T::from_f64(value.si_value()));
        self
    }

    pub fn decrement_by_scalar(&mut self, value: RelScalar<Q>) -> &mut Self {
        self.data
            .make_mut()
            .decrement_by_scalar(T::from_f64(value.si_value()));
        self
    }

}

impl<Q: Absolute, T: Element> MutableMatrix<Q, Abs, T> {
    pub fn increment_by<M>(&mut self, other: &M) -> MResult<&mut Self>
    where
        M: MatrixValue<Quantity = Q::Rel, Kind = Rel, Elem = T>,
    {
        self.mutate_with(other.data(), "increment_by", |d, o| d.increment_by(o))?;
        Ok(self)
    }

    pub fn decrement_by<M>(&mut self, other: &M) -> MResult<&mut Self>
    where
        M: MatrixValue<Quantity = Q::Rel, Kind = Rel, Elem = T>,
    {
        self.mutate_with(other.data(), "decrement_by", |d, o| d.decrement_by(o))?;
        Ok(self)
    }

    /// Cell-wise product with factors of the relative quantity, keeping the
    /// points absolute.
    pub fn multiply_by<M>(&mut self, other: &M) -> MResult<&mut Self>
    where
        M: MatrixValue<Quantity = Q::Rel, Kind = Rel, Elem = T>,
    {
        self.mutate_with(other.data(), "multiply_by", |d, o| d.multiply_by(o))?;
        Ok(self)
    }

    pub fn increment_by_scalar(&mut self, value: RelScalar<Q::Rel>) -> &mut Self {
        self.data
            .make_mut()
            .increment_by_scalar(T::from_f64(value.si_value()));
        self
    }

    pub fn decrement_by_scalar(&mut self, value: RelScalar<Q::Rel>) -> &mut Self {
        self.data
            .make_mut()
            .decrement_by_scalar(T::from_f64(value.si_value()));
        self
    }
}

/// Right-hand side of `minus` on an absolute matrix. A relative operand
/// moves the points and keeps them absolute; an absolute operand yields the
/// relative distance between them.
pub trait AbsSubtrahend<Q: Absolute, T: Element> {
    type Output;

    fn subtract_from(&self, minuend: &MatrixData<T>, unit: Unit<Q>) -> MResult<Self::Output>;
}

/// Product or quotient of relative matrices, tagged only with SI dimensions.
pub struct SiMatrix<T = f64> {
    data: MatrixData<T>,
    dimensions: SiDimensions,
}

impl<T: Element> SiMatrix<T> {
    pub fn new(data: MatrixData<T>, dimensions: SiDimensions) -> SiMatrix<T> {
        SiMatrix { data, dimensions }
    }

    pub fn data(&self) -> &MatrixData<T> {
        &self.data
    }

    pub fn dimensions(&self) -> SiDimensions {
        self.dimensions
    }

    pub fn get_si(&self, row: usize, col: usize) -> MResult<T> {
        self.data.shape().check_index(row, col)?;
        Ok(self.data.get(row, col))
    }

    /// Name of the registered quantity with these dimensions, or `"SI"`.
    pub fn quantity_name(&self) -> &'static str {
        quantity::lookup(&self.dimensions).map_or("SI", |i| i.name)
    }

    pub fn into_quantity<Q: Relative>(self) -> MResult<RelMatrix<Q, T>> {
        if Q::DIMENSIONS != self.dimensions {
            return Err(MError::DimensionMismatch {
                expected: Q::DIMENSIONS,
                got: self.dimensions,
            });
        }
        Ok(Matrix::from_data(self.data, Q::si_unit()))
    }
}

impl<T: Element> Clone for SiMatrix<T> {
    fn clone(&self) -> Self {
        SiMatrix::new(self.data.clone(), self.dimensions)
    }
}

impl<T: Element> PartialEq for SiMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions && self.data == other.data
    }
}

impl<T: Element> fmt::Debug for SiMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiMatrix")
            .field("dimensions", &self.dimensions.to_string())
            .field("data", &self.data)
            .finish()
    }
}

macro_rules! impl_typed_matrix {
    ($t:ident) => {
        impl<Q: Relative, T: Element> $t<Q, Rel, T> {
            pub fn plus<M>(&self, other: &M) -> MResult<RelMatrix<Q, T>>
            where
                M: MatrixValue<Quantity = Q, Kind = Rel, Elem = T>,
            {
                Ok(Matrix::from_data(self.data().plus(other.data())?, self.unit))
            }

            pub fn minus<M>(&self, other: &M) -> MResult<RelMatrix<Q, T>>
            where
                M: MatrixValue<Quantity = Q, Kind = Rel, Elem = T>,
            {
                Ok(Matrix::from_data(self.data().minus(other.data())?, self.unit))
            }

            pub fn times<M>(&self, other: &M) -> MResult<SiMatrix<T>>
            where
                M: MatrixValue<Kind = Rel, Elem = T>,
                M::Quantity: Relative,
            {
                let dims = Q::DIMENSIONS.plus(&<M::Quantity as Quantity>::DIMENSIONS);
                Ok(SiMatrix::new(self.data().times(other.data())?, dims))
            }

            pub fn divide<M>(&self, other: &M) -> MResult<SiMatrix<T>>
            where
                M: MatrixValue<Kind = Rel, Elem = T>,
                M::Quantity: Relative,
            {
                let dims = Q::DIMENSIONS.minus(&<M::Quantity as Quantity>::DIMENSIONS);
                Ok(SiMatrix::new(self.data().divide(other.data())?, dims))
            }

            /// Scales every cell, keeping quantity and unit.
            pub fn times_scalar(&self, factor: T) -> RelMatrix<Q, T> {
                let mut data = self.data().copy();
                data.multiply_by_scalar(factor);
                Matrix::from_data(data, self.unit)
            }

            pub fn divide_scalar(&self, divisor: T) -> RelMatrix<Q, T> {
                let mut data = self.data().copy();
                data.divide_by_scalar(divisor);
                Matrix::from_data(data, self.unit)
            }
        }

        impl<Q: Absolute, T: Element> $t<Q, Abs, T> {
            pub fn plus<M>(&self, other: &M) -> MResult<AbsMatrix<Q, T>>
            where
                M: MatrixValue<Quantity = Q::Rel, Kind = Rel, Elem = T>,
            {
                Ok(Matrix::from_data(self.data().plus(other.data())?, self.unit))
            }

            /// `abs - rel` gives an absolute matrix, `abs - abs` a relative one.
            pub fn minus<S>(&self, other: &S) -> MResult<S::Output>
            where
                S: AbsSubtrahend<Q, T>,
            {
                other.subtract_from(self.data(), self.unit)
            }
        }

        impl<Q: Absolute, T: Element> AbsSubtrahend<Q, T> for $t<Q::Rel, Rel, T> {
            type Output = AbsMatrix<Q, T>;

            fn subtract_from(&self, minuend: &MatrixData<T>, unit: Unit<Q>) -> MResult<AbsMatrix<Q, T>> {
                Ok(Matrix::from_data(minuend.minus(self.data())?, unit))
            }
        }

        impl<Q: Absolute, T: Element> AbsSubtrahend<Q, T> for $t<Q, Abs, T> {
            type Output = RelMatrix<Q::Rel, T>;

            fn subtract_from(
                &self,
                minuend: &MatrixData<T>,
                _unit: Unit<Q>,
            ) -> MResult<RelMatrix<Q::Rel, T>> {
                let unit = <Q::Rel as Quantity>::si_unit();
                Ok(Matrix::from_data(minuend.minus(self.data())?, unit))
            }
        }

        /// Equal when the SI stores are equal; the display unit is ignored.
        impl<Q: Quantity, K: KindOf<Q>, T: Element> PartialEq for $t<Q, K, T> {
            fn eq(&self, other: &Self) -> bool {
                self.data() == other.data()
            }
        }

        impl<Q: Quantity, K: KindOf<Q>, T: Element> Hash for $t<Q, K, T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.data().hash(state);
            }
        }

        impl<Q: Quantity, K: KindOf<Q>, T: Element> fmt::Debug for $t<Q, K, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($t))
                    .field("quantity", &Q::NAME)
                    .field("absolute", &K::ABSOLUTE)
                    .field("unit", &self.unit)
                    .field("data", self.data())
                    .finish()
            }
        }
    };
}

impl_typed_matrix!(Matrix);
impl_typed_matrix!(MutableMatrix);
