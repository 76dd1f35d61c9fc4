//! Unit-tagged matrices over a dense or sparse SI store.
//!
//! Typed matrices ([`Matrix`], [`MutableMatrix`]) carry a quantity, an
//! absolute or relative kind, and a display unit. Values are kept in SI units
//! in a [`MatrixData`] store; mutable matrices share that store with their
//! sources until the first write.

mod macros;
mod config;
mod cow;
mod data;
mod dense;
mod element;
mod error;
mod linalg;
mod matrix;
mod op;
pub mod quantity;
mod scalar;
mod shape;
mod sparse;
mod unit;
mod zip;

pub use crate::config::{config, Config, PARALLEL_THRESHOLD_ENV};
pub use crate::cow::{CowData, CowState};
pub use crate::data::{MatrixData, StorageType};
pub use crate::dense::DenseData;
pub use crate::element::Element;
pub use crate::error::{InputErrorKind, MError, MResult};
pub use crate::matrix::{
    AbsMatrix, AbsSubtrahend, Matrix, MatrixValue, MutableAbsMatrix, MutableMatrix,
    MutableRelMatrix, RelMatrix, SiMatrix,
};
pub use crate::scalar::{AbsScalar, RelScalar, Scalar, SiScalar};
pub use crate::shape::{check_rectangular, Shape};
pub use crate::sparse::SparseData;
pub use crate::unit::{
    Abs, Absolute, Kind, KindOf, Quantity, Rel, Relative, Scale, SiDimensions, Unit,
};
pub use crate::zip::CellZip;
