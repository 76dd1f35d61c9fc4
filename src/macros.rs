/// Dense SI store from row literals.
///
/// # Panics
///
/// Panics when the rows are ragged.
#[macro_export]
macro_rules! dense {
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {{
        $crate::MatrixData::from_si_rows(&[$(vec![$($x,)*],)*], $crate::StorageType::Dense)
            .expect("dense! rows must be rectangular")
    }};
}

/// Sparse SI store from row literals; zero cells are not stored.
///
/// # Panics
///
/// Panics when the rows are ragged.
#[macro_export]
macro_rules! sparse {
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {{
        $crate::MatrixData::from_si_rows(&[$(vec![$($x,)*],)*], $crate::StorageType::Sparse)
            .expect("sparse! rows must be rectangular")
    }};
}
