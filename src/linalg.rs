use crate::element::Element;
use crate::error::MResult;
use crate::MatrixData;

/// LU decomposition with partial pivoting, in place on a row-major `n x n`
/// buffer.
///
/// On return `a` holds U on and above the diagonal and the multipliers of L
/// below it. Returns `Some(true)` when the number of row swaps is even, or
/// `None` when a pivot column is all zero.
pub(crate) fn lu_in_place(a: &mut [f64], n: usize, perm: &mut [usize]) -> Option<bool> {
    debug_assert_eq!(a.len(), n * n);
    debug_assert_eq!(perm.len(), n);
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let mut even = true;
    for col in 0..n {
        let mut max_row = col;
        let mut max_val = a[col * n + col].abs();
        for row in (col + 1)..n {
            let val = a[row * n + col].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }
        if max_val == 0.0 {
            return None;
        }

        if max_row != col {
            perm.swap(col, max_row);
            for j in 0..n {
                a.swap(col * n + j, max_row * n + j);
            }
            even = !even;
        }

        let inv_pivot = 1.0 / a[col * n + col];
        for row in (col + 1)..n {
            let factor = a[row * n + col] * inv_pivot;
            a[row * n + col] = factor;
            for j in (col + 1)..n {
                a[row * n + j] -= factor * a[col * n + j];
            }
        }
    }
    Some(even)
}

impl<T: Element> MatrixData<T> {
    /// Determinant of the SI values, computed in `f64` from an LU
    /// decomposition of a dense copy. A singular matrix gives exactly zero.
    pub fn determinant(&self) -> MResult<f64> {
        let shape = self.shape();
        shape.check_square()?;
        let n = shape.rows();
        let mut a: Vec<f64> = (0..shape.elem_count())
            .map(|i| self.get_linear(i).as_f64())
            .collect();
        let mut perm = vec![0; n];
        Ok(match lu_in_place(&mut a, n, &mut perm) {
            None => 0.0,
            Some(even) => {
                let det = (0..n).fold(1.0, |acc, i| acc * a[i * n + i]);
                if even {
                    det
                } else {
                    -det
                }
            }
        })
    }
}
