use crate::element::Element;
use crate::MatrixData;

/// Walks the full logical domain of two same-shape stores in increasing
/// linear-index order, yielding `(index, left, right)`.
pub struct CellZip<'a, T> {
    a: &'a MatrixData<T>,
    b: &'a MatrixData<T>,
    pos: usize,
    end: usize,
}

impl<'a, T: Element> CellZip<'a, T> {
    pub fn new(a: &'a MatrixData<T>, b: &'a MatrixData<T>) -> CellZip<'a, T> {
        debug_assert_eq!(a.shape(), b.shape());
        Self {
            a,
            b,
            pos: 0,
            end: a.shape().elem_count(),
        }
    }
}

impl<'a, T: Element> Iterator for CellZip<'a, T> {
    type Item = (usize, T, T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let i = self.pos;
        self.pos += 1;
        Some((i, self.a.get_linear(i), self.b.get_linear(i)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.pos;
        (n, Some(n))
    }
}

impl<'a, T: Element> ExactSizeIterator for CellZip<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dense, sparse};

    #[test]
    fn test_zip_mixed_layouts() {
        let a = dense![[1.0, 0.0], [0.0, 2.0]];
        let b = sparse![[0.0, 5.0], [0.0, 0.0]];
        let cells: Vec<_> = CellZip::new(&a, &b).collect();
        assert_eq!(
            cells,
            vec![(0, 1.0, 0.0), (1, 0.0, 5.0), (2, 0.0, 0.0), (3, 2.0, 0.0)]
        );
    }

    #[test]
    fn test_exact_size() {
        let a = dense![[1.0, 2.0, 3.0]];
        let b = sparse![[4.0, 0.0, 6.0]];
        let mut zip = CellZip::new(&a, &b);
        assert_eq!(zip.len(), 3);
        zip.next();
        assert_eq!(zip.len(), 2);
        let dot: f64 = zip.map(|(_, x, y)| x * y).sum();
        assert_eq!(dot, 18.0);
    }
}
