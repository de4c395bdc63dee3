//! Iterators for partial permutations.

use super::PartPerm;
use crate::point::Point;

/// Iterator over all (point, image) pairs of a partial permutation.
///
/// This yields all pairs `(i, j)` where `i` is in the partial permutation's domain and `j` is the
/// image of `i`. The yielded pairs go through `i` in increasing order.
pub struct Iter<'a, Pt: Point> {
    dom: &'a [Pt],
    ran: &'a [Pt],
}

impl<'a, Pt: Point> Iter<'a, Pt> {
    #[inline]
    pub(super) fn new(inner: &'a PartPerm<Pt>) -> Self {
        Self {
            dom: inner.dom(),
            ran: inner.ran(),
        }
    }

    /// Returns an iterator yielding only the fixed points of the partial permutation.
    pub fn fixed(self) -> IterFixed<'a, Pt> {
        IterFixed { inner: self }
    }

    #[inline]
    fn skip(&mut self, n: usize) {
        let n = n.min(self.dom.len());
        self.dom = &self.dom[n..];
        self.ran = &self.ran[n..];
    }

    #[inline]
    fn skip_back(&mut self, n: usize) {
        let len = self.dom.len().saturating_sub(n);
        self.dom = &self.dom[..len];
        self.ran = &self.ran[..len];
    }
}

impl<'a, Pt: Point> Iterator for Iter<'a, Pt> {
    type Item = (Pt, Pt);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let ((&pt, dom), (&image, ran)) = (self.dom.split_first()?, self.ran.split_first()?);
        self.dom = dom;
        self.ran = ran;
        Some((pt, image))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.dom.len(), Some(self.dom.len()))
    }

    #[inline]
    fn count(self) -> usize
    where
        Self: Sized,
    {
        self.dom.len()
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.skip(n);
        self.next()
    }
}

impl<'a, Pt: Point> DoubleEndedIterator for Iter<'a, Pt> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let ((&pt, dom), (&image, ran)) = (self.dom.split_last()?, self.ran.split_last()?);
        self.dom = dom;
        self.ran = ran;
        Some((pt, image))
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        self.skip_back(n);
        self.next_back()
    }
}

impl<'a, Pt: Point> ExactSizeIterator for Iter<'a, Pt> {
    fn len(&self) -> usize {
        self.dom.len()
    }
}

/// Iterator over the fixed points of a partial permutation.
///
/// This yields all points `i` in the domain that are their own image, in increasing order.
pub struct IterFixed<'a, Pt: Point> {
    inner: Iter<'a, Pt>,
}

impl<'a, Pt: Point> Iterator for IterFixed<'a, Pt> {
    type Item = Pt;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (a, b) = self.inner.next()?;
            if a == b {
                return Some(a);
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.inner.len()))
    }
}

impl<'a, Pt: Point> DoubleEndedIterator for IterFixed<'a, Pt> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            let (a, b) = self.inner.next_back()?;
            if a == b {
                return Some(a);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_and_fixed_points() {
        let f = PartPerm::<u32>::from_dense(&[1, 0, 5, 4, 3]).unwrap();

        let pairs: Vec<_> = f.iter().collect();
        assert_eq!(pairs, [(1, 1), (3, 5), (4, 4), (5, 3)]);

        let mut it = f.iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.nth(1), Some((3, 5)));
        assert_eq!(it.next_back(), Some((5, 3)));
        assert_eq!(it.len(), 1);
        assert_eq!(it.nth_back(3), None);

        assert_eq!(f.iter().fixed().collect::<Vec<_>>(), [1, 4]);
        assert_eq!(f.iter().fixed().rev().collect::<Vec<_>>(), [4, 1]);
        assert_eq!((&f).into_iter().count(), 4);
        assert_eq!(PartPerm::<u32>::empty().iter().next(), None);
    }
}
