//! Operations on partial permutations.
//!
//! To allow operations returning partial permutations without unnecessary copies or allocations,
//! operations return a value of an operation-specific type that implements [`PartPermVal`].
//!
//! This module contains such operation-specific types returned by [`PartPerm`]'s methods.

use crate::point::Point;

use super::{raw, PartPerm, PartPermVal};

/// Inverse of a partial permutation.
///
/// See [`PartPerm::inv`].
pub struct Inverse<'a, Pt: Point>(&'a PartPerm<Pt>);

impl<'a, Pt: Point> Inverse<'a, Pt> {
    pub(super) fn new(perm: &'a PartPerm<Pt>) -> Self {
        Self(perm)
    }
}

impl<'a, Pt: Point> PartPermVal for Inverse<'a, Pt> {
    type Pt = Pt;

    #[inline(always)]
    fn degree(&self) -> usize {
        self.0.max_ran().index()
    }

    #[inline]
    fn assign_to(self, target: &mut PartPerm<Pt>) {
        raw::write_inverse(target, self.0)
    }
}

/// Product of two partial permutations.
///
/// See [`PartPerm::prod`].
pub struct Product<'a, Pt: Point> {
    degree: usize,
    left: &'a PartPerm<Pt>,
    right: &'a PartPerm<Pt>,
}

impl<'a, Pt: Point> Product<'a, Pt> {
    pub(super) fn new(left: &'a PartPerm<Pt>, right: &'a PartPerm<Pt>) -> Self {
        let degree = raw::product_degree(left, right);
        if degree < left.degree() {
            tracing::trace!(
                left_degree = left.degree(),
                degree,
                "trimmed undefined points from product"
            );
        }
        Self {
            degree,
            left,
            right,
        }
    }
}

impl<'a, Pt: Point> PartPermVal for Product<'a, Pt> {
    type Pt = Pt;

    #[inline(always)]
    fn degree(&self) -> usize {
        self.degree
    }

    #[inline]
    fn assign_to(self, target: &mut PartPerm<Pt>) {
        raw::write_product(target, self.left, self.right, self.degree)
    }
}

/// A random partial permutation.
///
/// See [`Sample::next_pperm`][`crate::rand::Sample::next_pperm`].
#[cfg(feature = "rand")]
pub struct Random<'a, Pt: Point, R: rand_core::RngCore> {
    degree: usize,
    rng: &'a mut R,
    _marker: std::marker::PhantomData<Pt>,
}

#[cfg(feature = "rand")]
impl<'a, Pt: Point, R: rand_core::RngCore> Random<'a, Pt, R> {
    pub(crate) fn new(degree: usize, rng: &'a mut R) -> Self {
        assert!(degree <= Pt::MAX_DEGREE);
        Self {
            degree,
            rng,
            _marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "rand")]
impl<'a, Pt: Point, R: rand_core::RngCore> PartPermVal for Random<'a, Pt, R> {
    type Pt = Pt;

    /// Returns the degree bound passed on construction.
    ///
    /// The sampled partial permutation can have a smaller degree.
    fn degree(&self) -> usize {
        self.degree
    }

    fn assign_to(self, target: &mut PartPerm<Pt>) {
        raw::write_random(target, self.degree, self.rng)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn dense(images: &[u32]) -> PartPerm {
        PartPerm::from_dense(images).unwrap()
    }

    #[test]
    fn product_degree_is_trimmed() {
        let f = dense(&[2, 4, 1, 6]);
        let g = dense(&[0, 0, 0, 5]);

        let prod = f.prod(&g);
        assert_eq!(prod.degree(), 2);

        let fg = PartPerm::new(prod);
        assert_eq!(fg.images(), &[0, 5]);
        assert_eq!(fg.dom(), &[2]);
        assert_eq!(fg.ran(), &[5]);
        assert_eq!((fg.min_ran(), fg.max_ran()), (5, 5));
        assert_eq!((fg.min_point(), fg.max_point()), (2, 5));
    }

    #[test]
    fn product_convention() {
        let f = dense(&[2, 3, 1]);
        let g = dense(&[1, 3]);
        // 1 -> 2 -> 3, 2 -> 3 -> undefined, 3 -> 1 -> 1
        assert_eq!(f.compose(&g), dense(&[3, 0, 1]));
        // 1 -> 1 -> 2, 2 -> 3 -> 1
        assert_eq!(g.compose(&f), dense(&[2, 1]));
    }

    #[test]
    fn product_with_empty() {
        let f = dense(&[2, 0, 1]);
        let empty = PartPerm::empty();
        assert_eq!(f.prod(&empty).degree(), 0);
        assert!(f.compose(&empty).is_empty());
        assert!(empty.compose(&f).is_empty());
        assert!(dense(&[4]).compose(&dense(&[1, 2])).is_empty());
    }

    #[test]
    fn inverse_without_cache() {
        let f = dense(&[5, 0, 2, 1]);
        let inv = f.inverse();
        assert_eq!(inv.degree(), 5);
        assert_eq!(inv.images(), &[4, 3, 0, 0, 1]);
        assert_eq!(inv.dom(), &[1, 2, 5]);
        assert_eq!(inv.ran(), &[4, 3, 1]);
        assert_eq!((inv.min_ran(), inv.max_ran()), (1, 4));
        assert_eq!((inv.min_point(), inv.max_point()), (1, 5));
        assert!(!inv.has_ran_set());
        assert_eq!(inv.inverse(), f);
    }

    #[test]
    fn inverse_with_cache() {
        crate::test_utils::init_test_logging();
        let f = dense(&[5, 0, 2, 1]);
        assert_eq!(f.ran_set(), &[1, 2, 5]);

        let inv = f.inverse();
        assert!(inv.has_ran_set());
        assert_eq!(inv.ran_set(), f.dom());
        assert_eq!(inv.dom(), &[1, 2, 5]);
        assert_eq!(inv.ran(), &[4, 3, 1]);
        assert_eq!(inv, dense(&[4, 3, 0, 0, 1]));

        let mut uncached = dense(&[5, 0, 2, 1]).inverse();
        assert_eq!(uncached, inv);
        assert_eq!(uncached.ran_set(), inv.ran_set());

        uncached.assign(inv.inv());
        assert_eq!(uncached, f);
        assert!(uncached.has_ran_set());
        assert_eq!(uncached.ran_set(), &[1, 2, 5]);
    }

    #[test]
    fn inverse_of_empty() {
        let empty = PartPerm::<u32>::empty();
        assert_eq!(empty.inv().degree(), 0);
        assert!(empty.inverse().is_empty());
        empty.ran_set();
        assert!(empty.inverse().is_empty());
    }

    #[test]
    fn inverse_products() {
        let f = dense(&[3, 0, 4, 1]);
        let finv = f.inverse();
        // f * f^-1 is the identity on the domain of f
        assert_eq!(f.compose(&finv), dense(&[1, 0, 3, 4]));
        // f^-1 * f is the identity on the range of f
        assert_eq!(finv.compose(&f), dense(&[1, 0, 3, 4]));

        let g = dense(&[2, 1]);
        assert_eq!(g.compose(&f).inverse(), finv.compose(&g.inverse()));
    }
}
