//! Partial permutations.

use std::{hash, ops::RangeInclusive};

use num_traits::PrimInt;
use once_cell::sync::OnceCell;

use crate::point::Point;

mod error;
mod fmt;
mod iter;
mod raw;

pub mod layout;
pub mod ops;

pub use error::{Error, ErrorKind};
pub use iter::{Iter, IterFixed};

use layout::Layout;

/// A partial permutation, an injective map from a subset of `1..=degree` to the positive points.
///
/// The mapping is stored in three forms at once: as a dense image list indexed by every point up to
/// the degree, and as a domain with an aligned range. Additionally a few extremal points are cached.
/// The range sorted as a set is computed on first use and then cached, see [`PartPerm::ran_set`].
///
/// The degree is always the largest point in the domain, so the empty partial permutation is the
/// only one of degree `0`.
pub struct PartPerm<Pt: Point = u32> {
    min_ran: Pt,
    max_ran: Pt,
    min: Pt,
    max: Pt,
    images: Vec<Pt>,
    dom: Vec<Pt>,
    ran: Vec<Pt>,
    ran_set: OnceCell<Box<[Pt]>>,
}

impl<Pt: Point> PartPerm<Pt> {
    /// Returns the empty partial permutation.
    ///
    /// This has degree and rank `0` and is absorbing for [`PartPerm::prod`]. It does not allocate.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min_ran: Pt::UNDEFINED,
            max_ran: Pt::UNDEFINED,
            min: Pt::UNDEFINED,
            max: Pt::UNDEFINED,
            images: Vec::new(),
            dom: Vec::new(),
            ran: Vec::new(),
            ran_set: OnceCell::new(),
        }
    }

    /// Returns a new partial permutation of a given value.
    ///
    /// See [`PartPermVal::into_pperm`] for more details.
    #[inline(always)]
    pub fn new<V: PartPermVal<Pt = Pt>>(value: V) -> Self {
        value.into_pperm()
    }

    /// Creates a partial permutation from a dense image list.
    ///
    /// The entry at position `i` (counting from `0`) is the image of the point `i + 1`, where `0`
    /// leaves the point undefined. Trailing undefined points are dropped, so an image list without
    /// non-zero entries yields the empty partial permutation.
    ///
    /// Fails when a value is negative or too large for `Pt`, or when two points share an image.
    pub fn from_dense<V: PrimInt>(images: &[V]) -> Result<Self, Error> {
        let degree = images.iter().rposition(|v| !v.is_zero()).map_or(0, |pos| pos + 1);

        if degree > Pt::MAX_DEGREE {
            return Err(Error::DegreeTooLarge {
                degree,
                max_degree: Pt::MAX_DEGREE,
            });
        }

        let mut new = Self::empty();
        let mut builder = raw::Builder::new(&mut new, degree, degree);

        for (position, &value) in images[..degree].iter().enumerate() {
            let image = point_value::<Pt, V>(value, position)?;
            builder.push(Pt::from_index(image));
        }

        builder.finish();
        if let Some(index) = raw::first_repeated_image(&new.ran) {
            return Err(Error::RepeatedImage {
                position: new.dom[index].index() - 1,
                image: new.ran[index].index(),
            });
        }
        new.shrink_to_fit();
        Ok(new)
    }

    /// Creates a partial permutation from a domain and the aligned images of the domain's points.
    ///
    /// The domain has to be strictly ascending already, this does not sort. The degree of the result
    /// is the last domain point.
    ///
    /// Fails when the lengths differ, the domain is not strictly ascending, a value is not positive
    /// or too large for `Pt`, or when two points share an image.
    pub fn from_sparse<V: PrimInt>(dom: &[V], ran: &[V]) -> Result<Self, Error> {
        if dom.len() != ran.len() {
            return Err(Error::LengthMismatch {
                dom_len: dom.len(),
                ran_len: ran.len(),
            });
        }

        let Some(&last) = dom.last() else {
            return Ok(Self::empty());
        };
        let degree = point_value::<Pt, V>(last, dom.len() - 1)?;

        let mut new = Self::empty();
        let mut builder = raw::Builder::new(&mut new, degree, dom.len());

        for (position, (&point, &image)) in dom.iter().zip(ran).enumerate() {
            let point = positive_point_value::<Pt, V>(point, position)?;
            let image = positive_point_value::<Pt, V>(image, position)?;

            if point <= builder.degree() || point > degree {
                return Err(Error::UnsortedDomain { position });
            }
            builder.push_undefined(point - 1 - builder.degree());
            builder.push(Pt::from_index(image));
        }

        builder.finish();
        if let Some(position) = raw::first_repeated_image(&new.ran) {
            return Err(Error::RepeatedImage {
                position,
                image: new.ran[position].index(),
            });
        }
        new.shrink_to_fit();
        Ok(new)
    }

    /// Validates and unpacks a partial permutation stored in the packed layout.
    ///
    /// This accepts records with or without the trailing range set section, see [`layout`]. The
    /// range set section is kept as cache when present.
    ///
    /// Fails with an [`ErrorKind::PreconditionViolation`] error when any field of the record is
    /// inconsistent with the others.
    pub fn from_flat(flat: &[Pt]) -> Result<Self, Error> {
        let result = Self::from_flat_impl(flat);
        if let Err(err) = &result {
            tracing::debug!(len = flat.len(), %err, "rejected packed partial permutation");
        }
        result
    }

    fn from_flat_impl(flat: &[Pt]) -> Result<Self, Error> {
        let (&degree, rest) = flat
            .split_first()
            .ok_or(Error::Malformed("empty record"))?;
        let degree = degree.index();

        if degree == 0 {
            return if rest.is_empty() {
                Ok(Self::empty())
            } else {
                Err(Error::Malformed("trailing data after the empty partial permutation"))
            };
        }

        if flat.len() < layout::HEADER_LEN {
            return Err(Error::Malformed("truncated header"));
        }

        let rank = flat[layout::RANK].index();
        if rank == 0 || rank > degree {
            return Err(Error::Malformed("rank is not in 1..=degree"));
        }

        let layout = [false, true]
            .into_iter()
            .map(|ran_set| Layout::new(degree, rank, ran_set))
            .find(|layout| layout.total_len() == flat.len())
            .ok_or(Error::Malformed("length does not match degree and rank"))?;

        let new = Self::from_sparse(&flat[layout.dom()], &flat[layout.ran()])
            .map_err(|_| Error::Malformed("domain and range do not form a partial permutation"))?;

        if new.degree() != degree {
            return Err(Error::Malformed("degree is not the last domain point"));
        }
        if new.images() != &flat[layout.images()] {
            return Err(Error::Malformed("dense images disagree with domain and range"));
        }
        if flat[layout::MIN_RAN..layout::HEADER_LEN] != [new.min_ran, new.max_ran, new.min, new.max]
        {
            return Err(Error::Malformed("extremal points disagree with domain and range"));
        }
        if let Some(ran_set) = layout.ran_set() {
            if new.ran_set() != &flat[ran_set] {
                return Err(Error::Malformed("range set is not the sorted range"));
            }
        }

        Ok(new)
    }

    /// Returns the degree, the largest point in the domain or `0` when the domain is empty.
    #[inline(always)]
    pub fn degree(&self) -> usize {
        self.images.len()
    }

    /// Returns the number of points with a defined image.
    #[inline(always)]
    pub fn rank(&self) -> usize {
        self.dom.len()
    }

    /// Returns `true` for the empty partial permutation.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Returns the smallest image, or [`Point::UNDEFINED`] when the range is empty.
    #[inline(always)]
    pub fn min_ran(&self) -> Pt {
        self.min_ran
    }

    /// Returns the largest image, or [`Point::UNDEFINED`] when the range is empty.
    #[inline(always)]
    pub fn max_ran(&self) -> Pt {
        self.max_ran
    }

    /// Returns the smallest point of the domain or range, or [`Point::UNDEFINED`] when both are
    /// empty.
    #[inline(always)]
    pub fn min_point(&self) -> Pt {
        self.min
    }

    /// Returns the largest point of the domain or range, or [`Point::UNDEFINED`] when both are
    /// empty.
    #[inline(always)]
    pub fn max_point(&self) -> Pt {
        self.max
    }

    /// Returns the dense image list of the points `1..=self.degree()`.
    ///
    /// Undefined images are [`Point::UNDEFINED`].
    #[inline(always)]
    pub fn images(&self) -> &[Pt] {
        &self.images
    }

    /// Returns the domain in ascending order.
    #[inline(always)]
    pub fn dom(&self) -> &[Pt] {
        &self.dom
    }

    /// Returns the images of the domain's points, in the same order as [`PartPerm::dom`].
    #[inline(always)]
    pub fn ran(&self) -> &[Pt] {
        &self.ran
    }

    /// Returns the image of a point, or `None` when the point is not in the domain.
    #[inline]
    pub fn image(&self, point: Pt) -> Option<Pt> {
        let index = point.index().checked_sub(1)?;
        self.images
            .get(index)
            .copied()
            .filter(|image| image.is_defined())
    }

    /// Returns an iterator over all `(point, image)` pairs in ascending order of the points.
    #[inline]
    pub fn iter(&self) -> Iter<'_, Pt> {
        Iter::new(self)
    }

    /// Returns the range as an ascending set.
    ///
    /// The sorted range is computed on the first call and cached. Later calls, including calls on
    /// other threads racing with the first call, return the cached slice without sorting again.
    pub fn ran_set(&self) -> &[Pt] {
        self.ran_set.get_or_init(|| {
            tracing::trace!(rank = self.rank(), "populating range set cache");
            let mut ran_set: Box<[Pt]> = self.ran.as_slice().into();
            ran_set.sort_unstable();
            ran_set
        })
    }

    /// Returns `true` when the range set was already computed and cached.
    #[inline(always)]
    pub fn has_ran_set(&self) -> bool {
        self.ran_set.get().is_some()
    }

    /// Returns the inverse of this partial permutation.
    ///
    /// The inverse's degree is [`PartPerm::max_ran`]. When the range set of `self` is cached, the
    /// inverse is built from it and receives the domain of `self` as its own cached range set.
    #[inline(always)]
    pub fn inv(&self) -> ops::Inverse<'_, Pt> {
        ops::Inverse::new(self)
    }

    /// Returns the product of this partial permutation with another one.
    ///
    /// Like for permutations, applying the product is the same as applying the _left_ factor first,
    /// followed by the _right_ factor. A point is in the domain of the product when its image under
    /// the left factor is in the domain of the right factor.
    #[inline(always)]
    pub fn prod<'a>(&'a self, right: &'a PartPerm<Pt>) -> ops::Product<'a, Pt> {
        ops::Product::new(self, right)
    }

    /// Returns the product of this partial permutation with another one as a new value.
    ///
    /// Shorthand for `PartPerm::new(self.prod(right))`.
    #[inline]
    pub fn compose(&self, right: &PartPerm<Pt>) -> Self {
        self.prod(right).into_pperm()
    }

    /// Returns the inverse of this partial permutation as a new value.
    ///
    /// Shorthand for `PartPerm::new(self.inv())`.
    #[inline]
    pub fn inverse(&self) -> Self {
        self.inv().into_pperm()
    }

    /// Sets this partial permutation to a given value, reusing the existing allocations.
    #[inline(always)]
    pub fn assign<V: PartPermVal<Pt = Pt>>(&mut self, value: V) {
        value.assign_to(self)
    }

    /// Returns the positions of all fields in the packed layout of this partial permutation.
    ///
    /// The range set section is included when it is cached.
    #[inline]
    pub fn layout(&self) -> Layout {
        Layout::new(self.degree(), self.rank(), self.has_ran_set())
    }

    /// Returns this partial permutation in the packed layout.
    ///
    /// See [`layout`] for a description of the layout.
    pub fn to_flat(&self) -> Vec<Pt> {
        if self.is_empty() {
            return vec![Pt::UNDEFINED];
        }

        let layout = self.layout();
        let mut flat = Vec::with_capacity(layout.total_len());
        flat.extend([
            Pt::from_index(self.degree()),
            Pt::from_index(self.rank()),
            self.min_ran,
            self.max_ran,
            self.min,
            self.max,
        ]);
        flat.extend_from_slice(&self.images);
        flat.extend_from_slice(&self.dom);
        flat.extend_from_slice(&self.ran);
        if let Some(ran_set) = self.ran_set.get() {
            flat.extend_from_slice(ran_set);
        }
        flat
    }

    /// Returns the given positions of the packed layout of this partial permutation.
    ///
    /// Panics when `range` is out of bounds for [`PartPerm::layout`].
    #[inline]
    pub fn read_off(&self, range: RangeInclusive<usize>) -> Vec<Pt> {
        layout::read_off(&self.to_flat(), range)
    }

    #[inline]
    fn reset(&mut self) {
        self.min_ran = Pt::UNDEFINED;
        self.max_ran = Pt::UNDEFINED;
        self.min = Pt::UNDEFINED;
        self.max = Pt::UNDEFINED;
        self.images.clear();
        self.dom.clear();
        self.ran.clear();
        self.ran_set.take();
    }

    #[inline]
    fn shrink_to_fit(&mut self) {
        self.images.shrink_to_fit();
        self.dom.shrink_to_fit();
        self.ran.shrink_to_fit();
    }

    #[inline]
    fn set_extremal_points(&mut self) {
        if let (Some(&first), Some(&last)) = (self.dom.first(), self.dom.last()) {
            self.min = first.min(self.min_ran);
            self.max = last.max(self.max_ran);
        } else {
            self.min = Pt::UNDEFINED;
            self.max = Pt::UNDEFINED;
        }
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        debug_assert_eq!(self.dom.len(), self.ran.len());
        debug_assert_eq!(
            self.dom.last().map_or(0, |pt| pt.index()),
            self.degree(),
            "degree is not the last domain point"
        );
        debug_assert!(self.dom.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(self
            .dom
            .iter()
            .zip(&self.ran)
            .all(|(&pt, &img)| self.images[pt.index() - 1] == img));
        debug_assert_eq!(
            self.images.iter().filter(|pt| pt.is_defined()).count(),
            self.rank()
        );
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn check_invariants(&self) {}
}

#[inline]
fn point_value<Pt: Point, V: PrimInt>(value: V, position: usize) -> Result<usize, Error> {
    if value < V::zero() {
        return Err(Error::NegativeValue { position });
    }
    value
        .to_usize()
        .filter(|&index| index <= Pt::MAX_DEGREE)
        .ok_or(Error::ValueTooLarge {
            position,
            max_degree: Pt::MAX_DEGREE,
        })
}

#[inline]
fn positive_point_value<Pt: Point, V: PrimInt>(value: V, position: usize) -> Result<usize, Error> {
    match point_value::<Pt, V>(value, position)? {
        0 => Err(Error::ZeroPoint { position }),
        index => Ok(index),
    }
}

impl<Pt: Point> Default for PartPerm<Pt> {
    #[inline(always)]
    fn default() -> Self {
        Self::empty()
    }
}

impl<Pt: Point> Clone for PartPerm<Pt> {
    fn clone(&self) -> Self {
        Self {
            min_ran: self.min_ran,
            max_ran: self.max_ran,
            min: self.min,
            max: self.max,
            images: self.images.clone(),
            dom: self.dom.clone(),
            ran: self.ran.clone(),
            ran_set: self.ran_set.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.min_ran = source.min_ran;
        self.max_ran = source.max_ran;
        self.min = source.min;
        self.max = source.max;
        self.images.clone_from(&source.images);
        self.dom.clone_from(&source.dom);
        self.ran.clone_from(&source.ran);
        self.ran_set = source.ran_set.clone();
    }
}

/// Compares the represented maps, ignoring whether the range set is cached.
impl<Pt: Point> PartialEq for PartPerm<Pt> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.images == other.images
    }
}

impl<Pt: Point> Eq for PartPerm<Pt> {}

impl<Pt: Point> hash::Hash for PartPerm<Pt> {
    #[inline]
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.images.hash(state);
    }
}

impl<'a, Pt: Point> IntoIterator for &'a PartPerm<Pt> {
    type Item = (Pt, Pt);

    type IntoIter = Iter<'a, Pt>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Values representing a partial permutation.
///
/// Partial permutation producing operations return an operation-specific type (e.g.
/// [`ops::Inverse`], [`ops::Product`]) implementing this trait.
///
/// Use [`into_pperm`][`Self::into_pperm`] or [`PartPerm::new`] to obtain the resulting partial
/// permutation as a new value. Alternatively use [`assign_to`][`Self::assign_to`] or
/// [`PartPerm::assign`] to overwrite an existing value, reusing its allocations.
pub trait PartPermVal: Sized {
    /// Type of points the partial permutation acts on.
    type Pt: Point;

    /// The degree of the represented partial permutation.
    fn degree(&self) -> usize;

    /// Overwrites `target` with this value.
    ///
    /// The allocations of `target` are reused where possible, any cached range set of `target` is
    /// discarded.
    fn assign_to(self, target: &mut PartPerm<Self::Pt>);

    /// Returns this value as a new partial permutation.
    #[inline]
    fn into_pperm(self) -> PartPerm<Self::Pt> {
        let mut new = PartPerm::empty();
        self.assign_to(&mut new);
        new.shrink_to_fit();
        new
    }
}

impl<'a, Pt: Point> PartPermVal for &'a PartPerm<Pt> {
    type Pt = Pt;

    #[inline(always)]
    fn degree(&self) -> usize {
        PartPerm::degree(self)
    }

    #[inline]
    fn assign_to(self, target: &mut PartPerm<Pt>) {
        target.clone_from(self)
    }
}

impl<Pt: Point> PartPermVal for PartPerm<Pt> {
    type Pt = Pt;

    #[inline(always)]
    fn degree(&self) -> usize {
        PartPerm::degree(self)
    }

    #[inline]
    fn assign_to(self, target: &mut PartPerm<Pt>) {
        *target = self
    }

    #[inline(always)]
    fn into_pperm(self) -> PartPerm<Pt> {
        self
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
    fn dense_fields() {
        let f = dense(&[0, 2, 0, 4]);
        assert_eq!(f.degree(), 4);
        assert_eq!(f.rank(), 2);
        assert_eq!(f.images(), &[0, 2, 0, 4]);
        assert_eq!(f.dom(), &[2, 4]);
        assert_eq!(f.ran(), &[2, 4]);
        assert_eq!((f.min_ran(), f.max_ran()), (2, 4));
        assert_eq!((f.min_point(), f.max_point()), (2, 4));
    }

    #[test]
    fn dense_trims_and_extremes() {
        let f = dense(&[5, 0, 1, 0, 0]);
        assert_eq!(f.degree(), 3);
        assert_eq!(f.dom(), &[1, 3]);
        assert_eq!(f.ran(), &[5, 1]);
        assert_eq!((f.min_ran(), f.max_ran()), (1, 5));
        assert_eq!((f.min_point(), f.max_point()), (1, 5));

        let g = dense(&[0, 0, 7]);
        assert_eq!((g.min_ran(), g.max_ran()), (7, 7));
        assert_eq!((g.min_point(), g.max_point()), (3, 7));
    }

    #[test]
    fn dense_empty() {
        for f in [dense(&[]), dense(&[0, 0, 0])] {
            assert!(f.is_empty());
            assert_eq!(f.degree(), 0);
            assert_eq!(f.rank(), 0);
            assert_eq!(f.min_point(), 0);
            assert_eq!(f, PartPerm::empty());
        }
    }

    #[test]
    fn dense_errors() {
        assert_eq!(
            PartPerm::<u32>::from_dense(&[1i64, -2, 3]),
            Err(Error::NegativeValue { position: 1 })
        );
        assert_eq!(
            PartPerm::<u32>::from_dense(&[3, 1, 3]),
            Err(Error::RepeatedImage {
                position: 2,
                image: 3
            })
        );
        assert_eq!(
            PartPerm::<u8>::from_dense(&[256u32]),
            Err(Error::ValueTooLarge {
                position: 0,
                max_degree: 255
            })
        );
        let long = [1u32; 300];
        assert_eq!(
            PartPerm::<u8>::from_dense(&long).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn dense_large_degree() {
        let images: Vec<u32> = (1..=2000).rev().collect();
        let f = PartPerm::<u16>::from_dense(&images).unwrap();
        assert_eq!(f.degree(), 2000);
        assert_eq!(f.rank(), 2000);
        assert_eq!(f.image(1), Some(2000));
        assert_eq!(f.image(2000), Some(1));
    }

    #[test]
    fn sparse_fields() {
        let f = PartPerm::<u32>::from_sparse(&[2, 4], &[4, 2]).unwrap();
        assert_eq!(f.degree(), 4);
        assert_eq!(f.images(), &[0, 4, 0, 2]);
        assert_eq!(f.dom(), &[2, 4]);
        assert_eq!(f.ran(), &[4, 2]);
        assert_eq!((f.min_ran(), f.max_ran()), (2, 4));
        assert_eq!((f.min_point(), f.max_point()), (2, 4));

        let g = PartPerm::<u32>::from_sparse(&[1, 3], &[9, 6]).unwrap();
        assert_eq!(g.images(), &[9, 0, 6]);
        assert_eq!((g.min_point(), g.max_point()), (1, 9));
        assert_eq!(g, dense(&[9, 0, 6]));
    }

    #[test]
    fn sparse_errors() {
        let empty: [i32; 0] = [];
        assert!(PartPerm::<u32>::from_sparse(&empty, &empty)
            .unwrap()
            .is_empty());
        assert_eq!(
            PartPerm::<u32>::from_sparse(&[1, 2], &[1]),
            Err(Error::LengthMismatch {
                dom_len: 2,
                ran_len: 1
            })
        );
        assert_eq!(
            PartPerm::<u32>::from_sparse(&[3, 2], &[1, 2]),
            Err(Error::UnsortedDomain { position: 0 })
        );
        assert_eq!(
            PartPerm::<u32>::from_sparse(&[2, 2], &[1, 3]),
            Err(Error::UnsortedDomain { position: 1 })
        );
        assert_eq!(
            PartPerm::<u32>::from_sparse(&[1, 2], &[5, 5]),
            Err(Error::RepeatedImage {
                position: 1,
                image: 5
            })
        );
        assert_eq!(
            PartPerm::<u32>::from_sparse(&[0, 2], &[1, 2]),
            Err(Error::ZeroPoint { position: 0 })
        );
        assert_eq!(
            PartPerm::<u32>::from_sparse(&[1, 2], &[-1, 2]),
            Err(Error::NegativeValue { position: 0 })
        );
    }

    #[test]
    fn repeated_images_reported_in_order() {
        assert_eq!(
            PartPerm::<u32>::from_dense(&[4, 9, 0, 9, 4]),
            Err(Error::RepeatedImage {
                position: 3,
                image: 9
            })
        );
        assert_eq!(
            PartPerm::<u32>::from_sparse(&[1, 3, 5, 6], &[7, 2, 2, 7]),
            Err(Error::RepeatedImage {
                position: 2,
                image: 2
            })
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn huge_images_with_small_degree() {
        let huge = 1u64 << 40;

        let f = PartPerm::<u64>::from_sparse(&[1u64], &[huge]).unwrap();
        assert_eq!(f.degree(), 1);
        assert_eq!(f.rank(), 1);
        assert_eq!(f.image(1), Some(huge));
        assert_eq!((f.min_point(), f.max_point()), (1, huge));
        assert_eq!(format!("{f:?}"), format!("[1,{huge}]"));

        let g = PartPerm::<u64>::from_dense(&[0, huge, huge - 1]).unwrap();
        assert_eq!(g.dom(), &[2, 3]);
        assert_eq!(g.ran_set(), &[huge - 1, huge]);
        assert_eq!(PartPerm::from_flat(&g.to_flat()).unwrap(), g);

        assert_eq!(
            PartPerm::<u64>::from_sparse(&[1u64, 2], &[huge, huge]),
            Err(Error::RepeatedImage {
                position: 1,
                image: huge as usize
            })
        );
        assert!(f.compose(&g).is_empty());
    }

    #[test]
    fn image_lookup() {
        let f = dense(&[0, 3, 1]);
        assert_eq!(f.image(0), None);
        assert_eq!(f.image(1), None);
        assert_eq!(f.image(2), Some(3));
        assert_eq!(f.image(3), Some(1));
        assert_eq!(f.image(4), None);
    }

    #[test]
    fn ran_set_is_cached() {
        let f = dense(&[4, 0, 1, 3]);
        assert!(!f.has_ran_set());
        let first = f.ran_set();
        assert_eq!(first, &[1, 3, 4]);
        assert!(f.has_ran_set());
        assert!(std::ptr::eq(first, f.ran_set()));
        assert_eq!(f.ran(), &[4, 1, 3]);
    }

    #[test]
    fn ran_set_concurrent() {
        let images: Vec<u32> = (1..=500).rev().collect();
        let f = dense(&images);
        let expected: Vec<u32> = (1..=500).collect();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| assert_eq!(f.ran_set(), expected.as_slice()));
            }
        });
        assert!(f.has_ran_set());
    }

    #[test]
    fn compose_scenario() {
        let f = dense(&[0, 3, 0]);
        let g = dense(&[0, 0, 5]);
        let fg = f.compose(&g);
        assert_eq!(fg.degree(), 2);
        assert_eq!(fg.rank(), 1);
        assert_eq!(fg.dom(), &[2]);
        assert_eq!(fg.ran(), &[5]);
        assert_eq!((fg.min_point(), fg.max_point()), (2, 5));
    }

    #[test]
    fn inverse_scenario() {
        let f = PartPerm::<u32>::from_sparse(&[2, 4], &[4, 2]).unwrap();
        let inv = f.inverse();
        assert_eq!(inv.degree(), 4);
        assert_eq!(inv.dom(), &[2, 4]);
        assert_eq!(inv.ran(), &[4, 2]);
        assert_eq!(inv, f);
    }

    #[test]
    fn assign_reuses_target() {
        let f = dense(&[2, 3, 1]);
        let mut target = dense(&[0, 0, 0, 0, 0, 0, 0, 1]);
        target.ran_set();
        target.assign(f.inv());
        assert_eq!(target, dense(&[3, 1, 2]));
        assert!(!target.has_ran_set());

        target.assign(&f);
        assert_eq!(target, f);

        target.assign(PartPerm::empty());
        assert!(target.is_empty());
    }

    #[test]
    fn flat_round_trip() {
        let f = dense(&[0, 5, 0, 1]);
        assert_eq!(f.to_flat(), vec![4, 2, 1, 5, 1, 5, 0, 5, 0, 1, 2, 4, 5, 1]);
        assert_eq!(PartPerm::from_flat(&f.to_flat()).unwrap(), f);

        f.ran_set();
        let flat = f.to_flat();
        assert_eq!(flat.len(), 16);
        assert_eq!(&flat[14..], &[1, 5]);
        let unpacked = PartPerm::from_flat(&flat).unwrap();
        assert!(unpacked.has_ran_set());
        assert_eq!(unpacked, f);

        assert_eq!(PartPerm::<u32>::empty().to_flat(), vec![0]);
        assert!(PartPerm::<u32>::from_flat(&[0]).unwrap().is_empty());
    }

    #[test]
    fn flat_malformed() {
        crate::test_utils::init_test_logging();
        let check = |flat: &[u32]| {
            assert_eq!(
                PartPerm::from_flat(flat).unwrap_err().kind(),
                ErrorKind::PreconditionViolation
            )
        };

        check(&[]);
        check(&[0, 1]);
        check(&[2, 1, 1]);
        // rank exceeds degree
        check(&[1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1]);
        // length mismatch
        check(&[2, 1, 1, 1, 1, 2, 0, 1, 2]);
        // dense image disagrees
        check(&[2, 1, 1, 1, 1, 2, 1, 1, 2, 1]);
        // wrong extremes
        check(&[2, 1, 1, 1, 2, 2, 0, 1, 2, 1]);
        // degree is not the last domain point
        check(&[3, 1, 1, 1, 1, 2, 0, 1, 0, 2, 1]);
        // unsorted range set
        check(&[2, 2, 1, 2, 1, 2, 2, 1, 1, 2, 2, 1, 2, 1]);

        let ok = [2u32, 2, 1, 2, 1, 2, 2, 1, 1, 2, 2, 1, 1, 2];
        assert_eq!(PartPerm::from_flat(&ok).unwrap(), dense(&[2, 1]));
    }

    #[test]
    fn read_off_fields() {
        let f = dense(&[0, 3, 1]);
        let layout = f.layout();
        assert_eq!(f.read_off(0..=1), vec![3, 2]);
        assert_eq!(
            f.read_off(layout.dom().start..=layout.dom().end - 1),
            vec![2, 3]
        );
        assert_eq!(f.read_off(6..=8), f.images());
    }

    #[test]
    #[should_panic(expected = "cannot read off")]
    fn read_off_out_of_bounds() {
        dense(&[1]).read_off(0..=20);
    }
}
