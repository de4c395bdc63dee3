//! Low-level partial permutation construction.
//!
//! Every writer here completely overwrites a target [`PartPerm`], reusing its allocations. Inputs
//! are assumed to be valid partial permutations, which `PartPerm`'s private fields guarantee.

use once_cell::sync::OnceCell;
use smallvec::SmallVec;

use crate::point::Point;

use super::PartPerm;

/// Returns the first index into `ran` holding an image that already occurs at a smaller index.
///
/// Scratch space is proportional to `ran.len()`, independent of the image values.
pub fn first_repeated_image<Pt: Point>(ran: &[Pt]) -> Option<usize> {
    let mut sorted: SmallVec<[(Pt, usize); 256]> = ran.iter().copied().zip(0..).collect(); // TUNE
    sorted.sort_unstable();

    sorted
        .windows(2)
        .filter(|pair| pair[0].0 == pair[1].0)
        .map(|pair| pair[1].1)
        .min()
}

/// Writes a partial permutation one point at a time, in increasing order of the points.
pub struct Builder<'a, Pt: Point> {
    target: &'a mut PartPerm<Pt>,
}

impl<'a, Pt: Point> Builder<'a, Pt> {
    /// Clears `target`, reserving space for `degree` points of which at most `max_rank` are defined.
    #[inline]
    pub fn new(target: &'a mut PartPerm<Pt>, degree: usize, max_rank: usize) -> Self {
        target.reset();
        target.images.reserve_exact(degree);
        target.dom.reserve_exact(max_rank);
        target.ran.reserve_exact(max_rank);
        Self { target }
    }

    /// Number of points written so far.
    #[inline(always)]
    pub fn degree(&self) -> usize {
        self.target.images.len()
    }

    /// Writes the image of the next point, which may be [`Point::UNDEFINED`].
    #[inline]
    pub fn push(&mut self, image: Pt) {
        let target = &mut *self.target;
        target.images.push(image);

        if image.is_defined() {
            target.dom.push(Pt::from_index(target.images.len()));
            target.ran.push(image);

            if !target.min_ran.is_defined() || image < target.min_ran {
                target.min_ran = image;
            }
            if image > target.max_ran {
                target.max_ran = image;
            }
        }
    }

    /// Leaves the next `count` points undefined.
    #[inline]
    pub fn push_undefined(&mut self, count: usize) {
        let len = self.target.images.len() + count;
        self.target.images.resize(len, Pt::UNDEFINED);
    }

    /// Completes the partial permutation.
    ///
    /// The last written point has to be defined, unless no point was written at all.
    #[inline]
    pub fn finish(self) {
        self.target.set_extremal_points();
        self.target.check_invariants();
    }
}

/// Returns the degree of the product of two partial permutations.
///
/// This is the largest point of `left`'s domain whose image lies in `right`'s domain, or `0` if
/// there is none.
#[inline]
pub fn product_degree<Pt: Point>(left: &PartPerm<Pt>, right: &PartPerm<Pt>) -> usize {
    let right_degree = right.degree();

    left.dom
        .iter()
        .zip(&left.ran)
        .rev()
        .find(|(_, &mid)| mid.index() <= right_degree && right.images[mid.index() - 1].is_defined())
        .map_or(0, |(&point, _)| point.index())
}

/// Writes the product of two partial permutations.
///
/// The passed `degree` has to be the value returned by [`product_degree`] for the same factors.
#[inline]
pub fn write_product<Pt: Point>(
    target: &mut PartPerm<Pt>,
    left: &PartPerm<Pt>,
    right: &PartPerm<Pt>,
    degree: usize,
) {
    debug_assert_eq!(degree, product_degree(left, right));

    let right_degree = right.degree();
    let mut builder = Builder::new(target, degree, left.rank().min(right.rank()));

    for &mid in &left.images[..degree] {
        let mid_index = mid.index();
        if mid_index == 0 || mid_index > right_degree {
            builder.push(Pt::UNDEFINED);
        } else {
            builder.push(right.images[mid_index - 1]);
        }
    }

    builder.finish();
}

/// Writes the inverse of a partial permutation.
///
/// When the range set of `perm` is cached it becomes the domain of the inverse and the domain of
/// `perm` becomes the cached range set of the inverse. Otherwise the domain of the inverse is
/// collected from its dense image list and its range set is left to be computed on demand.
#[inline]
pub fn write_inverse<Pt: Point>(target: &mut PartPerm<Pt>, perm: &PartPerm<Pt>) {
    target.reset();

    let (Some(&first), Some(&last)) = (perm.dom.first(), perm.dom.last()) else {
        return;
    };

    let degree = perm.max_ran.index();
    let rank = perm.rank();

    target.images.reserve_exact(degree);
    target.images.resize(degree, Pt::UNDEFINED);
    target.dom.reserve_exact(rank);
    target.ran.reserve_exact(rank);

    for (&point, &image) in perm.dom.iter().zip(&perm.ran) {
        target.images[image.index() - 1] = point;
    }

    if let Some(ran_set) = perm.ran_set.get() {
        tracing::trace!(degree, rank, "inverting with cached range set");
        target.dom.extend_from_slice(ran_set);
        target.ran_set = OnceCell::with_value(perm.dom.as_slice().into());
    } else {
        target.dom.extend(
            target
                .images
                .iter()
                .enumerate()
                .filter(|(_, image)| image.is_defined())
                .map(|(index, _)| Pt::from_index(index + 1)),
        );
    }

    target
        .ran
        .extend(target.dom.iter().map(|&point| target.images[point.index() - 1]));

    target.min_ran = first;
    target.max_ran = last;
    target.min = perm.min;
    target.max = perm.max;

    target.check_invariants();
}

/// Writes a random partial permutation of the given degree bound.
///
/// Shuffles the points `1..=degree` and then keeps each point's image with probability 1/2. The
/// degree of the result is the largest kept point and thus may be smaller than `degree`.
#[cfg(feature = "rand")]
pub fn write_random<Pt: Point, R: rand_core::RngCore>(
    target: &mut PartPerm<Pt>,
    degree: usize,
    rng: &mut R,
) {
    use crate::rand::Sample;

    let mut images: SmallVec<[Pt; 64]> = SmallVec::from_elem(Pt::UNDEFINED, degree); // TUNE

    // Fisher-Yates shuffle
    for i in 0..degree {
        let j = rng.next_index(i + 1);
        images[i] = images[j];
        images[j] = Pt::from_index(i + 1);
    }

    let mut bits = 0;
    let mut kept = 0;
    for (index, image) in images.iter_mut().enumerate() {
        if index % 64 == 0 {
            bits = rng.next_u64();
        }
        if bits & 1 == 0 {
            *image = Pt::UNDEFINED;
        } else {
            kept = index + 1;
        }
        bits >>= 1;
    }

    let mut builder = Builder::new(target, kept, kept);
    for &image in &images[..kept] {
        builder.push(image);
    }
    builder.finish();
}
