//! The packed layout of partial permutations.
//!
//! A partial permutation of degree `n > 0` and rank `r` is packed into a single sequence of points:
//!
//! | Positions | Content |
//! |---|---|
//! | `0` | degree `n` |
//! | `1` | rank `r` |
//! | `2`, `3` | smallest and largest image |
//! | `4`, `5` | smallest and largest point of domain and range |
//! | `6..6 + n` | dense image list |
//! | next `r` | domain, ascending |
//! | next `r` | range, aligned with the domain |
//! | next `r` | range set, only present when cached |
//!
//! The empty partial permutation is packed as the single point `0`.
//!
//! See [`PartPerm::to_flat`][`super::PartPerm::to_flat`] and
//! [`PartPerm::from_flat`][`super::PartPerm::from_flat`].

use std::ops::{Range, RangeInclusive};

/// Position of the degree.
pub const DEGREE: usize = 0;
/// Position of the rank.
pub const RANK: usize = 1;
/// Position of the smallest image.
pub const MIN_RAN: usize = 2;
/// Position of the largest image.
pub const MAX_RAN: usize = 3;
/// Position of the smallest point.
pub const MIN: usize = 4;
/// Position of the largest point.
pub const MAX: usize = 5;
/// Number of scalar fields preceding the dense image list.
pub const HEADER_LEN: usize = 6;

/// Positions of the variable length fields of a packed partial permutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    degree: usize,
    rank: usize,
    ran_set: bool,
}

impl Layout {
    /// Returns the layout for a given degree and rank, with or without the range set section.
    #[inline]
    pub fn new(degree: usize, rank: usize, ran_set: bool) -> Self {
        Self {
            degree,
            rank,
            ran_set,
        }
    }

    /// Positions of the dense image list.
    #[inline]
    pub fn images(&self) -> Range<usize> {
        HEADER_LEN..HEADER_LEN + self.degree
    }

    /// Positions of the domain.
    #[inline]
    pub fn dom(&self) -> Range<usize> {
        let start = self.images().end;
        start..start + self.rank
    }

    /// Positions of the range.
    #[inline]
    pub fn ran(&self) -> Range<usize> {
        let start = self.dom().end;
        start..start + self.rank
    }

    /// Positions of the range set, if present.
    #[inline]
    pub fn ran_set(&self) -> Option<Range<usize>> {
        let start = self.ran().end;
        self.ran_set.then(|| start..start + self.rank)
    }

    /// Total length of the packed partial permutation.
    #[inline]
    pub fn total_len(&self) -> usize {
        if self.degree == 0 {
            1
        } else {
            self.ran_set().unwrap_or_else(|| self.ran()).end
        }
    }
}

/// Returns a copy of the positions `range` of a packed partial permutation.
///
/// Panics when `range` is out of bounds.
#[inline]
pub fn read_off<T: Copy>(storage: &[T], range: RangeInclusive<usize>) -> Vec<T> {
    match storage.get(range.clone()) {
        Some(values) => values.to_vec(),
        None => cannot_read_off(range, storage.len()),
    }
}

#[inline(never)]
#[cold]
fn cannot_read_off(range: RangeInclusive<usize>, len: usize) -> ! {
    panic!(
        "cannot read off positions {}..={} from a packed partial permutation of length {len}",
        range.start(),
        range.end()
    )
}
