//! Points acted on by partial permutations.
use std::{fmt, hash::Hash};

use num_traits::{PrimInt, Unsigned};

pub(crate) mod sealed {
    /// No other implementations than the ones in this file are allowed.
    pub trait Sealed {}
}

#[cfg(not(any(target_pointer_width = "64", target_pointer_width = "32")))]
compile_error!(
    r#"The pperm crate only supports target_pointer_width = "32" and target_pointer_width = "64""#
);

/// Unsigned primitive integer types used to represent points of partial permutations.
///
/// Points are numbered starting at `1`. The value `0` is reserved as [`Point::UNDEFINED`] and marks
/// a point without an image in a dense image list.
///
/// This type should only be implemented for unsigned primitive integer types. To enforce this, this
/// trait is sealed.
pub trait Point:
    PrimInt
    + Unsigned
    + Default
    + Hash
    + fmt::Display
    + fmt::Debug
    + sealed::Sealed
    + 'static
{
    /// Largest point, and thus largest degree, of a partial permutation using this type as point
    /// representation.
    const MAX_DEGREE: usize;

    /// Marker for an undefined image.
    const UNDEFINED: Self;

    /// Returns the point as a `usize`.
    fn index(self) -> usize;

    /// Returns the point with a given value.
    ///
    /// If the passed index is larger than [`Self::MAX_DEGREE`] an arbitrary value is returned.
    fn from_index(index: usize) -> Self;

    /// Returns `true` unless this is [`Self::UNDEFINED`].
    #[inline(always)]
    fn is_defined(self) -> bool {
        self != Self::UNDEFINED
    }
}

macro_rules! impl_pt {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}

            impl Point for $t {
                const MAX_DEGREE: usize = {
                    if (<$t>::MAX as usize) < (isize::MAX as usize) / std::mem::size_of::<$t>() {
                        <$t>::MAX as usize
                    } else {
                        (isize::MAX as usize) / std::mem::size_of::<$t>()
                    }
                };

                const UNDEFINED: Self = 0;

                #[inline(always)]
                fn index(self) -> usize {
                    self as usize
                }

                #[inline(always)]
                fn from_index(index: usize) -> Self {
                    index as $t
                }
            }
        )*
    };
}

impl_pt!(u8, u16, u32);

#[cfg(target_pointer_width = "64")]
impl_pt!(u64);
