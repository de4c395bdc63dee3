//! Tropical semirings over primitive integers.
//!
//! These are plain value types for use alongside partial permutations in semigroup computations;
//! nothing in [`pperm`][`crate::pperm`] depends on them.

use std::marker::PhantomData;

use num_traits::{PrimInt, Signed};

/// A semiring on a type of values.
pub trait Semiring {
    /// Type of the semiring's elements.
    type Value: Copy;

    /// The multiplicative identity.
    fn one(&self) -> Self::Value;

    /// The additive identity, which is absorbing for multiplication.
    fn zero(&self) -> Self::Value;

    /// Semiring addition.
    fn plus(&self, x: Self::Value, y: Self::Value) -> Self::Value;

    /// Semiring multiplication.
    fn prod(&self, x: Self::Value, y: Self::Value) -> Self::Value;
}

/// The max-plus semiring, with `max` as addition and `+` as multiplication.
///
/// The smallest value of `T` plays the role of negative infinity. Sums saturate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaxPlus<T>(PhantomData<T>);

/// The min-plus semiring, with `min` as addition and `+` as multiplication.
///
/// The largest value of `T` plays the role of infinity. Sums saturate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinPlus<T>(PhantomData<T>);

impl<T> MaxPlus<T> {
    /// Returns the max-plus semiring on `T`.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> MinPlus<T> {
    /// Returns the min-plus semiring on `T`.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: PrimInt + Signed> Semiring for MaxPlus<T> {
    type Value = T;

    #[inline]
    fn one(&self) -> T {
        T::zero()
    }

    #[inline]
    fn zero(&self) -> T {
        T::min_value()
    }

    #[inline]
    fn plus(&self, x: T, y: T) -> T {
        x.max(y)
    }

    #[inline]
    fn prod(&self, x: T, y: T) -> T {
        if x == self.zero() || y == self.zero() {
            self.zero()
        } else {
            x.saturating_add(y)
        }
    }
}

impl<T: PrimInt> Semiring for MinPlus<T> {
    type Value = T;

    #[inline]
    fn one(&self) -> T {
        T::zero()
    }

    #[inline]
    fn zero(&self) -> T {
        T::max_value()
    }

    #[inline]
    fn plus(&self, x: T, y: T) -> T {
        x.min(y)
    }

    #[inline]
    fn prod(&self, x: T, y: T) -> T {
        if x == self.zero() || y == self.zero() {
            self.zero()
        } else {
            x.saturating_add(y)
        }
    }
}
