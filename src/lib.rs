//! Partial permutations of small positive integers, for use in semigroup computations.
//!
//! The main type is [`PartPerm`][`pperm::PartPerm`], an injective map between subsets of the
//! points `1..=degree`, supporting composition and inversion. Additionally [`semiring`] provides
//! the max-plus and min-plus semirings.

#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::comparison_chain)]

pub mod point;
pub mod pperm;
#[cfg(feature = "rand")]
pub mod rand;
pub mod semiring;
