use thiserror::Error;

/// Error type for constructing partial permutations.
///
/// See [`Error::kind`] for a coarse classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An input value was negative.
    #[error("negative value at position {position}")]
    NegativeValue {
        /// Position of the offending value in its input sequence.
        position: usize,
    },
    /// An input value does not fit the point type.
    #[error("value at position {position} exceeds the maximal degree {max_degree}")]
    ValueTooLarge {
        /// Position of the offending value in its input sequence.
        position: usize,
        /// Largest point supported by the point type.
        max_degree: usize,
    },
    /// A dense image list is longer than the largest point supported by the point type.
    #[error("degree {degree} exceeds the maximal degree {max_degree}")]
    DegreeTooLarge {
        /// Required degree.
        degree: usize,
        /// Largest point supported by the point type.
        max_degree: usize,
    },
    /// A sparse domain or range contains the undefined point `0`.
    #[error("undefined point at position {position}")]
    ZeroPoint {
        /// Position of the offending value in its input sequence.
        position: usize,
    },
    /// A sparse domain is not strictly ascending.
    #[error("domain is not strictly ascending at position {position}")]
    UnsortedDomain {
        /// Position of the first point not greater than its predecessor.
        position: usize,
    },
    /// Two points share the same image.
    #[error("image {image} at position {position} is repeated")]
    RepeatedImage {
        /// Position of the second occurrence.
        position: usize,
        /// The repeated image.
        image: usize,
    },
    /// Sparse domain and range have different lengths.
    #[error("domain and range lengths differ ({dom_len} != {ran_len})")]
    LengthMismatch {
        /// Length of the domain.
        dom_len: usize,
        /// Length of the range.
        ran_len: usize,
    },
    /// A packed record is not a well-formed partial permutation.
    #[error("malformed partial permutation: {0}")]
    Malformed(&'static str),
}

/// Coarse classification of [`Error`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed construction arguments.
    InvalidInput,
    /// The value operated on is not a well-formed partial permutation.
    PreconditionViolation,
}

impl Error {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Malformed(_) => ErrorKind::PreconditionViolation,
            _ => ErrorKind::InvalidInput,
        }
    }
}
