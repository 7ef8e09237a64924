//! Error types for the blockgraph core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes
//! and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::builder::SamplingStrategy;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced while validating or running a block model.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BlockModelError {
    /// The probability matrix had no rows.
    #[error("probability matrix must have at least one row")]
    EmptyMatrix,
    /// A row of the probability matrix did not match the row count.
    #[error("matrix not square: row {row} has {len} entries but the matrix has {expected} rows")]
    NonSquareMatrix {
        /// Index of the offending row.
        row: usize,
        /// Number of entries in that row.
        len: usize,
        /// Number of rows in the matrix.
        expected: usize,
    },
    /// `matrix[row][column]` differs from `matrix[column][row]`.
    #[error("matrix not symmetric: entry ({row}, {column}) is {upper} but ({column}, {row}) is {lower}")]
    AsymmetricMatrix {
        /// Row of the first mismatching entry.
        row: usize,
        /// Column of the first mismatching entry.
        column: usize,
        /// Value stored at `(row, column)`.
        upper: f64,
        /// Value stored at `(column, row)`.
        lower: f64,
    },
    /// A matrix entry was NaN.
    #[error("probability at ({row}, {column}) is NaN")]
    NanProbability {
        /// Row of the NaN entry.
        row: usize,
        /// Column of the NaN entry.
        column: usize,
    },
    /// The model must contain at least one community.
    #[error("community count must be at least 1 (got {got})")]
    InvalidCommunityCount {
        /// The community count supplied by the caller.
        got: usize,
    },
    /// More communities were requested than the matrix has rows.
    #[error("{communities} communities requested but the probability matrix is {dimension}x{dimension}")]
    CommunityCountExceedsMatrix {
        /// Number of communities requested.
        communities: usize,
        /// Dimension of the probability matrix.
        dimension: usize,
    },
    /// A caller-supplied label referenced a community that does not exist.
    #[error("vertex {vertex} has label {label} but only {communities} communities exist")]
    LabelOutOfRange {
        /// Vertex carrying the invalid label.
        vertex: usize,
        /// The invalid label.
        label: usize,
        /// Number of communities the labels were validated against.
        communities: usize,
    },
    /// Caller-supplied labels did not cover the configured vertex count.
    #[error("model expects {expected} vertices but {actual} labels were supplied")]
    VertexCountMismatch {
        /// Vertex count configured on the model.
        expected: usize,
        /// Number of labels supplied.
        actual: usize,
    },
    /// The requested sampling strategy is not compiled into this build.
    #[error("the requested sampling strategy {requested:?} is not available in this build")]
    StrategyUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: SamplingStrategy,
    },
}

define_error_codes! {
    /// Stable codes describing [`BlockModelError`] variants.
    enum BlockModelErrorCode for BlockModelError {
        /// The probability matrix had no rows.
        EmptyMatrix => EmptyMatrix => "BLOCKGRAPH_EMPTY_MATRIX",
        /// A row of the probability matrix did not match the row count.
        NonSquareMatrix => NonSquareMatrix { .. } => "BLOCKGRAPH_NON_SQUARE_MATRIX",
        /// The probability matrix was not symmetric.
        AsymmetricMatrix => AsymmetricMatrix { .. } => "BLOCKGRAPH_ASYMMETRIC_MATRIX",
        /// A matrix entry was NaN.
        NanProbability => NanProbability { .. } => "BLOCKGRAPH_NAN_PROBABILITY",
        /// The model must contain at least one community.
        InvalidCommunityCount => InvalidCommunityCount { .. } => "BLOCKGRAPH_INVALID_COMMUNITY_COUNT",
        /// More communities were requested than the matrix has rows.
        CommunityCountExceedsMatrix => CommunityCountExceedsMatrix { .. } => "BLOCKGRAPH_COMMUNITY_COUNT_EXCEEDS_MATRIX",
        /// A caller-supplied label referenced a missing community.
        LabelOutOfRange => LabelOutOfRange { .. } => "BLOCKGRAPH_LABEL_OUT_OF_RANGE",
        /// Caller-supplied labels did not cover the configured vertex count.
        VertexCountMismatch => VertexCountMismatch { .. } => "BLOCKGRAPH_VERTEX_COUNT_MISMATCH",
        /// The requested sampling strategy is not compiled into this build.
        StrategyUnavailable => StrategyUnavailable { .. } => "BLOCKGRAPH_STRATEGY_UNAVAILABLE",
    }
}

impl BlockModelError {
    /// Returns whether the error rejected the probability matrix itself, as
    /// opposed to the community configuration or labels.
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::BlockModelError;
    ///
    /// assert!(BlockModelError::EmptyMatrix.is_invalid_model());
    /// assert!(!BlockModelError::InvalidCommunityCount { got: 0 }.is_invalid_model());
    /// ```
    #[must_use]
    pub const fn is_invalid_model(&self) -> bool {
        matches!(
            self,
            Self::EmptyMatrix
                | Self::NonSquareMatrix { .. }
                | Self::AsymmetricMatrix { .. }
                | Self::NanProbability { .. }
        )
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, BlockModelError>;
