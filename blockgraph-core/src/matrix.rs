//! Validated community-to-community edge probabilities.
//!
//! A [`ProbabilityMatrix`] is the only model input that is checked up front:
//! it must be square, symmetric and free of NaNs. Entries outside `[0, 1]`
//! are accepted; the sampler treats anything above `1` as a certain edge and
//! anything below `0` as an impossible one.

use tracing::warn;

use crate::{Result, error::BlockModelError};

/// Square, symmetric matrix of edge probabilities between communities.
///
/// Entry `(i, j)` is the probability that a vertex in community `i` and a
/// vertex in community `j` are adjacent. The matrix is immutable once
/// constructed.
///
/// # Examples
/// ```
/// use blockgraph_core::ProbabilityMatrix;
///
/// let matrix = ProbabilityMatrix::from_rows(vec![
///     vec![0.9, 0.1],
///     vec![0.1, 0.8],
/// ])?;
/// assert_eq!(matrix.dimension(), 2);
/// assert_eq!(matrix.probability(0, 1), Some(0.1));
/// # Ok::<(), blockgraph_core::BlockModelError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMatrix {
    dimension: usize,
    entries: Vec<f64>,
}

impl ProbabilityMatrix {
    /// Validates `rows` and builds a matrix, requiring exact symmetry.
    ///
    /// # Errors
    /// Returns [`BlockModelError::EmptyMatrix`] when `rows` is empty,
    /// [`BlockModelError::NonSquareMatrix`] when a row length differs from
    /// the row count, [`BlockModelError::NanProbability`] when an entry is
    /// NaN and [`BlockModelError::AsymmetricMatrix`] when
    /// `rows[i][j] != rows[j][i]` for some pair.
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::{BlockModelError, ProbabilityMatrix};
    ///
    /// let err = ProbabilityMatrix::from_rows(vec![vec![0.5, 0.2], vec![0.3, 0.5]])
    ///     .expect_err("asymmetric input must be rejected");
    /// assert!(matches!(err, BlockModelError::AsymmetricMatrix { row: 0, column: 1, .. }));
    /// ```
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows_with_tolerance(rows, 0.0)
    }

    /// Validates `rows` like [`Self::from_rows`] but treats entries whose
    /// absolute difference is at most `tolerance` as equal.
    ///
    /// Useful for matrices produced by arithmetic rather than written as
    /// literals. A negative or NaN tolerance behaves like exact comparison.
    ///
    /// # Errors
    /// Returns the same errors as [`Self::from_rows`].
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::ProbabilityMatrix;
    ///
    /// let third = 1.0 / 3.0;
    /// let matrix = ProbabilityMatrix::from_rows_with_tolerance(
    ///     vec![vec![0.5, third], vec![1.0 - 2.0 * third, 0.5]],
    ///     1e-12,
    /// )?;
    /// assert_eq!(matrix.dimension(), 2);
    /// # Ok::<(), blockgraph_core::BlockModelError>(())
    /// ```
    pub fn from_rows_with_tolerance(rows: Vec<Vec<f64>>, tolerance: f64) -> Result<Self> {
        let dimension = rows.len();
        if dimension == 0 {
            return Err(BlockModelError::EmptyMatrix);
        }
        let mut entries = Vec::with_capacity(dimension * dimension);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dimension {
                return Err(BlockModelError::NonSquareMatrix {
                    row,
                    len: values.len(),
                    expected: dimension,
                });
            }
            if let Some(column) = values.iter().position(|value| value.is_nan()) {
                return Err(BlockModelError::NanProbability { row, column });
            }
            entries.extend(values);
        }

        let matrix = Self { dimension, entries };
        matrix.check_symmetry(tolerance)?;
        Ok(matrix)
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "tolerant comparison needs the absolute difference"
    )]
    fn check_symmetry(&self, tolerance: f64) -> Result<()> {
        for row in 0..self.dimension {
            for column in (row + 1)..self.dimension {
                let (Some(upper), Some(lower)) =
                    (self.probability(row, column), self.probability(column, row))
                else {
                    continue;
                };
                // Exact equality first so infinities of the same sign match.
                if upper == lower || (upper - lower).abs() <= tolerance {
                    continue;
                }
                warn!(row, column, upper, lower, "rejecting asymmetric probability matrix");
                return Err(BlockModelError::AsymmetricMatrix {
                    row,
                    column,
                    upper,
                    lower,
                });
            }
        }
        Ok(())
    }

    /// Number of rows (and columns).
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the probability for the community pair `(row, column)`, or
    /// `None` when either index is out of range.
    #[must_use]
    pub fn probability(&self, row: usize, column: usize) -> Option<f64> {
        if column >= self.dimension {
            return None;
        }
        self.row(row)?.get(column).copied()
    }

    /// Returns one row of the matrix.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let start = row.checked_mul(self.dimension)?;
        self.entries.get(start..start.checked_add(self.dimension)?)
    }

    /// Iterates the rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.entries.chunks_exact(self.dimension)
    }
}

impl Default for ProbabilityMatrix {
    /// Four-community reference model: one sparse community, two densely
    /// interlinked ones and a weakly attached fourth.
    fn default() -> Self {
        let rows = [
            [0.0, 0.1, 0.1, 0.01],
            [0.1, 0.9, 0.9, 0.01],
            [0.1, 0.9, 0.5, 0.01],
            [0.01, 0.01, 0.01, 0.1],
        ];
        Self {
            dimension: rows.len(),
            entries: rows.into_iter().flatten().collect(),
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for ProbabilityMatrix {
    type Error = BlockModelError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}
