//! Closed-form expected degrees and their empirical counterparts.
//!
//! The expectation for community `i` is `Σ_j p[i][j] * n_j`, the product of
//! the leading `k x k` block of the probability matrix with the community
//! size vector. It depends only on the matrix and the labels, never on a
//! sampled graph.

use tracing::{debug, instrument};

use crate::{
    Result, adjacency::AdjacencyStructure, error::BlockModelError, labels::CommunityLabels,
    matrix::ProbabilityMatrix,
};

/// Whether a vertex counts itself among the potential neighbours in its own
/// community.
///
/// [`SelfPairing::Included`] multiplies the diagonal probability by the full
/// community size `n_i`. [`SelfPairing::Excluded`] uses `n_i - 1`, which is
/// the exact mean degree under the sampler since loops are never drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SelfPairing {
    /// Use `n_i` for the vertex's own community.
    #[default]
    Included,
    /// Use `n_i - 1` for the vertex's own community.
    Excluded,
}

/// Expected degree per community, indexed by community.
///
/// # Examples
/// ```
/// use blockgraph_core::{CommunityLabels, ProbabilityMatrix, expected_degrees};
///
/// let matrix = ProbabilityMatrix::from_rows(vec![vec![0.5, 0.1], vec![0.1, 0.2]])?;
/// let labels = CommunityLabels::from_labels(vec![0, 0, 1, 1, 1, 1], 2)?;
/// let degrees = expected_degrees(&matrix, &labels, 2)?;
/// assert_eq!(degrees.as_slice(), &[0.5 * 2.0 + 0.1 * 4.0, 0.1 * 2.0 + 0.2 * 4.0]);
/// # Ok::<(), blockgraph_core::BlockModelError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpectedDegrees(Vec<f64>);

impl ExpectedDegrees {
    /// Expected degree of a vertex in `community`.
    #[must_use]
    pub fn get(&self, community: usize) -> Option<f64> {
        self.0.get(community).copied()
    }

    /// Number of communities covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no communities are covered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values in community order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Iterates the values in community order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl From<ExpectedDegrees> for Vec<f64> {
    fn from(degrees: ExpectedDegrees) -> Self {
        degrees.0
    }
}

/// Expected degree of each of the first `community_count` communities,
/// counting a vertex's own community at full size.
///
/// Communities without vertices contribute nothing, so an empty community's
/// own entry only reflects its links to populated ones.
///
/// # Errors
/// Returns [`BlockModelError::CommunityCountExceedsMatrix`] when
/// `community_count` exceeds the matrix dimension.
pub fn expected_degrees(
    matrix: &ProbabilityMatrix,
    labels: &CommunityLabels,
    community_count: usize,
) -> Result<ExpectedDegrees> {
    expected_degrees_with(matrix, labels, community_count, SelfPairing::Included)
}

/// Expected degrees with an explicit [`SelfPairing`] convention.
///
/// # Errors
/// Returns [`BlockModelError::CommunityCountExceedsMatrix`] when
/// `community_count` exceeds the matrix dimension.
///
/// # Examples
/// ```
/// use blockgraph_core::{CommunityLabels, ProbabilityMatrix, SelfPairing, expected_degrees_with};
///
/// let matrix = ProbabilityMatrix::from_rows(vec![vec![1.0]])?;
/// let labels = CommunityLabels::from_labels(vec![0; 4], 1)?;
/// let inclusive = expected_degrees_with(&matrix, &labels, 1, SelfPairing::Included)?;
/// let exclusive = expected_degrees_with(&matrix, &labels, 1, SelfPairing::Excluded)?;
/// assert_eq!(inclusive.as_slice(), &[4.0]);
/// assert_eq!(exclusive.as_slice(), &[3.0]);
/// # Ok::<(), blockgraph_core::BlockModelError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the expectation is a real-valued dot product over vertex counts"
)]
#[instrument(
    name = "core.expected_degrees",
    err,
    skip(matrix, labels),
    fields(vertices = labels.len(), dimension = matrix.dimension()),
)]
pub fn expected_degrees_with(
    matrix: &ProbabilityMatrix,
    labels: &CommunityLabels,
    community_count: usize,
    self_pairing: SelfPairing,
) -> Result<ExpectedDegrees> {
    if community_count > matrix.dimension() {
        return Err(BlockModelError::CommunityCountExceedsMatrix {
            communities: community_count,
            dimension: matrix.dimension(),
        });
    }

    let mut sizes = vec![0_usize; community_count];
    for label in labels.iter() {
        if let Some(size) = sizes.get_mut(label) {
            *size += 1;
        }
    }

    let degrees: Vec<f64> = matrix
        .rows()
        .take(community_count)
        .enumerate()
        .map(|(community, row)| {
            row.iter()
                .zip(&sizes)
                .enumerate()
                .map(|(other, (&probability, &size))| {
                    let neighbours = match self_pairing {
                        SelfPairing::Excluded if other == community => size.saturating_sub(1),
                        _ => size,
                    };
                    probability * neighbours as f64
                })
                .sum()
        })
        .collect();
    debug!(?degrees, "expected degrees computed");
    Ok(ExpectedDegrees(degrees))
}

/// Mean realized degree of the vertices in each community.
///
/// Empty communities report `0.0`. Vertices beyond the graph's vertex count
/// are ignored.
///
/// # Examples
/// ```
/// use blockgraph_core::{AdjacencyStructure, CommunityLabels, realized_mean_degrees};
///
/// let graph = AdjacencyStructure::complete(3);
/// let labels = CommunityLabels::from_labels(vec![0, 0, 0], 2)?;
/// assert_eq!(realized_mean_degrees(&graph, &labels), vec![2.0, 0.0]);
/// # Ok::<(), blockgraph_core::BlockModelError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "a mean over vertex counts is real-valued"
)]
#[must_use]
pub fn realized_mean_degrees(graph: &AdjacencyStructure, labels: &CommunityLabels) -> Vec<f64> {
    let communities = labels.community_count().get();
    let mut totals = vec![(0_usize, 0_usize); communities];
    for (degree, label) in graph.degrees().into_iter().zip(labels.iter()) {
        if let Some((sum, count)) = totals.get_mut(label) {
            *sum += degree;
            *count += 1;
        }
    }
    totals
        .into_iter()
        .map(|(sum, count)| {
            if count == 0 {
                0.0
            } else {
                sum as f64 / count as f64
            }
        })
        .collect()
}
