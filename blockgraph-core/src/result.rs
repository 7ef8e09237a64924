//! Output of a generation run.
//!
//! Bundles the three artefacts handed to presentation code: community labels,
//! the sampled adjacency structure and the closed-form expected degrees.

use crate::{
    adjacency::AdjacencyStructure,
    degree::{ExpectedDegrees, realized_mean_degrees},
    labels::CommunityLabels,
};

/// Represents the output of a [`crate::BlockModel::generate`] invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedGraph {
    labels: CommunityLabels,
    adjacency: AdjacencyStructure,
    expected_degrees: ExpectedDegrees,
}

/// Per-community digest for reporting consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunitySummary {
    /// Community index.
    pub community: usize,
    /// Vertices labelled with this community, ascending.
    pub members: Vec<usize>,
    /// Closed-form expected degree.
    pub expected_degree: f64,
    /// Mean degree observed in the sampled graph; `0.0` when empty.
    pub realized_mean_degree: f64,
}

impl GeneratedGraph {
    pub(crate) const fn new(
        labels: CommunityLabels,
        adjacency: AdjacencyStructure,
        expected_degrees: ExpectedDegrees,
    ) -> Self {
        Self {
            labels,
            adjacency,
            expected_degrees,
        }
    }

    /// Community label of every vertex.
    #[must_use]
    pub const fn labels(&self) -> &CommunityLabels {
        &self.labels
    }

    /// The sampled graph.
    #[must_use]
    pub const fn adjacency(&self) -> &AdjacencyStructure {
        &self.adjacency
    }

    /// Expected degree per community.
    #[must_use]
    pub const fn expected_degrees(&self) -> &ExpectedDegrees {
        &self.expected_degrees
    }

    /// One summary per community, in community order.
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::{BlockModelBuilder, ProbabilityMatrix};
    ///
    /// let generated = BlockModelBuilder::new()
    ///     .with_vertex_count(3)
    ///     .with_community_count(1)
    ///     .with_matrix(ProbabilityMatrix::from_rows(vec![vec![1.0]])?)
    ///     .build()?
    ///     .generate()?;
    /// let summaries = generated.community_summaries();
    /// assert_eq!(summaries[0].members, vec![0, 1, 2]);
    /// assert_eq!(summaries[0].expected_degree, 3.0);
    /// assert_eq!(summaries[0].realized_mean_degree, 2.0);
    /// # Ok::<(), blockgraph_core::BlockModelError>(())
    /// ```
    #[must_use]
    pub fn community_summaries(&self) -> Vec<CommunitySummary> {
        let realized = realized_mean_degrees(&self.adjacency, &self.labels);
        self.expected_degrees
            .iter()
            .zip(realized)
            .enumerate()
            .map(|(community, (expected_degree, realized_mean_degree))| CommunitySummary {
                community,
                members: self.labels.members(community).collect(),
                expected_degree,
                realized_mean_degree,
            })
            .collect()
    }

    /// Splits the result into its parts.
    #[must_use]
    pub fn into_parts(self) -> (CommunityLabels, AdjacencyStructure, ExpectedDegrees) {
        (self.labels, self.adjacency, self.expected_degrees)
    }
}
