//! Generation orchestration for the blockgraph library.
//!
//! Provides the [`BlockModel`] entry point, which owns the immutable model
//! parameters and runs label assignment, sampling and degree expectation in
//! that order.

use std::num::NonZeroUsize;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{info, instrument};

use crate::{
    Result,
    adjacency::AdjacencyStructure,
    builder::SamplingStrategy,
    degree::{SelfPairing, expected_degrees_with},
    error::BlockModelError,
    labels::CommunityLabels,
    matrix::ProbabilityMatrix,
    result::GeneratedGraph,
    sampler::BlockSampler,
};

/// Validated stochastic block model ready to generate graphs.
///
/// Built by [`crate::BlockModelBuilder`]; every field is fixed for the
/// lifetime of the value.
///
/// # Examples
/// ```
/// use blockgraph_core::BlockModelBuilder;
///
/// let model = BlockModelBuilder::new().with_seed(11).build()?;
/// let first = model.generate()?;
/// let second = model.generate()?;
/// assert_eq!(first, second);
/// assert_eq!(first.labels().len(), 50);
/// assert_eq!(first.expected_degrees().len(), 2);
/// # Ok::<(), blockgraph_core::BlockModelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BlockModel {
    vertex_count: usize,
    community_count: NonZeroUsize,
    matrix: ProbabilityMatrix,
    seed: u64,
    sampling_strategy: SamplingStrategy,
    self_pairing: SelfPairing,
}

impl BlockModel {
    pub(crate) const fn new(
        vertex_count: usize,
        community_count: NonZeroUsize,
        matrix: ProbabilityMatrix,
        seed: u64,
        sampling_strategy: SamplingStrategy,
        self_pairing: SelfPairing,
    ) -> Self {
        Self {
            vertex_count,
            community_count,
            matrix,
            seed,
            sampling_strategy,
            self_pairing,
        }
    }

    /// Number of vertices in generated graphs.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of communities labels are drawn from.
    #[must_use]
    pub const fn community_count(&self) -> NonZeroUsize {
        self.community_count
    }

    /// The validated probability matrix.
    #[must_use]
    pub const fn matrix(&self) -> &ProbabilityMatrix {
        &self.matrix
    }

    /// Seed used by [`Self::generate`].
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Strategy used to sample the adjacency structure.
    #[must_use]
    pub const fn sampling_strategy(&self) -> SamplingStrategy {
        self.sampling_strategy
    }

    /// Self-pairing convention used for expected degrees.
    #[must_use]
    pub const fn self_pairing(&self) -> SelfPairing {
        self.self_pairing
    }

    /// Generates a graph from a fresh [`SmallRng`] seeded with
    /// [`Self::seed`], so repeated calls return identical results.
    ///
    /// # Errors
    /// Never fails for a model produced by the builder; the error path exists
    /// for the invariants checked by [`BlockSampler::new`].
    pub fn generate(&self) -> Result<GeneratedGraph> {
        self.generate_with_rng(&mut SmallRng::seed_from_u64(self.seed))
    }

    /// Generates a graph drawing labels and edges from `rng`.
    ///
    /// # Errors
    /// See [`Self::generate`].
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::BlockModelBuilder;
    /// use rand::{SeedableRng, rngs::SmallRng};
    ///
    /// let model = BlockModelBuilder::new().with_vertex_count(20).build()?;
    /// let generated = model.generate_with_rng(&mut SmallRng::seed_from_u64(5))?;
    /// assert_eq!(generated.adjacency().vertex_count(), 20);
    /// # Ok::<(), blockgraph_core::BlockModelError>(())
    /// ```
    #[instrument(
        name = "core.generate",
        err,
        skip_all,
        fields(
            vertices = self.vertex_count,
            communities = self.community_count.get(),
            strategy = ?self.sampling_strategy,
        ),
    )]
    pub fn generate_with_rng<R: Rng>(&self, rng: &mut R) -> Result<GeneratedGraph> {
        let labels = CommunityLabels::assign(self.vertex_count, self.community_count, rng);
        self.complete(labels, rng)
    }

    /// Generates a graph for fixed, caller-chosen labels, drawing edges from
    /// a [`SmallRng`] seeded with [`Self::seed`].
    ///
    /// # Errors
    /// Returns [`BlockModelError::VertexCountMismatch`] when `labels` does not
    /// have one entry per vertex and [`BlockModelError::LabelOutOfRange`] when
    /// a label is not below the community count.
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::{BlockModelBuilder, ProbabilityMatrix};
    ///
    /// let model = BlockModelBuilder::new()
    ///     .with_vertex_count(4)
    ///     .with_community_count(1)
    ///     .with_matrix(ProbabilityMatrix::from_rows(vec![vec![1.0]])?)
    ///     .build()?;
    /// let generated = model.generate_with_labels(vec![0, 0, 0, 0])?;
    /// assert_eq!(generated.adjacency().edge_count(), 6);
    /// assert_eq!(generated.expected_degrees().as_slice(), &[4.0]);
    /// # Ok::<(), blockgraph_core::BlockModelError>(())
    /// ```
    #[instrument(
        name = "core.generate",
        err,
        skip_all,
        fields(
            vertices = self.vertex_count,
            communities = self.community_count.get(),
            strategy = ?self.sampling_strategy,
        ),
    )]
    pub fn generate_with_labels(&self, labels: Vec<usize>) -> Result<GeneratedGraph> {
        if labels.len() != self.vertex_count {
            return Err(BlockModelError::VertexCountMismatch {
                expected: self.vertex_count,
                actual: labels.len(),
            });
        }
        let validated = CommunityLabels::from_labels(labels, self.community_count.get())?;
        self.complete(validated, &mut SmallRng::seed_from_u64(self.seed))
    }

    fn complete<R: Rng>(&self, labels: CommunityLabels, rng: &mut R) -> Result<GeneratedGraph> {
        let adjacency = self.sample(&labels, rng)?;
        let expected = expected_degrees_with(
            &self.matrix,
            &labels,
            self.community_count.get(),
            self.self_pairing,
        )?;
        info!(edges = adjacency.edge_count(), "generation completed");
        Ok(GeneratedGraph::new(labels, adjacency, expected))
    }

    fn sample<R: Rng>(&self, labels: &CommunityLabels, rng: &mut R) -> Result<AdjacencyStructure> {
        let sampler = BlockSampler::new(&self.matrix, labels)?;
        match self.sampling_strategy {
            SamplingStrategy::Sequential => Ok(sampler.sample(rng)),
            #[cfg(feature = "parallel")]
            SamplingStrategy::Parallel => Ok(sampler.sample_parallel(rng.next_u64())),
            #[cfg(not(feature = "parallel"))]
            SamplingStrategy::Parallel => Err(BlockModelError::StrategyUnavailable {
                requested: SamplingStrategy::Parallel,
            }),
        }
    }
}
