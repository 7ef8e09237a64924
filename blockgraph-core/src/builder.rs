//! Builder utilities for configuring block-model generation.
//!
//! Exposes the sampling strategy selection surface and the validation that
//! runs before a [`BlockModel`] is constructed.

use std::num::NonZeroUsize;

use crate::{
    Result, degree::SelfPairing, error::BlockModelError, matrix::ProbabilityMatrix,
    model::BlockModel,
};

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// Selects how [`BlockModel::generate`] walks the vertex-pair triangle.
///
/// `Sequential` draws every pair from a single random stream seeded by the
/// model, so the whole run is reproducible from one seed. `Parallel` splits
/// the triangle by row across the rayon pool with one stream per row; it is
/// equally reproducible but yields different graphs than `Sequential`.
///
/// # Examples
/// ```
/// use blockgraph_core::SamplingStrategy;
///
/// assert_eq!(SamplingStrategy::default(), SamplingStrategy::Sequential);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SamplingStrategy {
    /// Sample every pair on the calling thread from one stream.
    #[default]
    Sequential,
    /// Sample rows concurrently with one stream per row.
    Parallel,
}

/// Configures and constructs [`BlockModel`] instances.
///
/// # Examples
/// ```
/// use blockgraph_core::{BlockModelBuilder, ProbabilityMatrix, SamplingStrategy};
///
/// let model = BlockModelBuilder::new()
///     .with_vertex_count(12)
///     .with_community_count(2)
///     .with_matrix(ProbabilityMatrix::from_rows(vec![vec![0.7, 0.1], vec![0.1, 0.7]])?)
///     .with_seed(3)
///     .build()?;
/// assert_eq!(model.vertex_count(), 12);
/// assert_eq!(model.community_count().get(), 2);
/// assert_eq!(model.sampling_strategy(), SamplingStrategy::Sequential);
/// # Ok::<(), blockgraph_core::BlockModelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BlockModelBuilder {
    vertex_count: usize,
    community_count: usize,
    matrix: ProbabilityMatrix,
    seed: u64,
    sampling_strategy: SamplingStrategy,
    self_pairing: SelfPairing,
}

impl Default for BlockModelBuilder {
    fn default() -> Self {
        Self {
            vertex_count: 50,
            community_count: 2,
            matrix: ProbabilityMatrix::default(),
            seed: DEFAULT_SEED,
            sampling_strategy: SamplingStrategy::Sequential,
            self_pairing: SelfPairing::Included,
        }
    }
}

impl BlockModelBuilder {
    /// Creates a builder populated with default parameters: 50 vertices, two
    /// communities and the four-community reference matrix.
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::BlockModelBuilder;
    ///
    /// let builder = BlockModelBuilder::new();
    /// assert_eq!(builder.vertex_count(), 50);
    /// assert_eq!(builder.community_count(), 2);
    /// assert_eq!(builder.matrix().dimension(), 4);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of vertices.
    #[must_use]
    pub fn with_vertex_count(mut self, vertex_count: usize) -> Self {
        self.vertex_count = vertex_count;
        self
    }

    /// Returns the configured number of vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Overrides the number of communities labels are drawn from.
    #[must_use]
    pub fn with_community_count(mut self, community_count: usize) -> Self {
        self.community_count = community_count;
        self
    }

    /// Returns the configured number of communities.
    #[must_use]
    pub const fn community_count(&self) -> usize {
        self.community_count
    }

    /// Replaces the probability matrix.
    ///
    /// The matrix may be larger than the community count; extra rows and
    /// columns are ignored.
    #[must_use]
    pub fn with_matrix(mut self, matrix: ProbabilityMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    /// Returns the configured probability matrix.
    #[must_use]
    pub const fn matrix(&self) -> &ProbabilityMatrix {
        &self.matrix
    }

    /// Overrides the seed used by [`BlockModel::generate`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Sets the strategy used to sample the adjacency structure.
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::{BlockModelBuilder, SamplingStrategy};
    ///
    /// let builder = BlockModelBuilder::new().with_sampling_strategy(SamplingStrategy::Parallel);
    /// assert_eq!(builder.sampling_strategy(), SamplingStrategy::Parallel);
    /// ```
    #[must_use]
    pub fn with_sampling_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.sampling_strategy = strategy;
        self
    }

    /// Returns the configured sampling strategy.
    #[must_use]
    pub const fn sampling_strategy(&self) -> SamplingStrategy {
        self.sampling_strategy
    }

    /// Chooses whether expected degrees count a vertex's own community at
    /// full size.
    #[must_use]
    pub fn with_self_pairing(mut self, self_pairing: SelfPairing) -> Self {
        self.self_pairing = self_pairing;
        self
    }

    /// Returns the configured self-pairing convention.
    #[must_use]
    pub const fn self_pairing(&self) -> SelfPairing {
        self.self_pairing
    }

    /// Validates the configuration and constructs a [`BlockModel`].
    ///
    /// The vertex count is not validated; zero vertices produce an empty
    /// graph.
    ///
    /// # Errors
    /// Returns [`BlockModelError::InvalidCommunityCount`] when the community
    /// count is zero, [`BlockModelError::CommunityCountExceedsMatrix`] when it
    /// exceeds the matrix dimension and
    /// [`BlockModelError::StrategyUnavailable`] when the parallel strategy is
    /// requested without the `parallel` feature.
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::{BlockModelBuilder, BlockModelError};
    ///
    /// let err = BlockModelBuilder::new()
    ///     .with_community_count(5)
    ///     .build()
    ///     .expect_err("the default matrix only has four communities");
    /// assert!(matches!(
    ///     err,
    ///     BlockModelError::CommunityCountExceedsMatrix { communities: 5, dimension: 4 }
    /// ));
    /// ```
    pub fn build(self) -> Result<BlockModel> {
        let community_count = NonZeroUsize::new(self.community_count).ok_or(
            BlockModelError::InvalidCommunityCount {
                got: self.community_count,
            },
        )?;
        if self.community_count > self.matrix.dimension() {
            return Err(BlockModelError::CommunityCountExceedsMatrix {
                communities: self.community_count,
                dimension: self.matrix.dimension(),
            });
        }
        #[cfg(not(feature = "parallel"))]
        if self.sampling_strategy == SamplingStrategy::Parallel {
            return Err(BlockModelError::StrategyUnavailable {
                requested: SamplingStrategy::Parallel,
            });
        }

        Ok(BlockModel::new(
            self.vertex_count,
            community_count,
            self.matrix,
            self.seed,
            self.sampling_strategy,
            self.self_pairing,
        ))
    }
}
