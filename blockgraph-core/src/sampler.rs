//! Edge sampling for the stochastic block model.
//!
//! Each unordered vertex pair `(i, j)` with `j < i` is visited exactly once.
//! The pair's probability is looked up from the communities of both
//! endpoints, a uniform `u` in `[0, 1)` is drawn and the edge exists iff
//! `u <= p`. Pairs are therefore independent given the labels.

use rand::Rng;
#[cfg(feature = "parallel")]
use rand::{SeedableRng, rngs::SmallRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    Result,
    adjacency::{AdjacencyStructure, pair_count},
    error::BlockModelError,
    labels::CommunityLabels,
    matrix::ProbabilityMatrix,
};

/// Samples adjacency structures for a fixed matrix and label assignment.
///
/// # Examples
/// ```
/// use blockgraph_core::{BlockSampler, CommunityLabels, ProbabilityMatrix};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let matrix = ProbabilityMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]])?;
/// let labels = CommunityLabels::from_labels(vec![0, 0, 1, 1], 2)?;
/// let sampler = BlockSampler::new(&matrix, &labels)?;
/// let graph = sampler.sample(&mut SmallRng::seed_from_u64(1));
/// assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(0, 1), (2, 3)]);
/// # Ok::<(), blockgraph_core::BlockModelError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlockSampler<'a> {
    matrix: &'a ProbabilityMatrix,
    labels: &'a CommunityLabels,
}

impl<'a> BlockSampler<'a> {
    /// Pairs a matrix with labels, checking that every label has a row.
    ///
    /// # Errors
    /// Returns [`BlockModelError::CommunityCountExceedsMatrix`] when the
    /// labels range over more communities than the matrix dimension.
    pub fn new(matrix: &'a ProbabilityMatrix, labels: &'a CommunityLabels) -> Result<Self> {
        let communities = labels.community_count().get();
        if communities > matrix.dimension() {
            return Err(BlockModelError::CommunityCountExceedsMatrix {
                communities,
                dimension: matrix.dimension(),
            });
        }
        Ok(Self { matrix, labels })
    }

    /// Samples every pair from one sequential random stream.
    ///
    /// Pairs are drawn row by row, `(1, 0)`, `(2, 0)`, `(2, 1)`, `(3, 0)`
    /// and so on, so a given seed always reproduces the same graph.
    #[instrument(
        name = "core.sample",
        skip_all,
        fields(
            vertices = self.labels.len(),
            communities = self.labels.community_count().get(),
        ),
    )]
    pub fn sample<R: Rng>(&self, rng: &mut R) -> AdjacencyStructure {
        let labels = self.labels.as_slice();
        let mut cells = Vec::with_capacity(pair_count(labels.len()));
        for (row, &community) in labels.iter().enumerate() {
            let probabilities = self.matrix.row(community).unwrap_or_default();
            let earlier = labels.get(..row).unwrap_or_default();
            cells.extend(earlier.iter().map(|&other| draw_edge(probabilities, other, &mut *rng)));
        }
        let graph = AdjacencyStructure::from_lower_triangle(labels.len(), cells);
        info!(edges = graph.edge_count(), "graph sampled");
        graph
    }

    /// Samples rows of the triangle concurrently on the rayon pool.
    ///
    /// Row `i` owns the pairs `(i, 0..i)` and draws them from its own
    /// [`SmallRng`] derived from `seed` and `i`, so the result depends only
    /// on `seed` and not on the number of worker threads. The graph differs
    /// from what [`Self::sample`] produces for the same seed.
    #[cfg(feature = "parallel")]
    #[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
    #[instrument(
        name = "core.sample_parallel",
        skip_all,
        fields(
            vertices = self.labels.len(),
            communities = self.labels.community_count().get(),
            seed = seed,
        ),
    )]
    pub fn sample_parallel(&self, seed: u64) -> AdjacencyStructure {
        let labels = self.labels.as_slice();
        let rows: Vec<Vec<bool>> = labels
            .par_iter()
            .enumerate()
            .map(|(row, &community)| {
                let mut rng = SmallRng::seed_from_u64(row_seed(seed, row));
                let probabilities = self.matrix.row(community).unwrap_or_default();
                labels
                    .get(..row)
                    .unwrap_or_default()
                    .iter()
                    .map(|&other| draw_edge(probabilities, other, &mut rng))
                    .collect()
            })
            .collect();
        let graph = AdjacencyStructure::from_lower_triangle(labels.len(), rows.concat());
        info!(edges = graph.edge_count(), "graph sampled");
        graph
    }
}

/// Draws one pair. The uniform is consumed even if the lookup misses so the
/// stream position never depends on the matrix contents.
fn draw_edge<R: Rng>(probabilities: &[f64], community: usize, rng: &mut R) -> bool {
    let draw: f64 = rng.r#gen();
    probabilities
        .get(community)
        .is_some_and(|&probability| draw <= probability)
}

/// Seed for the stream owned by `row`: the SplitMix64 finaliser applied to
/// `seed` advanced by `row + 1` gamma steps.
#[cfg(feature = "parallel")]
fn row_seed(seed: u64, row: usize) -> u64 {
    const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut z = seed.wrapping_add((row as u64).wrapping_add(1).wrapping_mul(GOLDEN_GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::{fixture, rstest};

    #[fixture]
    fn two_blocks() -> (ProbabilityMatrix, CommunityLabels) {
        let matrix = ProbabilityMatrix::from_rows(vec![vec![0.8, 0.05], vec![0.05, 0.6]])
            .expect("matrix is symmetric");
        let labels = CommunityLabels::assign(
            40,
            std::num::NonZeroUsize::new(2).expect("non-zero"),
            &mut SmallRng::seed_from_u64(99),
        );
        (matrix, labels)
    }

    #[rstest]
    fn rejects_labels_beyond_matrix() {
        let matrix = ProbabilityMatrix::from_rows(vec![vec![0.5]]).expect("1x1 is symmetric");
        let labels = CommunityLabels::from_labels(vec![0, 1], 2).expect("labels are valid");
        let err = BlockSampler::new(&matrix, &labels).expect_err("label 1 has no matrix row");
        assert_eq!(
            err,
            BlockModelError::CommunityCountExceedsMatrix {
                communities: 2,
                dimension: 1,
            }
        );
    }

    #[rstest]
    #[case::always(1.0, true)]
    #[case::above_one(3.5, true)]
    #[case::never(0.0, false)]
    #[case::negative(-1.0, false)]
    fn extreme_probabilities_are_deterministic(#[case] probability: f64, #[case] complete: bool) {
        let matrix =
            ProbabilityMatrix::from_rows(vec![vec![probability; 3]; 3]).expect("constant matrix");
        let labels = CommunityLabels::from_labels(vec![0, 1, 2, 0, 1, 2, 0], 3).expect("valid");
        let sampler = BlockSampler::new(&matrix, &labels).expect("dimensions match");
        let graph = sampler.sample(&mut SmallRng::seed_from_u64(4));
        let expected = if complete {
            AdjacencyStructure::complete(7)
        } else {
            AdjacencyStructure::empty(7)
        };
        assert_eq!(graph, expected);
    }

    #[rstest]
    fn same_seed_reproduces_graph(two_blocks: (ProbabilityMatrix, CommunityLabels)) {
        let (matrix, labels) = two_blocks;
        let sampler = BlockSampler::new(&matrix, &labels).expect("dimensions match");
        let first = sampler.sample(&mut SmallRng::seed_from_u64(17));
        let second = sampler.sample(&mut SmallRng::seed_from_u64(17));
        assert_eq!(first, second);
        assert_eq!(first.vertex_count(), 40);
    }

    #[rstest]
    fn block_structure_is_visible(two_blocks: (ProbabilityMatrix, CommunityLabels)) {
        let (matrix, labels) = two_blocks;
        let sampler = BlockSampler::new(&matrix, &labels).expect("dimensions match");
        let graph = sampler.sample(&mut SmallRng::seed_from_u64(23));
        let (within, across) = graph.edges().fold((0_usize, 0_usize), |(w, a), (i, j)| {
            if labels.get(i) == labels.get(j) {
                (w + 1, a)
            } else {
                (w, a + 1)
            }
        });
        assert!(within > across, "within={within} across={across}");
    }

    #[rstest]
    #[case(0.1)]
    #[case(0.3)]
    #[case(0.5)]
    #[case(0.85)]
    fn edge_rate_tracks_probability(#[case] probability: f64) {
        let matrix = ProbabilityMatrix::from_rows(vec![vec![probability]]).expect("1x1");
        let labels = CommunityLabels::from_labels(vec![0; 300], 1).expect("valid");
        let sampler = BlockSampler::new(&matrix, &labels).expect("dimensions match");
        let graph = sampler.sample(&mut SmallRng::seed_from_u64(31));
        let rate = graph.edge_count() as f64 / pair_count(300) as f64;
        assert!(
            (rate - probability).abs() < 0.015,
            "rate={rate} probability={probability}"
        );
    }

    #[rstest]
    fn sampling_ignores_unused_matrix_rows() {
        let matrix = ProbabilityMatrix::default();
        let labels = CommunityLabels::from_labels(vec![1, 1, 1], 2).expect("valid");
        let sampler = BlockSampler::new(&matrix, &labels).expect("2 <= 4 communities");
        let graph = sampler.sample(&mut SmallRng::seed_from_u64(0));
        assert_eq!(graph.vertex_count(), 3);
    }

    #[cfg(feature = "parallel")]
    #[rstest]
    fn parallel_sampling_is_seed_deterministic(two_blocks: (ProbabilityMatrix, CommunityLabels)) {
        let (matrix, labels) = two_blocks;
        let sampler = BlockSampler::new(&matrix, &labels).expect("dimensions match");
        let first = sampler.sample_parallel(8);
        let single_threaded = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .expect("pool builds")
            .install(|| sampler.sample_parallel(8));
        assert_eq!(first, single_threaded);
        assert_ne!(first, sampler.sample_parallel(9));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn row_seeds_differ_per_row() {
        let seeds: std::collections::HashSet<u64> = (0..256).map(|row| row_seed(42, row)).collect();
        assert_eq!(seeds.len(), 256);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn xor_related_run_seeds_do_not_share_row_streams() {
        const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
        let seed = 42_u64;
        let related = seed ^ GOLDEN_GAMMA ^ 2_u64.wrapping_mul(GOLDEN_GAMMA);
        assert_ne!(row_seed(seed, 0), row_seed(related, 1));
        assert_ne!(row_seed(seed, 1), row_seed(related, 0));

        let first: std::collections::HashSet<u64> =
            (0..64).map(|row| row_seed(seed, row)).collect();
        assert!((0..64).all(|row| !first.contains(&row_seed(related, row))));
    }
}
