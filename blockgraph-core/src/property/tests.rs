//! Proptest runners for the sampling pipeline.

use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};

use crate::test_utils::suite_proptest_config;
use crate::{
    BlockModelError, BlockSampler, CommunityLabels, ProbabilityMatrix, expected_degrees,
};

use super::{ModelFixture, model_fixture_strategy};

fn prepare(fixture: &ModelFixture) -> (ProbabilityMatrix, CommunityLabels) {
    let matrix = ProbabilityMatrix::from_rows(fixture.rows.clone())
        .expect("fixture matrices are symmetric by construction");
    let labels = CommunityLabels::from_labels(fixture.labels.clone(), fixture.community_count)
        .expect("fixture labels are below the community count");
    (matrix, labels)
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn sampled_graphs_are_symmetric_and_loop_free(fixture in model_fixture_strategy()) {
        let (matrix, labels) = prepare(&fixture);
        let sampler = BlockSampler::new(&matrix, &labels).expect("labels fit the matrix");
        let graph = sampler.sample(&mut SmallRng::seed_from_u64(fixture.seed));

        prop_assert_eq!(graph.vertex_count(), fixture.vertex_count);
        for a in 0..fixture.vertex_count {
            prop_assert!(!graph.has_edge(a, a));
            for b in 0..a {
                prop_assert_eq!(graph.has_edge(a, b), graph.has_edge(b, a));
            }
        }
        let degree_sum: usize = graph.degrees().iter().sum();
        prop_assert_eq!(degree_sum, 2 * graph.edge_count());
        prop_assert!(graph.edges().all(|(low, high)| low < high));
    }

    #[test]
    fn sampling_is_reproducible_from_a_seed(fixture in model_fixture_strategy()) {
        let (matrix, labels) = prepare(&fixture);
        let sampler = BlockSampler::new(&matrix, &labels).expect("labels fit the matrix");
        let first = sampler.sample(&mut SmallRng::seed_from_u64(fixture.seed));
        let second = sampler.sample(&mut SmallRng::seed_from_u64(fixture.seed));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn certain_and_impossible_pairs_are_respected(fixture in model_fixture_strategy()) {
        let (matrix, labels) = prepare(&fixture);
        let sampler = BlockSampler::new(&matrix, &labels).expect("labels fit the matrix");
        let graph = sampler.sample(&mut SmallRng::seed_from_u64(fixture.seed));

        for a in 0..fixture.vertex_count {
            for b in 0..a {
                let probability = matrix
                    .probability(fixture.labels[a], fixture.labels[b])
                    .expect("labels index the matrix");
                if probability >= 1.0 {
                    prop_assert!(graph.has_edge(a, b));
                } else if probability < 0.0 {
                    prop_assert!(!graph.has_edge(a, b));
                }
            }
        }
    }

    #[test]
    fn perturbing_one_side_breaks_symmetry(
        fixture in model_fixture_strategy(),
        offset in 0.01_f64..1.0,
    ) {
        let mut rows = fixture.rows.clone();
        prop_assume!(rows.len() >= 2);
        rows[1][0] += offset;
        let err = ProbabilityMatrix::from_rows(rows).expect_err("(0, 1) != (1, 0)");
        let is_asymmetric = matches!(err, BlockModelError::AsymmetricMatrix { row: 0, column: 1, .. });
        prop_assert!(is_asymmetric, "unexpected error {err:?}");
    }

    #[test]
    fn expected_degrees_match_dot_product(fixture in model_fixture_strategy()) {
        let (matrix, labels) = prepare(&fixture);
        let degrees = expected_degrees(&matrix, &labels, fixture.community_count)
            .expect("community count fits the matrix");
        let sizes = labels.community_sizes();

        prop_assert_eq!(degrees.len(), fixture.community_count);
        for (community, expected) in degrees.iter().enumerate() {
            let manual: f64 = (0..fixture.community_count)
                .map(|other| fixture.rows[community][other] * sizes[other] as f64)
                .sum();
            prop_assert!((expected - manual).abs() <= 1e-9, "{expected} != {manual}");
        }
    }
}

#[test]
fn zero_matrix_yields_zero_degrees_for_any_labels() {
    let matrix = ProbabilityMatrix::from_rows(vec![vec![0.0; 4]; 4]).expect("zeros");
    let mut runner = proptest::test_runner::TestRunner::new(suite_proptest_config(64));
    runner
        .run(&model_fixture_strategy(), |fixture| {
            let labels =
                CommunityLabels::from_labels(fixture.labels.clone(), fixture.community_count)
                    .expect("fixture labels are valid");
            let degrees = expected_degrees(&matrix, &labels, fixture.community_count)
                .expect("at most four communities");
            prop_assert!(degrees.iter().all(|degree| degree == 0.0));
            Ok(())
        })
        .expect("zero matrix must produce zero expectations");
}
