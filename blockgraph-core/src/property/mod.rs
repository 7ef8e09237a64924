//! Property-based coverage for the sampling pipeline.
//!
//! Fixtures pair a random label assignment with a matrix drawn from one of
//! several probability profiles, including degenerate ones whose entries sit
//! outside `[0, 1]`.

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use test_strategy::Arbitrary;

#[cfg(test)]
mod tests;

/// Upper bound for generated vertex counts; the triangle grows quadratically.
const MAX_VERTICES: usize = 48;
/// Upper bound for generated community counts.
const MAX_COMMUNITIES: usize = 4;
/// Upper bound for unused trailing matrix rows.
const MAX_EXTRA_ROWS: usize = 2;

/// Shape of the generated probability matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum MatrixProfile {
    /// Every entry uniform in `[0, 1]`.
    #[weight(3)]
    Uniform,
    /// Dense diagonal, sparse off-diagonal.
    #[weight(2)]
    Assortative,
    /// Entries drawn from `{-0.5, 0.0, 1.0, 1.5}`.
    #[weight(1)]
    Degenerate,
}

/// Inputs for one sampling run.
#[derive(Clone, Debug)]
pub(super) struct ModelFixture {
    pub vertex_count: usize,
    pub community_count: usize,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
    pub seed: u64,
}

pub(super) fn model_fixture_strategy() -> impl Strategy<Value = ModelFixture> {
    (
        any::<MatrixProfile>(),
        0..=MAX_VERTICES,
        1..=MAX_COMMUNITIES,
        0..=MAX_EXTRA_ROWS,
        any::<u64>(),
    )
        .prop_map(|(profile, vertex_count, community_count, extra, seed)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let rows = symmetric_rows(profile, community_count + extra, &mut rng);
            let labels = (0..vertex_count)
                .map(|_| rng.gen_range(0..community_count))
                .collect();
            ModelFixture {
                vertex_count,
                community_count,
                rows,
                labels,
                seed,
            }
        })
}

fn symmetric_rows(profile: MatrixProfile, dimension: usize, rng: &mut SmallRng) -> Vec<Vec<f64>> {
    const DEGENERATE: [f64; 4] = [-0.5, 0.0, 1.0, 1.5];
    let mut rows = vec![vec![0.0; dimension]; dimension];
    for row in 0..dimension {
        for column in row..dimension {
            let value = match profile {
                MatrixProfile::Uniform => rng.gen_range(0.0..=1.0),
                MatrixProfile::Assortative if row == column => rng.gen_range(0.5..=1.0),
                MatrixProfile::Assortative => rng.gen_range(0.0..0.1),
                MatrixProfile::Degenerate => DEGENERATE[rng.gen_range(0..DEGENERATE.len())],
            };
            rows[row][column] = value;
            rows[column][row] = value;
        }
    }
    rows
}
