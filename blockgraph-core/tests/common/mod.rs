use blockgraph_core::ProbabilityMatrix;

/// Two-community matrix with dense blocks and no cross links.
#[must_use]
pub fn disjoint_blocks() -> ProbabilityMatrix {
    ProbabilityMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]])
        .expect("identity is symmetric")
}

/// A single community that always connects.
#[must_use]
pub fn always_connect() -> ProbabilityMatrix {
    ProbabilityMatrix::from_rows(vec![vec![1.0]]).expect("1x1 is symmetric")
}

/// Three communities with moderate densities, used for determinism checks.
#[must_use]
pub fn mixed_densities() -> ProbabilityMatrix {
    ProbabilityMatrix::from_rows(vec![
        vec![0.6, 0.2, 0.05],
        vec![0.2, 0.4, 0.1],
        vec![0.05, 0.1, 0.8],
    ])
    .expect("mixed densities are symmetric")
}
