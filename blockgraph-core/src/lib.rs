//! Blockgraph core library.
//!
//! Samples random graphs from a stochastic block model: vertices carry
//! community labels and each unordered pair is connected independently with
//! the probability assigned to its pair of communities.
//!
//! The pipeline runs in three steps, each usable on its own:
//!
//! 1. [`ProbabilityMatrix`] validates the symmetric community matrix.
//! 2. [`CommunityLabels::assign`] draws a label for every vertex.
//! 3. [`BlockSampler`] samples the [`AdjacencyStructure`] and
//!    [`expected_degrees`] computes the closed-form degree per community.
//!
//! [`BlockModelBuilder`] bundles the parameters into an immutable
//! [`BlockModel`] that runs all three and returns a [`GeneratedGraph`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adjacency;
mod builder;
mod degree;
mod error;
mod labels;
mod matrix;
mod model;
#[cfg(test)]
mod property;
mod result;
mod sampler;
#[cfg(test)]
mod test_utils;

pub use crate::{
    adjacency::AdjacencyStructure,
    builder::{BlockModelBuilder, DEFAULT_SEED, SamplingStrategy},
    degree::{
        ExpectedDegrees, SelfPairing, expected_degrees, expected_degrees_with,
        realized_mean_degrees,
    },
    error::{BlockModelError, BlockModelErrorCode, Result},
    labels::CommunityLabels,
    matrix::ProbabilityMatrix,
    model::BlockModel,
    result::{CommunitySummary, GeneratedGraph},
    sampler::BlockSampler,
};
