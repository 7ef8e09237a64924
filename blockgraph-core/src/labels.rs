//! Community labels for the vertices of a generated graph.

use std::num::NonZeroUsize;

use rand::Rng;
use tracing::{debug, instrument};

use crate::{Result, error::BlockModelError};

/// Community label for every vertex, indexed by vertex id.
///
/// Every label is strictly below [`Self::community_count`]. Communities may be
/// empty.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use blockgraph_core::CommunityLabels;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let communities = NonZeroUsize::new(3).expect("non-zero");
/// let labels = CommunityLabels::assign(10, communities, &mut SmallRng::seed_from_u64(7));
/// assert_eq!(labels.len(), 10);
/// assert!(labels.iter().all(|label| label < 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityLabels {
    labels: Vec<usize>,
    community_count: NonZeroUsize,
}

impl CommunityLabels {
    /// Draws one label per vertex, independently and uniformly over the
    /// communities.
    ///
    /// No minimum community size is enforced.
    #[instrument(
        name = "core.assign_labels",
        skip_all,
        fields(vertices = vertex_count, communities = community_count.get()),
    )]
    pub fn assign<R: Rng>(
        vertex_count: usize,
        community_count: NonZeroUsize,
        rng: &mut R,
    ) -> Self {
        let labels = (0..vertex_count)
            .map(|_| rng.gen_range(0..community_count.get()))
            .collect();
        let assigned = Self {
            labels,
            community_count,
        };
        debug!(
            empty_communities = assigned.community_sizes().iter().filter(|&&n| n == 0).count(),
            "labels assigned"
        );
        assigned
    }

    /// Wraps caller-provided labels after checking each against
    /// `community_count`.
    ///
    /// # Errors
    /// Returns [`BlockModelError::InvalidCommunityCount`] when
    /// `community_count` is zero and [`BlockModelError::LabelOutOfRange`] for
    /// the first label that is not below `community_count`.
    ///
    /// # Examples
    /// ```
    /// use blockgraph_core::{BlockModelError, CommunityLabels};
    ///
    /// let labels = CommunityLabels::from_labels(vec![0, 1, 1], 2)?;
    /// assert_eq!(labels.community_sizes(), vec![1, 2]);
    ///
    /// let err = CommunityLabels::from_labels(vec![0, 2], 2).expect_err("2 is out of range");
    /// assert!(matches!(err, BlockModelError::LabelOutOfRange { vertex: 1, label: 2, .. }));
    /// # Ok::<(), BlockModelError>(())
    /// ```
    pub fn from_labels(labels: Vec<usize>, community_count: usize) -> Result<Self> {
        let communities = NonZeroUsize::new(community_count).ok_or(
            BlockModelError::InvalidCommunityCount {
                got: community_count,
            },
        )?;
        if let Some((vertex, &label)) = labels
            .iter()
            .enumerate()
            .find(|&(_, &label)| label >= community_count)
        {
            return Err(BlockModelError::LabelOutOfRange {
                vertex,
                label,
                communities: community_count,
            });
        }
        Ok(Self {
            labels,
            community_count: communities,
        })
    }

    /// Number of labelled vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether no vertices were labelled.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of communities the labels range over.
    #[must_use]
    pub const fn community_count(&self) -> NonZeroUsize {
        self.community_count
    }

    /// Label of `vertex`, if it exists.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<usize> {
        self.labels.get(vertex).copied()
    }

    /// Labels in vertex order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.labels
    }

    /// Iterates the labels in vertex order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.labels.iter().copied()
    }

    /// Number of vertices in each community, indexed by community.
    ///
    /// Empty communities report `0`.
    #[must_use]
    pub fn community_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0_usize; self.community_count.get()];
        for label in self.iter() {
            if let Some(size) = sizes.get_mut(label) {
                *size += 1;
            }
        }
        sizes
    }

    /// Vertices belonging to `community`, in ascending order.
    pub fn members(&self, community: usize) -> impl Iterator<Item = usize> + '_ {
        self.iter()
            .enumerate()
            .filter_map(move |(vertex, label)| (label == community).then_some(vertex))
    }
}

impl From<CommunityLabels> for Vec<usize> {
    fn from(labels: CommunityLabels) -> Self {
        labels.labels
    }
}
