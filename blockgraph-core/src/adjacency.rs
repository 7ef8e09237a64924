//! Undirected, loop-free adjacency storage.
//!
//! Only the strictly lower triangle is stored: one cell per unordered vertex
//! pair, laid out row by row so row `i` holds the pairs `(i, 0..i)`. Every
//! query is symmetric by construction and a vertex is never adjacent to
//! itself, so no mirroring pass is needed after sampling.

/// Simple undirected graph produced by [`crate::BlockSampler`].
///
/// # Examples
/// ```
/// use blockgraph_core::AdjacencyStructure;
///
/// let graph = AdjacencyStructure::complete(4);
/// assert_eq!(graph.edge_count(), 6);
/// assert!(graph.has_edge(3, 1) && graph.has_edge(1, 3));
/// assert!(!graph.has_edge(2, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdjacencyStructure {
    vertex_count: usize,
    cells: Vec<bool>,
}

/// Number of unordered pairs among `vertex_count` vertices, which is also
/// the start of row `vertex_count` in the triangular layout.
#[expect(
    clippy::integer_division,
    reason = "n * (n - 1) is always even so the division is exact"
)]
pub(crate) const fn pair_count(vertex_count: usize) -> usize {
    vertex_count * vertex_count.saturating_sub(1) / 2
}

impl AdjacencyStructure {
    /// Graph over `vertex_count` vertices with no edges.
    #[must_use]
    pub fn empty(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            cells: vec![false; pair_count(vertex_count)],
        }
    }

    /// Graph over `vertex_count` vertices with every pair connected.
    #[must_use]
    pub fn complete(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            cells: vec![true; pair_count(vertex_count)],
        }
    }

    /// Builds a graph from lower-triangular cells in row-major order.
    ///
    /// Callers guarantee `cells.len() == pair_count(vertex_count)`.
    pub(crate) fn from_lower_triangle(vertex_count: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), pair_count(vertex_count));
        Self {
            vertex_count,
            cells,
        }
    }

    fn cell(&self, a: usize, b: usize) -> Option<usize> {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        (low != high && high < self.vertex_count).then(|| pair_count(high) + low)
    }

    /// Number of vertices, including isolated ones.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns whether `a` and `b` are adjacent.
    ///
    /// Symmetric in its arguments; `false` for `a == b` and for vertices
    /// outside the graph.
    #[must_use]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.cell(a, b)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.cells.iter().filter(|&&edge| edge).count()
    }

    /// Iterates the edges as `(smaller, larger)` pairs, ordered by the larger
    /// endpoint and then the smaller one.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..self.vertex_count).flat_map(move |high| {
            let row = self
                .cells
                .get(pair_count(high)..pair_count(high + 1))
                .unwrap_or_default();
            row.iter()
                .enumerate()
                .filter_map(move |(low, &edge)| edge.then_some((low, high)))
        })
    }

    /// Iterates the neighbours of `vertex` in ascending order.
    ///
    /// Yields nothing for vertices outside the graph.
    pub fn neighbours(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        let upper = if vertex < self.vertex_count {
            self.vertex_count
        } else {
            0
        };
        (0..upper).filter(move |&other| self.has_edge(vertex, other))
    }

    /// Degree of `vertex`, or `None` when it is outside the graph.
    #[must_use]
    pub fn degree(&self, vertex: usize) -> Option<usize> {
        (vertex < self.vertex_count).then(|| self.neighbours(vertex).count())
    }

    /// Degree of every vertex, indexed by vertex.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0_usize; self.vertex_count];
        for (low, high) in self.edges() {
            for endpoint in [low, high] {
                if let Some(degree) = degrees.get_mut(endpoint) {
                    *degree += 1;
                }
            }
        }
        degrees
    }

    /// Symmetric 0/1 adjacency matrix with a zero diagonal.
    ///
    /// Intended for rendering and export collaborators that expect a dense
    /// matrix.
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<u8>> {
        let mut dense = vec![vec![0_u8; self.vertex_count]; self.vertex_count];
        for (low, high) in self.edges() {
            for (row, column) in [(low, high), (high, low)] {
                if let Some(cell) = dense.get_mut(row).and_then(|r| r.get_mut(column)) {
                    *cell = 1;
                }
            }
        }
        dense
    }
}
