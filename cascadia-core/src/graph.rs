//! Static undirected graph snapshots and their precomputed adjacency view.
//!
//! A [`Graph`] is validated once on construction (endpoints in range, no
//! self-loops, no repeated edges) and is never mutated afterwards. The
//! [`AdjacencyView`] derived from it is what the cascade engines and seed
//! selectors read; it is `Sync` and may be shared across worker threads.

use std::collections::HashSet;

use crate::error::GraphError;

/// An immutable, undirected, unweighted simple graph over nodes `0..node_count`.
///
/// # Examples
/// ```
/// use cascadia_core::Graph;
///
/// let graph = Graph::new(3, vec![(0, 1), (2, 1)])?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edges(), &[(0, 1), (1, 2)]);
/// # Ok::<(), cascadia_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    node_count: usize,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    /// Builds a graph from an undirected edge list.
    ///
    /// Edges are stored in canonical `(min, max)` orientation, preserving the
    /// order in which they were supplied.
    ///
    /// # Errors
    /// Returns [`GraphError::EndpointOutOfRange`] when an endpoint is not a
    /// node of the graph, [`GraphError::SelfLoop`] for an edge `(v, v)`, and
    /// [`GraphError::DuplicateEdge`] when an edge is listed twice in either
    /// orientation.
    pub fn new(node_count: usize, edges: Vec<(usize, usize)>) -> Result<Self, GraphError> {
        let mut seen = HashSet::with_capacity(edges.len());
        let mut canonical = Vec::with_capacity(edges.len());
        for (left, right) in edges {
            if left >= node_count || right >= node_count {
                return Err(GraphError::EndpointOutOfRange {
                    left,
                    right,
                    node_count,
                });
            }
            if left == right {
                return Err(GraphError::SelfLoop { node: left });
            }
            let edge = (left.min(right), left.max(right));
            if !seen.insert(edge) {
                return Err(GraphError::DuplicateEdge {
                    left: edge.0,
                    right: edge.1,
                });
            }
            canonical.push(edge);
        }
        Ok(Self {
            node_count,
            edges: canonical,
        })
    }

    /// Creates a graph with `node_count` isolated nodes.
    ///
    /// # Examples
    /// ```
    /// use cascadia_core::Graph;
    ///
    /// let graph = Graph::empty(4);
    /// assert_eq!(graph.edge_count(), 0);
    /// assert_eq!(graph.adjacency().degree(3), 0);
    /// ```
    #[must_use]
    pub fn empty(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
        }
    }

    /// Builds a graph from edges already known to satisfy the structural
    /// contract, such as those emitted by a generator.
    pub(crate) fn from_canonical_edges(node_count: usize, edges: Vec<(usize, usize)>) -> Self {
        debug_assert!(edges.iter().all(|&(l, r)| l < r && r < node_count));
        Self { node_count, edges }
    }

    /// Returns the number of nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.node_count }

    /// Returns the number of undirected edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Returns the edges in canonical `(smaller, larger)` orientation.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[(usize, usize)] { &self.edges }

    /// Precomputes each node's neighbour list.
    ///
    /// # Examples
    /// ```
    /// use cascadia_core::Graph;
    ///
    /// let view = Graph::new(4, vec![(3, 1), (1, 0), (1, 2)])?.adjacency();
    /// assert_eq!(view.neighbours(1), &[0, 2, 3]);
    /// assert_eq!(view.neighbours(0), &[1]);
    /// # Ok::<(), cascadia_core::GraphError>(())
    /// ```
    #[must_use]
    pub fn adjacency(&self) -> AdjacencyView {
        AdjacencyView::from_graph(self)
    }
}

/// Read-only neighbour lists for every node of a [`Graph`].
///
/// Neighbour lists are sorted ascending and contain no repeats, and the
/// relation is symmetric: `v` lists `u` exactly when `u` lists `v`. Cascade
/// engines iterate neighbours in this order, which fixes the order in which
/// random draws are consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyView {
    neighbours: Vec<Vec<usize>>,
    edge_count: usize,
}

impl AdjacencyView {
    fn from_graph(graph: &Graph) -> Self {
        let mut neighbours = vec![Vec::new(); graph.node_count()];
        for &(left, right) in graph.edges() {
            neighbours[left].push(right);
            neighbours[right].push(left);
        }
        for list in &mut neighbours {
            list.sort_unstable();
        }
        Self {
            neighbours,
            edge_count: graph.edge_count(),
        }
    }

    /// Returns the number of nodes covered by the view.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` when the view has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }

    /// Returns the ascending neighbour list of `node`.
    ///
    /// Nodes outside the graph have no neighbours.
    #[must_use]
    pub fn neighbours(&self, node: usize) -> &[usize] {
        self.neighbours.get(node).map_or(&[], Vec::as_slice)
    }

    /// Returns the degree of `node`.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.neighbours(node).len()
    }

    /// Returns the mean node degree, or `0.0` for a graph without nodes.
    ///
    /// # Examples
    /// ```
    /// use cascadia_core::Graph;
    ///
    /// let view = Graph::new(4, vec![(0, 1), (1, 2), (2, 3)])?.adjacency();
    /// assert!((view.average_degree() - 1.5).abs() < f64::EPSILON);
    /// # Ok::<(), cascadia_core::GraphError>(())
    /// ```
    #[must_use]
    pub fn average_degree(&self) -> f64 {
        if self.neighbours.is_empty() {
            return 0.0;
        }
        (2 * self.edge_count) as f64 / self.neighbours.len() as f64
    }

    /// Labels every node with the index of its connected component.
    ///
    /// Components are numbered in order of their smallest node. Returns the
    /// labels alongside the number of components.
    pub(crate) fn components(&self) -> (Vec<usize>, usize) {
        const UNVISITED: usize = usize::MAX;
        let mut labels = vec![UNVISITED; self.node_count()];
        let mut count = 0;
        let mut stack = Vec::new();
        for start in 0..self.node_count() {
            if labels[start] != UNVISITED {
                continue;
            }
            labels[start] = count;
            stack.push(start);
            while let Some(node) = stack.pop() {
                for &next in self.neighbours(node) {
                    if labels[next] == UNVISITED {
                        labels[next] = count;
                        stack.push(next);
                    }
                }
            }
            count += 1;
        }
        (labels, count)
    }
}
