//! Seeded synthetic graphs for benchmarking.
//!
//! Provides [`SyntheticGraph`], an Erdos-Renyi graph sized by its expected
//! mean degree so that benchmarks at different node counts stay comparably
//! dense. Generation is seeded for reproducibility across runs.

use cascadia_core::{AdjacencyView, Graph, erdos_renyi};
use rand::{SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Configuration for synthetic graph generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of nodes to generate.
    pub node_count: usize,
    /// Expected mean degree of the generated graph.
    pub mean_degree: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A generated graph together with its adjacency view.
///
/// # Examples
///
/// ```
/// use cascadia_benches::source::{SyntheticConfig, SyntheticGraph};
///
/// let config = SyntheticConfig { node_count: 50, mean_degree: 4, seed: 7 };
/// let graph = SyntheticGraph::generate(&config)?;
/// assert_eq!(graph.view().node_count(), 50);
/// # Ok::<(), cascadia_benches::error::BenchSetupError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticGraph {
    graph: Graph,
    view: AdjacencyView,
}

impl SyntheticGraph {
    /// Generates a `G(n, p)` graph with `p = mean_degree / (n - 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchSetupError::ZeroValue`] if `node_count` is zero, and
    /// [`BenchSetupError::Graph`] if the mean degree implies an edge
    /// probability above one.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, BenchSetupError> {
        if config.node_count == 0 {
            return Err(BenchSetupError::ZeroValue {
                context: "node_count",
            });
        }
        let probability = edge_probability(config.node_count, config.mean_degree);
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let graph = erdos_renyi(config.node_count, probability, &mut rng)?;
        let view = graph.adjacency();
        Ok(Self { graph, view })
    }

    /// Returns the generated graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the adjacency view of the generated graph.
    #[must_use]
    pub const fn view(&self) -> &AdjacencyView {
        &self.view
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "Edge probability is a ratio of small node counts"
)]
fn edge_probability(node_count: usize, mean_degree: usize) -> f64 {
    if node_count <= 1 {
        return 0.0;
    }
    mean_degree as f64 / (node_count - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_zero_nodes() {
        let config = SyntheticConfig {
            node_count: 0,
            mean_degree: 4,
            seed: 1,
        };
        assert!(matches!(
            SyntheticGraph::generate(&config),
            Err(BenchSetupError::ZeroValue {
                context: "node_count"
            })
        ));
    }

    #[rstest]
    fn rejects_impossible_density() {
        let config = SyntheticConfig {
            node_count: 3,
            mean_degree: 5,
            seed: 1,
        };
        assert!(matches!(
            SyntheticGraph::generate(&config),
            Err(BenchSetupError::Graph(_))
        ));
    }

    #[rstest]
    fn same_seed_yields_same_graph() -> Result<(), BenchSetupError> {
        let config = SyntheticConfig {
            node_count: 40,
            mean_degree: 3,
            seed: 11,
        };
        let first = SyntheticGraph::generate(&config)?;
        let second = SyntheticGraph::generate(&config)?;
        assert_eq!(first.graph(), second.graph());
        Ok(())
    }

    #[rstest]
    #[case(1, 0.0)]
    #[case(5, 0.5)]
    #[case(11, 0.2)]
    fn probability_scales_with_node_count(#[case] nodes: usize, #[case] expected: f64) {
        assert!((edge_probability(nodes, 2) - expected).abs() < 1e-12);
    }
}
