//! Benchmark parameter types.
//!
//! Groups related benchmark parameters into structs whose `Display` form
//! becomes the Criterion benchmark id.

use std::fmt;

/// Parameters for a single-cascade benchmark run.
#[derive(Clone, Debug)]
pub struct CascadeBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Number of seed nodes.
    pub seed_count: usize,
}

impl fmt::Display for CascadeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.node_count, self.seed_count)
    }
}

/// Parameters for a seed-size sweep benchmark run.
#[derive(Clone, Debug)]
pub struct SweepBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Largest seed-set size swept.
    pub max_seeds: usize,
    /// Monte Carlo repeats per seed-set size.
    pub repeats: usize,
}

impl fmt::Display for SweepBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},k={},r={}",
            self.node_count, self.max_seeds, self.repeats,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn cascade_params_render_as_benchmark_id() {
        let params = CascadeBenchParams {
            node_count: 500,
            seed_count: 5,
        };
        assert_eq!(params.to_string(), "n=500,k=5");
    }

    #[rstest]
    fn sweep_params_render_as_benchmark_id() {
        let params = SweepBenchParams {
            node_count: 200,
            max_seeds: 10,
            repeats: 20,
        };
        assert_eq!(params.to_string(), "n=200,k=10,r=20");
    }
}
