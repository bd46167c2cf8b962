//! Grid comparison of seeding strategies for the SIR model.
//!
//! Every `(transmission, seed count)` pair is evaluated over a batch of fresh
//! Erdos-Renyi graphs. For each graph the degree and eigenvector seed sets
//! are fixed; each repeat then runs `draws` cascades from freshly drawn
//! random seeds plus one cascade from each ranked seed set. Raw informed
//! counts are summarised by their mean and population standard deviation.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::{
    Result,
    cascade::{CascadeEngine, Probability, SirCascade},
    error::{GraphError, SimulationError},
    generate::erdos_renyi,
    rng::task_rng,
    seed::{SeedSelector, SeedStrategy, random_seeds},
};

/// Transmission values swept by default: sub-critical, critical and
/// super-critical pairs for `N = 500, p = 0.01`.
pub const DEFAULT_TRANSMISSIONS: [f64; 6] = [0.0, 0.15, 0.16, 0.4, 0.41, 1.0];

/// Seed counts swept by default.
pub const DEFAULT_SEED_COUNTS: [usize; 2] = [1, 2];

/// Configuration for a grid comparison.
///
/// # Examples
/// ```
/// use cascadia_core::GridConfig;
///
/// let rows = GridConfig::new()
///     .with_transmissions([0.0])
///     .with_seed_counts([2])
///     .with_graphs(1)
///     .with_draws(2)
///     .with_repeats(2)
///     .with_nodes(20)
///     .run()?;
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].random().mean(), 2.0);
/// assert_eq!(rows[0].degree().std_dev(), 0.0);
/// # Ok::<(), cascadia_core::SimulationError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    transmissions: Vec<f64>,
    seed_counts: Vec<usize>,
    graphs: usize,
    draws: usize,
    repeats: usize,
    nodes: usize,
    edge_probability: f64,
    seed: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            transmissions: DEFAULT_TRANSMISSIONS.to_vec(),
            seed_counts: DEFAULT_SEED_COUNTS.to_vec(),
            graphs: 20,
            draws: 10,
            repeats: 50,
            nodes: 500,
            edge_probability: 0.01,
            seed: 0,
        }
    }
}

impl GridConfig {
    /// Creates a configuration populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the transmission values.
    #[must_use]
    pub fn with_transmissions(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.transmissions = values.into_iter().collect();
        self
    }

    /// Replaces the seed counts.
    #[must_use]
    pub fn with_seed_counts(mut self, counts: impl IntoIterator<Item = usize>) -> Self {
        self.seed_counts = counts.into_iter().collect();
        self
    }

    /// Sets the number of graphs generated per configuration.
    #[must_use]
    pub fn with_graphs(mut self, graphs: usize) -> Self {
        self.graphs = graphs;
        self
    }

    /// Sets the number of random seed draws per repeat.
    #[must_use]
    pub fn with_draws(mut self, draws: usize) -> Self {
        self.draws = draws;
        self
    }

    /// Sets the number of repeats per graph.
    #[must_use]
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Sets the number of nodes per generated graph.
    #[must_use]
    pub fn with_nodes(mut self, nodes: usize) -> Self {
        self.nodes = nodes;
        self
    }

    /// Sets the Erdos-Renyi edge probability.
    #[must_use]
    pub fn with_edge_probability(mut self, edge_probability: f64) -> Self {
        self.edge_probability = edge_probability;
        self
    }

    /// Sets the base RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the transmission values.
    #[must_use]
    #[rustfmt::skip]
    pub fn transmissions(&self) -> &[f64] { &self.transmissions }

    /// Returns the seed counts.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed_counts(&self) -> &[usize] { &self.seed_counts }

    /// Returns the number of graphs per configuration.
    #[must_use]
    #[rustfmt::skip]
    pub fn graphs(&self) -> usize { self.graphs }

    /// Returns the number of random draws per repeat.
    #[must_use]
    #[rustfmt::skip]
    pub fn draws(&self) -> usize { self.draws }

    /// Returns the number of repeats per graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn repeats(&self) -> usize { self.repeats }

    /// Returns the number of nodes per graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> usize { self.nodes }

    /// Returns the Erdos-Renyi edge probability.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_probability(&self) -> f64 { self.edge_probability }

    fn validate(&self) -> Result<Vec<(Probability, usize)>> {
        for (parameter, got) in [
            ("graphs", self.graphs),
            ("draws", self.draws),
            ("nodes", self.nodes),
        ] {
            if got == 0 {
                return Err(SimulationError::InvalidCount { parameter, got });
            }
        }
        if self.repeats == 0 {
            return Err(SimulationError::InvalidRepeats { got: 0 });
        }
        if !(self.edge_probability.is_finite() && (0.0..=1.0).contains(&self.edge_probability)) {
            return Err(GraphError::InvalidEdgeProbability {
                got: self.edge_probability,
            }
            .into());
        }
        for &seeds in &self.seed_counts {
            if seeds == 0 {
                return Err(SimulationError::InvalidCount {
                    parameter: "seed count",
                    got: 0,
                });
            }
            if seeds > self.nodes {
                return Err(SimulationError::SeedCountExceedsNodes {
                    requested: seeds,
                    nodes: self.nodes,
                });
            }
        }
        let transmissions = self
            .transmissions
            .iter()
            .map(|&c| Probability::new(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(transmissions
            .into_iter()
            .flat_map(|c| self.seed_counts.iter().map(move |&seeds| (c, seeds)))
            .collect())
    }

    /// Runs every configuration and returns one row per `(c, seeds)` pair,
    /// ordered by transmission first and seed count second.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidCount`] or
    /// [`SimulationError::InvalidRepeats`] for zero counts,
    /// [`SimulationError::InvalidProbability`] for a transmission outside
    /// `[0, 1]`, [`SimulationError::SeedCountExceedsNodes`] for a seed count
    /// larger than `nodes`, and [`SimulationError::Graph`] for an invalid edge
    /// probability. Validation completes before any graph is generated.
    #[instrument(
        name = "core.grid",
        err,
        skip(self),
        fields(
            transmissions = self.transmissions.len(),
            seed_counts = self.seed_counts.len(),
            graphs = self.graphs,
            nodes = self.nodes,
        ),
    )]
    pub fn run(&self) -> Result<Vec<GridRow>> {
        let configurations = self.validate()?;
        let rows = self.run_configurations(&configurations)?;
        info!(rows = rows.len(), "grid complete");
        Ok(rows)
    }

    #[cfg(feature = "parallel")]
    fn run_configurations(&self, configurations: &[(Probability, usize)]) -> Result<Vec<GridRow>> {
        configurations
            .par_iter()
            .enumerate()
            .map(|(idx, &(c, seeds))| self.run_configuration(c, seeds, &mut task_rng(self.seed, idx)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_configurations(&self, configurations: &[(Probability, usize)]) -> Result<Vec<GridRow>> {
        configurations
            .iter()
            .enumerate()
            .map(|(idx, &(c, seeds))| self.run_configuration(c, seeds, &mut task_rng(self.seed, idx)))
            .collect()
    }

    #[instrument(
        name = "core.grid.config",
        err,
        skip(self, rng),
        fields(c = c.get(), seeds = seeds),
    )]
    fn run_configuration<R: Rng + ?Sized>(
        &self,
        c: Probability,
        seeds: usize,
        rng: &mut R,
    ) -> Result<GridRow> {
        let mut engine = SirCascade::new(c);
        let mut random = Moments::default();
        let mut degree = Moments::default();
        let mut eigen = Moments::default();

        for _ in 0..self.graphs {
            let view = erdos_renyi(self.nodes, self.edge_probability, rng)?.adjacency();
            let degree_seeds = SeedSelector::new(SeedStrategy::Degree).select(seeds, &view, rng)?;
            let eigen_seeds = SeedSelector::new(SeedStrategy::Eigen).select(seeds, &view, rng)?;
            for _ in 0..self.repeats {
                for _ in 0..self.draws {
                    let drawn = random_seeds(seeds, self.nodes, rng);
                    random.push(engine.spread(&view, &drawn, rng)?);
                }
                degree.push(engine.spread(&view, &degree_seeds, rng)?);
                eigen.push(engine.spread(&view, &eigen_seeds, rng)?);
            }
        }

        let row = GridRow {
            transmission: c.get(),
            seeds,
            random: random.finish(),
            degree: degree.finish(),
            eigen: eigen.finish(),
        };
        debug!(
            random_mean = row.random.mean,
            degree_mean = row.degree.mean,
            eigen_mean = row.eigen.mean,
            "grid configuration complete"
        );
        Ok(row)
    }
}

/// Mean and population standard deviation of informed-node counts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CascadeStats {
    mean: f64,
    std_dev: f64,
}

impl CascadeStats {
    /// Mean informed count.
    #[must_use]
    #[rustfmt::skip]
    pub fn mean(&self) -> f64 { self.mean }

    /// Population standard deviation of the informed count.
    #[must_use]
    #[rustfmt::skip]
    pub fn std_dev(&self) -> f64 { self.std_dev }
}

/// Summary of one `(c, seeds)` configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridRow {
    transmission: f64,
    seeds: usize,
    random: CascadeStats,
    degree: CascadeStats,
    eigen: CascadeStats,
}

impl GridRow {
    /// Transmission probability `c`.
    #[must_use]
    #[rustfmt::skip]
    pub fn transmission(&self) -> f64 { self.transmission }

    /// Seed-set size.
    #[must_use]
    #[rustfmt::skip]
    pub fn seeds(&self) -> usize { self.seeds }

    /// Statistics for random seeding.
    #[must_use]
    #[rustfmt::skip]
    pub fn random(&self) -> CascadeStats { self.random }

    /// Statistics for degree-centrality seeding.
    #[must_use]
    #[rustfmt::skip]
    pub fn degree(&self) -> CascadeStats { self.degree }

    /// Statistics for eigenvector-centrality seeding.
    #[must_use]
    #[rustfmt::skip]
    pub fn eigen(&self) -> CascadeStats { self.eigen }
}

/// Welford accumulator.
#[derive(Debug, Default)]
struct Moments {
    count: usize,
    mean: f64,
    m2: f64,
}

impl Moments {
    fn push(&mut self, value: usize) {
        let value = value as f64;
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    fn finish(&self) -> CascadeStats {
        if self.count == 0 {
            return CascadeStats::default();
        }
        CascadeStats {
            mean: self.mean,
            std_dev: (self.m2 / self.count as f64).max(0.0).sqrt(),
        }
    }
}
