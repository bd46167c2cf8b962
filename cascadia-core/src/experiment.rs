//! End-to-end experiment: one sweep per seed strategy over a shared graph.
//!
//! Thresholds (for the threshold model) are drawn once per experiment so
//! every strategy is compared against the same multiset of thresholds. Each
//! strategy then sweeps independently with its own RNG derived from the
//! experiment seed, so reports are reproducible with or without the
//! `parallel` feature.

use std::{fmt, str::FromStr, sync::Arc};

use rand::{SeedableRng, rngs::SmallRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    Result,
    cascade::Probability,
    error::SimulationError,
    graph::{AdjacencyView, Graph},
    rng::task_rng,
    seed::{EigenParams, SeedStrategy},
    sweep::{CascadeModel, Sweep, SweepBuilder, SweepCurve},
    thresholds::ThresholdDistribution,
};

/// Which cascade model an experiment runs.
///
/// # Examples
/// ```
/// use cascadia_core::CascadeModelKind;
///
/// let kind: CascadeModelKind = "threshold".parse()?;
/// assert_eq!(kind, CascadeModelKind::Threshold);
/// assert!("bass".parse::<CascadeModelKind>().is_err());
/// # Ok::<(), cascadia_core::SimulationError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CascadeModelKind {
    /// SIR transmission.
    #[default]
    Sir,
    /// Linear threshold adoption.
    Threshold,
}

impl CascadeModelKind {
    /// Returns the lowercase model name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sir => "sir",
            Self::Threshold => "threshold",
        }
    }
}

impl fmt::Display for CascadeModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CascadeModelKind {
    type Err = SimulationError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sir" => Ok(Self::Sir),
            "threshold" => Ok(Self::Threshold),
            _ => Err(SimulationError::UnknownModel {
                name: Arc::from(raw),
            }),
        }
    }
}

/// Configures and constructs [`Experiment`] instances.
///
/// Defaults: SIR model, transmission `0.5`, uniform thresholds (id `1`), all
/// three strategies, 20 seed sizes, 50 repeats, seed `0`.
///
/// # Examples
/// ```
/// use cascadia_core::{CascadeModelKind, ExperimentBuilder, SeedStrategy};
///
/// let experiment = ExperimentBuilder::new()
///     .with_model(CascadeModelKind::Threshold)
///     .with_distribution(3)
///     .with_strategies([SeedStrategy::Degree])
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(experiment.strategies(), &[SeedStrategy::Degree]);
/// assert!(ExperimentBuilder::new().with_distribution(9).build().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct ExperimentBuilder {
    model: CascadeModelKind,
    transmission: f64,
    distribution: u8,
    strategies: Vec<SeedStrategy>,
    max_seeds: usize,
    repeats: usize,
    seed: u64,
    eigen: EigenParams,
}

impl Default for ExperimentBuilder {
    fn default() -> Self {
        let sweep = SweepBuilder::new();
        Self {
            model: CascadeModelKind::default(),
            transmission: 0.5,
            distribution: 1,
            strategies: SeedStrategy::ALL.to_vec(),
            max_seeds: sweep.max_seeds(),
            repeats: sweep.repeats(),
            seed: 0,
            eigen: EigenParams::default(),
        }
    }
}

impl ExperimentBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the cascade model.
    #[must_use]
    pub fn with_model(mut self, model: CascadeModelKind) -> Self {
        self.model = model;
        self
    }

    /// Sets the SIR transmission probability.
    #[must_use]
    pub fn with_transmission(mut self, transmission: f64) -> Self {
        self.transmission = transmission;
        self
    }

    /// Sets the threshold distribution identifier (`1..=6`).
    #[must_use]
    pub fn with_distribution(mut self, distribution: u8) -> Self {
        self.distribution = distribution;
        self
    }

    /// Replaces the list of strategies to sweep, in report order.
    #[must_use]
    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = SeedStrategy>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }

    /// Sets the largest seed-set size.
    #[must_use]
    pub fn with_max_seeds(mut self, max_seeds: usize) -> Self {
        self.max_seeds = max_seeds;
        self
    }

    /// Sets the number of repeats per seed-set size.
    #[must_use]
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Sets the base RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the eigenvector centrality parameters.
    #[must_use]
    pub fn with_eigen_params(mut self, eigen: EigenParams) -> Self {
        self.eigen = eigen;
        self
    }

    /// Validates the configuration and constructs an [`Experiment`].
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidProbability`] for a transmission
    /// outside `[0, 1]`, [`SimulationError::UnknownDistribution`] for an id
    /// outside `1..=6`, [`SimulationError::InvalidRepeats`] or
    /// [`SimulationError::InvalidMaxSeeds`] for zero counts, and
    /// [`SimulationError::NoStrategies`] for an empty strategy list.
    pub fn build(self) -> Result<Experiment> {
        let transmission = Probability::new(self.transmission)?;
        let distribution = ThresholdDistribution::from_type(self.distribution)?;
        let sweep = SweepBuilder::new()
            .with_max_seeds(self.max_seeds)
            .with_repeats(self.repeats)
            .with_eigen_params(self.eigen)
            .build()?;
        if self.strategies.is_empty() {
            return Err(SimulationError::NoStrategies);
        }
        Ok(Experiment {
            model: self.model,
            transmission,
            distribution,
            strategies: self.strategies,
            sweep,
            seed: self.seed,
        })
    }
}

/// A validated experiment ready to run against graphs.
#[derive(Clone, Debug)]
pub struct Experiment {
    model: CascadeModelKind,
    transmission: Probability,
    distribution: ThresholdDistribution,
    strategies: Vec<SeedStrategy>,
    sweep: Sweep,
    seed: u64,
}

impl Experiment {
    /// Returns the cascade model.
    #[must_use]
    #[rustfmt::skip]
    pub fn model(&self) -> CascadeModelKind { self.model }

    /// Returns the SIR transmission probability.
    #[must_use]
    #[rustfmt::skip]
    pub fn transmission(&self) -> Probability { self.transmission }

    /// Returns the threshold distribution.
    #[must_use]
    #[rustfmt::skip]
    pub fn distribution(&self) -> ThresholdDistribution { self.distribution }

    /// Returns the strategies in report order.
    #[must_use]
    #[rustfmt::skip]
    pub fn strategies(&self) -> &[SeedStrategy] { &self.strategies }

    /// Returns the sweep configuration.
    #[must_use]
    #[rustfmt::skip]
    pub fn sweep(&self) -> &Sweep { &self.sweep }

    /// Runs one sweep per strategy over `graph`.
    ///
    /// # Errors
    /// Returns [`SimulationError::EmptyGraph`] for a graph without nodes and
    /// [`SimulationError::SeedCountExceedsNodes`] when `max_seeds` exceeds the
    /// node count. Both are checked before any cascade runs.
    ///
    /// # Examples
    /// ```
    /// use cascadia_core::{ExperimentBuilder, Graph, SeedStrategy};
    ///
    /// let graph = Graph::new(4, vec![(0, 1), (1, 2), (2, 3)])?;
    /// let report = ExperimentBuilder::new()
    ///     .with_transmission(1.0)
    ///     .with_max_seeds(2)
    ///     .with_repeats(3)
    ///     .build()?
    ///     .run(&graph)?;
    /// assert_eq!(report.curves().len(), 3);
    /// let degree = report.curve(SeedStrategy::Degree).expect("degree was swept");
    /// assert_eq!(degree.cascade_at(1), Some(1.0));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[instrument(
        name = "core.experiment",
        err,
        skip(self, graph),
        fields(
            model = %self.model,
            strategies = self.strategies.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
        ),
    )]
    pub fn run(&self, graph: &Graph) -> Result<ExperimentReport> {
        let nodes = graph.node_count();
        if nodes == 0 {
            return Err(SimulationError::EmptyGraph);
        }
        let max_seeds = self.sweep.max_seeds().get();
        if max_seeds > nodes {
            return Err(SimulationError::SeedCountExceedsNodes {
                requested: max_seeds,
                nodes,
            });
        }

        let view = graph.adjacency();
        let model = match self.model {
            CascadeModelKind::Sir => CascadeModel::Sir {
                transmission: self.transmission,
            },
            CascadeModelKind::Threshold => {
                let mut rng = SmallRng::seed_from_u64(self.seed);
                CascadeModel::Threshold {
                    thresholds: self.distribution.generate(nodes, &mut rng),
                }
            }
        };

        let curves = self.sweep_strategies(&view, &model)?;
        info!(curves = curves.len(), "experiment complete");
        Ok(ExperimentReport {
            model: self.model,
            node_count: nodes,
            average_degree: view.average_degree(),
            curves,
        })
    }

    fn sweep_one(
        &self,
        view: &AdjacencyView,
        model: &CascadeModel,
        position: usize,
        strategy: SeedStrategy,
    ) -> Result<(SeedStrategy, SweepCurve)> {
        let mut rng = task_rng(self.seed, position);
        let curve = self.sweep.run(view, model, strategy, &mut rng)?;
        Ok((strategy, curve))
    }

    #[cfg(feature = "parallel")]
    fn sweep_strategies(
        &self,
        view: &AdjacencyView,
        model: &CascadeModel,
    ) -> Result<Vec<(SeedStrategy, SweepCurve)>> {
        self.strategies
            .par_iter()
            .enumerate()
            .map(|(position, &strategy)| self.sweep_one(view, model, position, strategy))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn sweep_strategies(
        &self,
        view: &AdjacencyView,
        model: &CascadeModel,
    ) -> Result<Vec<(SeedStrategy, SweepCurve)>> {
        self.strategies
            .iter()
            .enumerate()
            .map(|(position, &strategy)| self.sweep_one(view, model, position, strategy))
            .collect()
    }
}

/// Curves produced by [`Experiment::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentReport {
    model: CascadeModelKind,
    node_count: usize,
    average_degree: f64,
    curves: Vec<(SeedStrategy, SweepCurve)>,
}

impl ExperimentReport {
    /// Returns the model that was run.
    #[must_use]
    #[rustfmt::skip]
    pub fn model(&self) -> CascadeModelKind { self.model }

    /// Returns the number of nodes in the graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.node_count }

    /// Returns `2|E| / N` for the graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn average_degree(&self) -> f64 { self.average_degree }

    /// Returns one curve per strategy, in the configured order.
    #[must_use]
    pub fn curves(&self) -> &[(SeedStrategy, SweepCurve)] {
        &self.curves
    }

    /// Returns the curve for `strategy`, if it was swept.
    #[must_use]
    pub fn curve(&self, strategy: SeedStrategy) -> Option<&SweepCurve> {
        self.curves
            .iter()
            .find(|(swept, _)| *swept == strategy)
            .map(|(_, curve)| curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ring(nodes: usize) -> Graph {
        let edges = (0..nodes).map(|node| (node, (node + 1) % nodes)).collect();
        Graph::new(nodes, edges).expect("ring must be valid")
    }

    #[rstest]
    #[case::sir("SIR", CascadeModelKind::Sir)]
    #[case::threshold(" threshold", CascadeModelKind::Threshold)]
    fn parses_model_names(#[case] raw: &str, #[case] expected: CascadeModelKind) {
        assert_eq!(raw.parse::<CascadeModelKind>().expect("name must parse"), expected);
    }

    #[rstest]
    #[case::transmission(
        ExperimentBuilder::new().with_transmission(1.5),
        "SIMULATION_INVALID_PROBABILITY"
    )]
    #[case::distribution(
        ExperimentBuilder::new().with_distribution(0),
        "SIMULATION_UNKNOWN_DISTRIBUTION"
    )]
    #[case::repeats(ExperimentBuilder::new().with_repeats(0), "SIMULATION_INVALID_REPEATS")]
    #[case::max_seeds(ExperimentBuilder::new().with_max_seeds(0), "SIMULATION_INVALID_MAX_SEEDS")]
    #[case::strategies(
        ExperimentBuilder::new().with_strategies(Vec::new()),
        "SIMULATION_NO_STRATEGIES"
    )]
    fn build_rejects_invalid_configuration(
        #[case] builder: ExperimentBuilder,
        #[case] code: &str,
    ) {
        let err = builder.build().expect_err("configuration must be rejected");
        assert_eq!(err.code().as_str(), code);
    }

    #[test]
    fn run_rejects_more_seeds_than_nodes() {
        let experiment = ExperimentBuilder::new()
            .with_max_seeds(6)
            .build()
            .expect("configuration is valid");
        let err = experiment.run(&ring(5)).expect_err("oversized run must fail");
        assert_eq!(
            err,
            SimulationError::SeedCountExceedsNodes {
                requested: 6,
                nodes: 5
            }
        );
    }

    #[test]
    fn report_keeps_strategy_order() {
        let report = ExperimentBuilder::new()
            .with_max_seeds(3)
            .with_repeats(2)
            .with_seed(5)
            .build()
            .expect("configuration is valid")
            .run(&ring(12))
            .expect("run must succeed");
        let order: Vec<SeedStrategy> = report.curves().iter().map(|(s, _)| *s).collect();
        assert_eq!(order, SeedStrategy::ALL.to_vec());
        assert_eq!(report.node_count(), 12);
        assert_eq!(report.average_degree(), 2.0);
        assert!(report.curves().iter().all(|(_, curve)| curve.len() == 3));
    }

    #[rstest]
    #[case(CascadeModelKind::Sir)]
    #[case(CascadeModelKind::Threshold)]
    fn seeded_experiments_replay(#[case] model: CascadeModelKind) {
        let graph = crate::generate::erdos_renyi(
            60,
            0.06,
            &mut SmallRng::seed_from_u64(21),
        )
        .expect("generation must succeed");
        let experiment = ExperimentBuilder::new()
            .with_model(model)
            .with_transmission(0.25)
            .with_distribution(3)
            .with_max_seeds(4)
            .with_repeats(5)
            .with_seed(77)
            .build()
            .expect("configuration is valid");
        let first = experiment.run(&graph).expect("run must succeed");
        let second = experiment.run(&graph).expect("run must succeed");
        assert_eq!(first, second);
    }
}
