//! Monte Carlo sweep over seed-set sizes.
//!
//! A sweep runs one cascade model for every seed-set size in
//! `1..=max_seeds`, repeating each size `repeats` times, and reports the mean
//! fraction of informed nodes per size.

use std::num::NonZeroUsize;

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::{
    Result,
    cascade::{CascadeEngine, Probability, SirCascade, ThresholdCascade},
    error::SimulationError,
    graph::AdjacencyView,
    seed::{EigenParams, SeedSelector, SeedStrategy, random_seeds},
    thresholds::Thresholds,
};

/// Cascade model and its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum CascadeModel {
    /// SIR transmission with probability `transmission` per edge attempt.
    Sir {
        /// Per-attempt transmission probability.
        transmission: Probability,
    },
    /// Linear threshold model; thresholds are reshuffled before every repeat.
    Threshold {
        /// One threshold per node.
        thresholds: Thresholds,
    },
}

impl CascadeModel {
    /// Returns the lowercase model name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sir { .. } => "sir",
            Self::Threshold { .. } => "threshold",
        }
    }
}

/// Mean cascade size for one seed-set size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepPoint {
    seed_size: usize,
    cascade: f64,
}

impl SweepPoint {
    /// Number of seeds used.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed_size(&self) -> usize { self.seed_size }

    /// Mean informed fraction in `[0, 1]`.
    #[must_use]
    #[rustfmt::skip]
    pub fn cascade(&self) -> f64 { self.cascade }
}

/// Sweep results ordered by ascending seed-set size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweepCurve {
    points: Vec<SweepPoint>,
}

impl SweepCurve {
    /// Returns the points, smallest seed set first.
    #[must_use]
    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when the curve has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the mean cascade for `seed_size`, if it was swept.
    #[must_use]
    pub fn cascade_at(&self, seed_size: usize) -> Option<f64> {
        seed_size
            .checked_sub(1)
            .and_then(|idx| self.points.get(idx))
            .map(SweepPoint::cascade)
    }

    /// Iterates over the points in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SweepPoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a SweepCurve {
    type Item = &'a SweepPoint;
    type IntoIter = std::slice::Iter<'a, SweepPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Configures and constructs [`Sweep`] instances.
///
/// # Examples
/// ```
/// use cascadia_core::SweepBuilder;
///
/// let sweep = SweepBuilder::new()
///     .with_max_seeds(5)
///     .with_repeats(10)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(sweep.max_seeds().get(), 5);
/// assert_eq!(sweep.repeats().get(), 10);
/// assert!(SweepBuilder::new().with_repeats(0).build().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct SweepBuilder {
    max_seeds: usize,
    repeats: usize,
    eigen: EigenParams,
}

impl Default for SweepBuilder {
    fn default() -> Self {
        Self {
            max_seeds: 20,
            repeats: 50,
            eigen: EigenParams::default(),
        }
    }
}

impl SweepBuilder {
    /// Creates a builder with 20 seed sizes and 50 repeats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the largest seed-set size.
    #[must_use]
    pub fn with_max_seeds(mut self, max_seeds: usize) -> Self {
        self.max_seeds = max_seeds;
        self
    }

    /// Overrides the number of repeats per seed-set size.
    #[must_use]
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Overrides the eigenvector centrality parameters.
    #[must_use]
    pub fn with_eigen_params(mut self, eigen: EigenParams) -> Self {
        self.eigen = eigen;
        self
    }

    /// Returns the configured largest seed-set size.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_seeds(&self) -> usize { self.max_seeds }

    /// Returns the configured repeat count.
    #[must_use]
    #[rustfmt::skip]
    pub fn repeats(&self) -> usize { self.repeats }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidMaxSeeds`] or
    /// [`SimulationError::InvalidRepeats`] when either count is zero.
    pub fn build(self) -> Result<Sweep> {
        let max_seeds = NonZeroUsize::new(self.max_seeds).ok_or(SimulationError::InvalidMaxSeeds {
            got: self.max_seeds,
        })?;
        let repeats = NonZeroUsize::new(self.repeats).ok_or(SimulationError::InvalidRepeats {
            got: self.repeats,
        })?;
        Ok(Sweep {
            max_seeds,
            repeats,
            eigen: self.eigen,
        })
    }
}

/// A validated sweep configuration.
#[derive(Clone, Debug)]
pub struct Sweep {
    max_seeds: NonZeroUsize,
    repeats: NonZeroUsize,
    eigen: EigenParams,
}

impl Sweep {
    /// Returns the largest seed-set size.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_seeds(&self) -> NonZeroUsize { self.max_seeds }

    /// Returns the repeat count per seed-set size.
    #[must_use]
    #[rustfmt::skip]
    pub fn repeats(&self) -> NonZeroUsize { self.repeats }

    /// Returns the eigenvector centrality parameters.
    #[must_use]
    #[rustfmt::skip]
    pub fn eigen_params(&self) -> EigenParams { self.eigen }

    /// Sweeps seed-set sizes `1..=max_seeds` for one model and strategy.
    ///
    /// Ranked strategies compute their ranking once and use its first `size`
    /// entries for every repeat. [`SeedStrategy::Random`] draws a fresh seed
    /// set on every repeat. For the threshold model the thresholds are
    /// reshuffled at the start of each repeat, before seeds are drawn.
    ///
    /// # Errors
    /// Returns [`SimulationError::EmptyGraph`] for a graph without nodes,
    /// [`SimulationError::SeedCountExceedsNodes`] when `max_seeds` exceeds the
    /// node count, and [`SimulationError::ThresholdLengthMismatch`] when the
    /// threshold array does not match the graph. All checks run before any
    /// cascade.
    ///
    /// # Examples
    /// ```
    /// use cascadia_core::{CascadeModel, Graph, Probability, SeedStrategy, SweepBuilder};
    /// use rand::{SeedableRng, rngs::SmallRng};
    ///
    /// let view = Graph::new(4, vec![(0, 1), (1, 2), (2, 3)])?.adjacency();
    /// let sweep = SweepBuilder::new().with_max_seeds(2).with_repeats(3).build()?;
    /// let model = CascadeModel::Sir { transmission: Probability::ONE };
    /// let mut rng = SmallRng::seed_from_u64(7);
    /// let curve = sweep.run(&view, &model, SeedStrategy::Degree, &mut rng)?;
    /// assert_eq!(curve.cascade_at(1), Some(1.0));
    /// assert_eq!(curve.len(), 2);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[instrument(
        name = "core.sweep",
        err,
        skip(self, view, model, rng),
        fields(
            model = model.name(),
            strategy = %strategy,
            max_seeds = self.max_seeds.get(),
            repeats = self.repeats.get(),
            nodes = view.node_count(),
        ),
    )]
    pub fn run<R: Rng + ?Sized>(
        &self,
        view: &AdjacencyView,
        model: &CascadeModel,
        strategy: SeedStrategy,
        rng: &mut R,
    ) -> Result<SweepCurve> {
        let nodes = view.node_count();
        if nodes == 0 {
            return Err(SimulationError::EmptyGraph);
        }
        if self.max_seeds.get() > nodes {
            return Err(SimulationError::SeedCountExceedsNodes {
                requested: self.max_seeds.get(),
                nodes,
            });
        }
        if let CascadeModel::Threshold { thresholds } = model
            && thresholds.len() != nodes
        {
            return Err(SimulationError::ThresholdLengthMismatch {
                thresholds: thresholds.len(),
                nodes,
            });
        }

        let ranking = SeedSelector::new(strategy)
            .with_eigen_params(self.eigen)
            .rank(view);
        let curve = match model {
            CascadeModel::Sir { transmission } => self.sweep_engine(
                view,
                &mut SirCascade::new(*transmission),
                ranking.as_deref(),
                rng,
                |_, _| {},
            ),
            CascadeModel::Threshold { thresholds } => self.sweep_engine(
                view,
                &mut ThresholdCascade::new(thresholds.clone()),
                ranking.as_deref(),
                rng,
                |engine, rng| engine.thresholds_mut().shuffle(rng),
            ),
        }?;
        info!(points = curve.len(), "sweep complete");
        Ok(curve)
    }

    fn sweep_engine<E, R, F>(
        &self,
        view: &AdjacencyView,
        engine: &mut E,
        ranking: Option<&[usize]>,
        rng: &mut R,
        mut before_repeat: F,
    ) -> Result<SweepCurve>
    where
        E: CascadeEngine,
        R: Rng + ?Sized,
        F: FnMut(&mut E, &mut R),
    {
        let nodes = view.node_count();
        let repeats = self.repeats.get();
        let mut points = Vec::with_capacity(self.max_seeds.get());
        for seed_size in 1..=self.max_seeds.get() {
            let mut informed = 0_usize;
            for _ in 0..repeats {
                before_repeat(engine, rng);
                informed += match ranking {
                    Some(ranked) => engine.spread(view, &ranked[..seed_size], rng)?,
                    None => {
                        let seeds = random_seeds(seed_size, nodes, rng);
                        engine.spread(view, &seeds, rng)?
                    }
                };
            }
            let cascade = informed as f64 / repeats as f64 / nodes as f64;
            debug!(seed_size, cascade, engine = engine.name(), "seed size swept");
            points.push(SweepPoint { seed_size, cascade });
        }
        Ok(SweepCurve { points })
    }
}
