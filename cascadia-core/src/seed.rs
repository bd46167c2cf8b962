//! Seed-set selection strategies.
//!
//! Three interchangeable strategies choose the initially informed nodes of a
//! cascade: a uniform random sample, the top nodes by degree centrality, and
//! the top nodes by eigenvector centrality. Centrality rankings are computed
//! once per graph; callers sweeping several seed-set sizes take prefixes of
//! the same ranking so that the seeds for size `k` are always a prefix of the
//! seeds for size `k + 1`.
//!
//! Ties in either centrality are broken by ascending node index.

use std::{fmt, str::FromStr, sync::Arc};

use rand::{Rng, seq::index};
use tracing::{debug, warn};

use crate::{Result, error::SimulationError, graph::AdjacencyView};

/// Strategy used to pick seed nodes.
///
/// # Examples
/// ```
/// use cascadia_core::SeedStrategy;
///
/// let strategy: SeedStrategy = "Degree".parse()?;
/// assert_eq!(strategy, SeedStrategy::Degree);
/// assert_eq!(strategy.to_string(), "degree");
/// # Ok::<(), cascadia_core::SimulationError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SeedStrategy {
    /// Uniform sample without replacement; redrawn on every call.
    Random,
    /// Highest degree centrality first.
    Degree,
    /// Highest eigenvector centrality first.
    Eigen,
}

impl SeedStrategy {
    /// Every strategy, in the order experiments report them by default.
    pub const ALL: [Self; 3] = [Self::Random, Self::Eigen, Self::Degree];

    /// Returns the lowercase name of the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Degree => "degree",
            Self::Eigen => "eigen",
        }
    }

    /// Returns `true` when the strategy ranks nodes by a centrality score.
    #[must_use]
    pub const fn is_ranked(self) -> bool {
        matches!(self, Self::Degree | Self::Eigen)
    }
}

impl fmt::Display for SeedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedStrategy {
    type Err = SimulationError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "degree" => Ok(Self::Degree),
            "eigen" => Ok(Self::Eigen),
            _ => Err(SimulationError::UnknownStrategy {
                name: Arc::from(raw),
            }),
        }
    }
}

/// Power-iteration limits for eigenvector centrality.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EigenParams {
    max_iterations: usize,
    tolerance: f64,
}

impl EigenParams {
    /// Overrides the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Overrides the per-node convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        if tolerance.is_finite() && tolerance > 0.0 {
            self.tolerance = tolerance;
        }
        self
    }

    /// Returns the iteration cap.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the per-node convergence tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for EigenParams {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
            tolerance: 1.0e-10,
        }
    }
}

/// Picks seed sets for one [`SeedStrategy`].
///
/// # Examples
/// ```
/// use cascadia_core::{Graph, SeedSelector, SeedStrategy};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// // Star centred on node 2.
/// let view = Graph::new(4, vec![(2, 0), (2, 1), (2, 3)])?.adjacency();
/// let selector = SeedSelector::new(SeedStrategy::Degree);
/// let mut rng = SmallRng::seed_from_u64(1);
/// assert_eq!(selector.select(2, &view, &mut rng)?, vec![2, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedSelector {
    strategy: SeedStrategy,
    eigen: EigenParams,
}

impl SeedSelector {
    /// Creates a selector using default eigenvector parameters.
    #[must_use]
    pub fn new(strategy: SeedStrategy) -> Self {
        Self {
            strategy,
            eigen: EigenParams::default(),
        }
    }

    /// Overrides the eigenvector power-iteration parameters.
    #[must_use]
    pub fn with_eigen_params(mut self, eigen: EigenParams) -> Self {
        self.eigen = eigen;
        self
    }

    /// Returns the configured strategy.
    #[must_use]
    pub fn strategy(&self) -> SeedStrategy {
        self.strategy
    }

    /// Returns the full centrality ranking, most central first.
    ///
    /// Returns `None` for [`SeedStrategy::Random`], which has no ranking.
    #[must_use]
    pub fn rank(&self, view: &AdjacencyView) -> Option<Vec<usize>> {
        match self.strategy {
            SeedStrategy::Random => None,
            SeedStrategy::Degree => Some(rank_by_score(&degree_centrality(view))),
            SeedStrategy::Eigen => Some(rank_by_score(&eigenvector_centrality(view, self.eigen))),
        }
    }

    /// Returns `k` distinct seed nodes.
    ///
    /// # Errors
    /// Returns [`SimulationError::SeedCountExceedsNodes`] when `k` exceeds the
    /// number of nodes.
    pub fn select<R: Rng + ?Sized>(
        &self,
        k: usize,
        view: &AdjacencyView,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        let nodes = view.node_count();
        if k > nodes {
            return Err(SimulationError::SeedCountExceedsNodes {
                requested: k,
                nodes,
            });
        }
        match self.rank(view) {
            Some(mut ranking) => {
                ranking.truncate(k);
                Ok(ranking)
            }
            None => Ok(random_seeds(k, nodes, rng)),
        }
    }
}

/// Draws `k` distinct nodes uniformly from `0..nodes`.
///
/// Callers must ensure `k <= nodes`.
pub(crate) fn random_seeds<R: Rng + ?Sized>(k: usize, nodes: usize, rng: &mut R) -> Vec<usize> {
    index::sample(rng, nodes, k).into_vec()
}

/// Returns `degree / (N - 1)` for every node, or zeros when `N <= 1`.
///
/// # Examples
/// ```
/// use cascadia_core::{Graph, degree_centrality};
///
/// let view = Graph::new(3, vec![(0, 1), (1, 2)])?.adjacency();
/// assert_eq!(degree_centrality(&view), vec![0.5, 1.0, 0.5]);
/// # Ok::<(), cascadia_core::GraphError>(())
/// ```
#[must_use]
pub fn degree_centrality(view: &AdjacencyView) -> Vec<f64> {
    let nodes = view.node_count();
    if nodes <= 1 {
        return vec![0.0; nodes];
    }
    let scale = ((nodes - 1) as f64).recip();
    (0..nodes)
        .map(|node| view.degree(node) as f64 * scale)
        .collect()
}

/// Computes eigenvector centrality from the principal eigenvector of the
/// adjacency matrix.
///
/// Each connected component is solved separately by power iteration on
/// `A + I`. Only the components whose leading eigenvalue matches the largest
/// one in the graph keep non-zero scores; every other component, isolated
/// nodes, and graphs without edges score zero. The returned vector has unit
/// length unless it is all zeros.
#[must_use]
pub fn eigenvector_centrality(view: &AdjacencyView, params: EigenParams) -> Vec<f64> {
    let nodes = view.node_count();
    let mut scores = vec![0.0; nodes];
    if view.edge_count() == 0 {
        return scores;
    }

    let (labels, count) = view.components();
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut local = vec![0_usize; nodes];
    for (node, &label) in labels.iter().enumerate() {
        local[node] = members[label].len();
        members[label].push(node);
    }

    let solved: Vec<(f64, Vec<f64>)> = members
        .iter()
        .map(|component| {
            if component.len() < 2 {
                (0.0, vec![0.0; component.len()])
            } else {
                principal_eigenpair(view, component, &local, params)
            }
        })
        .collect();

    let lambda_max = solved
        .iter()
        .map(|(lambda, _)| *lambda)
        .fold(0.0_f64, f64::max);
    let cutoff = lambda_max - 1.0e-9 * lambda_max.max(1.0);
    let leaders: Vec<usize> = solved
        .iter()
        .enumerate()
        .filter(|(_, (lambda, _))| *lambda > 0.0 && *lambda >= cutoff)
        .map(|(label, _)| label)
        .collect();
    if leaders.is_empty() {
        return scores;
    }
    if leaders.len() < count {
        debug!(
            components = count,
            leading = leaders.len(),
            "eigenvector centrality zeroes non-leading components"
        );
    }

    let share = (leaders.len() as f64).sqrt().recip();
    for label in leaders {
        let (_, vector) = &solved[label];
        for (&node, value) in members[label].iter().zip(vector) {
            scores[node] = value.abs() * share;
        }
    }
    scores
}

/// Power iteration on `A + I` restricted to one connected component.
///
/// Returns the Rayleigh-quotient eigenvalue of `A` and the unit eigenvector in
/// component-local order.
fn principal_eigenpair(
    view: &AdjacencyView,
    component: &[usize],
    local: &[usize],
    params: EigenParams,
) -> (f64, Vec<f64>) {
    let size = component.len();
    let mut current = vec![(size as f64).sqrt().recip(); size];
    let mut next = vec![0.0; size];
    let limit = params.tolerance() * size as f64;
    let mut converged = false;

    for _ in 0..params.max_iterations() {
        for (slot, &node) in component.iter().enumerate() {
            let neighbourhood: f64 = view
                .neighbours(node)
                .iter()
                .map(|&other| current[local[other]])
                .sum();
            next[slot] = current[slot] + neighbourhood;
        }
        normalise(&mut next);
        let delta: f64 = next
            .iter()
            .zip(&current)
            .map(|(updated, previous)| (updated - previous).abs())
            .sum();
        std::mem::swap(&mut current, &mut next);
        if delta < limit {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            component_size = size,
            max_iterations = params.max_iterations(),
            "eigenvector power iteration did not converge; using last iterate"
        );
    }

    let rayleigh = component
        .iter()
        .enumerate()
        .map(|(slot, &node)| {
            let neighbourhood: f64 = view
                .neighbours(node)
                .iter()
                .map(|&other| current[local[other]])
                .sum();
            current[slot] * neighbourhood
        })
        .sum();
    (rayleigh, current)
}

fn normalise(vector: &mut [f64]) {
    let norm = vector.iter().map(|value| value * value).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in vector {
            *value /= norm;
        }
    }
}

/// Orders nodes by descending score; equal scores keep ascending node order.
fn rank_by_score(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&left, &right| scores[right].total_cmp(&scores[left]));
    order
}
