//! Linear threshold cascade run to a fixed point.
//!
//! Rounds are synchronous: every normal node is tested against the informed
//! set as it stood at the start of the round, and all nodes that pass adopt
//! together once the pass is complete. A node adopts when the fraction of its
//! neighbours that are informed is strictly greater than its threshold;
//! degree-zero nodes have fraction `0` and never adopt through neighbours.

use rand::Rng;

use crate::{Result, error::SimulationError, graph::AdjacencyView, thresholds::Thresholds};

use super::{CascadeEngine, NodeStatus};

/// Threshold cascade over a fixed per-node threshold array.
///
/// The engine consumes no randomness itself; callers reshuffle the
/// thresholds between runs through [`ThresholdCascade::thresholds_mut`].
///
/// # Examples
/// ```
/// use cascadia_core::{CascadeEngine, Graph, ThresholdCascade, Thresholds};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let view = Graph::new(5, vec![(0, 1), (1, 2), (2, 3), (3, 4)])?.adjacency();
/// let mut engine = ThresholdCascade::new(Thresholds::new(vec![0.0; 5])?);
/// let mut rng = SmallRng::seed_from_u64(0);
/// assert_eq!(engine.spread(&view, &[2], &mut rng)?, 5);
/// assert_eq!(engine.rounds(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct ThresholdCascade {
    thresholds: Thresholds,
    status: NodeStatus,
    informed_neighbours: Vec<usize>,
    normal: Vec<usize>,
    adopted: Vec<usize>,
    rounds: usize,
}

impl ThresholdCascade {
    /// Creates an engine using `thresholds`, one entry per node.
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            status: NodeStatus::default(),
            informed_neighbours: Vec::new(),
            normal: Vec::new(),
            adopted: Vec::new(),
            rounds: 0,
        }
    }

    /// Returns the current threshold assignment.
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Returns the threshold assignment for in-place reshuffling.
    pub fn thresholds_mut(&mut self) -> &mut Thresholds {
        &mut self.thresholds
    }

    /// Returns the number of rounds that adopted at least one node in the
    /// last run.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    fn record_adoption(&mut self, view: &AdjacencyView, node: usize) {
        self.status.inform(node);
        for &neighbour in view.neighbours(node) {
            self.informed_neighbours[neighbour] += 1;
        }
    }

    fn adopts(&self, view: &AdjacencyView, node: usize) -> bool {
        let degree = view.degree(node);
        let fraction = if degree == 0 {
            0.0
        } else {
            self.informed_neighbours[node] as f64 / degree as f64
        };
        fraction > self.thresholds.get(node)
    }
}

impl CascadeEngine for ThresholdCascade {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn spread<R: Rng + ?Sized>(
        &mut self,
        view: &AdjacencyView,
        seeds: &[usize],
        _rng: &mut R,
    ) -> Result<usize> {
        let nodes = view.node_count();
        if self.thresholds.len() != nodes {
            return Err(SimulationError::ThresholdLengthMismatch {
                thresholds: self.thresholds.len(),
                nodes,
            });
        }
        self.status.reset(nodes, seeds)?;
        self.informed_neighbours.clear();
        self.informed_neighbours.resize(nodes, 0);
        for &seed in seeds {
            for &neighbour in view.neighbours(seed) {
                self.informed_neighbours[neighbour] += 1;
            }
        }
        self.normal.clear();
        self.normal
            .extend((0..nodes).filter(|&node| !self.status.is_informed(node)));
        self.rounds = 0;

        let mut informed = seeds.len();
        while informed < nodes {
            self.adopted.clear();
            for &node in &self.normal {
                if self.adopts(view, node) {
                    self.adopted.push(node);
                }
            }
            if self.adopted.is_empty() {
                break;
            }
            self.rounds += 1;
            informed += self.adopted.len();

            let adopted = std::mem::take(&mut self.adopted);
            for &node in &adopted {
                self.record_adoption(view, node);
            }
            self.adopted = adopted;
            let status = &self.status;
            self.normal.retain(|&node| !status.is_informed(node));
        }
        Ok(informed)
    }
}
