//! SIR transmission cascade.
//!
//! Informed nodes are kept in a work-list that grows while it is walked: the
//! cursor visits seeds in the order given and then every node appended during
//! the walk. For each visited node, every still-normal neighbour (ascending
//! index) costs exactly one uniform draw and becomes informed when the draw is
//! below the transmission probability. The walk ends when the cursor reaches
//! the end of the list. There is no recovery state.
//!
//! Keeping this order fixed means a seeded RNG replays a run draw for draw.

use rand::{Rng, distributions::Standard};

use crate::{Result, graph::AdjacencyView};

use super::{CascadeEngine, NodeStatus, Probability};

/// SIR cascade with a fixed transmission probability.
///
/// # Examples
/// ```
/// use cascadia_core::{CascadeEngine, Graph, Probability, SirCascade};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let view = Graph::new(5, vec![(0, 1), (1, 2), (2, 3), (3, 4)])?.adjacency();
/// let mut engine = SirCascade::new(Probability::ONE);
/// let mut rng = SmallRng::seed_from_u64(0);
/// assert_eq!(engine.spread(&view, &[0], &mut rng)?, 5);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SirCascade {
    transmission: Probability,
    status: NodeStatus,
    worklist: Vec<usize>,
}

impl SirCascade {
    /// Creates an engine transmitting along each edge attempt with
    /// probability `transmission`.
    #[must_use]
    pub fn new(transmission: Probability) -> Self {
        Self {
            transmission,
            status: NodeStatus::default(),
            worklist: Vec::new(),
        }
    }

    /// Returns the transmission probability.
    #[must_use]
    pub fn transmission(&self) -> Probability {
        self.transmission
    }

    /// Returns the nodes informed by the last run, in the order they were
    /// informed (seeds first).
    #[must_use]
    pub fn informed(&self) -> &[usize] {
        &self.worklist
    }
}

impl CascadeEngine for SirCascade {
    fn name(&self) -> &'static str {
        "sir"
    }

    fn spread<R: Rng + ?Sized>(
        &mut self,
        view: &AdjacencyView,
        seeds: &[usize],
        rng: &mut R,
    ) -> Result<usize> {
        self.status.reset(view.node_count(), seeds)?;
        self.worklist.clear();
        self.worklist.extend_from_slice(seeds);

        let threshold = self.transmission.get();
        let mut cursor = 0;
        while let Some(&node) = self.worklist.get(cursor) {
            for &neighbour in view.neighbours(node) {
                if self.status.is_informed(neighbour) {
                    continue;
                }
                let draw: f64 = rng.sample(Standard);
                if draw < threshold {
                    self.status.inform(neighbour);
                    self.worklist.push(neighbour);
                }
            }
            cursor += 1;
        }
        Ok(self.worklist.len())
    }
}
