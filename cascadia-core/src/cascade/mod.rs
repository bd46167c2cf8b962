//! Cascade propagation engines.
//!
//! Both engines start from a seed set, move nodes from `Normal` to
//! `Informed` (never back), and report how many nodes were informed when the
//! process stopped. Each engine instance owns its per-run state and reuses its
//! buffers across runs, so one instance per worker is enough.

mod sir;
mod threshold;

pub use sir::SirCascade;
pub use threshold::ThresholdCascade;

use rand::Rng;

use crate::{Result, error::SimulationError, graph::AdjacencyView};

/// A diffusion process that can be run repeatedly over a static graph.
pub trait CascadeEngine {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Runs one cascade from `seeds` and returns the number of informed nodes
    /// at termination.
    ///
    /// # Errors
    /// Returns [`SimulationError::EmptyGraph`] for a graph without nodes,
    /// [`SimulationError::SeedOutOfRange`] or
    /// [`SimulationError::DuplicateSeed`] for an invalid seed set, and any
    /// engine-specific configuration error.
    fn spread<R: Rng + ?Sized>(
        &mut self,
        view: &AdjacencyView,
        seeds: &[usize],
        rng: &mut R,
    ) -> Result<usize>;
}

/// A probability validated to be a finite value in `[0, 1]`.
///
/// # Examples
/// ```
/// use cascadia_core::Probability;
///
/// let c = Probability::new(0.25)?;
/// assert_eq!(c.get(), 0.25);
/// assert!(Probability::new(1.5).is_err());
/// # Ok::<(), cascadia_core::SimulationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// Certain transmission.
    pub const ONE: Self = Self(1.0);
    /// No transmission.
    pub const ZERO: Self = Self(0.0);

    /// Validates `value` as a transmission probability.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidProbability`] when `value` is not a
    /// finite value in `[0, 1]`.
    pub fn new(value: f64) -> Result<Self> {
        Self::named("transmission probability", value)
    }

    pub(crate) fn named(parameter: &'static str, value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SimulationError::InvalidProbability {
                parameter,
                got: value,
            })
        }
    }

    /// Returns the underlying value.
    #[must_use]
    #[rustfmt::skip]
    pub fn get(self) -> f64 { self.0 }
}

impl TryFrom<f64> for Probability {
    type Error = SimulationError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

/// Per-node `Informed` flags for one run.
#[derive(Debug, Default)]
struct NodeStatus {
    informed: Vec<bool>,
}

impl NodeStatus {
    /// Clears the flags for a graph of `nodes` nodes and marks `seeds`.
    fn reset(&mut self, nodes: usize, seeds: &[usize]) -> Result<()> {
        if nodes == 0 {
            return Err(SimulationError::EmptyGraph);
        }
        self.informed.clear();
        self.informed.resize(nodes, false);
        for &seed in seeds {
            let Some(flag) = self.informed.get_mut(seed) else {
                return Err(SimulationError::SeedOutOfRange { seed, nodes });
            };
            if *flag {
                return Err(SimulationError::DuplicateSeed { seed });
            }
            *flag = true;
        }
        Ok(())
    }

    fn is_informed(&self, node: usize) -> bool {
        self.informed[node]
    }

    fn inform(&mut self, node: usize) {
        self.informed[node] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(1.0)]
    fn probability_accepts_unit_interval(#[case] value: f64) {
        assert_eq!(Probability::new(value).expect("value is valid").get(), value);
    }

    #[rstest]
    #[case(-0.01)]
    #[case(1.01)]
    #[case(f64::INFINITY)]
    #[case(f64::NAN)]
    fn probability_rejects_values_outside_unit_interval(#[case] value: f64) {
        let err = Probability::try_from(value).expect_err("value must be rejected");
        assert!(matches!(err, SimulationError::InvalidProbability { .. }));
    }

    #[test]
    fn status_reset_rejects_bad_seeds() {
        let mut status = NodeStatus::default();
        assert_eq!(
            status.reset(3, &[0, 3]),
            Err(SimulationError::SeedOutOfRange { seed: 3, nodes: 3 })
        );
        assert_eq!(
            status.reset(3, &[1, 1]),
            Err(SimulationError::DuplicateSeed { seed: 1 })
        );
        assert_eq!(status.reset(0, &[]), Err(SimulationError::EmptyGraph));
    }

    #[test]
    fn status_reset_clears_previous_run() {
        let mut status = NodeStatus::default();
        status.reset(3, &[0, 1, 2]).expect("seeds are valid");
        status.reset(3, &[2]).expect("seeds are valid");
        assert!(!status.is_informed(0));
        assert!(!status.is_informed(1));
        assert!(status.is_informed(2));
    }
}
