//! Per-node adoption thresholds and the distributions they are drawn from.
//!
//! Six distribution shapes are supported, identified by the integers `1..=6`:
//!
//! | id | shape                                                       |
//! |----|-------------------------------------------------------------|
//! | 1  | uniform on `[0, 1)`                                         |
//! | 2  | normal(0.5, 0.2); out-of-range draws replaced by `U[0.45, 0.55)` |
//! | 3  | mixture over `[0, 0.2)`, `[0.2, 0.8)`, `[0.8, 1)` at 45/10/45 |
//! | 4  | same segments at 20/10/70                                   |
//! | 5  | same segments at 70/10/20                                   |
//! | 6  | same segments at 10/80/10                                   |

use std::fmt;

use rand::{Rng, seq::SliceRandom};
use rand_distr::StandardNormal;

use crate::{Result, cascade::Probability, error::SimulationError};

/// Value ranges of the three mixture segments.
pub const MIXTURE_SEGMENTS: [(f64, f64); 3] = [(0.0, 0.2), (0.2, 0.8), (0.8, 1.0)];

const NORMAL_MEAN: f64 = 0.5;
const NORMAL_STD_DEV: f64 = 0.2;
const CLIP_REPLACEMENT: (f64, f64) = (0.45, 0.55);

/// Percentage of nodes drawn from each mixture segment.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MixtureWeights {
    low: u8,
    middle: u8,
    high: u8,
}

impl MixtureWeights {
    /// Mostly polarised thresholds: 45/10/45.
    pub const POLARISED: Self = Self::new(45, 10, 45);
    /// Mostly resistant nodes: 20/10/70.
    pub const RESISTANT: Self = Self::new(20, 10, 70);
    /// Mostly susceptible nodes: 70/10/20.
    pub const SUSCEPTIBLE: Self = Self::new(70, 10, 20);
    /// Mostly moderate thresholds: 10/80/10.
    pub const MODERATE: Self = Self::new(10, 80, 10);

    const fn new(low: u8, middle: u8, high: u8) -> Self {
        Self { low, middle, high }
    }

    /// Returns the `(low, middle, high)` percentages.
    #[must_use]
    pub const fn percentages(self) -> (u8, u8, u8) {
        (self.low, self.middle, self.high)
    }

    /// Splits `n` nodes across the three segments.
    ///
    /// The first two sizes are `weight * n / 100` rounded half to even; the
    /// last segment takes whatever remains so the sizes always sum to `n`.
    ///
    /// # Examples
    /// ```
    /// use cascadia_core::MixtureWeights;
    ///
    /// assert_eq!(MixtureWeights::POLARISED.segment_sizes(10), [4, 1, 5]);
    /// assert_eq!(MixtureWeights::MODERATE.segment_sizes(7), [1, 6, 0]);
    /// ```
    #[must_use]
    pub fn segment_sizes(self, n: usize) -> [usize; 3] {
        let low = scaled_share(self.low, n).min(n);
        let middle = scaled_share(self.middle, n).min(n - low);
        [low, middle, n - low - middle]
    }
}

fn scaled_share(weight: u8, n: usize) -> usize {
    let exact = (usize::from(weight) * n) as f64 / 100.0;
    exact.round_ties_even() as usize
}

/// Shape of the threshold distribution.
///
/// # Examples
/// ```
/// use cascadia_core::{MixtureWeights, ThresholdDistribution};
///
/// let distribution = ThresholdDistribution::from_type(4)?;
/// assert_eq!(distribution, ThresholdDistribution::Mixture(MixtureWeights::RESISTANT));
/// assert_eq!(distribution.type_id(), 4);
/// assert!(ThresholdDistribution::from_type(7).is_err());
/// # Ok::<(), cascadia_core::SimulationError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ThresholdDistribution {
    /// Independent uniform draws on `[0, 1)`.
    Uniform,
    /// Normal(0.5, 0.2) draws; values outside `[0, 1]` are replaced by a
    /// uniform draw on `[0.45, 0.55)`.
    ClippedNormal,
    /// Three-segment piecewise-uniform mixture, shuffled.
    Mixture(MixtureWeights),
}

impl ThresholdDistribution {
    /// Maps a distribution identifier in `1..=6` to its shape.
    ///
    /// # Errors
    /// Returns [`SimulationError::UnknownDistribution`] for any other id.
    pub fn from_type(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Self::Uniform),
            2 => Ok(Self::ClippedNormal),
            3 => Ok(Self::Mixture(MixtureWeights::POLARISED)),
            4 => Ok(Self::Mixture(MixtureWeights::RESISTANT)),
            5 => Ok(Self::Mixture(MixtureWeights::SUSCEPTIBLE)),
            6 => Ok(Self::Mixture(MixtureWeights::MODERATE)),
            got => Err(SimulationError::UnknownDistribution { got }),
        }
    }

    /// Returns the identifier accepted by [`Self::from_type`].
    #[must_use]
    pub fn type_id(self) -> u8 {
        match self {
            Self::Uniform => 1,
            Self::ClippedNormal => 2,
            Self::Mixture(MixtureWeights::POLARISED) => 3,
            Self::Mixture(MixtureWeights::RESISTANT) => 4,
            Self::Mixture(MixtureWeights::SUSCEPTIBLE) => 5,
            Self::Mixture(_) => 6,
        }
    }

    /// Draws `n` thresholds.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(self, n: usize, rng: &mut R) -> Thresholds {
        let values = match self {
            Self::Uniform => (0..n).map(|_| rng.gen_range(0.0..1.0)).collect(),
            Self::ClippedNormal => (0..n)
                .map(|_| {
                    let z: f64 = rng.sample(StandardNormal);
                    replace_out_of_range(NORMAL_MEAN + NORMAL_STD_DEV * z, rng)
                })
                .collect(),
            Self::Mixture(weights) => {
                let mut values = Vec::with_capacity(n);
                for (size, (low, high)) in weights.segment_sizes(n).into_iter().zip(MIXTURE_SEGMENTS)
                {
                    values.extend((0..size).map(|_| rng.gen_range(low..high)));
                }
                values.shuffle(rng);
                values
            }
        };
        Thresholds { values }
    }
}

/// Keeps `value` when it lies in `[0, 1]`, otherwise draws a replacement from
/// `U[0.45, 0.55)`. Out-of-range draws are never clamped to the bounds.
fn replace_out_of_range<R: Rng + ?Sized>(value: f64, rng: &mut R) -> f64 {
    if (0.0..=1.0).contains(&value) {
        value
    } else {
        rng.gen_range(CLIP_REPLACEMENT.0..CLIP_REPLACEMENT.1)
    }
}

impl fmt::Display for ThresholdDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => f.write_str("uniform"),
            Self::ClippedNormal => f.write_str("clipped-normal"),
            Self::Mixture(weights) => {
                let (low, middle, high) = weights.percentages();
                write!(f, "mixture-{low}/{middle}/{high}")
            }
        }
    }
}

/// One adoption threshold per node, each in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Thresholds {
    values: Vec<f64>,
}

impl Thresholds {
    /// Wraps explicit threshold values.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidProbability`] when a value is not a
    /// finite number in `[0, 1]`.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        for &value in &values {
            Probability::named("threshold", value)?;
        }
        Ok(Self { values })
    }

    /// Returns the number of thresholds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when there are no thresholds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the threshold of `node`, or `1.0` (never adopts) when out of
    /// range.
    #[must_use]
    pub fn get(&self, node: usize) -> f64 {
        self.values.get(node).copied().unwrap_or(1.0)
    }

    /// Returns the thresholds in node order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Redistributes the same values across nodes uniformly at random.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.values.shuffle(rng);
    }

    /// Counts values falling in each of [`MIXTURE_SEGMENTS`].
    ///
    /// # Examples
    /// ```
    /// use cascadia_core::Thresholds;
    ///
    /// let thresholds = Thresholds::new(vec![0.1, 0.2, 0.5, 0.8, 1.0])?;
    /// assert_eq!(thresholds.segment_counts(), [1, 2, 2]);
    /// # Ok::<(), cascadia_core::SimulationError>(())
    /// ```
    #[must_use]
    pub fn segment_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for &value in &self.values {
            let segment = if value < MIXTURE_SEGMENTS[1].0 {
                0
            } else if value < MIXTURE_SEGMENTS[2].0 {
                1
            } else {
                2
            };
            counts[segment] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    #[case(5)]
    #[case(6)]
    fn type_ids_round_trip(#[case] id: u8) {
        let distribution = ThresholdDistribution::from_type(id).expect("id is supported");
        assert_eq!(distribution.type_id(), id);
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    fn rejects_unknown_type_ids(#[case] id: u8) {
        assert_eq!(
            ThresholdDistribution::from_type(id),
            Err(SimulationError::UnknownDistribution { got: id })
        );
    }

    #[rstest]
    #[case::half_rounds_to_even(MixtureWeights::POLARISED, 10, [4, 1, 5])]
    #[case::exact(MixtureWeights::RESISTANT, 100, [20, 10, 70])]
    #[case::remainder_in_last(MixtureWeights::SUSCEPTIBLE, 33, [23, 3, 7])]
    #[case::single_node(MixtureWeights::POLARISED, 1, [0, 0, 1])]
    #[case::empty(MixtureWeights::MODERATE, 0, [0, 0, 0])]
    fn segment_sizes_follow_weights(
        #[case] weights: MixtureWeights,
        #[case] n: usize,
        #[case] expected: [usize; 3],
    ) {
        assert_eq!(weights.segment_sizes(n), expected);
    }

    #[test]
    fn clipped_normal_stays_in_unit_interval() {
        let mut rng = SmallRng::seed_from_u64(17);
        let thresholds = ThresholdDistribution::ClippedNormal.generate(5_000, &mut rng);
        assert_eq!(thresholds.len(), 5_000);
        assert!(
            thresholds
                .as_slice()
                .iter()
                .all(|value| (0.0..=1.0).contains(value))
        );
        let mean = thresholds.as_slice().iter().sum::<f64>() / 5_000.0;
        assert!((mean - 0.5).abs() < 0.02, "mean {mean}");
    }

    #[rstest]
    #[case::below(-0.3)]
    #[case::above(1.2)]
    #[case::far_below(-4.0)]
    fn out_of_range_normal_draws_are_replaced_near_the_mean(#[case] value: f64) {
        let mut rng = SmallRng::seed_from_u64(23);
        for _ in 0..100 {
            let replaced = replace_out_of_range(value, &mut rng);
            assert!((0.45..0.55).contains(&replaced), "replacement {replaced}");
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.37)]
    #[case(1.0)]
    fn in_range_normal_draws_are_kept(#[case] value: f64) {
        let mut rng = SmallRng::seed_from_u64(23);
        assert_eq!(replace_out_of_range(value, &mut rng), value);
    }

    #[test]
    fn clipped_normal_never_piles_up_on_the_bounds() {
        let mut rng = SmallRng::seed_from_u64(31);
        let thresholds = ThresholdDistribution::ClippedNormal.generate(20_000, &mut rng);
        let values = thresholds.as_slice();
        assert!(values.iter().all(|&value| value != 0.0 && value != 1.0));
        // About 1.2% of normal(0.5, 0.2) draws fall outside [0, 1]; all of
        // them must land in the replacement band.
        let band = values
            .iter()
            .filter(|value| (0.45..0.55).contains(*value))
            .count();
        assert!(band > 4_000, "band count {band}");
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut thresholds = ThresholdDistribution::Uniform.generate(50, &mut rng);
        let mut before = thresholds.as_slice().to_vec();
        thresholds.shuffle(&mut rng);
        let mut after = thresholds.as_slice().to_vec();
        before.sort_by(f64::total_cmp);
        after.sort_by(f64::total_cmp);
        assert_eq!(before, after);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = Thresholds::new(vec![0.2, 1.2]).expect_err("1.2 is not a threshold");
        assert!(matches!(
            err,
            SimulationError::InvalidProbability {
                parameter: "threshold",
                ..
            }
        ));
    }

    proptest! {
        #[test]
        fn mixture_counts_match_segment_sizes(id in 3_u8..=6, n in 0_usize..400, seed in any::<u64>()) {
            let distribution = ThresholdDistribution::from_type(id).expect("id is supported");
            let ThresholdDistribution::Mixture(weights) = distribution else {
                return Err(TestCaseError::fail("ids 3..=6 must be mixtures"));
            };
            let mut rng = SmallRng::seed_from_u64(seed);
            let thresholds = distribution.generate(n, &mut rng);
            prop_assert_eq!(thresholds.len(), n);
            prop_assert_eq!(thresholds.segment_counts(), weights.segment_sizes(n));
        }

        #[test]
        fn segment_sizes_track_percentages(id in 3_u8..=6, n in 10_usize..5_000) {
            let ThresholdDistribution::Mixture(weights) =
                ThresholdDistribution::from_type(id).expect("id is supported")
            else {
                return Err(TestCaseError::fail("ids 3..=6 must be mixtures"));
            };
            let sizes = weights.segment_sizes(n);
            let (low, middle, high) = weights.percentages();
            prop_assert_eq!(sizes.iter().sum::<usize>(), n);
            for (size, weight) in sizes.into_iter().zip([low, middle, high]) {
                let exact = f64::from(weight) * n as f64 / 100.0;
                prop_assert!((size as f64 - exact).abs() <= 1.0);
            }
        }
    }
}
