//! CMAC (tile coding) linear value approximator.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    approximator::{ValueApproximator, tile_coding::tiles},
    error::{Error, Result},
    features::{AgentInitInfo, FeatureVector},
};

pub const DEFAULT_NUM_TILES: usize = 32;
pub const DEFAULT_NUM_WEIGHTS: usize = 1024;
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Generalizing approximator over hashed overlapping tiles.
///
/// A (state, action) pair activates `num_tiles` weights; the prediction is
/// their sum. Continuous sensor and action dimensions are tiled, discrete
/// ones are fed to the hash as integers. Initial weights are drawn from a
/// standard normal distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesApproximator {
    info: AgentInitInfo,
    learning_rate: f64,
    /// Positions in the concatenated `[sensors, actions]` vector that are discrete
    ints_index: Vec<usize>,
    /// Positions in the concatenated `[sensors, actions]` vector that are continuous
    floats_index: Vec<usize>,
    num_tiles: usize,
    weights: Vec<f32>,
}

impl TilesApproximator {
    /// Create a tile coder with the default sizes.
    pub fn with_defaults(info: AgentInitInfo, rng: &mut impl Rng) -> Result<Self> {
        Self::new(
            info,
            DEFAULT_NUM_TILES,
            DEFAULT_NUM_WEIGHTS,
            DEFAULT_LEARNING_RATE,
            rng,
        )
    }

    /// Create a tile coder with `num_tiles` tilings hashed into
    /// `num_weights` weights.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either size is zero or the
    /// learning rate is not finite.
    pub fn new(
        info: AgentInitInfo,
        num_tiles: usize,
        num_weights: usize,
        learning_rate: f64,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if num_tiles == 0 || num_weights == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "tile coding needs at least one tiling and one weight \
                     (got {num_tiles} tilings, {num_weights} weights)"
                ),
            });
        }
        if !learning_rate.is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!("tile learning rate must be finite, got {learning_rate}"),
            });
        }

        let discreteness = (0..info.sensors.size())
            .map(|i| info.sensors.is_discrete(i))
            .chain((0..info.actions.size()).map(|i| info.actions.is_discrete(i)));
        let (ints_index, floats_index): (Vec<usize>, Vec<usize>) =
            discreteness.enumerate().fold(
                (Vec::new(), Vec::new()),
                |(mut ints, mut floats), (i, discrete)| {
                    if discrete {
                        ints.push(i);
                    } else {
                        floats.push(i);
                    }
                    (ints, floats)
                },
            );

        let weights = (&mut *rng)
            .sample_iter(StandardNormal)
            .take(num_weights)
            .collect();

        debug!(
            %info,
            num_tiles,
            num_weights,
            learning_rate,
            "created tiles approximator"
        );

        Ok(Self {
            info,
            learning_rate,
            ints_index,
            floats_index,
            num_tiles,
            weights,
        })
    }

    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    pub fn num_weights(&self) -> usize {
        self.weights.len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Check the internal layout after deserialization.
    pub(crate) fn check_consistency(&self) -> Result<()> {
        let width = self.info.sensors.size() + self.info.actions.size();
        let mut positions: Vec<usize> = self
            .ints_index
            .iter()
            .chain(&self.floats_index)
            .copied()
            .collect();
        positions.sort_unstable();
        if !positions.iter().copied().eq(0..width) {
            return Err(Error::InvalidConfiguration {
                message: "tile index layout does not cover the sensor and action space".into(),
            });
        }
        if self.num_tiles == 0 || self.weights.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "tile coder has no tilings or no weights".into(),
            });
        }
        Ok(())
    }

    /// Indices of the weights activated by `(state, action)`.
    pub fn active_tiles(&self, state: &FeatureVector, action: &FeatureVector) -> Result<Vec<usize>> {
        let num_sensors = self.info.sensors.size();
        if state.len() != num_sensors {
            return Err(Error::dimension_mismatch(
                num_sensors,
                state.len(),
                "tile coding state",
            ));
        }
        if action.len() != self.info.actions.size() {
            return Err(Error::dimension_mismatch(
                self.info.actions.size(),
                action.len(),
                "tile coding action",
            ));
        }

        let value_at = |position: usize| {
            if position < num_sensors {
                state[position]
            } else {
                action[position - num_sensors]
            }
        };
        let ints: Vec<i32> = self
            .ints_index
            .iter()
            .map(|&p| value_at(p) as i32)
            .collect();
        let floats: Vec<f32> = self
            .floats_index
            .iter()
            .map(|&p| value_at(p) as f32)
            .collect();

        Ok(tiles(self.num_tiles, self.weights.len(), &floats, &ints))
    }
}

impl ValueApproximator for TilesApproximator {
    fn info(&self) -> &AgentInitInfo {
        &self.info
    }

    fn predict(&self, state: &FeatureVector, action: &FeatureVector) -> Result<f64> {
        Ok(self
            .active_tiles(state, action)?
            .into_iter()
            .map(|t| f64::from(self.weights[t]))
            .sum())
    }

    fn update(&mut self, state: &FeatureVector, action: &FeatureVector, target: f64) -> Result<()> {
        let active = self.active_tiles(state, action)?;
        let current: f64 = active.iter().map(|&t| f64::from(self.weights[t])).sum();
        let delta = (self.learning_rate / self.num_tiles as f64 * (target - current)) as f32;
        for t in active {
            self.weights[t] += delta;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::features::FeatureVectorInfo;

    fn info() -> AgentInitInfo {
        let mut sensors = FeatureVectorInfo::new();
        sensors.add_continuous(0.0, 1.0).unwrap();
        sensors.add_discrete(0, 4).unwrap();
        let mut actions = FeatureVectorInfo::new();
        actions.add_continuous(-1.0, 1.0).unwrap();
        AgentInitInfo::new(sensors, actions, FeatureVectorInfo::unit_continuous(1))
    }

    #[test]
    fn test_index_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let approx = TilesApproximator::with_defaults(info(), &mut rng).unwrap();
        assert_eq!(approx.ints_index, vec![1]);
        assert_eq!(approx.floats_index, vec![0, 2]);
        assert_eq!(approx.num_weights(), DEFAULT_NUM_WEIGHTS);
        approx.check_consistency().unwrap();
    }

    #[test]
    fn test_update_moves_prediction_toward_target() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut approx = TilesApproximator::with_defaults(info(), &mut rng).unwrap();
        let state = FeatureVector::from([0.3, 2.0]);
        let action = FeatureVector::from([0.5]);

        let before = approx.predict(&state, &action).unwrap();
        let target = before + 10.0;
        approx.update(&state, &action, target).unwrap();
        let after = approx.predict(&state, &action).unwrap();

        assert!(after > before);
        assert!((target - after).abs() < (target - before).abs());
    }

    #[test]
    fn test_seeded_weights_are_reproducible() {
        let a = TilesApproximator::with_defaults(info(), &mut StdRng::seed_from_u64(3)).unwrap();
        let b = TilesApproximator::with_defaults(info(), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn test_rejects_wrong_lengths_and_sizes() {
        let mut rng = StdRng::seed_from_u64(1);
        let approx = TilesApproximator::with_defaults(info(), &mut rng).unwrap();
        assert!(
            approx
                .predict(&FeatureVector::from([0.3]), &FeatureVector::from([0.5]))
                .is_err()
        );
        assert!(TilesApproximator::new(info(), 0, 16, 0.1, &mut rng).is_err());
        assert!(TilesApproximator::new(info(), 4, 0, 0.1, &mut rng).is_err());
    }
}
