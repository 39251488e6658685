//! Brain configuration.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    approximator::tiles::{DEFAULT_LEARNING_RATE, DEFAULT_NUM_TILES, DEFAULT_NUM_WEIGHTS},
    error::{Error, Result},
    td::UpdateRule,
};

/// Bins used to enumerate continuous action dimensions under tile coding.
pub const TILE_ACTION_BINS: usize = 7;

/// Which value approximator a brain builds at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApproximatorConfig {
    /// Exact lookup over quantized state-action pairs
    Table {
        /// Bins per continuous action dimension
        action_bins: usize,
        /// Bins per continuous sensor dimension (0 disables quantization)
        state_bins: usize,
    },
    /// CMAC tile coding
    Tiles {
        num_tiles: usize,
        num_weights: usize,
        learning_rate: f64,
    },
}

impl ApproximatorConfig {
    pub fn table(action_bins: usize, state_bins: usize) -> Self {
        ApproximatorConfig::Table {
            action_bins,
            state_bins,
        }
    }

    pub fn tiles(num_tiles: usize, num_weights: usize) -> Self {
        ApproximatorConfig::Tiles {
            num_tiles,
            num_weights,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }

    /// Tile coding with the default sizes.
    pub fn default_tiles() -> Self {
        ApproximatorConfig::Tiles {
            num_tiles: DEFAULT_NUM_TILES,
            num_weights: DEFAULT_NUM_WEIGHTS,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }

    /// Bins used when enumerating continuous action dimensions.
    pub fn action_bins(&self) -> usize {
        match self {
            ApproximatorConfig::Table { action_bins, .. } => *action_bins,
            ApproximatorConfig::Tiles { .. } => TILE_ACTION_BINS,
        }
    }
}

impl Default for ApproximatorConfig {
    fn default() -> Self {
        Self::table(3, 5)
    }
}

/// Hyperparameters of a TD brain.
///
/// # Examples
///
/// ```
/// use tdlearn::config::{ApproximatorConfig, BrainConfig};
/// use tdlearn::td::UpdateRule;
///
/// let config = BrainConfig::default()
///     .with_gamma(0.9)
///     .with_rule(UpdateRule::Sarsa)
///     .with_approximator(ApproximatorConfig::tiles(32, 1024))
///     .with_seed(7);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    /// Reward discount factor
    pub gamma: f64,
    /// Learning rate
    pub alpha: f64,
    /// Exploration rate
    pub epsilon: f64,
    pub rule: UpdateRule,
    pub approximator: ApproximatorConfig,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            gamma: 0.8,
            alpha: 0.8,
            epsilon: 0.1,
            rule: UpdateRule::QLearning,
            approximator: ApproximatorConfig::default(),
            seed: None,
        }
    }
}

impl BrainConfig {
    pub fn new(gamma: f64, alpha: f64, epsilon: f64) -> Self {
        Self {
            gamma,
            alpha,
            epsilon,
            ..Self::default()
        }
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_rule(mut self, rule: UpdateRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_approximator(mut self, approximator: ApproximatorConfig) -> Self {
        self.approximator = approximator;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that γ, α and ε lie in `[0, 1]` and the approximator sizes are
    /// usable.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("gamma", self.gamma),
            ("alpha", self.alpha),
            ("epsilon", self.epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be in [0, 1], got {value}"),
                });
            }
        }
        match self.approximator {
            ApproximatorConfig::Table { action_bins, .. } if action_bins == 1 => {
                Err(Error::InvalidConfiguration {
                    message: "action_bins must be 0 or at least 2".into(),
                })
            }
            ApproximatorConfig::Table { state_bins, .. } if state_bins == 1 => {
                Err(Error::InvalidConfiguration {
                    message: "state_bins must be 0 or at least 2".into(),
                })
            }
            ApproximatorConfig::Tiles {
                num_tiles,
                num_weights,
                ..
            } if num_tiles == 0 || num_weights == 0 => Err(Error::InvalidConfiguration {
                message: "num_tiles and num_weights must be positive".into(),
            }),
            _ => Ok(()),
        }
    }

    /// Load and validate a JSON config file. Missing fields take their
    /// defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config file {path:?}"),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}
