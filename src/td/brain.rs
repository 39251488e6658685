//! The temporal-difference policy engine.

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    approximator::{Approximator, TableApproximator, TilesApproximator, ValueApproximator},
    config::{ApproximatorConfig, BrainConfig},
    error::{Error, Result},
    features::{Actions, AgentInitInfo, FeatureVector, Observations, Reward},
    ports::AgentBrain,
    quantize::discretize_actions,
    td::{
        UpdateRule,
        policy::{Selection, best_value, epsilon_greedy},
    },
};

/// Lifecycle of a [`TdBrain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrainPhase {
    /// Created but not yet given its spaces
    Uninitialized,
    /// Initialized (or restored) and waiting for `start`
    Ready,
    EpisodeActive,
    EpisodeEnded,
    /// Terminal
    Destroyed,
}

impl fmt::Display for BrainPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrainPhase::Uninitialized => "uninitialized",
            BrainPhase::Ready => "ready",
            BrainPhase::EpisodeActive => "in an active episode",
            BrainPhase::EpisodeEnded => "between episodes",
            BrainPhase::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

fn build_rng(seed: Option<u64>) -> ChaCha12Rng {
    if let Some(seed) = seed {
        ChaCha12Rng::seed_from_u64(seed)
    } else {
        ChaCha12Rng::from_rng(&mut rand::rng())
    }
}

/// Q-learning / SARSA agent over a pluggable value approximator.
///
/// The brain is driven one tick at a time through [`AgentBrain`]:
/// `initialize` once, then `start`, any number of `act`, and `end` for each
/// episode, and finally `destroy`. Calls out of that order fail with
/// [`Error::InvalidPhase`].
///
/// # Examples
///
/// ```
/// use tdlearn::{AgentBrain, TdBrain, config::BrainConfig};
/// use tdlearn::features::{AgentInitInfo, FeatureVector};
///
/// let mut brain = TdBrain::new(BrainConfig::default().with_seed(1));
/// brain.initialize(&AgentInitInfo::with_default_ranges(1, 1, 1))?;
/// let action = brain.start(&FeatureVector::from([0.0]))?;
/// let next = brain.act(&FeatureVector::from([0.5]), &FeatureVector::from([1.0]))?;
/// brain.end(&FeatureVector::from([0.0]))?;
/// assert_eq!(action.len(), 1);
/// assert_eq!(next.len(), 1);
/// # Ok::<(), tdlearn::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TdBrain {
    pub(crate) config: BrainConfig,
    pub(crate) phase: BrainPhase,
    /// Serializable so snapshots can carry the generator position
    pub(crate) rng: ChaCha12Rng,
    pub(crate) info: AgentInitInfo,
    pub(crate) action_list: Vec<Actions>,
    pub(crate) approximator: Option<Approximator>,
    /// Previous state and the action taken in it
    pub(crate) state: Observations,
    pub(crate) action: Actions,
    pub(crate) fitness: Reward,
    pub(crate) episodes: usize,
}

impl TdBrain {
    pub fn new(config: BrainConfig) -> Self {
        Self {
            rng: build_rng(config.seed),
            config,
            phase: BrainPhase::Uninitialized,
            info: AgentInitInfo::default(),
            action_list: Vec::new(),
            approximator: None,
            state: FeatureVector::default(),
            action: FeatureVector::default(),
            fitness: FeatureVector::default(),
            episodes: 0,
        }
    }

    pub fn config(&self) -> &BrainConfig {
        &self.config
    }

    pub fn phase(&self) -> BrainPhase {
        self.phase
    }

    pub fn gamma(&self) -> f64 {
        self.config.gamma
    }

    /// Set the discount factor. Keeping it in `[0, 1]` is up to the caller.
    pub fn set_gamma(&mut self, gamma: f64) {
        self.config.gamma = gamma;
    }

    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    /// Set the learning rate. Keeping it in `[0, 1]` is up to the caller.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.config.alpha = alpha;
    }

    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// Set the exploration rate. Keeping it in `[0, 1]` is up to the caller.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.config.epsilon = epsilon;
    }

    pub fn rule(&self) -> UpdateRule {
        self.config.rule
    }

    pub fn info(&self) -> &AgentInitInfo {
        &self.info
    }

    /// Enumerated (and for continuous dimensions discretized) actions.
    pub fn action_list(&self) -> &[Actions] {
        &self.action_list
    }

    pub fn approximator(&self) -> Option<&Approximator> {
        self.approximator.as_ref()
    }

    pub fn approximator_mut(&mut self) -> Option<&mut Approximator> {
        self.approximator.as_mut()
    }

    /// Action chosen on the last `start` or `act`.
    pub fn last_action(&self) -> &Actions {
        &self.action
    }

    /// Sensors seen on the last `start` or `act`.
    pub fn last_state(&self) -> &Observations {
        &self.state
    }

    /// Drop an unfinished episode without crediting its last action, so the
    /// next call can be `start`. Episodes that already ended are untouched.
    pub fn abandon_episode(&mut self) {
        if self.phase == BrainPhase::EpisodeActive {
            debug!(fitness = %self.fitness, "abandoned episode");
            self.phase = BrainPhase::EpisodeEnded;
        }
    }

    /// Estimated value of `action` in `state`.
    pub fn predict(&self, state: &Observations, action: &Actions) -> Result<f64> {
        self.require_approximator("predict")?.predict(state, action)
    }

    fn invalid_phase(&self, operation: &'static str) -> Error {
        Error::InvalidPhase {
            operation,
            phase: self.phase.to_string(),
        }
    }

    fn require_approximator(&self, operation: &'static str) -> Result<&Approximator> {
        self.approximator
            .as_ref()
            .ok_or_else(|| self.invalid_phase(operation))
    }

    fn check_sensors(&self, sensors: &Observations) -> Result<()> {
        if sensors.len() != self.info.sensors.size() {
            return Err(Error::dimension_mismatch(
                self.info.sensors.size(),
                sensors.len(),
                "brain sensors",
            ));
        }
        Ok(())
    }

    fn scalar_reward(reward: &Reward) -> Result<f64> {
        if reward.len() != 1 {
            return Err(Error::MultiObjectiveReward {
                dimensions: reward.len(),
            });
        }
        Ok(reward[0])
    }

    fn accumulate(&mut self, reward: &Reward) -> Result<()> {
        self.fitness = self.fitness.try_add(reward)?;
        Ok(())
    }

    fn select(&mut self, state: &Observations) -> Result<Selection> {
        let Some(approximator) = self.approximator.as_ref() else {
            return Err(self.invalid_phase("select an action"));
        };
        epsilon_greedy(
            approximator,
            state,
            &self.action_list,
            &self.info.actions,
            self.config.epsilon,
            &mut self.rng,
        )
    }

    fn build_approximator(&mut self) -> Result<Approximator> {
        let info = self.info.clone();
        Ok(match self.config.approximator {
            ApproximatorConfig::Table {
                action_bins,
                state_bins,
            } => TableApproximator::new(info, action_bins, state_bins)?.into(),
            ApproximatorConfig::Tiles {
                num_tiles,
                num_weights,
                learning_rate,
            } => {
                TilesApproximator::new(info, num_tiles, num_weights, learning_rate, &mut self.rng)?
                    .into()
            }
        })
    }
}

impl AgentBrain for TdBrain {
    fn initialize(&mut self, init: &AgentInitInfo) -> Result<()> {
        if self.phase == BrainPhase::Destroyed {
            return Err(self.invalid_phase("initialize"));
        }
        let action_list = discretize_actions(&init.actions, self.config.approximator.action_bins())?;

        self.info = init.clone();
        self.approximator = Some(self.build_approximator()?);
        self.action_list = action_list;
        self.fitness = init.reward.instance();
        self.state = init.sensors.instance();
        self.action = init.actions.instance();
        self.episodes = 0;
        self.phase = BrainPhase::Ready;

        info!(
            info = %init,
            rule = %self.config.rule,
            approximator = self.approximator.as_ref().map_or("none", Approximator::kind),
            actions = self.action_list.len(),
            "initialized TD brain"
        );
        Ok(())
    }

    fn start(&mut self, sensors: &Observations) -> Result<Actions> {
        if !matches!(self.phase, BrainPhase::Ready | BrainPhase::EpisodeEnded) {
            return Err(self.invalid_phase("start an episode"));
        }
        self.check_sensors(sensors)?;

        let selection = self.select(sensors)?;
        self.state = sensors.clone();
        self.action = selection.action;
        self.fitness = self.info.reward.instance();
        self.phase = BrainPhase::EpisodeActive;
        Ok(self.action.clone())
    }

    fn act(&mut self, sensors: &Observations, reward: &Reward) -> Result<Actions> {
        if self.phase != BrainPhase::EpisodeActive {
            return Err(self.invalid_phase("act"));
        }
        let r = Self::scalar_reward(reward)?;
        self.check_sensors(sensors)?;

        let selection = self.select(sensors)?;
        let approximator = self.require_approximator("act")?;
        let new_q = match self.config.rule {
            UpdateRule::Sarsa => selection.value,
            UpdateRule::QLearning if selection.explored => {
                best_value(approximator, sensors, &self.action_list)?
            }
            UpdateRule::QLearning => selection.value,
        };
        let old_q = approximator.predict(&self.state, &self.action)?;
        let target = UpdateRule::target(old_q, r, new_q, self.config.alpha, self.config.gamma);

        if let Some(approximator) = self.approximator.as_mut() {
            approximator.update(&self.state, &self.action, target)?;
        }
        self.accumulate(reward)?;
        self.state = sensors.clone();
        self.action = selection.action;
        Ok(self.action.clone())
    }

    fn record_reward(&mut self, reward: &Reward) -> Result<()> {
        if self.phase != BrainPhase::EpisodeActive {
            return Err(self.invalid_phase("record a reward"));
        }
        self.accumulate(reward)
    }

    fn end(&mut self, reward: &Reward) -> Result<()> {
        if self.phase != BrainPhase::EpisodeActive {
            return Err(self.invalid_phase("end an episode"));
        }
        let r = Self::scalar_reward(reward)?;

        let old_q = self.require_approximator("end an episode")?.predict(&self.state, &self.action)?;
        let target = UpdateRule::terminal_target(old_q, r, self.config.alpha);
        if let Some(approximator) = self.approximator.as_mut() {
            approximator.update(&self.state, &self.action, target)?;
        }
        self.accumulate(reward)?;
        self.episodes += 1;
        self.phase = BrainPhase::EpisodeEnded;

        debug!(episode = self.episodes, fitness = %self.fitness, "episode ended");
        Ok(())
    }

    fn destroy(&mut self) -> Result<()> {
        self.phase = BrainPhase::Destroyed;
        Ok(())
    }

    fn fitness(&self) -> &Reward {
        &self.fitness
    }

    fn episodes(&self) -> usize {
        self.episodes
    }
}
