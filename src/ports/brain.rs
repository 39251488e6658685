//! Upward interface of a learning agent.

use crate::{
    Result,
    features::{Actions, AgentInitInfo, Observations, Reward},
};

/// A brain driven tick by tick by an agent host.
///
/// The host calls `initialize` once at birth, then for each episode `start`,
/// zero or more `act`, and `end`, and finally `destroy`. Calls never overlap
/// for one brain.
pub trait AgentBrain {
    /// Called right before the agent is born.
    fn initialize(&mut self, init: &AgentInitInfo) -> Result<()>;

    /// First action of an episode.
    fn start(&mut self, sensors: &Observations) -> Result<Actions>;

    /// Next action given the new sensors and the reward for the previous
    /// action.
    fn act(&mut self, sensors: &Observations, reward: &Reward) -> Result<Actions>;

    /// Reward for a tick on which the host repeated the previous action
    /// without calling `act`. It counts towards fitness but drives no update.
    fn record_reward(&mut self, reward: &Reward) -> Result<()>;

    /// Last reward of an episode.
    fn end(&mut self, reward: &Reward) -> Result<()>;

    /// Called right before the agent dies.
    fn destroy(&mut self) -> Result<()>;

    /// Reward accumulated over the current (or just finished) episode.
    fn fitness(&self) -> &Reward;

    /// Number of completed episodes.
    fn episodes(&self) -> usize;
}
