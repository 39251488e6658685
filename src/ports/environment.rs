//! Environment port consumed by the agent driver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    features::{Actions, AgentInitInfo, Observations, Reward},
};

/// Identifies an agent within an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// A world that agents sense and act in.
///
/// # Examples
///
/// ```
/// use tdlearn::Result;
/// use tdlearn::features::{Actions, AgentInitInfo, FeatureVector, Observations, Reward};
/// use tdlearn::ports::{AgentId, Environment};
///
/// struct Coin { flips: usize }
///
/// impl Environment for Coin {
///     fn agent_info(&self, _agent: AgentId) -> AgentInitInfo {
///         AgentInitInfo::with_default_ranges(1, 1, 1)
///     }
///     fn step(&mut self, _agent: AgentId, action: &Actions) -> Result<Reward> {
///         self.flips += 1;
///         Ok(FeatureVector::from([action[0]]))
///     }
///     fn sense(&mut self, _agent: AgentId) -> Result<Observations> {
///         Ok(FeatureVector::from([0.5]))
///     }
///     fn is_episode_over(&self, _agent: AgentId) -> bool {
///         self.flips >= 3
///     }
///     fn reset(&mut self, _agent: AgentId) -> Result<()> {
///         self.flips = 0;
///         Ok(())
///     }
/// }
/// ```
pub trait Environment {
    /// Spaces for `agent`, queried once at birth.
    fn agent_info(&self, agent: AgentId) -> AgentInitInfo;

    /// Apply `action` and return the resulting reward.
    fn step(&mut self, agent: AgentId, action: &Actions) -> Result<Reward>;

    /// Observations for the current tick.
    fn sense(&mut self, agent: AgentId) -> Result<Observations>;

    /// Whether `agent` should be ticked at all.
    fn is_active(&self, _agent: AgentId) -> bool {
        true
    }

    fn is_episode_over(&self, agent: AgentId) -> bool;

    /// Prepare a new episode for `agent`; called after its `end`.
    fn reset(&mut self, agent: AgentId) -> Result<()>;
}
