//! One-dimensional corridor: walk right until the far end.

use crate::{
    Result,
    error::Error,
    features::{Actions, AgentInitInfo, FeatureVector, FeatureVectorInfo, Observations, Reward},
    ports::{AgentId, Environment},
};

pub const STEP_REWARD: f64 = -1.0;
pub const GOAL_REWARD: f64 = 10.0;

/// A corridor of `length` cells. The agent starts in cell 0 and the episode
/// ends when it reaches the last cell or runs out of steps.
///
/// Sensors: the current cell (discrete). Actions: `0` moves left, `1`
/// moves right (discrete). Reward: `-1` per step, `+10` on reaching the end.
#[derive(Debug, Clone)]
pub struct Corridor {
    info: AgentInitInfo,
    length: usize,
    max_steps: usize,
    position: usize,
    steps: usize,
}

impl Corridor {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for corridors shorter than two
    /// cells or a zero step limit.
    pub fn new(length: usize, max_steps: usize) -> Result<Self> {
        if length < 2 || max_steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "corridor needs at least 2 cells and 1 step (got {length} cells, {max_steps} steps)"
                ),
            });
        }
        let mut sensors = FeatureVectorInfo::new();
        sensors.add_discrete(0, length as i64 - 1)?;
        let mut actions = FeatureVectorInfo::new();
        actions.add_discrete(0, 1)?;
        let mut reward = FeatureVectorInfo::new();
        reward.add_continuous(STEP_REWARD, GOAL_REWARD)?;

        Ok(Self {
            info: AgentInitInfo::new(sensors, actions, reward),
            length,
            max_steps,
            position: 0,
            steps: 0,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn at_goal(&self) -> bool {
        self.position == self.length - 1
    }
}

impl Environment for Corridor {
    fn agent_info(&self, _agent: AgentId) -> AgentInitInfo {
        self.info.clone()
    }

    fn step(&mut self, _agent: AgentId, action: &Actions) -> Result<Reward> {
        if action.len() != 1 {
            return Err(Error::dimension_mismatch(1, action.len(), "corridor action"));
        }
        self.steps += 1;
        if action[0] >= 0.5 {
            self.position = (self.position + 1).min(self.length - 1);
        } else {
            self.position = self.position.saturating_sub(1);
        }
        let reward = if self.at_goal() { GOAL_REWARD } else { STEP_REWARD };
        Ok(FeatureVector::from([reward]))
    }

    fn sense(&mut self, _agent: AgentId) -> Result<Observations> {
        Ok(FeatureVector::from([self.position as f64]))
    }

    fn is_episode_over(&self, _agent: AgentId) -> bool {
        self.at_goal() || self.steps >= self.max_steps
    }

    fn reset(&mut self, _agent: AgentId) -> Result<()> {
        self.position = 0;
        self.steps = 0;
        Ok(())
    }
}
