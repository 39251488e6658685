//! Sensor, action and reward space description handed to a brain at birth.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::FeatureVectorInfo;

/// Initialization information given to the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentInitInfo {
    /// Constraints on the sensor feature vector
    pub sensors: FeatureVectorInfo,
    /// Constraints on the action feature vector
    pub actions: FeatureVectorInfo,
    /// Constraints on the reward feature vector
    pub reward: FeatureVectorInfo,
}

impl AgentInitInfo {
    pub fn new(
        sensors: FeatureVectorInfo,
        actions: FeatureVectorInfo,
        reward: FeatureVectorInfo,
    ) -> Self {
        Self {
            sensors,
            actions,
            reward,
        }
    }

    /// Every dimension continuous in `[0, 1]`.
    pub fn with_default_ranges(sensors: usize, actions: usize, rewards: usize) -> Self {
        Self::new(
            FeatureVectorInfo::unit_continuous(sensors),
            FeatureVectorInfo::unit_continuous(actions),
            FeatureVectorInfo::unit_continuous(rewards),
        )
    }
}

impl fmt::Display for AgentInitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<AgentInitInfo sensors=\"{}\" actions=\"{}\" reward=\"{}\" />",
            self.sensors, self.actions, self.reward
        )
    }
}
