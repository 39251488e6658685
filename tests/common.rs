//! Shared fixtures for the tdlearn integration tests.

#![allow(dead_code)]

use tdlearn::{
    AgentBrain, AgentInitInfo, BrainConfig, FeatureVectorInfo, TdBrain, UpdateRule,
};

/// One discrete sensor in `[0, sensors_max]`, one discrete action in
/// `[0, actions_max]` and a scalar reward in `[-10, 10]`.
pub fn discrete_info(sensors_max: i64, actions_max: i64) -> AgentInitInfo {
    let mut sensors = FeatureVectorInfo::new();
    sensors.add_discrete(0, sensors_max).unwrap();
    let mut actions = FeatureVectorInfo::new();
    actions.add_discrete(0, actions_max).unwrap();
    let mut reward = FeatureVectorInfo::new();
    reward.add_continuous(-10.0, 10.0).unwrap();
    AgentInitInfo::new(sensors, actions, reward)
}

/// Continuous sensor and action in `[0, 1]`, scalar reward.
pub fn unit_info() -> AgentInitInfo {
    AgentInitInfo::with_default_ranges(1, 1, 1)
}

/// A seeded brain initialized for `info`.
pub fn brain_for(info: &AgentInitInfo, config: BrainConfig) -> TdBrain {
    let mut brain = TdBrain::new(config);
    brain.initialize(info).unwrap();
    brain
}

pub fn learning_config(rule: UpdateRule, epsilon: f64, seed: u64) -> BrainConfig {
    BrainConfig::default()
        .with_rule(rule)
        .with_gamma(0.9)
        .with_alpha(0.5)
        .with_epsilon(epsilon)
        .with_seed(seed)
}
