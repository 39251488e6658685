//! Temporal-difference update rules

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How the bootstrap value of the successor state is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// Off-policy: bootstrap from the best enumerated action
    #[default]
    QLearning,
    /// On-policy: bootstrap from the action actually selected
    Sarsa,
}

impl UpdateRule {
    /// TD target for a non-terminal transition.
    ///
    /// `old_q + alpha * (reward + gamma * new_q - old_q)`
    pub fn target(old_q: f64, reward: f64, new_q: f64, alpha: f64, gamma: f64) -> f64 {
        old_q + alpha * (reward + gamma * new_q - old_q)
    }

    /// TD target for the last transition of an episode.
    pub fn terminal_target(old_q: f64, reward: f64, alpha: f64) -> f64 {
        old_q + alpha * (reward - old_q)
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateRule::QLearning => write!(f, "q-learning"),
            UpdateRule::Sarsa => write!(f, "sarsa"),
        }
    }
}

impl FromStr for UpdateRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "q-learning" | "q_learning" | "qlearning" | "q" => Ok(UpdateRule::QLearning),
            "sarsa" => Ok(UpdateRule::Sarsa),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown update rule '{other}'"),
            }),
        }
    }
}
