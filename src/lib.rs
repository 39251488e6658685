//! Temporal-difference reinforcement learning
//!
//! This crate provides:
//! - Bounded feature spaces describing sensors, actions and rewards
//! - Quantization of continuous values into evenly spaced bins
//! - Table and CMAC tile-coding value approximators
//! - Q-learning and SARSA brains with epsilon-greedy exploration and
//!   JSON persistence
//! - A per-tick agent driver, training pipeline and reference environments

pub mod adapters;
pub mod approximator;
pub mod cli;
pub mod config;
pub mod envs;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod ports;
pub mod quantize;
pub mod td;

pub use approximator::{Approximator, TableApproximator, TilesApproximator, ValueApproximator};
pub use config::{ApproximatorConfig, BrainConfig};
pub use error::{Error, Result};
pub use features::{
    Actions, AgentInitInfo, Bound, FeatureVector, FeatureVectorInfo, Observations, Reward,
    StateActionPair,
};
pub use ports::{AgentBrain, Environment};
pub use quantize::quantize;
pub use td::{BrainPhase, SavedTdBrain, TdBrain, UpdateRule};
