//! Temporal-difference learning
//!
//! [`TdBrain`] selects actions epsilon-greedily over an enumerated action
//! list and learns either off-policy ([`UpdateRule::QLearning`]) or on-policy
//! ([`UpdateRule::Sarsa`]).

pub mod brain;
pub mod persistence;
pub mod policy;
pub mod rule;

pub use brain::{BrainPhase, TdBrain};
pub use persistence::{SAVE_FORMAT_VERSION, SavedTdBrain};
pub use policy::{Selection, best_value, epsilon_greedy, greedy};
pub use rule::UpdateRule;
