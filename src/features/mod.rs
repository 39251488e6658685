//! Bounded feature spaces
//!
//! Sensors, actions and rewards are all plain [`FeatureVector`]s. Their legal
//! shape is described by a [`FeatureVectorInfo`], an ordered list of
//! [`Bound`]s, and the three spaces an agent lives in are grouped into an
//! [`AgentInitInfo`].

pub mod agent_info;
pub mod bound;
pub mod info;
pub mod vector;

pub use agent_info::AgentInitInfo;
pub use bound::Bound;
pub use info::FeatureVectorInfo;
pub use vector::{Actions, FeatureVector, Observations, Reward, StateActionPair};
