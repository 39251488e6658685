//! Ports (trait boundaries) between the learning core and its surroundings.
//!
//! A brain is exposed upward through [`AgentBrain`]; it consumes an
//! [`Environment`]; snapshots are stored through a [`BrainRepository`]; and
//! training runs report to [`Observer`]s.

pub mod brain;
pub mod environment;
pub mod observer;
pub mod repository;

pub use brain::AgentBrain;
pub use environment::{AgentId, Environment};
pub use observer::{EpisodeSummary, Observer, StepRecord};
pub use repository::BrainRepository;
