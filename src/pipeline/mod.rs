//! Training pipeline
//!
//! [`AgentDriver`] runs the per-tick protocol between one brain and an
//! environment; [`TrainingPipeline`] repeats it for whole episodes and feeds
//! observers.

pub mod driver;
pub mod observers;
pub mod training;

pub use driver::{AgentDriver, TickOutcome};
pub use observers::{EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
