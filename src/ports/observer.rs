//! Observer port - hooks into training runs
//!
//! Observers collect progress, metrics or logs while a pipeline runs,
//! without the pipeline knowing about output formats.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    features::{Actions, Observations, Reward},
};

/// One tick of an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    pub sensors: Observations,
    pub action: Actions,
    pub reward: Reward,
}

/// Summary of a finished episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode index (0-based)
    pub episode: usize,
    /// Number of actions taken
    pub steps: usize,
    /// Reward accumulated over the episode
    pub fitness: Reward,
}

impl EpisodeSummary {
    /// First reward dimension, the scalar return for single-objective tasks.
    pub fn total_reward(&self) -> f64 {
        self.fitness.iter().next().copied().unwrap_or(0.0)
    }
}

/// Observer of a training run.
///
/// Events arrive in this order:
/// 1. `on_training_start(total_episodes)`
/// 2. per episode: `on_episode_start`, `on_step` for every tick, `on_episode_end`
/// 3. `on_training_end()`
///
/// Every method defaults to doing nothing.
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A shared observer, so the caller can read it back after the pipeline
/// that owns the box is done.
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        lock(self).on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        lock(self).on_episode_start(episode)
    }

    fn on_step(&mut self, episode: usize, record: &StepRecord) -> Result<()> {
        lock(self).on_step(episode, record)
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        lock(self).on_episode_end(summary)
    }

    fn on_training_end(&mut self) -> Result<()> {
        lock(self).on_training_end()
    }
}

fn lock<O>(shared: &Mutex<O>) -> MutexGuard<'_, O> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
