//! Text persistence for [`TdBrain`].
//!
//! A brain is saved as a versioned snapshot holding its configuration, the
//! spaces it was initialized with, the enumerated actions, the full
//! approximator state, its lifecycle phase with the pending (state, action)
//! pair, and the random generator's position. A brain saved mid-episode
//! resumes exactly where it stopped. The approximator carries an explicit
//! `kind` tag so the right variant is rebuilt on load.

use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    approximator::{Approximator, ValueApproximator},
    config::BrainConfig,
    error::{Error, Result},
    features::{Actions, AgentInitInfo, Observations, Reward},
    td::brain::{BrainPhase, TdBrain},
};

/// Current snapshot format version.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Serializable state of an initialized [`TdBrain`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTdBrain {
    pub version: u32,
    pub config: BrainConfig,
    pub info: AgentInitInfo,
    pub action_list: Vec<Actions>,
    pub approximator: Approximator,
    pub episodes: usize,
    pub fitness: Reward,
    pub phase: BrainPhase,
    /// State the last action was taken in
    pub state: Observations,
    pub action: Actions,
    pub rng: ChaCha12Rng,
}

impl SavedTdBrain {
    /// Check the snapshot is internally consistent before it replaces a
    /// live brain.
    pub fn validate(&self) -> Result<()> {
        if self.version != SAVE_FORMAT_VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: SAVE_FORMAT_VERSION,
            });
        }
        if self.approximator.info() != &self.info {
            return Err(Error::InvalidConfiguration {
                message: "approximator spaces do not match the brain's spaces".into(),
            });
        }
        if self.fitness.len() != self.info.reward.size() {
            return Err(Error::dimension_mismatch(
                self.info.reward.size(),
                self.fitness.len(),
                "saved fitness",
            ));
        }
        if matches!(
            self.phase,
            BrainPhase::Uninitialized | BrainPhase::Destroyed
        ) {
            return Err(Error::InvalidConfiguration {
                message: format!("cannot restore a brain that was {}", self.phase),
            });
        }
        if self.state.len() != self.info.sensors.size() {
            return Err(Error::dimension_mismatch(
                self.info.sensors.size(),
                self.state.len(),
                "saved state",
            ));
        }
        if self.action.len() != self.info.actions.size() {
            return Err(Error::dimension_mismatch(
                self.info.actions.size(),
                self.action.len(),
                "saved action",
            ));
        }
        if let Some(action) = self
            .action_list
            .iter()
            .find(|a| a.len() != self.info.actions.size())
        {
            return Err(Error::dimension_mismatch(
                self.info.actions.size(),
                action.len(),
                "saved action list",
            ));
        }
        self.approximator.check_consistency()
    }
}

impl TdBrain {
    /// Snapshot the brain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] if the brain was never initialized or
    /// has been destroyed.
    pub fn snapshot(&self) -> Result<SavedTdBrain> {
        let approximator = self
            .approximator
            .clone()
            .filter(|_| self.phase != BrainPhase::Destroyed)
            .ok_or_else(|| Error::InvalidPhase {
                operation: "save",
                phase: self.phase.to_string(),
            })?;
        Ok(SavedTdBrain {
            version: SAVE_FORMAT_VERSION,
            config: self.config.clone(),
            info: self.info.clone(),
            action_list: self.action_list.clone(),
            approximator,
            episodes: self.episodes,
            fitness: self.fitness.clone(),
            phase: self.phase,
            state: self.state.clone(),
            action: self.action.clone(),
            rng: self.rng.clone(),
        })
    }

    /// Build a brain from a snapshot, in the phase it was saved in.
    pub fn from_saved(saved: SavedTdBrain) -> Result<Self> {
        let mut brain = TdBrain::new(saved.config.clone());
        brain.restore(saved)?;
        Ok(brain)
    }

    /// Replace this brain's state with `saved`.
    ///
    /// Everything is taken from the snapshot, including the generator
    /// position, so a seeded brain continues its random sequence instead of
    /// replaying it. On error the brain is unchanged.
    pub fn restore(&mut self, saved: SavedTdBrain) -> Result<()> {
        if self.phase == BrainPhase::Destroyed {
            return Err(Error::InvalidPhase {
                operation: "restore",
                phase: self.phase.to_string(),
            });
        }
        saved.validate()?;

        self.rng = saved.rng;
        self.state = saved.state;
        self.action = saved.action;
        self.config = saved.config;
        self.info = saved.info;
        self.action_list = saved.action_list;
        self.approximator = Some(saved.approximator);
        self.episodes = saved.episodes;
        self.fitness = saved.fitness;
        self.phase = saved.phase;
        Ok(())
    }

    /// Serialize the brain to JSON text.
    pub fn to_string(&self) -> Result<String> {
        let text = serde_json::to_string(&self.snapshot()?)?;
        debug!(bytes = text.len(), "serialized TD brain");
        Ok(text)
    }

    /// Load brain state from text produced by [`TdBrain::to_string`].
    ///
    /// On failure the brain keeps its previous state and the error is both
    /// logged and returned.
    pub fn from_string(&mut self, text: &str) -> Result<()> {
        let result = serde_json::from_str::<SavedTdBrain>(text)
            .map_err(Error::from)
            .and_then(|saved| self.restore(saved));
        if let Err(err) = &result {
            error!(error = %err, "failed to load TD brain");
        }
        result
    }
}
