//! Episode-based training loop

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::driver::{AgentDriver, TickOutcome};
use crate::{
    Error, Result,
    ports::{AgentBrain, Environment, EpisodeSummary, Observer},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of episodes to run
    pub episodes: usize,

    /// Tick budget per episode; running past it is an error
    pub max_ticks_per_episode: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            max_ticks_per_episode: 10_000,
        }
    }
}

impl TrainingConfig {
    pub fn new(episodes: usize) -> Self {
        Self {
            episodes,
            ..Self::default()
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes completed
    pub episodes: usize,

    /// Steps across all episodes
    pub total_steps: usize,

    /// Mean scalar return per episode
    pub mean_return: f64,

    /// Best scalar return of any episode
    pub best_return: f64,

    /// Return of the last episode
    pub final_return: f64,

    /// Mean episode length
    pub mean_steps: f64,
}

impl TrainingResult {
    pub fn from_summaries(summaries: &[EpisodeSummary]) -> Self {
        let episodes = summaries.len();
        let returns: Vec<f64> = summaries.iter().map(EpisodeSummary::total_reward).collect();
        let total_steps = summaries.iter().map(|s| s.steps).sum();
        let mean = |total: f64| {
            if episodes > 0 {
                total / episodes as f64
            } else {
                0.0
            }
        };

        Self {
            episodes,
            total_steps,
            mean_return: mean(returns.iter().sum()),
            best_return: returns.iter().copied().reduce(f64::max).unwrap_or(0.0),
            final_return: returns.last().copied().unwrap_or(0.0),
            mean_steps: mean(total_steps as f64),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs whole episodes of one agent and reports to observers.
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn notify(&mut self, f: impl Fn(&mut dyn Observer) -> Result<()>) -> Result<()> {
        for observer in &mut self.observers {
            f(observer.as_mut())?;
        }
        Ok(())
    }

    /// Run the configured number of episodes.
    ///
    /// Stops early with a warning if the environment deactivates the agent.
    ///
    /// # Errors
    ///
    /// Fails if the brain, the environment or an observer fails, or if an
    /// episode exceeds the tick budget.
    pub fn run<B, E>(&mut self, driver: &mut AgentDriver<B>, env: &mut E) -> Result<TrainingResult>
    where
        B: AgentBrain,
        E: Environment + ?Sized,
    {
        let total = self.config.episodes;
        self.notify(|o| o.on_training_start(total))?;

        let mut summaries = Vec::with_capacity(total);
        'episodes: for episode in 0..total {
            self.notify(|o| o.on_episode_start(episode))?;

            let mut ticks = 0;
            loop {
                if ticks > self.config.max_ticks_per_episode {
                    return Err(Error::InvalidConfiguration {
                        message: format!(
                            "episode {episode} did not finish within {} ticks",
                            self.config.max_ticks_per_episode
                        ),
                    });
                }
                ticks += 1;

                match driver.tick(env)? {
                    TickOutcome::Inactive => {
                        warn!(agent = %driver.id(), episode, "agent became inactive, stopping");
                        break 'episodes;
                    }
                    TickOutcome::Step { record, .. } => {
                        self.notify(|o| o.on_step(episode, &record))?;
                    }
                    TickOutcome::EpisodeEnded(summary) => {
                        self.notify(|o| o.on_episode_end(&summary))?;
                        summaries.push(summary);
                        break;
                    }
                }
            }
        }

        self.notify(|o| o.on_training_end())?;
        let result = TrainingResult::from_summaries(&summaries);
        info!(
            episodes = result.episodes,
            mean_return = result.mean_return,
            best_return = result.best_return,
            "training finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;

    fn summary(episode: usize, steps: usize, total: f64) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            steps,
            fitness: FeatureVector::from([total]),
        }
    }

    #[test]
    fn test_result_from_summaries() {
        let result = TrainingResult::from_summaries(&[
            summary(0, 10, -4.0),
            summary(1, 4, 6.0),
            summary(2, 6, 1.0),
        ]);
        assert_eq!(result.episodes, 3);
        assert_eq!(result.total_steps, 20);
        assert_eq!(result.mean_return, 1.0);
        assert_eq!(result.best_return, 6.0);
        assert_eq!(result.final_return, 1.0);
        assert!((result.mean_steps - 20.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_result() {
        let result = TrainingResult::from_summaries(&[]);
        assert_eq!(result.episodes, 0);
        assert_eq!(result.mean_return, 0.0);
    }
}
