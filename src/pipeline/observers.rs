//! Observer implementations for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    features::Reward,
    ports::{EpisodeSummary, Observer, StepRecord},
};

/// Progress bar observer - shows training progress and the running mean
/// return.
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    episodes: usize,
    total_return: f64,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            episodes: 0,
            total_return: 0.0,
        }
    }

    fn message(&self) -> String {
        let mean = if self.episodes == 0 {
            0.0
        } else {
            self.total_return / self.episodes as f64
        };
        format!("{mean:.2}")
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (mean return: {msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        self.total_return += summary.total_reward();

        if let Some(pb) = &self.progress_bar {
            pb.set_position(self.episodes as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - keeps per-episode returns and lengths.
#[derive(Debug)]
pub struct MetricsObserver {
    returns: Vec<f64>,
    lengths: Vec<usize>,
    window: usize,
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub mean_return: f64,
    /// Mean return over the last `window` episodes
    pub recent_mean_return: f64,
    /// Episodes in the recent window
    pub window: usize,
    pub best_return: f64,
    pub mean_length: f64,
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        0.0
    } else {
        values.sum::<f64>() / n as f64
    }
}

impl MetricsObserver {
    /// Track metrics, averaging "recent" returns over the last `window`
    /// episodes.
    pub fn new(window: usize) -> Self {
        Self {
            returns: Vec::new(),
            lengths: Vec::new(),
            window: window.max(1),
        }
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn summary(&self) -> MetricsSummary {
        let recent = &self.returns[self.returns.len().saturating_sub(self.window)..];
        MetricsSummary {
            episodes: self.returns.len(),
            mean_return: mean(self.returns.iter().copied()),
            recent_mean_return: mean(recent.iter().copied()),
            window: recent.len(),
            best_return: self.returns.iter().copied().reduce(f64::max).unwrap_or(0.0),
            mean_length: mean(self.lengths.iter().map(|&l| l as f64)),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.returns.push(summary.total_reward());
        self.lengths.push(summary.steps);
        Ok(())
    }
}

/// One line of the JSONL episode log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub steps: usize,
    pub fitness: Reward,
    /// Individual steps, when step logging is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trajectory: Vec<StepRecord>,
}

/// JSONL observer - writes one JSON object per finished episode.
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_steps: bool,
    trajectory: Vec<StepRecord>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            record_steps: false,
            trajectory: Vec::new(),
        })
    }

    /// Also log every step of every episode.
    pub fn with_steps(mut self) -> Self {
        self.record_steps = true;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.trajectory.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, record: &StepRecord) -> Result<()> {
        if self.record_steps {
            self.trajectory.push(record.clone());
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let record = EpisodeRecord {
            episode: summary.episode,
            steps: summary.steps,
            fitness: summary.fitness.clone(),
            trajectory: std::mem::take(&mut self.trajectory),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
