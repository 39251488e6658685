//! Train command - run a TD brain in an environment and save it

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{
    cli::{
        EnvArgs,
        output::{format_number, print_kv, print_section},
        repository_for,
    },
    config::{ApproximatorConfig, BrainConfig},
    pipeline::{
        AgentDriver, JsonlObserver, MetricsObserver, ProgressObserver, TrainingConfig,
        TrainingPipeline,
    },
    ports::AgentId,
    td::{TdBrain, UpdateRule},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ApproximatorKind {
    Table,
    Tiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleKind {
    QLearning,
    Sarsa,
}

impl From<RuleKind> for UpdateRule {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::QLearning => UpdateRule::QLearning,
            RuleKind::Sarsa => UpdateRule::Sarsa,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a TD brain", allow_negative_numbers = true)]
pub struct TrainArgs {
    #[command(flatten)]
    pub env: EnvArgs,

    /// Number of training episodes
    #[arg(long, short = 'n', default_value_t = 500)]
    pub episodes: usize,

    /// Brain configuration file (JSON); flags below override it
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Update rule
    #[arg(long, value_enum)]
    pub rule: Option<RuleKind>,

    /// Value approximator
    #[arg(long, value_enum)]
    pub approximator: Option<ApproximatorKind>,

    /// Discount factor
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Learning rate
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Exploration rate
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Bins per continuous action dimension (table)
    #[arg(long, default_value_t = 3)]
    pub action_bins: usize,

    /// Bins per continuous sensor dimension (table, 0 = none)
    #[arg(long, default_value_t = 5)]
    pub state_bins: usize,

    /// Number of tilings (tiles)
    #[arg(long, default_value_t = 32)]
    pub num_tiles: usize,

    /// Weight table size (tiles)
    #[arg(long, default_value_t = 1024)]
    pub num_weights: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the trained brain (.json or .msgpack)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Write one JSON line per episode to this file
    #[arg(long)]
    pub jsonl: Option<PathBuf>,

    /// Include every step in the JSONL log
    #[arg(long, requires = "jsonl")]
    pub trace_steps: bool,

    /// Write a JSON training summary to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl TrainArgs {
    fn brain_config(&self) -> Result<BrainConfig> {
        let mut config = match &self.config {
            Some(path) => BrainConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => BrainConfig::default(),
        };
        if let Some(rule) = self.rule {
            config.rule = rule.into();
        }
        if let Some(kind) = self.approximator {
            config.approximator = match kind {
                ApproximatorKind::Table => {
                    ApproximatorConfig::table(self.action_bins, self.state_bins)
                }
                ApproximatorKind::Tiles => ApproximatorConfig::tiles(self.num_tiles, self.num_weights),
            };
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.brain_config()?;
    let mut env = args.env.build()?;

    print_section("Training");
    print_kv("Environment", &format!("{:?}", args.env.env));
    print_kv("Rule", &config.rule.to_string());
    print_kv("Approximator", &format!("{:?}", config.approximator));
    print_kv(
        "Hyperparameters",
        &format!(
            "gamma={} alpha={} epsilon={}",
            config.gamma, config.alpha, config.epsilon
        ),
    );
    print_kv("Episodes", &format_number(args.episodes));
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let brain = TdBrain::new(config);
    let mut driver = AgentDriver::spawn(AgentId(0), brain, env.as_ref())?;

    let mut pipeline = TrainingPipeline::new(TrainingConfig::new(args.episodes));
    if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    let metrics = Arc::new(Mutex::new(MetricsObserver::default()));
    pipeline = pipeline.with_observer(Box::new(Arc::clone(&metrics)));
    if let Some(path) = &args.jsonl {
        let mut observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        if args.trace_steps {
            observer = observer.with_steps();
        }
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut driver, env.as_mut())?;

    print_section("Results");
    print_kv("Episodes", &format_number(result.episodes));
    print_kv("Total steps", &format_number(result.total_steps));
    print_kv("Mean return", &format!("{:.3}", result.mean_return));
    print_kv("Best return", &format!("{:.3}", result.best_return));
    print_kv("Final return", &format!("{:.3}", result.final_return));
    print_kv("Mean length", &format!("{:.1}", result.mean_steps));
    let recent = metrics
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();
    print_kv(
        "Recent mean return",
        &format!("{:.3} (last {} episodes)", recent.recent_mean_return, recent.window),
    );

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        println!("\nSummary written to {}", path.display());
    }

    if let Some(path) = &args.output {
        let saved = driver.brain().snapshot()?;
        repository_for(path)
            .save(&saved, path)
            .with_context(|| format!("failed to save brain to {}", path.display()))?;
        println!("\nBrain saved to {}", path.display());
    }

    driver.destroy()?;
    Ok(())
}
