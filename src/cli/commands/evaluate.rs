//! Evaluate command - greedy runs of a saved brain

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    cli::{
        EnvArgs,
        output::{format_number, print_kv, print_section},
        repository_for,
    },
    pipeline::{AgentDriver, ProgressObserver, TrainingConfig, TrainingPipeline},
    ports::{AgentBrain, AgentId},
    td::TdBrain,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained brain")]
pub struct EvaluateArgs {
    /// Path to the saved brain
    pub brain: PathBuf,

    #[command(flatten)]
    pub env: EnvArgs,

    /// Number of evaluation episodes
    #[arg(long, short = 'n', default_value_t = 100)]
    pub episodes: usize,

    /// Exploration rate during evaluation
    #[arg(long, default_value_t = 0.0)]
    pub epsilon: f64,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let saved = repository_for(&args.brain).load(&args.brain)?;
    let mut env = args.env.build()?;

    let agent = AgentId(0);
    if env.agent_info(agent) != saved.info {
        bail!(
            "brain was trained for {} but the environment provides {}",
            saved.info,
            env.agent_info(agent)
        );
    }

    let mut brain = TdBrain::from_saved(saved)?;
    brain.abandon_episode();
    let trained_episodes = brain.episodes();
    brain.set_epsilon(args.epsilon);

    print_section("Evaluation");
    print_kv("Brain", &args.brain.display().to_string());
    print_kv("Trained episodes", &format_number(trained_episodes));
    print_kv("Epsilon", &args.epsilon.to_string());
    print_kv("Episodes", &format_number(args.episodes));

    let mut driver = AgentDriver::resume(agent, brain, env.as_ref());
    let mut pipeline = TrainingPipeline::new(TrainingConfig::new(args.episodes));
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    let result = pipeline.run(&mut driver, env.as_mut())?;

    print_section("Results");
    print_kv("Mean return", &format!("{:.3}", result.mean_return));
    print_kv("Best return", &format!("{:.3}", result.best_return));
    print_kv("Mean length", &format!("{:.1}", result.mean_steps));
    Ok(())
}
