//! Inspect command - print what a saved brain contains

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    approximator::Approximator,
    cli::{
        output::{format_number, print_kv, print_section, print_subsection},
        repository_for,
    },
};

#[derive(Parser, Debug)]
#[command(about = "Show the contents of a saved brain")]
pub struct InspectArgs {
    /// Path to the saved brain
    pub brain: PathBuf,

    /// Also list the enumerated actions
    #[arg(long)]
    pub actions: bool,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let saved = repository_for(&args.brain).load(&args.brain)?;

    print_section(&format!("Brain: {}", args.brain.display()));
    print_kv("Format version", &saved.version.to_string());
    print_kv("Rule", &saved.config.rule.to_string());
    print_kv("Gamma", &saved.config.gamma.to_string());
    print_kv("Alpha", &saved.config.alpha.to_string());
    print_kv("Epsilon", &saved.config.epsilon.to_string());
    print_kv(
        "Seed",
        &saved
            .config
            .seed
            .map_or_else(|| "none".to_string(), |s| s.to_string()),
    );
    print_kv("Episodes", &format_number(saved.episodes));
    print_kv("Phase", &saved.phase.to_string());
    print_kv("Last fitness", &saved.fitness.to_string());

    print_subsection("Spaces");
    print_kv("Sensors", &saved.info.sensors.to_string());
    print_kv("Actions", &saved.info.actions.to_string());
    print_kv("Reward", &saved.info.reward.to_string());

    print_subsection("Approximator");
    print_kv("Kind", saved.approximator.kind());
    match &saved.approximator {
        Approximator::Table(table) => {
            print_kv("Action bins", &table.action_bins().to_string());
            print_kv("State bins", &table.state_bins().to_string());
            print_kv("Entries", &format_number(table.len()));
        }
        Approximator::Tiles(tiles) => {
            print_kv("Tilings", &tiles.num_tiles().to_string());
            print_kv("Weights", &format_number(tiles.num_weights()));
            print_kv("Learning rate", &tiles.learning_rate().to_string());
        }
    }

    print_kv("Action count", &format_number(saved.action_list.len()));
    if args.actions {
        for action in &saved.action_list {
            println!("    {action}");
        }
    }
    Ok(())
}
