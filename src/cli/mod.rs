//! Command-line interface: train, evaluate and inspect TD brains.

pub mod commands;
pub mod output;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::{
    adapters::{JsonRepository, MsgPackRepository},
    envs::{Corridor, GridMaze},
    ports::{BrainRepository, Environment},
};

/// Built-in environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvKind {
    /// 1-D corridor, walk right to the end
    Corridor,
    /// 5x5 grid maze with walls
    Maze,
}

/// Environment options shared by the commands.
#[derive(Args, Debug, Clone)]
pub struct EnvArgs {
    /// Environment to run in
    #[arg(long, short = 'e', value_enum, default_value = "corridor")]
    pub env: EnvKind,

    /// Corridor length in cells
    #[arg(long, default_value_t = 10)]
    pub corridor_length: usize,

    /// Maze layout file ('.' free, '#' wall, 'S' start, 'G' goal)
    #[arg(long)]
    pub maze: Option<std::path::PathBuf>,

    /// Step limit per episode
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,
}

impl EnvArgs {
    pub fn build(&self) -> Result<Box<dyn Environment>> {
        let env: Box<dyn Environment> = match self.env {
            EnvKind::Corridor => Box::new(Corridor::new(self.corridor_length, self.max_steps)?),
            EnvKind::Maze => {
                let maze = match &self.maze {
                    Some(path) => std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read maze layout {}", path.display()))?
                        .parse::<GridMaze>()?,
                    None => GridMaze::standard()?,
                };
                Box::new(maze.with_max_steps(self.max_steps))
            }
        };
        Ok(env)
    }
}

/// Pick a repository from the file extension: `.json` is JSON, anything
/// else MessagePack.
pub fn repository_for(path: &Path) -> Box<dyn BrainRepository> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Box::new(JsonRepository),
        _ => Box::new(MsgPackRepository),
    }
}
