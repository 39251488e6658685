//! JSON implementation of the brain repository.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::BrainRepository, td::SavedTdBrain};

/// Human-readable repository writing pretty-printed JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl JsonRepository {
    pub fn new() -> Self {
        Self
    }
}

impl BrainRepository for JsonRepository {
    fn save(&self, brain: &SavedTdBrain, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, brain)?;
        writer.flush()?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedTdBrain> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let brain: SavedTdBrain = serde_json::from_reader(BufReader::new(file))?;
        brain.validate()?;
        Ok(brain)
    }
}
