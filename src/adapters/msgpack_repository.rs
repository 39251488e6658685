//! MessagePack implementation of the brain repository.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::BrainRepository, td::SavedTdBrain};

/// MessagePack-based brain repository.
///
/// Structs are written with field names so the tagged approximator payload
/// survives the round trip.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tdlearn::adapters::MsgPackRepository;
/// use tdlearn::ports::BrainRepository;
///
/// let repo = MsgPackRepository;
/// let saved = repo.load(Path::new("trained.msgpack"))?;
/// println!("{} episodes", saved.episodes);
/// # Ok::<(), tdlearn::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl BrainRepository for MsgPackRepository {
    fn save(&self, brain: &SavedTdBrain, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, brain).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize brain to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush()?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedTdBrain> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let brain: SavedTdBrain =
            rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
                operation: "deserialize brain from MessagePack".to_string(),
                message: e.to_string(),
            })?;
        brain.validate()?;

        Ok(brain)
    }
}
