//! In-memory brain repository for testing.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::BrainRepository, td::SavedTdBrain};

/// Stores snapshots in a shared map keyed by path, without touching the file
/// system.
///
/// Clones share the same storage, so a clone handed to a pipeline can be
/// inspected afterwards.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use tdlearn::adapters::InMemoryRepository;
/// use tdlearn::ports::BrainRepository;
///
/// let repo = InMemoryRepository::new();
/// assert!(repo.load(Path::new("missing")).is_err());
/// assert_eq!(repo.count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored snapshots.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(path.to_string_lossy().as_ref())
    }
}

impl BrainRepository for InMemoryRepository {
    fn save(&self, brain: &SavedTdBrain, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();
        let bytes = rmp_serde::to_vec_named(brain).map_err(|e| Error::SerializationContext {
            operation: "serialize brain for in-memory storage".to_string(),
            message: e.to_string(),
        })?;
        self.storage().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedTdBrain> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage();
        let bytes = storage.get(&key).ok_or_else(|| Error::MissingBrain { key: key.clone() })?;

        let brain: SavedTdBrain =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize brain from in-memory storage".to_string(),
                message: e.to_string(),
            })?;
        brain.validate()?;
        Ok(brain)
    }
}
