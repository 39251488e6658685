//! Repository port for brain persistence.

use std::path::Path;

use crate::{Result, td::SavedTdBrain};

/// Port for persisting and loading brain snapshots.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tdlearn::ports::BrainRepository;
/// use tdlearn::td::TdBrain;
///
/// fn save_brain<R: BrainRepository>(repo: &R, brain: &TdBrain, path: &Path) -> tdlearn::Result<()> {
///     repo.save(&brain.snapshot()?, path)
/// }
/// ```
pub trait BrainRepository {
    /// Save a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization
    /// fails.
    fn save(&self, brain: &SavedTdBrain, path: &Path) -> Result<()>;

    /// Load a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing readable is stored at `path`.
    fn load(&self, path: &Path) -> Result<SavedTdBrain>;
}
