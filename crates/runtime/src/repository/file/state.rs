//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use tracker_core::BattleState;

use crate::repository::{RepositoryError, Result, StateRepository};

/// File-based implementation of StateRepository.
///
/// Stores battle snapshots as individual bincode files indexed by revision.
///
/// # File Format
///
/// States are stored as `state_{revision}.bin`. Each write goes to a
/// temporary file first and is renamed into place, so a crash never leaves a
/// truncated snapshot under a valid name.
pub struct FileStateRepository {
    base_dir: PathBuf,
}

impl FileStateRepository {
    /// Create a new file-based state repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to a state file.
    fn state_path(&self, revision: u64) -> PathBuf {
        self.base_dir.join(format!("state_{}.bin", revision))
    }
}

impl StateRepository for FileStateRepository {
    fn save(&self, revision: u64, state: &BattleState) -> Result<()> {
        let path = self.state_path(revision);
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(state).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved state[{}] to {}", revision, path.display());

        Ok(())
    }

    fn load(&self, revision: u64) -> Result<Option<BattleState>> {
        let path = self.state_path(revision);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let state: BattleState = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!("Loaded state[{}] from {}", revision, path.display());

        Ok(Some(state))
    }

    fn exists(&self, revision: u64) -> bool {
        self.state_path(revision).exists()
    }

    fn delete(&self, revision: u64) -> Result<()> {
        let path = self.state_path(revision);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted state[{}]", revision);
        }

        Ok(())
    }

    fn list_revisions(&self) -> Result<Vec<u64>> {
        let mut revisions = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(revision) = filename
                    .strip_prefix("state_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(revision) = revision.parse::<u64>()
            {
                revisions.push(revision);
            }
        }

        revisions.sort_unstable();
        Ok(revisions)
    }
}
