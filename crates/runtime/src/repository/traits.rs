//! Repository contracts for saving and loading battle snapshots.

use tracker_core::BattleState;

use super::Result;

/// Repository for battle state persistence and loading
///
/// Snapshots are indexed by [`BattleState::revision`], which only moves when
/// an event actually changed the battle.
pub trait StateRepository: Send + Sync {
    /// Save a battle state indexed by revision
    fn save(&self, revision: u64, state: &BattleState) -> Result<()>;

    /// Load a battle state by revision
    fn load(&self, revision: u64) -> Result<Option<BattleState>>;

    /// Check if a state exists
    fn exists(&self, revision: u64) -> bool;

    /// Delete a state
    fn delete(&self, revision: u64) -> Result<()>;

    /// List all available revisions, ascending
    fn list_revisions(&self) -> Result<Vec<u64>>;

    /// Load the most recent snapshot, if any was saved
    fn latest(&self) -> Result<Option<BattleState>> {
        match self.list_revisions()?.last() {
            Some(&revision) => self.load(revision),
            None => Ok(None),
        }
    }
}
