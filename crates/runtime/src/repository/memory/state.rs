//! In-memory StateRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracker_core::BattleState;

use crate::repository::{RepositoryError, Result, StateRepository};

/// In-memory implementation of StateRepository.
///
/// Stores snapshots indexed by revision for testing and local development.
pub struct InMemoryStateRepo {
    states: RwLock<BTreeMap<u64, BattleState>>,
}

impl InMemoryStateRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            states: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create with one snapshot stored under its own revision.
    pub fn with_state(state: BattleState) -> Self {
        let mut states = BTreeMap::new();
        states.insert(state.revision, state);
        Self {
            states: RwLock::new(states),
        }
    }
}

impl Default for InMemoryStateRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRepository for InMemoryStateRepo {
    fn save(&self, revision: u64, state: &BattleState) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.insert(revision, state.clone());
        Ok(())
    }

    fn load(&self, revision: u64) -> Result<Option<BattleState>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.get(&revision).cloned())
    }

    fn exists(&self, revision: u64) -> bool {
        self.states
            .read()
            .map(|states| states.contains_key(&revision))
            .unwrap_or(false)
    }

    fn delete(&self, revision: u64) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.remove(&revision);
        Ok(())
    }

    fn list_revisions(&self) -> Result<Vec<u64>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.keys().copied().collect())
    }
}
