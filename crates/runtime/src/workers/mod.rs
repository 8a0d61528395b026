//! Worker tasks that back the runtime orchestration.
//!
//! The battle worker owns the battle state and executes commands, while the
//! persistence worker snapshots every committed state in the background.

mod battle;
mod persistence;

pub use battle::{BattleWorker, Command};
pub use persistence::{PersistenceConfig, PersistenceError, PersistenceWorker};
