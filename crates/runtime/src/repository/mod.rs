//! Repository layer for dynamic runtime data.
//!
//! Repositories hold battle snapshots indexed by revision, for save/load and
//! for resuming a session. Static catalog content is handled by the oracle,
//! not by repositories.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStateRepository;
pub use memory::InMemoryStateRepo;
pub use traits::StateRepository;
