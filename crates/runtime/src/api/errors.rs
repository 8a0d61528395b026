//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and the battle
//! engine so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use tracker_core::{EngineError, ErrorSeverity, TrackerError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Persistence(#[from] crate::workers::PersistenceError),

    /// The engine rejected the event; the battle state is unchanged.
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("catalog has no entry '{0}'")]
    UnknownCatalogEntry(String),
}

impl RuntimeError {
    /// Engine error behind this failure, if the engine raised it.
    pub fn as_engine(&self) -> Option<&EngineError> {
        match self {
            Self::Engine(error) => Some(error),
            _ => None,
        }
    }

    /// Severity for routing: engine errors keep their own, an unknown catalog
    /// entry is a validation failure, everything else is internal plumbing.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Engine(error) => error.severity(),
            Self::UnknownCatalogEntry(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Internal,
        }
    }
}
