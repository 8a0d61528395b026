//! Persistence worker that snapshots every committed battle state.
//!
//! Listens to [`Topic::Battle`] and saves each applied event's `after_state`
//! under its revision, so a session can be resumed from the latest snapshot.
//!
//! # File Structure
//!
//! ```text
//! {base_dir}/{session_id}/
//!   └── states/
//!       ├── state_{revision}.bin
//!       └── ...
//! ```

use std::path::PathBuf;

use tokio::sync::{broadcast, oneshot};
use tracing::{debug, error, info, warn};

use tracker_core::BattleState;

use crate::events::{BattleStateEvent, Event, EventBus, PersistenceEvent, Topic};
use crate::repository::{FileStateRepository, StateRepository};

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Errors that can occur during persistence operations
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to save state at revision {revision}: {error}")]
    StateSave { revision: u64, error: String },

    #[error(transparent)]
    Repository(#[from] crate::repository::RepositoryError),
}

/// Configuration for the persistence worker
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Session identifier (used for the directory name)
    pub session_id: String,

    /// Base directory for all persistence files
    pub base_dir: PathBuf,
}

impl PersistenceConfig {
    pub fn new(session_id: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            session_id: session_id.into(),
            base_dir: base_dir.into(),
        }
    }

    pub fn session_dir(&self) -> PathBuf {
        self.base_dir.join(&self.session_id)
    }

    pub fn states_dir(&self) -> PathBuf {
        self.session_dir().join("states")
    }

    /// Opens the snapshot repository for this session.
    pub fn open_repository(&self) -> Result<FileStateRepository> {
        Ok(FileStateRepository::new(self.states_dir())?)
    }
}

/// Background task that writes battle snapshots.
pub struct PersistenceWorker {
    config: PersistenceConfig,
    repo: Box<dyn StateRepository>,
    initial_state: BattleState,
    event_rx: broadcast::Receiver<Event>,
    event_bus: EventBus,
    shutdown_rx: oneshot::Receiver<()>,
}

impl PersistenceWorker {
    /// Creates a worker that saves into `{base_dir}/{session_id}/states`.
    ///
    /// Subscribes to the bus right away, so no event published after this
    /// call is missed.
    pub fn new(
        config: PersistenceConfig,
        initial_state: BattleState,
        event_bus: EventBus,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<Self> {
        let repo = config.open_repository()?;
        Ok(Self::with_repository(
            config,
            Box::new(repo),
            initial_state,
            event_bus,
            shutdown_rx,
        ))
    }

    /// Creates a worker over any repository.
    pub fn with_repository(
        config: PersistenceConfig,
        repo: Box<dyn StateRepository>,
        initial_state: BattleState,
        event_bus: EventBus,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Self {
        let event_rx = event_bus.subscribe(Topic::Battle);
        Self {
            config,
            repo,
            initial_state,
            event_rx,
            event_bus,
            shutdown_rx,
        }
    }

    /// Main worker loop.
    ///
    /// Runs until the shutdown signal fires (or its sender is dropped), then
    /// drains whatever is still buffered before returning.
    pub async fn run(mut self) {
        info!(
            "PersistenceWorker started: session={}, dir={}",
            self.config.session_id,
            self.config.states_dir().display()
        );

        let initial = std::mem::take(&mut self.initial_state);
        self.save(&initial);

        loop {
            tokio::select! {
                biased;

                event = self.event_rx.recv() => {
                    match event {
                        Ok(event) => self.handle_event(event),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Later snapshots are full states, so the gap only
                            // loses intermediate revisions.
                            warn!("PersistenceWorker lagged behind, {} events skipped", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            info!("Event bus closed, shutting down PersistenceWorker");
                            break;
                        }
                    }
                }

                _ = &mut self.shutdown_rx => {
                    debug!("Shutdown signal received, draining pending events");
                    self.drain();
                    break;
                }
            }
        }

        info!("PersistenceWorker stopped");
    }

    fn drain(&mut self) {
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => self.handle_event(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("PersistenceWorker lagged behind, {} events skipped", skipped);
                }
                Err(_) => break,
            }
        }
    }

    fn handle_event(&self, event: Event) {
        if let Event::Battle(BattleStateEvent::EventApplied { after_state, .. }) = event {
            self.save(&after_state);
        }
    }

    fn save(&self, state: &BattleState) {
        let revision = state.revision;
        let result = self
            .repo
            .save(revision, state)
            .map_err(|e| PersistenceError::StateSave {
                revision,
                error: e.to_string(),
            });

        let event = match result {
            Ok(()) => {
                debug!("Saved battle snapshot at revision {}", revision);
                PersistenceEvent::StateSaved { revision }
            }
            Err(e) => {
                error!("{}", e);
                PersistenceEvent::SaveFailed {
                    revision,
                    error: e.to_string(),
                }
            }
        };
        self.event_bus.publish(Event::Persistence(event));
    }
}
