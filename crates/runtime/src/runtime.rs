//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the battle.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use tracker_core::engine::default_hook;
use tracker_core::{BattleState, CatalogOracle, TrackerConfig, TurnBoundaryHook};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::CatalogOracleImpl;
use crate::repository::StateRepository;
use crate::workers::{BattleWorker, Command, PersistenceConfig, PersistenceWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub tracker_config: TrackerConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Snapshot every committed state when set (default: off)
    pub persistence: Option<PersistenceConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tracker_config: TrackerConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            persistence: None,
        }
    }
}

/// Main runtime that orchestrates the battle
///
/// Design: Runtime owns workers and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Background workers
    battle_worker_handle: JoinHandle<()>,
    persistence_worker: Option<(oneshot::Sender<()>, JoinHandle<()>)>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the battle worker to finish queued commands, then lets the
    /// persistence worker write out every snapshot still on the bus. Handles
    /// cloned from this runtime must be dropped first or the battle worker
    /// keeps running.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.battle_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        if let Some((shutdown_tx, persistence_handle)) = self.persistence_worker {
            // The worker also stops when the sender is dropped.
            let _ = shutdown_tx.send(());
            persistence_handle.await.map_err(RuntimeError::WorkerJoin)?;
        }

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<BattleState>,
    catalog: Option<Arc<dyn CatalogOracle>>,
    hook: Option<Arc<dyn TurnBoundaryHook>>,
    restore_latest: bool,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            catalog: None,
            hook: None,
            restore_latest: false,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the engine configuration only
    pub fn tracker_config(mut self, tracker_config: TrackerConfig) -> Self {
        self.config.tracker_config = tracker_config;
        self
    }

    /// Provide initial battle state (defaults to an empty battle)
    pub fn initial_state(mut self, state: BattleState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the catalog used by [`RuntimeHandle::add_from_catalog`]
    ///
    /// Without one, every catalog lookup fails with
    /// [`RuntimeError::UnknownCatalogEntry`].
    pub fn catalog(mut self, catalog: impl CatalogOracle + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Replace the turn boundary hook (defaults to the persistent damage
    /// resolver).
    pub fn hook(mut self, hook: Arc<dyn TurnBoundaryHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Snapshot every committed state into `config`'s session directory
    pub fn enable_persistence(mut self, config: PersistenceConfig) -> Self {
        self.config.persistence = Some(config);
        self
    }

    /// Resume from the newest snapshot of the persistence session, if one
    /// exists. Takes precedence over [`Self::initial_state`].
    pub fn restore_latest(mut self, restore: bool) -> Self {
        self.restore_latest = restore;
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let restored = match (&self.config.persistence, self.restore_latest) {
            (Some(persistence), true) => {
                let state = persistence.open_repository()?.latest()?;
                if let Some(state) = &state {
                    info!(
                        "Restored session {} at revision {}",
                        persistence.session_id, state.revision
                    );
                }
                state
            }
            _ => None,
        };
        let initial_state = restored.or(self.state).unwrap_or_default();

        let catalog = self
            .catalog
            .unwrap_or_else(|| Arc::new(CatalogOracleImpl::new()));
        let hook = self.hook.unwrap_or_else(default_hook);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        // Subscribe before the battle worker starts so no commit is missed.
        let persistence_worker = match self.config.persistence {
            Some(persistence) => {
                let (shutdown_tx, shutdown_rx) = oneshot::channel();
                let worker = PersistenceWorker::new(
                    persistence,
                    initial_state.clone(),
                    event_bus.clone(),
                    shutdown_rx,
                )?;
                Some((shutdown_tx, tokio::spawn(worker.run())))
            }
            None => None,
        };

        let battle_worker = BattleWorker::new(
            initial_state,
            self.config.tracker_config,
            hook,
            catalog,
            command_rx,
            event_bus,
        );
        let battle_worker_handle = tokio::spawn(battle_worker.run());

        Ok(Runtime {
            handle,
            battle_worker_handle,
            persistence_worker,
        })
    }
}
