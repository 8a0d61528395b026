//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! dispatching battle events or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use tracker_core::{BattleEvent, BattleState, EventOutcome};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Runs one event through the battle engine.
    ///
    /// A rejected event comes back as [`RuntimeError::Engine`] and leaves the
    /// battle untouched.
    pub async fn dispatch(&self, event: BattleEvent) -> Result<EventOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Dispatch {
                event,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Looks a catalog id up and seats a fresh copy of it.
    ///
    /// The battle id of the new combatant is in [`EventOutcome::added`].
    pub async fn add_from_catalog(&self, source_id: impl Into<String>) -> Result<EventOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::AddFromCatalog {
                source_id: source_id.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - Applied and rejected battle events
    /// - `Topic::Turn` - Turn changes after `FinishTurn`
    /// - `Topic::Persistence` - Snapshot saves and failures
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tracker_runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Announce the new active combatant
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Query the current battle state (read-only snapshot)
    pub async fn query_state(&self) -> Result<BattleState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
