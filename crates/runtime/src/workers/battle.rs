//! Battle worker that owns the authoritative [`tracker_core::BattleState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], executes battle events via
//! [`tracker_core::BattleEngine`], and publishes what happened to the
//! EventBus.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use tracker_core::{
    BattleEngine, BattleEvent, BattleState, CatalogOracle, EventOutcome,
    NegotiationStatus, TrackerConfig, TrackerError, TurnBoundaryHook,
};

use crate::api::{Result, RuntimeError};
use crate::events::{BattleStateEvent, Event, EventBus, RejectedEvent, TurnEvent};

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Run one battle event through the engine.
    Dispatch {
        event: BattleEvent,
        reply: oneshot::Sender<Result<EventOutcome>>,
    },
    /// Resolve a catalog id and seat the result.
    AddFromCatalog {
        source_id: String,
        reply: oneshot::Sender<Result<EventOutcome>>,
    },
    /// Query the current battle state (read-only).
    QueryState { reply: oneshot::Sender<BattleState> },
}

/// Background task that processes battle commands.
///
/// The worker is the only place the engine runs, so commands are applied
/// strictly in the order they arrive.
pub struct BattleWorker {
    state: BattleState,
    config: TrackerConfig,
    hook: Arc<dyn TurnBoundaryHook>,
    catalog: Arc<dyn CatalogOracle>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl BattleWorker {
    /// Creates a new battle worker.
    pub fn new(
        state: BattleState,
        config: TrackerConfig,
        hook: Arc<dyn TurnBoundaryHook>,
        catalog: Arc<dyn CatalogOracle>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            "BattleWorker initialized at revision {} with {} combatants, persistent damage at {}",
            state.revision,
            state.combatant_count(),
            config.persistent_damage_timing
        );

        Self {
            state,
            config,
            hook,
            catalog,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        debug!("BattleWorker stopped at revision {}", self.state.revision);
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Dispatch { event, reply } => {
                let result = self.execute(event);
                if reply.send(result).is_err() {
                    debug!("Dispatch reply channel closed (caller dropped)");
                }
            }
            Command::AddFromCatalog { source_id, reply } => {
                let result = self.add_from_catalog(&source_id);
                if reply.send(result).is_err() {
                    debug!("AddFromCatalog reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn add_from_catalog(&mut self, source_id: &str) -> Result<EventOutcome> {
        let Some(template) = self.catalog.template(source_id) else {
            warn!(
                target: "runtime::worker",
                source_id,
                "Catalog entry not found"
            );
            return Err(RuntimeError::UnknownCatalogEntry(source_id.to_string()));
        };
        self.execute(BattleEvent::AddCombatant(template))
    }

    /// Executes one event and publishes the result.
    ///
    /// This is the only method that calls `BattleEngine::execute()`, so every
    /// committed change goes out on the bus exactly once.
    fn execute(&mut self, event: BattleEvent) -> Result<EventOutcome> {
        let name = event.name();
        let target = event.target().map(|id| id.0);
        let negotiation = event.is_negotiation();

        let result = BattleEngine::new(&mut self.state)
            .with_config(self.config.clone())
            .with_hook(Arc::clone(&self.hook))
            .execute(event.clone());

        match result {
            Ok(outcome) => {
                debug!(
                    target: "runtime::worker",
                    event = name,
                    target_id = ?target,
                    changed = outcome.changed,
                    negotiation,
                    revision = self.state.revision,
                    "Battle event applied"
                );
                if outcome.changed {
                    self.log_milestones(&outcome);
                    self.publish_applied(event, &outcome);
                }
                Ok(outcome)
            }
            Err(error) => {
                let severity = error.severity();
                if severity.is_recoverable() {
                    debug!(
                        target: "runtime::worker",
                        event = name,
                        target_id = ?target,
                        code = error.error_code(),
                        severity = severity.as_str(),
                        "Battle event rejected: {}",
                        error
                    );
                } else {
                    warn!(
                        target: "runtime::worker",
                        event = name,
                        target_id = ?target,
                        code = error.error_code(),
                        severity = severity.as_str(),
                        negotiation,
                        "Battle event rejected: {}",
                        error
                    );
                }

                self.event_bus
                    .publish(Event::Battle(BattleStateEvent::EventRejected(RejectedEvent {
                        event,
                        error_code: error.error_code().to_string(),
                        message: error.to_string(),
                        severity,
                    })));

                Err(error.into())
            }
        }
    }

    fn log_milestones(&self, outcome: &EventOutcome) {
        match &outcome.negotiation {
            Some(NegotiationStatus::Sorted { order }) => info!(
                target: "runtime::worker",
                order = ?order,
                "Initiative order settled"
            ),
            Some(NegotiationStatus::TieResolution {
                mode,
                tied,
                contested,
            }) => info!(
                target: "runtime::worker",
                mode = ?mode,
                tied = ?tied,
                contested,
                "Initiative tie needs a decision"
            ),
            _ => {}
        }

        if !outcome.reissued.is_empty() {
            debug!(
                target: "runtime::worker",
                reissued = ?outcome.reissued,
                "Battle ids reissued after tie"
            );
        }

        if let Some(turn) = &outcome.turn {
            if turn.new_round {
                info!(
                    target: "runtime::worker",
                    round = turn.round,
                    active = turn.active.0,
                    "Round started"
                );
            }
            if !turn.skipped.is_empty() {
                debug!(
                    target: "runtime::worker",
                    skipped = ?turn.skipped,
                    "Skipped incapacitated creatures"
                );
            }
        }

        if let Some(prompt) = &outcome.prompt {
            info!(
                target: "runtime::worker",
                target_id = prompt.target.0,
                damage_type = %prompt.instance.damage_type,
                damage = prompt.instance.damage_value,
                "Persistent damage awaits an answer"
            );
        }
    }

    fn publish_applied(&self, event: BattleEvent, outcome: &EventOutcome) {
        if let Some(turn) = &outcome.turn {
            self.event_bus.publish(Event::Turn(TurnEvent {
                previous: turn.previous,
                active: turn.active,
                round: turn.round,
                new_round: turn.new_round,
            }));
        }

        self.event_bus
            .publish(Event::Battle(BattleStateEvent::EventApplied {
                revision: self.state.revision,
                event,
                outcome: outcome.clone(),
                after_state: Box::new(self.state.clone()),
            }));
    }
}
