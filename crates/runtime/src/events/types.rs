//! Event payloads carried on the bus.

use serde::{Deserialize, Serialize};

use tracker_core::{BattleEvent, BattleId, BattleState, ErrorSeverity, EventOutcome};

/// Battle state events (applied or rejected battle events).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BattleStateEvent {
    /// An event changed the battle and was committed.
    EventApplied {
        /// Revision of `after_state`.
        revision: u64,
        event: BattleEvent,
        outcome: EventOutcome,
        after_state: Box<BattleState>,
    },

    /// The engine refused an event; the state did not move.
    EventRejected(RejectedEvent),
}

/// Details of a refused event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedEvent {
    pub event: BattleEvent,
    pub error_code: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

/// Turn change after `FinishTurn`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvent {
    pub previous: Option<BattleId>,
    pub active: BattleId,
    pub round: u32,
    pub new_round: bool,
}

/// Snapshot persistence results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PersistenceEvent {
    StateSaved { revision: u64 },
    SaveFailed { revision: u64, error: String },
}
