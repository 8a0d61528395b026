//! Error types for the battle engine.

use crate::conditions::ConditionId;
use crate::error::{ErrorSeverity, TrackerError};
use crate::state::{BattleId, Template};

/// Category of a rejected event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Malformed number or out-of-range value supplied by the user.
    InvalidInput,
    /// The event names a combatant, condition or instance that does not exist.
    NotFound,
    /// The event is not legal in the current state.
    InvariantViolation,
    /// Weak requested while Elite is active, or vice versa.
    ConflictingTemplate,
}

/// Errors surfaced while executing a battle event.
///
/// Every error leaves the battle state unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("roster is full (max: {max})")]
    RosterFull { max: usize },

    #[error("combatant {0} is not on the roster")]
    CombatantNotFound(BattleId),

    #[error("combatant {combatant} has no {condition} condition")]
    ConditionNotFound {
        combatant: BattleId,
        condition: ConditionId,
    },

    #[error("combatant {combatant} has no persistent damage instance at index {index}")]
    PersistentInstanceNotFound { combatant: BattleId, index: usize },

    #[error("initiative negotiation is already in progress")]
    NegotiationInProgress,

    #[error("initiative negotiation is not in progress")]
    NotNegotiating,

    #[error("tie at initiative {contested} must be resolved first")]
    TieUnresolved { contested: i32 },

    #[error("no tie is awaiting resolution")]
    NoPendingTie,

    #[error("combatant {chosen} is not among the tied combatants")]
    ChoiceNotTied { chosen: BattleId },

    #[error("no combatant holds an initiative")]
    EmptyTurnOrder,

    #[error("persistent damage on {target} must be answered first")]
    PromptPending { target: BattleId },

    #[error("no persistent damage prompt is pending")]
    NoPendingPrompt,

    #[error("combatant {combatant} is {active}; remove it before applying {requested}")]
    ConflictingTemplate {
        combatant: BattleId,
        active: Template,
        requested: Template,
    },
}

impl EngineError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        use EngineError::*;
        match self {
            InvalidInput { .. } | RosterFull { .. } => ErrorKind::InvalidInput,
            CombatantNotFound(_) | ConditionNotFound { .. } | PersistentInstanceNotFound { .. } => {
                ErrorKind::NotFound
            }
            NegotiationInProgress
            | NotNegotiating
            | TieUnresolved { .. }
            | NoPendingTie
            | ChoiceNotTied { .. }
            | EmptyTurnOrder
            | PromptPending { .. }
            | NoPendingPrompt => ErrorKind::InvariantViolation,
            ConflictingTemplate { .. } => ErrorKind::ConflictingTemplate,
        }
    }
}

impl TrackerError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::NotFound => ErrorSeverity::Recoverable,
            ErrorKind::InvalidInput
            | ErrorKind::InvariantViolation
            | ErrorKind::ConflictingTemplate => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use EngineError::*;
        match self {
            InvalidInput { .. } => "ENGINE_INVALID_INPUT",
            RosterFull { .. } => "ENGINE_ROSTER_FULL",
            CombatantNotFound(_) => "ENGINE_COMBATANT_NOT_FOUND",
            ConditionNotFound { .. } => "ENGINE_CONDITION_NOT_FOUND",
            PersistentInstanceNotFound { .. } => "ENGINE_PERSISTENT_INSTANCE_NOT_FOUND",
            NegotiationInProgress => "ENGINE_NEGOTIATION_IN_PROGRESS",
            NotNegotiating => "ENGINE_NOT_NEGOTIATING",
            TieUnresolved { .. } => "ENGINE_TIE_UNRESOLVED",
            NoPendingTie => "ENGINE_NO_PENDING_TIE",
            ChoiceNotTied { .. } => "ENGINE_CHOICE_NOT_TIED",
            EmptyTurnOrder => "ENGINE_EMPTY_TURN_ORDER",
            PromptPending { .. } => "ENGINE_PROMPT_PENDING",
            NoPendingPrompt => "ENGINE_NO_PENDING_PROMPT",
            ConflictingTemplate { .. } => "ENGINE_CONFLICTING_TEMPLATE",
        }
    }
}
