//! Deterministic battle logic and data types for the encounter tracker.
//!
//! `tracker-core` defines the canonical rules (condition registry, stat
//! modifiers, Weak/Elite templating, initiative negotiation, turn scheduling,
//! persistent damage) and exposes pure APIs. All state mutation flows through
//! [`engine::BattleEngine`] or the equivalent pure [`engine::reduce`], and
//! supporting crates depend on the types re-exported here.
pub mod conditions;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod state;
pub mod stats;

pub use conditions::{ConditionDefinition, ConditionId, EffectTarget, lookup};
pub use config::{PersistentDamageTiming, TrackerConfig};
pub use engine::{
    BattleEngine, EngineError, ErrorKind, NegotiationStatus, NoopHook, PersistentDamageResolver,
    TieMode, TurnAdvance, TurnBoundaryHook, finish_turn, parse_amount, parse_initiative, reduce,
};
pub use env::{CatalogOracle, CombatantTemplate};
pub use error::{ErrorSeverity, TrackerError};
pub use event::{BattleEvent, EventOutcome};
pub use state::{
    AppliedTemplate, BattleId, BattleState, Combatant, CombatantKind, ConditionInstance,
    ConditionalResistance, CreatureAction, HpThreshold, Negotiation, NegotiationPhase,
    PendingTie, PersistentDamage, PersistentDamagePrompt, Resistance, Roster, Template,
    TemplateSnapshot, TurnState,
};
pub use stats::{Attack, AttackCategory, DamageRoll, DamageRollError, HitSlot, StatId, Stats};
