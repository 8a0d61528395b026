//! Battle event execution pipeline.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`].
//! Every mutation (roster edits, initiative negotiation, turn advancement,
//! conditions, templates, HP) arrives as a [`BattleEvent`] and goes through
//! the same execute() pipeline, which either commits the whole change or
//! leaves the state untouched.

pub mod conditions;
mod errors;
pub mod health;
mod hook;
pub mod initiative;
mod input;
pub mod modifiers;
pub mod persistent;
pub mod templates;
mod transition;
mod turns;

use std::sync::Arc;

pub use errors::{EngineError, ErrorKind};
pub use hook::{NoopHook, TurnBoundaryHook, default_hook};
pub use initiative::{NegotiationStatus, TieMode};
pub use input::{parse_amount, parse_initiative};
pub use persistent::PersistentDamageResolver;
pub use turns::{TurnAdvance, finish_turn};

use crate::config::TrackerConfig;
use crate::event::{BattleEvent, EventOutcome};
use crate::state::BattleState;

/// Battle engine bound to one state.
///
/// The turn boundary hook is injected rather than looked up, so callers can
/// swap the persistent damage resolver for another side effect (or none).
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    config: TrackerConfig,
    hook: Arc<dyn TurnBoundaryHook>,
}

impl<'a> BattleEngine<'a> {
    /// Creates an engine with default configuration and the persistent damage
    /// resolver as turn boundary hook.
    pub fn new(state: &'a mut BattleState) -> Self {
        Self {
            state,
            config: TrackerConfig::default(),
            hook: default_hook(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn TurnBoundaryHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Executes an event atomically.
    ///
    /// The event runs against a copy of the state, which replaces the real
    /// one only on success. `revision` moves forward only when the state
    /// actually changed.
    pub fn execute(&mut self, event: BattleEvent) -> Result<EventOutcome, EngineError> {
        let mut next = self.state.clone();
        let mut outcome =
            transition::execute_event(event, &mut next, &self.config, self.hook.as_ref())?;

        outcome.changed = next != *self.state;
        if outcome.changed {
            next.revision += 1;
            *self.state = next;
        }
        Ok(outcome)
    }
}

/// Pure form of [`BattleEngine::execute`]: returns the next state instead of
/// mutating in place. Uses the persistent damage resolver as hook.
pub fn reduce(
    state: &BattleState,
    event: BattleEvent,
    config: &TrackerConfig,
) -> Result<(BattleState, EventOutcome), EngineError> {
    let mut next = state.clone();
    let outcome = BattleEngine::new(&mut next)
        .with_config(config.clone())
        .execute(event)?;
    Ok((next, outcome))
}
