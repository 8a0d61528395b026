//! Turn boundary hooks run by the scheduler when a turn changes hands.
//!
//! The scheduler does not know what happens at a turn boundary; it is handed
//! a hook and calls it for the combatant whose turn is ending (or beginning,
//! depending on [`PersistentDamageTiming`](crate::config::PersistentDamageTiming)).

use std::sync::Arc;

use super::persistent::PersistentDamageResolver;
use crate::state::{Combatant, PersistentDamagePrompt};

/// Side effect applied to one combatant at a turn boundary.
pub trait TurnBoundaryHook: Send + Sync {
    /// Whether the hook has anything to do for this combatant.
    fn should_trigger(&self, combatant: &Combatant) -> bool;

    /// Applies the hook. A returned prompt blocks turn progression until
    /// answered.
    fn apply(&self, combatant: &mut Combatant) -> Option<PersistentDamagePrompt>;
}

/// Hook that never triggers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHook;

impl TurnBoundaryHook for NoopHook {
    fn should_trigger(&self, _combatant: &Combatant) -> bool {
        false
    }

    fn apply(&self, _combatant: &mut Combatant) -> Option<PersistentDamagePrompt> {
        None
    }
}

/// Hook used when the caller does not supply one.
pub fn default_hook() -> Arc<dyn TurnBoundaryHook> {
    Arc::new(PersistentDamageResolver)
}
