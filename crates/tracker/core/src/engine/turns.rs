//! Turn and round scheduling.
//!
//! Turn order is derived from the roster on every call: combatants holding an
//! initiative, highest first. Creatures at 0 HP lose their turns; players at
//! 0 HP keep theirs.

use super::EngineError;
use super::hook::TurnBoundaryHook;
use crate::config::PersistentDamageTiming;
use crate::state::{BattleId, BattleState};

/// Result of one `finish_turn` call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnAdvance {
    /// Combatant whose turn ended; `None` when the first turn was seated.
    pub previous: Option<BattleId>,
    pub active: BattleId,
    pub round: u32,
    /// True when this call started a new round.
    pub new_round: bool,
    /// Incapacitated creatures passed over on the way to `active`.
    pub skipped: Vec<BattleId>,
}

/// Ends the active turn and seats the next combatant.
///
/// The first call after sorting seats the top of the order without touching
/// the round. A round starts only when the turn lands on index 0 of the
/// order, either by wrapping onto it or because every other creature is down
/// and the turn falls back to the top. Wrapping past a downed creature at the
/// top onto a later combatant stays in the current round.
///
/// `hook` runs for the outgoing combatant with
/// [`PersistentDamageTiming::EndOfTurn`] and for the incoming one with
/// [`PersistentDamageTiming::StartOfTurn`]. A prompt it returns is parked on
/// the state and blocks the next call until answered.
pub fn finish_turn(
    state: &mut BattleState,
    hook: &dyn TurnBoundaryHook,
    timing: PersistentDamageTiming,
) -> Result<TurnAdvance, EngineError> {
    if state.is_negotiating() {
        return Err(EngineError::NegotiationInProgress);
    }
    if let Some(prompt) = &state.pending_prompt {
        return Err(EngineError::PromptPending {
            target: prompt.target,
        });
    }

    let order: Vec<(BattleId, bool)> = state
        .roster
        .turn_order()
        .into_iter()
        .map(|c| (c.battle_id, c.is_incapacitated()))
        .collect();
    if order.is_empty() {
        return Err(EngineError::EmptyTurnOrder);
    }

    let current = state
        .turn
        .active
        .and_then(|active| order.iter().position(|(id, _)| *id == active));

    let Some(current) = current else {
        let first = order[0].0;
        state.turn.active = Some(first);
        if timing == PersistentDamageTiming::StartOfTurn {
            run_hook(state, hook, first);
        }
        return Ok(TurnAdvance {
            previous: None,
            active: first,
            round: state.turn.round,
            new_round: false,
            skipped: Vec::new(),
        });
    };

    let len = order.len();
    let mut skipped = Vec::new();
    let mut next = None;
    for step in 1..len {
        let index = (current + step) % len;
        let (id, incapacitated) = order[index];
        if incapacitated {
            skipped.push(id);
        } else {
            next = Some(index);
            break;
        }
    }

    // Every other combatant is down: the turn returns to the top of the order.
    let next = next.unwrap_or_else(|| {
        skipped.retain(|id| *id != order[0].0);
        0
    });
    let new_round = next == 0;
    let previous = order[current].0;
    let active = order[next].0;

    if timing == PersistentDamageTiming::EndOfTurn {
        run_hook(state, hook, previous);
    }

    state.turn.active = Some(active);
    if new_round {
        state.turn.round += 1;
    }

    if timing == PersistentDamageTiming::StartOfTurn {
        run_hook(state, hook, active);
    }

    Ok(TurnAdvance {
        previous: Some(previous),
        active,
        round: state.turn.round,
        new_round,
        skipped,
    })
}

fn run_hook(state: &mut BattleState, hook: &dyn TurnBoundaryHook, id: BattleId) {
    let Some(combatant) = state.roster.get_mut(id) else {
        return;
    };
    if hook.should_trigger(combatant) {
        state.pending_prompt = hook.apply(combatant);
    }
}
