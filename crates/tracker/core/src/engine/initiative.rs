//! Initiative negotiation.
//!
//! `StartBattle` moves the roster into a queue. Each participant then gets an
//! initiative (or is skipped); once the queue is empty the committed values
//! are checked for ties. Every tie must be settled by a human choice before
//! the roster is reseated in turn order. Ties are rechecked after every
//! resolution, since bumping a value to `contested + 1` can collide again.

use std::collections::BTreeMap;
use std::mem;

use super::EngineError;
use crate::state::{
    BattleId, BattleState, Combatant, Negotiation, NegotiationPhase, PendingTie, Roster,
};

/// How a tie came about, which decides how it is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieMode {
    /// During the initial negotiation; tied participants are re-seated under
    /// fresh battle ids.
    Initial,
    /// A seated combatant's initiative was edited onto another's value.
    Inline,
}

/// What the negotiator needs next, reported after every negotiation event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NegotiationStatus {
    Idle,
    AwaitingInitiative {
        next: BattleId,
        name: String,
    },
    TieResolution {
        mode: TieMode,
        tied: Vec<BattleId>,
        contested: i32,
    },
    /// Negotiation finished; `order` is the turn order, highest first.
    Sorted {
        order: Vec<BattleId>,
    },
}

impl NegotiationStatus {
    fn tie(mode: TieMode, tie: &PendingTie) -> Self {
        Self::TieResolution {
            mode,
            tied: tie.tied.clone(),
            contested: tie.contested,
        }
    }
}

/// Reports the current negotiation state without changing it.
pub fn status(state: &BattleState) -> NegotiationStatus {
    match &state.negotiation {
        NegotiationPhase::Idle => NegotiationStatus::Idle,
        NegotiationPhase::InlineTie(tie) => NegotiationStatus::tie(TieMode::Inline, tie),
        NegotiationPhase::Negotiating(negotiation) => {
            match (&negotiation.tie, negotiation.queue.front()) {
                (Some(tie), _) => NegotiationStatus::tie(TieMode::Initial, tie),
                (None, Some(head)) => NegotiationStatus::AwaitingInitiative {
                    next: head.battle_id,
                    name: head.name.clone(),
                },
                (None, None) => NegotiationStatus::Idle,
            }
        }
    }
}

/// Moves every roster entry into the negotiation queue, in roster order.
///
/// Previous initiatives and the turn pointer are cleared; HP and conditions
/// carry over.
pub fn start_battle(state: &mut BattleState) -> Result<NegotiationStatus, EngineError> {
    if state.is_negotiating() {
        return Err(EngineError::NegotiationInProgress);
    }

    let queue = state
        .roster
        .drain()
        .into_iter()
        .map(|mut combatant| {
            combatant.initiative = None;
            combatant
        })
        .collect();

    state.turn.reset();
    state.pending_prompt = None;

    Ok(advance(
        state,
        Negotiation {
            queue,
            ..Negotiation::default()
        },
    ))
}

/// Assigns `value` to the head of the queue.
pub fn confirm_initiative(
    state: &mut BattleState,
    value: i32,
) -> Result<NegotiationStatus, EngineError> {
    let mut negotiation = take_open_negotiation(state)?;
    let Some(mut head) = negotiation.queue.pop_front() else {
        state.negotiation = NegotiationPhase::Negotiating(negotiation);
        return Err(EngineError::NotNegotiating);
    };

    head.initiative = Some(value);
    negotiation.committed.push(head);
    Ok(advance(state, negotiation))
}

/// Removes the head of the queue without an initiative. Skipped participants
/// are seated but have no turn until given an initiative.
pub fn skip_initiative(state: &mut BattleState) -> Result<NegotiationStatus, EngineError> {
    let mut negotiation = take_open_negotiation(state)?;
    let Some(head) = negotiation.queue.pop_front() else {
        state.negotiation = NegotiationPhase::Negotiating(negotiation);
        return Err(EngineError::NotNegotiating);
    };

    negotiation.skipped.push(head);
    Ok(advance(state, negotiation))
}

/// Settles the pending tie with `chosen` going first. `None` cancels and
/// leaves the tie outstanding.
pub fn resolve_tie(
    state: &mut BattleState,
    chosen: Option<BattleId>,
) -> Result<NegotiationStatus, EngineError> {
    resolve_tie_reissuing(state, chosen).map(|(status, _)| status)
}

/// [`resolve_tie`], also reporting the `(old, new)` battle ids handed out to
/// the tied combatants of an initial tie, in commit order.
pub fn resolve_tie_reissuing(
    state: &mut BattleState,
    chosen: Option<BattleId>,
) -> Result<(NegotiationStatus, Vec<(BattleId, BattleId)>), EngineError> {
    let (mode, tie) = match &state.negotiation {
        NegotiationPhase::Negotiating(Negotiation { tie: Some(tie), .. }) => {
            (TieMode::Initial, tie.clone())
        }
        NegotiationPhase::InlineTie(tie) => (TieMode::Inline, tie.clone()),
        _ => return Err(EngineError::NoPendingTie),
    };

    let Some(chosen) = chosen else {
        return Ok((NegotiationStatus::tie(mode, &tie), Vec::new()));
    };
    if !tie.tied.contains(&chosen) {
        return Err(EngineError::ChoiceNotTied { chosen });
    }
    let raised = tie.contested.checked_add(1).ok_or_else(|| {
        EngineError::invalid_input(
            "initiative",
            format!("cannot break a tie at {} by raising it", tie.contested),
        )
    })?;

    match mode {
        TieMode::Initial => {
            let mut negotiation = take_open_negotiation_any(state)?;
            negotiation.tie = None;
            let mut reissued = Vec::with_capacity(tie.tied.len());
            for combatant in negotiation
                .committed
                .iter_mut()
                .filter(|c| tie.tied.contains(&c.battle_id))
            {
                combatant.initiative = Some(if combatant.battle_id == chosen {
                    raised
                } else {
                    tie.contested
                });
                let fresh = state.allocate_id();
                reissued.push((combatant.battle_id, fresh));
                combatant.battle_id = fresh;
            }
            Ok((advance(state, negotiation), reissued))
        }
        TieMode::Inline => {
            if let Some(combatant) = state.roster.get_mut(chosen) {
                combatant.initiative = Some(raised);
            }
            Ok((recheck_roster(state), Vec::new()))
        }
    }
}

/// Edits the initiative of a seated combatant. Landing on a value another
/// combatant holds opens an inline tie.
pub fn set_initiative(
    state: &mut BattleState,
    id: BattleId,
    value: i32,
) -> Result<NegotiationStatus, EngineError> {
    match &state.negotiation {
        NegotiationPhase::Idle => {}
        NegotiationPhase::Negotiating(_) => return Err(EngineError::NegotiationInProgress),
        NegotiationPhase::InlineTie(tie) => {
            return Err(EngineError::TieUnresolved {
                contested: tie.contested,
            });
        }
    }

    let combatant = state
        .roster
        .get_mut(id)
        .ok_or(EngineError::CombatantNotFound(id))?;
    combatant.initiative = Some(value);

    Ok(recheck_roster(state))
}

/// Seats a combatant added while negotiation is open at the back of the
/// queue. Returns it back when no negotiation is running.
pub fn enqueue(state: &mut BattleState, combatant: Combatant) -> Result<(), Combatant> {
    match &mut state.negotiation {
        NegotiationPhase::Negotiating(negotiation) => {
            negotiation.queue.push_back(combatant);
            Ok(())
        }
        _ => Err(combatant),
    }
}

/// Removes a combatant from the roster or the negotiation lists and drops
/// any tie it was part of, rechecking from scratch.
pub fn remove_participant(state: &mut BattleState, id: BattleId) -> Option<Combatant> {
    if let Some(removed) = state.roster.remove(id) {
        if matches!(state.negotiation, NegotiationPhase::InlineTie(_)) {
            recheck_roster(state);
        }
        return Some(removed);
    }

    let NegotiationPhase::Negotiating(mut negotiation) = mem::take(&mut state.negotiation) else {
        return None;
    };
    let removed = negotiation.remove(id);
    negotiation.tie = None;
    if negotiation.queue.is_empty() {
        advance(state, negotiation);
    } else {
        state.negotiation = NegotiationPhase::Negotiating(negotiation);
    }
    removed
}

/// Highest initiative shared by more than one combatant, with the tied ids
/// in their current order.
pub fn find_tie<'a>(combatants: impl IntoIterator<Item = &'a Combatant>) -> Option<PendingTie> {
    let mut groups: BTreeMap<i32, Vec<BattleId>> = BTreeMap::new();
    for combatant in combatants {
        if let Some(initiative) = combatant.initiative {
            groups.entry(initiative).or_default().push(combatant.battle_id);
        }
    }

    groups
        .into_iter()
        .rev()
        .find(|(_, ids)| ids.len() > 1)
        .map(|(contested, tied)| PendingTie { tied, contested })
}

/// Moves the negotiation one step: next queue head, next tie, or seat
/// everyone in turn order.
fn advance(state: &mut BattleState, mut negotiation: Negotiation) -> NegotiationStatus {
    if let Some(head) = negotiation.queue.front() {
        let status = NegotiationStatus::AwaitingInitiative {
            next: head.battle_id,
            name: head.name.clone(),
        };
        state.negotiation = NegotiationPhase::Negotiating(negotiation);
        return status;
    }

    if let Some(tie) = find_tie(&negotiation.committed) {
        let status = NegotiationStatus::tie(TieMode::Initial, &tie);
        negotiation.tie = Some(tie);
        state.negotiation = NegotiationPhase::Negotiating(negotiation);
        return status;
    }

    let Negotiation {
        mut committed,
        skipped,
        ..
    } = negotiation;
    committed.sort_by(|a, b| b.initiative.cmp(&a.initiative));
    committed.extend(skipped);

    state.roster = Roster::from_combatants(committed);
    state.negotiation = NegotiationPhase::Idle;
    sorted(state)
}

/// Re-runs tie detection over the seated roster.
fn recheck_roster(state: &mut BattleState) -> NegotiationStatus {
    match find_tie(&state.roster) {
        Some(tie) => {
            let status = NegotiationStatus::tie(TieMode::Inline, &tie);
            state.negotiation = NegotiationPhase::InlineTie(tie);
            status
        }
        None => {
            state.negotiation = NegotiationPhase::Idle;
            sorted(state)
        }
    }
}

fn sorted(state: &BattleState) -> NegotiationStatus {
    NegotiationStatus::Sorted {
        order: state
            .roster
            .turn_order()
            .into_iter()
            .map(|c| c.battle_id)
            .collect(),
    }
}

/// Takes the negotiation out of the state when it can accept initiatives.
fn take_open_negotiation(state: &mut BattleState) -> Result<Negotiation, EngineError> {
    if let NegotiationPhase::Negotiating(Negotiation { tie: Some(tie), .. }) = &state.negotiation {
        return Err(EngineError::TieUnresolved {
            contested: tie.contested,
        });
    }
    take_open_negotiation_any(state)
}

fn take_open_negotiation_any(state: &mut BattleState) -> Result<Negotiation, EngineError> {
    match mem::take(&mut state.negotiation) {
        NegotiationPhase::Negotiating(negotiation) => Ok(negotiation),
        other => {
            state.negotiation = other;
            Err(EngineError::NotNegotiating)
        }
    }
}
