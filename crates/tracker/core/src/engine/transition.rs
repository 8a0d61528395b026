//! Event dispatch.

use crate::config::TrackerConfig;
use crate::event::{BattleEvent, EventOutcome};
use crate::state::{BattleId, BattleState, Combatant};

use super::hook::TurnBoundaryHook;
use super::{EngineError, conditions, health, initiative, persistent, templates, turns};

/// Validates and applies one event to `state` in place.
///
/// This is the internal implementation used by `BattleEngine::execute()`.
/// On error `state` may be partially modified; callers run it on a copy.
pub(super) fn execute_event(
    event: BattleEvent,
    state: &mut BattleState,
    config: &TrackerConfig,
    hook: &dyn TurnBoundaryHook,
) -> Result<EventOutcome, EngineError> {
    let mut outcome = EventOutcome::default();

    match event {
        BattleEvent::AddCombatant(template) => {
            if template.name.trim().is_empty() {
                return Err(EngineError::invalid_input("name", "must not be empty"));
            }
            if state.combatant_count() >= config.max_roster_size {
                return Err(EngineError::RosterFull {
                    max: config.max_roster_size,
                });
            }

            let id = state.allocate_id();
            let combatant = template.spawn(id);
            if let Err(combatant) = initiative::enqueue(state, combatant) {
                state.roster.push(combatant);
            }
            outcome.added = Some(id);
        }
        BattleEvent::RemoveCombatant(id) => {
            initiative::remove_participant(state, id).ok_or(EngineError::CombatantNotFound(id))?;
            if state.pending_prompt.as_ref().is_some_and(|p| p.target == id) {
                state.pending_prompt = None;
            }
            outcome.negotiation = Some(initiative::status(state));
        }

        BattleEvent::StartBattle => {
            outcome.negotiation = Some(initiative::start_battle(state)?);
        }
        BattleEvent::ConfirmInitiative(value) => {
            outcome.negotiation = Some(initiative::confirm_initiative(state, value)?);
        }
        BattleEvent::SkipInitiative => {
            outcome.negotiation = Some(initiative::skip_initiative(state)?);
        }
        BattleEvent::ResolveTie(chosen) => {
            let (status, reissued) = initiative::resolve_tie_reissuing(state, chosen)?;
            outcome.negotiation = Some(status);
            outcome.reissued = reissued;
        }
        BattleEvent::SetInitiative { target, value } => {
            outcome.negotiation = Some(initiative::set_initiative(state, target, value)?);
        }

        BattleEvent::FinishTurn => {
            outcome.turn = Some(turns::finish_turn(
                state,
                hook,
                config.persistent_damage_timing,
            )?);
        }

        BattleEvent::ApplyCondition {
            target,
            condition,
            instance,
        } => conditions::apply_condition(combatant_mut(state, target)?, condition, instance)?,
        BattleEvent::RemoveCondition {
            target,
            condition,
            instance,
        } => conditions::remove_condition(combatant_mut(state, target)?, condition, instance)?,
        BattleEvent::SetConditionStacks {
            target,
            condition,
            stacks,
        } => conditions::set_condition_stacks(combatant_mut(state, target)?, condition, stacks)?,
        BattleEvent::ClearCondition { target, condition } => {
            conditions::clear_condition(combatant_mut(state, target)?, condition)?
        }

        BattleEvent::ApplyTemplate { target, template } => {
            templates::apply_template(combatant_mut(state, target)?, template);
        }
        BattleEvent::RemoveTemplate { target } => {
            templates::remove_template(combatant_mut(state, target)?);
        }
        BattleEvent::ToggleTemplate { target, template } => {
            templates::toggle_template(combatant_mut(state, target)?, template)?
        }

        BattleEvent::ApplyDamage { target, amount } => {
            health::apply_damage(combatant_mut(state, target)?, amount)?
        }
        BattleEvent::ApplyHeal { target, amount } => {
            health::apply_heal(combatant_mut(state, target)?, amount)?
        }
        BattleEvent::SetTempHp { target, value } => {
            health::set_temp_hp(combatant_mut(state, target)?, value);
        }

        BattleEvent::ResolvePersistentDamage { ended } => {
            let prompt = state
                .pending_prompt
                .take()
                .ok_or(EngineError::NoPendingPrompt)?;
            let combatant = combatant_mut(state, prompt.target)?;
            persistent::answer_prompt(combatant, &prompt, ended)?;
        }

        BattleEvent::EndBattle => state.end_battle(),
    }

    outcome.prompt = state.pending_prompt.clone();
    Ok(outcome)
}

fn combatant_mut(state: &mut BattleState, id: BattleId) -> Result<&mut Combatant, EngineError> {
    state
        .combatant_mut(id)
        .ok_or(EngineError::CombatantNotFound(id))
}
