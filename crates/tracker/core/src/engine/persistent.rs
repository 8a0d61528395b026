//! Persistent damage resolution.
//!
//! One trigger sums every instance and deals the total as ordinary damage.
//! If the target survives, only the first instance is put up for a
//! "did it end?" decision; the others wait for later triggers.

use super::EngineError;
use super::conditions::remove_condition;
use super::health::take_damage;
use super::hook::TurnBoundaryHook;
use crate::conditions::ConditionId;
use crate::state::{Combatant, PersistentDamagePrompt};

/// Deals persistent damage to `combatant` and returns the follow-up prompt,
/// if any.
///
/// Damage that drops the target to 0 HP burns out every instance at once.
pub fn resolve_persistent_damage(combatant: &mut Combatant) -> Option<PersistentDamagePrompt> {
    let total: i32 = combatant
        .persistent_damage()
        .iter()
        .map(|instance| instance.damage_value)
        .sum();
    if total <= 0 {
        return None;
    }

    take_damage(combatant, total);

    if combatant.hp == 0 {
        combatant.conditions.remove(&ConditionId::PersistentDamage);
        return None;
    }

    let first = combatant.persistent_damage().first()?.clone();
    Some(PersistentDamagePrompt {
        target: combatant.battle_id,
        index: 0,
        instance: first,
    })
}

/// Applies the answer to a prompt. `ended == true` removes the prompted
/// instance; `false` keeps it.
///
/// The instance is located by index first and by value if the list shifted.
/// An instance that is already gone counts as ended.
pub fn answer_prompt(
    combatant: &mut Combatant,
    prompt: &PersistentDamagePrompt,
    ended: bool,
) -> Result<(), EngineError> {
    if !ended {
        return Ok(());
    }

    let instances = combatant.persistent_damage();
    let index = if instances.get(prompt.index) == Some(&prompt.instance) {
        Some(prompt.index)
    } else {
        instances.iter().position(|i| *i == prompt.instance)
    };

    match index {
        Some(index) => remove_condition(combatant, ConditionId::PersistentDamage, Some(index)),
        None => Ok(()),
    }
}

/// [`TurnBoundaryHook`] that runs [`resolve_persistent_damage`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PersistentDamageResolver;

impl TurnBoundaryHook for PersistentDamageResolver {
    fn should_trigger(&self, combatant: &Combatant) -> bool {
        !combatant.persistent_damage().is_empty()
    }

    fn apply(&self, combatant: &mut Combatant) -> Option<PersistentDamagePrompt> {
        resolve_persistent_damage(combatant)
    }
}
