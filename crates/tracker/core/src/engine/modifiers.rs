//! Stat modifier engine: applies or reverses one stack of a condition.
//!
//! Every delta is clamped at 0 on both apply and remove, so a round trip is
//! exact unless the floor was hit on the way down. That asymmetry is
//! accepted: a stat at 1 hit by -2 twice stays at 0 and comes back as 4.
//!
//! Both entry points expect the condition's stack counter to be updated
//! already; Drained reads it to size the max HP reduction.

use crate::conditions::{ConditionDefinition, EffectTarget};
use crate::state::Combatant;

/// Adds one stack worth of `definition`'s effects.
pub fn apply_stack(combatant: &mut Combatant, definition: &ConditionDefinition) {
    apply_effects(combatant, definition.effects, 1);
    if definition.is_drained() {
        recompute_drained(combatant);
    }
}

/// Reverses one stack worth of `definition`'s effects.
pub fn remove_stack(combatant: &mut Combatant, definition: &ConditionDefinition) {
    apply_effects(combatant, definition.effects, -1);
    if definition.is_drained() {
        recompute_drained(combatant);
    }
}

fn apply_effects(combatant: &mut Combatant, effects: &[(EffectTarget, i32)], sign: i32) {
    for &(target, delta) in effects {
        let delta = delta * sign;
        match target {
            EffectTarget::Stat(stat) => {
                let slot = combatant.stats.get_mut(stat);
                *slot = Some((slot.unwrap_or(0) + delta).max(0));
            }
            EffectTarget::AttackModifier(category, hit_slot) => {
                for attack in combatant
                    .attacks
                    .iter_mut()
                    .filter(|a| a.category.matches(category))
                {
                    let modifier = attack.hit_modifier_mut(hit_slot);
                    *modifier = (*modifier + delta).max(0);
                }
            }
            EffectTarget::AttackDamage(category) => {
                for attack in combatant
                    .attacks
                    .iter_mut()
                    .filter(|a| a.category.matches(category))
                {
                    if let Some(damage) = attack.damage.as_mut() {
                        damage.shift_bonus_floored(delta);
                    }
                }
            }
        }
    }
}

/// Max HP lost per Drained stack: the level, but at least 1 so creatures of
/// level 0 or below still lose HP.
fn drained_band(level: i32) -> i32 {
    level.max(1)
}

/// Sets max HP to `original - stacks × max(level, 1)` and moves current HP by the
/// same amount max HP moved. Restores and forgets the original when the last
/// stack is gone.
fn recompute_drained(combatant: &mut Combatant) {
    let stacks = i32::from(combatant.stacks(crate::conditions::ConditionId::Drained));
    let original = *combatant.original_max_hp.get_or_insert(combatant.max_hp);

    let new_max = (original - stacks * drained_band(combatant.level)).max(0);
    let dropped = combatant.max_hp - new_max;

    combatant.max_hp = new_max;
    combatant.hp = (combatant.hp - dropped).clamp(0, new_max);

    if stacks == 0 {
        combatant.original_max_hp = None;
    }
}
