//! Damage, healing and temporary HP.
//!
//! All three operations keep `0 <= hp <= max_hp` and `temp_hp >= 0`, and
//! re-derive conditional resistances afterwards.

use super::input::ensure_non_negative;
use super::EngineError;
use crate::state::Combatant;

/// Applies `amount` damage. Temp HP absorbs first; the rest comes off HP,
/// floored at 0.
pub fn apply_damage(combatant: &mut Combatant, amount: i32) -> Result<(), EngineError> {
    ensure_non_negative("damage", amount)?;
    take_damage(combatant, amount);
    Ok(())
}

/// Damage path shared with the persistent damage resolver; `amount` is
/// already known to be non-negative.
pub(crate) fn take_damage(combatant: &mut Combatant, amount: i32) {
    if combatant.temp_hp >= amount {
        combatant.temp_hp -= amount;
    } else {
        let spillover = amount - combatant.temp_hp;
        combatant.temp_hp = 0;
        combatant.hp = (combatant.hp - spillover).max(0);
    }
    combatant.recompute_resistances();
}

/// Heals up to max HP. Temp HP is untouched.
pub fn apply_heal(combatant: &mut Combatant, amount: i32) -> Result<(), EngineError> {
    ensure_non_negative("heal", amount)?;

    combatant.hp = combatant.hp.saturating_add(amount).min(combatant.max_hp);
    combatant.recompute_resistances();
    Ok(())
}

/// Replaces temp HP. Negative values clamp to 0; temp HP never stacks.
pub fn set_temp_hp(combatant: &mut Combatant, value: i32) {
    combatant.temp_hp = value.max(0);
}
