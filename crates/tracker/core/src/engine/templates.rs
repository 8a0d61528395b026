//! Weak and Elite stat templates.
//!
//! Applying a template snapshots every field it overwrites; removing it puts
//! the snapshot back verbatim and replays any condition stacks that changed
//! in between.

use super::EngineError;
use super::conditions::reconcile_stacks;
use crate::state::{AppliedTemplate, Combatant, Template};
use crate::stats::StatId;

/// Flat adjustment to every defined stat and attack hit modifier.
const STAT_ADJUSTMENT: i32 = 2;
/// Damage bonus adjustment for spell attacks.
const LIMITED_USE_DAMAGE_ADJUSTMENT: i32 = 4;
/// Damage bonus adjustment for every other attack.
const DAMAGE_ADJUSTMENT: i32 = 2;

/// Max HP gained (Elite) or lost (Weak), banded by the pre-template level.
pub fn hp_band(level: i32) -> i32 {
    match level {
        ..=2 => 10,
        3..=5 => 15,
        6..=20 => 20,
        _ => 30,
    }
}

/// Level change a template makes. Weak skips level 0 from 1; Elite skips it
/// from below.
pub fn level_shift(template: Template, level: i32) -> i32 {
    match template {
        Template::Weak if level == 1 => -2,
        Template::Weak => -1,
        Template::Elite if level <= 0 => 2,
        Template::Elite => 1,
    }
}

/// Applies `template`, first reversing the other template if it is active.
/// Re-applying the active template does nothing.
pub fn apply_template(combatant: &mut Combatant, template: Template) {
    match combatant.template.as_ref().map(|t| t.kind) {
        Some(active) if active == template => return,
        Some(_) => {
            remove_template(combatant);
        }
        None => {}
    }

    let original = combatant.template_snapshot();
    let sign = template.sign();
    let band = hp_band(combatant.level);

    combatant.level += level_shift(template, combatant.level);

    for stat in StatId::ALL {
        if let Some(value) = combatant.stats.get_mut(stat) {
            *value += sign * STAT_ADJUSTMENT;
        }
    }

    for attack in &mut combatant.attacks {
        for modifier in &mut attack.hit_modifiers {
            *modifier += sign * STAT_ADJUSTMENT;
        }
        let adjustment = if attack.category.is_limited_use() {
            LIMITED_USE_DAMAGE_ADJUSTMENT
        } else {
            DAMAGE_ADJUSTMENT
        };
        if let Some(damage) = attack.damage.as_mut() {
            match template {
                Template::Weak => damage.shift_bonus_floored(-adjustment),
                Template::Elite => damage.shift_bonus(adjustment),
            }
        }
    }

    match template {
        Template::Weak => {
            combatant.max_hp = (combatant.max_hp - band).max(0);
            combatant.hp = combatant.hp.min(combatant.max_hp);
        }
        Template::Elite => {
            combatant.max_hp += band;
            combatant.hp = (combatant.hp + band).min(combatant.max_hp);
        }
    }
    if let Some(drained_from) = combatant.original_max_hp.as_mut() {
        *drained_from = (*drained_from + sign * band).max(0);
    }

    combatant.template = Some(AppliedTemplate {
        kind: template,
        original,
    });
    combatant.recompute_resistances();
}

/// Restores the pre-template snapshot. Returns false when no template was
/// active.
pub fn remove_template(combatant: &mut Combatant) -> bool {
    let Some(applied) = combatant.template.take() else {
        return false;
    };
    let original = applied.original;

    combatant.level = original.level;
    combatant.stats = original.stats;
    combatant.hp = original.hp;
    combatant.max_hp = original.max_hp;
    combatant.original_max_hp = original.original_max_hp;
    combatant.attacks = original.attacks;

    reconcile_stacks(combatant, &original.stacks);
    combatant.recompute_resistances();
    true
}

/// Strict toggle: turns `template` on or off, refusing to replace the other
/// template.
pub fn toggle_template(combatant: &mut Combatant, template: Template) -> Result<(), EngineError> {
    match combatant.template.as_ref().map(|t| t.kind) {
        None => apply_template(combatant, template),
        Some(active) if active == template => {
            remove_template(combatant);
        }
        Some(active) => {
            return Err(EngineError::ConflictingTemplate {
                combatant: combatant.battle_id,
                active,
                requested: template,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::ConditionId;
    use crate::engine::ErrorKind;
    use crate::engine::conditions::{apply_condition, set_condition_stacks};
    use crate::state::{BattleId, CombatantKind};
    use crate::stats::{Attack, AttackCategory, Stats};

    fn ogre() -> Combatant {
        Combatant::new(BattleId(4), "Ogre Warrior", CombatantKind::Creature)
            .with_level(3)
            .with_max_hp(50)
            .with_stats(
                Stats::default()
                    .with(StatId::Ac, 17)
                    .with(StatId::Fortitude, 12)
                    .with(StatId::Will, 5),
            )
            .with_attack(
                Attack::new("ogre hook", AttackCategory::Melee)
                    .with_hit_modifiers([12, 7, 2])
                    .with_damage("1d10+7 piercing".parse().unwrap()),
            )
            .with_attack(
                Attack::new("stone curse", AttackCategory::Spell)
                    .with_hit_modifiers([9, 4, -1])
                    .with_damage("2d6+1 bludgeoning".parse().unwrap()),
            )
    }

    fn damage(combatant: &Combatant, index: usize) -> String {
        combatant.attacks[index]
            .damage
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    #[test]
    fn weak_lowers_everything() {
        let mut ogre = ogre();
        apply_template(&mut ogre, Template::Weak);

        assert!(ogre.is_weak());
        assert_eq!(ogre.level, 2);
        assert_eq!((ogre.max_hp, ogre.hp), (35, 35));
        assert_eq!(ogre.stats.ac, Some(15));
        assert_eq!(ogre.stats.dc, None);
        assert_eq!(ogre.attacks[0].hit_modifiers, [10, 5, 0]);
        assert_eq!(ogre.attacks[1].hit_modifiers, [7, 2, -3]);
        assert_eq!(damage(&ogre, 0), "1d10+5 piercing");
        assert_eq!(damage(&ogre, 1), "2d6 bludgeoning");
    }

    #[test]
    fn elite_raises_everything() {
        let mut ogre = ogre().with_hp(40);
        apply_template(&mut ogre, Template::Elite);

        assert!(ogre.is_elite());
        assert_eq!(ogre.level, 4);
        assert_eq!((ogre.max_hp, ogre.hp), (65, 55));
        assert_eq!(ogre.stats.will, Some(7));
        assert_eq!(damage(&ogre, 0), "1d10+9 piercing");
        assert_eq!(damage(&ogre, 1), "2d6+5 bludgeoning");
    }

    #[test]
    fn weak_on_then_off_restores_structurally_equal_combatant() {
        let before = ogre();
        let mut ogre = before.clone();

        apply_template(&mut ogre, Template::Weak);
        assert!(remove_template(&mut ogre));

        assert_eq!(ogre, before);
        assert!(!remove_template(&mut ogre));
    }

    #[test]
    fn switching_templates_reverses_the_active_one_first() {
        let mut switched = ogre();
        apply_template(&mut switched, Template::Elite);
        apply_template(&mut switched, Template::Weak);

        let mut direct = ogre();
        apply_template(&mut direct, Template::Weak);

        assert_eq!(switched, direct);
    }

    #[test]
    fn strict_toggle_rejects_the_other_template() {
        let mut ogre = ogre();
        toggle_template(&mut ogre, Template::Elite).unwrap();
        let before = ogre.clone();

        let err = toggle_template(&mut ogre, Template::Weak).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConflictingTemplate);
        assert_eq!(ogre, before);

        toggle_template(&mut ogre, Template::Elite).unwrap();
        assert!(ogre.template.is_none());
    }

    #[test]
    fn level_shift_skips_zero() {
        assert_eq!(level_shift(Template::Weak, 1), -2);
        assert_eq!(level_shift(Template::Weak, 5), -1);
        assert_eq!(level_shift(Template::Elite, -1), 2);
        assert_eq!(level_shift(Template::Elite, 0), 2);
        assert_eq!(level_shift(Template::Elite, 1), 1);
    }

    #[test]
    fn hp_bands_follow_level() {
        assert_eq!(hp_band(-1), 10);
        assert_eq!(hp_band(2), 10);
        assert_eq!(hp_band(3), 15);
        assert_eq!(hp_band(5), 15);
        assert_eq!(hp_band(6), 20);
        assert_eq!(hp_band(20), 20);
        assert_eq!(hp_band(21), 30);
    }

    #[test]
    fn conditions_gained_while_templated_survive_removal() {
        let mut ogre = ogre();
        apply_template(&mut ogre, Template::Weak);
        apply_condition(&mut ogre, ConditionId::Frightened, None).unwrap();
        assert_eq!(ogre.stats.ac, Some(14));

        remove_template(&mut ogre);
        assert_eq!(ogre.stats.ac, Some(16));
        assert_eq!(ogre.stacks(ConditionId::Frightened), 1);
    }

    #[test]
    fn conditions_lost_while_templated_stay_lost() {
        let mut ogre = ogre();
        apply_condition(&mut ogre, ConditionId::Frightened, None).unwrap();
        apply_template(&mut ogre, Template::Elite);
        set_condition_stacks(&mut ogre, ConditionId::Frightened, 0).unwrap();

        remove_template(&mut ogre);
        assert_eq!(ogre.stats.ac, Some(17));
        assert!(ogre.conditions.is_empty());
    }

    #[test]
    fn drained_original_moves_with_the_template() {
        let mut ogre = ogre();
        set_condition_stacks(&mut ogre, ConditionId::Drained, 1).unwrap();
        assert_eq!((ogre.max_hp, ogre.original_max_hp), (47, Some(50)));

        apply_template(&mut ogre, Template::Elite);
        assert_eq!((ogre.max_hp, ogre.original_max_hp), (62, Some(65)));

        remove_template(&mut ogre);
        assert_eq!((ogre.max_hp, ogre.original_max_hp), (47, Some(50)));
    }
}
