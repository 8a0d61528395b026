//! Applying and removing conditions on a combatant.
//!
//! Stacking conditions move one stack at a time through the modifier engine
//! so every stat change stays reversible. Persistent damage never touches
//! stats; it only collects damage instances for the resolver.

use std::collections::BTreeMap;

use super::EngineError;
use super::modifiers::{apply_stack, remove_stack};
use crate::conditions::{ConditionDefinition, ConditionId};
use crate::state::{Combatant, ConditionInstance, PersistentDamage};

/// Adds one stack of `condition`, or one damage instance for persistent damage.
///
/// A stacking condition already at its ceiling is left as is.
pub fn apply_condition(
    combatant: &mut Combatant,
    condition: ConditionId,
    instance: Option<PersistentDamage>,
) -> Result<(), EngineError> {
    let definition = condition.definition();

    if definition.is_persistent() {
        let instance = instance.ok_or_else(|| {
            EngineError::invalid_input("persistent damage", "damage type and value are required")
        })?;
        if instance.damage_value <= 0 {
            return Err(EngineError::invalid_input(
                "persistent damage",
                format!("value {} must be positive", instance.damage_value),
            ));
        }
        if instance.damage_type.trim().is_empty() {
            return Err(EngineError::invalid_input(
                "persistent damage",
                "damage type must not be empty",
            ));
        }

        match combatant.conditions.get_mut(&condition) {
            Some(ConditionInstance::Persistent { instances }) => instances.push(instance),
            _ => {
                combatant.conditions.insert(
                    condition,
                    ConditionInstance::Persistent {
                        instances: vec![instance],
                    },
                );
            }
        }
        return Ok(());
    }

    let current = combatant.stacks(condition);
    if current >= definition.max_stacks {
        return Ok(());
    }
    step_to(combatant, definition, current + 1);
    Ok(())
}

/// Removes one stack of a stacking condition.
///
/// For persistent damage, `index` picks the instance to drop; without it
/// every instance goes.
pub fn remove_condition(
    combatant: &mut Combatant,
    condition: ConditionId,
    index: Option<usize>,
) -> Result<(), EngineError> {
    let not_found = EngineError::ConditionNotFound {
        combatant: combatant.battle_id,
        condition,
    };

    match combatant.conditions.get_mut(&condition) {
        None => Err(not_found),
        Some(ConditionInstance::Persistent { instances }) => {
            match index {
                Some(index) if index < instances.len() => {
                    instances.remove(index);
                }
                Some(index) => {
                    return Err(EngineError::PersistentInstanceNotFound {
                        combatant: combatant.battle_id,
                        index,
                    });
                }
                None => instances.clear(),
            }
            if instances.is_empty() {
                combatant.conditions.remove(&condition);
            }
            Ok(())
        }
        Some(ConditionInstance::Stacked { stacks }) => {
            let target = stacks.saturating_sub(1);
            step_to(combatant, condition.definition(), target);
            Ok(())
        }
    }
}

/// Moves a stacking condition to exactly `stacks` (0 removes it).
pub fn set_condition_stacks(
    combatant: &mut Combatant,
    condition: ConditionId,
    stacks: u8,
) -> Result<(), EngineError> {
    let definition = condition.definition();
    if definition.is_persistent() {
        return Err(EngineError::invalid_input(
            "stacks",
            format!("{} does not stack", definition.name),
        ));
    }
    if stacks > definition.max_stacks {
        return Err(EngineError::invalid_input(
            "stacks",
            format!(
                "{} allows at most {} stacks, got {stacks}",
                definition.name, definition.max_stacks
            ),
        ));
    }

    step_to(combatant, definition, stacks);
    Ok(())
}

/// Removes a condition entirely: every stack, or every persistent instance.
pub fn clear_condition(
    combatant: &mut Combatant,
    condition: ConditionId,
) -> Result<(), EngineError> {
    if !combatant.conditions.contains_key(&condition) {
        return Err(EngineError::ConditionNotFound {
            combatant: combatant.battle_id,
            condition,
        });
    }

    let definition = condition.definition();
    if definition.is_persistent() {
        combatant.conditions.remove(&condition);
    } else {
        step_to(combatant, definition, 0);
    }
    Ok(())
}

/// Re-applies stacking conditions after stats were restored to a state that
/// reflected `baseline`. Counters are rewound to `baseline` first, then each
/// condition is stepped to its current count.
pub(crate) fn reconcile_stacks(combatant: &mut Combatant, baseline: &BTreeMap<ConditionId, u8>) {
    let current = combatant.stack_counts();

    for id in current.keys() {
        set_counter(combatant, *id, 0);
    }
    for (id, stacks) in baseline {
        set_counter(combatant, *id, *stacks);
    }

    let ids: Vec<ConditionId> = current.keys().chain(baseline.keys()).copied().collect();
    for id in ids {
        let target = current.get(&id).copied().unwrap_or(0);
        step_to(combatant, id.definition(), target);
    }
}

/// Walks the stack counter of `definition` to `target`, applying or reversing
/// one stack per step.
fn step_to(combatant: &mut Combatant, definition: &ConditionDefinition, target: u8) {
    let mut current = combatant.stacks(definition.id);

    while current < target {
        current += 1;
        set_counter(combatant, definition.id, current);
        apply_stack(combatant, definition);
    }
    while current > target {
        current -= 1;
        set_counter(combatant, definition.id, current);
        remove_stack(combatant, definition);
    }

    combatant.recompute_resistances();
}

fn set_counter(combatant: &mut Combatant, id: ConditionId, stacks: u8) {
    if stacks == 0 {
        combatant.conditions.remove(&id);
    } else {
        combatant
            .conditions
            .insert(id, ConditionInstance::Stacked { stacks });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ErrorKind;
    use crate::state::{BattleId, CombatantKind};
    use crate::stats::{StatId, Stats};

    fn goblin() -> Combatant {
        Combatant::new(BattleId(3), "Goblin Warrior", CombatantKind::Creature)
            .with_level(2)
            .with_max_hp(30)
            .with_stats(
                Stats::default()
                    .with(StatId::Ac, 16)
                    .with(StatId::Fortitude, 6)
                    .with(StatId::Reflex, 10)
                    .with(StatId::Will, 5),
            )
    }

    #[test]
    fn stacking_respects_max_stacks() {
        let mut goblin = goblin();
        apply_condition(&mut goblin, ConditionId::OffGuard, None).unwrap();
        apply_condition(&mut goblin, ConditionId::OffGuard, None).unwrap();

        assert_eq!(goblin.stacks(ConditionId::OffGuard), 1);
        assert_eq!(goblin.stats.ac, Some(14));
    }

    #[test]
    fn remove_condition_drops_one_stack() {
        let mut goblin = goblin();
        apply_condition(&mut goblin, ConditionId::Frightened, None).unwrap();
        apply_condition(&mut goblin, ConditionId::Frightened, None).unwrap();
        assert_eq!(goblin.stats.will, Some(3));

        remove_condition(&mut goblin, ConditionId::Frightened, None).unwrap();
        assert_eq!(goblin.stacks(ConditionId::Frightened), 1);
        assert_eq!(goblin.stats.will, Some(4));

        remove_condition(&mut goblin, ConditionId::Frightened, None).unwrap();
        assert!(goblin.conditions.is_empty());
        assert_eq!(goblin.stats.will, Some(5));
    }

    #[test]
    fn removing_absent_condition_is_not_found() {
        let mut goblin = goblin();
        let err = remove_condition(&mut goblin, ConditionId::Sickened, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn persistent_damage_collects_parallel_instances() {
        let mut goblin = goblin();
        apply_condition(
            &mut goblin,
            ConditionId::PersistentDamage,
            Some(PersistentDamage::new("fire", 2)),
        )
        .unwrap();
        apply_condition(
            &mut goblin,
            ConditionId::PersistentDamage,
            Some(PersistentDamage::new("bleed", 3)),
        )
        .unwrap();

        assert_eq!(
            goblin.persistent_damage(),
            &[
                PersistentDamage::new("fire", 2),
                PersistentDamage::new("bleed", 3)
            ]
        );

        remove_condition(&mut goblin, ConditionId::PersistentDamage, Some(0)).unwrap();
        assert_eq!(goblin.persistent_damage(), &[PersistentDamage::new("bleed", 3)]);

        let err = remove_condition(&mut goblin, ConditionId::PersistentDamage, Some(4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        remove_condition(&mut goblin, ConditionId::PersistentDamage, None).unwrap();
        assert!(!goblin.conditions.contains_key(&ConditionId::PersistentDamage));
    }

    #[test]
    fn persistent_damage_requires_positive_instance() {
        let mut goblin = goblin();
        for instance in [None, Some(PersistentDamage::new("fire", 0))] {
            let err =
                apply_condition(&mut goblin, ConditionId::PersistentDamage, instance).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert!(goblin.conditions.is_empty());
    }

    #[test]
    fn set_condition_stacks_walks_both_directions() {
        let mut goblin = goblin();
        set_condition_stacks(&mut goblin, ConditionId::Clumsy, 3).unwrap();
        assert_eq!(goblin.stats.reflex, Some(7));

        set_condition_stacks(&mut goblin, ConditionId::Clumsy, 1).unwrap();
        assert_eq!(goblin.stats.reflex, Some(9));

        set_condition_stacks(&mut goblin, ConditionId::Clumsy, 0).unwrap();
        assert_eq!(goblin, self::goblin());
    }

    #[test]
    fn set_condition_stacks_rejects_out_of_range() {
        let mut goblin = goblin();
        assert!(set_condition_stacks(&mut goblin, ConditionId::Fatigued, 2).is_err());
        assert!(set_condition_stacks(&mut goblin, ConditionId::PersistentDamage, 1).is_err());
    }

    #[test]
    fn clear_condition_removes_every_stack() {
        let mut goblin = goblin();
        set_condition_stacks(&mut goblin, ConditionId::Drained, 3).unwrap();
        assert_eq!(goblin.max_hp, 24);

        clear_condition(&mut goblin, ConditionId::Drained).unwrap();
        assert_eq!(goblin.max_hp, 30);
        assert_eq!(goblin.hp, 30);
        assert_eq!(goblin.original_max_hp, None);
    }

    #[test]
    fn reconcile_reapplies_stacks_gained_since_baseline() {
        let mut goblin = goblin();
        apply_condition(&mut goblin, ConditionId::Frightened, None).unwrap();
        let baseline = goblin.stack_counts();
        let restored_stats = goblin.stats;

        apply_condition(&mut goblin, ConditionId::Frightened, None).unwrap();
        apply_condition(&mut goblin, ConditionId::OffGuard, None).unwrap();

        goblin.stats = restored_stats;
        reconcile_stacks(&mut goblin, &baseline);

        assert_eq!(goblin.stacks(ConditionId::Frightened), 2);
        assert_eq!(goblin.stacks(ConditionId::OffGuard), 1);
        assert_eq!(goblin.stats.ac, Some(12));
        assert_eq!(goblin.stats.will, Some(3));
    }
}
