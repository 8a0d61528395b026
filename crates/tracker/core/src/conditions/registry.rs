//! Static condition table.

use super::{ConditionDefinition, ConditionId, EffectTarget};
use crate::stats::{AttackCategory, HitSlot, StatId};

use AttackCategory::{Melee, Ranged, Spell};
use EffectTarget::{AttackDamage, AttackModifier, Stat};
use HitSlot::{First, Second, Third};

const OFF_GUARD: &[(EffectTarget, i32)] = &[(Stat(StatId::Ac), -2)];

// Status penalty to every check and DC.
const ALL_CHECKS_AND_DCS: &[(EffectTarget, i32)] = &[
    (Stat(StatId::Ac), -1),
    (Stat(StatId::Dc), -1),
    (Stat(StatId::Perception), -1),
    (Stat(StatId::Fortitude), -1),
    (Stat(StatId::Reflex), -1),
    (Stat(StatId::Will), -1),
    (AttackModifier(Melee, First), -1),
    (AttackModifier(Melee, Second), -1),
    (AttackModifier(Melee, Third), -1),
    (AttackModifier(Ranged, First), -1),
    (AttackModifier(Ranged, Second), -1),
    (AttackModifier(Ranged, Third), -1),
    (AttackModifier(Spell, First), -1),
    (AttackModifier(Spell, Second), -1),
    (AttackModifier(Spell, Third), -1),
];

const ENFEEBLED: &[(EffectTarget, i32)] = &[
    (AttackModifier(Melee, First), -1),
    (AttackModifier(Melee, Second), -1),
    (AttackModifier(Melee, Third), -1),
    (AttackDamage(Melee), -1),
];

const FATIGUED: &[(EffectTarget, i32)] = &[
    (Stat(StatId::Ac), -1),
    (Stat(StatId::Fortitude), -1),
    (Stat(StatId::Reflex), -1),
    (Stat(StatId::Will), -1),
];

const CLUMSY: &[(EffectTarget, i32)] = &[
    (Stat(StatId::Ac), -1),
    (Stat(StatId::Reflex), -1),
    (AttackModifier(Ranged, First), -1),
    (AttackModifier(Ranged, Second), -1),
    (AttackModifier(Ranged, Third), -1),
];

const STUPEFIED: &[(EffectTarget, i32)] = &[
    (Stat(StatId::Dc), -1),
    (Stat(StatId::Perception), -1),
    (Stat(StatId::Will), -1),
    (AttackModifier(Spell, First), -1),
    (AttackModifier(Spell, Second), -1),
    (AttackModifier(Spell, Third), -1),
];

// Status penalty to Fortitude; the max HP loss is sized by the modifier engine.
const DRAINED: &[(EffectTarget, i32)] = &[(Stat(StatId::Fortitude), -1)];

/// Every condition kind, in [`ConditionId`] declaration order.
pub static DEFINITIONS: [ConditionDefinition; 9] = [
    ConditionDefinition {
        id: ConditionId::OffGuard,
        name: "Off-Guard",
        max_stacks: 1,
        effects: OFF_GUARD,
    },
    ConditionDefinition {
        id: ConditionId::Frightened,
        name: "Frightened",
        max_stacks: 4,
        effects: ALL_CHECKS_AND_DCS,
    },
    ConditionDefinition {
        id: ConditionId::Enfeebled,
        name: "Enfeebled",
        max_stacks: 4,
        effects: ENFEEBLED,
    },
    ConditionDefinition {
        id: ConditionId::Fatigued,
        name: "Fatigued",
        max_stacks: 1,
        effects: FATIGUED,
    },
    ConditionDefinition {
        id: ConditionId::Sickened,
        name: "Sickened",
        max_stacks: 4,
        effects: ALL_CHECKS_AND_DCS,
    },
    ConditionDefinition {
        id: ConditionId::Clumsy,
        name: "Clumsy",
        max_stacks: 4,
        effects: CLUMSY,
    },
    ConditionDefinition {
        id: ConditionId::Stupefied,
        name: "Stupefied",
        max_stacks: 4,
        effects: STUPEFIED,
    },
    ConditionDefinition {
        id: ConditionId::Drained,
        name: "Drained",
        max_stacks: 4,
        effects: DRAINED,
    },
    ConditionDefinition {
        id: ConditionId::PersistentDamage,
        name: "Persistent Damage",
        max_stacks: 1,
        effects: &[],
    },
];

pub(super) fn definition(id: ConditionId) -> &'static ConditionDefinition {
    let index = match id {
        ConditionId::OffGuard => 0,
        ConditionId::Frightened => 1,
        ConditionId::Enfeebled => 2,
        ConditionId::Fatigued => 3,
        ConditionId::Sickened => 4,
        ConditionId::Clumsy => 5,
        ConditionId::Stupefied => 6,
        ConditionId::Drained => 7,
        ConditionId::PersistentDamage => 8,
    };
    &DEFINITIONS[index]
}
