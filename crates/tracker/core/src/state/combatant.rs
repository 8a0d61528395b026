//! The mutable battle participant.
//!
//! A [`Combatant`] is a battle-scoped copy of a catalog creature or player.
//! The engine mutates it in place; every public field is plain data so a
//! roster can be snapshotted and restored verbatim.

use std::collections::BTreeMap;

use super::{BattleId, CombatantKind};
use crate::conditions::ConditionId;
use crate::stats::{Attack, Stats};

/// Flat damage reduction (resistance) or increase (weakness) for a damage type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Resistance {
    pub damage_type: String,
    pub value: i32,
}

impl Resistance {
    pub fn new(damage_type: impl Into<String>, value: i32) -> Self {
        Self {
            damage_type: damage_type.into(),
            value,
        }
    }
}

/// HP-percentage gate of a conditional resistance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HpThreshold {
    /// Active while current HP is strictly below the percentage of max HP.
    Below(u32),
    /// Active while current HP is at or above the percentage of max HP.
    AtOrAbove(u32),
}

impl HpThreshold {
    pub const fn holds(self, hp_percent: u32) -> bool {
        match self {
            Self::Below(percent) => hp_percent < percent,
            Self::AtOrAbove(percent) => hp_percent >= percent,
        }
    }
}

/// Resistance that only applies inside an HP band (e.g. "resist 5 fire while
/// below half HP").
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalResistance {
    pub resistance: Resistance,
    pub threshold: HpThreshold,
}

/// Non-attack action listed on a stat block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CreatureAction {
    pub name: String,
    /// Action cost as printed ("1", "2", "reaction", "free").
    pub cost: Option<String>,
    pub description: Option<String>,
}

/// One recurring damage instance inside the Persistent Damage condition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PersistentDamage {
    pub damage_type: String,
    pub damage_value: i32,
}

impl PersistentDamage {
    pub fn new(damage_type: impl Into<String>, damage_value: i32) -> Self {
        Self {
            damage_type: damage_type.into(),
            damage_value,
        }
    }
}

/// State of one active condition on a combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionInstance {
    /// Stacking condition, `1..=max_stacks`.
    Stacked { stacks: u8 },
    /// Persistent damage: one slot, any number of parallel instances.
    Persistent { instances: Vec<PersistentDamage> },
}

impl ConditionInstance {
    pub fn stacks(&self) -> u8 {
        match self {
            Self::Stacked { stacks } => *stacks,
            Self::Persistent { .. } => 1,
        }
    }
}

/// Weak/Elite stat template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Template {
    Weak,
    Elite,
}

impl Template {
    /// Sign of every template adjustment.
    pub const fn sign(self) -> i32 {
        match self {
            Self::Weak => -1,
            Self::Elite => 1,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::Weak => Self::Elite,
            Self::Elite => Self::Weak,
        }
    }
}

/// Fields a template overwrites, captured right before it was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TemplateSnapshot {
    pub level: i32,
    pub stats: Stats,
    pub hp: i32,
    pub max_hp: i32,
    pub original_max_hp: Option<i32>,
    pub attacks: Vec<Attack>,
    /// Stacking conditions active when the template was applied.
    pub stacks: BTreeMap<ConditionId, u8>,
}

/// Active template together with the snapshot it restores.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedTemplate {
    pub kind: Template,
    pub original: TemplateSnapshot,
}

/// Battle-scoped participant.
///
/// Invariants maintained by the engine:
/// - `0 <= hp <= max_hp` and `temp_hp >= 0`
/// - at most one template is active; its snapshot exists exactly while it is
/// - `resistances` is derived from `base_resistances` and
///   `conditional_resistances` after every HP change
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Combatant {
    pub battle_id: BattleId,
    pub source_id: String,
    pub name: String,
    pub kind: CombatantKind,
    pub initiative: Option<i32>,
    pub hp: i32,
    pub max_hp: i32,
    pub temp_hp: i32,
    /// Max HP before Drained reduced it.
    pub original_max_hp: Option<i32>,
    pub level: i32,
    pub stats: Stats,
    pub attacks: Vec<Attack>,
    pub actions: Vec<CreatureAction>,
    pub base_resistances: Vec<Resistance>,
    pub conditional_resistances: Vec<ConditionalResistance>,
    pub resistances: Vec<Resistance>,
    pub immunities: Vec<String>,
    pub weaknesses: Vec<Resistance>,
    pub conditions: BTreeMap<ConditionId, ConditionInstance>,
    pub template: Option<AppliedTemplate>,
}

impl Combatant {
    /// Creates a bare combatant at full (zero) health. Catalog entries go
    /// through [`crate::env::CombatantTemplate::spawn`] instead.
    pub fn new(battle_id: BattleId, name: impl Into<String>, kind: CombatantKind) -> Self {
        let name = name.into();
        Self {
            battle_id,
            source_id: name.clone(),
            name,
            kind,
            initiative: None,
            hp: 0,
            max_hp: 0,
            temp_hp: 0,
            original_max_hp: None,
            level: 0,
            stats: Stats::default(),
            attacks: Vec::new(),
            actions: Vec::new(),
            base_resistances: Vec::new(),
            conditional_resistances: Vec::new(),
            resistances: Vec::new(),
            immunities: Vec::new(),
            weaknesses: Vec::new(),
            conditions: BTreeMap::new(),
            template: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    /// Sets max HP and fills current HP to it.
    #[must_use]
    pub fn with_max_hp(mut self, max_hp: i32) -> Self {
        self.max_hp = max_hp.max(0);
        self.hp = self.max_hp;
        self.recompute_resistances();
        self
    }

    #[must_use]
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp.clamp(0, self.max_hp);
        self.recompute_resistances();
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_attack(mut self, attack: Attack) -> Self {
        self.attacks.push(attack);
        self
    }

    #[must_use]
    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = Some(initiative);
        self
    }

    pub fn is_creature(&self) -> bool {
        self.kind == CombatantKind::Creature
    }

    /// Creatures at 0 HP lose their turns; players never do.
    pub fn is_incapacitated(&self) -> bool {
        self.is_creature() && self.hp <= 0
    }

    pub fn is_weak(&self) -> bool {
        matches!(&self.template, Some(t) if t.kind == Template::Weak)
    }

    pub fn is_elite(&self) -> bool {
        matches!(&self.template, Some(t) if t.kind == Template::Elite)
    }

    /// Current stack count of a condition (0 when absent).
    pub fn stacks(&self, condition: ConditionId) -> u8 {
        self.conditions
            .get(&condition)
            .map(ConditionInstance::stacks)
            .unwrap_or(0)
    }

    /// Active persistent damage instances, in application order.
    pub fn persistent_damage(&self) -> &[PersistentDamage] {
        match self.conditions.get(&ConditionId::PersistentDamage) {
            Some(ConditionInstance::Persistent { instances }) => instances,
            _ => &[],
        }
    }

    /// Stacking conditions and their stack counts.
    pub fn stack_counts(&self) -> BTreeMap<ConditionId, u8> {
        self.conditions
            .iter()
            .filter_map(|(id, instance)| match instance {
                ConditionInstance::Stacked { stacks } => Some((*id, *stacks)),
                ConditionInstance::Persistent { .. } => None,
            })
            .collect()
    }

    /// Current HP as a whole percentage of max HP (0 when max HP is 0).
    pub fn hp_percent(&self) -> u32 {
        if self.max_hp <= 0 {
            return 0;
        }
        (self.hp.max(0) as i64 * 100 / self.max_hp as i64) as u32
    }

    /// Re-derives `resistances` from the static list plus every conditional
    /// resistance whose HP gate currently holds. The larger value wins when
    /// two entries share a damage type.
    pub fn recompute_resistances(&mut self) {
        let hp_percent = self.hp_percent();
        let mut derived = self.base_resistances.clone();

        for conditional in &self.conditional_resistances {
            if !conditional.threshold.holds(hp_percent) {
                continue;
            }
            let candidate = &conditional.resistance;
            match derived
                .iter_mut()
                .find(|r| r.damage_type == candidate.damage_type)
            {
                Some(existing) => existing.value = existing.value.max(candidate.value),
                None => derived.push(candidate.clone()),
            }
        }

        self.resistances = derived;
    }

    /// Copies the fields a template overwrites.
    pub fn template_snapshot(&self) -> TemplateSnapshot {
        TemplateSnapshot {
            level: self.level,
            stats: self.stats,
            hp: self.hp,
            max_hp: self.max_hp,
            original_max_hp: self.original_max_hp,
            attacks: self.attacks.clone(),
            stacks: self.stack_counts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn troll() -> Combatant {
        let mut troll = Combatant::new(BattleId(1), "Troll", CombatantKind::Creature);
        troll.base_resistances.push(Resistance::new("cold", 2));
        troll.conditional_resistances.push(ConditionalResistance {
            resistance: Resistance::new("fire", 5),
            threshold: HpThreshold::Below(50),
        });
        troll.conditional_resistances.push(ConditionalResistance {
            resistance: Resistance::new("cold", 10),
            threshold: HpThreshold::Below(25),
        });
        troll.with_max_hp(100)
    }

    #[test]
    fn conditional_resistances_follow_hp_band() {
        let mut troll = troll();
        assert_eq!(troll.resistances, vec![Resistance::new("cold", 2)]);

        troll.hp = 49;
        troll.recompute_resistances();
        assert_eq!(
            troll.resistances,
            vec![Resistance::new("cold", 2), Resistance::new("fire", 5)]
        );

        troll.hp = 10;
        troll.recompute_resistances();
        assert_eq!(
            troll.resistances,
            vec![Resistance::new("cold", 10), Resistance::new("fire", 5)]
        );
    }

    #[test]
    fn only_creatures_at_zero_hp_are_incapacitated() {
        let creature = Combatant::new(BattleId(1), "Goblin", CombatantKind::Creature);
        let player = Combatant::new(BattleId(2), "Valeros", CombatantKind::Player);
        assert!(creature.is_incapacitated());
        assert!(!player.is_incapacitated());
    }

    #[test]
    fn hp_percent_handles_zero_max() {
        let empty = Combatant::new(BattleId(1), "Husk", CombatantKind::Creature);
        assert_eq!(empty.hp_percent(), 0);
        assert_eq!(troll().with_hp(33).hp_percent(), 33);
    }
}
