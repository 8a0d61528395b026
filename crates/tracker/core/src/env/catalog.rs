//! Catalog template definitions.
//!
//! `CombatantTemplate` mirrors a stat block as stored in the bestiary or on a
//! character sheet. Templates can be deserialized from RON files and spawned
//! into battle-scoped [`Combatant`]s.

use crate::state::{
    BattleId, Combatant, CombatantKind, ConditionalResistance, CreatureAction, Resistance,
};
use crate::stats::{Attack, Stats};

/// Catalog entry for a creature or player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CombatantTemplate {
    pub id: String,
    pub name: String,
    pub kind: CombatantKind,
    pub level: i32,
    pub max_hp: i32,
    pub stats: Stats,
    pub attacks: Vec<Attack>,
    pub actions: Vec<CreatureAction>,
    pub resistances: Vec<Resistance>,
    pub conditional_resistances: Vec<ConditionalResistance>,
    pub immunities: Vec<String>,
    pub weaknesses: Vec<Resistance>,
}

impl CombatantTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: CombatantKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Creates a battle-scoped combatant from this template.
    ///
    /// The combatant starts at full HP without initiative, temp HP,
    /// conditions or template.
    pub fn spawn(&self, battle_id: BattleId) -> Combatant {
        let mut combatant = Combatant::new(battle_id, self.name.clone(), self.kind)
            .with_level(self.level)
            .with_stats(self.stats);
        combatant.source_id = self.id.clone();
        combatant.attacks = self.attacks.clone();
        combatant.actions = self.actions.clone();
        combatant.base_resistances = self.resistances.clone();
        combatant.conditional_resistances = self.conditional_resistances.clone();
        combatant.immunities = self.immunities.clone();
        combatant.weaknesses = self.weaknesses.clone();
        combatant.with_max_hp(self.max_hp)
    }
}
