//! Combat statistics carried by every combatant.
//!
//! Three groups of numbers are mutated by the engine:
//!
//! ```text
//! [ Stats ]         ac, dc, perception, saves, spell attack
//! [ Attack ]        per-category hit modifiers (three MAP slots)
//! [ DamageRoll ]    flat bonus embedded in `NdM+B type`
//! ```
//!
//! Everything here is plain data; the rules that change these values live in
//! [`crate::engine`].

pub mod attack;
pub mod damage_roll;

pub use attack::{Attack, AttackCategory, HitSlot};
pub use damage_roll::{DamageRoll, DamageRollError};

/// Direct stat addressed by condition effects and templates.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum StatId {
    Ac,
    Dc,
    Perception,
    Fortitude,
    Reflex,
    Will,
    #[strum(to_string = "spellAttack", serialize = "spellAttackMod")]
    #[cfg_attr(feature = "serde", serde(alias = "spellAttackMod"))]
    SpellAttack,
}

impl StatId {
    /// Stats every template (Weak/Elite) shifts by its flat amount.
    pub const ALL: [StatId; 7] = [
        StatId::Ac,
        StatId::Dc,
        StatId::Perception,
        StatId::Fortitude,
        StatId::Reflex,
        StatId::Will,
        StatId::SpellAttack,
    ];
}

/// Defensive and casting statistics.
///
/// A stat that the catalog does not define is `None`. Condition deltas treat
/// `None` as 0; templates leave it undefined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Stats {
    pub ac: Option<i32>,
    pub dc: Option<i32>,
    pub perception: Option<i32>,
    pub fortitude: Option<i32>,
    pub reflex: Option<i32>,
    pub will: Option<i32>,
    pub spell_attack: Option<i32>,
}

impl Stats {
    pub fn get(&self, stat: StatId) -> Option<i32> {
        match stat {
            StatId::Ac => self.ac,
            StatId::Dc => self.dc,
            StatId::Perception => self.perception,
            StatId::Fortitude => self.fortitude,
            StatId::Reflex => self.reflex,
            StatId::Will => self.will,
            StatId::SpellAttack => self.spell_attack,
        }
    }

    pub fn get_mut(&mut self, stat: StatId) -> &mut Option<i32> {
        match stat {
            StatId::Ac => &mut self.ac,
            StatId::Dc => &mut self.dc,
            StatId::Perception => &mut self.perception,
            StatId::Fortitude => &mut self.fortitude,
            StatId::Reflex => &mut self.reflex,
            StatId::Will => &mut self.will,
            StatId::SpellAttack => &mut self.spell_attack,
        }
    }

    /// Returns the stat value, reading an undefined stat as 0.
    pub fn value(&self, stat: StatId) -> i32 {
        self.get(stat).unwrap_or(0)
    }

    /// Builder-style setter used by tests and catalog tooling.
    #[must_use]
    pub fn with(mut self, stat: StatId, value: i32) -> Self {
        *self.get_mut(stat) = Some(value);
        self
    }
}
