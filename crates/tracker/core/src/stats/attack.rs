//! Attack entries and the categories conditions address them by.

use super::DamageRoll;

/// Attack category as listed in the catalog.
///
/// Condition keys only know the `melee`, `ranged` and `spell` prefixes; the
/// `spell` prefix covers both spell categories.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum AttackCategory {
    Melee,
    Ranged,
    Spell,
    RegularSpell,
}

impl AttackCategory {
    /// Spell attacks are limited-use: templates shift their damage twice as hard.
    pub const fn is_limited_use(self) -> bool {
        matches!(self, Self::Spell | Self::RegularSpell)
    }

    /// Returns true if an effect keyed on `key` applies to attacks of this category.
    pub const fn matches(self, key: AttackCategory) -> bool {
        match key {
            Self::Spell | Self::RegularSpell => self.is_limited_use(),
            Self::Melee => matches!(self, Self::Melee),
            Self::Ranged => matches!(self, Self::Ranged),
        }
    }
}

/// Multiple-attack-penalty slot of a hit modifier.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitSlot {
    First,
    Second,
    Third,
}

impl HitSlot {
    pub const ALL: [HitSlot; 3] = [HitSlot::First, HitSlot::Second, HitSlot::Third];

    const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }
}

/// One attack line of a combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Attack {
    pub name: String,
    pub category: AttackCategory,
    /// Hit modifiers for the first, second and third attack of a turn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hit_modifiers: [i32; 3],
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<DamageRoll>,
}

impl Attack {
    pub fn new(name: impl Into<String>, category: AttackCategory) -> Self {
        Self {
            name: name.into(),
            category,
            hit_modifiers: [0; 3],
            damage: None,
        }
    }

    #[must_use]
    pub fn with_hit_modifiers(mut self, hit_modifiers: [i32; 3]) -> Self {
        self.hit_modifiers = hit_modifiers;
        self
    }

    #[must_use]
    pub fn with_damage(mut self, damage: DamageRoll) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn hit_modifier(&self, slot: HitSlot) -> i32 {
        self.hit_modifiers[slot.index()]
    }

    pub fn hit_modifier_mut(&mut self, slot: HitSlot) -> &mut i32 {
        &mut self.hit_modifiers[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spell_key_matches_both_spell_categories() {
        assert!(AttackCategory::Spell.matches(AttackCategory::Spell));
        assert!(AttackCategory::RegularSpell.matches(AttackCategory::Spell));
        assert!(!AttackCategory::Melee.matches(AttackCategory::Spell));
        assert!(!AttackCategory::Ranged.matches(AttackCategory::Melee));
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("regularSpell".parse(), Ok(AttackCategory::RegularSpell));
        assert_eq!("MELEE".parse(), Ok(AttackCategory::Melee));
    }
}
