//! Condition catalog and the typed effect targets conditions modify.
//!
//! The registry is process-wide constant data: every [`ConditionDefinition`]
//! is a `const` value built from typed [`EffectTarget`]s, so a malformed
//! effect key cannot reach the engine. Catalog spellings of condition ids
//! (`off-guard`, `offGuard`, ...) are normalized by [`ConditionId`]'s parser.

mod registry;

use core::fmt;
use core::str::FromStr;

use crate::stats::{AttackCategory, HitSlot, StatId};

pub use registry::DEFINITIONS;

/// Canonical condition identifier.
///
/// Parsing accepts both the hyphenated display id and the camel-cased
/// catalog key, case-insensitively. `Display` yields the hyphenated form.
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
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionId {
    #[strum(to_string = "off-guard", serialize = "offGuard", serialize = "off_guard")]
    #[cfg_attr(feature = "serde", serde(rename = "off-guard", alias = "offGuard"))]
    OffGuard,
    #[strum(to_string = "frightened")]
    #[cfg_attr(feature = "serde", serde(rename = "frightened"))]
    Frightened,
    #[strum(to_string = "enfeebled")]
    #[cfg_attr(feature = "serde", serde(rename = "enfeebled"))]
    Enfeebled,
    #[strum(to_string = "fatigued")]
    #[cfg_attr(feature = "serde", serde(rename = "fatigued"))]
    Fatigued,
    #[strum(to_string = "sickened")]
    #[cfg_attr(feature = "serde", serde(rename = "sickened"))]
    Sickened,
    #[strum(to_string = "clumsy")]
    #[cfg_attr(feature = "serde", serde(rename = "clumsy"))]
    Clumsy,
    #[strum(to_string = "stupefied")]
    #[cfg_attr(feature = "serde", serde(rename = "stupefied"))]
    Stupefied,
    #[strum(to_string = "drained")]
    #[cfg_attr(feature = "serde", serde(rename = "drained"))]
    Drained,
    #[strum(
        to_string = "persistent-damage",
        serialize = "persistentDamage",
        serialize = "persistent_damage"
    )]
    #[cfg_attr(
        feature = "serde",
        serde(rename = "persistent-damage", alias = "persistentDamage")
    )]
    PersistentDamage,
}

impl ConditionId {
    /// Returns the registry entry for this condition.
    pub fn definition(self) -> &'static ConditionDefinition {
        registry::definition(self)
    }

    /// Persistent damage holds damage instances instead of stacks.
    pub const fn is_persistent(self) -> bool {
        matches!(self, Self::PersistentDamage)
    }
}

/// Looks up a condition by any accepted spelling of its id.
pub fn lookup(condition_id: &str) -> Option<&'static ConditionDefinition> {
    condition_id
        .trim()
        .parse::<ConditionId>()
        .ok()
        .map(ConditionId::definition)
}

/// What a single effect delta modifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectTarget {
    /// A direct stat (`ac`, `fortitude`, ...).
    Stat(StatId),
    /// Hit modifier of one MAP slot of every attack in a category.
    AttackModifier(AttackCategory, HitSlot),
    /// Flat bonus of the damage roll of every attack in a category.
    AttackDamage(AttackCategory),
}

/// Error returned when an effect key names no known target.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown effect key '{0}'")]
pub struct UnknownEffectKey(pub String);

fn key_prefix(category: AttackCategory) -> &'static str {
    match category {
        AttackCategory::Melee => "melee",
        AttackCategory::Ranged => "ranged",
        AttackCategory::Spell | AttackCategory::RegularSpell => "spell",
    }
}

fn parse_prefix(prefix: &str) -> Option<AttackCategory> {
    match prefix {
        "melee" => Some(AttackCategory::Melee),
        "ranged" => Some(AttackCategory::Ranged),
        "spell" => Some(AttackCategory::Spell),
        _ => None,
    }
}

impl FromStr for EffectTarget {
    type Err = UnknownEffectKey;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownEffectKey(key.to_string());

        if let Ok(stat) = key.parse::<StatId>() {
            return Ok(Self::Stat(stat));
        }

        if let Some(head) = key.strip_suffix("HitModifier") {
            for slot in HitSlot::ALL {
                let slot_name: &str = match slot {
                    HitSlot::First => "First",
                    HitSlot::Second => "Second",
                    HitSlot::Third => "Third",
                };
                if let Some(prefix) = head.strip_suffix(slot_name) {
                    let category = parse_prefix(prefix).ok_or_else(unknown)?;
                    return Ok(Self::AttackModifier(category, slot));
                }
            }
            return Err(unknown());
        }

        if let Some(prefix) = key.strip_suffix("Damage") {
            return parse_prefix(prefix)
                .map(Self::AttackDamage)
                .ok_or_else(unknown);
        }

        Err(unknown())
    }
}

impl fmt::Display for EffectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stat(stat) => write!(f, "{stat}"),
            Self::AttackModifier(category, slot) => {
                write!(f, "{}{}HitModifier", key_prefix(*category), slot)
            }
            Self::AttackDamage(category) => write!(f, "{}Damage", key_prefix(*category)),
        }
    }
}

/// Immutable registry entry for one condition kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionDefinition {
    pub id: ConditionId,
    pub name: &'static str,
    pub max_stacks: u8,
    /// Per-stack deltas. Drained additionally lowers max HP by its level band.
    pub effects: &'static [(EffectTarget, i32)],
}

impl ConditionDefinition {
    pub const fn is_persistent(&self) -> bool {
        self.id.is_persistent()
    }

    pub const fn is_drained(&self) -> bool {
        matches!(self.id, ConditionId::Drained)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn lookup_accepts_display_and_catalog_spellings() {
        assert_eq!(lookup("off-guard").map(|d| d.id), Some(ConditionId::OffGuard));
        assert_eq!(lookup("offGuard").map(|d| d.id), Some(ConditionId::OffGuard));
        assert_eq!(
            lookup("persistentDamage").map(|d| d.id),
            Some(ConditionId::PersistentDamage)
        );
        assert_eq!(lookup(" Frightened ").map(|d| d.id), Some(ConditionId::Frightened));
        assert!(lookup("grabbed").is_none());
    }

    #[test]
    fn display_uses_hyphenated_id() {
        assert_eq!(ConditionId::OffGuard.to_string(), "off-guard");
        assert_eq!(ConditionId::PersistentDamage.to_string(), "persistent-damage");
    }

    #[test]
    fn effect_keys_parse_into_typed_targets() {
        assert_eq!(
            "meleeFirstHitModifier".parse(),
            Ok(EffectTarget::AttackModifier(AttackCategory::Melee, HitSlot::First))
        );
        assert_eq!(
            "spellThirdHitModifier".parse(),
            Ok(EffectTarget::AttackModifier(AttackCategory::Spell, HitSlot::Third))
        );
        assert_eq!(
            "meleeDamage".parse(),
            Ok(EffectTarget::AttackDamage(AttackCategory::Melee))
        );
        assert_eq!("will".parse(), Ok(EffectTarget::Stat(StatId::Will)));
        assert!("thrownFirstHitModifier".parse::<EffectTarget>().is_err());
        assert!("speed".parse::<EffectTarget>().is_err());
    }

    #[test]
    fn every_registry_effect_key_round_trips() {
        for id in ConditionId::iter() {
            let definition = id.definition();
            assert_eq!(definition.id, id);
            for (target, _) in definition.effects {
                let key = target.to_string();
                assert_eq!(key.parse::<EffectTarget>().as_ref(), Ok(target), "{key}");
            }
        }
    }
}
