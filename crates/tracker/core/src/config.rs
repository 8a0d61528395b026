/// When persistent damage is resolved relative to the turn boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PersistentDamageTiming {
    /// Resolved for the combatant whose turn just ended.
    #[default]
    EndOfTurn,
    /// Resolved for the combatant whose turn is starting.
    StartOfTurn,
}

/// Battle rules configuration and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    pub persistent_damage_timing: PersistentDamageTiming,

    /// Upper bound on seated plus negotiating combatants.
    pub max_roster_size: usize,
}

impl TrackerConfig {
    pub const DEFAULT_MAX_ROSTER_SIZE: usize = 128;

    pub fn new() -> Self {
        Self {
            persistent_damage_timing: PersistentDamageTiming::default(),
            max_roster_size: Self::DEFAULT_MAX_ROSTER_SIZE,
        }
    }

    #[must_use]
    pub fn with_persistent_damage_timing(mut self, timing: PersistentDamageTiming) -> Self {
        self.persistent_damage_timing = timing;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}
