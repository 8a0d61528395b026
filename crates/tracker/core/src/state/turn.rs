use super::BattleId;

/// Active-turn pointer and round counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Combatant whose turn it is. `None` until the first turn is seated.
    pub active: Option<BattleId>,

    /// Current round, starting at 1.
    pub round: u32,
}

impl TurnState {
    pub const FIRST_ROUND: u32 = 1;

    pub fn new() -> Self {
        Self {
            active: None,
            round: Self::FIRST_ROUND,
        }
    }

    /// Clears the active pointer and rewinds to the first round.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
