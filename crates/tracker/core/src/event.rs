//! Events accepted by the battle engine and the outcome reported for each.

use crate::conditions::ConditionId;
use crate::engine::{NegotiationStatus, TurnAdvance};
use crate::env::CombatantTemplate;
use crate::state::{BattleId, PersistentDamage, PersistentDamagePrompt, Template};

/// One user-triggered mutation of the battle.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum BattleEvent {
    /// Seats a fresh battle-scoped copy of a catalog entry.
    AddCombatant(CombatantTemplate),
    RemoveCombatant(BattleId),

    /// Opens initiative negotiation over the whole roster.
    StartBattle,
    /// Assigns an initiative to the head of the negotiation queue.
    ConfirmInitiative(i32),
    SkipInitiative,
    /// `None` cancels the prompt and leaves the tie pending.
    ResolveTie(Option<BattleId>),
    /// Edits the initiative of a seated combatant.
    SetInitiative { target: BattleId, value: i32 },

    FinishTurn,

    ApplyCondition {
        target: BattleId,
        condition: ConditionId,
        /// Required for persistent damage, ignored otherwise.
        instance: Option<PersistentDamage>,
    },
    RemoveCondition {
        target: BattleId,
        condition: ConditionId,
        /// Persistent damage instance to drop; `None` drops all of them.
        instance: Option<usize>,
    },
    SetConditionStacks {
        target: BattleId,
        condition: ConditionId,
        stacks: u8,
    },
    ClearCondition {
        target: BattleId,
        condition: ConditionId,
    },

    /// Applies a template, replacing the other one if it is active.
    ApplyTemplate { target: BattleId, template: Template },
    RemoveTemplate { target: BattleId },
    /// Turns a template on or off; refuses while the other one is active.
    ToggleTemplate { target: BattleId, template: Template },

    ApplyDamage { target: BattleId, amount: i32 },
    ApplyHeal { target: BattleId, amount: i32 },
    SetTempHp { target: BattleId, value: i32 },

    /// Answers the pending "did it end?" prompt.
    ResolvePersistentDamage { ended: bool },

    EndBattle,
}

impl BattleEvent {
    /// Snake-case event name, for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Combatant the event is aimed at, if any.
    pub fn target(&self) -> Option<BattleId> {
        use BattleEvent::*;
        match self {
            RemoveCombatant(target)
            | SetInitiative { target, .. }
            | ApplyCondition { target, .. }
            | RemoveCondition { target, .. }
            | SetConditionStacks { target, .. }
            | ClearCondition { target, .. }
            | ApplyTemplate { target, .. }
            | RemoveTemplate { target }
            | ToggleTemplate { target, .. }
            | ApplyDamage { target, .. }
            | ApplyHeal { target, .. }
            | SetTempHp { target, .. } => Some(*target),
            ResolveTie(chosen) => *chosen,
            AddCombatant(_)
            | StartBattle
            | ConfirmInitiative(_)
            | SkipInitiative
            | FinishTurn
            | ResolvePersistentDamage { .. }
            | EndBattle => None,
        }
    }

    /// Events that advance or settle initiative negotiation.
    pub fn is_negotiation(&self) -> bool {
        matches!(
            self,
            Self::StartBattle
                | Self::ConfirmInitiative(_)
                | Self::SkipInitiative
                | Self::ResolveTie(_)
                | Self::SetInitiative { .. }
        )
    }
}

/// What an accepted event did, beyond the new state itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventOutcome {
    /// False when the event was accepted but left the state as it was (a
    /// cancelled tie prompt, a condition already at its ceiling).
    pub changed: bool,
    /// Battle id of a combatant added by the event.
    pub added: Option<BattleId>,
    /// `(old, new)` battle ids reissued when an initial tie was settled.
    pub reissued: Vec<(BattleId, BattleId)>,
    /// Negotiation state after a negotiation event.
    pub negotiation: Option<NegotiationStatus>,
    /// Turn change after `FinishTurn`.
    pub turn: Option<TurnAdvance>,
    /// Persistent damage prompt waiting for an answer after the event.
    pub prompt: Option<PersistentDamagePrompt>,
}
