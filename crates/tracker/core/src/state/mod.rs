//! Authoritative battle state representation.
//!
//! This module owns the roster, turn bookkeeping and the initiative
//! negotiation phase. Collaborators clone or query this state but mutate it
//! exclusively through the engine.
mod combatant;
mod common;
mod turn;

use std::collections::VecDeque;

pub use combatant::{
    AppliedTemplate, Combatant, ConditionInstance, ConditionalResistance, CreatureAction,
    HpThreshold, PersistentDamage, Resistance, Template, TemplateSnapshot,
};
pub use common::{BattleId, CombatantKind};
pub use turn::TurnState;

/// Canonical snapshot of one battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleState {
    /// Number of events committed so far. Used to index saved snapshots.
    pub revision: u64,

    /// Sequential battle id allocator (monotonically increasing, never reused).
    next_battle_id: u32,

    /// Seated combatants.
    pub roster: Roster,

    /// Active pointer and round counter.
    pub turn: TurnState,

    /// Initiative negotiation progress.
    pub negotiation: NegotiationPhase,

    /// Persistent damage instance awaiting a "did it end?" answer.
    pub pending_prompt: Option<PersistentDamagePrompt>,
}

impl BattleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh battle id.
    pub fn allocate_id(&mut self) -> BattleId {
        self.next_battle_id += 1;
        BattleId(self.next_battle_id)
    }

    /// Returns true while initiative negotiation or a tie resolution is open.
    pub fn is_negotiating(&self) -> bool {
        !matches!(self.negotiation, NegotiationPhase::Idle)
    }

    /// Finds a combatant on the roster or, during negotiation, among the
    /// participants waiting for or holding an initiative.
    pub fn combatant(&self, id: BattleId) -> Option<&Combatant> {
        self.roster.get(id).or_else(|| match &self.negotiation {
            NegotiationPhase::Negotiating(negotiation) => negotiation.get(id),
            _ => None,
        })
    }

    pub fn combatant_mut(&mut self, id: BattleId) -> Option<&mut Combatant> {
        if self.roster.contains(id) {
            return self.roster.get_mut(id);
        }
        match &mut self.negotiation {
            NegotiationPhase::Negotiating(negotiation) => negotiation.get_mut(id),
            _ => None,
        }
    }

    /// Number of combatants in the battle, seated or negotiating.
    pub fn combatant_count(&self) -> usize {
        let negotiating = match &self.negotiation {
            NegotiationPhase::Negotiating(negotiation) => negotiation.len(),
            _ => 0,
        };
        self.roster.len() + negotiating
    }

    /// Ends the battle: roster cleared, round reset to 1, active pointer cleared.
    pub fn end_battle(&mut self) {
        self.roster.clear();
        self.turn.reset();
        self.negotiation = NegotiationPhase::Idle;
        self.pending_prompt = None;
    }
}

/// Ordered list of seated combatants.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Roster {
    combatants: Vec<Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_combatants(combatants: Vec<Combatant>) -> Self {
        Self { combatants }
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn as_slice(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn get(&self, id: BattleId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.battle_id == id)
    }

    pub fn get_mut(&mut self, id: BattleId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.battle_id == id)
    }

    pub fn contains(&self, id: BattleId) -> bool {
        self.get(id).is_some()
    }

    pub fn push(&mut self, combatant: Combatant) {
        self.combatants.push(combatant);
    }

    pub fn remove(&mut self, id: BattleId) -> Option<Combatant> {
        let index = self.combatants.iter().position(|c| c.battle_id == id)?;
        Some(self.combatants.remove(index))
    }

    pub fn clear(&mut self) {
        self.combatants.clear();
    }

    /// Removes and returns every combatant, leaving the roster empty.
    pub fn drain(&mut self) -> Vec<Combatant> {
        std::mem::take(&mut self.combatants)
    }

    /// Turn order: combatants holding an initiative, highest first.
    ///
    /// Combatants without initiative have no turn. The sort is stable, but
    /// order among equal initiatives is not contractual.
    pub fn turn_order(&self) -> Vec<&Combatant> {
        let mut order: Vec<&Combatant> = self
            .combatants
            .iter()
            .filter(|c| c.initiative.is_some())
            .collect();
        order.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        order
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Combatant;
    type IntoIter = std::slice::Iter<'a, Combatant>;

    fn into_iter(self) -> Self::IntoIter {
        self.combatants.iter()
    }
}

/// Tie awaiting a human decision.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingTie {
    /// Combatants sharing `contested`, in commit order.
    pub tied: Vec<BattleId>,
    pub contested: i32,
}

/// Initial initiative negotiation started by `StartBattle`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Negotiation {
    /// Participants still waiting for an initiative value; head first.
    pub queue: VecDeque<Combatant>,
    /// Participants with a confirmed initiative, in commit order.
    pub committed: Vec<Combatant>,
    /// Participants skipped without an initiative.
    pub skipped: Vec<Combatant>,
    /// Set once the queue is empty and a tie was detected.
    pub tie: Option<PendingTie>,
}

impl Negotiation {
    pub fn len(&self) -> usize {
        self.queue.len() + self.committed.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.queue
            .iter()
            .chain(self.committed.iter())
            .chain(self.skipped.iter())
    }

    pub fn get(&self, id: BattleId) -> Option<&Combatant> {
        self.iter().find(|c| c.battle_id == id)
    }

    pub fn get_mut(&mut self, id: BattleId) -> Option<&mut Combatant> {
        self.queue
            .iter_mut()
            .chain(self.committed.iter_mut())
            .chain(self.skipped.iter_mut())
            .find(|c| c.battle_id == id)
    }

    /// Removes a participant from whichever list holds it.
    pub fn remove(&mut self, id: BattleId) -> Option<Combatant> {
        if let Some(index) = self.queue.iter().position(|c| c.battle_id == id) {
            return self.queue.remove(index);
        }
        for list in [&mut self.committed, &mut self.skipped] {
            if let Some(index) = list.iter().position(|c| c.battle_id == id) {
                return Some(list.remove(index));
            }
        }
        None
    }
}

/// Where initiative negotiation stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NegotiationPhase {
    #[default]
    Idle,
    /// Pre-battle negotiation; participants live here until sorted.
    Negotiating(Negotiation),
    /// A seated combatant's initiative was edited onto another's value.
    InlineTie(PendingTie),
}

/// Per-instance "did it end?" question raised by the persistent damage resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersistentDamagePrompt {
    pub target: BattleId,
    /// Index into the target's persistent damage instances.
    pub index: usize,
    pub instance: PersistentDamage,
}
