//! Encounter script loader.
//!
//! A script lists the catalog entries to seat and then a sequence of steps.
//! Steps name combatants by their script-local index (position in
//! `combatants`, followed by any `Add` steps), never by battle id, because
//! battle ids are only known once the engine hands them out.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracker_core::{BattleEvent, BattleId, ConditionId, PersistentDamage, Template};

use crate::loaders::{LoadResult, read_file};

/// Scripted encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterScript {
    /// Catalog ids seated before the first step, in order.
    pub combatants: Vec<String>,
    pub steps: Vec<ScriptStep>,
}

/// One scripted user action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptStep {
    /// Seats another catalog entry; it takes the next script index.
    Add(String),
    Remove(usize),
    StartBattle,
    Initiative(i32),
    SkipInitiative,
    /// Picks who goes first in the pending tie; `None` cancels the prompt.
    BreakTie(Option<usize>),
    SetInitiative {
        target: usize,
        value: i32,
    },
    FinishTurn,
    Condition {
        target: usize,
        condition: ConditionId,
        #[serde(default)]
        persistent: Option<PersistentDamage>,
    },
    RemoveCondition {
        target: usize,
        condition: ConditionId,
        #[serde(default)]
        instance: Option<usize>,
    },
    SetStacks {
        target: usize,
        condition: ConditionId,
        stacks: u8,
    },
    ClearCondition {
        target: usize,
        condition: ConditionId,
    },
    Template {
        target: usize,
        template: Template,
    },
    RemoveTemplate(usize),
    ToggleTemplate {
        target: usize,
        template: Template,
    },
    Damage {
        target: usize,
        amount: i32,
    },
    Heal {
        target: usize,
        amount: i32,
    },
    TempHp {
        target: usize,
        value: i32,
    },
    /// Answers the pending persistent damage prompt.
    PersistentEnded(bool),
    EndBattle,
}

/// What the replayer has to do for one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepAction {
    /// Look the id up in the catalog and add the result.
    AddFromCatalog(String),
    Dispatch(BattleEvent),
}

impl ScriptStep {
    /// Script index this step refers to, if any.
    pub fn target(&self) -> Option<usize> {
        match self {
            Self::Remove(target)
            | Self::RemoveTemplate(target)
            | Self::SetInitiative { target, .. }
            | Self::Condition { target, .. }
            | Self::RemoveCondition { target, .. }
            | Self::SetStacks { target, .. }
            | Self::ClearCondition { target, .. }
            | Self::Template { target, .. }
            | Self::ToggleTemplate { target, .. }
            | Self::Damage { target, .. }
            | Self::Heal { target, .. }
            | Self::TempHp { target, .. } => Some(*target),
            Self::BreakTie(choice) => *choice,
            Self::Add(_)
            | Self::StartBattle
            | Self::Initiative(_)
            | Self::SkipInitiative
            | Self::FinishTurn
            | Self::PersistentEnded(_)
            | Self::EndBattle => None,
        }
    }

    /// Translates the step into an engine event against the current roster.
    pub fn resolve(&self, roster: &ScriptRoster) -> LoadResult<StepAction> {
        let event = match self {
            Self::Add(source_id) => return Ok(StepAction::AddFromCatalog(source_id.clone())),
            Self::Remove(target) => BattleEvent::RemoveCombatant(roster.get(*target)?),
            Self::StartBattle => BattleEvent::StartBattle,
            Self::Initiative(value) => BattleEvent::ConfirmInitiative(*value),
            Self::SkipInitiative => BattleEvent::SkipInitiative,
            Self::BreakTie(choice) => {
                BattleEvent::ResolveTie(choice.map(|i| roster.get(i)).transpose()?)
            }
            Self::SetInitiative { target, value } => BattleEvent::SetInitiative {
                target: roster.get(*target)?,
                value: *value,
            },
            Self::FinishTurn => BattleEvent::FinishTurn,
            Self::Condition {
                target,
                condition,
                persistent,
            } => BattleEvent::ApplyCondition {
                target: roster.get(*target)?,
                condition: *condition,
                instance: persistent.clone(),
            },
            Self::RemoveCondition {
                target,
                condition,
                instance,
            } => BattleEvent::RemoveCondition {
                target: roster.get(*target)?,
                condition: *condition,
                instance: *instance,
            },
            Self::SetStacks {
                target,
                condition,
                stacks,
            } => BattleEvent::SetConditionStacks {
                target: roster.get(*target)?,
                condition: *condition,
                stacks: *stacks,
            },
            Self::ClearCondition { target, condition } => BattleEvent::ClearCondition {
                target: roster.get(*target)?,
                condition: *condition,
            },
            Self::Template { target, template } => BattleEvent::ApplyTemplate {
                target: roster.get(*target)?,
                template: *template,
            },
            Self::RemoveTemplate(target) => BattleEvent::RemoveTemplate {
                target: roster.get(*target)?,
            },
            Self::ToggleTemplate { target, template } => BattleEvent::ToggleTemplate {
                target: roster.get(*target)?,
                template: *template,
            },
            Self::Damage { target, amount } => BattleEvent::ApplyDamage {
                target: roster.get(*target)?,
                amount: *amount,
            },
            Self::Heal { target, amount } => BattleEvent::ApplyHeal {
                target: roster.get(*target)?,
                amount: *amount,
            },
            Self::TempHp { target, value } => BattleEvent::SetTempHp {
                target: roster.get(*target)?,
                value: *value,
            },
            Self::PersistentEnded(ended) => BattleEvent::ResolvePersistentDamage { ended: *ended },
            Self::EndBattle => BattleEvent::EndBattle,
        };
        Ok(StepAction::Dispatch(event))
    }
}

/// Maps script indices to the battle ids the engine handed out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptRoster {
    ids: Vec<BattleId>,
}

impl ScriptRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: BattleId) {
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[BattleId] {
        &self.ids
    }

    pub fn get(&self, index: usize) -> LoadResult<BattleId> {
        self.ids.get(index).copied().ok_or_else(|| {
            anyhow::anyhow!(
                "script refers to combatant {} but only {} were added",
                index,
                self.ids.len()
            )
        })
    }

    /// Follows battle ids reissued by a settled initial tie.
    pub fn reissue(&mut self, reissued: &[(BattleId, BattleId)]) {
        for (old, new) in reissued {
            for id in self.ids.iter_mut().filter(|id| **id == *old) {
                *id = *new;
            }
        }
    }
}

/// Loader for encounter scripts from RON files.
pub struct ScriptLoader;

impl ScriptLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterScript> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to load encounter script at {}: {}", path.display(), e)
        })
    }

    /// Parses script text and checks that every step names a combatant that
    /// exists by the time the step runs.
    pub fn parse(content: &str) -> LoadResult<EncounterScript> {
        let script: EncounterScript = ron::from_str(content)?;

        let mut seated = script.combatants.len();
        for (position, step) in script.steps.iter().enumerate() {
            if let Some(target) = step.target()
                && target >= seated
            {
                anyhow::bail!(
                    "step {} refers to combatant {} but only {} are seated",
                    position,
                    target,
                    seated
                );
            }
            if matches!(step, ScriptStep::Add(_)) {
                seated += 1;
            }
        }

        Ok(script)
    }
}
