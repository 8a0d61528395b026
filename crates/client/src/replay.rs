//! Drives an encounter script through a runtime handle.
use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use tracker_content::{EncounterScript, ScriptRoster, StepAction};
use tracker_core::{EventOutcome, TrackerError};
use tracker_runtime::{RuntimeError, RuntimeHandle};

/// What happened while replaying.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
}

/// Seats the script's combatants, then runs every step in order.
///
/// A step the engine refuses is logged and skipped, like a user retrying a
/// bad input. A refused or unknown `Add` aborts the replay, since every later
/// step would point at the wrong combatant.
pub async fn replay(handle: &RuntimeHandle, script: &EncounterScript) -> Result<ReplaySummary> {
    let mut roster = ScriptRoster::new();
    let mut summary = ReplaySummary::default();

    for source_id in &script.combatants {
        let outcome = seat(handle, source_id).await?;
        roster.push(added(&outcome, source_id)?);
        summary.applied += 1;
    }

    for (index, step) in script.steps.iter().enumerate() {
        let outcome = match step.resolve(&roster)? {
            StepAction::AddFromCatalog(source_id) => {
                let outcome = seat(handle, &source_id).await?;
                roster.push(added(&outcome, &source_id)?);
                outcome
            }
            StepAction::Dispatch(event) => {
                let name = event.name();
                match handle.dispatch(event).await {
                    Ok(outcome) => {
                        info!(step = index, event = name, changed = outcome.changed, "Step applied");
                        outcome
                    }
                    Err(RuntimeError::Engine(error)) => {
                        warn!(
                            step = index,
                            event = name,
                            code = error.error_code(),
                            "Step rejected: {}",
                            error
                        );
                        summary.rejected += 1;
                        continue;
                    }
                    Err(error) => return Err(error.into()),
                }
            }
        };

        roster.reissue(&outcome.reissued);
        summary.applied += 1;
    }

    Ok(summary)
}

async fn seat(handle: &RuntimeHandle, source_id: &str) -> Result<EventOutcome> {
    handle
        .add_from_catalog(source_id)
        .await
        .with_context(|| format!("failed to seat '{}'", source_id))
}

fn added(outcome: &EventOutcome, source_id: &str) -> Result<tracker_core::BattleId> {
    match outcome.added {
        Some(id) => Ok(id),
        None => bail!("seating '{}' did not report a battle id", source_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_content::{ScriptLoader, ScriptStep};
    use tracker_core::{CombatantKind, CombatantTemplate};
    use tracker_runtime::{CatalogOracleImpl, Runtime};

    fn catalog() -> CatalogOracleImpl {
        let mut goblin = CombatantTemplate::new("goblin", "Goblin", CombatantKind::Creature);
        goblin.max_hp = 6;
        let mut kyra = CombatantTemplate::new("kyra", "Kyra", CombatantKind::Player);
        kyra.max_hp = 18;
        CatalogOracleImpl::from_templates([goblin, kyra])
    }

    #[tokio::test]
    async fn rejected_steps_are_skipped() {
        let runtime = Runtime::builder().catalog(catalog()).build().await.unwrap();
        let handle = runtime.handle();

        let script = ScriptLoader::parse(
            r#"(
                combatants: ["goblin", "kyra"],
                steps: [
                    FinishTurn,
                    StartBattle,
                    Initiative(14),
                    Initiative(14),
                    BreakTie(Some(1)),
                    Damage(target: 0, amount: 2),
                    PersistentEnded(true),
                ],
            )"#,
        )
        .unwrap();

        let summary = replay(&handle, &script).await.unwrap();
        assert_eq!(
            summary,
            ReplaySummary {
                applied: 7,
                rejected: 2,
            }
        );

        // Damage landed on the goblin even though the tie reissued its id.
        let state = handle.query_state().await.unwrap();
        let goblin = state.roster.iter().find(|c| c.name == "Goblin").unwrap();
        assert_eq!(goblin.hp, 4);

        drop(handle);
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_catalog_entry_aborts() {
        let runtime = Runtime::builder().catalog(catalog()).build().await.unwrap();
        let handle = runtime.handle();

        let script = EncounterScript {
            combatants: vec!["goblin".into()],
            steps: vec![ScriptStep::Add("dragon".into()), ScriptStep::StartBattle],
        };

        let err = replay(&handle, &script).await.unwrap_err();
        assert!(err.to_string().contains("dragon"));
        assert_eq!(handle.query_state().await.unwrap().combatant_count(), 1);

        drop(handle);
        runtime.shutdown().await.unwrap();
    }
}
