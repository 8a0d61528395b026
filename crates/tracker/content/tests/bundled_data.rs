use std::collections::HashSet;
use std::path::PathBuf;

use tracker_content::{CatalogLoader, ConfigLoader, ScriptLoader};
use tracker_core::{AttackCategory, CombatantKind, PersistentDamageTiming};

fn data(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(file)
}

#[test]
fn bundled_catalog_loads() {
    let catalog = CatalogLoader::load(&data("catalog.ron")).unwrap();

    let kobold = catalog.iter().find(|t| t.id == "kobold-scout").unwrap();
    assert_eq!(kobold.stats.spell_attack, Some(8));
    assert!(
        kobold
            .attacks
            .iter()
            .any(|a| a.category == AttackCategory::Spell)
    );

    let players: Vec<_> = catalog
        .iter()
        .filter(|t| t.kind == CombatantKind::Player)
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(players, vec!["valeros", "kyra"]);
}

#[test]
fn bundled_script_only_names_catalog_entries() {
    let catalog = CatalogLoader::load(&data("catalog.ron")).unwrap();
    let known: HashSet<_> = catalog.iter().map(|t| t.id.clone()).collect();

    let script = ScriptLoader::load(&data("encounter.ron")).unwrap();
    assert!(script.combatants.iter().all(|id| known.contains(id)));
    assert!(script.steps.iter().all(|step| match step {
        tracker_content::ScriptStep::Add(id) => known.contains(id),
        _ => true,
    }));
}

#[test]
fn bundled_config_loads() {
    let config = ConfigLoader::load(&data("tracker.toml")).unwrap();
    assert_eq!(
        config.persistent_damage_timing,
        PersistentDamageTiming::EndOfTurn
    );
    assert_eq!(config.max_roster_size, 64);
}
