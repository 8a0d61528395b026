//! Creature and player catalog loader.

use std::collections::HashSet;
use std::path::Path;

use ron::extensions::Extensions;
use tracker_core::CombatantTemplate;

use crate::loaders::{LoadResult, read_file};

/// Loader for the combatant catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load the catalog from a RON file.
    ///
    /// RON format: `Vec<CombatantTemplate>`. Optional stats may be written
    /// without `Some(..)`.
    ///
    /// ```ron
    /// [
    ///     (
    ///         id: "goblin-warrior",
    ///         name: "Goblin Warrior",
    ///         kind: creature,
    ///         level: -1,
    ///         maxHp: 6,
    ///         stats: (ac: 16, fortitude: 5, reflex: 7, will: 3),
    ///         attacks: [(name: "dogslicer", category: melee, hitModifiers: (8, 4, 0), damage: "1d6 slashing")],
    ///     ),
    /// ]
    /// ```
    pub fn load(path: &Path) -> LoadResult<Vec<CombatantTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to load catalog RON at {}: {}", path.display(), e)
        })
    }

    /// Parses and validates catalog text. Ids must be unique and non-empty.
    pub fn parse(content: &str) -> LoadResult<Vec<CombatantTemplate>> {
        let templates: Vec<CombatantTemplate> = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(content)?;

        let mut seen = HashSet::new();
        for template in &templates {
            if template.id.trim().is_empty() {
                anyhow::bail!("catalog entry '{}' has an empty id", template.name);
            }
            if template.name.trim().is_empty() {
                anyhow::bail!("catalog entry '{}' has an empty name", template.id);
            }
            if template.max_hp < 0 {
                anyhow::bail!("catalog entry '{}' has negative max HP", template.id);
            }
            if !seen.insert(template.id.as_str()) {
                anyhow::bail!("duplicate catalog id '{}'", template.id);
            }
        }

        Ok(templates)
    }
}
