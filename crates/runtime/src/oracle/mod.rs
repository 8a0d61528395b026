//! Catalog oracle implementing [`tracker_core::CatalogOracle`].
//!
//! The catalog is immutable at runtime; the battle worker only reads it when
//! seating a combatant by catalog id.
use std::collections::HashMap;

use tracker_core::{CatalogOracle, CombatantTemplate};

/// CatalogOracle implementation backed by loaded templates
#[derive(Clone, Debug, Default)]
pub struct CatalogOracleImpl {
    templates: HashMap<String, CombatantTemplate>,
}

impl CatalogOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes templates by their catalog id. Later entries win on duplicate ids.
    pub fn from_templates(templates: impl IntoIterator<Item = CombatantTemplate>) -> Self {
        let mut oracle = Self::new();
        for template in templates {
            oracle.add_template(template);
        }
        oracle
    }

    /// Add a catalog template
    pub fn add_template(&mut self, template: CombatantTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl CatalogOracle for CatalogOracleImpl {
    fn template(&self, source_id: &str) -> Option<CombatantTemplate> {
        self.templates.get(source_id).cloned()
    }

    fn all_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.templates.keys().cloned().collect();
        ids.sort();
        ids
    }
}
