//! Traits describing read-only catalog data.
//!
//! The catalog of creatures and players is owned by collaborators (bestiary
//! caches, party sheets). The engine only ever receives
//! [`CombatantTemplate`] values and never reaches back into the catalog.
mod catalog;

pub use catalog::CombatantTemplate;

/// Read-only lookup of catalog templates by source id.
pub trait CatalogOracle: Send + Sync {
    /// Returns the template for a catalog id.
    ///
    /// # Arguments
    ///
    /// * `source_id` - Catalog identifier (e.g., "goblin-warrior", "valeros")
    fn template(&self, source_id: &str) -> Option<CombatantTemplate>;

    /// Returns every catalog id this oracle can resolve.
    fn all_ids(&self) -> Vec<String>;
}
