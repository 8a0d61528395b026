//! Data-driven content for the encounter tracker.
//!
//! This crate turns RON/TOML files into the plain values the runtime feeds
//! the engine:
//! - Creature and player catalog (RON)
//! - Tracker configuration (TOML)
//! - Encounter scripts (RON)
//!
//! Content is consumed by runtime oracles and the client; it never appears in
//! battle state except as spawned copies.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, ConfigLoader, EncounterScript, LoadResult, ScriptLoader, ScriptRoster,
    ScriptStep, StepAction,
};
