//! Runtime orchestration for the encounter tracker.
//!
//! This crate wires the pure battle engine from `tracker-core` into worker
//! tasks, repositories, and an event bus. Consumers embed [`Runtime`] to seat
//! combatants, dispatch battle events, and subscribe to what happened through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{
    BattleStateEvent, Event, EventBus, PersistenceEvent, RejectedEvent, Topic, TurnEvent,
};
pub use oracle::CatalogOracleImpl;
pub use repository::{FileStateRepository, InMemoryStateRepo, RepositoryError, StateRepository};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::{PersistenceConfig, PersistenceError};
