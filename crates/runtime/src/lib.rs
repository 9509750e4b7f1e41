//! Async runtime around the synchronous inventory engine.
//!
//! A single worker task owns the [`inventory_core::Inventory`] and applies
//! commands one at a time, so every place/remove (including the rebuilds it
//! triggers) is one critical section. Consumers embed [`InventoryRuntime`],
//! share cloneable [`RuntimeHandle`]s, and subscribe to topic-based events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    ActiveBonus, InventorySnapshot, PlacedItem, Result, RuntimeError, RuntimeHandle,
};
pub use events::{BonusEvent, Event, EventBus, PlacementEvent, Topic};
pub use runtime::{InventoryRuntime, RuntimeBuilder, RuntimeConfig};
