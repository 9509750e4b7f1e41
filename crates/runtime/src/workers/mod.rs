//! Worker tasks that back the runtime orchestration.
//!
//! The inventory worker is the only owner of the inventory; everything else
//! talks to it through [`Command`]s.

mod inventory;

pub use inventory::{Command, InventoryWorker};
