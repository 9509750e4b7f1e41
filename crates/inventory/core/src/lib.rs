//! Shaped-item grid inventory with connectivity bonuses.
//!
//! `inventory-core` holds the deterministic rules: shape geometry, the
//! occupancy grid, the bonus catalog matcher and the grouping engine that
//! partitions adjacent items into bonus-satisfying groups. It is synchronous
//! and free of I/O; content loading and async access live in the sibling
//! crates. All mutation flows through [`Inventory`], which drives the
//! [`ConnectionEngine`] and reports bonus changes to subscribed
//! [`BonusObserver`]s.
pub mod bonus;
pub mod config;
pub mod connect;
pub mod env;
pub mod error;
pub mod grid;
pub mod inventory;
pub mod notify;
pub mod shape;
pub mod state;

pub use bonus::{BonusCatalog, IdCounts};
pub use config::{ConfigError, InventoryConfig};
pub use connect::ConnectionEngine;
pub use env::{
    BonusDefinition, BonusStats, ItemCatalog, ItemCategory, ItemDefinition, ItemOracle, ShapeKind,
};
pub use error::{ErrorSeverity, InventoryError, PlacementError};
pub use grid::GridStore;
pub use inventory::Inventory;
pub use notify::{BonusNotifier, BonusObserver};
pub use shape::{Rotation, ShapeError, ShapeMask};
pub use state::{
    ConnectionState, Group, GroupId, GroupTable, InvariantViolation, InventoryState, ItemHandle,
    ItemInstance, PlacementOrder, Position,
};
