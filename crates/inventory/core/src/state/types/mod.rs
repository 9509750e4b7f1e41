pub mod common;
pub mod group;
pub mod item;

// Re-export common types
pub use common::{CardinalDirection, GroupId, ItemHandle, PlacementOrder, Position};

// Re-export group bookkeeping
pub use group::{Group, GroupTable};

// Re-export item instance types
pub use item::{ConnectionState, ItemInstance};
