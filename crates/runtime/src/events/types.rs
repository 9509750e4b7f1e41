//! Event types for different topics.

use serde::{Deserialize, Serialize};

use inventory_core::{BonusStats, ItemHandle, Position};

/// Events related to grid mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlacementEvent {
    /// An item was dropped onto the grid
    Placed {
        handle: ItemHandle,
        item_id: String,
        anchor: Position,
    },

    /// An item was lifted off the grid and destroyed
    Removed { handle: ItemHandle, item_id: String },

    /// A placement request was refused; the inventory is unchanged
    Rejected {
        handle: ItemHandle,
        anchor: Position,
        code: String,
        reason: String,
    },
}

/// Events related to the active bonus list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BonusEvent {
    /// The set of bonus-bearing groups changed during one operation.
    Changed {
        /// Bonus ids in ascending group id order.
        bonuses: Vec<String>,
        stats: BonusStats,
    },
}
