//! Common error infrastructure for inventory-core.
//!
//! Domain errors live next to the code that raises them (`ShapeError` in
//! [`crate::shape`], `ConfigError` in [`crate::config`]); placement rejections
//! are defined here because both the grid store and the inventory facade
//! report them.
//!
//! The grouping engine itself is infallible: "no bonus found" is a normal
//! outcome, and broken invariants are programming defects checked with
//! `debug_assert!` rather than surfaced as errors.

use crate::state::{ItemHandle, Position};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retrying with different input can succeed (another cell, a lighter item).
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    Validation,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all inventory-core errors.
pub trait InventoryError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier of the variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Why a placement request was rejected. A rejected placement never mutates
/// the inventory.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("item {0} is not tracked by this inventory")]
    UnknownItem(ItemHandle),

    #[error("item {0} is already placed")]
    AlreadyPlaced(ItemHandle),

    #[error("weight {required:.2} exceeds remaining capacity {remaining:.2}")]
    OverCapacity { required: f32, remaining: f32 },

    #[error("cell {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("cell {position} is occupied by item {occupant}")]
    Collision {
        position: Position,
        occupant: ItemHandle,
    },
}

impl InventoryError for PlacementError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownItem(_) | Self::AlreadyPlaced(_) => ErrorSeverity::Validation,
            Self::OverCapacity { .. } | Self::OutOfBounds(_) | Self::Collision { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownItem(_) => "UNKNOWN_ITEM",
            Self::AlreadyPlaced(_) => "ALREADY_PLACED",
            Self::OverCapacity { .. } => "OVER_CAPACITY",
            Self::OutOfBounds(_) => "OUT_OF_BOUNDS",
            Self::Collision { .. } => "COLLISION",
        }
    }
}
