//! Structural invariant violations.
//!
//! These never surface from public operations. They are produced by
//! [`InventoryState::check_invariants`](super::InventoryState::check_invariants),
//! which the facade runs under `debug_assert!` after every operation and which
//! tests call directly.

use crate::state::{GroupId, ItemHandle, Position};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// A grid cell points at an item that does not cover it.
    #[error("cell {position} records {recorded:?} but item {expected} covers it")]
    CellOwnership {
        position: Position,
        recorded: Option<ItemHandle>,
        expected: ItemHandle,
    },

    /// A grid cell points at an item that is missing or unplaced.
    #[error("cell {position} records untracked item {occupant}")]
    StrayCell {
        position: Position,
        occupant: ItemHandle,
    },

    /// Two items claim the same cell.
    #[error("items {first} and {second} both cover {position}")]
    Overlap {
        position: Position,
        first: ItemHandle,
        second: ItemHandle,
    },

    /// The running weight differs from the sum of placed item weights.
    #[error("recorded weight {recorded:.3} differs from placed weight {actual:.3}")]
    WeightDrift { recorded: f32, actual: f32 },

    /// An item without a group still carries a bonus or a non-empty state.
    #[error("ungrouped item {0} carries connection data")]
    UngroupedWithState(ItemHandle),

    /// An item refers to a group that does not list it.
    #[error("item {handle} refers to {group}, which does not list it")]
    DanglingMembership { handle: ItemHandle, group: GroupId },

    /// A group lists an item that is missing, unplaced or points elsewhere.
    #[error("{group} lists item {handle}, which does not belong to it")]
    ForeignMember { group: GroupId, handle: ItemHandle },

    /// A member's bonus or state disagrees with its group's.
    #[error("item {handle} disagrees with {group} on bonus or state")]
    StateMismatch { group: GroupId, handle: ItemHandle },

    /// A live group has fewer than two members.
    #[error("{0} has fewer than two members")]
    Undersized(GroupId),

    /// A group's members are no longer reachable from one another.
    #[error("{0} is not connected")]
    Disconnected(GroupId),

    /// A bonus group's members do not form the bonus recipe exactly.
    #[error("{0} does not satisfy its bonus recipe")]
    RecipeMismatch(GroupId),

    /// A group carries a bonus but not a bonus-bearing state, or vice versa.
    #[error("{0} has inconsistent bonus and state")]
    BonusStateMismatch(GroupId),
}
