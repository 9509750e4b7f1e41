//! Placed item instances.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::env::{BonusDefinition, ItemDefinition};
use crate::shape::{Rotation, ShapeMask};

use super::{GroupId, PlacementOrder, Position};

/// Connection state of an item, shared by every member of its group.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConnectionState {
    /// Ungrouped, no bonus.
    #[default]
    Empty,
    /// Connected to other items that could still complete a bonus.
    Waiting,
    /// Bonus achieved and nothing larger is reachable; locked.
    Closed,
    /// Bonus achieved and a larger bonus is still reachable.
    Opened,
}

impl ConnectionState {
    /// Closed and Opened items carry a bonus.
    pub const fn is_bonus_bearing(self) -> bool {
        matches!(self, Self::Closed | Self::Opened)
    }
}

/// An item instance owned by the inventory, placed or waiting to be placed.
#[derive(Clone, Debug)]
pub struct ItemInstance {
    definition: Arc<ItemDefinition>,
    rotation: Rotation,
    mask: ShapeMask,
    anchor: Option<Position>,
    cells: BTreeSet<Position>,
    pub(crate) placement_order: PlacementOrder,
    pub(crate) group: Option<GroupId>,
    pub(crate) state: ConnectionState,
    pub(crate) bonus: Option<Arc<BonusDefinition>>,
}

impl ItemInstance {
    pub fn new(definition: Arc<ItemDefinition>, rotation: Rotation) -> Self {
        let mask = definition.shape.rotate(rotation);
        Self {
            definition,
            rotation,
            mask,
            anchor: None,
            cells: BTreeSet::new(),
            placement_order: PlacementOrder::UNPLACED,
            group: None,
            state: ConnectionState::Empty,
            bonus: None,
        }
    }

    pub fn definition(&self) -> &Arc<ItemDefinition> {
        &self.definition
    }

    pub fn item_id(&self) -> &str {
        &self.definition.id
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// The definition's mask with the current rotation applied.
    pub fn mask(&self) -> &ShapeMask {
        &self.mask
    }

    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    pub fn is_placed(&self) -> bool {
        self.anchor.is_some()
    }

    /// Absolute cells covered on the grid; empty until placed, the last
    /// footprint once lifted.
    pub fn cells(&self) -> &BTreeSet<Position> {
        &self.cells
    }

    pub fn placement_order(&self) -> PlacementOrder {
        self.placement_order
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn bonus(&self) -> Option<&Arc<BonusDefinition>> {
        self.bonus.as_ref()
    }

    pub fn is_bonus_bearing(&self) -> bool {
        self.bonus.is_some()
    }

    /// Twice the center of the covered bounding box, in cell units.
    ///
    /// Doubling keeps the value integral for even-sized masks.
    pub fn center_x2(&self) -> Option<(i32, i32)> {
        let anchor = self.anchor?;
        Some((
            2 * anchor.x + self.mask.width() as i32,
            2 * anchor.y + self.mask.height() as i32,
        ))
    }

    pub(crate) fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.mask = self.definition.shape.rotate(rotation);
        if let Some(anchor) = self.anchor {
            self.cells = self.mask.translate(anchor);
        }
    }

    pub(crate) fn set_anchor(&mut self, anchor: Position, order: PlacementOrder) {
        self.anchor = Some(anchor);
        self.cells = self.mask.translate(anchor);
        self.placement_order = order;
    }

    /// Takes the instance off the grid. The footprint stays readable so the
    /// former neighbors can still be found.
    pub(crate) fn lift(&mut self) {
        self.anchor = None;
    }

    pub(crate) fn assign(
        &mut self,
        group: GroupId,
        bonus: Option<Arc<BonusDefinition>>,
        state: ConnectionState,
    ) {
        self.group = Some(group);
        self.bonus = bonus;
        self.state = state;
    }

    pub(crate) fn clear_connection(&mut self) {
        self.group = None;
        self.bonus = None;
        self.state = ConnectionState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::new(
            "bar",
            "Bar",
            1.0,
            ShapeMask::filled(3, 1),
        ))
    }

    #[test]
    fn cells_follow_rotation_and_anchor() {
        let mut item = ItemInstance::new(bar(), Rotation::NONE);
        assert!(item.cells().is_empty());

        item.set_anchor(Position::new(1, 1), PlacementOrder(1));
        assert!(item.cells().contains(&Position::new(3, 1)));

        item.set_rotation(Rotation::new(1));
        let expected: BTreeSet<_> = (1..4).map(|y| Position::new(1, y)).collect();
        assert_eq!(item.cells(), &expected);
    }

    #[test]
    fn center_is_doubled() {
        let mut item = ItemInstance::new(bar(), Rotation::NONE);
        assert_eq!(item.center_x2(), None);
        item.set_anchor(Position::new(2, 0), PlacementOrder(1));
        assert_eq!(item.center_x2(), Some((7, 1)));
    }

    #[test]
    fn clearing_resets_connection() {
        let mut item = ItemInstance::new(bar(), Rotation::NONE);
        item.assign(GroupId(4), None, ConnectionState::Waiting);
        assert_eq!(item.group(), Some(GroupId(4)));
        item.clear_connection();
        assert_eq!(item.group(), None);
        assert_eq!(item.state(), ConnectionState::Empty);
        assert!(item.bonus().is_none());
    }
}
