//! Authoritative inventory state.
//!
//! This module owns the item arena, the occupancy grid and the group table.
//! Callers read it freely; only the [`Inventory`](crate::Inventory) facade and
//! the connection engine mutate it.
pub mod error;
pub mod types;

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

pub use error::InvariantViolation;
pub use types::{
    CardinalDirection, ConnectionState, Group, GroupId, GroupTable, ItemHandle, ItemInstance,
    PlacementOrder, Position,
};

use crate::bonus::IdCounts;
use crate::config::InventoryConfig;
use crate::env::BonusDefinition;
use crate::grid::GridStore;

const WEIGHT_TOLERANCE: f32 = 1e-3;

/// Item arena, grid occupancy and connectivity groups of one inventory.
#[derive(Clone, Debug)]
pub struct InventoryState {
    pub(crate) grid: GridStore,
    items: BTreeMap<ItemHandle, ItemInstance>,
    pub(crate) groups: GroupTable,
    /// Sequential handle allocator. Never reused.
    next_handle: u32,
    /// Sequential placement counter. Never reused.
    next_order: u64,
}

impl InventoryState {
    pub fn new(config: &InventoryConfig) -> Self {
        Self {
            grid: GridStore::new(config),
            items: BTreeMap::new(),
            groups: GroupTable::new(),
            next_handle: 0,
            next_order: 0,
        }
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    pub fn item(&self, handle: ItemHandle) -> Option<&ItemInstance> {
        self.items.get(&handle)
    }

    pub(crate) fn item_mut(&mut self, handle: ItemHandle) -> Option<&mut ItemInstance> {
        self.items.get_mut(&handle)
    }

    /// Every tracked instance, placed or not, in handle order.
    pub fn items(&self) -> impl Iterator<Item = (ItemHandle, &ItemInstance)> {
        self.items.iter().map(|(&handle, item)| (handle, item))
    }

    pub fn placed_items(&self) -> impl Iterator<Item = (ItemHandle, &ItemInstance)> {
        self.items().filter(|(_, item)| item.is_placed())
    }

    pub(crate) fn insert_item(&mut self, item: ItemInstance) -> ItemHandle {
        self.next_handle += 1;
        let handle = ItemHandle(self.next_handle);
        self.items.insert(handle, item);
        handle
    }

    pub(crate) fn take_item(&mut self, handle: ItemHandle) -> Option<ItemInstance> {
        self.items.remove(&handle)
    }

    pub(crate) fn next_placement_order(&mut self) -> PlacementOrder {
        self.next_order += 1;
        PlacementOrder(self.next_order)
    }

    /// Distinct items touching any cell of `handle` orthogonally.
    pub fn adjacent_items(&self, handle: ItemHandle) -> BTreeSet<ItemHandle> {
        let Some(item) = self.item(handle) else {
            return BTreeSet::new();
        };
        item.cells()
            .iter()
            .flat_map(|&cell| self.grid.adjacent(cell))
            .filter_map(|neighbor| self.grid.item_at(neighbor))
            .filter(|&occupant| occupant != handle)
            .collect()
    }

    /// Occupied cells of other items bordering `handle`'s footprint.
    ///
    /// Works for an item whose cells were already vacated, as long as the
    /// instance itself is still tracked.
    pub fn neighbor_positions(&self, handle: ItemHandle) -> BTreeSet<Position> {
        let Some(item) = self.item(handle) else {
            return BTreeSet::new();
        };
        item.cells()
            .iter()
            .flat_map(|&cell| self.grid.adjacent(cell))
            .filter(|neighbor| !item.cells().contains(neighbor))
            .filter(|&neighbor| {
                self.grid
                    .item_at(neighbor)
                    .is_some_and(|occupant| occupant != handle)
            })
            .collect()
    }

    /// Multiset of definition ids of `handles`.
    pub fn ids_of(&self, handles: &[ItemHandle]) -> IdCounts {
        handles
            .iter()
            .filter_map(|&handle| self.item(handle))
            .map(ItemInstance::item_id)
            .collect()
    }

    /// Whether `handles` form one component under cell adjacency.
    pub fn is_connected(&self, handles: &[ItemHandle]) -> bool {
        let Some(&start) = handles.first() else {
            return false;
        };
        let members: BTreeSet<ItemHandle> = handles.iter().copied().collect();
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for next in self.adjacent_items(current) {
                if members.contains(&next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len() == members.len()
    }

    /// Moves `handle` into `group`, leaving whatever group it was in before.
    pub(crate) fn enroll(
        &mut self,
        handle: ItemHandle,
        group: GroupId,
        bonus: Option<Arc<BonusDefinition>>,
        state: ConnectionState,
    ) {
        let Some(item) = self.items.get_mut(&handle) else {
            return;
        };
        if let Some(previous) = item.group
            && previous != group
        {
            self.groups.detach(previous, handle);
        }
        if let Some(target) = self.groups.get_mut(group)
            && !target.contains(handle)
        {
            target.members.push(handle);
        }
        item.assign(group, bonus, state);
    }

    /// Detaches `handle` from its group and clears its connection data.
    pub(crate) fn release(&mut self, handle: ItemHandle) -> Option<GroupId> {
        let item = self.items.get_mut(&handle)?;
        let group = item.group?;
        item.clear_connection();
        self.groups.detach(group, handle);
        Some(group)
    }

    /// Removes `group` and clears every remaining member. Returns the members.
    pub(crate) fn dissolve(&mut self, group: GroupId) -> Vec<ItemHandle> {
        let Some(removed) = self.groups.remove(group) else {
            return Vec::new();
        };
        for &member in &removed.members {
            if let Some(item) = self.items.get_mut(&member)
                && item.group == Some(group)
            {
                item.clear_connection();
            }
        }
        removed.members
    }

    /// Writes `bonus` and `state` onto `group` and all of its members.
    pub(crate) fn set_group_outcome(
        &mut self,
        group: GroupId,
        bonus: Option<Arc<BonusDefinition>>,
        state: ConnectionState,
    ) {
        let Some(entry) = self.groups.get_mut(group) else {
            return;
        };
        entry.bonus = bonus.clone();
        entry.state = state;
        let members = entry.members.clone();
        for member in members {
            if let Some(item) = self.items.get_mut(&member) {
                item.assign(group, bonus.clone(), state);
            }
        }
    }

    /// Verifies the structural invariants of grid, items and groups.
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.check_occupancy()?;
        self.check_memberships()?;
        self.check_groups()
    }

    fn check_occupancy(&self) -> Result<(), InvariantViolation> {
        let mut claimed: BTreeMap<Position, ItemHandle> = BTreeMap::new();
        let mut weight = 0.0_f32;

        for (handle, item) in self.placed_items() {
            weight += item.definition().weight;
            for &position in item.cells() {
                if let Some(first) = claimed.insert(position, handle) {
                    return Err(InvariantViolation::Overlap {
                        position,
                        first,
                        second: handle,
                    });
                }
                let recorded = self.grid.item_at(position);
                if recorded != Some(handle) {
                    return Err(InvariantViolation::CellOwnership {
                        position,
                        recorded,
                        expected: handle,
                    });
                }
            }
        }

        for (position, occupant) in self.grid.occupied_cells() {
            if claimed.get(&position) != Some(&occupant) {
                return Err(InvariantViolation::StrayCell { position, occupant });
            }
        }

        if (weight - self.grid.current_weight()).abs() > WEIGHT_TOLERANCE {
            return Err(InvariantViolation::WeightDrift {
                recorded: self.grid.current_weight(),
                actual: weight,
            });
        }
        Ok(())
    }

    fn check_memberships(&self) -> Result<(), InvariantViolation> {
        for (handle, item) in self.items() {
            let Some(group_id) = item.group() else {
                if item.bonus().is_some() || item.state() != ConnectionState::Empty {
                    return Err(InvariantViolation::UngroupedWithState(handle));
                }
                continue;
            };
            let Some(group) = self.groups.get(group_id).filter(|g| g.contains(handle)) else {
                return Err(InvariantViolation::DanglingMembership {
                    handle,
                    group: group_id,
                });
            };
            let same_bonus = item.bonus().map(|b| b.id.as_str())
                == group.bonus().map(|b| b.id.as_str());
            if !same_bonus || item.state() != group.state() {
                return Err(InvariantViolation::StateMismatch {
                    group: group_id,
                    handle,
                });
            }
        }
        Ok(())
    }

    fn check_groups(&self) -> Result<(), InvariantViolation> {
        for (id, group) in self.groups.iter() {
            if group.len() < 2 {
                return Err(InvariantViolation::Undersized(id));
            }
            for &member in group.members() {
                let belongs = self
                    .item(member)
                    .is_some_and(|item| item.is_placed() && item.group() == Some(id));
                if !belongs {
                    return Err(InvariantViolation::ForeignMember { group: id, handle: member });
                }
            }
            if !self.is_connected(group.members()) {
                return Err(InvariantViolation::Disconnected(id));
            }
            match group.bonus() {
                Some(bonus) => {
                    if !group.state().is_bonus_bearing() {
                        return Err(InvariantViolation::BonusStateMismatch(id));
                    }
                    if IdCounts::from_ids(&bonus.requirements) != self.ids_of(group.members()) {
                        return Err(InvariantViolation::RecipeMismatch(id));
                    }
                }
                None => {
                    if group.state() != ConnectionState::Waiting {
                        return Err(InvariantViolation::BonusStateMismatch(id));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ItemDefinition;
    use crate::shape::{Rotation, ShapeMask};

    fn place(state: &mut InventoryState, def: &Arc<ItemDefinition>, x: i32, y: i32) -> ItemHandle {
        let handle = state.insert_item(ItemInstance::new(Arc::clone(def), Rotation::NONE));
        let order = state.next_placement_order();
        let item = state.item_mut(handle).unwrap();
        item.set_anchor(Position::new(x, y), order);
        let cells = item.cells().clone();
        state.grid.occupy(handle, &cells, def.weight);
        handle
    }

    fn single() -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::new("001", "Stone", 1.0, ShapeMask::single()))
    }

    #[test]
    fn adjacency_follows_cells_not_anchor() {
        let mut state = InventoryState::new(&InventoryConfig::default());
        let long = Arc::new(ItemDefinition::new("bar", "Bar", 1.0, ShapeMask::filled(3, 1)));
        let bar = place(&mut state, &long, 0, 0);
        let tail = place(&mut state, &single(), 2, 1);
        let far = place(&mut state, &single(), 5, 4);

        assert_eq!(state.adjacent_items(bar), BTreeSet::from([tail]));
        assert!(state.is_connected(&[bar, tail]));
        assert!(!state.is_connected(&[bar, far]));
        assert_eq!(
            state.neighbor_positions(tail),
            BTreeSet::from([Position::new(2, 0)])
        );
    }

    #[test]
    fn enroll_moves_between_groups() {
        let mut state = InventoryState::new(&InventoryConfig::default());
        let def = single();
        let a = place(&mut state, &def, 0, 0);
        let b = place(&mut state, &def, 1, 0);

        let waiting = state
            .groups
            .create(Vec::new(), None, ConnectionState::Waiting);
        state.enroll(a, waiting, None, ConnectionState::Waiting);
        state.enroll(b, waiting, None, ConnectionState::Waiting);
        assert_eq!(state.check_invariants(), Ok(()));

        let other = state
            .groups
            .create(Vec::new(), None, ConnectionState::Waiting);
        state.enroll(a, other, None, ConnectionState::Waiting);
        assert_eq!(state.groups.get(waiting).unwrap().members(), &[b]);
        assert!(matches!(
            state.check_invariants(),
            Err(InvariantViolation::Undersized(_))
        ));

        state.dissolve(waiting);
        state.dissolve(other);
        assert_eq!(state.check_invariants(), Ok(()));
        assert_eq!(state.item(a).unwrap().state(), ConnectionState::Empty);
    }

    #[test]
    fn detects_weight_drift() {
        let mut state = InventoryState::new(&InventoryConfig::default());
        place(&mut state, &single(), 0, 0);
        state.grid.occupy(ItemHandle(99), &BTreeSet::new(), 2.0);
        assert!(matches!(
            state.check_invariants(),
            Err(InvariantViolation::WeightDrift { .. })
        ));
    }
}
