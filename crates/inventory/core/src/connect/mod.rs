//! Connectivity and grouping engine.
//!
//! Keeps the placed items partitioned into groups as items come and go:
//!
//! - Insertions first try to extend an adjacent bonus group that is not
//!   Closed, then to form a new group from the item and its free neighbors,
//!   and only then fall back to [`ConnectionEngine::rebuild_preserving`].
//! - Removals shrink, re-match or dissolve the affected group, rebuild the
//!   region it occupied, and recheck the freed neighborhood.
//! - [`ConnectionEngine::settle_waiting`] closes every operation by deriving
//!   the Waiting groups from what is left.
//!
//! Closed and Opened groups are never touched except through their own
//! members' removal; every path is infallible.

mod linear;
mod rebuild;
mod subsets;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::bonus::{BonusCatalog, IdCounts};
use crate::config::InventoryConfig;
use crate::env::BonusDefinition;
use crate::state::{
    ConnectionState, GroupId, InventoryState, ItemHandle, PlacementOrder, Position,
};

use rebuild::RebuildScope;

/// Mutable view over an inventory's state paired with the bonus catalog.
///
/// Borrowed for the duration of one operation, in the same way the grid
/// store is.
pub struct ConnectionEngine<'a> {
    state: &'a mut InventoryState,
    catalog: &'a BonusCatalog,
}

impl<'a> ConnectionEngine<'a> {
    pub fn new(state: &'a mut InventoryState, catalog: &'a BonusCatalog) -> Self {
        Self { state, catalog }
    }

    /// Reacts to an item having been placed over `position`.
    pub fn on_insert(&mut self, position: Position) {
        let Some(handle) = self.state.grid().item_at(position) else {
            return;
        };
        let Some(item) = self.state.item(handle) else {
            return;
        };
        if item.is_bonus_bearing() {
            return;
        }

        let neighbors = self.state.adjacent_items(handle);
        let bearing: BTreeSet<GroupId> = neighbors
            .iter()
            .filter_map(|&neighbor| self.state.item(neighbor))
            .filter(|neighbor| neighbor.is_bonus_bearing())
            .filter_map(|neighbor| neighbor.group())
            .collect();

        for group in bearing {
            if self.extend_group(group, handle) {
                return;
            }
        }

        if self.form_new_group(handle, &neighbors) {
            return;
        }

        self.rebuild_preserving(handle);
    }

    /// Adds `handle` to an Opened group if the grown multiset matches a bonus.
    pub fn extend_group(&mut self, group: GroupId, handle: ItemHandle) -> bool {
        let Some(entry) = self.state.groups().get(group) else {
            return false;
        };
        if !entry.is_bonus_bearing() || entry.state() == ConnectionState::Closed {
            return false;
        }

        let mut members = entry.members().to_vec();
        members.push(handle);
        let counts = self.state.ids_of(&members);
        let Some(bonus) = self.catalog.best_exact_counts(&counts).cloned() else {
            return false;
        };
        let state = self.incremental_state(&counts);

        self.state
            .enroll(handle, group, Some(Arc::clone(&bonus)), state);
        self.state.set_group_outcome(group, Some(Arc::clone(&bonus)), state);

        tracing::debug!(
            "Group {} extended with {} to bonus {} ({})",
            group,
            handle,
            bonus.id,
            state
        );
        true
    }

    /// Groups `handle` with its free neighbors.
    ///
    /// Tries all free neighbors at once, then grows a candidate one neighbor
    /// at a time in placement order.
    pub fn form_new_group(&mut self, handle: ItemHandle, neighbors: &BTreeSet<ItemHandle>) -> bool {
        let mut free: Vec<(PlacementOrder, ItemHandle)> = neighbors
            .iter()
            .filter_map(|&neighbor| {
                self.state
                    .item(neighbor)
                    .filter(|item| !item.is_bonus_bearing())
                    .map(|item| (item.placement_order(), neighbor))
            })
            .collect();
        if free.is_empty() {
            return false;
        }
        free.sort_unstable();

        let mut all = vec![handle];
        all.extend(free.iter().map(|&(_, neighbor)| neighbor));
        if self.try_form(&all) {
            return true;
        }

        let mut grown = vec![handle];
        for &(_, neighbor) in &free[..free.len() - 1] {
            grown.push(neighbor);
            if self.try_form(&grown) {
                return true;
            }
        }
        false
    }

    fn try_form(&mut self, members: &[ItemHandle]) -> bool {
        let counts = self.state.ids_of(members);
        let Some(bonus) = self.catalog.best_exact_counts(&counts).cloned() else {
            return false;
        };
        let state = self.incremental_state(&counts);

        let group = self
            .state
            .groups
            .create(Vec::new(), Some(Arc::clone(&bonus)), state);
        for &member in members {
            self.state
                .enroll(member, group, Some(Arc::clone(&bonus)), state);
        }

        tracing::debug!(
            "Group {} formed with bonus {} ({}, {} members)",
            group,
            bonus.id,
            state,
            members.len()
        );
        true
    }

    /// Reacts to `handle` having been lifted off the grid.
    ///
    /// The item must still be tracked so its group and footprint can be read;
    /// its cells must already be vacated and the instance lifted.
    pub fn on_remove(&mut self, handle: ItemHandle) {
        let Some(group) = self.state.item(handle).and_then(|item| item.group()) else {
            return;
        };
        let neighbors = self.state.neighbor_positions(handle);
        self.state.release(handle);

        let Some(entry) = self.state.groups().get(group) else {
            self.recheck(&neighbors);
            return;
        };

        // Waiting groups are re-derived by the settle pass.
        if entry.is_bonus_bearing() {
            let remaining = entry.members().to_vec();
            if remaining.len() < InventoryConfig::MIN_GROUP_SIZE {
                self.state.dissolve(group);
                tracing::debug!("Group {} dissolved after losing {}", group, handle);
            } else if let Some(bonus) = self.rematch(&remaining) {
                let counts = self.state.ids_of(&remaining);
                let state = self.incremental_state(&counts);
                tracing::debug!(
                    "Group {} shrank to bonus {} ({})",
                    group,
                    bonus.id,
                    state
                );
                self.state.set_group_outcome(group, Some(bonus), state);
            } else {
                let former = self.state.dissolve(group);
                tracing::debug!(
                    "Group {} dissolved after losing {}; rebuilding {} items",
                    group,
                    handle,
                    former.len()
                );
                self.rebuild(RebuildScope::Around(former));
            }
        }

        self.recheck(&neighbors);
    }

    /// Bonus for the shrunk member set, provided it is still connected.
    fn rematch(&self, members: &[ItemHandle]) -> Option<Arc<BonusDefinition>> {
        if !self.state.is_connected(members) {
            return None;
        }
        self.catalog
            .best_exact_counts(&self.state.ids_of(members))
            .cloned()
    }

    /// Re-runs insertion logic over `positions` and, once, over the
    /// neighborhoods of Waiting or Opened occupants found there.
    pub fn recheck(&mut self, positions: &BTreeSet<Position>) {
        let mut processed = BTreeSet::new();
        let second_wave = self.recheck_wave(positions, &mut processed, true);
        self.recheck_wave(&second_wave, &mut processed, false);
    }

    fn recheck_wave(
        &mut self,
        positions: &BTreeSet<Position>,
        processed: &mut BTreeSet<ItemHandle>,
        collect: bool,
    ) -> BTreeSet<Position> {
        let mut next = BTreeSet::new();
        for &position in positions {
            let Some(handle) = self.state.grid().item_at(position) else {
                continue;
            };
            if !processed.insert(handle) {
                continue;
            }
            if self
                .state
                .item(handle)
                .is_some_and(|item| !item.is_bonus_bearing())
            {
                self.on_insert(position);
            }
            if !collect {
                continue;
            }

            let spreads = self.state.item(handle).is_some_and(|item| {
                matches!(
                    item.state(),
                    ConnectionState::Waiting | ConnectionState::Opened
                )
            });
            if spreads {
                for neighbor in self.state.neighbor_positions(handle) {
                    let closed = self
                        .state
                        .grid()
                        .item_at(neighbor)
                        .and_then(|occupant| self.state.item(occupant))
                        .is_some_and(|occupant| occupant.state() == ConnectionState::Closed);
                    if !closed {
                        next.insert(neighbor);
                    }
                }
            }
        }
        next
    }

    /// Derives Waiting groups from the current free components.
    ///
    /// A component of two or more free items is Waiting when some larger
    /// bonus still contains its multiset. A Waiting group whose member set is
    /// unchanged keeps its id; every other bonus-less group is dissolved.
    pub fn settle_waiting(&mut self) {
        let mut pending: Vec<Vec<ItemHandle>> = self
            .free_components(&RebuildScope::All)
            .into_iter()
            .filter(|component| component.len() >= InventoryConfig::MIN_GROUP_SIZE)
            .filter(|component| {
                !self
                    .catalog
                    .higher_counts(&self.state.ids_of(component))
                    .is_empty()
            })
            .collect();

        let stale: Vec<GroupId> = self
            .state
            .groups()
            .iter()
            .filter(|(_, group)| !group.is_bonus_bearing())
            .filter_map(|(id, group)| {
                match pending.iter().position(|members| group.has_members(members)) {
                    Some(index) => {
                        pending.swap_remove(index);
                        None
                    }
                    None => Some(id),
                }
            })
            .collect();

        for id in stale {
            self.state.dissolve(id);
        }

        for members in pending {
            let group = self
                .state
                .groups
                .create(Vec::new(), None, ConnectionState::Waiting);
            for &member in &members {
                self.state
                    .enroll(member, group, None, ConnectionState::Waiting);
            }
            tracing::debug!("Group {} waiting with {} members", group, members.len());
        }
    }

    /// Opened while some larger bonus still contains the multiset.
    fn incremental_state(&self, counts: &IdCounts) -> ConnectionState {
        if self.catalog.higher_counts(counts).is_empty() {
            ConnectionState::Closed
        } else {
            ConnectionState::Opened
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ItemDefinition;
    use crate::shape::{Rotation, ShapeMask};
    use crate::state::ItemInstance;

    struct Fixture {
        state: InventoryState,
        catalog: BonusCatalog,
    }

    impl Fixture {
        fn new(bonuses: Vec<BonusDefinition>) -> Self {
            Self {
                state: InventoryState::new(&InventoryConfig::default()),
                catalog: BonusCatalog::new(bonuses),
            }
        }

        fn drop_in(&mut self, id: &str, x: i32, y: i32) -> ItemHandle {
            let def = Arc::new(ItemDefinition::new(id, id, 0.1, ShapeMask::single()));
            let handle = self
                .state
                .insert_item(ItemInstance::new(def, Rotation::NONE));
            let order = self.state.next_placement_order();
            let item = self.state.item_mut(handle).unwrap();
            item.set_anchor(Position::new(x, y), order);
            let cells = item.cells().clone();
            self.state.grid.occupy(handle, &cells, 0.1);

            let mut engine = ConnectionEngine::new(&mut self.state, &self.catalog);
            engine.on_insert(Position::new(x, y));
            engine.settle_waiting();
            handle
        }

        fn lift(&mut self, handle: ItemHandle) {
            let item = self.state.item(handle).unwrap();
            let cells = item.cells().clone();
            self.state.grid.vacate(handle, &cells, 0.1);
            self.state.item_mut(handle).unwrap().lift();

            let mut engine = ConnectionEngine::new(&mut self.state, &self.catalog);
            engine.on_remove(handle);
            engine.settle_waiting();
            self.state.take_item(handle);
        }

        fn state_of(&self, handle: ItemHandle) -> ConnectionState {
            self.state.item(handle).unwrap().state()
        }

        fn bonus_of(&self, handle: ItemHandle) -> Option<&str> {
            self.state
                .item(handle)
                .unwrap()
                .bonus()
                .map(|bonus| bonus.id.as_str())
        }
    }

    #[test]
    fn extend_skips_closed_groups() {
        let mut fx = Fixture::new(vec![
            BonusDefinition::new("AB", "Pair", ["a", "b"]),
            BonusDefinition::new("ABC", "Kit", ["a", "b", "c"]),
        ]);
        let a = fx.drop_in("a", 0, 0);
        let b = fx.drop_in("b", 1, 0);
        assert_eq!(fx.state_of(a), ConnectionState::Opened);

        let c = fx.drop_in("c", 2, 0);
        assert_eq!(fx.bonus_of(c), Some("ABC"));
        assert_eq!(fx.state_of(b), ConnectionState::Closed);

        let extra = fx.drop_in("c", 3, 0);
        assert_eq!(fx.state_of(extra), ConnectionState::Empty);
        assert_eq!(fx.bonus_of(a), Some("ABC"));
        assert_eq!(fx.state.check_invariants(), Ok(()));
    }

    #[test]
    fn form_new_group_grows_in_placement_order() {
        let mut fx = Fixture::new(vec![BonusDefinition::new("XY", "Pair", ["x", "y"])]);
        let y = fx.drop_in("y", 0, 1);
        let z = fx.drop_in("z", 1, 0);
        let x = fx.drop_in("x", 1, 1);

        assert_eq!(fx.bonus_of(x), Some("XY"));
        assert_eq!(fx.bonus_of(y), Some("XY"));
        assert_eq!(fx.state_of(z), ConnectionState::Empty);
    }

    #[test]
    fn partial_recipes_wait_and_keep_their_id() {
        let mut fx = Fixture::new(vec![BonusDefinition::new("KIT", "Kit", ["a", "b", "c"])]);
        let a = fx.drop_in("a", 0, 0);
        let b = fx.drop_in("b", 1, 0);
        assert_eq!(fx.state_of(a), ConnectionState::Waiting);
        let waiting = fx.state.item(a).unwrap().group();
        assert_eq!(waiting, fx.state.item(b).unwrap().group());

        let stray = fx.drop_in("q", 4, 4);
        assert_eq!(fx.state_of(stray), ConnectionState::Empty);
        assert_eq!(fx.state.item(a).unwrap().group(), waiting);

        let c = fx.drop_in("c", 2, 0);
        assert_eq!(fx.bonus_of(c), Some("KIT"));
        assert_eq!(fx.state_of(a), ConnectionState::Closed);
        assert_eq!(fx.state.check_invariants(), Ok(()));
    }

    #[test]
    fn removal_rematches_connected_remainder() {
        let mut fx = Fixture::new(vec![
            BonusDefinition::new("AA", "Pair", ["a", "a"]),
            BonusDefinition::new("AAA", "Triple", ["a", "a", "a"]),
        ]);
        let first = fx.drop_in("a", 0, 0);
        let second = fx.drop_in("a", 1, 0);
        let third = fx.drop_in("a", 1, 1);
        assert_eq!(fx.bonus_of(first), Some("AAA"));
        let group = fx.state.item(first).unwrap().group();

        fx.lift(third);
        assert_eq!(fx.bonus_of(second), Some("AA"));
        assert_eq!(fx.state_of(second), ConnectionState::Opened);
        assert_eq!(fx.state.item(first).unwrap().group(), group);
        assert_eq!(fx.state.check_invariants(), Ok(()));
    }

    #[test]
    fn removal_of_bridge_dissolves_and_rebuilds() {
        let mut fx = Fixture::new(vec![
            BonusDefinition::new("AB", "Pair", ["a", "b"]),
            BonusDefinition::new("ABA", "Trio", ["a", "b", "a"]),
        ]);
        let left = fx.drop_in("a", 0, 0);
        let middle = fx.drop_in("b", 1, 0);
        let right = fx.drop_in("a", 2, 0);
        assert_eq!(fx.bonus_of(right), Some("ABA"));

        let below = fx.drop_in("b", 0, 1);
        assert_eq!(fx.state_of(below), ConnectionState::Empty);

        fx.lift(middle);
        assert_eq!(fx.bonus_of(left), Some("AB"));
        assert_eq!(fx.bonus_of(below), Some("AB"));
        assert_eq!(fx.state_of(right), ConnectionState::Empty);
        assert_eq!(fx.state.check_invariants(), Ok(()));
    }

    #[test]
    fn removing_free_item_is_a_no_op() {
        let mut fx = Fixture::new(vec![BonusDefinition::new("AA", "Pair", ["a", "a"])]);
        let lone = fx.drop_in("z", 3, 3);
        let before = fx.state.groups().len();
        fx.lift(lone);
        assert_eq!(fx.state.groups().len(), before);
        assert_eq!(fx.state.check_invariants(), Ok(()));
    }
}
