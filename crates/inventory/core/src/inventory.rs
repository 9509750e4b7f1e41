//! Inventory facade: placement entry points and bonus change tracking.
//!
//! [`Inventory`] owns the [`InventoryState`], validates placements against the
//! grid, and routes every accepted mutation through the
//! [`ConnectionEngine`]. Each `place`/`remove` snapshots the bonus
//! assignment before and after the engine runs and fires the subscribed
//! observers once when it differs.

use std::sync::Arc;

use crate::bonus::BonusCatalog;
use crate::config::{ConfigError, InventoryConfig};
use crate::connect::ConnectionEngine;
use crate::env::{BonusDefinition, BonusStats, ItemDefinition};
use crate::error::PlacementError;
use crate::notify::{BonusNotifier, BonusObserver};
use crate::shape::{Rotation, ShapeMask};
use crate::state::{GroupId, GroupTable, InventoryState, ItemHandle, ItemInstance, Position};

/// A grid inventory bound to one bonus catalog.
#[derive(Debug)]
pub struct Inventory {
    config: InventoryConfig,
    state: InventoryState,
    catalog: Arc<BonusCatalog>,
    notifier: BonusNotifier,
}

impl Inventory {
    pub fn new(config: InventoryConfig, catalog: Arc<BonusCatalog>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: InventoryState::new(&config),
            config,
            catalog,
            notifier: BonusNotifier::new(),
        })
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    pub fn catalog(&self) -> &Arc<BonusCatalog> {
        &self.catalog
    }

    /// Registers an observer for [`BonusObserver::on_bonus_changed`].
    pub fn subscribe(&mut self, observer: impl BonusObserver + 'static) {
        self.notifier.subscribe(observer);
    }

    /// Creates an unplaced instance of `definition`.
    pub fn spawn(&mut self, definition: Arc<ItemDefinition>, rotation: Rotation) -> ItemHandle {
        self.state
            .insert_item(ItemInstance::new(definition, rotation))
    }

    /// Turns an unplaced item a quarter clockwise and returns its new rotation.
    pub fn rotate(&mut self, handle: ItemHandle) -> Result<Rotation, PlacementError> {
        let item = self
            .state
            .item_mut(handle)
            .ok_or(PlacementError::UnknownItem(handle))?;
        if item.is_placed() {
            return Err(PlacementError::AlreadyPlaced(handle));
        }
        let rotation = item.rotation().next();
        item.set_rotation(rotation);
        Ok(rotation)
    }

    /// Whether `definition`, already rotated to `mask`, fits with its top-left
    /// corner at `(x, y)`.
    pub fn can_place(&self, definition: &ItemDefinition, x: i32, y: i32, mask: &ShapeMask) -> bool {
        let cells = mask.translate(Position::new(x, y));
        self.state.grid().can_place(definition.weight, &cells)
    }

    /// Validates placing the unplaced item `handle` at `(x, y)`.
    pub fn check_placement(&self, handle: ItemHandle, x: i32, y: i32) -> Result<(), PlacementError> {
        let item = self
            .state
            .item(handle)
            .ok_or(PlacementError::UnknownItem(handle))?;
        if item.is_placed() {
            return Err(PlacementError::AlreadyPlaced(handle));
        }
        let cells = item.mask().translate(Position::new(x, y));
        self.state
            .grid()
            .check_placement(item.definition().weight, &cells)
    }

    /// Places `handle` at `(x, y)` or reports why it cannot go there.
    ///
    /// A rejected placement leaves the inventory untouched.
    pub fn try_place(&mut self, handle: ItemHandle, x: i32, y: i32) -> Result<(), PlacementError> {
        self.check_placement(handle, x, y)?;

        let anchor = Position::new(x, y);
        let order = self.state.next_placement_order();
        let (cells, weight, trigger) = {
            let item = self
                .state
                .item_mut(handle)
                .ok_or(PlacementError::UnknownItem(handle))?;
            item.set_anchor(anchor, order);
            let cells = item.cells().clone();
            let trigger = if cells.contains(&anchor) {
                anchor
            } else {
                item.mask()
                    .offsets()
                    .next()
                    .map(|(dx, dy)| anchor.offset(dx as i32, dy as i32))
                    .unwrap_or(anchor)
            };
            (cells, item.definition().weight, trigger)
        };
        self.state.grid.occupy(handle, &cells, weight);

        tracing::debug!("Placed {} at {} ({} cells)", handle, anchor, cells.len());
        self.apply(|engine| engine.on_insert(trigger));
        Ok(())
    }

    /// Boolean view of [`Inventory::try_place`].
    pub fn place(&mut self, handle: ItemHandle, x: i32, y: i32) -> bool {
        self.try_place(handle, x, y).is_ok()
    }

    /// Lifts `handle` off the grid and destroys it.
    ///
    /// Unplaced instances are simply discarded. Returns `false` when the
    /// handle is not tracked.
    pub fn remove(&mut self, handle: ItemHandle) -> bool {
        let Some(item) = self.state.item(handle) else {
            return false;
        };
        if !item.is_placed() {
            self.state.take_item(handle);
            return true;
        }

        let cells = item.cells().clone();
        let weight = item.definition().weight;
        self.state.grid.vacate(handle, &cells, weight);
        if let Some(item) = self.state.item_mut(handle) {
            item.lift();
        }

        tracing::debug!("Removed {} from {} cells", handle, cells.len());
        self.apply(|engine| engine.on_remove(handle));
        self.state.take_item(handle);
        self.assert_invariants();
        true
    }

    fn apply(&mut self, operation: impl FnOnce(&mut ConnectionEngine<'_>)) {
        let before = self.bonus_snapshot();
        {
            let mut engine = ConnectionEngine::new(&mut self.state, &self.catalog);
            operation(&mut engine);
            engine.settle_waiting();
        }
        self.assert_invariants();

        if self.bonus_snapshot() != before {
            let bonuses = self.active_bonuses();
            tracing::debug!("Active bonuses changed: {}", self.bonus_label());
            self.notifier.notify(&bonuses);
        }
    }

    fn bonus_snapshot(&self) -> Vec<(GroupId, String)> {
        self.state
            .groups()
            .iter()
            .filter_map(|(id, group)| group.bonus().map(|bonus| (id, bonus.id.clone())))
            .collect()
    }

    fn assert_invariants(&self) {
        debug_assert_eq!(self.state.check_invariants(), Ok(()));
    }

    pub fn item(&self, handle: ItemHandle) -> Option<&ItemInstance> {
        self.state.item(handle)
    }

    /// Placed items in handle order.
    pub fn items(&self) -> impl Iterator<Item = (ItemHandle, &ItemInstance)> {
        self.state.placed_items()
    }

    pub fn item_at(&self, position: Position) -> Option<ItemHandle> {
        self.state.grid().item_at(position)
    }

    pub fn groups(&self) -> &GroupTable {
        &self.state.groups
    }

    /// Bonuses of every live group, in ascending group id order.
    pub fn active_bonuses(&self) -> Vec<Arc<BonusDefinition>> {
        self.state
            .groups()
            .iter()
            .filter_map(|(_, group)| group.bonus().cloned())
            .collect()
    }

    /// Sum of the stat payloads of [`Inventory::active_bonuses`].
    pub fn stat_totals(&self) -> BonusStats {
        self.active_bonuses().iter().map(|bonus| bonus.stats).sum()
    }

    /// Active bonus names joined with `+`, or an empty string.
    pub fn bonus_label(&self) -> String {
        self.active_bonuses()
            .iter()
            .map(|bonus| bonus.name.as_str())
            .collect::<Vec<_>>()
            .join("+")
    }

    pub fn current_weight(&self) -> f32 {
        self.state.grid().current_weight()
    }

    pub fn remaining_weight(&self) -> f32 {
        self.state.grid().remaining_weight()
    }
}
