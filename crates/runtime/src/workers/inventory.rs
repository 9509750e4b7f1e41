//! Inventory worker that owns the authoritative [`inventory_core::Inventory`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), applies
//! them in arrival order, and publishes events to the EventBus.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use inventory_core::{
    BonusDefinition, Inventory, InventoryError, ItemCatalog, ItemHandle, ItemOracle, Position,
    Rotation,
};

use crate::api::{InventorySnapshot, Result, RuntimeError};
use crate::events::{BonusEvent, Event, EventBus, PlacementEvent};

/// Commands that can be sent to the inventory worker
pub enum Command {
    /// Create an unplaced instance of a catalog item.
    Spawn {
        item_id: String,
        rotation: Rotation,
        reply: oneshot::Sender<Result<ItemHandle>>,
    },
    /// Turn an unplaced item a quarter clockwise.
    Rotate {
        handle: ItemHandle,
        reply: oneshot::Sender<Result<Rotation>>,
    },
    /// Drop an item with its top-left corner at `(x, y)`.
    Place {
        handle: ItemHandle,
        x: i32,
        y: i32,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Lift an item off the grid and destroy it.
    Remove {
        handle: ItemHandle,
        reply: oneshot::Sender<bool>,
    },
    /// Query the current inventory (read-only).
    Snapshot {
        reply: oneshot::Sender<InventorySnapshot>,
    },
}

/// Background task that processes inventory commands.
pub struct InventoryWorker {
    inventory: Inventory,
    items: ItemCatalog,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl InventoryWorker {
    /// Creates a new worker and bridges bonus notifications onto the bus.
    pub fn new(
        mut inventory: Inventory,
        items: ItemCatalog,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        let bus = event_bus.clone();
        inventory.subscribe(move |bonuses: &[Arc<BonusDefinition>]| {
            bus.publish(Event::Bonus(BonusEvent::Changed {
                bonuses: bonuses.iter().map(|bonus| bonus.id.clone()).collect(),
                stats: bonuses.iter().map(|bonus| bonus.stats).sum(),
            }));
        });

        info!(
            "InventoryWorker initialized with {}x{} grid, {} item definitions",
            inventory.config().width,
            inventory.config().height,
            items.len()
        );

        Self {
            inventory,
            items,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        debug!("InventoryWorker stopped: all handles dropped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Spawn {
                item_id,
                rotation,
                reply,
            } => {
                let result = self.spawn(item_id, rotation);
                if reply.send(result).is_err() {
                    debug!("Spawn reply channel closed (caller dropped)");
                }
            }
            Command::Rotate { handle, reply } => {
                let result = self.inventory.rotate(handle).map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!("Rotate reply channel closed (caller dropped)");
                }
            }
            Command::Place {
                handle,
                x,
                y,
                reply,
            } => {
                let result = self.place(handle, x, y);
                if reply.send(result).is_err() {
                    debug!("Place reply channel closed (caller dropped)");
                }
            }
            Command::Remove { handle, reply } => {
                let removed = self.remove(handle);
                if reply.send(removed).is_err() {
                    debug!("Remove reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply
                    .send(InventorySnapshot::capture(&self.inventory))
                    .is_err()
                {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn spawn(&mut self, item_id: String, rotation: Rotation) -> Result<ItemHandle> {
        let definition = self
            .items
            .definition(&item_id)
            .ok_or(RuntimeError::UnknownDefinition(item_id))?;
        Ok(self.inventory.spawn(definition, rotation))
    }

    fn place(&mut self, handle: ItemHandle, x: i32, y: i32) -> Result<()> {
        let anchor = Position::new(x, y);
        match self.inventory.try_place(handle, x, y) {
            Ok(()) => {
                let item_id = self
                    .inventory
                    .item(handle)
                    .map(|item| item.item_id().to_owned())
                    .unwrap_or_default();
                info!("Placed {} ({}) at {}", handle, item_id, anchor);
                self.event_bus
                    .publish(Event::Placement(PlacementEvent::Placed {
                        handle,
                        item_id,
                        anchor,
                    }));
                Ok(())
            }
            Err(err) => {
                info!("Rejected placement of {} at {}: {}", handle, anchor, err);
                self.event_bus
                    .publish(Event::Placement(PlacementEvent::Rejected {
                        handle,
                        anchor,
                        code: err.error_code().to_owned(),
                        reason: err.to_string(),
                    }));
                Err(err.into())
            }
        }
    }

    fn remove(&mut self, handle: ItemHandle) -> bool {
        let Some(item_id) = self
            .inventory
            .item(handle)
            .map(|item| item.item_id().to_owned())
        else {
            return false;
        };
        if !self.inventory.remove(handle) {
            return false;
        }

        info!("Removed {} ({})", handle, item_id);
        self.event_bus
            .publish(Event::Placement(PlacementEvent::Removed { handle, item_id }));
        true
    }
}
