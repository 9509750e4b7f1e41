//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! mutating the inventory or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use inventory_core::{ItemHandle, Rotation};

use super::errors::{Result, RuntimeError};
use super::snapshot::InventorySnapshot;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Create an unplaced instance of catalog item `item_id`
    pub async fn spawn(&self, item_id: impl Into<String>, rotation: Rotation) -> Result<ItemHandle> {
        let item_id = item_id.into();
        self.request(|reply| Command::Spawn {
            item_id,
            rotation,
            reply,
        })
        .await?
    }

    /// Turn an unplaced item a quarter clockwise
    pub async fn rotate(&self, handle: ItemHandle) -> Result<Rotation> {
        self.request(|reply| Command::Rotate { handle, reply })
            .await?
    }

    /// Place an item with its top-left corner at `(x, y)`
    ///
    /// A rejection comes back as [`RuntimeError::Placement`] and is also
    /// published on [`Topic::Placement`].
    pub async fn place(&self, handle: ItemHandle, x: i32, y: i32) -> Result<()> {
        self.request(|reply| Command::Place { handle, x, y, reply })
            .await?
    }

    /// Remove an item; `false` when the handle is unknown
    pub async fn remove(&self, handle: ItemHandle) -> Result<bool> {
        self.request(|reply| Command::Remove { handle, reply })
            .await
    }

    /// Query the current inventory (read-only snapshot)
    pub async fn snapshot(&self) -> Result<InventorySnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use inventory_runtime::Topic;
    ///
    /// let mut bonus_rx = handle.subscribe(Topic::Bonus);
    /// while let Ok(event) = bonus_rx.recv().await {
    ///     // Refresh the bonus panel
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
