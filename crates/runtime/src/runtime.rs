//! High-level runtime orchestrator.
//!
//! The runtime owns the inventory worker, wires up command/event channels, and
//! exposes a builder-based API for clients.

use tokio::task::JoinHandle;

use inventory_content::{Content, ContentFactory};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::workers::InventoryWorker;

/// Runtime configuration for channel sizing.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that serializes inventory access
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct InventoryRuntime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl InventoryRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker exits once every outstanding handle has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`InventoryRuntime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    content: Option<Content>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Grid configuration and catalogs to run with
    ///
    /// Without it the content embedded in `inventory-content` is used.
    pub fn content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<InventoryRuntime> {
        let content = match self.content {
            Some(content) => content,
            None => ContentFactory::embedded().map_err(|e| RuntimeError::Content(e.to_string()))?,
        };

        let inventory = content.inventory()?;
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (command_tx, command_rx) = tokio::sync::mpsc::channel(self.config.command_buffer_size);

        let worker = InventoryWorker::new(
            inventory,
            content.item_catalog(),
            command_rx,
            event_bus.clone(),
        );
        let worker_handle = tokio::spawn(worker.run());

        Ok(InventoryRuntime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            worker_handle,
        })
    }
}
