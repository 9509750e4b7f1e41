//! Unified error types surfaced by the runtime API.
//!
//! Wraps worker coordination failures and inventory rejections so clients can
//! bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use inventory_core::{ConfigError, PlacementError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("inventory worker command channel closed")]
    CommandChannelClosed,

    #[error("inventory worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("inventory worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("item id {0:?} is not in the catalog")]
    UnknownDefinition(String),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("invalid inventory config")]
    Config(#[from] ConfigError),

    #[error("failed to load content: {0}")]
    Content(String),
}
