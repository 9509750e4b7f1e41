//! Data-driven inventory content and loaders.
//!
//! This crate houses the default catalogs and provides loaders for RON/TOML data files:
//! - Item catalogs (data-driven via RON)
//! - Bonus recipes (data-driven via RON)
//! - Grid configuration (data-driven via TOML)
//!
//! Content is consumed by the inventory at construction time and never mutated afterwards.
//!
//! All loaders use inventory-core types directly with serde for RON/TOML deserialization.

pub mod content;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use content::Content;

#[cfg(feature = "loaders")]
pub use loaders::{BonusLoader, ConfigLoader, ContentFactory, ItemLoader, validate_content};
