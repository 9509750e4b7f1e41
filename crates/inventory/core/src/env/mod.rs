//! Read-only catalog data.
//!
//! Item and bonus definitions are immutable records supplied by a catalog
//! loader at startup. The engine only ever reads them, through shared `Arc`s.
mod bonus;
mod items;

pub use bonus::{BonusDefinition, BonusStats};
pub use items::{ItemCatalog, ItemCategory, ItemDefinition, ItemOracle, ShapeKind};
