//! Item catalog loader.

use std::path::Path;

use inventory_core::{ItemDefinition, ShapeKind};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFile {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse an item catalog document.
    ///
    /// The shape kind is always derived from the mask, whatever the file says.
    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let file: ItemFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let mut items = file.items;
        for item in &mut items {
            item.shape_kind = ShapeKind::classify(&item.shape);
        }
        Ok(items)
    }
}
