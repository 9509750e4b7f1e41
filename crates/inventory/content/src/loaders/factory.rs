//! Content factory for building inventories from data files.

use std::path::{Path, PathBuf};

use inventory_core::{BonusDefinition, InventoryConfig, ItemDefinition};

use crate::Content;
use crate::loaders::{
    BonusLoader, ConfigLoader, ItemLoader, LoadResult, validate_content,
};

const EMBEDDED_CONFIG: &str = include_str!("../../data/config.toml");
const EMBEDDED_ITEMS: &str = include_str!("../../data/items.ron");
const EMBEDDED_BONUSES: &str = include_str!("../../data/bonuses.ron");

/// Content factory that loads all inventory content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// └── bonuses.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Default content compiled into the crate.
    pub fn embedded() -> LoadResult<Content> {
        let content = Content {
            config: ConfigLoader::parse(EMBEDDED_CONFIG)?,
            items: ItemLoader::parse(EMBEDDED_ITEMS)?,
            bonuses: BonusLoader::parse(EMBEDDED_BONUSES)?,
        };
        validate_content(&content)?;
        Ok(content)
    }

    /// Load inventory configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<InventoryConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        let path = self.data_dir.join("items.ron");
        ItemLoader::load(&path)
    }

    /// Load bonus recipes from `bonuses.ron`.
    pub fn load_bonuses(&self) -> LoadResult<Vec<BonusDefinition>> {
        let path = self.data_dir.join("bonuses.ron");
        BonusLoader::load(&path)
    }

    /// Load and cross-check every file.
    ///
    /// A missing `config.toml` falls back to [`InventoryConfig::default`];
    /// the two catalogs are required.
    pub fn load_all(&self) -> LoadResult<Content> {
        let config = if self.data_dir.join("config.toml").exists() {
            self.load_config()?
        } else {
            tracing::debug!(
                "No config.toml in {}, using defaults",
                self.data_dir.display()
            );
            InventoryConfig::default()
        };

        let content = Content {
            config,
            items: self.load_items()?,
            bonuses: self.load_bonuses()?,
        };
        validate_content(&content)?;
        Ok(content)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn test_embedded_content_is_consistent() {
        let content = ContentFactory::embedded().unwrap();
        assert_eq!(content.config, InventoryConfig::default());
        assert_eq!(content.items.len(), 7);
        assert_eq!(content.bonuses.len(), 6);
    }
}
