//! Inventory configuration loader.

use std::path::Path;

use inventory_core::InventoryConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for inventory configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Out-of-range values are rejected here rather than at inventory construction.
    pub fn load(path: &Path) -> LoadResult<InventoryConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<InventoryConfig> {
        let config: InventoryConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid inventory config: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_validates() {
        let config = ConfigLoader::parse("width = 6\nheight = 3\nmax_weight = 12.5\n").unwrap();
        assert_eq!(config, InventoryConfig::with_size(6, 3).max_weight(12.5));

        let err = ConfigLoader::parse("width = 9\nheight = 3\nmax_weight = 12.5\n").unwrap_err();
        assert!(err.to_string().starts_with("Invalid inventory config"));
    }
}
