//! Content loaders for reading inventory data from files.
//!
//! Each loader parses one RON/TOML document into inventory-core types.
//! [`ContentFactory`] ties them to a data directory and cross-checks the result.

pub mod bonus;
pub mod config;
pub mod factory;
pub mod item;
pub mod validate;

pub use bonus::BonusLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use validate::validate_content;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
