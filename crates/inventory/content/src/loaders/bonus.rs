//! Bonus recipe loader.

use std::path::Path;

use inventory_core::BonusDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Bonus recipe list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusFile {
    pub bonuses: Vec<BonusDefinition>,
}

/// Loader for bonus recipes from RON files.
pub struct BonusLoader;

impl BonusLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<BonusDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<BonusDefinition>> {
        let file: BonusFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse bonus catalog RON: {}", e))?;
        Ok(file.bonuses)
    }
}
