//! Bundle of everything an inventory is built from.

use std::sync::Arc;

use inventory_core::{
    BonusCatalog, BonusDefinition, ConfigError, Inventory, InventoryConfig, ItemCatalog,
    ItemDefinition,
};

/// Grid configuration plus the item and bonus catalogs, in file order.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub config: InventoryConfig,
    pub items: Vec<ItemDefinition>,
    pub bonuses: Vec<BonusDefinition>,
}

impl Content {
    pub fn item_catalog(&self) -> ItemCatalog {
        self.items.iter().cloned().collect()
    }

    /// Bonus catalog keeping file order, which breaks priority ties.
    pub fn bonus_catalog(&self) -> BonusCatalog {
        BonusCatalog::new(self.bonuses.iter().cloned())
    }

    /// Empty inventory over this content's grid and bonus catalog.
    pub fn inventory(&self) -> Result<Inventory, ConfigError> {
        Inventory::new(self.config.clone(), Arc::new(self.bonus_catalog()))
    }
}
