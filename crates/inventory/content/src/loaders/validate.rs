//! Cross-file consistency checks.

use std::collections::BTreeSet;

use inventory_core::InventoryConfig;

use crate::Content;
use crate::loaders::LoadResult;

/// Checks that identifiers are unique and every recipe is satisfiable.
///
/// A recipe is satisfiable when it names only known items and asks for at
/// least [`InventoryConfig::MIN_GROUP_SIZE`] of them.
pub fn validate_content(content: &Content) -> LoadResult<()> {
    let mut item_ids = BTreeSet::new();
    for item in &content.items {
        if !item_ids.insert(item.id.as_str()) {
            anyhow::bail!("Duplicate item id {}", item.id);
        }
        if !(item.weight.is_finite() && item.weight > 0.0) {
            anyhow::bail!("Item {} has invalid weight {}", item.id, item.weight);
        }
    }

    let mut bonus_ids = BTreeSet::new();
    for bonus in &content.bonuses {
        if !bonus_ids.insert(bonus.id.as_str()) {
            anyhow::bail!("Duplicate bonus id {}", bonus.id);
        }
        if bonus.requirement_count() < InventoryConfig::MIN_GROUP_SIZE {
            anyhow::bail!(
                "Bonus {} needs at least {} items, has {}",
                bonus.id,
                InventoryConfig::MIN_GROUP_SIZE,
                bonus.requirement_count()
            );
        }
        if let Some(unknown) = bonus
            .requirements
            .iter()
            .find(|id| !item_ids.contains(id.as_str()))
        {
            anyhow::bail!("Bonus {} requires unknown item {}", bonus.id, unknown);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use inventory_core::{BonusDefinition, ItemDefinition, ShapeMask};

    use super::*;

    fn content(bonuses: Vec<BonusDefinition>) -> Content {
        Content {
            config: InventoryConfig::default(),
            items: vec![
                ItemDefinition::new("001", "Sword", 1.5, ShapeMask::filled(3, 1)),
                ItemDefinition::new("002", "Potion", 0.5, ShapeMask::single()),
            ],
            bonuses,
        }
    }

    #[test]
    fn accepts_consistent_content() {
        let ok = content(vec![BonusDefinition::new("B1", "Pair", ["002", "002"])]);
        assert!(validate_content(&ok).is_ok());
    }

    #[test]
    fn rejects_unknown_requirement() {
        let bad = content(vec![BonusDefinition::new("B1", "Pair", ["002", "404"])]);
        let err = validate_content(&bad).unwrap_err();
        assert_eq!(err.to_string(), "Bonus B1 requires unknown item 404");
    }

    #[test]
    fn rejects_duplicates_and_single_item_recipes() {
        let dup = content(vec![
            BonusDefinition::new("B1", "Pair", ["002", "002"]),
            BonusDefinition::new("B1", "Again", ["001", "002"]),
        ]);
        assert!(validate_content(&dup).is_err());

        let single = content(vec![BonusDefinition::new("B1", "Solo", ["001"])]);
        assert!(validate_content(&single).is_err());
    }
}
