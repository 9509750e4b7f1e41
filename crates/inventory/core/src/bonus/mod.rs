//! Bonus catalog matcher.
//!
//! Every query reduces the given item ids to a count map (id → occurrences)
//! and compares it against the precomputed count map of each bonus recipe.
//! Order of ids never matters; duplicates always do.

mod counts;

pub use counts::IdCounts;

use std::sync::Arc;

use crate::env::BonusDefinition;

#[derive(Clone, Debug)]
struct CatalogEntry {
    bonus: Arc<BonusDefinition>,
    counts: IdCounts,
}

/// Immutable set of bonus recipes with multiset queries.
///
/// Shared with the engine through an `Arc`; nothing in the crate holds a
/// process-wide instance.
#[derive(Clone, Debug, Default)]
pub struct BonusCatalog {
    entries: Vec<CatalogEntry>,
}

impl BonusCatalog {
    pub fn new(bonuses: impl IntoIterator<Item = BonusDefinition>) -> Self {
        Self::from_shared(bonuses.into_iter().map(Arc::new))
    }

    pub fn from_shared(bonuses: impl IntoIterator<Item = Arc<BonusDefinition>>) -> Self {
        let entries = bonuses
            .into_iter()
            .map(|bonus| CatalogEntry {
                counts: IdCounts::from_ids(&bonus.requirements),
                bonus,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bonuses in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<BonusDefinition>> {
        self.entries.iter().map(|entry| &entry.bonus)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<BonusDefinition>> {
        self.iter().find(|bonus| bonus.id == id)
    }

    /// The lowest-priority bonus whose recipe is exactly `ids`.
    ///
    /// Equal priorities resolve to the earlier catalog entry.
    pub fn best_exact<S: AsRef<str>>(&self, ids: &[S]) -> Option<&Arc<BonusDefinition>> {
        self.best_exact_counts(&IdCounts::from_ids(ids))
    }

    pub fn best_exact_counts(&self, counts: &IdCounts) -> Option<&Arc<BonusDefinition>> {
        self.entries
            .iter()
            .filter(|entry| entry.counts == *counts)
            .min_by_key(|entry| entry.bonus.priority)
            .map(|entry| &entry.bonus)
    }

    /// Bonuses whose recipe contains `ids` as a sub-multiset.
    pub fn any_containing<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&Arc<BonusDefinition>> {
        let counts = IdCounts::from_ids(ids);
        self.containing(&counts).collect()
    }

    /// Whether some recipe contains `counts`. When false, no superset of
    /// `counts` can match anything either.
    pub fn any_contains(&self, counts: &IdCounts) -> bool {
        self.containing(counts).next().is_some()
    }

    /// Bonuses reachable from `ids` by adding more items.
    pub fn higher<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&Arc<BonusDefinition>> {
        self.higher_counts(&IdCounts::from_ids(ids))
    }

    pub fn higher_counts(&self, counts: &IdCounts) -> Vec<&Arc<BonusDefinition>> {
        self.containing(counts)
            .filter(|bonus| bonus.requirement_count() > counts.total())
            .collect()
    }

    /// Whether adding exactly one item to `ids` could complete `candidate`.
    pub fn has_direct_upgrade<S: AsRef<str>>(&self, ids: &[S], candidate: &BonusDefinition) -> bool {
        let counts = IdCounts::from_ids(ids);
        candidate.requirement_count() == counts.total() + 1
            && counts.is_submultiset_of(&IdCounts::from_ids(&candidate.requirements))
    }

    /// Whether any `higher()` bonus of `counts` is a direct one-item upgrade.
    pub fn has_any_direct_upgrade(&self, counts: &IdCounts) -> bool {
        self.containing(counts)
            .any(|bonus| bonus.requirement_count() == counts.total() + 1)
    }

    fn containing<'a>(
        &'a self,
        counts: &IdCounts,
    ) -> impl Iterator<Item = &'a Arc<BonusDefinition>> {
        self.entries
            .iter()
            .filter(move |entry| counts.is_submultiset_of(&entry.counts))
            .map(|entry| &entry.bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BonusCatalog {
        BonusCatalog::new([
            BonusDefinition::new("B1", "Pair", ["002", "002"]),
            BonusDefinition::new("B2", "Triple", ["002", "002", "002"]).with_priority(5),
            BonusDefinition::new("B3", "Mixed", ["001", "002"]).with_priority(2),
            BonusDefinition::new("B4", "Mixed Alt", ["002", "001"]).with_priority(1),
            BonusDefinition::new("B5", "Kit", ["001", "002", "003"]),
        ])
    }

    #[test]
    fn best_exact_compares_multisets() {
        let catalog = catalog();
        assert_eq!(catalog.best_exact(&["002", "002"]).unwrap().id, "B1");
        assert_eq!(catalog.best_exact(&["002", "002", "002"]).unwrap().id, "B2");
        assert!(catalog.best_exact(&["002"]).is_none());
        assert!(catalog.best_exact(&["002", "002", "001"]).is_none());
    }

    #[test]
    fn best_exact_prefers_lowest_priority() {
        let catalog = catalog();
        assert_eq!(catalog.best_exact(&["001", "002"]).unwrap().id, "B4");
        assert_eq!(catalog.best_exact(&["002", "001"]).unwrap().id, "B4");
    }

    #[test]
    fn best_exact_keeps_catalog_order_on_equal_priority() {
        let catalog = BonusCatalog::new([
            BonusDefinition::new("X", "First", ["a", "b"]),
            BonusDefinition::new("Y", "Second", ["b", "a"]),
        ]);
        for _ in 0..3 {
            assert_eq!(catalog.best_exact(&["a", "b"]).unwrap().id, "X");
        }
    }

    #[test]
    fn containing_respects_duplicate_counts() {
        let catalog = catalog();
        let ids: Vec<_> = catalog
            .any_containing(&["002", "002"])
            .into_iter()
            .map(|bonus| bonus.id.as_str())
            .collect();
        assert_eq!(ids, ["B1", "B2"]);

        let single: Vec<_> = catalog
            .any_containing(&["001"])
            .into_iter()
            .map(|bonus| bonus.id.as_str())
            .collect();
        assert_eq!(single, ["B3", "B4", "B5"]);
    }

    #[test]
    fn higher_requires_strictly_more_items() {
        let catalog = catalog();
        let higher: Vec<_> = catalog
            .higher(&["002", "002"])
            .into_iter()
            .map(|bonus| bonus.id.as_str())
            .collect();
        assert_eq!(higher, ["B2"]);
        assert!(catalog.higher(&["002", "002", "002"]).is_empty());
    }

    #[test]
    fn direct_upgrade_needs_exactly_one_more_item() {
        let catalog = catalog();
        let kit = catalog.get("B5").unwrap();
        assert!(catalog.has_direct_upgrade(&["001", "003"], kit));
        assert!(!catalog.has_direct_upgrade(&["001"], kit));
        assert!(!catalog.has_direct_upgrade(&["001", "004"], kit));

        assert!(catalog.has_any_direct_upgrade(&IdCounts::from_ids(&["002", "002"])));
        assert!(!catalog.has_any_direct_upgrade(&IdCounts::from_ids(&["002", "002", "002"])));
    }
}
