use std::collections::BTreeMap;

/// Multiset of item identifiers: id → number of occurrences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdCounts {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl IdCounts {
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Self {
        let mut counts = Self::default();
        for id in ids {
            counts.push(id.as_ref());
        }
        counts
    }

    pub fn push(&mut self, id: &str) {
        *self.counts.entry(id.to_owned()).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn count(&self, id: &str) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Number of ids, duplicates included.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// True when every id occurs in `other` at least as often as in `self`.
    pub fn is_submultiset_of(&self, other: &IdCounts) -> bool {
        self.counts
            .iter()
            .all(|(id, &count)| other.count(id) >= count)
    }
}

impl<'a> FromIterator<&'a str> for IdCounts {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut counts = Self::default();
        for id in iter {
            counts.push(id);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_does_not_matter() {
        assert_eq!(
            IdCounts::from_ids(&["a", "b", "a"]),
            IdCounts::from_ids(&["a", "a", "b"])
        );
        assert_ne!(IdCounts::from_ids(&["a", "b"]), IdCounts::from_ids(&["a", "a", "b"]));
    }

    #[test]
    fn submultiset_counts_duplicates() {
        let pair = IdCounts::from_ids(&["a", "a"]);
        assert!(pair.is_submultiset_of(&IdCounts::from_ids(&["a", "a", "b"])));
        assert!(!pair.is_submultiset_of(&IdCounts::from_ids(&["a", "b"])));
        assert!(IdCounts::default().is_submultiset_of(&pair));
    }
}
