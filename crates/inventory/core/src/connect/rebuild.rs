//! Deterministic regrouping of every item not holding a bonus.
//!
//! Bonus-bearing groups are frozen. The remaining ("free") items are split
//! into connected components; each component yields candidate groups either
//! from the linear partition or from bounded subset enumeration. Candidates
//! are sorted by a total order and committed greedily without overlap.
//! Free items that no candidate claims are left as they are.

use std::cmp::Ordering;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use crate::config::InventoryConfig;
use crate::env::BonusDefinition;
use crate::state::{ConnectionState, GroupId, InventoryState, ItemHandle, PlacementOrder};

use super::ConnectionEngine;
use super::linear::{linear_order, optimal_partition};
use super::subsets::{Adjacency, for_each_connected_subset};

/// Which free items a rebuild may touch.
#[derive(Clone, Debug)]
pub(crate) enum RebuildScope {
    /// Every free item on the grid.
    All,
    /// Only components containing one of these items.
    Around(Vec<ItemHandle>),
}

#[derive(Clone, Debug)]
struct Candidate {
    /// Sorted by placement order.
    members: Vec<ItemHandle>,
    orders: Vec<PlacementOrder>,
    bonus: Arc<BonusDefinition>,
    existing: Option<GroupId>,
}

impl Candidate {
    fn new(state: &InventoryState, members: &[ItemHandle], bonus: Arc<BonusDefinition>) -> Self {
        let mut keyed: Vec<(PlacementOrder, ItemHandle)> = members
            .iter()
            .filter_map(|&handle| state.item(handle).map(|item| (item.placement_order(), handle)))
            .collect();
        keyed.sort_unstable();

        let members: Vec<ItemHandle> = keyed.iter().map(|&(_, handle)| handle).collect();
        let existing = state
            .groups()
            .iter()
            .find(|(_, group)| !group.is_bonus_bearing() && group.has_members(&members))
            .map(|(id, _)| id);

        Self {
            orders: keyed.iter().map(|&(order, _)| order).collect(),
            members,
            bonus,
            existing,
        }
    }

    fn earliest(&self) -> PlacementOrder {
        self.orders.first().copied().unwrap_or(PlacementOrder::UNPLACED)
    }

    /// Existing groups first, then lower priority, earlier placement, more
    /// members, descending bonus id, and finally member placement orders.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .existing
            .is_some()
            .cmp(&self.existing.is_some())
            .then_with(|| self.bonus.priority.cmp(&other.bonus.priority))
            .then_with(|| self.earliest().cmp(&other.earliest()))
            .then_with(|| other.members.len().cmp(&self.members.len()))
            .then_with(|| other.bonus.id.cmp(&self.bonus.id))
            .then_with(|| self.orders.cmp(&other.orders))
    }
}

impl ConnectionEngine<'_> {
    /// Full rebuild triggered by an insertion the incremental paths could not
    /// resolve.
    pub fn rebuild_preserving(&mut self, trigger: ItemHandle) {
        tracing::debug!("Rebuilding free items after insert of {}", trigger);
        self.rebuild(RebuildScope::All);
    }

    pub(crate) fn rebuild(&mut self, scope: RebuildScope) {
        let components = self.free_components(&scope);

        let mut candidates = Vec::new();
        for component in &components {
            match linear_order(self.state, component) {
                Some(ordered) => {
                    for slice in optimal_partition(self.state, self.catalog, &ordered) {
                        candidates.push(Candidate::new(
                            self.state,
                            &ordered[slice.start..slice.end],
                            slice.bonus,
                        ));
                    }
                }
                None => self.collect_subset_candidates(component, &mut candidates),
            }
        }

        tracing::trace!(
            "Rebuild found {} candidates in {} components",
            candidates.len(),
            components.len()
        );

        candidates.sort_by(Candidate::rank);

        let mut claimed: BTreeSet<ItemHandle> = BTreeSet::new();
        let mut committed = 0usize;
        for candidate in candidates {
            if candidate.members.iter().any(|member| claimed.contains(member)) {
                continue;
            }
            claimed.extend(candidate.members.iter().copied());
            self.commit(candidate);
            committed += 1;
        }

        tracing::debug!(
            "Rebuild committed {} groups covering {} items",
            committed,
            claimed.len()
        );
    }

    /// Connected components of placed items without a bonus.
    ///
    /// Components are listed by their smallest handle; members are sorted.
    pub(crate) fn free_components(&self, scope: &RebuildScope) -> Vec<Vec<ItemHandle>> {
        let free: BTreeSet<ItemHandle> = self
            .state
            .placed_items()
            .filter(|(_, item)| !item.is_bonus_bearing())
            .map(|(handle, _)| handle)
            .collect();

        let mut seen: BTreeSet<ItemHandle> = BTreeSet::new();
        let mut components = Vec::new();
        for &start in &free {
            if !seen.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for next in self.state.adjacent_items(current) {
                    if free.contains(&next) && seen.insert(next) {
                        component.push(next);
                        queue.push_back(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }

        if let RebuildScope::Around(seeds) = scope {
            components.retain(|component| seeds.iter().any(|seed| component.contains(seed)));
        }
        components
    }

    fn collect_subset_candidates(&self, component: &[ItemHandle], out: &mut Vec<Candidate>) {
        let mut graph = Adjacency::new(component.len());
        for (index, &handle) in component.iter().enumerate() {
            for neighbor in self.state.adjacent_items(handle) {
                if let Ok(other) = component.binary_search(&neighbor) {
                    graph.connect(index, other);
                }
            }
        }

        let limit = InventoryConfig::MAX_SUBSET_SIZE.min(component.len());
        for_each_connected_subset(&graph, limit, |subset| {
            let members: Vec<ItemHandle> = subset.iter().map(|&index| component[index]).collect();
            let counts = self.state.ids_of(&members);
            if members.len() >= InventoryConfig::MIN_GROUP_SIZE
                && let Some(bonus) = self.catalog.best_exact_counts(&counts)
            {
                out.push(Candidate::new(self.state, &members, Arc::clone(bonus)));
            }
            self.catalog.any_contains(&counts)
        });
    }

    fn commit(&mut self, candidate: Candidate) {
        let counts = self.state.ids_of(&candidate.members);
        let state = if self.catalog.has_any_direct_upgrade(&counts) {
            ConnectionState::Opened
        } else {
            ConnectionState::Closed
        };
        let bonus = candidate.bonus;

        let group = match candidate.existing {
            Some(id) => {
                self.state.set_group_outcome(id, Some(Arc::clone(&bonus)), state);
                id
            }
            None => {
                let id = self
                    .state
                    .groups
                    .create(Vec::new(), Some(Arc::clone(&bonus)), state);
                for &member in &candidate.members {
                    self.state.enroll(member, id, Some(Arc::clone(&bonus)), state);
                }
                id
            }
        };

        tracing::debug!(
            "Group {} formed by rebuild with bonus {} ({}, {} members)",
            group,
            bonus.id,
            state,
            candidate.members.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(
        members: &[u32],
        orders: &[u64],
        bonus: BonusDefinition,
        existing: Option<GroupId>,
    ) -> Candidate {
        Candidate {
            members: members.iter().map(|&h| ItemHandle(h)).collect(),
            orders: orders.iter().map(|&o| PlacementOrder(o)).collect(),
            bonus: Arc::new(bonus),
            existing,
        }
    }

    #[test]
    fn ranking_follows_tiebreak_chain() {
        let pair = || BonusDefinition::new("B1", "Pair", ["a", "a"]);
        let mut ranked = vec![
            candidate(&[1, 2], &[1, 2], pair().with_priority(1), None),
            candidate(&[2, 3], &[2, 3], pair(), None),
            candidate(&[4, 5], &[4, 5], pair().with_priority(9), Some(GroupId(3))),
            candidate(&[1, 3], &[1, 3], BonusDefinition::new("B9", "Alt", ["a", "a"]), None),
            candidate(&[1, 4], &[1, 4], pair(), None),
        ];
        ranked.sort_by(Candidate::rank);

        let order: Vec<_> = ranked.iter().map(|c| c.members.clone()).collect();
        let expect = |members: &[u32]| members.iter().map(|&h| ItemHandle(h)).collect::<Vec<_>>();
        assert_eq!(
            order,
            [
                expect(&[4, 5]),
                expect(&[1, 3]),
                expect(&[1, 4]),
                expect(&[2, 3]),
                expect(&[1, 2]),
            ]
        );
    }
}
