//! Connectivity group bookkeeping.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::env::BonusDefinition;

use super::{ConnectionState, GroupId, ItemHandle};

/// A set of connected items sharing at most one bonus and one state.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub(crate) members: Vec<ItemHandle>,
    pub(crate) bonus: Option<Arc<BonusDefinition>>,
    pub(crate) state: ConnectionState,
}

impl Group {
    pub fn members(&self) -> &[ItemHandle] {
        &self.members
    }

    pub fn bonus(&self) -> Option<&Arc<BonusDefinition>> {
        self.bonus.as_ref()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, handle: ItemHandle) -> bool {
        self.members.contains(&handle)
    }

    /// Frozen groups are left untouched by rebuilds.
    pub fn is_bonus_bearing(&self) -> bool {
        self.bonus.is_some()
    }

    /// True when `members` is the same set as this group's members.
    pub fn has_members(&self, members: &[ItemHandle]) -> bool {
        self.members.len() == members.len() && members.iter().all(|m| self.members.contains(m))
    }
}

/// Live groups keyed by id. Ids come from a forward-only counter.
#[derive(Clone, Debug, Default)]
pub struct GroupTable {
    groups: BTreeMap<GroupId, Group>,
    next_id: u32,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(&id)
    }

    /// Live groups in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups.iter().map(|(&id, group)| (id, group))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(crate) fn create(
        &mut self,
        members: Vec<ItemHandle>,
        bonus: Option<Arc<BonusDefinition>>,
        state: ConnectionState,
    ) -> GroupId {
        self.next_id += 1;
        let id = GroupId(self.next_id);
        self.groups.insert(
            id,
            Group {
                members,
                bonus,
                state,
            },
        );
        id
    }

    pub(crate) fn remove(&mut self, id: GroupId) -> Option<Group> {
        self.groups.remove(&id)
    }

    /// Drops `handle` from `id`'s member list; returns whether it was there.
    pub(crate) fn detach(&mut self, id: GroupId, handle: ItemHandle) -> bool {
        let Some(group) = self.groups.get_mut(&id) else {
            return false;
        };
        let before = group.members.len();
        group.members.retain(|&member| member != handle);
        before != group.members.len()
    }
}
