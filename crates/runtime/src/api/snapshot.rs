//! Serializable read model of an inventory.

use serde::{Deserialize, Serialize};

use inventory_core::{
    BonusStats, ConnectionState, GroupId, Inventory, ItemHandle, Position, Rotation,
};

/// A placed item as presentation sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub handle: ItemHandle,
    pub item_id: String,
    pub anchor: Position,
    pub rotation: Rotation,
    pub cells: Vec<Position>,
    pub state: ConnectionState,
    pub group: Option<GroupId>,
}

/// One live bonus and the group that earns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveBonus {
    pub group: GroupId,
    pub bonus_id: String,
    pub name: String,
    pub members: Vec<ItemHandle>,
}

/// Point-in-time copy of the grid, its items and the active bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub width: u32,
    pub height: u32,
    pub max_weight: f32,
    pub current_weight: f32,
    /// Placed items in handle order.
    pub items: Vec<PlacedItem>,
    /// Bonus-bearing groups in ascending group id order.
    pub bonuses: Vec<ActiveBonus>,
    pub stats: BonusStats,
    pub label: String,
}

impl InventorySnapshot {
    pub fn capture(inventory: &Inventory) -> Self {
        let items = inventory
            .items()
            .filter_map(|(handle, item)| {
                Some(PlacedItem {
                    handle,
                    item_id: item.item_id().to_owned(),
                    anchor: item.anchor()?,
                    rotation: item.rotation(),
                    cells: item.cells().iter().copied().collect(),
                    state: item.state(),
                    group: item.group(),
                })
            })
            .collect();

        let bonuses = inventory
            .groups()
            .iter()
            .filter_map(|(group, entry)| {
                let bonus = entry.bonus()?;
                Some(ActiveBonus {
                    group,
                    bonus_id: bonus.id.clone(),
                    name: bonus.name.clone(),
                    members: entry.members().to_vec(),
                })
            })
            .collect();

        Self {
            width: inventory.config().width,
            height: inventory.config().height,
            max_weight: inventory.config().max_weight,
            current_weight: inventory.current_weight(),
            items,
            bonuses,
            stats: inventory.stat_totals(),
            label: inventory.bonus_label(),
        }
    }

    pub fn item(&self, handle: ItemHandle) -> Option<&PlacedItem> {
        self.items.iter().find(|item| item.handle == handle)
    }
}
