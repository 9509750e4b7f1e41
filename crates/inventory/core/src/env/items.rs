use std::collections::BTreeMap;
use std::sync::Arc;

use crate::shape::ShapeMask;

/// Read-only lookup of item definitions by identifier.
pub trait ItemOracle: Send + Sync {
    fn definition(&self, id: &str) -> Option<Arc<ItemDefinition>>;

    /// Returns all item definitions available in this oracle.
    fn all_definitions(&self) -> Vec<Arc<ItemDefinition>>;
}

/// Immutable catalog record for an item that can be dropped onto the grid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub weight: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: ItemCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape_kind: ShapeKind,
    pub shape: ShapeMask,
}

impl ItemDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        weight: f32,
        shape: ShapeMask,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight,
            category: ItemCategory::default(),
            shape_kind: ShapeKind::classify(&shape),
            shape,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    /// Number of grid cells this item covers.
    pub fn cell_count(&self) -> usize {
        self.shape.cell_count()
    }
}

/// Gameplay category of an item.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemCategory {
    Weapon,
    Armor,
    #[default]
    Misc,
}

/// Outline class of an item's mask; presentation uses it for anchor offsets.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ShapeKind {
    #[default]
    Square,
    Rectangle,
    LShape,
}

impl ShapeKind {
    /// Fully occupied squares are `Square`, other full rectangles `Rectangle`,
    /// anything with a hole in its bounding box `LShape`.
    pub fn classify(mask: &ShapeMask) -> Self {
        let full = mask.cell_count() == mask.width() * mask.height();
        match (full, mask.width() == mask.height()) {
            (true, true) => Self::Square,
            (true, false) => Self::Rectangle,
            (false, _) => Self::LShape,
        }
    }
}

/// In-memory [`ItemOracle`] keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    definitions: BTreeMap<String, Arc<ItemDefinition>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, replacing any previous one with the same id.
    pub fn insert(&mut self, definition: ItemDefinition) -> Arc<ItemDefinition> {
        let definition = Arc::new(definition);
        self.definitions
            .insert(definition.id.clone(), Arc::clone(&definition));
        definition
    }

    pub fn get(&self, id: &str) -> Option<&Arc<ItemDefinition>> {
        self.definitions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl FromIterator<ItemDefinition> for ItemCatalog {
    fn from_iter<T: IntoIterator<Item = ItemDefinition>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}

impl ItemOracle for ItemCatalog {
    fn definition(&self, id: &str) -> Option<Arc<ItemDefinition>> {
        self.definitions.get(id).cloned()
    }

    fn all_definitions(&self) -> Vec<Arc<ItemDefinition>> {
        self.definitions.values().cloned().collect()
    }
}
