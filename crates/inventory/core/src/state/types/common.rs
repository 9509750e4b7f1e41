use std::fmt;

use arrayvec::ArrayVec;

/// Stable handle of a placed (or about to be placed) item instance.
///
/// Handles are allocated monotonically by [`crate::InventoryState`] and never
/// reused, so they double as identity keys for groups and visited sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemHandle(pub u32);

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a connectivity group.
///
/// Allocated from a counter that only moves forward; a dissolved group's id
/// is abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Order in which an item was successfully placed. Used as a tie-break key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementOrder(pub u64);

impl PlacementOrder {
    pub const UNPLACED: Self = Self(0);
}

/// Discrete grid position expressed in cell coordinates.
///
/// `x` grows to the right and `y` grows downwards, matching the row-major
/// layout of the inventory grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Orthogonal neighbors in up, down, left, right order. No bounds checks.
    pub fn neighbors(self) -> ArrayVec<Position, 4> {
        CardinalDirection::ALL
            .iter()
            .map(|direction| {
                let (dx, dy) = direction.delta();
                self.offset(dx, dy)
            })
            .collect()
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardinalDirection {
    Up,
    Down,
    Left,
    Right,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_follow_cardinal_order() {
        let around = Position::new(2, 2).neighbors();
        assert_eq!(
            around.as_slice(),
            &[
                Position::new(2, 1),
                Position::new(2, 3),
                Position::new(1, 2),
                Position::new(3, 2),
            ]
        );
    }

    #[test]
    fn adjacency_excludes_diagonals() {
        let origin = Position::ORIGIN;
        assert!(origin.is_adjacent(Position::new(1, 0)));
        assert!(origin.is_adjacent(Position::new(0, -1)));
        assert!(!origin.is_adjacent(Position::new(1, 1)));
        assert!(!origin.is_adjacent(origin));
    }
}
