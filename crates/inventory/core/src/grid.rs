//! Fixed-size occupancy grid with weight accounting.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::config::InventoryConfig;
use crate::error::PlacementError;
use crate::state::{ItemHandle, Position};

/// Width×height array of optional item handles plus a running weight total.
///
/// The store knows nothing about groups or bonuses; it only answers bounds,
/// occupancy and capacity questions and records which handle covers a cell.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStore {
    width: u32,
    height: u32,
    max_weight: f32,
    current_weight: f32,
    cells: Vec<Option<ItemHandle>>,
}

impl GridStore {
    pub fn new(config: &InventoryConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            max_weight: config.max_weight,
            current_weight: 0.0,
            cells: vec![None; (config.width * config.height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_weight(&self) -> f32 {
        self.max_weight
    }

    pub fn current_weight(&self) -> f32 {
        self.current_weight
    }

    pub fn remaining_weight(&self) -> f32 {
        (self.max_weight - self.current_weight).max(0.0)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn item_at(&self, position: Position) -> Option<ItemHandle> {
        self.index(position).and_then(|index| self.cells[index])
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.item_at(position).is_some()
    }

    /// In-bounds orthogonal neighbors of `position`.
    pub fn adjacent(&self, position: Position) -> ArrayVec<Position, 4> {
        position
            .neighbors()
            .into_iter()
            .filter(|neighbor| self.contains(*neighbor))
            .collect()
    }

    /// Every occupied cell with its occupant, in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Position, ItemHandle)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(index, cell)| {
            cell.map(|handle| {
                (
                    Position::new((index % width) as i32, (index / width) as i32),
                    handle,
                )
            })
        })
    }

    /// Validates an item of `weight` covering `cells`.
    ///
    /// Capacity is checked first, then every cell in ascending position
    /// order for bounds and collisions.
    pub fn check_placement(
        &self,
        weight: f32,
        cells: &BTreeSet<Position>,
    ) -> Result<(), PlacementError> {
        if self.current_weight + weight > self.max_weight {
            return Err(PlacementError::OverCapacity {
                required: weight,
                remaining: self.remaining_weight(),
            });
        }

        for &position in cells {
            let Some(index) = self.index(position) else {
                return Err(PlacementError::OutOfBounds(position));
            };
            if let Some(occupant) = self.cells[index] {
                return Err(PlacementError::Collision { position, occupant });
            }
        }

        Ok(())
    }

    pub fn can_place(&self, weight: f32, cells: &BTreeSet<Position>) -> bool {
        self.check_placement(weight, cells).is_ok()
    }

    /// Marks `cells` as covered by `handle`. Callers validate first.
    pub(crate) fn occupy(&mut self, handle: ItemHandle, cells: &BTreeSet<Position>, weight: f32) {
        for &position in cells {
            if let Some(index) = self.index(position) {
                self.cells[index] = Some(handle);
            }
        }
        self.current_weight += weight;
    }

    /// Clears every cell covered by `handle` and releases its weight.
    pub(crate) fn vacate(&mut self, handle: ItemHandle, cells: &BTreeSet<Position>, weight: f32) {
        for &position in cells {
            if let Some(index) = self.index(position)
                && self.cells[index] == Some(handle)
            {
                self.cells[index] = None;
            }
        }
        self.current_weight = (self.current_weight - weight).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridStore {
        GridStore::new(&InventoryConfig::with_size(5, 2).max_weight(10.0))
    }

    fn cells(points: &[(i32, i32)]) -> BTreeSet<Position> {
        points.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn adjacent_is_clipped_to_bounds() {
        let grid = grid();
        assert_eq!(grid.adjacent(Position::new(0, 0)).len(), 2);
        assert_eq!(grid.adjacent(Position::new(2, 0)).len(), 3);
        assert_eq!(grid.adjacent(Position::new(4, 1)).len(), 2);
    }

    #[test]
    fn rejects_collision_and_bounds() {
        let mut grid = grid();
        let first = cells(&[(0, 0), (1, 0)]);
        grid.occupy(ItemHandle(1), &first, 1.0);

        assert_eq!(
            grid.check_placement(1.0, &cells(&[(1, 0), (1, 1)])),
            Err(PlacementError::Collision {
                position: Position::new(1, 0),
                occupant: ItemHandle(1),
            })
        );
        assert_eq!(
            grid.check_placement(1.0, &cells(&[(4, 1), (5, 1)])),
            Err(PlacementError::OutOfBounds(Position::new(5, 1)))
        );
        assert!(grid.can_place(1.0, &cells(&[(2, 0)])));
    }

    #[test]
    fn capacity_is_checked_before_cells() {
        let mut grid = grid();
        grid.occupy(ItemHandle(1), &cells(&[(0, 0)]), 9.5);
        let result = grid.check_placement(1.0, &cells(&[(9, 9)]));
        assert!(matches!(result, Err(PlacementError::OverCapacity { .. })));
    }

    #[test]
    fn vacate_restores_cells_and_weight() {
        let mut grid = grid();
        let footprint = cells(&[(3, 1), (4, 1)]);
        grid.occupy(ItemHandle(7), &footprint, 2.5);
        assert_eq!(grid.item_at(Position::new(4, 1)), Some(ItemHandle(7)));
        assert_eq!(grid.occupied_cells().count(), 2);

        grid.vacate(ItemHandle(7), &footprint, 2.5);
        assert!(!grid.is_occupied(Position::new(3, 1)));
        assert_eq!(grid.current_weight(), 0.0);
    }
}
