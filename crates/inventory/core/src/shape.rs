//! Occupancy masks and their rotation/translation geometry.
//!
//! A [`ShapeMask`] is a rectangular boolean grid indexed by `(x, y)` with `x`
//! growing to the right and `y` growing downwards. Rotation is always clockwise
//! in 90° steps and is exactly reproducible, so placement validation and any
//! upstream visual alignment agree cell for cell.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ErrorSeverity, InventoryError};
use crate::state::Position;

/// Symbol marking an occupied cell in the row-string form of a mask.
pub const FILLED: char = '#';
/// Symbol marking an empty cell in the row-string form of a mask.
pub const EMPTY: char = '.';

/// Errors raised while building a mask from raw data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("shape has no rows")]
    NoRows,

    #[error("shape row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("shape row {row} column {column} has unknown symbol {symbol:?}")]
    InvalidSymbol {
        row: usize,
        column: usize,
        symbol: char,
    },

    #[error("shape of {width}x{height} needs {expected} cells, got {found}")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },

    #[error("shape does not occupy any cell")]
    Unoccupied,
}

impl InventoryError for ShapeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoRows => "SHAPE_NO_ROWS",
            Self::RaggedRow { .. } => "SHAPE_RAGGED_ROW",
            Self::InvalidSymbol { .. } => "SHAPE_INVALID_SYMBOL",
            Self::SizeMismatch { .. } => "SHAPE_SIZE_MISMATCH",
            Self::Unoccupied => "SHAPE_UNOCCUPIED",
        }
    }
}

/// Rotation expressed in clockwise quarter turns (0..=3).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation(u8);

impl Rotation {
    pub const NONE: Self = Self(0);

    /// Wraps any step count into the 0..=3 range.
    pub const fn new(steps: u8) -> Self {
        Self(steps % 4)
    }

    pub const fn steps(self) -> u8 {
        self.0
    }

    /// The next clockwise quarter turn.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.0 + 1)
    }

    pub const fn degrees(self) -> u16 {
        self.0 as u16 * 90
    }
}

/// Rectangular boolean occupancy mask.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<String>", into = "Vec<String>")
)]
pub struct ShapeMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl ShapeMask {
    /// Builds a mask from row-major cells (`cells[y * width + x]`).
    pub fn new(width: usize, height: usize, cells: Vec<bool>) -> Result<Self, ShapeError> {
        if width * height != cells.len() {
            return Err(ShapeError::SizeMismatch {
                width,
                height,
                expected: width * height,
                found: cells.len(),
            });
        }
        if !cells.iter().any(|&cell| cell) {
            return Err(ShapeError::Unoccupied);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Single occupied cell, the shape of most small items.
    pub fn single() -> Self {
        Self::filled(1, 1)
    }

    /// Fully occupied `width`x`height` rectangle.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn filled(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "filled mask needs a non-zero size");
        Self {
            width,
            height,
            cells: vec![true; width * height],
        }
    }

    /// Parses rows of `#` (occupied) and `.` (empty), top row first.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ShapeError> {
        let Some(first) = rows.first() else {
            return Err(ShapeError::NoRows);
        };
        let width = first.as_ref().chars().count();
        let mut cells = Vec::with_capacity(width * rows.len());

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(ShapeError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (column, symbol) in line.chars().enumerate() {
                match symbol {
                    FILLED => cells.push(true),
                    EMPTY => cells.push(false),
                    _ => {
                        return Err(ShapeError::InvalidSymbol {
                            row,
                            column,
                            symbol,
                        });
                    }
                }
            }
        }

        Self::new(width, rows.len(), cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether `(x, y)` is occupied; out-of-range coordinates are empty.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Occupied cells relative to the mask origin, in row-major order.
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| self.get(x, y).then_some((x, y)))
        })
    }

    /// One clockwise quarter turn: `(x, y)` maps to `(h - 1 - y, x)`.
    fn rotate_cw(&self) -> Self {
        let (width, height) = (self.height, self.width);
        let mut cells = vec![false; width * height];
        for (x, y) in self.offsets() {
            let (nx, ny) = (self.height - 1 - y, x);
            cells[ny * width + nx] = true;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Returns the mask rotated clockwise by `rotation`.
    ///
    /// Odd rotations swap width and height.
    #[must_use]
    pub fn rotate(&self, rotation: Rotation) -> Self {
        (0..rotation.steps()).fold(self.clone(), |mask, _| mask.rotate_cw())
    }

    /// Absolute cells covered when the mask's top-left corner sits at `anchor`.
    pub fn translate(&self, anchor: Position) -> BTreeSet<Position> {
        self.offsets()
            .map(|(x, y)| anchor.offset(x as i32, y as i32))
            .collect()
    }

    /// Row strings (`#`/`.`), top row first.
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| if self.get(x, y) { FILLED } else { EMPTY })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Debug for ShapeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rows", &self.to_rows())
            .finish()
    }
}

impl TryFrom<Vec<String>> for ShapeMask {
    type Error = ShapeError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<ShapeMask> for Vec<String> {
    fn from(mask: ShapeMask) -> Self {
        mask.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> ShapeMask {
        ShapeMask::from_rows(&["#.", "#.", "##"]).unwrap()
    }

    #[test]
    fn zero_rotation_is_a_copy() {
        let mask = l_shape();
        assert_eq!(mask.rotate(Rotation::NONE), mask);
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let rotated = l_shape().rotate(Rotation::new(1));
        assert_eq!((rotated.width(), rotated.height()), (3, 2));
        assert_eq!(rotated.to_rows(), vec!["###", "#.."]);
    }

    #[test]
    fn half_turn_flips_both_axes() {
        let rotated = l_shape().rotate(Rotation::new(2));
        assert_eq!(rotated.to_rows(), vec!["##", ".#", ".#"]);
    }

    #[test]
    fn three_quarter_turn_matches_counter_clockwise() {
        let rotated = l_shape().rotate(Rotation::new(3));
        assert_eq!(rotated.to_rows(), vec!["..#", "###"]);
    }

    #[test]
    fn four_quarter_turns_round_trip() {
        let shapes: [&[&str]; 4] = [&["#.", "#.", "##"], &["###"], &[".#.", "###"], &["#"]];
        for rows in shapes {
            let mask = ShapeMask::from_rows(rows).unwrap();
            let quarter = Rotation::new(1);
            let back = mask
                .rotate(quarter)
                .rotate(quarter)
                .rotate(quarter)
                .rotate(quarter);
            assert_eq!(back, mask);
        }
    }

    #[test]
    fn rotation_wraps_modulo_four() {
        assert_eq!(Rotation::new(5), Rotation::new(1));
        assert_eq!(Rotation::new(3).next(), Rotation::NONE);
        assert_eq!(Rotation::new(2).degrees(), 180);
    }

    #[test]
    fn translate_offsets_occupied_cells() {
        let cells = l_shape().translate(Position::new(3, 1));
        let expected: BTreeSet<_> = [(3, 1), (3, 2), (3, 3), (4, 3)]
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn rejects_malformed_rows() {
        assert_eq!(
            ShapeMask::from_rows::<&str>(&[]),
            Err(ShapeError::NoRows)
        );
        assert!(matches!(
            ShapeMask::from_rows(&["##", "#"]),
            Err(ShapeError::RaggedRow { row: 1, .. })
        ));
        assert!(matches!(
            ShapeMask::from_rows(&["#x"]),
            Err(ShapeError::InvalidSymbol { symbol: 'x', .. })
        ));
        assert_eq!(ShapeMask::from_rows(&[".."]), Err(ShapeError::Unoccupied));
    }

    #[test]
    fn counts_occupied_cells() {
        assert_eq!(l_shape().cell_count(), 4);
        assert_eq!(ShapeMask::filled(2, 3).cell_count(), 6);
    }
}
