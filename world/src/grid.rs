//! Bounded cell lattice that records what stands on every cell.

use skirmish_core::{CellCoord, GridBounds, Occupant, OccupancyView};

/// Largest number of cells a single grid may allocate.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Errors raised while building or editing a [`Grid`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The top-left corner lies right of or below the bottom-right corner.
    #[error("corner {top_left:?} lies past corner {bottom_right:?}")]
    InvertedBounds {
        /// Requested upper-left corner.
        top_left: CellCoord,
        /// Requested lower-right corner.
        bottom_right: CellCoord,
    },
    /// The rectangle would exceed [`MAX_GRID_CELLS`].
    #[error("grid of {columns}x{rows} cells exceeds the supported size")]
    TooLarge {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The coordinate lies outside the grid.
    #[error("cell {0:?} is out of grid bounds")]
    OutOfBounds(CellCoord),
    /// A text layout row differs in width from the first row.
    #[error("layout row {row} is {found} cells wide, expected {expected}")]
    RaggedLayout {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A text layout contains a character with no occupant meaning.
    #[error("unknown layout tile '{tile}' at {cell:?}")]
    UnknownTile {
        /// Offending character.
        tile: char,
        /// Cell the character describes.
        cell: CellCoord,
    },
}

/// Snapshot of a single cell's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Coordinate of the cell, unique within the grid.
    pub coord: CellCoord,
    /// What currently stands on the cell.
    pub occupant: Occupant,
}

/// Immutable-size rectangle of cells built once per encounter.
///
/// The only mutation after construction is overwriting occupant tags, which
/// the world does whenever a unit spawns, moves or dies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    bounds: GridBounds,
    occupants: Vec<Occupant>,
}

impl Grid {
    /// Allocates one empty cell per coordinate of the inclusive rectangle.
    pub fn build(top_left: CellCoord, bottom_right: CellCoord) -> Result<Self, GridError> {
        let bounds = GridBounds::new(top_left, bottom_right);
        if !bounds.is_valid() {
            return Err(GridError::InvertedBounds {
                top_left,
                bottom_right,
            });
        }

        let cell_count = u64::from(bounds.columns()) * u64::from(bounds.rows());
        if cell_count > MAX_GRID_CELLS as u64 {
            return Err(GridError::TooLarge {
                columns: bounds.columns(),
                rows: bounds.rows(),
            });
        }

        Ok(Self::with_bounds(bounds))
    }

    /// Builds a grid from a text layout anchored at `(0, 0)`.
    ///
    /// `.` is empty, `#` a wall, `A` an ally and `E` an enemy.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let columns = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(rows.len()).unwrap_or(i32::MAX);
        let mut grid = Self::build(
            CellCoord::new(0, 0),
            CellCoord::new(columns - 1, height - 1),
        )?;

        for (row_index, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridError::RaggedLayout {
                    row: row_index,
                    expected: width,
                    found,
                });
            }

            for (column_index, tile) in row.chars().enumerate() {
                let cell = CellCoord::new(
                    i32::try_from(column_index).unwrap_or(i32::MAX),
                    i32::try_from(row_index).unwrap_or(i32::MAX),
                );
                let occupant = match tile {
                    '.' => Occupant::Empty,
                    '#' => Occupant::Wall,
                    'A' => Occupant::Ally,
                    'E' => Occupant::Enemy,
                    _ => return Err(GridError::UnknownTile { tile, cell }),
                };
                let _ = grid.set_occupant(cell, occupant)?;
            }
        }

        Ok(grid)
    }

    pub(crate) fn with_bounds(bounds: GridBounds) -> Self {
        Self {
            bounds,
            occupants: vec![Occupant::Empty; bounds.cell_count()],
        }
    }

    /// Extent of the grid.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Looks the cell at `coord` up, returning `None` outside the grid.
    #[must_use]
    pub fn cell_at(&self, coord: CellCoord) -> Option<Cell> {
        self.bounds
            .index(coord)
            .and_then(|index| self.occupants.get(index).copied())
            .map(|occupant| Cell { coord, occupant })
    }

    /// Overwrites the occupant of a cell, returning the previous tag.
    pub fn set_occupant(
        &mut self,
        coord: CellCoord,
        occupant: Occupant,
    ) -> Result<Occupant, GridError> {
        let slot = self
            .bounds
            .index(coord)
            .and_then(|index| self.occupants.get_mut(index))
            .ok_or(GridError::OutOfBounds(coord))?;
        Ok(std::mem::replace(slot, occupant))
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.bounds
            .iter()
            .zip(self.occupants.iter().copied())
            .map(|(coord, occupant)| Cell { coord, occupant })
    }

    /// Read-only view handed to systems.
    #[must_use]
    pub fn view(&self) -> OccupancyView<'_> {
        OccupancyView::new(&self.occupants, self.bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_allocates_one_empty_cell_per_coordinate() {
        let grid = Grid::build(CellCoord::new(0, 0), CellCoord::new(4, 4)).expect("valid bounds");

        assert_eq!(grid.cells().count(), 25);
        assert!(grid.cells().all(|cell| cell.occupant == Occupant::Empty));

        let coords: std::collections::BTreeSet<_> = grid.cells().map(|cell| cell.coord).collect();
        assert_eq!(coords.len(), 25, "coordinates must be unique");
    }

    #[test]
    fn build_accepts_negative_corners() {
        let grid =
            Grid::build(CellCoord::new(-3, -1), CellCoord::new(-1, 0)).expect("valid bounds");
        assert_eq!(grid.cells().count(), 6);
        assert!(grid.cell_at(CellCoord::new(-3, -1)).is_some());
        assert!(grid.cell_at(CellCoord::new(0, 0)).is_none());
    }

    #[test]
    fn build_rejects_inverted_corners() {
        let error = Grid::build(CellCoord::new(3, 0), CellCoord::new(0, 3)).unwrap_err();
        assert!(matches!(error, GridError::InvertedBounds { .. }));
    }

    #[test]
    fn build_rejects_oversized_grids() {
        let error =
            Grid::build(CellCoord::new(0, 0), CellCoord::new(1 << 12, 1 << 12)).unwrap_err();
        assert!(matches!(error, GridError::TooLarge { .. }));
    }

    #[test]
    fn cell_at_returns_none_off_the_grid() {
        let grid = Grid::build(CellCoord::new(0, 0), CellCoord::new(2, 2)).expect("valid bounds");
        assert!(grid.cell_at(CellCoord::new(-1, 0)).is_none());
        assert!(grid.cell_at(CellCoord::new(0, 3)).is_none());
    }

    #[test]
    fn set_occupant_is_visible_to_lookups_and_views() {
        let mut grid =
            Grid::build(CellCoord::new(0, 0), CellCoord::new(2, 2)).expect("valid bounds");
        let target = CellCoord::new(1, 2);

        let previous = grid.set_occupant(target, Occupant::Enemy).expect("in bounds");

        assert_eq!(previous, Occupant::Empty);
        assert_eq!(grid.cell_at(target).map(|cell| cell.occupant), Some(Occupant::Enemy));
        assert_eq!(grid.view().occupant(target), Some(Occupant::Enemy));
        assert_eq!(
            grid.set_occupant(CellCoord::new(5, 5), Occupant::Wall),
            Err(GridError::OutOfBounds(CellCoord::new(5, 5)))
        );
    }

    #[test]
    fn from_rows_parses_layout_characters() {
        let grid = Grid::from_rows(&[".#", "AE"]).expect("layout parses");

        assert_eq!(grid.view().occupant(CellCoord::new(0, 0)), Some(Occupant::Empty));
        assert_eq!(grid.view().occupant(CellCoord::new(1, 0)), Some(Occupant::Wall));
        assert_eq!(grid.view().occupant(CellCoord::new(0, 1)), Some(Occupant::Ally));
        assert_eq!(grid.view().occupant(CellCoord::new(1, 1)), Some(Occupant::Enemy));
    }

    #[test]
    fn from_rows_rejects_ragged_and_unknown_layouts() {
        assert!(matches!(
            Grid::from_rows(&["...", ".."]),
            Err(GridError::RaggedLayout { row: 1, .. })
        ));
        assert!(matches!(
            Grid::from_rows(&[".?."]),
            Err(GridError::UnknownTile { tile: '?', .. })
        ));
    }
}
