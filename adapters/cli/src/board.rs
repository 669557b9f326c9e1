//! Plain-text rendering of the encounter board.

use std::fmt::Write as _;

use skirmish_core::{Archetype, CellCoord, Occupant, Team, UnitSnapshot, UnitView};
use skirmish_world::{query, World};

/// Draws one line per grid row.
///
/// `#` is a wall, `.` an empty cell and `X` the extraction point. Units show
/// their archetype letter, uppercase for allies and lowercase for enemies.
pub(crate) fn render(world: &World) -> String {
    let grid = query::grid(world);
    let units = query::unit_view(world);
    let extraction = query::extraction_point(world);
    let bounds = grid.bounds();

    let mut board = String::with_capacity(grid.bounds().cell_count() + bounds.rows() as usize);
    let mut row = bounds.top_left().row();
    for cell in grid.cells() {
        if cell.coord.row() != row {
            board.push('\n');
            row = cell.coord.row();
        }
        board.push(tile(cell.coord, cell.occupant, &units, extraction));
    }
    board.push('\n');
    board
}

fn tile(
    coord: CellCoord,
    occupant: Occupant,
    units: &UnitView,
    extraction: Option<CellCoord>,
) -> char {
    match occupant {
        Occupant::Wall => '#',
        Occupant::Ally | Occupant::Enemy => units.unit_at(coord).map_or('?', unit_glyph),
        Occupant::Empty if extraction == Some(coord) => 'X',
        Occupant::Empty => '.',
    }
}

fn unit_glyph(unit: &UnitSnapshot) -> char {
    let glyph = match unit.archetype {
        Archetype::Pursuer => 'P',
        Archetype::Blocker => 'B',
        Archetype::Support => 'S',
    };
    match unit.team {
        Team::Ally => glyph,
        Team::Enemy => glyph.to_ascii_lowercase(),
    }
}

/// Lists every unit with its placement and health, one per line.
pub(crate) fn roster(units: &UnitView) -> String {
    let mut listing = String::new();
    for unit in units.iter() {
        let _ = writeln!(
            listing,
            "  {} #{} {:?} {:?} at ({}, {}) health {}/{}",
            unit_glyph(unit),
            unit.id.get(),
            unit.team,
            unit.archetype,
            unit.cell.column(),
            unit.cell.row(),
            unit.health.get(),
            unit.max_health.get(),
        );
    }
    listing
}
