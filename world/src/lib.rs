#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative encounter state management for Skirmish.
//!
//! The world owns the [`Grid`] and the units standing on it. It is the only
//! place occupancy changes: [`apply`] executes a [`Command`], keeps every
//! cell's occupant tag in sync with the unit or wall standing there, and
//! reports the outcome as [`Event`] values.

mod grid;

use skirmish_core::{
    ActionDecision, Archetype, CellCoord, Command, Event, GridBounds, Health, MoveError,
    Occupant, PlacementError, Team, UnitId,
};
use tracing::debug;

pub use grid::{Cell, Grid, GridError, MAX_GRID_CELLS};

const DEFAULT_TOP_LEFT: CellCoord = CellCoord::new(0, 0);
const DEFAULT_BOTTOM_RIGHT: CellCoord = CellCoord::new(9, 9);

/// Represents the authoritative state of one combat encounter.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    units: Vec<Unit>,
    extraction: Option<CellCoord>,
    next_unit_id: u32,
}

impl World {
    /// Creates a world holding an empty ten by ten grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: Grid::with_bounds(GridBounds::new(DEFAULT_TOP_LEFT, DEFAULT_BOTTOM_RIGHT)),
            units: Vec::new(),
            extraction: None,
            next_unit_id: 0,
        }
    }

    fn unit_index(&self, unit: UnitId) -> Option<usize> {
        self.units.iter().position(|candidate| candidate.id == unit)
    }

    fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.saturating_add(1);
        id
    }

    fn place_wall(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.grid.cell_at(cell).map(|cell| cell.occupant) {
            None => out_events.push(Event::PlacementRejected {
                cell,
                reason: PlacementError::OutOfBounds,
            }),
            Some(Occupant::Ally | Occupant::Enemy) => out_events.push(Event::PlacementRejected {
                cell,
                reason: PlacementError::Occupied,
            }),
            Some(Occupant::Empty | Occupant::Wall) => {
                let _ = self.grid.set_occupant(cell, Occupant::Wall);
                out_events.push(Event::WallPlaced { cell });
            }
        }
    }

    fn spawn_unit(&mut self, seed: UnitSeed, out_events: &mut Vec<Event>) {
        let cell = seed.cell;
        let reason = match self.grid.cell_at(cell).map(|cell| cell.occupant) {
            None => Some(PlacementError::OutOfBounds),
            Some(Occupant::Empty) => None,
            Some(_) => Some(PlacementError::Occupied),
        };
        if let Some(reason) = reason {
            debug!(?cell, ?reason, "spawn rejected");
            out_events.push(Event::PlacementRejected { cell, reason });
            return;
        }

        let id = self.allocate_unit_id();
        let _ = self.grid.set_occupant(cell, Occupant::from(seed.team));
        self.units.push(Unit::from_seed(id, seed));
        debug!(unit = id.get(), ?cell, team = ?seed.team, "unit spawned");
        out_events.push(Event::UnitSpawned {
            unit: id,
            team: seed.team,
            cell,
        });
    }

    fn move_unit(&mut self, unit: UnitId, destination: CellCoord, out_events: &mut Vec<Event>) {
        let Some(index) = self.unit_index(unit) else {
            out_events.push(Event::MoveRejected {
                unit,
                destination,
                reason: MoveError::MissingUnit,
            });
            return;
        };

        let from = self.units[index].cell;
        let team = self.units[index].team;
        let reason = match self.grid.cell_at(destination).map(|cell| cell.occupant) {
            None => Some(MoveError::OutOfBounds),
            Some(Occupant::Empty) => None,
            Some(_) if destination == from => None,
            Some(_) => Some(MoveError::Occupied),
        };
        if let Some(reason) = reason {
            debug!(unit = unit.get(), ?destination, ?reason, "move rejected");
            out_events.push(Event::MoveRejected {
                unit,
                destination,
                reason,
            });
            return;
        }

        if destination != from {
            let _ = self.grid.set_occupant(from, Occupant::Empty);
            let _ = self.grid.set_occupant(destination, Occupant::from(team));
            self.units[index].cell = destination;
        }
        debug!(unit = unit.get(), ?from, to = ?destination, "unit moved");
        out_events.push(Event::UnitMoved {
            unit,
            from,
            to: destination,
        });
    }

    fn remove_unit(&mut self, unit: UnitId, out_events: &mut Vec<Event>) {
        let Some(index) = self.unit_index(unit) else {
            return;
        };
        let removed = self.units.remove(index);
        let _ = self.grid.set_occupant(removed.cell, Occupant::Empty);
        debug!(unit = unit.get(), cell = ?removed.cell, "unit removed");
        out_events.push(Event::UnitRemoved {
            unit,
            cell: removed.cell,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            top_left,
            bottom_right,
        } => match Grid::build(top_left, bottom_right) {
            Ok(grid) => {
                let bounds = grid.bounds();
                world.grid = grid;
                world.units.clear();
                world.extraction = None;
                world.next_unit_id = 0;
                out_events.push(Event::GridConfigured { bounds });
            }
            Err(error) => {
                debug!(%error, "grid configuration rejected");
                out_events.push(Event::GridRejected {
                    bounds: GridBounds::new(top_left, bottom_right),
                });
            }
        },
        Command::PlaceWall { cell } => world.place_wall(cell, out_events),
        Command::SetExtractionPoint { cell } => {
            if world.grid.bounds().contains(cell) {
                world.extraction = Some(cell);
                out_events.push(Event::ExtractionPointSet { cell });
            } else {
                out_events.push(Event::PlacementRejected {
                    cell,
                    reason: PlacementError::OutOfBounds,
                });
            }
        }
        Command::SpawnUnit {
            team,
            archetype,
            cell,
            movement_radius,
            attack_radius,
            health,
            max_health,
        } => world.spawn_unit(
            UnitSeed {
                team,
                archetype,
                cell,
                movement_radius,
                attack_radius,
                health,
                max_health,
            },
            out_events,
        ),
        Command::MoveUnit { unit, destination } => world.move_unit(unit, destination, out_events),
        Command::PerformAction { unit, decision } => {
            if world.unit_index(unit).is_some() {
                debug!(unit = unit.get(), ?decision, "action resolved");
                out_events.push(Event::ActionResolved { unit, decision });
            }
        }
        Command::SetHealth { unit, health } => {
            if let Some(index) = world.unit_index(unit) {
                let stored = &mut world.units[index];
                stored.health = health.min(stored.max_health);
                out_events.push(Event::HealthChanged {
                    unit,
                    health: stored.health,
                });
            }
        }
        Command::RemoveUnit { unit } => world.remove_unit(unit, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use skirmish_core::{CellCoord, OccupancyView, UnitSnapshot, UnitView};

    use super::{Grid, World};

    /// Provides read-only access to the encounter grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        world.grid.view()
    }

    /// Captures a read-only view of the units in the encounter.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.units.iter().map(|unit| unit.snapshot()).collect())
    }

    /// Cell opposing units try to reach, if one was configured.
    #[must_use]
    pub fn extraction_point(world: &World) -> Option<CellCoord> {
        world.extraction
    }

    /// Snapshot of one unit, if it is still in the encounter.
    #[must_use]
    pub fn unit(world: &World, id: skirmish_core::UnitId) -> Option<UnitSnapshot> {
        world
            .units
            .iter()
            .find(|unit| unit.id == id)
            .map(|unit| unit.snapshot())
    }
}

#[derive(Clone, Copy, Debug)]
struct UnitSeed {
    team: Team,
    archetype: Archetype,
    cell: CellCoord,
    movement_radius: u32,
    attack_radius: u32,
    health: Health,
    max_health: Health,
}

#[derive(Clone, Debug)]
struct Unit {
    id: UnitId,
    team: Team,
    archetype: Archetype,
    cell: CellCoord,
    movement_radius: u32,
    attack_radius: u32,
    health: Health,
    max_health: Health,
}

impl Unit {
    fn from_seed(id: UnitId, seed: UnitSeed) -> Self {
        Self {
            id,
            team: seed.team,
            archetype: seed.archetype,
            cell: seed.cell,
            movement_radius: seed.movement_radius,
            attack_radius: seed.attack_radius,
            health: seed.health.min(seed.max_health),
            max_health: seed.max_health,
        }
    }

    fn snapshot(&self) -> skirmish_core::UnitSnapshot {
        skirmish_core::UnitSnapshot {
            id: self.id,
            team: self.team,
            archetype: self.archetype,
            cell: self.cell,
            movement_radius: self.movement_radius,
            attack_radius: self.attack_radius,
            health: self.health,
            max_health: self.max_health,
        }
    }
}

/// Convenience for tests and adapters that skip an action explicitly.
#[must_use]
pub const fn skip_action(unit: UnitId) -> Command {
    Command::PerformAction {
        unit,
        decision: ActionDecision::Skip,
    }
}
