#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skirmish tactical combat engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots such as [`OccupancyView`] and [`UnitView`], and respond
//! exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Cardinal directions in the order the engine examines neighbors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
}

impl Direction {
    /// Fixed examination order: up, left, right, down.
    ///
    /// Every search in the engine visits neighbors in this order, which is
    /// what makes equal-cost tie-breaks deterministic.
    pub const CARDINAL_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::East,
        Direction::South,
    ];
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell. Grows to the right.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell. Grows downward.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Maps a world-space position to the nearest cell.
    ///
    /// Collaborators track units in continuous world space; the engine only
    /// ever sees the rounded cell.
    #[must_use]
    pub fn from_world_position(x: f32, y: f32) -> Self {
        Self::new(x.round() as i32, y.round() as i32)
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Cell one step away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::North => Self::new(self.column, self.row.saturating_sub(1)),
            Direction::West => Self::new(self.column.saturating_sub(1), self.row),
            Direction::East => Self::new(self.column.saturating_add(1), self.row),
            Direction::South => Self::new(self.column, self.row.saturating_add(1)),
        }
    }

    /// The four orthogonal neighbors in examination order, ignoring bounds.
    #[must_use]
    pub fn neighbors(self) -> [CellCoord; 4] {
        Direction::CARDINAL_ORDER.map(|direction| self.step(direction))
    }
}

/// Inclusive axis-aligned rectangle of cells that defines a grid's extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    top_left: CellCoord,
    bottom_right: CellCoord,
}

impl GridBounds {
    /// Creates bounds spanning both corners inclusively.
    ///
    /// Inverted corners produce bounds that contain no cells; use
    /// [`GridBounds::is_valid`] to detect them.
    #[must_use]
    pub const fn new(top_left: CellCoord, bottom_right: CellCoord) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn top_left(&self) -> CellCoord {
        self.top_left
    }

    /// Lower-right corner of the rectangle.
    #[must_use]
    pub const fn bottom_right(&self) -> CellCoord {
        self.bottom_right
    }

    /// Reports whether the top-left corner does not lie past the bottom-right one.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.top_left.column <= self.bottom_right.column
            && self.top_left.row <= self.bottom_right.row
    }

    /// Number of columns spanned by the bounds.
    #[must_use]
    pub fn columns(&self) -> u32 {
        span(self.top_left.column, self.bottom_right.column)
    }

    /// Number of rows spanned by the bounds.
    #[must_use]
    pub fn rows(&self) -> u32 {
        span(self.top_left.row, self.bottom_right.row)
    }

    /// Total number of cells inside the bounds.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns()) * u64::from(self.rows());
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the cell lies inside the bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column >= self.top_left.column
            && cell.column <= self.bottom_right.column
            && cell.row >= self.top_left.row
            && cell.row <= self.bottom_right.row
    }

    /// Row-major offset of the cell, or `None` when it lies outside.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let column = usize::try_from(i64::from(cell.column) - i64::from(self.top_left.column)).ok()?;
        let row = usize::try_from(i64::from(cell.row) - i64::from(self.top_left.row)).ok()?;
        let width = usize::try_from(self.columns()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell stored at the provided row-major offset.
    #[must_use]
    pub fn cell_at_index(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }

        let width = usize::try_from(self.columns()).ok()?;
        let column = i32::try_from(index % width).ok()?;
        let row = i32::try_from(index / width).ok()?;
        Some(CellCoord::new(
            self.top_left.column.checked_add(column)?,
            self.top_left.row.checked_add(row)?,
        ))
    }

    /// Iterates every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.top_left.column..=self.bottom_right.column;
        (self.top_left.row..=self.bottom_right.row)
            .flat_map(move |row| columns.clone().map(move |column| CellCoord::new(column, row)))
    }

    /// In-bounds orthogonal neighbors of the cell in examination order.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> Neighbors {
        let mut neighbors = Neighbors::default();
        for direction in Direction::CARDINAL_ORDER {
            let candidate = cell.step(direction);
            if candidate != cell && self.contains(candidate) {
                neighbors.push(candidate);
            }
        }
        neighbors
    }
}

fn span(start: i32, end: i32) -> u32 {
    if end < start {
        return 0;
    }
    u32::try_from(i64::from(end) - i64::from(start) + 1).unwrap_or(u32::MAX)
}

/// Fixed-capacity iterator over up to four neighboring cells.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

/// Side a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Units fighting alongside the player.
    Ally,
    /// Units opposing the player.
    Enemy,
}

impl Team {
    /// The team this team fights against.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Ally => Self::Enemy,
            Self::Enemy => Self::Ally,
        }
    }
}

/// Describes what currently stands on a cell.
///
/// The tag classifies the occupant rather than referencing it; unit identity
/// lives in [`UnitView`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    /// Nothing stands on the cell.
    #[default]
    Empty,
    /// Impassable terrain.
    Wall,
    /// A unit of the ally team.
    Ally,
    /// A unit of the enemy team.
    Enemy,
}

impl Occupant {
    /// Team of the unit standing on the cell, if any.
    #[must_use]
    pub const fn team(self) -> Option<Team> {
        match self {
            Self::Ally => Some(Team::Ally),
            Self::Enemy => Some(Team::Enemy),
            Self::Empty | Self::Wall => None,
        }
    }

    /// Reports whether nothing stands on the cell.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Reports whether a unit of `team` may path through the cell.
    ///
    /// Same-team occupants can be passed through but are not free
    /// destinations.
    #[must_use]
    pub fn is_passable_for(self, team: Team) -> bool {
        self.is_empty() || self.team() == Some(team)
    }
}

impl From<Team> for Occupant {
    fn from(team: Team) -> Self {
        match team {
            Team::Ally => Self::Ally,
            Team::Enemy => Self::Enemy,
        }
    }
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Hit points tracked for a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a health value from raw hit points.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the raw hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// AI decision procedure assigned to an autonomous unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Closes in on the nearest opposing unit and attacks it.
    Pursuer,
    /// Steps into the path an opposing unit takes toward the extraction point.
    Blocker,
    /// Heals damaged teammates and retreats from threats otherwise.
    Support,
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Team the unit fights for.
    pub team: Team,
    /// Decision procedure driving the unit.
    pub archetype: Archetype,
    /// Grid cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Maximum number of hops the unit may move per turn.
    pub movement_radius: u32,
    /// Number of hops an attack or action reaches from where the unit stands.
    pub attack_radius: u32,
    /// Current hit points.
    pub health: Health,
    /// Hit points the unit is restored to at most.
    pub max_health: Health,
}

impl UnitSnapshot {
    /// Reports whether the unit's health is below its maximum.
    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }
}

/// Read-only snapshot describing every unit in the encounter.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Units fighting for the provided team, in identifier order.
    pub fn on_team(&self, team: Team) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter().filter(move |unit| unit.team == team)
    }

    /// Looks a unit up by identifier.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Unit standing on the provided cell, if any.
    #[must_use]
    pub fn unit_at(&self, cell: CellCoord) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }

    /// Number of captured units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Occupant],
    bounds: GridBounds,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided row-major slice.
    #[must_use]
    pub fn new(cells: &'a [Occupant], bounds: GridBounds) -> Self {
        debug_assert_eq!(cells.len(), bounds.cell_count(), "occupancy slice must cover bounds");
        Self { cells, bounds }
    }

    /// Returns the occupant of the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.bounds
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Bounds of the underlying grid.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Number of cells in the underlying grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// What a unit does with its action once its move is complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionDecision {
    /// Attack, push or heal whatever stands on the cell.
    Target(CellCoord),
    /// Take no action this turn.
    Skip,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current encounter and builds an empty grid.
    ConfigureGrid {
        /// Upper-left corner of the grid, inclusive.
        top_left: CellCoord,
        /// Lower-right corner of the grid, inclusive.
        bottom_right: CellCoord,
    },
    /// Marks a cell as impassable terrain.
    PlaceWall {
        /// Cell that becomes a wall.
        cell: CellCoord,
    },
    /// Declares the cell opposing units try to reach.
    SetExtractionPoint {
        /// Cell serving as the extraction point.
        cell: CellCoord,
    },
    /// Requests that a unit be placed into the encounter.
    SpawnUnit {
        /// Team the unit fights for.
        team: Team,
        /// Decision procedure driving the unit.
        archetype: Archetype,
        /// Cell the unit occupies after spawning.
        cell: CellCoord,
        /// Maximum number of hops per move.
        movement_radius: u32,
        /// Number of hops an attack reaches.
        attack_radius: u32,
        /// Starting hit points.
        health: Health,
        /// Maximum hit points.
        max_health: Health,
    },
    /// Requests that a unit relocate to the destination cell.
    MoveUnit {
        /// Identifier of the unit moving.
        unit: UnitId,
        /// Cell the unit should occupy afterwards. Its current cell means stay.
        destination: CellCoord,
    },
    /// Requests that a unit carry out its chosen action.
    PerformAction {
        /// Identifier of the acting unit.
        unit: UnitId,
        /// Chosen target, or an explicit skip.
        decision: ActionDecision,
    },
    /// Overwrites a unit's current hit points.
    SetHealth {
        /// Identifier of the affected unit.
        unit: UnitId,
        /// New hit points, clamped to the unit's maximum.
        health: Health,
    },
    /// Removes a unit from the encounter, for example after it died.
    RemoveUnit {
        /// Identifier of the unit to remove.
        unit: UnitId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a fresh grid was built.
    GridConfigured {
        /// Extent of the new grid.
        bounds: GridBounds,
    },
    /// Reports that a grid configuration was refused.
    GridRejected {
        /// Extent that was requested.
        bounds: GridBounds,
    },
    /// Confirms that a wall now occupies the cell.
    WallPlaced {
        /// Cell turned into a wall.
        cell: CellCoord,
    },
    /// Confirms the extraction point of the encounter.
    ExtractionPointSet {
        /// Cell serving as the extraction point.
        cell: CellCoord,
    },
    /// Confirms that a unit was placed into the encounter.
    UnitSpawned {
        /// Identifier assigned to the unit by the world.
        unit: UnitId,
        /// Team the unit fights for.
        team: Team,
        /// Cell the unit occupies.
        cell: CellCoord,
    },
    /// Reports that a spawn or wall placement request was refused.
    PlacementRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the request failed.
        reason: PlacementError,
    },
    /// Confirms that a unit moved. `from == to` when it stayed put.
    UnitMoved {
        /// Identifier of the unit that moved.
        unit: UnitId,
        /// Cell the unit occupied before moving.
        from: CellCoord,
        /// Cell the unit occupies afterwards.
        to: CellCoord,
    },
    /// Reports that a move request was refused.
    MoveRejected {
        /// Identifier of the unit that attempted to move.
        unit: UnitId,
        /// Destination provided in the request.
        destination: CellCoord,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that a unit's action was carried out.
    ActionResolved {
        /// Identifier of the acting unit.
        unit: UnitId,
        /// Decision that was executed.
        decision: ActionDecision,
    },
    /// Confirms a change of a unit's hit points.
    HealthChanged {
        /// Identifier of the affected unit.
        unit: UnitId,
        /// Hit points after the change.
        health: Health,
    },
    /// Confirms that a unit left the encounter.
    UnitRemoved {
        /// Identifier of the removed unit.
        unit: UnitId,
        /// Cell the unit occupied before removal.
        cell: CellCoord,
    },
}

/// Reasons a wall or unit placement may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid bounds.
    OutOfBounds,
    /// The requested cell is already occupied.
    Occupied,
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// No unit with the provided identifier exists.
    MissingUnit,
    /// The destination lies outside the grid bounds.
    OutOfBounds,
    /// The destination is occupied by something other than the mover.
    Occupied,
}
