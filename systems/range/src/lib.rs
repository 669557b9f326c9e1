#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement and attack reach queries.
//!
//! The flood fills here never build path chains; they only enumerate cells,
//! which keeps them cheaper than a pathing call per candidate. Every query is
//! a pure function of the occupancy view and uses call-local visited markers.

use std::collections::BTreeSet;

use skirmish_core::{CellCoord, GridBounds, OccupancyView, Occupant, Team, UnitId, UnitSnapshot};
use tracing::debug;

/// Set of cells that remembers the order members were discovered in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellSet {
    order: Vec<CellCoord>,
    members: BTreeSet<CellCoord>,
}

impl CellSet {
    /// Adds the cell, returning `false` when it was already a member.
    pub fn insert(&mut self, cell: CellCoord) -> bool {
        if !self.members.insert(cell) {
            return false;
        }
        self.order.push(cell);
        true
    }

    /// Reports whether the cell is a member.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.members.contains(&cell)
    }

    /// Members in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.order.iter().copied()
    }

    /// Members in discovery order as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[CellCoord] {
        &self.order
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Reports whether the set holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Reports whether every member of `other` is also a member of `self`.
    #[must_use]
    pub fn is_superset_of(&self, other: &CellSet) -> bool {
        self.members.is_superset(&other.members)
    }
}

impl FromIterator<CellCoord> for CellSet {
    fn from_iter<I: IntoIterator<Item = CellCoord>>(iter: I) -> Self {
        let mut set = Self::default();
        for cell in iter {
            let _ = set.insert(cell);
        }
        set
    }
}

/// Dense visited markers for one query.
struct Visited {
    bounds: GridBounds,
    marks: Vec<bool>,
}

impl Visited {
    fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            marks: vec![false; bounds.cell_count()],
        }
    }

    /// Marks the cell, returning `true` the first time it is seen.
    fn visit(&mut self, cell: CellCoord) -> bool {
        match self
            .bounds
            .index(cell)
            .and_then(|index| self.marks.get_mut(index))
        {
            Some(mark) if !*mark => {
                *mark = true;
                true
            }
            _ => false,
        }
    }
}

/// Cells a unit of `team` can end its move on within `radius` hops of `start`.
///
/// Empty cells are members and keep the flood going. Teammates can be walked
/// through but are never landing spots. Opponents and walls stop expansion.
/// `start` is always the first member; an out-of-bounds start yields an empty
/// set.
#[must_use]
pub fn movement_range(
    view: &OccupancyView<'_>,
    start: CellCoord,
    radius: u32,
    team: Team,
) -> CellSet {
    let mut range = CellSet::default();
    let bounds = view.bounds();
    let mut visited = Visited::new(bounds);
    if !visited.visit(start) {
        return range;
    }
    let _ = range.insert(start);

    let mut frontier = vec![start];
    let mut next = Vec::new();
    for _ in 0..radius {
        for &cell in &frontier {
            for neighbor in bounds.neighbors(cell) {
                if !visited.visit(neighbor) {
                    continue;
                }
                match view.occupant(neighbor) {
                    Some(Occupant::Empty) => {
                        let _ = range.insert(neighbor);
                        next.push(neighbor);
                    }
                    Some(occupant) if occupant.team() == Some(team) => next.push(neighbor),
                    _ => {}
                }
            }
        }

        if next.is_empty() {
            break;
        }
        std::mem::swap(&mut frontier, &mut next);
        next.clear();
    }

    range
}

/// Cells within `radius` hops of any movement cell, regardless of occupancy.
///
/// Every in-bounds member of `movement` is included, so the result is always
/// a superset of the movement cells.
#[must_use]
pub fn attack_range(view: &OccupancyView<'_>, movement: &CellSet, radius: u32) -> CellSet {
    let mut range = CellSet::default();
    let bounds = view.bounds();
    let mut visited = Visited::new(bounds);

    let mut frontier: Vec<CellCoord> = movement
        .iter()
        .filter(|&cell| visited.visit(cell))
        .collect();
    for &cell in &frontier {
        let _ = range.insert(cell);
    }

    let mut next = Vec::new();
    for _ in 0..radius {
        for &cell in &frontier {
            for neighbor in bounds.neighbors(cell) {
                if visited.visit(neighbor) {
                    let _ = range.insert(neighbor);
                    next.push(neighbor);
                }
            }
        }

        if next.is_empty() {
            break;
        }
        std::mem::swap(&mut frontier, &mut next);
        next.clear();
    }

    range
}

/// Endpoints of every in-bounds orthogonal walk of exactly `distance` hops.
///
/// Occupancy is ignored. A walk may double back, so the result holds the
/// cells at Manhattan distance `distance`, `distance - 2` and so on. Each cell
/// appears once, at the position of its first discovery.
///
/// Layers settle into a two-step cycle shortly after covering the grid, so
/// the cost is bounded by the grid size rather than by `distance`.
#[must_use]
pub fn cells_at_exact_distance(
    view: &OccupancyView<'_>,
    start: CellCoord,
    distance: u32,
) -> Vec<CellCoord> {
    let bounds = view.bounds();
    if !bounds.contains(start) {
        return Vec::new();
    }

    let mut previous = Vec::new();
    let mut layer = vec![start];
    for step in 0..distance {
        let next = next_layer(bounds, &layer);
        if next.is_empty() {
            return next;
        }
        if next == previous {
            // From here on the layers alternate between `next` and `layer`.
            let remaining = distance - step - 1;
            return if remaining % 2 == 0 { next } else { layer };
        }
        previous = std::mem::replace(&mut layer, next);
    }

    layer
}

fn next_layer(bounds: GridBounds, layer: &[CellCoord]) -> Vec<CellCoord> {
    let mut seen = BTreeSet::new();
    let mut next = Vec::with_capacity(layer.len() * 4);
    for &cell in layer {
        for neighbor in bounds.neighbors(cell) {
            if seen.insert(neighbor) {
                next.push(neighbor);
            }
        }
    }
    next
}

/// Movement and attack reach of one unit standing on one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitRanges {
    unit: UnitId,
    origin: CellCoord,
    movement: CellSet,
    attack: CellSet,
}

impl UnitRanges {
    /// Ranges for the start of a turn: full movement plus the attack reach
    /// from every cell the unit can move to.
    #[must_use]
    pub fn for_turn(view: &OccupancyView<'_>, unit: &UnitSnapshot) -> Self {
        let movement = movement_range(view, unit.cell, unit.movement_radius, unit.team);
        let attack = attack_range(view, &movement, unit.attack_radius);
        debug!(
            unit = unit.id.get(),
            origin = ?unit.cell,
            movement = movement.len(),
            attack = attack.len(),
            "computed turn ranges"
        );
        Self {
            unit: unit.id,
            origin: unit.cell,
            movement,
            attack,
        }
    }

    /// Ranges once the move has executed: the unit stays where it is and
    /// attacks from there.
    #[must_use]
    pub fn for_action(view: &OccupancyView<'_>, unit: &UnitSnapshot) -> Self {
        let movement = movement_range(view, unit.cell, 0, unit.team);
        let attack = attack_range(view, &movement, unit.attack_radius);
        Self {
            unit: unit.id,
            origin: unit.cell,
            movement,
            attack,
        }
    }

    /// Unit the ranges were computed for.
    #[must_use]
    pub const fn unit(&self) -> UnitId {
        self.unit
    }

    /// Cell the unit stood on when the ranges were computed.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Cells the unit may end its move on.
    #[must_use]
    pub const fn movement(&self) -> &CellSet {
        &self.movement
    }

    /// Cells the unit may target from its movement cells.
    #[must_use]
    pub const fn attack(&self) -> &CellSet {
        &self.attack
    }

    /// Reports whether the ranges still describe `unit` where it stands now.
    #[must_use]
    pub fn is_current_for(&self, unit: &UnitSnapshot) -> bool {
        self.unit == unit.id && self.origin == unit.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{Archetype, Health};

    fn layout(rows: &[&str]) -> (Vec<Occupant>, GridBounds) {
        let width = rows[0].len() as i32;
        let height = rows.len() as i32;
        let cells = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|tile| match tile {
                '#' => Occupant::Wall,
                'A' => Occupant::Ally,
                'E' => Occupant::Enemy,
                _ => Occupant::Empty,
            })
            .collect();
        let bounds = GridBounds::new(CellCoord::new(0, 0), CellCoord::new(width - 1, height - 1));
        (cells, bounds)
    }

    fn ally_at(cell: CellCoord) -> UnitSnapshot {
        UnitSnapshot {
            id: UnitId::new(4),
            team: Team::Ally,
            archetype: Archetype::Pursuer,
            cell,
            movement_radius: 2,
            attack_radius: 1,
            health: Health::new(3),
            max_health: Health::new(3),
        }
    }

    #[test]
    fn teammates_extend_reach_without_becoming_destinations() {
        let (cells, bounds) = layout(&["AA..."]);
        let view = OccupancyView::new(&cells, bounds);

        let range = movement_range(&view, CellCoord::new(0, 0), 2, Team::Ally);

        assert_eq!(range.as_slice(), &[CellCoord::new(0, 0), CellCoord::new(2, 0)]);
    }

    #[test]
    fn opponents_and_walls_stop_the_flood() {
        let (cells, bounds) = layout(&[".E..", ".#..", "...."]);
        let view = OccupancyView::new(&cells, bounds);

        let range = movement_range(&view, CellCoord::new(0, 0), 4, Team::Ally);

        assert!(!range.contains(CellCoord::new(1, 0)));
        assert!(!range.contains(CellCoord::new(2, 0)));
        assert!(!range.contains(CellCoord::new(1, 1)));
        assert!(range.contains(CellCoord::new(1, 2)));
        assert!(range.contains(CellCoord::new(2, 2)));
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn out_of_bounds_start_yields_empty_movement() {
        let (cells, bounds) = layout(&["..", ".."]);
        let view = OccupancyView::new(&cells, bounds);

        assert!(movement_range(&view, CellCoord::new(-1, 0), 3, Team::Enemy).is_empty());
    }

    #[test]
    fn attack_range_ignores_occupancy() {
        let (cells, bounds) = layout(&[".E#", "..."]);
        let view = OccupancyView::new(&cells, bounds);
        let movement: CellSet = [CellCoord::new(0, 0)].into_iter().collect();

        let attack = attack_range(&view, &movement, 2);

        assert!(attack.contains(CellCoord::new(1, 0)));
        assert!(attack.contains(CellCoord::new(2, 0)));
        assert!(attack.contains(CellCoord::new(1, 1)));
        assert!(!attack.contains(CellCoord::new(2, 1)));
        assert_eq!(attack.iter().next(), Some(CellCoord::new(0, 0)));
    }

    #[test]
    fn exact_distance_one_is_the_neighbor_ring() {
        let (cells, bounds) = layout(&["...", "...", "..."]);
        let view = OccupancyView::new(&cells, bounds);

        assert_eq!(
            cells_at_exact_distance(&view, CellCoord::new(1, 1), 1),
            CellCoord::new(1, 1).neighbors().to_vec()
        );
        assert_eq!(
            cells_at_exact_distance(&view, CellCoord::new(1, 1), 0),
            vec![CellCoord::new(1, 1)]
        );
    }

    #[test]
    fn exact_distance_includes_walks_that_double_back() {
        let (cells, bounds) = layout(&["....."]);
        let view = OccupancyView::new(&cells, bounds);

        let ring = cells_at_exact_distance(&view, CellCoord::new(2, 0), 2);

        assert_eq!(
            ring,
            vec![CellCoord::new(0, 0), CellCoord::new(2, 0), CellCoord::new(4, 0)]
        );
    }

    #[test]
    fn action_ranges_keep_the_unit_in_place() {
        let (cells, bounds) = layout(&["....", ".A..", "...."]);
        let view = OccupancyView::new(&cells, bounds);
        let unit = ally_at(CellCoord::new(1, 1));

        let ranges = UnitRanges::for_action(&view, &unit);

        assert_eq!(ranges.movement().as_slice(), &[unit.cell]);
        assert_eq!(ranges.attack().len(), 5);
        assert!(ranges.is_current_for(&unit));
    }

    #[test]
    fn ranges_go_stale_once_the_unit_moves() {
        let (cells, bounds) = layout(&["....", ".A..", "...."]);
        let view = OccupancyView::new(&cells, bounds);
        let unit = ally_at(CellCoord::new(1, 1));

        let ranges = UnitRanges::for_turn(&view, &unit);
        let moved = UnitSnapshot {
            cell: CellCoord::new(2, 1),
            ..unit.clone()
        };
        let other = UnitSnapshot {
            id: UnitId::new(9),
            ..unit.clone()
        };

        assert!(ranges.is_current_for(&unit));
        assert!(!ranges.is_current_for(&moved));
        assert!(!ranges.is_current_for(&other));
    }
}
