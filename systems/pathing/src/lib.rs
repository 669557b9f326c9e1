#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Team-aware shortest-path trees over the encounter grid.
//!
//! Every call searches outward from a single goal and returns a [`PathTree`]
//! owned by the caller. Each reachable cell of the tree records the next cell
//! to step to on a shortest path toward the goal, so any number of starts can
//! be resolved against one computation.

use skirmish_core::{CellCoord, GridBounds, OccupancyView, Occupant, Team};
use tracing::warn;

/// Multiplier applied to the grid's cell count to bound every search loop.
pub const ITERATION_CAP_FACTOR: usize = 4;

/// Selects which occupants block a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupancy {
    /// Opposing units block; the goal must be free or held by the requester's team.
    Respect,
    /// Only walls block. Used when the caller needs distances rather than a
    /// legal landing spot.
    IgnoreUnits,
}

impl Occupancy {
    /// Reports whether a search for `team` may enter a cell holding `occupant`.
    #[must_use]
    pub fn admits(self, occupant: Occupant, team: Team) -> bool {
        match self {
            Self::Respect => occupant.is_passable_for(team),
            Self::IgnoreUnits => occupant != Occupant::Wall,
        }
    }
}

/// Reasons a pathing request can be refused before any search runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathingError {
    /// The goal lies outside the grid.
    #[error("goal {0:?} lies outside the grid")]
    GoalOutOfBounds(CellCoord),
    /// The goal is currently illegal to stand on for the requesting team.
    #[error("goal {goal:?} is held by {occupant:?}")]
    IllegalGoal {
        /// Requested goal.
        goal: CellCoord,
        /// Occupant that makes the goal illegal.
        occupant: Occupant,
    },
}

/// Back-pointer recorded for a reachable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathLink {
    next: CellCoord,
    depth: u32,
}

impl PathLink {
    /// Next cell toward the goal. The goal links to itself.
    #[must_use]
    pub const fn next(&self) -> CellCoord {
        self.next
    }

    /// Number of steps between the cell and the goal.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }
}

/// Shortest-path tree rooted at a goal cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTree {
    bounds: GridBounds,
    goal: CellCoord,
    links: Vec<Option<PathLink>>,
    reachable: usize,
}

impl PathTree {
    fn rooted_at(bounds: GridBounds, goal: CellCoord) -> Self {
        Self {
            bounds,
            goal,
            links: vec![None; bounds.cell_count()],
            reachable: 0,
        }
    }

    fn link_mut(&mut self, cell: CellCoord) -> Option<&mut Option<PathLink>> {
        let index = self.bounds.index(cell)?;
        self.links.get_mut(index)
    }

    /// Goal every chain in the tree terminates at.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Back-pointer of the cell, or `None` when the search never admitted it.
    #[must_use]
    pub fn link(&self, cell: CellCoord) -> Option<PathLink> {
        self.bounds
            .index(cell)
            .and_then(|index| self.links.get(index).copied().flatten())
    }

    /// Next cell to step to from `cell` toward the goal.
    #[must_use]
    pub fn next_step(&self, cell: CellCoord) -> Option<CellCoord> {
        self.link(cell).map(|link| link.next)
    }

    /// Reports whether the cell has a chain to the goal.
    #[must_use]
    pub fn is_reachable(&self, cell: CellCoord) -> bool {
        self.link(cell).is_some()
    }

    /// Shortest-path length between the cell and the goal.
    #[must_use]
    pub fn cost(&self, cell: CellCoord) -> Option<u32> {
        self.link(cell).map(|link| link.depth)
    }

    /// Number of cells admitted by the search, the goal included.
    #[must_use]
    pub const fn reachable_count(&self) -> usize {
        self.reachable
    }

    /// Forward path from `start` to the goal, both ends included.
    ///
    /// Returns `None` when `start` is unreachable or the chain exceeds the
    /// iteration cap.
    #[must_use]
    pub fn path_from(&self, start: CellCoord) -> Option<Vec<CellCoord>> {
        let mut link = self.link(start)?;
        let mut path = Vec::with_capacity(usize::try_from(link.depth).unwrap_or(0) + 1);
        path.push(start);

        let cap = iteration_cap(self.bounds);
        let mut current = start;
        while link.next != current {
            if path.len() > cap {
                warn!(?start, goal = ?self.goal, cap, "path reconstruction exceeded iteration cap");
                return None;
            }
            current = link.next;
            path.push(current);
            link = self.link(current)?;
        }

        Some(path)
    }
}

/// Breadth-first search driver that keeps its frontier buffers between calls.
#[derive(Debug, Default)]
pub struct Pathfinder {
    frontier: Vec<CellCoord>,
    next_frontier: Vec<CellCoord>,
}

impl Pathfinder {
    /// Computes the shortest-path tree rooted at `goal` for a unit of `team`.
    ///
    /// Neighbors are examined up, left, right, down; the first frontier cell
    /// to discover a neighbor becomes its parent. An unreachable start is not
    /// an error: check [`PathTree::is_reachable`] afterwards.
    pub fn compute_from(
        &mut self,
        view: &OccupancyView<'_>,
        goal: CellCoord,
        team: Team,
        occupancy: Occupancy,
    ) -> Result<PathTree, PathingError> {
        let goal_occupant = view
            .occupant(goal)
            .ok_or(PathingError::GoalOutOfBounds(goal))?;
        if occupancy == Occupancy::Respect && !goal_occupant.is_passable_for(team) {
            return Err(PathingError::IllegalGoal {
                goal,
                occupant: goal_occupant,
            });
        }

        let bounds = view.bounds();
        let mut tree = PathTree::rooted_at(bounds, goal);
        if let Some(slot) = tree.link_mut(goal) {
            *slot = Some(PathLink {
                next: goal,
                depth: 0,
            });
            tree.reachable = 1;
        }

        self.frontier.clear();
        self.next_frontier.clear();
        self.frontier.push(goal);

        let cap = iteration_cap(bounds);
        let mut iterations = 0_usize;
        let mut depth = 0_u32;

        'search: while !self.frontier.is_empty() {
            depth = depth.saturating_add(1);
            for &current in &self.frontier {
                iterations += 1;
                if iterations > cap {
                    warn!(?goal, cap, "pathing search exceeded iteration cap");
                    break 'search;
                }

                for neighbor in bounds.neighbors(current) {
                    let Some(occupant) = view.occupant(neighbor) else {
                        continue;
                    };
                    if !occupancy.admits(occupant, team) {
                        continue;
                    }
                    let Some(slot) = tree.link_mut(neighbor) else {
                        continue;
                    };
                    if slot.is_some() {
                        continue;
                    }

                    *slot = Some(PathLink {
                        next: current,
                        depth,
                    });
                    tree.reachable += 1;
                    self.next_frontier.push(neighbor);
                }
            }

            std::mem::swap(&mut self.frontier, &mut self.next_frontier);
            self.next_frontier.clear();
        }

        Ok(tree)
    }
}

/// Computes a path tree with a one-off [`Pathfinder`].
pub fn compute_pathing_from(
    view: &OccupancyView<'_>,
    goal: CellCoord,
    team: Team,
    occupancy: Occupancy,
) -> Result<PathTree, PathingError> {
    Pathfinder::default().compute_from(view, goal, team, occupancy)
}

fn iteration_cap(bounds: GridBounds) -> usize {
    bounds.cell_count().saturating_mul(ITERATION_CAP_FACTOR)
}
