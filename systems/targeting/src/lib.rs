#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision procedures for autonomous units.
//!
//! Each archetype answers two questions for the unit whose turn it is: which
//! cell to move to, and what to target once the move has executed. Decisions
//! are plain return values; executing them is up to the turn controller and
//! the world.

mod blocker;
mod opening;
mod pursuer;
mod support;

use skirmish_core::{ActionDecision, Archetype, CellCoord, OccupancyView, UnitSnapshot, UnitView};
use skirmish_system_range::UnitRanges;
use tracing::warn;

pub use blocker::Blocker;
pub use pursuer::Pursuer;
pub use support::Support;

/// Read-only inputs for one decision.
#[derive(Clone, Copy, Debug)]
pub struct DecisionContext<'a> {
    /// Occupancy snapshot of the grid.
    pub occupancy: OccupancyView<'a>,
    /// Every unit in the encounter.
    pub units: &'a UnitView,
    /// Unit the decision is made for.
    pub actor: &'a UnitSnapshot,
    /// Ranges computed for the actor before this decision.
    pub ranges: Option<&'a UnitRanges>,
}

impl<'a> DecisionContext<'a> {
    /// Bundles the inputs of one decision.
    #[must_use]
    pub const fn new(
        occupancy: OccupancyView<'a>,
        units: &'a UnitView,
        actor: &'a UnitSnapshot,
        ranges: Option<&'a UnitRanges>,
    ) -> Self {
        Self {
            occupancy,
            units,
            actor,
            ranges,
        }
    }

    /// Ranges that still describe the actor where it stands.
    ///
    /// Missing or stale ranges are logged and reported as `None`, which every
    /// archetype turns into staying put or skipping its action.
    pub(crate) fn current_ranges(&self, decision: &'static str) -> Option<&'a UnitRanges> {
        match self.ranges {
            Some(ranges) if ranges.is_current_for(self.actor) => Some(ranges),
            Some(ranges) => {
                warn!(
                    unit = self.actor.id.get(),
                    decision,
                    computed_for = ranges.unit().get(),
                    origin = ?ranges.origin(),
                    "ranges are stale, abandoning decision"
                );
                None
            }
            None => {
                warn!(
                    unit = self.actor.id.get(),
                    decision, "ranges were not computed, abandoning decision"
                );
                None
            }
        }
    }

    pub(crate) const fn stay(&self) -> CellCoord {
        self.actor.cell
    }
}

/// Capability shared by every autonomous archetype.
pub trait TargetSelection {
    /// Cell the actor should move to. The actor's own cell means stay.
    fn select_move_tile(&self, context: &DecisionContext<'_>) -> CellCoord;

    /// Cell the actor should act on after moving, or [`ActionDecision::Skip`].
    fn select_attack_target(&self, context: &DecisionContext<'_>) -> ActionDecision;
}

/// Dispatches to the decision procedure matching a unit's archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    /// See [`Pursuer`].
    Pursuer(Pursuer),
    /// See [`Blocker`].
    Blocker(Blocker),
    /// See [`Support`].
    Support(Support),
}

impl Selector {
    /// Picks the procedure for `archetype`. Blockers guard `extraction`.
    #[must_use]
    pub const fn for_archetype(archetype: Archetype, extraction: Option<CellCoord>) -> Self {
        match archetype {
            Archetype::Pursuer => Self::Pursuer(Pursuer),
            Archetype::Blocker => Self::Blocker(Blocker::new(extraction)),
            Archetype::Support => Self::Support(Support),
        }
    }
}

impl TargetSelection for Selector {
    fn select_move_tile(&self, context: &DecisionContext<'_>) -> CellCoord {
        match self {
            Self::Pursuer(pursuer) => pursuer.select_move_tile(context),
            Self::Blocker(blocker) => blocker.select_move_tile(context),
            Self::Support(support) => support.select_move_tile(context),
        }
    }

    fn select_attack_target(&self, context: &DecisionContext<'_>) -> ActionDecision {
        match self {
            Self::Pursuer(pursuer) => pursuer.select_attack_target(context),
            Self::Blocker(blocker) => blocker.select_attack_target(context),
            Self::Support(support) => support.select_attack_target(context),
        }
    }
}
