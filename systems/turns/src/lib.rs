#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn sequencing for one team's round.
//!
//! The controller walks the team's units one at a time. For each unit it asks
//! the unit's archetype for a destination, waits for the world to confirm or
//! refuse the move, asks for an action target, and waits for the action to
//! resolve before calling the next unit.

use std::collections::VecDeque;

use skirmish_core::{CellCoord, Command, Event, OccupancyView, Team, UnitId, UnitView};
use skirmish_system_range::UnitRanges;
use skirmish_system_targeting::{DecisionContext, Selector, TargetSelection};
use tracing::debug;

/// Where the controller stands within the current round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TurnPhase {
    /// Ready to call the next queued unit.
    #[default]
    Idle,
    /// A move command was issued and the world has not answered yet.
    AwaitingMove {
        /// Unit whose move is pending.
        unit: UnitId,
    },
    /// The move finished; the unit picks its action next.
    ReadyToAct {
        /// Unit about to act.
        unit: UnitId,
    },
    /// An action command was issued and the world has not answered yet.
    AwaitingAction {
        /// Unit whose action is pending.
        unit: UnitId,
    },
    /// Every queued unit has taken its turn.
    RoundComplete,
}

impl TurnPhase {
    /// Unit the phase refers to, if any.
    #[must_use]
    pub const fn unit(&self) -> Option<UnitId> {
        match self {
            Self::AwaitingMove { unit } | Self::ReadyToAct { unit } | Self::AwaitingAction { unit } => {
                Some(*unit)
            }
            Self::Idle | Self::RoundComplete => None,
        }
    }
}

/// Drives one team's units through their move and action, one at a time.
#[derive(Debug, Default)]
pub struct TurnController {
    team: Option<Team>,
    queue: VecDeque<UnitId>,
    phase: TurnPhase,
}

impl TurnController {
    /// Creates a controller with no round in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues every unit of `team` in identifier order, discarding any round
    /// still in progress.
    pub fn begin_round(&mut self, team: Team, units: &UnitView) {
        self.team = Some(team);
        self.queue = units.on_team(team).map(|unit| unit.id).collect();
        self.phase = TurnPhase::Idle;
        debug!(?team, units = self.queue.len(), "round started");
    }

    /// Team whose round is in progress.
    #[must_use]
    pub const fn active_team(&self) -> Option<Team> {
        self.team
    }

    /// Current phase of the round.
    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Reports whether every queued unit has finished its turn.
    #[must_use]
    pub const fn is_round_complete(&self) -> bool {
        matches!(self.phase, TurnPhase::RoundComplete)
    }

    /// Consumes world events and emits the next command of the round, if any.
    ///
    /// At most one command is pushed per call. Ranges are recomputed from
    /// `occupancy` before every decision.
    pub fn handle(
        &mut self,
        events: &[Event],
        occupancy: OccupancyView<'_>,
        units: &UnitView,
        extraction: Option<CellCoord>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            self.observe(event);
        }

        loop {
            match self.phase {
                TurnPhase::Idle => {
                    let Some(unit) = self.queue.pop_front() else {
                        if self.team.is_some() {
                            debug!(team = ?self.team, "round complete");
                            self.phase = TurnPhase::RoundComplete;
                        }
                        return;
                    };
                    let Some(actor) = units.get(unit) else {
                        debug!(unit = unit.get(), "queued unit is gone, skipping");
                        continue;
                    };

                    let ranges = UnitRanges::for_turn(&occupancy, actor);
                    let context = DecisionContext::new(occupancy, units, actor, Some(&ranges));
                    let destination = Selector::for_archetype(actor.archetype, extraction)
                        .select_move_tile(&context);
                    debug!(unit = unit.get(), from = ?actor.cell, to = ?destination, "move chosen");
                    out.push(Command::MoveUnit { unit, destination });
                    self.phase = TurnPhase::AwaitingMove { unit };
                    return;
                }
                TurnPhase::ReadyToAct { unit } => {
                    let Some(actor) = units.get(unit) else {
                        self.phase = TurnPhase::Idle;
                        continue;
                    };

                    let ranges = UnitRanges::for_action(&occupancy, actor);
                    let context = DecisionContext::new(occupancy, units, actor, Some(&ranges));
                    let decision = Selector::for_archetype(actor.archetype, extraction)
                        .select_attack_target(&context);
                    debug!(unit = unit.get(), ?decision, "action chosen");
                    out.push(Command::PerformAction { unit, decision });
                    self.phase = TurnPhase::AwaitingAction { unit };
                    return;
                }
                TurnPhase::AwaitingMove { .. }
                | TurnPhase::AwaitingAction { .. }
                | TurnPhase::RoundComplete => return,
            }
        }
    }

    fn observe(&mut self, event: &Event) {
        match (event, self.phase) {
            (&Event::UnitMoved { unit, .. }, TurnPhase::AwaitingMove { unit: pending })
            | (&Event::MoveRejected { unit, .. }, TurnPhase::AwaitingMove { unit: pending })
                if unit == pending =>
            {
                self.phase = TurnPhase::ReadyToAct { unit };
            }
            (&Event::ActionResolved { unit, .. }, TurnPhase::AwaitingAction { unit: pending })
                if unit == pending =>
            {
                self.phase = TurnPhase::Idle;
            }
            (&Event::UnitRemoved { unit, .. }, phase) => {
                self.queue.retain(|queued| *queued != unit);
                if phase.unit() == Some(unit) {
                    debug!(unit = unit.get(), "acting unit removed mid-turn");
                    self.phase = TurnPhase::Idle;
                }
            }
            _ => {}
        }
    }
}
