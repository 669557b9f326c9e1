//! Alternating team rounds over one world.

use anyhow::{bail, Result};
use skirmish_core::{Command, Event, Team, UnitView};
use skirmish_system_turns::TurnController;
use skirmish_world::{self as world, query, World};
use tracing::{info, warn};

use crate::{effects::ActionEffects, scenario::Scenario};

const COMMANDS_PER_UNIT: usize = 4;

/// How the encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Only this team still fields units.
    Victory(Team),
    /// Both teams still field units, or neither does.
    Draw,
}

impl Outcome {
    fn of(units: &UnitView) -> Self {
        let allies = units.on_team(Team::Ally).count();
        let enemies = units.on_team(Team::Enemy).count();
        match (allies, enemies) {
            (0, 0) => Self::Draw,
            (_, 0) => Self::Victory(Team::Ally),
            (0, _) => Self::Victory(Team::Enemy),
            _ => Self::Draw,
        }
    }
}

/// World plus the systems that play it.
#[derive(Debug)]
pub(crate) struct Encounter {
    world: World,
    turns: TurnController,
    effects: ActionEffects,
}

impl Encounter {
    /// Builds the scenario's world, refusing any setup command the world rejects.
    pub(crate) fn new(scenario: &Scenario) -> Result<Self> {
        let mut world = World::new();
        let mut events = Vec::new();
        for command in scenario.commands() {
            events.clear();
            world::apply(&mut world, command.clone(), &mut events);
            if let Some(rejection) = events.iter().find(|event| is_rejection(event)) {
                bail!("scenario command {command:?} was refused: {rejection:?}");
            }
        }

        Ok(Self {
            world,
            turns: TurnController::new(),
            effects: ActionEffects::new(
                scenario.encounter.attack_damage,
                scenario.encounter.heal_amount,
            ),
        })
    }

    /// Read-only access to the encounter state.
    pub(crate) const fn world(&self) -> &World {
        &self.world
    }

    /// Outcome judged from the units standing right now.
    pub(crate) fn outcome(&self) -> Outcome {
        Outcome::of(&query::unit_view(&self.world))
    }

    /// Plays one full round for `team` and returns every event it produced.
    pub(crate) fn play_round(&mut self, team: Team) -> Vec<Event> {
        let units = query::unit_view(&self.world);
        self.turns.begin_round(team, &units);
        let cap = units.len().saturating_mul(COMMANDS_PER_UNIT).saturating_add(1);

        let mut log = Vec::new();
        let mut events = Vec::new();
        let mut commands: Vec<Command> = Vec::new();
        let mut issued = 0_usize;

        loop {
            self.effects
                .handle(&events, &query::unit_view(&self.world), &mut commands);
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            let units = query::unit_view(&self.world);
            self.turns.handle(
                &events,
                query::occupancy_view(&self.world),
                &units,
                query::extraction_point(&self.world),
                &mut commands,
            );
            log.append(&mut events);

            if commands.is_empty() {
                break;
            }
            issued = issued.saturating_add(commands.len());
            if issued > cap {
                warn!(?team, issued, "round exceeded its command budget");
                break;
            }
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        info!(?team, events = log.len(), "round finished");
        log
    }
}

fn is_rejection(event: &Event) -> bool {
    matches!(
        event,
        Event::GridRejected { .. } | Event::PlacementRejected { .. }
    )
}
