//! TOML scenario files describing one encounter.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use skirmish_core::{Archetype, CellCoord, Command, Health, Team};

const DEFAULT_ROUNDS: u32 = 6;
const DEFAULT_ATTACK_DAMAGE: u32 = 3;
const DEFAULT_HEAL_AMOUNT: u32 = 2;

/// Errors raised while loading a scenario.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ScenarioError {
    /// The file could not be read.
    #[error("could not read scenario {path}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not a valid scenario document.
    #[error("could not parse scenario")]
    Parse(#[from] toml::de::Error),
    /// A unit starts above its own maximum health.
    #[error("unit {index} starts with {health} health but may hold at most {max_health}")]
    HealthAboveMaximum {
        /// Zero-based position of the unit in the file.
        index: usize,
        /// Configured starting health.
        health: u32,
        /// Configured maximum health.
        max_health: u32,
    },
    /// A unit's world position is NaN or infinite.
    #[error("unit {index} has a non-finite position ({x}, {y})")]
    NonFinitePosition {
        /// Zero-based position of the unit in the file.
        index: usize,
        /// Configured horizontal coordinate.
        x: f32,
        /// Configured vertical coordinate.
        y: f32,
    },
    /// The scenario places no units.
    #[error("scenario places no units")]
    NoUnits,
}

/// Parsed scenario document.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default)]
    pub(crate) encounter: EncounterRules,
    pub(crate) grid: GridLayout,
    #[serde(default)]
    pub(crate) units: Vec<UnitPlacement>,
}

/// `[encounter]` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EncounterRules {
    pub(crate) rounds: u32,
    pub(crate) first_team: Team,
    pub(crate) attack_damage: u32,
    pub(crate) heal_amount: u32,
}

impl Default for EncounterRules {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            first_team: Team::Ally,
            attack_damage: DEFAULT_ATTACK_DAMAGE,
            heal_amount: DEFAULT_HEAL_AMOUNT,
        }
    }
}

/// `[grid]` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GridLayout {
    pub(crate) top_left: CellCoord,
    pub(crate) bottom_right: CellCoord,
    #[serde(default)]
    pub(crate) extraction: Option<CellCoord>,
    #[serde(default)]
    pub(crate) walls: Vec<CellCoord>,
}

/// World-space position handed in by the level editor.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Position {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// One `[[units]]` entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct UnitPlacement {
    pub(crate) team: Team,
    pub(crate) archetype: Archetype,
    pub(crate) position: Position,
    pub(crate) movement_radius: u32,
    pub(crate) attack_radius: u32,
    pub(crate) health: u32,
    #[serde(default)]
    pub(crate) max_health: Option<u32>,
}

impl Scenario {
    /// Reads and validates the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses and validates a scenario document.
    pub(crate) fn parse(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = toml::from_str(text)?;
        if scenario.units.is_empty() {
            return Err(ScenarioError::NoUnits);
        }
        for (index, unit) in scenario.units.iter().enumerate() {
            let Position { x, y } = unit.position;
            if !x.is_finite() || !y.is_finite() {
                return Err(ScenarioError::NonFinitePosition { index, x, y });
            }
            let max_health = unit.max_health.unwrap_or(unit.health);
            if unit.health > max_health {
                return Err(ScenarioError::HealthAboveMaximum {
                    index,
                    health: unit.health,
                    max_health,
                });
            }
        }
        Ok(scenario)
    }

    /// World commands that build the encounter, in application order.
    pub(crate) fn commands(&self) -> Vec<Command> {
        let mut commands = vec![Command::ConfigureGrid {
            top_left: self.grid.top_left,
            bottom_right: self.grid.bottom_right,
        }];
        commands.extend(
            self.grid
                .walls
                .iter()
                .map(|&cell| Command::PlaceWall { cell }),
        );
        if let Some(cell) = self.grid.extraction {
            commands.push(Command::SetExtractionPoint { cell });
        }
        commands.extend(self.units.iter().map(|unit| Command::SpawnUnit {
            team: unit.team,
            archetype: unit.archetype,
            cell: CellCoord::from_world_position(unit.position.x, unit.position.y),
            movement_radius: unit.movement_radius,
            attack_radius: unit.attack_radius,
            health: Health::new(unit.health),
            max_health: Health::new(unit.max_health.unwrap_or(unit.health)),
        }));
        commands
    }
}
