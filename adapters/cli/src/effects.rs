//! Turns confirmed action targets into health changes.

use skirmish_core::{ActionDecision, Command, Event, Health, UnitView};
use tracing::debug;

/// Resolves `ActionResolved` events into damage, healing and removals.
#[derive(Debug)]
pub(crate) struct ActionEffects {
    attack_damage: u32,
    heal_amount: u32,
    scratch: Vec<Command>,
}

impl ActionEffects {
    pub(crate) fn new(attack_damage: u32, heal_amount: u32) -> Self {
        Self {
            attack_damage,
            heal_amount,
            scratch: Vec::new(),
        }
    }

    /// Emits one command per action that landed on a unit.
    pub(crate) fn handle(&mut self, events: &[Event], units: &UnitView, out: &mut Vec<Command>) {
        self.scratch.clear();

        for event in events {
            let &Event::ActionResolved {
                unit,
                decision: ActionDecision::Target(cell),
            } = event
            else {
                continue;
            };
            let (Some(actor), Some(target)) = (units.get(unit), units.unit_at(cell)) else {
                continue;
            };

            if target.team == actor.team {
                let health = Health::new(target.health.get().saturating_add(self.heal_amount));
                debug!(unit = unit.get(), target = target.id.get(), "heal lands");
                self.scratch.push(Command::SetHealth {
                    unit: target.id,
                    health,
                });
                continue;
            }

            let remaining = target.health.get().saturating_sub(self.attack_damage);
            debug!(unit = unit.get(), target = target.id.get(), remaining, "attack lands");
            if remaining == 0 {
                self.scratch.push(Command::RemoveUnit { unit: target.id });
            } else {
                self.scratch.push(Command::SetHealth {
                    unit: target.id,
                    health: Health::new(remaining),
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
