//! Organism state and per-tick behavior.

use crate::cell::Cell;
use crate::context::UpdateContext;
use crate::genome::Genome;
use primordia_core::{CellId, Direction};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Upper bound on stored energy.
pub const MAX_ENERGY: i32 = 255;

/// Basal energy drain per tick.
const UPKEEP: i32 = 1;

/// Organisms die of old age past this many ticks.
const MAX_AGE: u32 = 1000;

/// Baseline energy gained by eating a plant, scaled by local light.
const PLANT_ENERGY: i32 = 30;

/// Energy removed from the victim of an attack; the attacker absorbs half.
const ATTACK_DAMAGE: i32 = 30;

/// Energy spent to launch an attack.
const ATTACK_COST: i32 = 5;

/// Energy burned by a division on top of the split.
const DIVISION_COST: i32 = 10;

/// The active agent. Lives in a grid slot, carries an identity registered
/// in the grid's index, and drives itself through its genome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    pub id: CellId,
    pub energy: i32,
    pub direction: Direction,
    pub age: u32,
    /// Inherited unchanged by offspring; groups organisms into families for
    /// external observers.
    pub lineage: u64,
    pub genome: Genome,
}

impl Organism {
    pub fn add_energy(&mut self, amount: i32) {
        self.energy = (self.energy + amount).min(MAX_ENERGY);
    }
}

/// Everything an organism can decide to do in one tick. `Move`, `Eat` and
/// `Attack` operate on the cell the organism is facing; eight-direction
/// movement falls out of facing plus turning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Nothing,
    Move,
    TurnLeft,
    TurnRight,
    Eat,
    Attack,
    Divide,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Nothing,
        Action::Move,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Eat,
        Action::Attack,
        Action::Divide,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Action {
        Action::ALL[rng.gen_range(0..Action::ALL.len())]
    }
}

/// One organism tick: upkeep, sensing, genome decision, application.
pub(crate) fn update(ctx: &mut UpdateContext<'_>) {
    let pos = ctx.pos;

    // Upkeep comes first; starvation or old age turns the slot into a corpse.
    let died = {
        let Cell::Organism(organism) = ctx.grid.get_mut(pos) else {
            return;
        };
        organism.age += 1;
        organism.energy -= UPKEEP;
        organism.energy <= 0 || organism.age >= MAX_AGE
    };

    if died {
        let id = ctx.grid.get(pos).id();
        debug!(id = ?id, position = %pos, "organism died");
        let corpse = ctx.factory.create_organic();
        ctx.grid.delete(pos);
        ctx.grid.insert(pos, corpse);
        return;
    }

    // Sense the faced cell and ask the genome for a decision. Off-grid
    // targets in a finite world read as wall.
    let (action, target) = {
        let Cell::Organism(organism) = ctx.grid.get(pos) else {
            return;
        };
        match ctx.grid.resolve_neighbor(pos, organism.direction) {
            Some(target) => (
                organism.genome.action_for(organism.energy, ctx.grid.get(target)),
                Some(target),
            ),
            None => (
                organism
                    .genome
                    .action_for_target(organism.energy, crate::genome::Target::Wall),
                None,
            ),
        }
    };

    apply(ctx, action, target);
}

fn apply(ctx: &mut UpdateContext<'_>, action: Action, target: Option<primordia_core::Position>) {
    let pos = ctx.pos;

    match action {
        Action::Nothing => {}

        Action::TurnLeft => {
            if let Cell::Organism(organism) = ctx.grid.get_mut(pos) {
                organism.direction = organism.direction.turn_left();
            }
        }

        Action::TurnRight => {
            if let Cell::Organism(organism) = ctx.grid.get_mut(pos) {
                organism.direction = organism.direction.turn_right();
            }
        }

        Action::Move => {
            let Some(target) = target else { return };
            if !ctx.grid.get(target).is_empty() {
                return;
            }

            let cell = ctx.grid.get(pos).clone();
            ctx.grid.delete(pos);
            ctx.grid.insert(target, cell);
        }

        Action::Eat => {
            let Some(target) = target else { return };
            let gained = match ctx.grid.get(target) {
                Cell::Plant => PLANT_ENERGY * ctx.grid.light_level(target) / 100,
                Cell::Organic(organic) => organic.nutrition,
                _ => return,
            };

            ctx.grid.delete(target);
            if let Cell::Organism(organism) = ctx.grid.get_mut(pos) {
                organism.add_energy(gained);
            }
        }

        Action::Attack => {
            let Some(target) = target else { return };

            let killed = {
                let Cell::Organism(victim) = ctx.grid.get_mut(target) else {
                    return;
                };
                victim.energy -= ATTACK_DAMAGE;
                victim.energy <= 0
            };

            if killed {
                trace!(position = %target, "organism killed by attack");
                let corpse = ctx.factory.create_organic();
                ctx.grid.delete(target);
                ctx.grid.insert(target, corpse);
            }

            if let Cell::Organism(attacker) = ctx.grid.get_mut(pos) {
                attacker.energy -= ATTACK_COST;
                attacker.add_energy(ATTACK_DAMAGE / 2);
            }
        }

        Action::Divide => {
            let Some(target) = target else { return };
            if !ctx.grid.get(target).is_empty() {
                return;
            }

            let (child, remaining) = {
                let Cell::Organism(parent) = ctx.grid.get(pos) else {
                    return;
                };
                let budget = parent.energy - DIVISION_COST;
                if budget < 2 {
                    return;
                }

                let genome = parent.genome.replicate(ctx.rng);
                let direction = Direction::random(ctx.rng);
                let child_energy = budget / 2;
                let child =
                    ctx.factory
                        .create_organism(genome, direction, child_energy, parent.lineage);
                (child, budget - child_energy)
            };

            trace!(position = %target, "organism divided");
            ctx.grid.insert(target, child);
            if let Cell::Organism(parent) = ctx.grid.get_mut(pos) {
                parent.energy = remaining;
            }
        }
    }
}
