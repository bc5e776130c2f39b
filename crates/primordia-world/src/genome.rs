//! Inheritable decision policy for organisms.
//!
//! A genome maps a classified target into an action through a reflex table,
//! with a forced-division override, and mutates on replication.

use crate::cell::Cell;
use crate::organism::Action;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Energy above which an organism is able to divide.
pub const DIVISION_THRESHOLD: i32 = 60;

/// Fixed step applied by scalar mutations.
const MUTATION_STEP: i32 = 5;

/// Classification of a target cell relative to the acting organism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Empty,
    Wall,
    Organic,
    OrganismSimilar,
    OrganismOther,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Empty,
        Target::Wall,
        Target::Organic,
        Target::OrganismSimilar,
        Target::OrganismOther,
    ];

    fn slot(self) -> usize {
        match self {
            Target::Empty => 0,
            Target::Wall => 1,
            Target::Organic => 2,
            Target::OrganismSimilar => 3,
            Target::OrganismOther => 4,
        }
    }
}

/// Reflex table plus the two scalar parameters steering mutation and
/// kin classification. Both scalars live in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    mutation_chance: i32,
    similarity_limit: i32,
    reflexes: [Option<Action>; 5],
}

impl Genome {
    pub fn new(mutation_chance: i32, similarity_limit: i32, reflexes: [Option<Action>; 5]) -> Self {
        Self {
            mutation_chance: mutation_chance.clamp(0, 100),
            similarity_limit: similarity_limit.clamp(0, 100),
            reflexes,
        }
    }

    /// Random genome: scalars uniform over `[0, 100)`, every reflex slot an
    /// independently chosen random action.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mutation_chance = rng.gen_range(0..100);
        let similarity_limit = rng.gen_range(0..100);
        let mut reflexes = [None; 5];
        for slot in reflexes.iter_mut() {
            *slot = Some(Action::random(rng));
        }

        Self {
            mutation_chance,
            similarity_limit,
            reflexes,
        }
    }

    pub fn mutation_chance(&self) -> i32 {
        self.mutation_chance
    }

    pub fn similarity_limit(&self) -> i32 {
        self.similarity_limit
    }

    pub fn reflex(&self, target: Target) -> Option<Action> {
        self.reflexes[target.slot()]
    }

    pub fn set_reflex(&mut self, target: Target, action: Action) {
        self.reflexes[target.slot()] = Some(action);
    }

    /// Classify a target cell from the point of view of this genome's
    /// organism. Anything that is not a wall, organic matter or an organism
    /// falls through to `Empty`; plants classify as empty terrain.
    pub fn classify(&self, target: &Cell) -> Target {
        match target {
            Cell::Wall => Target::Wall,
            Cell::Organic(_) => Target::Organic,
            Cell::Organism(other) => {
                if self.is_similar(&other.genome) {
                    Target::OrganismSimilar
                } else {
                    Target::OrganismOther
                }
            }
            Cell::Empty | Cell::Plant => Target::Empty,
        }
    }

    pub fn action_for(&self, energy: i32, target: &Cell) -> Action {
        self.action_for_target(energy, self.classify(target))
    }

    /// Reflex lookup with the division override: an organism able to divide
    /// that faces empty terrain always divides, whatever the table says.
    /// A missing entry, or a `Divide` entry while division is impossible,
    /// resolves to `Nothing`.
    pub fn action_for_target(&self, energy: i32, target: Target) -> Action {
        let division_possible = energy > DIVISION_THRESHOLD;

        if division_possible && target == Target::Empty {
            return Action::Divide;
        }

        match self.reflexes[target.slot()] {
            None => Action::Nothing,
            Some(Action::Divide) if !division_possible => Action::Nothing,
            Some(action) => action,
        }
    }

    /// Similarity score in `0..=100`: each reflex slot whose entries agree
    /// contributes an equal share.
    pub fn compare(&self, other: &Genome) -> i32 {
        let matching = Target::ALL
            .iter()
            .filter(|target| self.reflexes[target.slot()] == other.reflexes[target.slot()])
            .count();

        (matching * 100 / Target::ALL.len()) as i32
    }

    pub fn is_similar(&self, other: &Genome) -> bool {
        self.compare(other) >= self.similarity_limit
    }

    /// With probability `mutation_chance / 100`, apply exactly one of three
    /// equally likely mutations: step the mutation chance, step the
    /// similarity limit, or replace one uniformly chosen reflex entry with a
    /// fresh random action.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) {
        if rng.gen_range(0..100) >= self.mutation_chance {
            return;
        }

        match rng.gen_range(0..3) {
            0 => {
                let step = if rng.gen::<bool>() {
                    MUTATION_STEP
                } else {
                    -MUTATION_STEP
                };
                self.mutation_chance = (self.mutation_chance + step).clamp(0, 100);
            }
            1 => {
                let step = if rng.gen::<bool>() {
                    MUTATION_STEP
                } else {
                    -MUTATION_STEP
                };
                self.similarity_limit = (self.similarity_limit + step).clamp(0, 100);
            }
            _ => {
                let slot = rng.gen_range(0..self.reflexes.len());
                self.reflexes[slot] = Some(Action::random(rng));
            }
        }
    }

    /// Copy handed to offspring at division time: a clone with at most one
    /// mutation applied.
    pub fn replicate<R: Rng>(&self, rng: &mut R) -> Genome {
        let mut offspring = self.clone();
        offspring.mutate(rng);
        offspring
    }
}
