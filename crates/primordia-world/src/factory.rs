//! Creation authority for all cell variants.

use crate::cell::{Cell, Organic, CORPSE_NUTRITION};
use crate::genome::Genome;
use crate::organism::{Organism, MAX_ENERGY};
use primordia_core::{CellId, Direction};

/// The sole creator of concrete cell variants. Identity assignment and
/// default field values live here and nowhere else; the grid and dividing
/// organisms both consume it but never construct variants directly.
#[derive(Debug)]
pub struct CellFactory {
    next_id: u64,
}

impl CellFactory {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn create_empty(&self) -> Cell {
        Cell::Empty
    }

    pub fn create_wall(&self) -> Cell {
        Cell::Wall
    }

    pub fn create_plant(&self) -> Cell {
        Cell::Plant
    }

    pub fn create_organic(&self) -> Cell {
        Cell::Organic(Organic::new(CORPSE_NUTRITION))
    }

    pub fn create_organism(
        &mut self,
        genome: Genome,
        direction: Direction,
        energy: i32,
        lineage: u64,
    ) -> Cell {
        let id = CellId(self.next_id);
        self.next_id += 1;

        Cell::Organism(Organism {
            id,
            energy: energy.clamp(0, MAX_ENERGY),
            direction,
            age: 0,
            lineage,
            genome,
        })
    }
}

impl Default for CellFactory {
    fn default() -> Self {
        Self::new()
    }
}
