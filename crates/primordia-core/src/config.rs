//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::LoopMode;
use serde::{Deserialize, Serialize};

/// Game configuration, immutable for the lifetime of one `Game` instance.
///
/// A new configuration requires constructing a new game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Grid boundary behavior
    pub loop_mode: LoopMode,
    /// Number of organisms seeded at construction
    pub population: usize,
    /// Plant spawn rate; 10.0 reproduces the baseline seeding probability
    /// of `count_empty / total_cells / 100` per empty cell and tick.
    pub plant_spawn_rate: f64,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 50,
            loop_mode: LoopMode::Finite,
            population: 1,
            plant_spawn_rate: 10.0,
            seed: 0,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::Validation(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        let total = self.width as usize * self.height as usize;
        if self.population > total {
            return Err(Error::Validation(format!(
                "population {} does not fit in a {}x{} grid",
                self.population, self.width, self.height
            )));
        }

        if !(self.plant_spawn_rate >= 0.0) {
            return Err(Error::Validation(format!(
                "plant spawn rate must be non-negative, got {}",
                self.plant_spawn_rate
            )));
        }

        Ok(())
    }

    pub fn total_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
