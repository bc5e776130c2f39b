//! Per-cell update context.

use crate::factory::CellFactory;
use crate::grid::Grid;
use primordia_core::Position;
use rand_chacha::ChaCha8Rng;

/// Everything a non-static cell may touch during its single update of a
/// tick: the grid, the factory for creating new cells, the shared seeded
/// randomness stream, and its own current coordinates.
pub struct UpdateContext<'a> {
    pub grid: &'a mut Grid,
    pub factory: &'a mut CellFactory,
    pub rng: &'a mut ChaCha8Rng,
    pub pos: Position,
}
