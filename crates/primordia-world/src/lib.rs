//! World simulation engine.
//!
//! A 2D grid of cells (empty space, walls, plants, decaying matter and
//! organisms) advanced one deterministic tick at a time. Organisms carry
//! an inheritable genome that maps what they face into what they do.

pub mod cell;
pub mod context;
pub mod events;
pub mod factory;
pub mod game;
pub mod genome;
pub mod grid;
pub mod organism;

pub use cell::{Cell, CellDescriptor, CellKind, Organic, CORPSE_NUTRITION, FLAT_RECORD_LEN};
pub use context::UpdateContext;
pub use events::{EventBus, GameEvent};
pub use factory::CellFactory;
pub use game::Game;
pub use genome::{Genome, Target, DIVISION_THRESHOLD};
pub use grid::{Grid, GridSnapshot};
pub use organism::{Action, Organism, MAX_ENERGY};
