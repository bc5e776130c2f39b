//! Cell variants occupying grid positions.
//!
//! Every grid position holds exactly one `Cell`; an unoccupied position
//! holds `Cell::Empty`, never a hole. The closed enum replaces run-time
//! type tests with exhaustive matches at classification time.

use crate::context::UpdateContext;
use crate::organism::Organism;
use primordia_core::{CellId, Direction};
use serde::{Deserialize, Serialize};

/// Nutrition carried by a fresh corpse.
pub const CORPSE_NUTRITION: i32 = 40;

/// Ticks before decaying matter disappears from the grid.
const DECAY_TICKS: i32 = 100;

/// Record stride of the flat snapshot encoding: type tag + three payload
/// scalars per cell.
pub const FLAT_RECORD_LEN: usize = 4;

const FLAT_TAG_EMPTY: i32 = 0;
const FLAT_TAG_ORGANISM: i32 = 1;
const FLAT_TAG_ORGANIC: i32 = 2;
const FLAT_TAG_WALL: i32 = 3;
const FLAT_TAG_PLANT: i32 = 4;

/// One grid position's occupant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    Plant,
    Organic(Organic),
    Organism(Organism),
}

/// Coarse cell category, carried by events and descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Empty,
    Wall,
    Plant,
    Organic,
    Organism,
}

impl Cell {
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Empty => CellKind::Empty,
            Cell::Wall => CellKind::Wall,
            Cell::Plant => CellKind::Plant,
            Cell::Organic(_) => CellKind::Organic,
            Cell::Organism(_) => CellKind::Organism,
        }
    }

    /// Static cells are skipped by the per-tick update pass.
    pub fn is_static(&self) -> bool {
        match self {
            Cell::Empty | Cell::Wall | Cell::Plant => true,
            Cell::Organic(_) | Cell::Organism(_) => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn id(&self) -> Option<CellId> {
        match self {
            Cell::Organism(organism) => Some(organism.id),
            _ => None,
        }
    }

    /// Lightweight descriptor for transmission to rendering or snapshot
    /// collaborators.
    pub fn descriptor(&self) -> CellDescriptor {
        match self {
            Cell::Empty => CellDescriptor::Empty,
            Cell::Wall => CellDescriptor::Wall,
            Cell::Plant => CellDescriptor::Plant,
            Cell::Organic(organic) => CellDescriptor::Organic {
                nutrition: organic.nutrition,
            },
            Cell::Organism(organism) => CellDescriptor::Organism {
                id: organism.id,
                energy: organism.energy,
                direction: organism.direction,
                age: organism.age,
                lineage: organism.lineage,
            },
        }
    }

    /// Fixed-width record for the flat snapshot encoding.
    pub fn flat_record(&self) -> [i32; FLAT_RECORD_LEN] {
        match self {
            Cell::Empty => [FLAT_TAG_EMPTY, 0, 0, 0],
            Cell::Wall => [FLAT_TAG_WALL, 0, 0, 0],
            Cell::Plant => [FLAT_TAG_PLANT, 0, 0, 0],
            Cell::Organic(organic) => [FLAT_TAG_ORGANIC, organic.nutrition, 0, 0],
            Cell::Organism(organism) => [
                FLAT_TAG_ORGANISM,
                organism.energy,
                organism.age as i32,
                organism.direction.index(),
            ],
        }
    }
}

/// Decaying organic matter left behind by a dead organism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organic {
    /// Energy an organism gains by eating this cell.
    pub nutrition: i32,
    /// Remaining ticks before the matter dissolves into an empty cell.
    pub decay: i32,
}

impl Organic {
    pub fn new(nutrition: i32) -> Self {
        Self {
            nutrition,
            decay: DECAY_TICKS,
        }
    }

    /// Per-tick decay; the cell removes itself once the clock runs out and
    /// returns part of its nutrition to the mineral substrate.
    pub(crate) fn update(ctx: &mut UpdateContext<'_>) {
        let dissolved = {
            let Cell::Organic(organic) = ctx.grid.get_mut(ctx.pos) else {
                return;
            };
            organic.decay -= 1;
            (organic.decay <= 0).then_some(organic.nutrition)
        };

        if let Some(nutrition) = dissolved {
            let enriched = ctx.grid.minerals_level(ctx.pos) + nutrition / 4;
            ctx.grid.set_minerals_level(ctx.pos, enriched);
            ctx.grid.delete(ctx.pos);
        }
    }
}

/// Serialized cell: type tag plus the minimal per-variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellDescriptor {
    Empty,
    Wall,
    Plant,
    Organic {
        nutrition: i32,
    },
    Organism {
        id: CellId,
        energy: i32,
        direction: Direction,
        age: u32,
        lineage: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;

    fn test_organism() -> Organism {
        Organism {
            id: CellId(7),
            energy: 80,
            direction: Direction::East,
            age: 3,
            lineage: 1,
            genome: Genome::new(10, 50, Default::default()),
        }
    }

    #[test]
    fn test_static_flags() {
        assert!(Cell::Empty.is_static());
        assert!(Cell::Wall.is_static());
        assert!(Cell::Plant.is_static());
        assert!(!Cell::Organic(Organic::new(CORPSE_NUTRITION)).is_static());
        assert!(!Cell::Organism(test_organism()).is_static());
    }

    #[test]
    fn test_only_empty_is_empty() {
        assert!(Cell::Empty.is_empty());
        assert!(!Cell::Wall.is_empty());
        assert!(!Cell::Plant.is_empty());
    }

    #[test]
    fn test_only_organisms_carry_identity() {
        assert_eq!(Cell::Organism(test_organism()).id(), Some(CellId(7)));
        assert_eq!(Cell::Plant.id(), None);
        assert_eq!(Cell::Organic(Organic::new(10)).id(), None);
    }

    #[test]
    fn test_flat_record_tags() {
        assert_eq!(Cell::Empty.flat_record()[0], FLAT_TAG_EMPTY);
        assert_eq!(Cell::Wall.flat_record()[0], FLAT_TAG_WALL);
        assert_eq!(Cell::Plant.flat_record()[0], FLAT_TAG_PLANT);

        let record = Cell::Organism(test_organism()).flat_record();
        assert_eq!(record[0], FLAT_TAG_ORGANISM);
        assert_eq!(record[1], 80);
        assert_eq!(record[2], 3);
        assert_eq!(record[3], Direction::East.index());
    }

    #[test]
    fn test_decay_enriches_minerals_and_clears_cell() {
        use crate::context::UpdateContext;
        use crate::factory::CellFactory;
        use crate::grid::Grid;
        use primordia_core::{LoopMode, Position};
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let mut grid = Grid::new(2, 2, LoopMode::Finite);
        let mut factory = CellFactory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let pos = Position::new(0, 0);
        grid.insert(
            pos,
            Cell::Organic(Organic {
                nutrition: 40,
                decay: 1,
            }),
        );
        grid.set_minerals_level(pos, 50);

        let mut ctx = UpdateContext {
            grid: &mut grid,
            factory: &mut factory,
            rng: &mut rng,
            pos,
        };
        Organic::update(&mut ctx);

        assert!(grid.get(pos).is_empty());
        assert_eq!(grid.minerals_level(pos), 60);
    }

    #[test]
    fn test_descriptor_json_tag() {
        let json = serde_json::to_string(&Cell::Plant.descriptor()).unwrap();
        assert_eq!(json, r#"{"type":"plant"}"#);

        let json = serde_json::to_string(&Cell::Organic(Organic::new(40)).descriptor()).unwrap();
        assert!(json.contains(r#""type":"organic""#));
        assert!(json.contains(r#""nutrition":40"#));
    }
}
