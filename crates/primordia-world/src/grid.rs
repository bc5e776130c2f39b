//! Dense 2D grid with an identity index.
//!
//! The grid exclusively owns every cell. The id index is a non-owning
//! lookup accelerator kept in lock-step with the primary array by the same
//! operations that mutate it. Out-of-range coordinates are caller bugs and
//! fail fast by assertion.

use crate::cell::{Cell, CellDescriptor, FLAT_RECORD_LEN};
use crate::events::GameEvent;
use primordia_core::{CellId, Direction, LoopMode, Position, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upper bound of the per-cell mineral and light fields.
const RESOURCE_MAX: i32 = 100;

pub struct Grid {
    width: i32,
    height: i32,
    loop_mode: LoopMode,
    cells: Vec<Cell>,
    minerals: Vec<i32>,
    light: Vec<i32>,
    index: HashMap<CellId, Position>,
    journal: Vec<GameEvent>,
}

impl Grid {
    pub fn new(width: i32, height: i32, loop_mode: LoopMode) -> Self {
        assert!(width > 0, "grid width must be positive");
        assert!(height > 0, "grid height must be positive");

        let size = (width * height) as usize;
        Self {
            width,
            height,
            loop_mode,
            cells: vec![Cell::Empty; size],
            minerals: vec![RESOURCE_MAX; size],
            light: vec![RESOURCE_MAX; size],
            index: HashMap::new(),
            journal: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Canonical storage index: x-major, so linear order matches the
    /// iteration contract (x outer, y inner).
    fn idx(&self, pos: Position) -> usize {
        assert!(
            pos.in_bounds(self.width, self.height),
            "position {} outside {}x{} grid",
            pos,
            self.width,
            self.height
        );
        (pos.x * self.height + pos.y) as usize
    }

    /// Place a cell, replacing the occupant. Both the replaced occupant's
    /// identity and the new cell's identity are synced into the index.
    pub fn insert(&mut self, pos: Position, cell: Cell) {
        let i = self.idx(pos);

        if let Some(old_id) = self.cells[i].id() {
            self.index.remove(&old_id);
        }
        if let Some(id) = cell.id() {
            self.index.insert(id, pos);
        }

        let kind = cell.kind();
        self.cells[i] = cell;
        self.journal.push(GameEvent::CellInserted {
            position: pos,
            kind,
        });
    }

    /// Replace the occupant with an empty cell, unregistering its identity.
    pub fn delete(&mut self, pos: Position) {
        let i = self.idx(pos);
        let old = std::mem::replace(&mut self.cells[i], Cell::Empty);
        if let Some(id) = old.id() {
            self.index.remove(&id);
        }

        self.journal.push(GameEvent::CellDeleted {
            position: pos,
            kind: old.kind(),
        });
    }

    /// Current occupant. No boundary wraparound is applied here; callers
    /// resolve the loop mode through `resolve_neighbor` before indexing.
    pub fn get(&self, pos: Position) -> &Cell {
        let i = self.idx(pos);
        &self.cells[i]
    }

    pub fn get_mut(&mut self, pos: Position) -> &mut Cell {
        let i = self.idx(pos);
        &mut self.cells[i]
    }

    /// O(1) identity lookup through the index.
    pub fn find(&self, id: CellId) -> Option<(Position, &Cell)> {
        let pos = *self.index.get(&id)?;
        Some((pos, self.get(pos)))
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    /// Single authoritative boundary resolution: the neighbor coordinate in
    /// the given direction, or `None` when a finite world has no cell there.
    pub fn resolve_neighbor(&self, pos: Position, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let target = pos.offset(dx, dy);

        match self.loop_mode {
            LoopMode::Torus => Some(target.wrap(self.width, self.height)),
            LoopMode::Finite => target.in_bounds(self.width, self.height).then_some(target),
        }
    }

    /// Iterate cells in canonical order (x outer, y inner). Later cells in a
    /// tick pass observe mutations made by earlier ones, so this exact order
    /// is a determinism contract.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let x = i as i32 / self.height;
            let y = i as i32 % self.height;
            (Position::new(x, y), cell)
        })
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| Position::new(x, y)))
    }

    pub fn light_level(&self, pos: Position) -> i32 {
        self.light[self.idx(pos)]
    }

    pub fn minerals_level(&self, pos: Position) -> i32 {
        self.minerals[self.idx(pos)]
    }

    pub fn set_light_level(&mut self, pos: Position, level: i32) {
        let i = self.idx(pos);
        self.light[i] = level.clamp(0, RESOURCE_MAX);
    }

    pub fn set_minerals_level(&mut self, pos: Position, level: i32) {
        let i = self.idx(pos);
        self.minerals[i] = level.clamp(0, RESOURCE_MAX);
    }

    /// Drain the insert/delete journal in operation order.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.journal)
    }

    /// Nested descriptor snapshot, x-major like the iteration order.
    pub fn serialize(&self) -> GridSnapshot {
        let cells = (0..self.width)
            .map(|x| {
                (0..self.height)
                    .map(|y| self.get(Position::new(x, y)).descriptor())
                    .collect()
            })
            .collect();

        GridSnapshot {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Flat fixed-stride encoding for high-throughput consumers: one record
    /// of `FLAT_RECORD_LEN` numbers per cell, canonical order.
    pub fn serialize_flat(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.cells.len() * FLAT_RECORD_LEN);
        for cell in &self.cells {
            out.extend_from_slice(&cell.flat_record());
        }
        out
    }
}

/// Grid of lightweight descriptors suitable for transmission to a rendering
/// or snapshot collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Vec<CellDescriptor>>,
}

impl GridSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellKind;
    use crate::factory::CellFactory;
    use crate::genome::Genome;

    fn organism(factory: &mut CellFactory) -> Cell {
        factory.create_organism(Genome::new(0, 50, [None; 5]), Direction::North, 50, 0)
    }

    #[test]
    fn test_insert_then_get_round_trip() {
        let mut grid = Grid::new(4, 3, LoopMode::Finite);
        grid.insert(Position::new(2, 1), Cell::Wall);
        assert_eq!(grid.get(Position::new(2, 1)).kind(), CellKind::Wall);
    }

    #[test]
    fn test_new_grid_is_all_empty() {
        let grid = Grid::new(4, 3, LoopMode::Finite);
        assert_eq!(grid.count_empty(), 12);
        assert!(grid.iter().all(|(_, cell)| cell.is_empty()));
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_rejects_non_positive_dimensions() {
        Grid::new(0, 3, LoopMode::Finite);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_range_get_is_fatal() {
        let grid = Grid::new(4, 3, LoopMode::Finite);
        grid.get(Position::new(4, 0));
    }

    #[test]
    fn test_delete_clears_cell_and_index() {
        let mut factory = CellFactory::new();
        let mut grid = Grid::new(4, 3, LoopMode::Finite);
        let cell = organism(&mut factory);
        let id = cell.id().unwrap();

        grid.insert(Position::new(1, 1), cell);
        assert!(grid.find(id).is_some());

        grid.delete(Position::new(1, 1));
        assert!(grid.get(Position::new(1, 1)).is_empty());
        assert!(grid.find(id).is_none());
    }

    #[test]
    fn test_insert_over_organism_unregisters_it() {
        let mut factory = CellFactory::new();
        let mut grid = Grid::new(4, 3, LoopMode::Finite);
        let cell = organism(&mut factory);
        let id = cell.id().unwrap();

        grid.insert(Position::new(1, 1), cell);
        grid.insert(Position::new(1, 1), Cell::Plant);
        assert!(grid.find(id).is_none());
    }

    #[test]
    fn test_find_reports_current_position() {
        let mut factory = CellFactory::new();
        let mut grid = Grid::new(4, 3, LoopMode::Finite);
        let cell = organism(&mut factory);
        let id = cell.id().unwrap();

        grid.insert(Position::new(3, 2), cell);
        let (pos, found) = grid.find(id).unwrap();
        assert_eq!(pos, Position::new(3, 2));
        assert_eq!(found.id(), Some(id));
    }

    #[test]
    fn test_finite_boundary_rejects_edges() {
        let grid = Grid::new(5, 5, LoopMode::Finite);
        assert_eq!(
            grid.resolve_neighbor(Position::new(0, 0), Direction::West),
            None
        );
        assert_eq!(
            grid.resolve_neighbor(Position::new(4, 4), Direction::SouthEast),
            None
        );
        assert_eq!(
            grid.resolve_neighbor(Position::new(0, 0), Direction::East),
            Some(Position::new(1, 0))
        );
    }

    #[test]
    fn test_toroidal_boundary_wraps() {
        // Westward from (0, 0) on a 5x5 torus lands at (4, 0).
        let grid = Grid::new(5, 5, LoopMode::Torus);
        assert_eq!(
            grid.resolve_neighbor(Position::new(0, 0), Direction::West),
            Some(Position::new(4, 0))
        );
        assert_eq!(
            grid.resolve_neighbor(Position::new(4, 4), Direction::SouthEast),
            Some(Position::new(0, 0))
        );
    }

    #[test]
    fn test_iteration_order_is_x_outer_y_inner() {
        let grid = Grid::new(3, 2, LoopMode::Finite);
        let visited: Vec<Position> = grid.iter().map(|(pos, _)| pos).collect();
        let expected = vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(2, 0),
            Position::new(2, 1),
        ];
        assert_eq!(visited, expected);

        let from_positions: Vec<Position> = grid.positions().collect();
        assert_eq!(from_positions, expected);
    }

    #[test]
    fn test_resource_fields_default_and_clamp() {
        let mut grid = Grid::new(3, 3, LoopMode::Finite);
        let pos = Position::new(1, 1);
        assert_eq!(grid.light_level(pos), 100);
        assert_eq!(grid.minerals_level(pos), 100);

        grid.set_light_level(pos, 250);
        assert_eq!(grid.light_level(pos), 100);
        grid.set_minerals_level(pos, -4);
        assert_eq!(grid.minerals_level(pos), 0);
    }

    #[test]
    fn test_journal_preserves_operation_order() {
        let mut grid = Grid::new(3, 3, LoopMode::Finite);
        grid.insert(Position::new(0, 0), Cell::Plant);
        grid.delete(Position::new(0, 0));

        let events = grid.take_events();
        assert_eq!(
            events,
            vec![
                GameEvent::CellInserted {
                    position: Position::new(0, 0),
                    kind: CellKind::Plant,
                },
                GameEvent::CellDeleted {
                    position: Position::new(0, 0),
                    kind: CellKind::Plant,
                },
            ]
        );
        assert!(grid.take_events().is_empty());
    }

    #[test]
    fn test_flat_snapshot_stride_and_order() {
        let mut grid = Grid::new(2, 2, LoopMode::Finite);
        grid.insert(Position::new(0, 1), Cell::Wall);

        let flat = grid.serialize_flat();
        assert_eq!(flat.len(), 4 * FLAT_RECORD_LEN);
        // (0, 0) empty, (0, 1) wall.
        assert_eq!(flat[0], 0);
        assert_eq!(flat[FLAT_RECORD_LEN], 3);
    }

    #[test]
    fn test_snapshot_bytes_round_trip() {
        let mut factory = CellFactory::new();
        let mut grid = Grid::new(3, 3, LoopMode::Torus);
        grid.insert(Position::new(1, 1), organism(&mut factory));
        grid.insert(Position::new(2, 0), Cell::Plant);

        let snapshot = grid.serialize();
        let bytes = snapshot.to_bytes().unwrap();
        let restored = GridSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(snapshot, restored);
    }
}
