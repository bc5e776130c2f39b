//! Core type definitions for the simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a cell carrying an identity (organisms).
///
/// Issued sequentially by the cell factory; never reused within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub u64);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Apply toroidal wrapping for given world dimensions
    pub fn wrap(&self, width: i32, height: i32) -> Self {
        Self {
            x: ((self.x % width) + width) % width,
            y: ((self.y % height) + height) % height,
        }
    }

    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Facing direction for organisms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::West,
            Direction::NorthWest,
        ]
    }

    /// Index into `Direction::all()`, used by the flat snapshot encoding.
    pub fn index(&self) -> i32 {
        Direction::all().iter().position(|d| d == self).unwrap_or(0) as i32
    }

    /// Rotate 45 degrees counterclockwise
    pub fn turn_left(&self) -> Direction {
        let all = Direction::all();
        all[(self.index() as usize + 7) % 8]
    }

    /// Rotate 45 degrees clockwise
    pub fn turn_right(&self) -> Direction {
        let all = Direction::all();
        all[(self.index() as usize + 1) % 8]
    }

    pub fn random<R: Rng>(rng: &mut R) -> Direction {
        Direction::all()[rng.gen_range(0..8)]
    }
}

/// Grid boundary behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Bounded world: coordinates past an edge are invalid targets.
    Finite,
    /// Toroidal world: coordinates wrap modulo width/height.
    Torus,
}
