//! Grid engine: an N×N board of face-value tiles and the pure
//! transformations over it. No score history, no events, no I/O.
//!
//! - [`Grid`] is the owned board state with copy-out/copy-in accessors.
//! - [`line`] holds the 1-D compaction/merge routine every move reduces to.
//! - Dry-run evaluation takes `&self`, so a trial move can never leak into
//!   committed state.

pub mod grid;
pub mod line;

pub use grid::{Grid, MergeEvent, MoveOutcome, SnapshotError, SpawnedTile};
pub use line::{process_line, LineResult, MergePoint};

use serde::{Deserialize, Serialize};

/// Face value of a single cell; `0` is empty.
pub type Tile = u32;

/// Accumulated merge score.
pub type Score = u64;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order movability queries probe them.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Left/Right process rows; Up/Down process columns.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Right/Down reverse the line around the shared leftward routine.
    #[inline]
    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}
