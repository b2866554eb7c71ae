//! Owned N×N board state and full-board move operations.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::line::process_line;
use super::{Direction, Score, Tile};

/// A board with the wrong shape handed to [`Grid::from_rows`]. This is a
/// collaborator contract violation, the one loud failure in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot board is {rows}x{cols}, expected {expected}x{expected}")]
    BadDimensions {
        rows: usize,
        cols: usize,
        expected: usize,
    },
}

/// A tile merge produced by a full-board move, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEvent {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

/// Result of one full-board move attempt.
///
/// `moved == false` implies `score_delta == 0` and no merges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub moved: bool,
    pub score_delta: Score,
    pub merges: Vec<MergeEvent>,
}

/// A tile placed by [`Grid::spawn_random_tile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedTile {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

/// N×N board of face-value tiles, row-major, `0` = empty.
///
/// The grid is an owned value type: callers get copies out (`rows`) and
/// validated copies in (`from_rows`), never a live reference into the
/// cells. Dry-run evaluation ([`Grid::evaluate_move`]) takes `&self`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// Create an empty `size`×`size` grid. `size` must be at least 2.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "grid size must be at least 2");
        Grid {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from row-major rows, validating the shape.
    pub fn from_rows(rows: &[Vec<Tile>], size: usize) -> Result<Self, SnapshotError> {
        if rows.len() != size {
            return Err(SnapshotError::BadDimensions {
                rows: rows.len(),
                cols: rows.first().map_or(0, Vec::len),
                expected: size,
            });
        }
        for row in rows {
            if row.len() != size {
                return Err(SnapshotError::BadDimensions {
                    rows: rows.len(),
                    cols: row.len(),
                    expected: size,
                });
            }
        }
        let mut grid = Grid::new(size);
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                grid.cells[r * size + c] = v;
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[row * self.size + col]
    }

    /// Copy the board out as rows. The caller owns the copy.
    pub fn rows(&self) -> Vec<Vec<Tile>> {
        (0..self.size)
            .map(|r| self.cells[r * self.size..(r + 1) * self.size].to_vec())
            .collect()
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Coordinates of all empty cells, row-major.
    pub fn empty_positions(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    /// All occupied cells, row-major.
    pub fn tiles(&self) -> Vec<SpawnedTile> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(i, &v)| SpawnedTile {
                row: i / self.size,
                col: i % self.size,
                value: v,
            })
            .collect()
    }

    /// Highest face value on the board (0 when empty).
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Insert a 2 (90%) or 4 (10%) into a uniformly chosen empty cell.
    ///
    /// Returns `None` when the board is full; that is a legal no-op, not
    /// an error.
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SpawnedTile> {
        let empty = self.empty_positions();
        if empty.is_empty() {
            return None;
        }
        let (row, col) = empty[rng.gen_range(0..empty.len())];
        let value: Tile = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
        self.cells[row * self.size + col] = value;
        Some(SpawnedTile { row, col, value })
    }

    /// Slide/merge tiles in `direction` and commit the result.
    ///
    /// The cells are written back only when the move changed something.
    pub fn execute_move(&mut self, direction: Direction) -> MoveOutcome {
        let (outcome, next) = self.compute_move(direction);
        if outcome.moved {
            self.cells = next;
        }
        outcome
    }

    /// Dry run: compute the outcome of a move without mutating the grid.
    pub fn evaluate_move(&self, direction: Direction) -> MoveOutcome {
        self.compute_move(direction).0
    }

    /// True iff moving in `direction` would change the board.
    pub fn can_move(&self, direction: Direction) -> bool {
        self.evaluate_move(direction).moved
    }

    /// True iff the board is full and no direction yields a change.
    ///
    /// An empty cell short-circuits to non-terminal without probing moves;
    /// a full board can still be movable via merges, so both checks are
    /// independently necessary.
    pub fn is_terminal(&self) -> bool {
        if self.cells.iter().any(|&v| v == 0) {
            return false;
        }
        Direction::ALL.iter().all(|&dir| !self.can_move(dir))
    }

    fn compute_move(&self, direction: Direction) -> (MoveOutcome, Vec<Tile>) {
        let size = self.size;
        let mut next = self.cells.clone();
        let mut moved = false;
        let mut score_delta: Score = 0;
        let mut merges = Vec::new();
        let reverse = direction.is_reversed();

        if direction.is_horizontal() {
            for row in 0..size {
                let line: Vec<Tile> = (0..size).map(|col| self.get(row, col)).collect();
                let res = process_line(&line, reverse);
                moved |= res.moved;
                score_delta += res.score;
                for m in &res.merges {
                    merges.push(MergeEvent {
                        row,
                        col: m.position,
                        value: m.value,
                    });
                }
                for (col, &v) in res.line.iter().enumerate() {
                    next[row * size + col] = v;
                }
            }
        } else {
            for col in 0..size {
                let line: Vec<Tile> = (0..size).map(|row| self.get(row, col)).collect();
                let res = process_line(&line, reverse);
                moved |= res.moved;
                score_delta += res.score;
                for m in &res.merges {
                    merges.push(MergeEvent {
                        row: m.position,
                        col,
                        value: m.value,
                    });
                }
                for (row, &v) in res.line.iter().enumerate() {
                    next[row * size + col] = v;
                }
            }
        }

        (
            MoveOutcome {
                moved,
                score_delta,
                merges,
            },
            next,
        )
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}:", self.size, self.size)?;
        for row in self.rows() {
            writeln!(f, "  {row:?}")?;
        }
        Ok(())
    }
}
