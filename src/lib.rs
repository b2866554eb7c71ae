//! Core logic for a sliding-tile (2048) puzzle: a pure grid transition
//! engine plus the game lifecycle built on top of it.
//!
//! - [`engine`] owns the board: line compaction/merge, directional moves
//!   (commit and dry-run), random tile spawning, terminal detection.
//! - [`game`] owns one grid and the score/won/over state machine, emits
//!   typed events to subscribers, and drives an optional autoplay loop.
//! - [`storage`] is the best-score persistence seam (a single integer).
//! - [`config`] loads tunables (board size, winning tile, autoplay period)
//!   from TOML.
//!
//! Rendering, input decoding, animation, and undo/redo history live
//! outside this crate; they consume the event stream and the snapshot
//! accessors.

pub mod config;
pub mod engine;
pub mod game;
pub mod storage;

pub use config::GameConfig;
pub use engine::{Direction, Grid, MergeEvent, MoveOutcome, Score, SpawnedTile, Tile};
pub use game::{
    EventKind, Game, GameEvent, GameStateSnapshot, MoveRejection, MoveReport, SharedGame,
    SnapshotError, SubscriptionId,
};
pub use storage::{BestScoreStore, FileStore, MemoryStore};
