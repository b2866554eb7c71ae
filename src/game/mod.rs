//! Game lifecycle: one grid, the score/won/over state machine, event
//! emission, and the autoplay step the periodic driver reuses.
//!
//! All mutation is synchronous inside one `attempt_move` / `initialize` /
//! `restore_state` call. On a multi-threaded host, wrap the game in
//! [`SharedGame`], which serializes every entry point behind one lock.

pub mod autoplay;
pub mod events;

pub use autoplay::SharedGame;
pub use events::{EventBus, EventKind, GameEvent, SubscriptionId};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::{Direction, Grid, MergeEvent, Score, SpawnedTile, Tile};
use crate::storage::BestScoreStore;

pub use crate::engine::SnapshotError;

/// Direction priority the autoplay heuristic tries on each tick.
pub const AUTOPLAY_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Down,
    Direction::Right,
    Direction::Up,
];

/// Why a requested move was not committed. Rejection is a value, not a
/// panic; the game state is untouched either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    #[error("game over")]
    GameOver,
    #[error("invalid move")]
    InvalidMove,
}

/// Details of a committed move, for observers (animation, logging).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub direction: Direction,
    pub score_delta: Score,
    pub merges: Vec<MergeEvent>,
    pub spawned: Option<SpawnedTile>,
}

/// Immutable deep copy of the full game state, for rendering and for an
/// external undo/redo component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub board: Vec<Vec<Tile>>,
    pub score: Score,
    pub best_score: Score,
    pub over: bool,
    pub won: bool,
    pub max_tile: Tile,
    pub autoplay_active: bool,
}

/// The lifecycle state machine.
pub struct Game {
    grid: Grid,
    config: GameConfig,
    score: Score,
    best_score: Score,
    over: bool,
    won: bool,
    won_acknowledged: bool,
    autoplay_active: bool,
    events: EventBus,
    store: Box<dyn BestScoreStore>,
    rng: StdRng,
}

impl Game {
    /// Create a game with an entropy-seeded RNG. The best score is loaded
    /// from the store, falling back to 0 if the store fails.
    pub fn new(config: GameConfig, store: Box<dyn BestScoreStore>) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    /// Create a game with a fixed seed, for reproducible runs and tests.
    pub fn from_seed(config: GameConfig, store: Box<dyn BestScoreStore>, seed: u64) -> Self {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GameConfig, store: Box<dyn BestScoreStore>, rng: StdRng) -> Self {
        let best_score = store.load().unwrap_or_else(|err| {
            log::warn!("failed to load best score, starting from 0: {err:#}");
            0
        });
        Game {
            grid: Grid::new(config.size),
            config,
            score: 0,
            best_score,
            over: false,
            won: false,
            won_acknowledged: false,
            autoplay_active: false,
            events: EventBus::new(),
            store,
            rng,
        }
    }

    /// Reset to a fresh game: empty grid, zero score, cleared flags, two
    /// spawned tiles. The best score survives.
    ///
    /// Emits, in order: `ScoreUpdate`, `BoardUpdate`, then one `TileAdded`
    /// per spawned tile in spawn order.
    pub fn initialize(&mut self) {
        self.grid.clear();
        self.score = 0;
        self.over = false;
        self.won = false;
        self.won_acknowledged = false;
        self.autoplay_active = false;

        let first = self.grid.spawn_random_tile(&mut self.rng);
        let second = self.grid.spawn_random_tile(&mut self.rng);

        self.emit_score();
        self.emit_board();
        for tile in [first, second].into_iter().flatten() {
            self.events.emit(&GameEvent::TileAdded(tile));
        }
    }

    /// The core state transition: commit a move or reject it.
    ///
    /// A rejection has no side effects and emits nothing. A committed move
    /// updates score and flags, spawns one tile if the board has room, and
    /// emits `ScoreUpdate`, `BoardUpdate`, and `TileAdded` (if spawned) —
    /// preceded by `GameWon` / `GameOver` when those conditions first hold.
    pub fn attempt_move(&mut self, direction: Direction) -> Result<MoveReport, MoveRejection> {
        if self.over {
            return Err(MoveRejection::GameOver);
        }
        if !self.grid.can_move(direction) {
            return Err(MoveRejection::InvalidMove);
        }

        let outcome = self.grid.execute_move(direction);
        debug_assert!(outcome.moved);
        self.score += outcome.score_delta;
        self.ratchet_best_score();

        let spawned = self.grid.spawn_random_tile(&mut self.rng);
        self.check_win();
        self.check_terminal();

        self.emit_score();
        self.emit_board();
        if let Some(tile) = spawned {
            self.events.emit(&GameEvent::TileAdded(tile));
        }

        Ok(MoveReport {
            direction,
            score_delta: outcome.score_delta,
            merges: outcome.merges,
            spawned,
        })
    }

    /// Acknowledge a win without resetting state, so play continues past
    /// the winning tile with `won` still set.
    pub fn continue_game(&mut self) {
        self.won_acknowledged = true;
    }

    /// Directions that would currently change the board, in probe order.
    pub fn available_moves(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.grid.can_move(dir))
            .collect()
    }

    /// One autoplay tick: commit the first movable direction in the fixed
    /// priority order. Returns the committed direction, or `None` when no
    /// direction is movable (which coincides with the terminal condition).
    pub fn autoplay_step(&mut self) -> Option<Direction> {
        if self.over {
            return None;
        }
        for direction in AUTOPLAY_ORDER {
            if self.attempt_move(direction).is_ok() {
                return Some(direction);
            }
        }
        None
    }

    /// Deep copy of grid, scores, and flags.
    pub fn game_state(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            board: self.grid.rows(),
            score: self.score,
            best_score: self.best_score,
            over: self.over,
            won: self.won,
            max_tile: self.grid.max_tile(),
            autoplay_active: self.autoplay_active,
        }
    }

    /// Replace grid, score, and flags atomically from a snapshot; used by
    /// an external history component for undo/redo.
    ///
    /// The snapshot is validated before anything changes; a malformed board
    /// is rejected loudly. The best score only ratchets upward. Emits
    /// `ScoreUpdate` then `BoardUpdate`, as if the state had just been
    /// produced.
    pub fn restore_state(&mut self, snapshot: &GameStateSnapshot) -> Result<(), SnapshotError> {
        let grid = Grid::from_rows(&snapshot.board, self.config.size)?;
        self.grid = grid;
        self.score = snapshot.score;
        self.over = snapshot.over;
        self.won = snapshot.won;
        self.best_score = self.best_score.max(snapshot.best_score);
        self.ratchet_best_score();

        self.emit_score();
        self.emit_board();
        Ok(())
    }

    /// Register a handler for one event kind.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> anyhow::Result<()> + Send + 'static,
    {
        self.events.subscribe(kind, handler)
    }

    /// Remove a handler. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn best_score(&self) -> Score {
        self.best_score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay_active
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn empty_tile_count(&self) -> usize {
        self.grid.empty_positions().len()
    }

    pub(crate) fn set_autoplay_active(&mut self, active: bool) {
        self.autoplay_active = active;
    }

    fn ratchet_best_score(&mut self) {
        if self.score > self.best_score {
            self.best_score = self.score;
            if let Err(err) = self.store.save(self.best_score) {
                log::warn!("failed to persist best score: {err:#}");
            }
        }
    }

    fn check_win(&mut self) {
        if !self.won && self.grid.max_tile() >= self.config.winning_tile {
            self.won = true;
            if !self.won_acknowledged {
                self.won_acknowledged = true;
                self.events.emit(&GameEvent::GameWon { score: self.score });
            }
        }
    }

    fn check_terminal(&mut self) {
        if self.grid.is_terminal() {
            self.over = true;
            self.autoplay_active = false;
            self.events.emit(&GameEvent::GameOver {
                score: self.score,
                best_score: self.best_score,
            });
        }
    }

    fn emit_score(&mut self) {
        self.events.emit(&GameEvent::ScoreUpdate {
            score: self.score,
            best_score: self.best_score,
        });
    }

    fn emit_board(&mut self) {
        let board = self.grid.rows();
        self.events.emit(&GameEvent::BoardUpdate { board });
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("score", &self.score)
            .field("best_score", &self.best_score)
            .field("over", &self.over)
            .field("won", &self.won)
            .field("autoplay_active", &self.autoplay_active)
            .field("grid", &self.grid)
            .finish()
    }
}
