//! Periodic autoplay driver and the shared, lock-serialized game handle.
//!
//! The autoplay loop is an explicit cancellable scheduled task: a spawned
//! tokio task with a `watch` stop channel, re-armed once per period. Each
//! tick takes the same lock as manual callers and issues moves through
//! [`Game::autoplay_step`], so autoplay and external input compete for the
//! single mutation entry point and can never interleave mid-move. A stop
//! request observed before a tick acquires the lock wins; a tick already
//! holding the lock finishes its short, non-blocking step.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::{Game, MoveRejection, MoveReport};
use crate::engine::Direction;
use crate::game::GameStateSnapshot;

/// Handle to the background autoplay task.
struct AutoplayTask {
    handle: JoinHandle<()>,
    stop_tx: watch::Sender<bool>,
}

impl AutoplayTask {
    /// Request a stop and wait for the task to wind down.
    async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.handle.await;
    }
}

/// A [`Game`] behind one mutex, shareable between the autoplay task and
/// external callers. Clones refer to the same game.
#[derive(Clone)]
pub struct SharedGame {
    game: Arc<Mutex<Game>>,
    autoplay: Arc<Mutex<Option<AutoplayTask>>>,
    period: Duration,
}

impl SharedGame {
    pub fn new(game: Game) -> Self {
        let period = game.config().autoplay_interval();
        SharedGame {
            game: Arc::new(Mutex::new(game)),
            autoplay: Arc::new(Mutex::new(None)),
            period,
        }
    }

    /// Stop any running autoplay, then reset the game.
    pub async fn initialize(&self) {
        self.stop_autoplay().await;
        self.game.lock().await.initialize();
    }

    pub async fn attempt_move(&self, direction: Direction) -> Result<MoveReport, MoveRejection> {
        self.game.lock().await.attempt_move(direction)
    }

    pub async fn game_state(&self) -> GameStateSnapshot {
        self.game.lock().await.game_state()
    }

    pub async fn available_moves(&self) -> Vec<Direction> {
        self.game.lock().await.available_moves()
    }

    pub async fn is_over(&self) -> bool {
        self.game.lock().await.is_over()
    }

    pub async fn is_autoplaying(&self) -> bool {
        self.game.lock().await.is_autoplaying()
    }

    /// Run a closure against the locked game; the escape hatch for
    /// subscriptions, snapshots, and anything else not wrapped here.
    pub async fn with_game<R>(&self, f: impl FnOnce(&mut Game) -> R) -> R {
        let mut game = self.game.lock().await;
        f(&mut game)
    }

    /// Start the periodic autoplay loop.
    ///
    /// Returns false (and does nothing) when the game is over or autoplay
    /// is already active.
    pub async fn start_autoplay(&self) -> bool {
        let mut slot = self.autoplay.lock().await;
        {
            let mut game = self.game.lock().await;
            if game.is_over() || game.is_autoplaying() {
                return false;
            }
            game.set_autoplay_active(true);
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_autoplay(self.game.clone(), stop_rx, self.period));
        // A finished task may still occupy the slot; replacing it is fine,
        // its stop channel is gone and the task has already returned.
        *slot = Some(AutoplayTask { handle, stop_tx });
        true
    }

    /// Stop autoplay. Idempotent; a no-op when nothing is running.
    pub async fn stop_autoplay(&self) {
        let task = self.autoplay.lock().await.take();
        if let Some(task) = task {
            task.stop().await;
        }
        self.game.lock().await.set_autoplay_active(false);
    }
}

async fn run_autoplay(
    game: Arc<Mutex<Game>>,
    mut stop_rx: watch::Receiver<bool>,
    period: Duration,
) {
    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    return;
                }
            }
            _ = tokio::time::sleep(period) => {
                let mut g = game.lock().await;
                // A stop that arrived while we waited for the lock
                // logically precedes this tick.
                if *stop_rx.borrow() {
                    return;
                }
                if !g.is_autoplaying() {
                    return;
                }
                match g.autoplay_step() {
                    Some(direction) => {
                        log::debug!("autoplay committed {direction:?}");
                        // The terminal transition inside the step already
                        // cleared the autoplay flag; wind down before the
                        // next tick is scheduled.
                        if g.is_over() {
                            return;
                        }
                    }
                    None => {
                        g.set_autoplay_active(false);
                        log::debug!("autoplay stopped: no movable direction");
                        return;
                    }
                }
            }
        }
    }
}
