//! Typed event bus for lifecycle notifications.
//!
//! Event kinds are a closed enum with one payload shape per kind, so a
//! subscriber can never target a misspelled event name. Handlers run
//! synchronously in subscription order; a failing handler is logged and
//! does not stop the rest.

use serde::Serialize;

use crate::engine::{Score, SpawnedTile, Tile};

/// The closed set of lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ScoreUpdate,
    BoardUpdate,
    TileAdded,
    GameWon,
    GameOver,
}

/// A lifecycle notification with its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    ScoreUpdate { score: Score, best_score: Score },
    BoardUpdate { board: Vec<Vec<Tile>> },
    TileAdded(SpawnedTile),
    GameWon { score: Score },
    GameOver { score: Score, best_score: Score },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::ScoreUpdate { .. } => EventKind::ScoreUpdate,
            GameEvent::BoardUpdate { .. } => EventKind::BoardUpdate,
            GameEvent::TileAdded(_) => EventKind::TileAdded,
            GameEvent::GameWon { .. } => EventKind::GameWon,
            GameEvent::GameOver { .. } => EventKind::GameOver,
        }
    }
}

/// Opaque handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GameEvent) -> anyhow::Result<()> + Send>;

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

/// Synchronous dispatcher keyed by [`EventKind`].
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> anyhow::Result<()> + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a handler. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Dispatch an event to every matching handler, in subscription order.
    ///
    /// Handler errors are reported via `log` and swallowed so one failing
    /// observer cannot starve the others.
    pub fn emit(&mut self, event: &GameEvent) {
        let kind = event.kind();
        for sub in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
            if let Err(err) = (sub.handler)(event) {
                log::error!("event handler for {kind:?} failed: {err:#}");
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
