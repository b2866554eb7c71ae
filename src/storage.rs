//! Best-score persistence seam.
//!
//! The only thing this crate ever persists is a single integer. The store
//! is treated as fallible and non-fatal: the lifecycle falls back to 0 on
//! load failure and logs-and-ignores save failures.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::engine::Score;

/// External hook for persisting the best score across sessions.
pub trait BestScoreStore: Send {
    fn load(&self) -> Result<Score>;
    fn save(&mut self, best: Score) -> Result<()>;
}

/// Stores the best score as decimal text in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl BestScoreStore for FileStore {
    fn load(&self) -> Result<Score> {
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        contents
            .trim()
            .parse::<Score>()
            .with_context(|| format!("malformed best score in {}", self.path.display()))
    }

    fn save(&mut self, best: Score) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        std::fs::write(&self.path, best.to_string())
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// In-memory store backed by a shared counter.
///
/// Clones share the same value, so a test can keep one handle and hand the
/// other to the game.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: Score) -> Self {
        MemoryStore {
            best: Arc::new(AtomicU64::new(best)),
        }
    }

    /// Current persisted value.
    pub fn best(&self) -> Score {
        self.best.load(Ordering::Relaxed)
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<Score> {
        Ok(self.best())
    }

    fn save(&mut self, best: Score) -> Result<()> {
        self.best.store(best, Ordering::Relaxed);
        Ok(())
    }
}
