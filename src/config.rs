//! Game tunables, loadable from TOML.

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::engine::Tile;

/// Tunables for a game instance. All fields have sensible defaults, so an
/// empty TOML file (or `GameConfig::default()`) yields the classic game.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct GameConfig {
    /// Board side length; the classic game is 4x4.
    #[serde(default = "defaults::size")]
    pub size: usize,

    /// Reaching this tile value flips the `won` flag.
    #[serde(default = "defaults::winning_tile")]
    pub winning_tile: Tile,

    /// Autoplay tick period in milliseconds.
    #[serde(default = "defaults::autoplay_interval_ms")]
    pub autoplay_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            size: defaults::size(),
            winning_tile: defaults::winning_tile(),
            autoplay_interval_ms: defaults::autoplay_interval_ms(),
        }
    }
}

impl GameConfig {
    pub fn from_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(cfg)
    }

    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }
}

mod defaults {
    use crate::engine::Tile;

    pub fn size() -> usize {
        4
    }
    pub fn winning_tile() -> Tile {
        2048
    }
    pub fn autoplay_interval_ms() -> u64 {
        300
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_the_classic_game() {
        let cfg: GameConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.size, 4);
        assert_eq!(cfg.winning_tile, 2048);
        assert_eq!(cfg.autoplay_interval(), Duration::from_millis(300));
    }

    #[test]
    fn it_parses_overrides() {
        let cfg: GameConfig = toml::from_str(
            r#"
            size = 5
            winning_tile = 4096
            autoplay_interval_ms = 50
            "#,
        )
        .unwrap();
        assert_eq!(cfg.size, 5);
        assert_eq!(cfg.winning_tile, 4096);
        assert_eq!(cfg.autoplay_interval_ms, 50);
    }
}
