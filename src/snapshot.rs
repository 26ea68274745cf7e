//! Persistence: save files and periodic state checkpoints.
//!
//! The whole [`GameState`] serializes to JSON; an external service (or the
//! runner) stores it and hands it back on startup. A missing or invalid
//! file falls back to a fresh game — load failures are never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::world::GameState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// On-disk save record: the full state plus write metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub saved_at: DateTime<Utc>,
    pub cycle: u64,
    pub state: GameState,
}

/// Write the state to `path` atomically (temp file, then rename).
pub fn save_game(path: &Path, state: &GameState) -> Result<(), SnapshotError> {
    let save = SaveFile {
        saved_at: Utc::now(),
        cycle: state.cycles,
        state: state.clone(),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(&save)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_game(path: &Path) -> Result<GameState, SnapshotError> {
    let data = fs::read_to_string(path)?;
    let save: SaveFile = serde_json::from_str(&data)?;
    Ok(save.state)
}

/// Load a saved game, or start fresh when the file is absent or malformed.
pub fn load_or_new(path: &Path) -> GameState {
    if !path.exists() {
        return GameState::new_game();
    }
    match load_game(path) {
        Ok(state) => state,
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable save, starting fresh");
            GameState::new_game()
        }
    }
}

#[derive(Clone, Debug)]
pub struct SnapshotConfig {
    /// Write a checkpoint every this many cycles; 0 disables checkpoints.
    pub interval: u64,
    pub output_dir: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            interval: 0,
            output_dir: PathBuf::from("snapshots"),
        }
    }
}

/// Periodic checkpoint writer, one file per interval boundary.
pub struct SnapshotManager {
    config: SnapshotConfig,
}

impl SnapshotManager {
    pub fn new(config: SnapshotConfig) -> Self {
        Self { config }
    }

    pub fn maybe_snapshot(&self, state: &GameState) -> Result<Option<PathBuf>, SnapshotError> {
        if self.config.interval == 0 {
            return Ok(None);
        }
        if state.cycles == 0 || state.cycles % self.config.interval != 0 {
            return Ok(None);
        }
        fs::create_dir_all(&self.config.output_dir)?;
        let path = self
            .config
            .output_dir
            .join(format!("cycle_{:06}.json", state.cycles));
        save_game(&path, state)?;
        Ok(Some(path))
    }
}
