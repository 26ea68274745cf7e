//! Runner settings, loaded from YAML with per-field defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

fn default_cycle_seconds() -> u64 {
    5
}

fn default_autosave_cycles() -> u64 {
    12
}

fn default_save_path() -> PathBuf {
    PathBuf::from("saves/city.json")
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("snapshots")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Simulated-time units between cycles when serving.
    #[serde(default = "default_cycle_seconds")]
    pub cycle_seconds: u64,
    /// Autosave every this many cycles; 0 disables autosave.
    #[serde(default = "default_autosave_cycles")]
    pub autosave_cycles: u64,
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,
    /// Checkpoint interval in cycles; 0 disables checkpoints.
    #[serde(default)]
    pub snapshot_interval: u64,
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cycle_seconds: default_cycle_seconds(),
            autosave_cycles: default_autosave_cycles(),
            save_path: default_save_path(),
            snapshot_interval: 0,
            snapshot_dir: default_snapshot_dir(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(settings)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_five_unit_cycle() {
        let settings = Settings::default();
        assert_eq!(settings.cycle_seconds, 5);
        assert_eq!(settings.autosave_cycles, 12);
        assert_eq!(settings.snapshot_interval, 0);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let settings: Settings =
            serde_yaml::from_str("cycle_seconds: 2\nport: 9000\n").expect("parse");
        assert_eq!(settings.cycle_seconds, 2);
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.save_path, PathBuf::from("saves/city.json"));
    }
}
