//! TOML-based configuration of the alarm subsystem.
//!
//! Stores the deployment constants:
//! - the reference coordinate of the Schöpfli clubhouse
//! - the allowed broadcast radius
//! - the minimum pause between two broadcasts
//! - a debug switch disabling both checks (dead in release builds)
//!
//! Configuration is stored at `~/.config/schoepfli/config.toml`. A missing
//! file yields the defaults; missing keys fall back per field.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geo::Coordinate;

/// Alarm deployment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// Physical location of the Schöpfli clubhouse.
    #[serde(default = "default_reference")]
    pub reference: Coordinate,
    /// Maximum allowed distance from the reference, in meters.
    #[serde(default = "default_max_distance_m")]
    pub max_distance_m: f64,
    /// Minimum pause between two broadcasts, in seconds.
    #[serde(default = "default_min_pause_secs")]
    pub min_pause_secs: u64,
    /// Disables the proximity and cooldown checks. Debug builds only;
    /// `effective_bypass` ignores it everywhere else.
    #[serde(default)]
    pub bypass_checks: bool,
}

fn default_reference() -> Coordinate {
    Coordinate::new(47.226_6, 9.124_7)
}
fn default_max_distance_m() -> f64 {
    100.0
}
fn default_min_pause_secs() -> u64 {
    3_600
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            reference: default_reference(),
            max_distance_m: default_max_distance_m(),
            min_pause_secs: default_min_pause_secs(),
            bypass_checks: false,
        }
    }
}

impl AlarmConfig {
    /// Minimum pause as a `chrono::Duration`.
    pub fn min_pause(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.min_pause_secs as i64)
    }

    /// The bypass switch only ever takes effect in debug builds.
    pub fn effective_bypass(&self) -> bool {
        cfg!(debug_assertions) && self.bypass_checks
    }

    /// Default config file location (`~/.config/schoepfli/config.toml`).
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("schoepfli").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        fs::write(path, raw).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
