//! Game settings and preferences
//!
//! Session-wide configuration. Loaded once at startup from an optional JSON
//! file; missing fields take their defaults.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors while reading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Ship ===
    /// Lives granted at the start of a game
    pub ship_limit: u32,
    /// Pixels per frame at level 1
    pub ship_speed: f32,
    pub ship_width: f32,
    pub ship_height: f32,

    // === Bullets ===
    /// Maximum bullets in flight (doubled during double-fire)
    pub bullets_allowed: usize,
    /// Pixels per frame at level 1
    pub bullet_speed: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,

    // === Aliens ===
    pub alien_width: f32,
    pub alien_height: f32,

    /// Ship and bullet speed multiplier applied on each wave clear
    pub speedup_scale: f32,

    // === Timers (milliseconds) ===
    pub shield_duration_ms: u64,
    pub double_fire_duration_ms: u64,
    /// Stall after losing a ship
    pub hit_pause_ms: u64,

    // === Audio ===
    pub audio_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    /// Where the high score lives on disk
    pub high_score_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            ship_limit: 3,
            ship_speed: 1.5,
            ship_width: SHIP_WIDTH,
            ship_height: SHIP_HEIGHT,

            bullets_allowed: 3,
            bullet_speed: 2.5,
            bullet_width: 3.0,
            bullet_height: 15.0,

            alien_width: ALIEN_WIDTH,
            alien_height: ALIEN_HEIGHT,

            speedup_scale: SPEEDUP_SCALE,

            shield_duration_ms: 8_000,
            double_fire_duration_ms: 10_000,
            hit_pause_ms: 500,

            audio_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,

            high_score_path: PathBuf::from("high_score.txt"),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match read_json::<Self>(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.bullets_allowed = self.bullets_allowed.max(1);
        self.screen_width = self.screen_width.max(1.0);
        self.screen_height = self.screen_height.max(1.0);
        // Entity sizes divide the fleet layout
        for dim in [
            &mut self.ship_width,
            &mut self.ship_height,
            &mut self.alien_width,
            &mut self.alien_height,
            &mut self.bullet_width,
            &mut self.bullet_height,
        ] {
            *dim = if dim.is_finite() { (*dim).max(1.0) } else { 1.0 };
        }
        self
    }

    /// Effective sound effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.audio_enabled {
            self.master_volume * self.sfx_volume
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "ship_limit": 5, "sfx_volume": 4.0 }}"#).unwrap();

        let settings = Settings::load_from(file.path());
        assert_eq!(settings.ship_limit, 5);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.bullets_allowed, 3);
    }

    #[test]
    fn test_zero_sizes_are_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "alien_width": 0.0, "alien_height": 0.0, "ship_height": -5.0, "bullet_width": 0.0 }}"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path());
        assert_eq!(settings.alien_width, 1.0);
        assert_eq!(settings.alien_height, 1.0);
        assert_eq!(settings.ship_height, 1.0);
        assert_eq!(settings.bullet_width, 1.0);
        assert_eq!(settings.ship_width, SHIP_WIDTH);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(settings.ship_limit, 3);
        assert_eq!(settings.screen_width, SCREEN_WIDTH);
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let settings = Settings {
            audio_enabled: false,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
