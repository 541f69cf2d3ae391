//! Data-driven difficulty balance
//!
//! The breakpoints and constants behind every per-level parameter. Defaults
//! reproduce the shipped tuning; a JSON file can override any field.

use serde::{Deserialize, Serialize};

/// A parameter that grows linearly through the early levels, then switches to
/// the stepped multiplier regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    /// Value at level 1
    pub base: f32,
    /// Fractional increase per level during the linear regime
    pub per_level: f32,
    /// Ceiling for the linear regime
    pub early_cap: f32,
    /// Absolute ceiling once the multiplier regime kicks in
    pub hard_cap: f32,
}

/// A parameter that grows by a fixed amount per level up to a cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    pub base: f32,
    pub per_level: f32,
    pub cap: f32,
}

/// Power-up unlock tuning for one kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unlock {
    /// First level where this kind can drop
    pub from_level: u32,
    /// Drop chance reported once unlocked
    pub chance: f32,
}

/// Every constant the difficulty model reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Last level of the linear regime (levels above use the multiplier)
    pub linear_until: u32,
    /// Number of levels per multiplier step
    pub step_levels: u32,
    /// Multiplier added per step
    pub step_increment: f32,
    /// Ceiling for the step multiplier
    pub max_multiplier: f32,

    pub alien_speed: Ramp,
    pub fleet_drop_speed: Ramp,
    pub aliens_per_row_factor: Linear,
    pub alien_rows_factor: Linear,
    /// Base points per kill; `per_level` is an absolute increment
    pub alien_points: Linear,

    pub shield: Unlock,
    pub double_fire: Unlock,

    /// Power-up fall speed as a fraction of alien speed
    pub powerup_fall_ratio: f32,
    /// Percentage of the fleet that carries a power-up (rounded up)
    pub drop_percent: u32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            linear_until: 5,
            step_levels: 5,
            step_increment: 0.05,
            max_multiplier: 2.0,

            alien_speed: Ramp {
                base: 0.3,
                per_level: 0.03,
                early_cap: 1.5,
                hard_cap: 3.0,
            },
            fleet_drop_speed: Ramp {
                base: 8.0,
                per_level: 0.025,
                early_cap: 12.0,
                hard_cap: 20.0,
            },
            aliens_per_row_factor: Linear {
                base: 0.7,
                per_level: 0.01,
                cap: 1.1,
            },
            alien_rows_factor: Linear {
                base: 0.5,
                per_level: 0.0075,
                cap: 0.9,
            },
            alien_points: Linear {
                base: 50.0,
                per_level: 5.0,
                cap: 250.0,
            },

            shield: Unlock {
                from_level: 2,
                chance: 0.15,
            },
            double_fire: Unlock {
                from_level: 3,
                chance: 0.12,
            },

            powerup_fall_ratio: 0.5,
            drop_percent: 7,
        }
    }
}

impl DifficultyConfig {
    /// Load tuning from a JSON file, keeping defaults on any failure
    pub fn load_or_default(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match crate::settings::read_json::<Self>(path) {
            Ok(config) => {
                log::info!("Loaded difficulty tuning from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }
}
