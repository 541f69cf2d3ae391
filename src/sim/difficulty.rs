//! Level-to-parameter difficulty model
//!
//! Two regimes: levels up to `linear_until` grow linearly from a base value,
//! later levels scale the last linear value by a stepped multiplier. All
//! functions are pure, so the same level always yields bit-identical output.

use serde::{Deserialize, Serialize};

use crate::tuning::{DifficultyConfig, Linear, Ramp};

/// Difficulty-derived settings for one level. Replaced wholesale on every
/// level transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub level: u32,
    /// Step multiplier (1.0 throughout the linear regime)
    pub multiplier: f32,
    /// Horizontal alien speed (pixels per frame)
    pub alien_speed: f32,
    /// Fleet drop distance on edge contact (pixels)
    pub fleet_drop_speed: f32,
    pub aliens_per_row_factor: f32,
    pub alien_rows_factor: f32,
    /// Rows added on top of the factor-derived count
    pub additional_rows: u32,
    pub alien_points: u64,
    pub shield_chance: f32,
    pub double_fire_chance: f32,
    pub powerup_fall_speed: f32,
}

/// Maps level numbers to [`ParameterSnapshot`]s
#[derive(Debug, Clone, Default)]
pub struct DifficultyModel {
    config: DifficultyConfig,
}

impl DifficultyModel {
    pub fn new(config: DifficultyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Compute every parameter for `level` (levels below 1 are treated as 1)
    pub fn compute(&self, level: u32) -> ParameterSnapshot {
        let level = level.max(1);
        let multiplier = self.multiplier(level);
        let alien_speed = self.ramp(&self.config.alien_speed, level);

        ParameterSnapshot {
            level,
            multiplier,
            alien_speed,
            fleet_drop_speed: self.ramp(&self.config.fleet_drop_speed, level),
            aliens_per_row_factor: linear(&self.config.aliens_per_row_factor, level),
            alien_rows_factor: linear(
                &self.config.alien_rows_factor,
                level.min(self.config.linear_until),
            ),
            additional_rows: self.additional_rows(level),
            alien_points: self.alien_points(level),
            shield_chance: unlock_chance(
                self.config.shield.from_level,
                self.config.shield.chance,
                level,
            ),
            double_fire_chance: unlock_chance(
                self.config.double_fire.from_level,
                self.config.double_fire.chance,
                level,
            ),
            powerup_fall_speed: (alien_speed * self.config.powerup_fall_ratio * multiplier)
                .min(alien_speed),
        }
    }

    /// Stepped multiplier: `1 + increment * floor((level - 1) / step)`, capped
    pub fn multiplier(&self, level: u32) -> f32 {
        let step = self.config.step_levels.max(1);
        let steps = (level.max(1) - 1) / step;
        (1.0 + self.config.step_increment * steps as f32).min(self.config.max_multiplier)
    }

    fn ramp(&self, ramp: &Ramp, level: u32) -> f32 {
        if level <= self.config.linear_until {
            linear_ramp(ramp, level)
        } else {
            let last_linear = linear_ramp(ramp, self.config.linear_until);
            (last_linear * self.multiplier(level)).min(ramp.hard_cap)
        }
    }

    fn additional_rows(&self, level: u32) -> u32 {
        if level <= self.config.linear_until {
            0
        } else {
            (level - 1) / self.config.step_levels.max(1)
        }
    }

    fn alien_points(&self, level: u32) -> u64 {
        let points = &self.config.alien_points;
        let value = if level <= self.config.linear_until {
            linear(points, level)
        } else {
            let last_linear = linear(points, self.config.linear_until);
            last_linear * self.multiplier(level)
        };
        value.min(points.cap).round().max(0.0) as u64
    }
}

/// `base * (1 + per_level * (level - 1))`, capped at the early ceiling
fn linear_ramp(ramp: &Ramp, level: u32) -> f32 {
    let steps = level.saturating_sub(1) as f32;
    (ramp.base * (1.0 + ramp.per_level * steps)).min(ramp.early_cap)
}

/// `base + per_level * (level - 1)`, capped
fn linear(linear: &Linear, level: u32) -> f32 {
    let steps = level.saturating_sub(1) as f32;
    (linear.base + linear.per_level * steps).min(linear.cap)
}

fn unlock_chance(from_level: u32, chance: f32, level: u32) -> f32 {
    if level >= from_level { chance } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn model() -> DifficultyModel {
        DifficultyModel::default()
    }

    #[test]
    fn test_level_one_baseline() {
        let p = model().compute(1);
        assert_eq!(p.level, 1);
        assert_eq!(p.multiplier, 1.0);
        assert!((p.alien_speed - 0.3).abs() < 1e-6);
        assert!((p.fleet_drop_speed - 8.0).abs() < 1e-6);
        assert!((p.aliens_per_row_factor - 0.7).abs() < 1e-6);
        assert!((p.alien_rows_factor - 0.5).abs() < 1e-6);
        assert_eq!(p.additional_rows, 0);
        assert_eq!(p.alien_points, 50);
        assert_eq!(p.shield_chance, 0.0);
        assert_eq!(p.double_fire_chance, 0.0);
        assert!((p.powerup_fall_speed - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_powerup_unlocks() {
        let m = model();
        assert_eq!(m.compute(2).shield_chance, 0.15);
        assert_eq!(m.compute(2).double_fire_chance, 0.0);
        assert_eq!(m.compute(3).double_fire_chance, 0.12);
        assert_eq!(m.compute(40).shield_chance, 0.15);
    }

    #[test]
    fn test_multiplier_steps() {
        let m = model();
        assert_eq!(m.multiplier(5), 1.0);
        assert!((m.multiplier(6) - 1.05).abs() < 1e-6);
        assert!((m.multiplier(11) - 1.10).abs() < 1e-6);
        assert_eq!(m.multiplier(1000), 2.0);
    }

    #[test]
    fn test_second_regime_scales_level_five() {
        let m = model();
        let five = m.compute(5);
        let six = m.compute(6);
        assert!((six.alien_speed - five.alien_speed * 1.05).abs() < 1e-5);
        assert_eq!(six.additional_rows, 1);
        assert_eq!(m.compute(11).additional_rows, 2);
        assert_eq!(five.alien_points, 70);
        assert!(six.alien_points > five.alien_points);
    }

    #[test]
    fn test_rows_factor_frozen_after_five() {
        let m = model();
        assert_eq!(m.compute(5).alien_rows_factor, m.compute(20).alien_rows_factor);
    }

    #[test]
    fn test_hard_caps() {
        let p = model().compute(10_000);
        assert!(p.alien_speed <= 3.0);
        assert!(p.fleet_drop_speed <= 20.0);
        assert!(p.aliens_per_row_factor <= 1.1 + 1e-6);
        assert!(p.alien_points <= 250);
        assert!(p.powerup_fall_speed <= p.alien_speed);
    }

    #[test]
    fn test_level_zero_is_level_one() {
        assert_eq!(model().compute(0), model().compute(1));
    }

    proptest! {
        #[test]
        fn prop_early_alien_speed_non_decreasing(level in 1u32..5) {
            let m = model();
            let a = m.compute(level).alien_speed;
            let b = m.compute(level + 1).alien_speed;
            prop_assert!(a <= b);
            prop_assert!(b <= 1.5);
        }

        #[test]
        fn prop_compute_is_idempotent(level in 1u32..500) {
            let m = model();
            let a = m.compute(level);
            let b = m.compute(level);
            prop_assert_eq!(a.alien_speed.to_bits(), b.alien_speed.to_bits());
            prop_assert_eq!(a.powerup_fall_speed.to_bits(), b.powerup_fall_speed.to_bits());
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_fall_speed_never_exceeds_alien_speed(level in 1u32..500) {
            let p = model().compute(level);
            prop_assert!(p.powerup_fall_speed <= p.alien_speed);
            prop_assert!(p.alien_speed <= 3.0);
        }
    }
}
