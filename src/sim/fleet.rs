//! Fleet generation: grid layout and power-up pre-assignment
//!
//! Power-ups come from a "bag": a fixed share of each fleet is chosen at
//! creation time to carry a drop. There is no per-kill roll.

use glam::Vec2;
use rand::Rng;

use super::difficulty::ParameterSnapshot;
use super::entities::{Alien, AlienSprite, PowerUpKind};
use crate::consts::*;

/// Grid dimensions of a fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetLayout {
    pub columns: u32,
    pub rows: u32,
}

impl FleetLayout {
    pub fn alien_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Builds fleets for a fixed screen/alien/ship geometry
#[derive(Debug, Clone)]
pub struct FleetGenerator {
    pub screen: Vec2,
    pub alien_size: Vec2,
    pub ship_height: f32,
    /// Percentage of aliens that carry a power-up
    pub drop_percent: u32,
}

impl FleetGenerator {
    pub fn new(screen: Vec2, alien_size: Vec2, ship_height: f32, drop_percent: u32) -> Self {
        Self {
            screen,
            alien_size,
            ship_height,
            drop_percent,
        }
    }

    /// Column count for the level's density factor (always at least 1)
    pub fn columns(&self, params: &ParameterSnapshot) -> u32 {
        let alien_w = self.alien_size.x;
        let available = self.screen.x - FLEET_MARGIN_FACTOR * alien_w;
        let fits = (available / (FLEET_SPACING_FACTOR * alien_w)).floor().max(0.0);
        ((fits * params.aliens_per_row_factor).floor() as u32).max(1)
    }

    /// Rows that physically fit between the top margin and the ship
    pub fn max_rows(&self) -> u32 {
        let alien_h = self.alien_size.y;
        let available =
            self.screen.y - FLEET_TOP_MARGIN_FACTOR * alien_h - self.ship_height;
        (available.max(0.0) / (FLEET_SPACING_FACTOR * alien_h)).floor() as u32
    }

    /// Row count for the level: the factor share of the space plus any extra
    /// rows, never more than fit (0 when nothing fits)
    pub fn rows(&self, params: &ParameterSnapshot) -> u32 {
        let max_rows = self.max_rows();
        if max_rows == 0 {
            return 0;
        }
        let base_rows = (max_rows as f32 * params.alien_rows_factor).floor() as u32;
        (base_rows + params.additional_rows).max(1).min(max_rows)
    }

    pub fn layout(&self, params: &ParameterSnapshot) -> FleetLayout {
        FleetLayout {
            columns: self.columns(params),
            rows: self.rows(params),
        }
    }

    /// Build the fleet for `params`: a full grid, left-to-right then
    /// top-to-bottom, with power-ups pre-assigned.
    pub fn generate<R: Rng + ?Sized>(&self, params: &ParameterSnapshot, rng: &mut R) -> Vec<Alien> {
        let layout = self.layout(params);
        let (w, h) = (self.alien_size.x, self.alien_size.y);

        let mut aliens = Vec::with_capacity(layout.alien_count());
        for row in 0..layout.rows {
            for col in 0..layout.columns {
                let x = w + FLEET_SPACING_FACTOR * w * col as f32;
                let y = h + FLEET_SPACING_FACTOR * h * row as f32;
                let sprite = AlienSprite(rng.random_range(0..ALIEN_SPRITE_VARIANTS));
                aliens.push(Alien::new(x, y.floor() as i32, self.alien_size, sprite));
            }
        }

        let assigned = assign_powerups(&mut aliens, params, self.drop_percent, rng);
        log::info!(
            "Level {} fleet: {}x{} = {} aliens, {} carrying power-ups",
            params.level,
            layout.columns,
            layout.rows,
            aliens.len(),
            assigned
        );
        aliens
    }
}

/// Power-up kinds that can drop at this level
pub fn unlocked_powerups(params: &ParameterSnapshot) -> Vec<PowerUpKind> {
    let mut kinds = Vec::with_capacity(2);
    if params.shield_chance > 0.0 {
        kinds.push(PowerUpKind::Shield);
    }
    if params.double_fire_chance > 0.0 {
        kinds.push(PowerUpKind::DoubleFire);
    }
    kinds
}

/// Number of drops for a fleet: `ceil(alive * percent / 100)`
pub fn drops_for(alive: usize, drop_percent: u32) -> usize {
    (alive * drop_percent as usize).div_ceil(100)
}

/// Pick distinct aliens without replacement and give each a random unlocked
/// kind. Clears any previous assignment. Returns the number assigned.
pub fn assign_powerups<R: Rng + ?Sized>(
    aliens: &mut [Alien],
    params: &ParameterSnapshot,
    drop_percent: u32,
    rng: &mut R,
) -> usize {
    for alien in aliens.iter_mut() {
        alien.powerup = None;
    }

    let kinds = unlocked_powerups(params);
    let drops = drops_for(aliens.len(), drop_percent).min(aliens.len());
    if kinds.is_empty() || drops == 0 {
        return 0;
    }

    for index in rand::seq::index::sample(rng, aliens.len(), drops) {
        let kind = kinds[rng.random_range(0..kinds.len())];
        aliens[index].powerup = Some(kind);
        log::debug!("Alien {index} carries {}", kind.as_str());
    }
    drops
}
