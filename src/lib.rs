//! Alien Onslaught - an endless-wave arcade shoot-'em-up
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, fleets, collisions, session)
//! - `renderer`: Drawing boundary, sprite catalog and HUD text
//! - `audio`: Sound boundary with graceful degradation
//! - `platform`: Input events and monotonic time
//! - `persistence`: Single-value text file storage
//! - `tuning`: Data-driven difficulty balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::DifficultyConfig;

/// Game configuration constants
pub mod consts {
    /// Default play area
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Ship display size
    pub const SHIP_WIDTH: f32 = 60.0;
    pub const SHIP_HEIGHT: f32 = 48.0;

    /// Alien display size
    pub const ALIEN_WIDTH: f32 = 40.0;
    pub const ALIEN_HEIGHT: f32 = 40.0;

    /// Power-up display size
    pub const POWERUP_SIZE: f32 = 24.0;

    /// Ship/bullet speed multiplier applied per cleared wave
    pub const SPEEDUP_SCALE: f32 = 1.15;

    /// Fleet layout: side margin in alien widths
    pub const FLEET_MARGIN_FACTOR: f32 = 2.0;
    /// Fleet layout: grid pitch in alien widths/heights
    pub const FLEET_SPACING_FACTOR: f32 = 2.0;
    /// Fleet layout: vertical margin in alien heights
    pub const FLEET_TOP_MARGIN_FACTOR: f32 = 3.0;

    /// Cosmetic variants
    pub const ALIEN_SPRITE_VARIANTS: u8 = 3;
    pub const EXPLOSION_VARIANTS: u8 = 3;

    /// Play button size (centred on screen)
    pub const PLAY_BUTTON_WIDTH: f32 = 200.0;
    pub const PLAY_BUTTON_HEIGHT: f32 = 50.0;
}

/// Format a score for display: rounded to the nearest ten, comma-grouped
pub fn format_score(score: u64) -> String {
    let rounded = score.saturating_add(5) / 10 * 10;
    group_thousands(rounded)
}

/// Comma-group an integer ("1234567" -> "1,234,567")
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(54), "50");
        assert_eq!(format_score(55), "60");
        assert_eq!(format_score(1234), "1,230");
        assert_eq!(format_score(1_234_567), "1,234,570");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(100_000), "100,000");
    }
}
