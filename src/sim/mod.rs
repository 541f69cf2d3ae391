//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time passed in explicitly (milliseconds)
//! - Stable iteration order (collections are never reordered)
//! - Rendering and audio reached only through their boundary traits

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod entities;
pub mod fleet;
pub mod geom;
pub mod session;
pub mod state;

pub use autopilot::Autopilot;
pub use collision::{HitCause, Kill};
pub use difficulty::{DifficultyModel, ParameterSnapshot};
pub use entities::{Alien, AlienSprite, Bullet, PowerUp, PowerUpKind, Ship, TimedEffect};
pub use fleet::{FleetGenerator, FleetLayout};
pub use geom::Rect;
pub use session::{GameEvent, GameSession, World};
pub use state::{GamePhase, GameStats, PhaseEvent, transition};
