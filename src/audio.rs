//! Audio boundary
//!
//! The simulation asks for clips by name; a backend plays them. Any backend
//! failure degrades to silence for the rest of the session.

use thiserror::Error;

use crate::sim::PowerUpKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundClip {
    /// Bullet fired
    Fire,
    /// Alien destroyed (one of several variants)
    Explosion(u8),
    /// Power-up collected
    PowerUp(PowerUpKind),
    /// Ship lost a life
    ShipHit,
    /// Wave cleared
    LevelUp,
    /// Run ended
    GameOver,
    /// New high score reached this run
    HighScore,
}

impl SoundClip {
    /// Asset name for this clip
    pub fn name(&self) -> String {
        match self {
            SoundClip::Fire => "fire".to_string(),
            SoundClip::Explosion(variant) => format!("explosion_{variant}"),
            SoundClip::PowerUp(kind) => format!("powerup_{}", kind.as_str()),
            SoundClip::ShipHit => "ship_hit".to_string(),
            SoundClip::LevelUp => "level_up".to_string(),
            SoundClip::GameOver => "game_over".to_string(),
            SoundClip::HighScore => "high_score".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    /// The audio device cannot be used at all
    #[error("Audio device unavailable: {0}")]
    Unavailable(String),

    /// One clip failed to load; others may still work
    #[error("Missing sound clip '{0}'")]
    MissingClip(String),
}

/// Something that can play clips
pub trait AudioBackend {
    fn play(&mut self, clip: SoundClip, volume: f32) -> Result<(), AudioError>;
}

/// Backend that plays nothing
#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn play(&mut self, _clip: SoundClip, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Backend that logs each clip at debug level (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, clip: SoundClip, volume: f32) -> Result<(), AudioError> {
        log::debug!("♪ {} (vol {:.2})", clip.name(), volume);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    volume: f32,
    /// Clips already reported missing
    missing_reported: Vec<String>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("enabled", &self.is_enabled())
            .field("volume", &self.volume)
            .finish()
    }
}

impl AudioManager {
    /// Wrap the result of backend initialisation. A failed init disables
    /// audio for the session.
    pub fn new(backend: Result<Box<dyn AudioBackend>, AudioError>, volume: f32) -> Self {
        let backend = match backend {
            Ok(backend) => Some(backend),
            Err(e) => {
                log::warn!("{e} - audio disabled");
                None
            }
        };
        Self {
            backend,
            volume: volume.clamp(0.0, 1.0),
            missing_reported: Vec::new(),
        }
    }

    /// Manager that never plays anything
    pub fn disabled() -> Self {
        Self {
            backend: None,
            volume: 0.0,
            missing_reported: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some() && self.volume > 0.0
    }

    /// Play a sound effect
    pub fn play(&mut self, clip: SoundClip) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        match backend.play(clip, self.volume) {
            Ok(()) => {}
            Err(AudioError::MissingClip(name)) => {
                if !self.missing_reported.contains(&name) {
                    log::warn!("Missing sound clip '{name}', playing silence");
                    self.missing_reported.push(name);
                }
            }
            Err(e) => {
                log::warn!("{e} - audio disabled");
                self.backend = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records played clips; fails on demand
    struct Recorder {
        played: Rc<RefCell<Vec<SoundClip>>>,
        fail_with: Option<fn() -> AudioError>,
    }

    impl AudioBackend for Recorder {
        fn play(&mut self, clip: SoundClip, _volume: f32) -> Result<(), AudioError> {
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            self.played.borrow_mut().push(clip);
            Ok(())
        }
    }

    fn unplugged() -> AudioError {
        AudioError::Unavailable("unplugged".into())
    }

    fn no_fire_clip() -> AudioError {
        AudioError::MissingClip("fire".into())
    }

    fn recorder(fail_with: Option<fn() -> AudioError>) -> (AudioManager, Rc<RefCell<Vec<SoundClip>>>) {
        let played = Rc::new(RefCell::new(Vec::new()));
        let backend = Recorder {
            played: played.clone(),
            fail_with,
        };
        (AudioManager::new(Ok(Box::new(backend)), 1.0), played)
    }

    #[test]
    fn test_plays_clips() {
        let (mut audio, played) = recorder(None);
        audio.play(SoundClip::Fire);
        audio.play(SoundClip::Explosion(2));
        assert_eq!(*played.borrow(), vec![SoundClip::Fire, SoundClip::Explosion(2)]);
    }

    #[test]
    fn test_failed_init_is_silent() {
        let mut audio = AudioManager::new(Err(AudioError::Unavailable("no device".into())), 1.0);
        assert!(!audio.is_enabled());
        audio.play(SoundClip::Fire);
    }

    #[test]
    fn test_device_failure_disables() {
        let (mut audio, _) = recorder(Some(unplugged as fn() -> AudioError));
        audio.play(SoundClip::Fire);
        assert!(!audio.is_enabled());
    }

    #[test]
    fn test_missing_clip_keeps_audio_on() {
        let (mut audio, _) = recorder(Some(no_fire_clip as fn() -> AudioError));
        audio.play(SoundClip::Fire);
        audio.play(SoundClip::Fire);
        assert!(audio.is_enabled());
        assert_eq!(audio.missing_reported.len(), 1);
    }

    #[test]
    fn test_clip_names() {
        assert_eq!(SoundClip::Explosion(1).name(), "explosion_1");
        assert_eq!(SoundClip::PowerUp(PowerUpKind::DoubleFire).name(), "powerup_double_fire");
    }
}
