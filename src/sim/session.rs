//! Game session: phase flow, per-frame update and scoring
//!
//! One simulation step per frame: advance the ship and bullets, resolve
//! bullet hits, sweep the fleet, check ship hits, move power-ups, then record
//! any new high score.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{self, HitCause};
use super::difficulty::{DifficultyModel, ParameterSnapshot};
use super::entities::{Alien, Bullet, PowerUp, PowerUpKind, Ship};
use super::fleet::FleetGenerator;
use super::geom::Rect;
use super::state::{GamePhase, GameStats, PhaseEvent, transition};
use crate::audio::{AudioManager, SoundClip};
use crate::consts::*;
use crate::highscores::HighScore;
use crate::persistence::MemoryStore;
use crate::platform::{InputEvent, Key};
use crate::renderer::{Color, Hud, SpriteCatalog, SpriteId, Surface};
use crate::settings::Settings;
use crate::tuning::DifficultyConfig;

/// Oldest events are dropped beyond this many undrained events
const MAX_PENDING_EVENTS: usize = 256;

/// Something that happened during input handling or an update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Abandoned,
    BulletsFired(u32),
    AlienDestroyed {
        points: u64,
        powerup: Option<PowerUpKind>,
    },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    /// Shield soaked up a hit
    HitAbsorbed,
    ShipLost {
        cause: HitCause,
        ships_left: u32,
    },
    WaveCleared {
        level: u32,
    },
    NewHighScore(u64),
    GameOver {
        score: u64,
        level: u32,
    },
}

/// Entities of the current round. Each entity lives in exactly one
/// collection.
#[derive(Debug, Clone)]
pub struct World {
    pub ship: Ship,
    pub aliens: Vec<Alien>,
    pub bullets: Vec<Bullet>,
    pub powerups: Vec<PowerUp>,
    /// Shared fleet direction (+1 right, -1 left)
    pub fleet_direction: f32,
}

/// Complete game session
pub struct GameSession {
    settings: Settings,
    model: DifficultyModel,
    params: ParameterSnapshot,
    fleet: FleetGenerator,
    rng: Pcg32,
    seed: u64,

    phase: GamePhase,
    stats: GameStats,
    high_score: HighScore,
    world: World,

    /// Current bullet speed (grows with each cleared wave)
    bullet_speed: f32,
    /// Aliens destroyed in the current wave
    wave_destroyed: u32,
    /// Aliens destroyed since the session started
    total_destroyed: u64,
    /// Post-hit pause deadline
    stalled_until: Option<u64>,
    /// Set once per run when the high score is first beaten
    beat_high_score: bool,
    quit_requested: bool,

    hud: Hud,
    audio: AudioManager,
    events: Vec<GameEvent>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("seed", &self.seed)
            .field("phase", &self.phase)
            .field("stats", &self.stats)
            .field("aliens", &self.world.aliens.len())
            .finish()
    }
}

impl GameSession {
    pub fn new(
        settings: Settings,
        tuning: DifficultyConfig,
        high_score: HighScore,
        audio: AudioManager,
        seed: u64,
    ) -> Self {
        let settings = settings.sanitized();
        let screen = Vec2::new(settings.screen_width, settings.screen_height);
        let ship_size = Vec2::new(settings.ship_width, settings.ship_height);
        let alien_size = Vec2::new(settings.alien_width, settings.alien_height);
        let fleet = FleetGenerator::new(screen, alien_size, ship_size.y, tuning.drop_percent);
        let model = DifficultyModel::new(tuning);
        let params = model.compute(1);

        let mut hud = Hud::new(ship_size);
        hud.set_score(0);
        hud.set_high_score(high_score.best());
        hud.set_level(1);
        hud.set_ships(settings.ship_limit);

        log::info!("Session created with seed {seed}");

        Self {
            world: World {
                ship: Ship::new(ship_size, settings.ship_speed, screen),
                aliens: Vec::new(),
                bullets: Vec::new(),
                powerups: Vec::new(),
                fleet_direction: 1.0,
            },
            stats: GameStats::new(settings.ship_limit),
            bullet_speed: settings.bullet_speed,
            settings,
            model,
            params,
            fleet,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            phase: GamePhase::Menu,
            high_score,
            wave_destroyed: 0,
            total_destroyed: 0,
            stalled_until: None,
            beat_high_score: false,
            quit_requested: false,
            hud,
            audio,
            events: Vec::new(),
        }
    }

    /// Session with default settings, an in-memory high score and no audio
    pub fn with_seed(seed: u64) -> Self {
        Self::new(
            Settings::default(),
            DifficultyConfig::default(),
            HighScore::load(Box::new(MemoryStore::default())),
            AudioManager::disabled(),
            seed,
        )
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn params(&self) -> &ParameterSnapshot {
        &self.params
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn bullet_speed(&self) -> f32 {
        self.bullet_speed
    }

    pub fn wave_destroyed(&self) -> u32 {
        self.wave_destroyed
    }

    pub fn total_destroyed(&self) -> u64 {
        self.total_destroyed
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// True while the post-hit pause is running
    pub fn is_stalled(&self, now_ms: u64) -> bool {
        self.stalled_until.is_some_and(|until| now_ms < until)
    }

    /// Milliseconds left in the post-hit pause
    pub fn stall_remaining_ms(&self, now_ms: u64) -> u64 {
        self.stalled_until
            .map(|until| until.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    /// Take all events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn screen(&self) -> Vec2 {
        Vec2::new(self.settings.screen_width, self.settings.screen_height)
    }

    /// Play button, centred on screen
    pub fn play_button(&self) -> Rect {
        Rect::centered(
            self.screen() / 2.0,
            Vec2::new(PLAY_BUTTON_WIDTH, PLAY_BUTTON_HEIGHT),
        )
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    // === Phase flow ===

    /// Feed an event to the state machine, running its side effects when the
    /// transition applies. Returns false if the event was ignored.
    pub fn apply(&mut self, event: PhaseEvent, now_ms: u64) -> bool {
        let Some(next) = transition(self.phase, event) else {
            log::debug!("Ignoring {event:?} in {:?}", self.phase);
            return false;
        };

        match event {
            PhaseEvent::Start => self.start_game(),
            PhaseEvent::Pause => {
                log::info!("Paused");
                self.emit(GameEvent::Paused);
            }
            PhaseEvent::Resume => {
                log::info!("Resumed");
                self.emit(GameEvent::Resumed);
            }
            PhaseEvent::Abandon => {
                log::info!("Run abandoned at level {}", self.stats.level);
                self.world.ship.moving_left = false;
                self.world.ship.moving_right = false;
                self.stalled_until = None;
                self.emit(GameEvent::Abandoned);
            }
            PhaseEvent::ShipHit { ships_left } if ships_left > 0 => self.lose_ship(now_ms),
            PhaseEvent::ShipHit { .. } => self.end_game(),
        }

        self.phase = next;
        true
    }

    fn start_game(&mut self) {
        self.stats.reset(self.settings.ship_limit);
        self.params = self.model.compute(1);
        self.world.ship.speed = self.settings.ship_speed;
        self.world.ship.shield.clear();
        self.world.ship.double_fire.clear();
        self.bullet_speed = self.settings.bullet_speed;
        self.wave_destroyed = 0;
        self.stalled_until = None;
        self.beat_high_score = false;
        self.new_round();

        self.hud.set_score(self.stats.score);
        self.hud.set_level(self.stats.level);
        self.hud.set_ships(self.stats.ships_left);

        log::info!("New game started");
        self.emit(GameEvent::Started);
    }

    /// Clear round entities, build a fresh fleet and re-centre the ship
    fn new_round(&mut self) {
        let screen = self.screen();
        self.world.bullets.clear();
        self.world.powerups.clear();
        self.world.aliens = self.fleet.generate(&self.params, &mut self.rng);
        self.world.fleet_direction = 1.0;
        self.world.ship.center(screen);
    }

    fn lose_ship(&mut self, now_ms: u64) {
        self.stats.ships_left -= 1;
        self.hud.set_ships(self.stats.ships_left);
        self.wave_destroyed = 0;
        self.new_round();
        self.stalled_until = Some(now_ms.saturating_add(self.settings.hit_pause_ms));
        self.audio.play(SoundClip::ShipHit);
        log::info!("Ship lost, {} left", self.stats.ships_left);
    }

    fn end_game(&mut self) {
        self.world.ship.moving_left = false;
        self.world.ship.moving_right = false;
        self.audio.play(SoundClip::GameOver);
        log::info!(
            "Game over: score {} at level {} ({} aliens destroyed)",
            self.stats.score,
            self.stats.level,
            self.total_destroyed
        );
        self.emit(GameEvent::GameOver {
            score: self.stats.score,
            level: self.stats.level,
        });
    }

    fn advance_level(&mut self) {
        self.world.bullets.clear();
        log::info!(
            "Wave {} cleared ({} destroyed)",
            self.stats.level,
            self.wave_destroyed
        );

        self.stats.level += 1;
        self.params = self.model.compute(self.stats.level);
        self.world.aliens = self.fleet.generate(&self.params, &mut self.rng);
        self.world.fleet_direction = 1.0;
        self.wave_destroyed = 0;

        self.world.ship.speed *= self.settings.speedup_scale;
        self.bullet_speed *= self.settings.speedup_scale;

        self.hud.set_level(self.stats.level);
        self.audio.play(SoundClip::LevelUp);
        self.emit(GameEvent::WaveCleared {
            level: self.stats.level,
        });
    }

    // === Input ===

    pub fn handle_input(&mut self, event: InputEvent, now_ms: u64) {
        match event {
            InputEvent::Quit => self.quit_requested = true,
            InputEvent::KeyDown(key) => self.key_down(key, now_ms),
            InputEvent::KeyUp(Key::Left) => self.world.ship.moving_left = false,
            InputEvent::KeyUp(Key::Right) => self.world.ship.moving_right = false,
            InputEvent::KeyUp(_) => {}
            InputEvent::MouseClick(pos) => {
                if matches!(self.phase, GamePhase::Menu | GamePhase::GameOver)
                    && self.play_button().contains(pos)
                {
                    self.apply(PhaseEvent::Start, now_ms);
                }
            }
        }
    }

    fn key_down(&mut self, key: Key, now_ms: u64) {
        use GamePhase::*;

        match (self.phase, key) {
            (_, Key::Quit) => self.quit_requested = true,
            (Menu | GameOver, Key::Start) => {
                self.apply(PhaseEvent::Start, now_ms);
            }
            (Menu, Key::Escape) => self.quit_requested = true,
            (Playing, Key::Pause) => {
                self.apply(PhaseEvent::Pause, now_ms);
            }
            (Paused, Key::Pause) => {
                self.apply(PhaseEvent::Resume, now_ms);
            }
            (Playing | Paused | GameOver, Key::Escape) => {
                self.apply(PhaseEvent::Abandon, now_ms);
            }
            (Playing, _) if self.is_stalled(now_ms) => {}
            (Playing, Key::Left) => self.world.ship.moving_left = true,
            (Playing, Key::Right) => self.world.ship.moving_right = true,
            (Playing, Key::Fire) => self.fire_bullets(now_ms),
            _ => {}
        }
    }

    /// Fire one bullet, or a pair during double-fire, within the in-flight cap
    fn fire_bullets(&mut self, now_ms: u64) {
        let ship = &self.world.ship;
        let double = ship.double_fire.is_active(now_ms);
        let cap = if double {
            self.settings.bullets_allowed * 2
        } else {
            self.settings.bullets_allowed
        };
        let quarter = ship.size.x / 4.0;
        let offsets = if double {
            vec![-quarter, quarter]
        } else {
            vec![0.0]
        };

        let size = Vec2::new(self.settings.bullet_width, self.settings.bullet_height);
        let mut fired = 0;
        for offset in offsets {
            if self.world.bullets.len() >= cap {
                break;
            }
            let bullet = Bullet::from_ship(&self.world.ship, offset, size, self.bullet_speed);
            self.world.bullets.push(bullet);
            fired += 1;
        }

        if fired > 0 {
            self.audio.play(SoundClip::Fire);
            self.emit(GameEvent::BulletsFired(fired));
        }
    }

    // === Simulation ===

    /// Advance one frame. Does nothing outside `Playing` or during the
    /// post-hit pause.
    pub fn update(&mut self, now_ms: u64) {
        if self.events.len() > MAX_PENDING_EVENTS {
            let excess = self.events.len() - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
        }

        if self.phase != GamePhase::Playing {
            return;
        }
        if let Some(until) = self.stalled_until {
            if now_ms < until {
                return;
            }
            self.stalled_until = None;
        }

        for kind in self.world.ship.expire_effects(now_ms) {
            log::debug!("{} expired", kind.as_str());
            self.emit(GameEvent::PowerUpExpired(kind));
        }

        let screen = self.screen();
        self.world.ship.update(screen.x);
        self.update_bullets();
        self.check_bullet_alien_collisions();
        self.check_high_score();

        if self.update_aliens(now_ms) {
            return;
        }
        self.update_powerups(now_ms);
    }

    fn update_bullets(&mut self) {
        for bullet in &mut self.world.bullets {
            bullet.update();
        }
        self.world.bullets.retain(|b| !b.off_screen());
    }

    fn check_bullet_alien_collisions(&mut self) {
        let kills = collision::bullets_vs_aliens(&mut self.world.bullets, &mut self.world.aliens);
        if kills.is_empty() {
            return;
        }

        let points = self.params.alien_points;
        for kill in &kills {
            self.stats.score += points;
            self.wave_destroyed += 1;
            self.total_destroyed += 1;

            let variant = self.rng.random_range(0..EXPLOSION_VARIANTS);
            self.audio.play(SoundClip::Explosion(variant));
            self.emit(GameEvent::AlienDestroyed {
                points,
                powerup: kill.powerup,
            });

            if let Some(kind) = kill.powerup {
                self.world.powerups.push(PowerUp::spawn(
                    kind,
                    kill.center,
                    self.params.powerup_fall_speed,
                    self.params.alien_speed,
                ));
                self.emit(GameEvent::PowerUpSpawned(kind));
            }
        }
        self.hud.set_score(self.stats.score);

        if self.world.aliens.is_empty() {
            self.advance_level();
        }
    }

    /// Sweep the fleet, then check for ship hits. Returns true if the ship
    /// was hit (the round was reset or the game ended).
    fn update_aliens(&mut self, now_ms: u64) -> bool {
        let screen = self.screen();
        self.world.fleet_direction = collision::advance_fleet(
            &mut self.world.aliens,
            self.world.fleet_direction,
            self.params.alien_speed,
            self.params.fleet_drop_speed,
            screen.x,
        );

        let Some(cause) = collision::ship_threat(&self.world.ship, &self.world.aliens, screen.y)
        else {
            return false;
        };

        if self.world.ship.shield.is_active(now_ms) {
            self.emit(GameEvent::HitAbsorbed);
            return false;
        }

        let ships_left = self.stats.ships_left;
        self.emit(GameEvent::ShipLost { cause, ships_left });
        self.apply(PhaseEvent::ShipHit { ships_left }, now_ms);
        true
    }

    fn update_powerups(&mut self, now_ms: u64) {
        let screen_height = self.settings.screen_height;
        for powerup in &mut self.world.powerups {
            powerup.update();
        }
        self.world.powerups.retain(|p| !p.off_screen(screen_height));

        for kind in collision::ship_vs_powerups(&self.world.ship, &mut self.world.powerups) {
            self.activate_powerup(kind, now_ms);
        }
    }

    fn activate_powerup(&mut self, kind: PowerUpKind, now_ms: u64) {
        let duration = match kind {
            PowerUpKind::Shield => self.settings.shield_duration_ms,
            PowerUpKind::DoubleFire => self.settings.double_fire_duration_ms,
        };
        let effect = self.world.ship.effect_mut(kind);
        effect.activate(now_ms, duration);
        let remaining = effect.remaining_ms(now_ms);
        self.audio.play(SoundClip::PowerUp(kind));
        log::debug!("{} active for {remaining} ms", kind.as_str());
        self.emit(GameEvent::PowerUpCollected(kind));
    }

    fn check_high_score(&mut self) {
        if !self.high_score.submit(self.stats.score) {
            return;
        }
        self.hud.set_high_score(self.stats.score);
        if !self.beat_high_score {
            self.beat_high_score = true;
            self.audio.play(SoundClip::HighScore);
            self.emit(GameEvent::NewHighScore(self.stats.score));
        }
    }

    // === Drawing ===

    /// Draw the current frame
    pub fn draw(&self, surface: &mut dyn Surface, catalog: &SpriteCatalog, now_ms: u64) {
        surface.clear(Color::BACKGROUND);

        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused | GamePhase::GameOver) {
            self.draw_world(surface, catalog, now_ms);
        }
        self.hud.draw(surface, catalog, self.settings.screen_width);

        match self.phase {
            GamePhase::Paused => {
                surface.draw_text("Paused", self.screen() / 2.0, Color::TEXT);
            }
            GamePhase::Menu | GamePhase::GameOver => {
                let button = self.play_button();
                surface.draw_rect(button, Color::BUTTON);
                surface.draw_text("Play", button.center(), Color::BUTTON_TEXT);
            }
            GamePhase::Playing => {}
        }

        surface.present();
    }

    fn draw_world(&self, surface: &mut dyn Surface, catalog: &SpriteCatalog, now_ms: u64) {
        let ship = &self.world.ship;
        let ship_sprite = match ship.dominant_effect(now_ms) {
            Some(PowerUpKind::Shield) => SpriteId::ShipShielded,
            Some(PowerUpKind::DoubleFire) => SpriteId::ShipDoubleFire,
            None => SpriteId::Ship,
        };
        catalog.draw(surface, ship_sprite, ship.rect());

        for bullet in &self.world.bullets {
            surface.draw_rect(bullet.rect(), Color::BULLET);
        }
        for alien in &self.world.aliens {
            catalog.draw(surface, SpriteId::Alien(alien.sprite.0), alien.rect());
        }
        for powerup in &self.world.powerups {
            catalog.draw(surface, SpriteId::PowerUp(powerup.kind), powerup.rect());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::AlienSprite;

    fn playing(seed: u64) -> GameSession {
        let mut session = GameSession::with_seed(seed);
        session.handle_input(InputEvent::KeyDown(Key::Start), 0);
        assert_eq!(session.phase(), GamePhase::Playing);
        session
    }

    /// Replace the fleet with one alien far from the ship
    fn lone_alien(session: &mut GameSession, x: f32, y: i32) {
        let size = Vec2::splat(40.0);
        session.world_mut().aliens = vec![Alien::new(x, y, size, AlienSprite(0))];
    }

    #[test]
    fn test_start_builds_fleet() {
        let session = playing(1);
        assert_eq!(session.world().aliens.len(), 27);
        assert_eq!(session.stats().level, 1);
        assert_eq!(session.stats().ships_left, 3);
        assert_eq!(session.params().level, 1);
    }

    #[test]
    fn test_bullet_cap() {
        let mut session = playing(1);
        for _ in 0..5 {
            session.handle_input(InputEvent::KeyDown(Key::Fire), 0);
        }
        assert_eq!(session.world().bullets.len(), 3);
    }

    #[test]
    fn test_double_fire_pairs_and_doubles_cap() {
        let mut session = playing(1);
        session.world_mut().ship.double_fire.activate(0, 10_000);
        session.handle_input(InputEvent::KeyDown(Key::Fire), 0);
        assert_eq!(session.world().bullets.len(), 2);
        for _ in 0..5 {
            session.handle_input(InputEvent::KeyDown(Key::Fire), 0);
        }
        assert_eq!(session.world().bullets.len(), 6);
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut session = playing(1);
        session.handle_input(InputEvent::KeyDown(Key::Fire), 0);
        session
            .world_mut()
            .powerups
            .push(PowerUp::spawn(PowerUpKind::Shield, Vec2::new(300.0, 300.0), 0.5, 1.0));
        let snapshot = |s: &GameSession| {
            let w = s.world();
            (
                w.aliens.iter().map(|a| (a.x, a.y)).collect::<Vec<_>>(),
                w.bullets.iter().map(|b| b.pos).collect::<Vec<_>>(),
                w.powerups.iter().map(|p| p.pos).collect::<Vec<_>>(),
            )
        };
        let before = snapshot(&session);
        assert_eq!(before.1.len(), 1);
        assert_eq!(before.2.len(), 1);

        session.handle_input(InputEvent::KeyDown(Key::Pause), 0);
        assert_eq!(session.phase(), GamePhase::Paused);
        for t in 0..10 {
            session.update(t * 16);
        }
        assert_eq!(snapshot(&session), before);

        session.handle_input(InputEvent::KeyDown(Key::Pause), 200);
        assert_eq!(session.phase(), GamePhase::Playing);
        session.update(216);
        let after = snapshot(&session);
        assert!(after.1[0].y < before.1[0].y);
        assert!(after.2[0].y > before.2[0].y);
    }

    #[test]
    fn test_missed_powerup_is_discarded() {
        let mut session = playing(1);
        lone_alien(&mut session, 500.0, 100);
        // Falling past the bottom, away from the ship
        session.world_mut().powerups.push(PowerUp::spawn(
            PowerUpKind::DoubleFire,
            Vec2::new(100.0, 810.0),
            1.0,
            1.0,
        ));

        session.update(16);
        assert_eq!(session.world().powerups.len(), 1);
        for t in 2..10 {
            session.update(t * 16);
        }
        assert!(session.world().powerups.is_empty());
        assert!(!session.world().ship.double_fire.is_active(160));
    }

    #[test]
    fn test_kill_scores_points() {
        let mut session = playing(1);
        lone_alien(&mut session, 500.0, 300);
        session.world_mut().aliens.push(Alien::new(50.0, 40, Vec2::splat(40.0), AlienSprite(1)));
        session.world_mut().bullets.push(Bullet {
            pos: Vec2::new(510.0, 320.0),
            size: Vec2::new(3.0, 15.0),
            speed: 2.5,
        });

        session.update(16);
        assert_eq!(session.stats().score, 50);
        assert!(session.world().bullets.is_empty());
        assert_eq!(session.world().aliens.len(), 1);
        assert_eq!(session.wave_destroyed(), 1);
        assert_eq!(session.hud().score_text(), "50");
    }

    #[test]
    fn test_powerup_refresh_does_not_stack() {
        let mut session = playing(1);
        lone_alien(&mut session, 500.0, 100);
        let center = session.world().ship.rect().center();
        session
            .world_mut()
            .powerups
            .push(PowerUp::spawn(PowerUpKind::Shield, center, 0.1, 1.0));
        session.update(1_000);
        assert_eq!(session.world().ship.shield.remaining_ms(1_000), 8_000);

        session
            .world_mut()
            .powerups
            .push(PowerUp::spawn(PowerUpKind::Shield, center, 0.1, 1.0));
        session.update(5_000);
        assert_eq!(session.world().ship.shield.remaining_ms(5_000), 8_000);
    }

    #[test]
    fn test_stall_after_hit_ignores_input() {
        let mut session = playing(1);
        let ship_x = session.world().ship.x;
        lone_alien(&mut session, ship_x, 760);
        session.update(100);
        assert_eq!(session.stats().ships_left, 2);
        assert!(session.is_stalled(300));
        assert_eq!(session.stall_remaining_ms(300), 300);

        session.handle_input(InputEvent::KeyDown(Key::Fire), 300);
        assert!(session.world().bullets.is_empty());

        // Pause ends after 500 ms
        assert!(!session.is_stalled(600));
        session.handle_input(InputEvent::KeyDown(Key::Fire), 600);
        assert_eq!(session.world().bullets.len(), 1);
    }

    #[test]
    fn test_play_button_click_starts() {
        let mut session = GameSession::with_seed(1);
        session.handle_input(InputEvent::MouseClick(Vec2::new(5.0, 5.0)), 0);
        assert_eq!(session.phase(), GamePhase::Menu);
        session.handle_input(InputEvent::MouseClick(Vec2::new(600.0, 400.0)), 0);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_escape_abandons_then_quits() {
        let mut session = playing(1);
        session.handle_input(InputEvent::KeyDown(Key::Escape), 0);
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(!session.quit_requested());
        session.handle_input(InputEvent::KeyDown(Key::Escape), 0);
        assert!(session.quit_requested());
    }

    #[test]
    fn test_zero_alien_size_still_starts() {
        let settings = Settings {
            alien_width: 0.0,
            alien_height: 0.0,
            ..Default::default()
        };
        let mut session = GameSession::new(
            settings,
            DifficultyConfig::default(),
            HighScore::load(Box::new(MemoryStore::default())),
            AudioManager::disabled(),
            1,
        );
        session.handle_input(InputEvent::KeyDown(Key::Start), 0);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(!session.world().aliens.is_empty());
        session.update(16);
    }

    #[test]
    fn test_escape_from_game_over_returns_to_menu() {
        let mut session = playing(1);
        let mut now = 100;
        for _ in 0..4 {
            let ship_x = session.world().ship.x;
            lone_alien(&mut session, ship_x, 760);
            session.update(now);
            now += 1_000;
        }
        assert_eq!(session.phase(), GamePhase::GameOver);

        session.handle_input(InputEvent::KeyDown(Key::Escape), now);
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(!session.quit_requested());

        // A second Escape from the menu quits
        session.handle_input(InputEvent::KeyDown(Key::Escape), now);
        assert!(session.quit_requested());
    }

    #[test]
    fn test_abandon_keeps_stats_until_restart() {
        let mut session = playing(1);
        lone_alien(&mut session, 500.0, 300);
        session.world_mut().aliens.push(Alien::new(50.0, 40, Vec2::splat(40.0), AlienSprite(1)));
        session.world_mut().bullets.push(Bullet {
            pos: Vec2::new(510.0, 320.0),
            size: Vec2::new(3.0, 15.0),
            speed: 2.5,
        });
        session.update(16);
        session.handle_input(InputEvent::KeyDown(Key::Escape), 20);
        assert_eq!(session.stats().score, 50);

        session.handle_input(InputEvent::KeyDown(Key::Start), 30);
        assert_eq!(session.stats().score, 0);
    }
}
