//! Alien Onslaught entry point
//!
//! Headless frame-loop host: polls input (from the autopilot), steps the
//! simulation, draws into a recording surface. With `--realtime` it runs on
//! the wall clock and honours the post-hit stall by sleeping.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use alien_onslaught::audio::{AudioBackend, AudioManager, LogBackend};
use alien_onslaught::persistence::TextFileStore;
use alien_onslaught::platform::{Clock, FrameClock, InputEvent, MonotonicClock};
use alien_onslaught::renderer::{DirectoryAssets, RecordingSurface, SpriteCatalog};
use alien_onslaught::sim::{Autopilot, GameEvent, GamePhase, GameSession};
use alien_onslaught::{DifficultyConfig, HighScore, Settings, format_score};

/// Frames per second of the host loop
const FPS: u32 = 60;

#[derive(Debug, Parser)]
#[command(name = "alien-onslaught", about = "Endless-wave arcade shooter (headless demo)")]
struct Args {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 36_000)]
    frames: u64,

    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Difficulty tuning JSON file
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// High score file (overrides settings)
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Sprite directory
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Disable audio
    #[arg(long)]
    mute: bool,

    /// Run on the wall clock instead of a fixed frame clock
    #[arg(long)]
    realtime: bool,

    /// Stop after the first game over
    #[arg(long)]
    single_run: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    log::info!("Alien Onslaught starting...");

    let mut settings = match &args.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::default(),
    };
    if let Some(path) = &args.high_score_file {
        settings.high_score_path = path.clone();
    }
    if args.mute {
        settings.audio_enabled = false;
    }
    let tuning = DifficultyConfig::load_or_default(args.tuning.as_deref());

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let store = TextFileStore::new(&settings.high_score_path);
    log::info!("High score file: {}", store.path().display());
    let high_score = HighScore::load(Box::new(store));
    let audio = if settings.audio_enabled {
        let backend: Box<dyn AudioBackend> = Box::new(LogBackend);
        AudioManager::new(Ok(backend), settings.effective_volume())
    } else {
        AudioManager::disabled()
    };
    let assets = DirectoryAssets::new(&args.assets);
    log::info!("Loading sprites from {}", assets.root().display());
    let catalog = SpriteCatalog::load(&assets);

    let mut session = GameSession::new(settings, tuning, high_score, audio, seed);
    let mut pilot = Autopilot::default();
    let mut surface = RecordingSurface::default();

    let wall_clock = MonotonicClock::new();
    let mut frame_clock = FrameClock::new(FPS);
    let mut games = 0u32;

    for _ in 0..args.frames {
        let now = if args.realtime {
            wall_clock.now_ms()
        } else {
            frame_clock.now_ms()
        };

        for event in pilot.inputs(&session) {
            session.handle_input(event, now);
        }
        if session.quit_requested() {
            break;
        }

        session.update(now);
        session.draw(&mut surface, &catalog, now);

        for event in session.drain_events() {
            match event {
                GameEvent::WaveCleared { level } => println!("Reached level {level}"),
                GameEvent::NewHighScore(score) => {
                    println!("New high score: {}", format_score(score))
                }
                GameEvent::GameOver { score, level } => {
                    games += 1;
                    println!("Game over: {} at level {level}", format_score(score));
                }
                _ => {}
            }
        }
        if args.single_run && games > 0 {
            session.handle_input(InputEvent::Quit, now);
            break;
        }

        // The post-hit pause stalls the whole loop
        let stall = session.stall_remaining_ms(now);
        if args.realtime {
            if stall > 0 {
                std::thread::sleep(Duration::from_millis(stall));
            }
            std::thread::sleep(Duration::from_millis(1000 / FPS as u64));
        } else if stall > 0 {
            frame_clock.skip_ms(stall);
        } else {
            frame_clock.advance();
        }
    }

    let stats = session.stats();
    let phase = match session.phase() {
        GamePhase::Menu => "menu",
        GamePhase::Playing => "playing",
        GamePhase::Paused => "paused",
        GamePhase::GameOver => "game over",
    };
    println!(
        "Finished after {} frames ({phase}): score {}, level {}, ships {}, high score {}, {} aliens destroyed",
        surface.frames,
        format_score(stats.score),
        stats.level,
        stats.ships_left,
        format_score(session.high_score()),
        session.total_destroyed()
    );
}
