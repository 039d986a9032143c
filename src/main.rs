//! Sea Runner entry point
//!
//! Headless driver: builds the world from the built-in prototypes, plays a
//! few levels (steered by the autopilot when enabled in settings) and feeds simulation events to the HUD and audio
//! sinks. A windowed renderer would replace the loop body with its frame
//! callback and hand each snapshot to its scene.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use sea_runner::audio::AudioManager;
use sea_runner::hud::{Hud, progress_width};
use sea_runner::sim::{
    GamePhase, LevelOutcome, TickInput, WorldContext, dispatch, setup_level, tick,
};
use sea_runner::snapshot::{NodeKey, RenderNode, Scene, SceneSync, build_snapshot};
use sea_runner::{AssetLibrary, Settings, Tuning, WorldError};

const DEFAULT_SETTINGS: &str = "sea_runner_settings.json";
/// Levels to play before exiting
const LEVELS_TO_PLAY: u32 = 3;
/// Hard stop so a stuck run cannot loop forever
const MAX_TICKS: u64 = 200_000;
/// Ticks to let the boat drift after a level ends before moving on
const LEVEL_END_PAUSE: u32 = 120;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Sea Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS));
    let tuning_path = args.next().map(PathBuf::from);

    match run(&settings_path, tuning_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_tuning(path: Option<&Path>) -> Result<Tuning, WorldError> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let tuning = Tuning::from_json(&json)?;
            log::info!("Loaded tuning from {}", path.display());
            Ok(tuning)
        }
        None => Ok(Tuning::default()),
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Base input for the headless loop.
/// There is no input device, so without the autopilot the boat runs straight.
fn driver_input(settings: &Settings) -> TickInput {
    TickInput {
        idle_mode: settings.autopilot,
        ..Default::default()
    }
}

fn run(settings_path: &Path, tuning_path: Option<&Path>) -> Result<(), WorldError> {
    let settings = Settings::load(settings_path);
    let tuning = load_tuning(tuning_path)?;
    let seed = settings.seed.unwrap_or_else(time_seed);

    let mut ctx = WorldContext::new(seed, tuning, &AssetLibrary::builtin())?;
    log::info!("World initialized with seed: {}", seed);

    let mut hud = Hud::new();
    let mut audio = AudioManager::from_settings(&settings);
    let mut sync = SceneSync::new();
    let mut scene = NullScene::default();

    setup_level(&mut ctx, 1);
    let mut input = driver_input(&settings);
    log::info!(
        "Steering: {}",
        if input.idle_mode { "autopilot" } else { "straight ahead" }
    );
    let mut pause = 0;

    while ctx.time_ticks < MAX_TICKS {
        input.start = ctx.phase == GamePhase::Ready;
        tick(&mut ctx, &input);
        input.next_level = false;
        input.restart = false;

        let events = ctx.drain_events();
        dispatch(&events, &mut [&mut hud, &mut audio]);
        for cue in audio.drain() {
            log::debug!("Sound: {} at {:.2}", cue.effect.clip(), cue.volume);
        }

        let snapshot = build_snapshot(&ctx);
        sync.apply(&snapshot, &mut scene);
        if ctx.time_ticks % 600 == 0 {
            log::info!(
                "Tick {}: level {} {:.0}% (bar {:.0}px) coins {} lives {} nodes {}",
                ctx.time_ticks,
                ctx.run.level,
                snapshot.progress * 100.0,
                progress_width(&ctx.run),
                hud.coin_text,
                hud.life_text,
                sync.len()
            );
            if log::log_enabled!(log::Level::Trace) {
                match snapshot.to_json() {
                    Ok(json) => log::trace!("Snapshot: {}", json),
                    Err(e) => log::warn!("Snapshot encode failed: {}", e),
                }
            }
        }

        let GamePhase::LevelOver(outcome) = ctx.phase else {
            continue;
        };
        if hud.level_end.is_none() {
            hud.show_level_end(&ctx.run, outcome == LevelOutcome::Failed);
            if let Some(screen) = &hud.level_end {
                log::info!("{}: {} ({} coins)", screen.title, screen.status, screen.coins);
            }
            pause = LEVEL_END_PAUSE;
        }
        if pause > 0 {
            pause -= 1;
            continue;
        }

        match outcome {
            LevelOutcome::Succeeded if ctx.run.level >= LEVELS_TO_PLAY => break,
            LevelOutcome::Succeeded => input.next_level = true,
            LevelOutcome::Failed => input.restart = true,
        }
    }

    log::info!(
        "Finished at level {} after {} ticks ({} coins, {} lives, {} scene nodes)",
        ctx.run.level,
        ctx.time_ticks,
        ctx.run.coins_collected,
        ctx.run.lives_collected,
        scene.nodes
    );
    sync.clear(&mut scene);
    Ok(())
}

/// Scene that only counts what a renderer would hold
#[derive(Default)]
struct NullScene {
    nodes: usize,
}

impl Scene for NullScene {
    fn add(&mut self, _node: &RenderNode) {
        self.nodes += 1;
    }

    fn remove(&mut self, _key: NodeKey) {
        self.nodes = self.nodes.saturating_sub(1);
    }

    fn set_transform(&mut self, _node: &RenderNode) {}
}
