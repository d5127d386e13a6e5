//! Fruit Catcher entry point
//!
//! Sets up logging and the terminal, then runs the fixed-rate frame loop.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use fruit_catcher::assets::AssetCatalog;
use fruit_catcher::platform::{FramePacer, InputCollector};
use fruit_catcher::renderer::TerminalRenderer;
use fruit_catcher::sim::{GameEvent, GameState, Scene, tick};
use fruit_catcher::{GameError, Tuning};

/// Log to a file when `FRUIT_CATCHER_LOG` is set; stderr would corrupt the screen
fn init_logging() {
    use env_logger::{Builder, Env, Target};

    match env::var_os("FRUIT_CATCHER_LOG").map(File::create) {
        Some(Ok(file)) => {
            Builder::from_env(Env::default().default_filter_or("info"))
                .target(Target::Pipe(Box::new(file)))
                .init();
        }
        Some(Err(e)) => {
            eprintln!("Could not open log file: {}", e);
            Builder::from_env(Env::default().default_filter_or("off")).init();
        }
        None => {
            Builder::from_env(Env::default().default_filter_or("off")).init();
        }
    }
}

fn run<W: Write>(renderer: &mut TerminalRenderer<W>, state: &mut GameState, rng: &mut Pcg32) -> Result<(), GameError> {
    let mut input = InputCollector::new(renderer.keyboard_enhanced());
    let mut pacer = FramePacer::new(state.tuning.frame_ms());

    log::info!(
        "Starting game loop ({:.3}ms)",
        pacer.frame_duration().as_secs_f32() * 1000.0
    );

    while state.running {
        let dt_ms = pacer.wait();

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                input.handle_key(key);
            }
        }

        for event in tick(state, &input.take_input(), dt_ms, rng) {
            if let GameEvent::GameOver { score } = event {
                log::info!("Run ended after {} ticks with score {}", state.time_ticks, score);
            }
        }
        if !state.running {
            break;
        }

        renderer.render(&Scene::build(state))?;
    }

    log::info!("Exiting ({} late frames)", pacer.late_frames());
    Ok(())
}

fn main() -> Result<(), GameError> {
    init_logging();
    log::info!("Fruit Catcher starting...");

    let tuning_path = env::var_os("FRUIT_CATCHER_TUNING").map(PathBuf::from);
    let tuning = Tuning::load_or_default(tuning_path.as_deref());

    let asset_dir = env::var_os("FRUIT_CATCHER_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("images"));
    let assets = AssetCatalog::discover(&asset_dir);

    let seed = env::var("FRUIT_CATCHER_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random::<u64>);
    log::info!("Game initialized with seed: {}", seed);
    let mut rng = Pcg32::seed_from_u64(seed);

    let mut state = GameState::new(tuning, assets);
    let mut renderer = TerminalRenderer::new(BufWriter::new(io::stdout()));

    // Always restore the terminal, even if the loop failed
    let result = renderer
        .init()
        .map_err(GameError::from)
        .and_then(|()| run(&mut renderer, &mut state, &mut rng));
    let restored = renderer.cleanup();

    result?;
    restored?;
    Ok(())
}
