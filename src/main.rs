//! Astro Dodge - headless runner
//!
//! Plays one session with a scripted pointer path and prints the final
//! snapshot as JSON.
//!
//! Usage: `astro-dodge [--seed N] [--seconds S] [--config PATH]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use astro_dodge::consts::SIM_DT_MS;
#[cfg(not(target_arch = "wasm32"))]
use astro_dodge::sim::{Field, GameEvent};
#[cfg(not(target_arch = "wasm32"))]
use astro_dodge::{Config, ConfigError, Driver};

#[cfg(not(target_arch = "wasm32"))]
const FIELD_WIDTH: f32 = 1280.0;
#[cfg(not(target_arch = "wasm32"))]
const FIELD_HEIGHT: f32 = 720.0;

#[cfg(not(target_arch = "wasm32"))]
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "astro-dodge")]
#[command(about = "Play one scripted Astro Dodge session and print the final snapshot")]
struct Args {
    /// RNG seed for the session
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulated seconds to run unless the ship crashes first
    #[arg(long, default_value_t = 60.0, value_parser = parse_seconds)]
    seconds: f64,
    /// JSON tuning file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_seconds(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(secs),
        _ => Err(format!("expected a positive number of seconds, got `{raw}`")),
    }
}

/// Pointer position for the scripted path at `t_secs`
#[cfg(not(target_arch = "wasm32"))]
fn scripted_pointer(t_secs: f32) -> (f32, f32) {
    (
        FIELD_WIDTH / 2.0 + (t_secs * 0.7).cos() * FIELD_WIDTH * 0.35,
        FIELD_HEIGHT / 2.0 + (t_secs * 1.3).sin() * FIELD_HEIGHT * 0.3,
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut driver = Driver::new(args.seed, config, Field::new(FIELD_WIDTH, FIELD_HEIGHT));
    driver.start();
    driver.frame(0.0);
    driver.begin();

    let target_ms = args.seconds * 1000.0;
    // Frames are paced at 60 Hz; the cap covers pauses that never resume
    let max_frames = (target_ms / SIM_DT_MS).ceil() as u64 + 2;
    for frame in 1..=max_frames {
        let host_ms = frame as f64 * SIM_DT_MS;
        let (x, y) = scripted_pointer((host_ms / 1000.0) as f32);
        driver.pointer_move(x, y);
        driver.frame(host_ms);

        for event in driver.frame_events() {
            match event {
                GameEvent::ObstacleSpawned { .. } | GameEvent::CollectibleSpawned { .. } => {
                    log::debug!("{event:?}")
                }
                _ => log::info!("{event:?}"),
            }
        }

        let state = driver.state();
        if state.is_game_over() || state.survival_ms() >= target_ms {
            break;
        }
    }

    let status = driver.state().status();
    log::info!(
        "Finished: score {} over {} ({})",
        status.score,
        status.survival_time,
        if status.game_over { "crashed" } else { "survived" }
    );
    println!("{}", serde_json::to_string_pretty(&driver.snapshot())?);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Astro Dodge (headless) starting...");

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `Driver` directly
}
