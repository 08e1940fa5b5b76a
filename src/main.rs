//! Plinko Sim entry point
//!
//! Headless runner: builds a world, optionally applies a scripted board,
//! steps it at 60 Hz and prints the capture statistics.
//!
//! Usage: `plinko-sim [settings.json] [frames] [commands.json]`

#[cfg(not(target_arch = "wasm32"))]
use plinko_sim::{Command, Settings, World, apply_command, step};

#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u32 = 60 * 60;
/// Frames between progress log lines
#[cfg(not(target_arch = "wasm32"))]
const LOG_INTERVAL: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Plinko Sim (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();

    let settings = match args.first() {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(json) => Settings::load_or_default(&json),
            Err(e) => {
                log::warn!("Could not read settings file {}: {}", path, e);
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    let frames = match args.get(1) {
        Some(raw) => raw.parse::<u32>().unwrap_or_else(|e| {
            log::warn!("Invalid frame count {:?} ({}), using {}", raw, e, DEFAULT_FRAMES);
            DEFAULT_FRAMES
        }),
        None => DEFAULT_FRAMES,
    };

    let mut world = World::new(settings);

    if let Some(path) = args.get(2) {
        for command in load_commands(path) {
            apply_command(&mut world, command);
        }
        log::info!(
            "Board ready: {} pegs, {} levers",
            world.pegs().len(),
            world.levers().len()
        );
    }

    for frame in 1..=frames {
        step(&mut world, FRAME_DT);
        if frame % LOG_INTERVAL == 0 {
            log::info!(
                "t={:.0}s live={} captured={} score={}",
                frame as f32 * FRAME_DT,
                world.particles().len(),
                world.total_captured(),
                world.score()
            );
        }
    }

    println!("{}", world.metrics());
    println!("Lifetime captures: {}", world.total_captured());
}

/// Read a JSON array of commands; a bad file yields no commands
#[cfg(not(target_arch = "wasm32"))]
fn load_commands(path: &str) -> Vec<Command> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read commands file {}: {}", path, e);
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<Command>>(&json) {
        Ok(commands) => {
            log::info!("Loaded {} commands from {}", commands.len(), path);
            commands
        }
        Err(e) => {
            log::warn!("Invalid commands JSON ({}), ignoring", e);
            Vec::new()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; the host page drives `step` directly
}
