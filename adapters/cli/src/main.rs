#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a Space Shooter session.
//!
//! Without flags a window opens through the macroquad backend. `--headless`
//! runs the simulation on a manual clock instead and prints the final
//! [`space_shooter_core::GameState`] as JSON on stdout; logs always go to
//! stderr so the JSON stays machine-readable.

mod args;
mod headless;
mod session;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use space_shooter_core::ManualClock;
use space_shooter_engine::{EngineConfig, GameEngine};
use space_shooter_rendering::{Color, Presentation, RenderingBackend};
use space_shooter_rendering_macroquad::MacroquadBackend;
use space_shooter_system_optimizer::GameOptimizer;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use self::{args::Args, session::Session};

const WINDOW_TITLE: &str = "Space Shooter";
const CLEAR_COLOR: Color = Color::from_hex(0x000014);

/// Entry point for the Space Shooter command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level);

    let config = args.engine_config()?;
    if args.headless {
        run_headless(&args, config)
    } else {
        run_windowed(&args, config)
    }
}

fn init_logging(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_engine(args: &Args, config: EngineConfig) -> Result<GameEngine> {
    let engine = GameEngine::new(config, args.width, args.height)
        .context("failed to create game engine")?;
    Ok(match args.quality {
        Some(quality) => engine.with_optimizer(GameOptimizer::fixed(quality.into())),
        None => engine,
    })
}

fn run_headless(args: &Args, config: EngineConfig) -> Result<()> {
    let clock = ManualClock::starting_at(0);
    let mut engine = build_engine(args, config)?.with_clock(clock.clone());

    let state = headless::simulate(&mut engine, &clock, args.frames);
    tracing::info!(
        score = state.score,
        level = state.level,
        lives = state.lives,
        "headless simulation finished"
    );

    let json =
        serde_json::to_string_pretty(&state).context("failed to serialize final game state")?;
    println!("{json}");
    Ok(())
}

fn run_windowed(args: &Args, config: EngineConfig) -> Result<()> {
    let engine = build_engine(args, config)?;
    let canvas_size = Vec2::new(args.width, args.height);
    let mut session = Session::new(engine, canvas_size);

    let presentation = Presentation::new(WINDOW_TITLE, canvas_size, CLEAR_COLOR)
        .with_fps_overlay(args.show_fps);
    let mut backend = MacroquadBackend::new()
        .with_sprite_manifest(args.sprites.clone())
        .with_sprite_loading(!args.no_sprites);
    if let Some(vsync) = args.vsync() {
        backend = backend.with_vsync(vsync);
    }

    backend.run(presentation, move |_frame_dt, input, canvas| {
        let flow = session.step(&input);
        session.render(canvas);
        flow
    })
}
