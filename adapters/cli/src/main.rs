#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Dynamo maze game.

mod driver;

use anyhow::Result;
use clap::Parser;
use dynamo_core::CANVAS;
use dynamo_rendering::{Palette, Presentation, RenderingBackend};
use dynamo_rendering_macroquad::MacroquadBackend;
use dynamo_world::{Config, DEFAULT_TRANSITION_TICKS};
use log::info;

use crate::driver::Session;

/// Find the way out of ever smaller mazes by torchlight.
#[derive(Debug, Parser)]
#[command(name = "dynamo", version, about, long_about = None)]
struct CliArgs {
    /// Seed for the maze generator; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Size of one logical pixel on screen.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    scale: u32,

    /// Length of the title transition in ticks.
    #[arg(long, default_value_t = DEFAULT_TRANSITION_TICKS)]
    transition_ticks: u32,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    vsync: Option<bool>,

    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Dynamo command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = CliArgs::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("dynamo starting with seed {seed}");

    let mut session = Session::new(Config::new(seed, args.transition_ticks));
    let presentation = Presentation::new("Dynamo", Palette::NOKIA, CANVAS, args.scale);

    let mut backend = MacroquadBackend::new().with_show_fps(args.show_fps);
    if let Some(vsync) = args.vsync {
        backend = backend.with_vsync(vsync);
    }

    backend.run(presentation, move |dt, input, canvas| {
        let control = session.advance(dt, input)?;
        session.scene().draw(canvas);
        Ok(control)
    })?;

    info!("dynamo exiting");
    Ok(())
}
