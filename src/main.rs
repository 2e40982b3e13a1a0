use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

mod cli;
mod constants;
mod duration;
mod engine;
mod error;
mod media;
mod notice;
mod scheduler;
mod screen;
mod state;
mod texture_loader;
mod video;

use crate::cli::Args;
use crate::engine::{Engine, Presenter};
use crate::error::SlideshowError;
use crate::screen::{Input, Screen};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // --- Prepare and list the media folder ---
    let root = args.media_root().unwrap_or_else(|| {
        warn!("No home directory, using the current directory as media root");
        PathBuf::from(".")
    });
    let (mut media, notices) = media::initialize(&root);
    if args.shuffle {
        media::shuffle(&mut media);
    }
    if !media.iter().any(|item| item.kind.is_playable()) {
        warn!("{}", SlideshowError::NoMediaAvailable);
    }

    let screen = Screen::open(&args)?;
    let mut engine = Engine::new(media, screen);
    for notice in &notices {
        engine.presenter_mut().notify(notice);
    }

    // --- Main Loop ---
    while !engine.presenter().should_close() {
        let dt = engine.presenter().frame_time();

        match engine.presenter_mut().handle_input() {
            Some(Input::Play) => engine.play(),
            Some(Input::Stop) => engine.stop(),
            Some(Input::SurfaceTapped) => engine.surface_tapped(),
            None => {}
        }

        engine.presenter_mut().update(dt);
        engine.tick(Duration::from_secs_f32(dt.max(0.0)));
        let status = engine.state().status_line();
        engine.presenter_mut().draw(&status);
    }

    info!("Closed at {}", engine.state().status_line());
    Ok(())
}
