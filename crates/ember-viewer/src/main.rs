//! Ember Viewer - a spinning lit cube whose shader constants all flow
//! through runtime-declared uniform layouts

mod app;
mod scene;

use clap::Parser;

/// Spinning-cube demo for the Ember uniform layout engine
#[derive(Parser)]
#[command(name = "ember-viewer")]
pub struct Args {
    /// Window or image width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Window or image height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Render offscreen and save a PNG to this path instead of opening a window
    #[arg(long)]
    pub screenshot: Option<String>,

    /// Number of frames to advance before a screenshot is taken
    #[arg(long, default_value_t = 1)]
    pub frames: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.screenshot.clone() {
        Some(output) => app::run_headless(&args, &output),
        None => app::run_windowed(&args),
    }
}
