mod animator;
mod cli;
mod clock;
mod geometry;
mod graphics;
mod math;
mod moves;
mod scene;
mod state;
mod vertex;
mod widget;

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::Path;

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_logging(args.log_file.as_deref())?;

    // Pointer capability is decided once, before the first frame
    let orbit_enabled = args.orbit.resolve();
    log::info!("orbit mode {:?} resolved to {orbit_enabled}", args.orbit);

    widget::run(&args, orbit_enabled)
}
