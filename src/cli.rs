use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Rotating Rubik's cube that scrambles and solves itself in the terminal
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Target frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Mouse orbit camera control
    #[arg(long, value_enum, default_value_t = OrbitMode::Auto)]
    pub orbit: OrbitMode,

    /// Start with the debug overlay visible
    #[arg(short, long)]
    pub debug: bool,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Exit after rendering this many frames
    #[arg(long)]
    pub frames: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrbitMode {
    /// Enable orbit when the terminal reports mouse input
    Auto,
    On,
    Off,
}

impl OrbitMode {
    /// Decides once whether orbit control is enabled
    pub fn resolve(self) -> bool {
        self.resolve_for(std::env::var("TERM").ok().as_deref())
    }

    fn resolve_for(self, term: Option<&str>) -> bool {
        match self {
            OrbitMode::On => true,
            OrbitMode::Off => false,
            OrbitMode::Auto => has_pointer(term),
        }
    }
}

/// Whether a terminal of type `term` can report mouse drags.
///
/// The Linux virtual console and dumb terminals cannot.
fn has_pointer(term: Option<&str>) -> bool {
    match term {
        None | Some("") | Some("dumb") | Some("linux") => false,
        Some(_) => true,
    }
}
