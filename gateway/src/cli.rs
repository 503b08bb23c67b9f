use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Path to the config file. Values here are overridden by
    /// `DIG_GATEWAY__*` environment variables (see config::Config).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging, overriding `telemetry.level`.
    #[arg(short, long)]
    pub verbose: bool,
}
