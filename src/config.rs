use clap::Parser;
use std::path::PathBuf;

use crate::db::DEFAULT_SNAPSHOT;

/// Track a fleet of boats: purchase cost, running expenses, saved between sessions
#[derive(Parser, Debug, Clone)]
#[command(name = "fleet", version = crate::VERSION)]
#[command(about = "Fleet Management System", long_about = None)]
pub struct Cli {
    /// CSV file to seed the fleet from (replaces the saved snapshot)
    #[arg(value_name = "IMPORT_CSV")]
    pub import: Option<PathBuf>,

    #[arg(
        long,
        env = "FLEET_SNAPSHOT",
        value_name = "PATH",
        default_value = DEFAULT_SNAPSHOT
    )]
    pub snapshot: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "FLEET_LOG_LEVEL", value_name = "FILTER", default_value = "warn")]
    pub log_level: String,

    /// Print the fleet report and exit
    #[arg(long, conflicts_with = "view")]
    pub print: bool,

    /// With --print, emit JSON instead of the text report
    #[arg(long, requires = "print")]
    pub json: bool,

    /// Open the fleet table viewer
    #[arg(long)]
    pub view: bool,
}
