// Fleet Ledger - Core Library
// Exposes the ledger, persistence and session loop for the CLI and tests

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod fleet;
pub mod gateway;
pub mod parser;
pub mod session;

// Only compile the viewer when the TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use db::{load_or_empty, load_snapshot, save_snapshot, SnapshotMeta, DEFAULT_SNAPSHOT};
pub use entities::{BoatRecord, BoatType};
pub use error::{FleetError, Result};
pub use fleet::{Fleet, FleetSummary};
pub use gateway::{save_or_report, startup};
pub use parser::{import_fleet, parse_boat_line, read_fleet};
pub use session::{Command, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
