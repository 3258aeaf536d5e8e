use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use fleet_ledger::config::Cli;
use fleet_ledger::{gateway, Fleet, Session};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    info!(version = fleet_ledger::VERSION, snapshot = %cli.snapshot.display(), "starting fleet");

    // keep JSON on stdout parseable
    let mut notices: Box<dyn Write> = if cli.json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };

    let fleet = match gateway::startup(cli.import.as_deref(), &cli.snapshot, &mut notices) {
        Ok(fleet) => fleet,
        Err(e) if e.is_fatal() => {
            return Err(e).with_context(|| match &cli.import {
                Some(path) => format!("Failed to import {}", path.display()),
                None => "Failed to load fleet".to_string(),
            });
        }
        Err(e) => {
            warn!(error = %e, "starting with an empty fleet");
            Fleet::new()
        }
    };

    if cli.print {
        run_print(&fleet, cli.json)
    } else if cli.view {
        run_view(&fleet)
    } else {
        run_session(fleet, &cli)
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // stderr keeps the interactive prompts on stdout readable
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run_print(fleet: &Fleet, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(&fleet.summary()).context("Failed to encode fleet")?;
        println!("{}", out);
    } else {
        println!("Fleet report:");
        for line in fleet.report() {
            println!("    {}", line);
        }
    }
    Ok(())
}

fn run_session(fleet: Fleet, cli: &Cli) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();

    let session = Session::new(fleet, &cli.snapshot, stdin.lock(), stdout.lock());
    let fleet = session.run()?;

    info!(boats = fleet.len(), "session finished");
    Ok(())
}

#[cfg(feature = "tui")]
fn run_view(fleet: &Fleet) -> Result<()> {
    let mut app = fleet_ledger::ui::App::new(fleet);
    fleet_ledger::ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_view(_fleet: &Fleet) -> Result<()> {
    anyhow::bail!("TUI viewer not available, rebuild with: cargo build --features tui")
}
