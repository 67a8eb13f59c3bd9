//! # Vedaa Counter
//!
//! Command line front end for the shop counter: price quotes, GST invoices,
//! catalogue maintenance and pricing preferences.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Counter CLI                                    │
//! │                                                                         │
//! │  argv ───► cli::parse ───► Counter ───► vedaa-db (SQLite)              │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                          vedaa-core                                     │
//! │                   (pricing, invoice, render)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`); command output goes to stdout.

mod cli;
mod commands;
mod config;
mod error;

use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vedaa_db::{Database, DbConfig};

use crate::cli::{Cli, Command, USAGE};
use crate::commands::Counter;
use crate::config::CounterConfig;
use crate::error::CounterResult;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: &[String]) -> CounterResult<()> {
    let Cli { db_path, command } = cli::parse(args)?;

    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut config = CounterConfig::from_env()?;
    if let Some(path) = db_path {
        config.db_path = path;
    }

    let db = Database::new(DbConfig::new(&config.db_path)).await?;
    info!(path = %config.db_path.display(), "Database opened");

    let counter = Counter::new(db, config);
    let result = execute(&counter, &command).await;
    counter.database().close().await;

    println!("{}", result?);
    Ok(())
}

async fn execute(counter: &Counter, command: &Command) -> CounterResult<String> {
    match command {
        Command::Quote(args) => counter.quote(args).await,
        Command::Invoice(args) => {
            let issued = counter.invoice(args).await?;
            let mut out = issued.document.to_text();
            if let Some(path) = &issued.html_path {
                out.push_str(&format!("\n\nPrintable invoice written to {}", path.display()));
            }
            Ok(out)
        }
        Command::Items(items) => counter.items(items).await,
        Command::Settings(settings) => counter.settings(settings).await,
        Command::Help => Ok(USAGE.to_string()),
    }
}
