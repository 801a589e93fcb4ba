//! Innkeeper - a command-line back office for hotel staff.
//!
//! Sign in once, then list and edit rooms, customers, employees and
//! reservations, or print the dashboard.

mod commands;
mod output;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use innkeeper_core::{AppContext, Config, Route};

#[derive(Parser, Debug)]
#[command(name = "innkeeper", version, about = "Hotel back office from the command line")]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// API base URL (overrides config and INNKEEPER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and start a session
    Login {
        #[arg(long, short, env = "INNKEEPER_USERNAME")]
        username: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show whether a session is active and when it expires
    Status,
    /// Room rankings, current stays and staff on shift
    Dashboard,
    /// List every item of a collection
    List { resource: ResourceKind },
    /// Create an item from a JSON body
    Create {
        resource: ResourceKind,
        #[arg(long)]
        data: String,
    },
    /// Update an item from a JSON body that includes its "id"
    Update {
        resource: ResourceKind,
        #[arg(long)]
        data: String,
    },
    /// Delete an item by id
    Delete { resource: ResourceKind, id: String },
    /// Ids and names of rooms or customers, for filling in a reservation
    Lookup { kind: LookupKind },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LookupKind {
    Rooms,
    Customers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Rooms,
    Customers,
    Employees,
    Reservations,
}

impl ResourceKind {
    pub fn route(&self) -> Route {
        match self {
            ResourceKind::Rooms => Route::Rooms,
            ResourceKind::Customers => Route::Customers,
            ResourceKind::Employees => Route::Employees,
            ResourceKind::Reservations => Route::Reservations,
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing(log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Log file path has no file name"))?;
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.log_file.as_ref())?;

    let mut config = Config::load().context("Fix or remove the config file to continue")?;
    config.api_url_override = cli.api_url;

    let ctx = AppContext::new(config)?;
    info!(command = ?cli.command, "innkeeper starting");

    match cli.command {
        Command::Login { username } => commands::login(&ctx, username).await,
        Command::Logout => commands::logout(&ctx),
        Command::Status => commands::status(&ctx),
        Command::Dashboard => commands::dashboard(&ctx).await,
        Command::List { resource } => commands::list(&ctx, resource).await,
        Command::Create { resource, data } => commands::create(&ctx, resource, &data).await,
        Command::Update { resource, data } => commands::update(&ctx, resource, &data).await,
        Command::Delete { resource, id } => commands::delete(&ctx, resource, &id).await,
        Command::Lookup { kind } => commands::lookup(&ctx, kind).await,
    }
}
