//! cloudinfra - CLI for the Infinity Portal gateway.
//!
//! This is a thin wrapper over the `cloudinfra` library: it resolves and
//! exports credential profiles and can exercise the gateway directly.

mod cli;
mod commands;
mod output;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The guard must outlive the command so buffered file logs get flushed.
    let _guard = init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Export(args) => commands::export::run(args),
        Commands::List(args) => commands::list::run(args),
        Commands::Users(args) => commands::users::run(args).await,
    }
}

fn init_logging(verbosity: u8, json: bool) -> Option<WorkerGuard> {
    let directive = match verbosity {
        0 => std::env::var("LOGLEVEL")
            .map(|level| normalize_level(&level))
            .unwrap_or_else(|_| "warn".to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Ok(logfile) = std::env::var("CLOUDINFRA_LOGFILE") {
        let path = Path::new(&logfile);
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "cloudinfra.log".into());
        let _ = std::fs::create_dir_all(directory);

        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .init();
        return Some(guard);
    }

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
    None
}

/// Accept python-logging style level names in LOGLEVEL.
fn normalize_level(level: &str) -> String {
    match level.to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    }
}
