//! Actor Console Server
//!
//! Entry point for the web console and the one-shot CLI commands.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use actor_console::{
    commands,
    config::{AppConfig, Cli, Command},
    server, telemetry,
};
use clap::Parser;
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before clap reads env-backed arguments
    let _ = dotenv();

    telemetry::init();

    let cli = Cli::parse();
    let config = Arc::new(AppConfig::from_cli(&cli)?);

    match cli.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => server::start_server(config).await,
        Command::Run {
            actor,
            input,
            input_file,
        } => {
            let succeeded =
                commands::run_actor(&config, &actor, input.as_deref(), input_file.as_deref())
                    .await?;
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Actors { query, limit } => {
            commands::list_actors(&config, query.as_deref(), limit);
            Ok(())
        }
    }
}
