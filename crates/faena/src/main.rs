// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Faena - WhatsApp ordering bot for the butcher shop.
//!
//! Binary entry point: loads configuration, then serves the bot or
//! seeds the database with the starter catalog and schedule.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod seed;
mod serve;

use clap::{Parser, Subcommand};

/// Faena - WhatsApp ordering bot for the butcher shop.
#[derive(Parser, Debug)]
#[command(name = "faena", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook gateway and conversation engine.
    Serve,
    /// Write the starter catalog, schedule, and bot settings.
    Seed,
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("faena={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match faena_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            faena_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.shop.log_level);

    let result = match cli.command {
        Some(Commands::Serve) | None => serve::run(config).await,
        Some(Commands::Seed) => seed::run(config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "faena exited with an error");
        std::process::exit(1);
    }
}
