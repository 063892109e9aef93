// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Insight - natural-language analytics over a fixed sales schema.
//!
//! This is the binary entry point for the Insight service.

mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Insight - ask questions about sales data in plain language.
#[derive(Parser, Debug)]
#[command(name = "insight", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Insight HTTP gateway.
    Serve,
    /// Clear and repopulate the analytics database with demo data.
    Seed {
        /// RNG seed for the generated dataset.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match insight_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            insight_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Serve) | None => serve::run(config).await,
        Some(Commands::Seed { seed }) => serve::seed(config, seed).await,
    };

    if let Err(error) = result {
        tracing::error!(%error, "insight exited with an error");
        eprintln!("insight: {error}");
        std::process::exit(1);
    }
}
