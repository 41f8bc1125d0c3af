// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Tracebench CLI
//!
//! Command-line interface for the tracebench comparison harness.

use clap::{Parser, Subcommand};

mod commands;
mod render;

/// Tracebench - cross-language eBPF tracing benchmark harness
#[derive(Parser)]
#[command(name = "tracebench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full comparison batch from a suite configuration
    Run {
        /// Suite configuration file path
        #[arg(short, long, default_value = "tracebench.yaml")]
        config: String,

        /// Override the configured collection duration (seconds)
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Run the built-in synthetic implementation and write a result file
    Drive {
        /// Collection duration in seconds
        #[arg(short, long, default_value_t = 10)]
        duration: u64,

        /// Output JSON file for the result record
        #[arg(short, long, default_value = "synthetic_result.json")]
        output: String,

        /// Implementation name recorded in the result
        #[arg(long, default_value = "rust-synthetic")]
        name: String,

        /// Events fabricated per collection tick
        #[arg(short, long, default_value_t = 100)]
        rate: usize,

        /// Event buffer capacity
        #[arg(long, default_value_t = 1_000_000)]
        capacity: usize,
    },

    /// Aggregate result files from a directory into a comparison report
    Report {
        /// Directory containing per-implementation result files
        #[arg(short, long, default_value = "benchmarks/results")]
        results_dir: String,

        /// Write a markdown report to this path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a suite configuration file
    Validate {
        /// Path to the configuration file
        file: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Run { config, duration } => commands::run::execute(&config, duration).await,
        Commands::Drive {
            duration,
            output,
            name,
            rate,
            capacity,
        } => commands::drive::execute(duration, &output, &name, rate, capacity).await,
        Commands::Report {
            results_dir,
            output,
        } => commands::report::execute(&results_dir, output.as_deref()).await,
        Commands::Validate { file } => commands::validate::execute(&file).await,
    }
}
