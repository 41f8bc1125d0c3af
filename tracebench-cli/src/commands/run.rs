// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `tracebench run` command - Execute the full comparison batch.
//!
//! Loads the suite configuration, runs every implementation sequentially
//! with ctrl-c wired to the cancellation token, prints the comparison
//! table, and exits non-zero only if every implementation failed.

use tokio_util::sync::CancellationToken;

use tracebench_core::{ConfigLoader, Orchestrator, RunDuration};

use crate::render;

pub async fn execute(
    config_path: &str,
    duration_override: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(config = %config_path, "Loading suite configuration");

    // Load and validate configuration - fail fast on invalid config
    let mut config = ConfigLoader::load_file(config_path)?;
    if let Some(secs) = duration_override {
        config.duration = RunDuration::new(secs)?;
    }

    println!("Tracebench Comparison Suite");
    println!("===========================");
    println!("Duration per implementation: {}", config.duration);
    println!("Output directory: {}", config.output_dir.display());
    println!("Implementations: {}", config.implementations.len());
    println!();

    // Wire the operator interrupt to the cancellation token
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finalizing batch");
            signal_token.cancel();
        }
    });

    let orchestrator = Orchestrator::new(config);
    let document = orchestrator.run_batch(cancel).await?;

    println!("{}", render::comparison_table(&document.comparison));
    println!(
        "Total: {} | Successful: {} | Failed: {}",
        document.summary.total, document.summary.successful, document.summary.failed
    );

    if document.summary.all_failed() {
        eprintln!("✗ All implementations failed");
        std::process::exit(1);
    }

    Ok(())
}
