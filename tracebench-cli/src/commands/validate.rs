// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `tracebench validate` command - Validate a suite configuration file.

use tracebench_core::ConfigLoader;

pub async fn execute(file: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(file = %file, "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Suite Settings:");
            println!("  Duration:         {}", config.duration);
            println!("  Grace Period:     {}s", config.grace_period_seconds);
            println!("  Output Directory: {}", config.output_dir.display());
            println!();
            println!("Implementations ({}):", config.implementations.len());
            for spec in &config.implementations {
                println!(
                    "  - {} ({}, {}, {})",
                    spec.name, spec.language, spec.program_type, spec.data_mechanism
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
