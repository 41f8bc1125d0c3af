// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `tracebench report` command - Re-aggregate result files from disk.
//!
//! Scans a results directory for per-implementation `*_result.json`
//! files, derives the comparison report, prints it, and optionally
//! writes a markdown document.

use std::path::{Path, PathBuf};

use tracebench_core::{ComparisonReport, ResultRecord};

use crate::render;

pub async fn execute(
    results_dir: &str,
    markdown_output: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = Path::new(results_dir);
    let files = result_files(dir)?;

    if files.is_empty() {
        eprintln!("No result files found in {}", dir.display());
        std::process::exit(1);
    }

    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        match ResultRecord::load(path) {
            Ok(record) => {
                println!("✓ Loaded {} from {}", record.name, path.display());
                records.push(record);
            }
            Err(e) => {
                // A malformed file stays visible as a failed entry
                tracing::warn!(path = %path.display(), error = %e, "Could not load result file");
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown")
                    .trim_end_matches("_result")
                    .to_string();
                records.push(ResultRecord::failure(
                    name,
                    "unknown",
                    "unknown",
                    "unknown",
                    &e.to_string(),
                ));
            }
        }
    }

    let report = ComparisonReport::from_records(records);
    println!("{}", render::comparison_table(&report));

    if let Some(output) = markdown_output {
        let markdown = render::markdown_report(&report);
        std::fs::write(output, markdown)?;
        println!("Markdown report written to: {}", output);
    }

    Ok(())
}

/// Per-implementation result files, sorted for deterministic input order.
/// Merged documents (`latest.json`, `comparison_*.json`) are skipped.
fn result_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if name.ends_with("_result.json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
