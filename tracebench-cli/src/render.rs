// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Text and markdown rendering for comparison reports.

use std::fmt::Write;

use tracebench_core::{ComparisonEntry, ComparisonReport};

/// Render the comparison as a fixed-width text table with a
/// normalized-throughput bar per implementation.
pub fn comparison_table(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let rule = "-".repeat(78);

    writeln!(out, "{}", rule).unwrap();
    writeln!(
        out,
        "{:<16} {:<10} {:>16} {:>10} {:>10}  {}",
        "Implementation", "Language", "Throughput", "Events", "Ratio", "Tier"
    )
    .unwrap();
    writeln!(out, "{}", rule).unwrap();

    for entry in report.ranked() {
        let record = &entry.record;
        writeln!(
            out,
            "{:<16} {:<10} {:>11.0} ev/s {:>10} {:>9.1}%  {}",
            record.name,
            record.language,
            record.throughput,
            record.event_count,
            entry.ratio_to_baseline * 100.0,
            entry.tier,
        )
        .unwrap();
    }
    writeln!(out, "{}", rule).unwrap();

    if report.baseline.is_some() {
        writeln!(out).unwrap();
        writeln!(out, "Relative performance (normalized to fastest):").unwrap();
        for entry in report.ranked() {
            writeln!(out, "{}", bar_line(entry)).unwrap();
        }
    }

    for entry in &report.entries {
        for error in &entry.record.errors {
            writeln!(out).unwrap();
            writeln!(out, "⚠ {}: {}", entry.record.name, error).unwrap();
        }
    }

    out
}

fn bar_line(entry: &ComparisonEntry) -> String {
    let percent = entry.ratio_to_baseline * 100.0;
    let bar = "█".repeat((percent / 5.0) as usize);
    format!("{:<16} {:>6.1}% {}", entry.record.name, percent, bar)
}

/// Render the comparison as a markdown document.
pub fn markdown_report(report: &ComparisonReport) -> String {
    let mut out = String::new();

    writeln!(out, "# Tracing Benchmark Comparison").unwrap();
    writeln!(out).unwrap();
    match &report.baseline {
        Some(name) => writeln!(out, "Baseline: **{}**", name).unwrap(),
        None => writeln!(out, "Baseline: none (all implementations failed)").unwrap(),
    }
    writeln!(out).unwrap();
    writeln!(
        out,
        "| Rank | Implementation | Language | Throughput (ev/s) | Events | Dropped | Ratio | Tier |"
    )
    .unwrap();
    writeln!(out, "|------|----------------|----------|-------------------|--------|---------|-------|------|")
        .unwrap();

    for entry in report.ranked() {
        let record = &entry.record;
        writeln!(
            out,
            "| {} | {} | {} | {:.0} | {} | {} | {:.3} | {} |",
            entry.rank,
            record.name,
            record.language,
            record.throughput,
            record.event_count,
            record.dropped_count,
            entry.ratio_to_baseline,
            entry.tier,
        )
        .unwrap();
    }

    let failures: Vec<&ComparisonEntry> = report
        .entries
        .iter()
        .filter(|entry| !entry.record.errors.is_empty())
        .collect();
    if !failures.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "## Failures").unwrap();
        writeln!(out).unwrap();
        for entry in failures {
            for error in &entry.record.errors {
                writeln!(out, "- **{}**: {}", entry.record.name, error).unwrap();
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracebench_core::{LatencyStats, ResultRecord};

    fn record(name: &str, event_count: u64, throughput: f64) -> ResultRecord {
        ResultRecord {
            name: name.to_string(),
            language: "C".to_string(),
            program_type: "tracepoint".to_string(),
            data_mechanism: "ring_buffer".to_string(),
            duration_seconds: 10.0,
            event_count,
            dropped_count: 0,
            throughput,
            latency_stats: LatencyStats::default(),
            memory_bytes: 0,
            start_time: chrono::Utc::now(),
            end_time: chrono::Utc::now(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_table_lists_every_entry() {
        let report = ComparisonReport::from_records(vec![
            record("c-libbpf", 1_000, 100.0),
            ResultRecord::failure("go-ebpf", "Go", "tracepoint", "ring_buffer", "timed out"),
        ]);
        let table = comparison_table(&report);
        assert!(table.contains("c-libbpf"));
        assert!(table.contains("go-ebpf"));
        assert!(table.contains("implementation failed: timed out"));
        assert!(table.contains("100.0%"));
    }

    #[test]
    fn test_markdown_contains_ranked_rows() {
        let report = ComparisonReport::from_records(vec![
            record("slow", 10, 50.0),
            record("fast", 10, 200.0),
        ]);
        let markdown = markdown_report(&report);
        assert!(markdown.contains("Baseline: **fast**"));
        let fast_pos = markdown.find("| 1 | fast").unwrap();
        let slow_pos = markdown.find("| 2 | slow").unwrap();
        assert!(fast_pos < slow_pos);
    }
}
