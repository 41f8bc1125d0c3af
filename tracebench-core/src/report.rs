// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Comparison report derivation.
//!
//! Pure transform from a set of result records to a ranked comparison.
//! Failed records stay visible in the output; they are simply never
//! eligible to be the baseline.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::record::ResultRecord;

/// Ratio at or above which a record is considered in the leading tier.
pub const TIER_LEADING_RATIO: f64 = 0.75;
/// Ratio at or above which a record is considered competitive.
pub const TIER_COMPETITIVE_RATIO: f64 = 0.25;

/// Coarse classification of a record relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    /// Within 75% of the baseline throughput.
    Leading,
    /// Within 25% of the baseline throughput.
    Competitive,
    /// Produced events, but far behind the baseline.
    Trailing,
    /// Produced no events (failed or empty run).
    Failed,
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PerformanceTier::Leading => "leading",
            PerformanceTier::Competitive => "competitive",
            PerformanceTier::Trailing => "trailing",
            PerformanceTier::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// One record with its derived comparison fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub record: ResultRecord,
    /// `throughput / baseline.throughput`; exactly 1 for the baseline,
    /// 0 for failed records.
    pub ratio_to_baseline: f64,
    /// 1-based position when ordered by throughput, descending. Ties keep
    /// input order.
    pub rank: usize,
    pub tier: PerformanceTier,
    pub is_baseline: bool,
}

/// Comparison over a batch of result records. Entries keep input order;
/// use [`ranked`](Self::ranked) for rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Name of the baseline record, if any record produced events.
    pub baseline: Option<String>,
    pub entries: Vec<ComparisonEntry>,
}

impl ComparisonReport {
    /// Derive the comparison. Deterministic and side-effect free: the same
    /// records in the same order always produce an identical report.
    ///
    /// The baseline is the highest-throughput record among those with
    /// `event_count > 0`; the first encountered wins ties.
    pub fn from_records(records: Vec<ResultRecord>) -> Self {
        let mut baseline_idx: Option<usize> = None;
        for (idx, record) in records.iter().enumerate() {
            if !record.is_success() {
                continue;
            }
            match baseline_idx {
                None => baseline_idx = Some(idx),
                Some(best) if record.throughput > records[best].throughput => {
                    baseline_idx = Some(idx)
                }
                Some(_) => {}
            }
        }
        let baseline_throughput = baseline_idx.map(|idx| records[idx].throughput);

        // Stable sort: equal throughputs keep input order
        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by(|&a, &b| {
            records[b]
                .throughput
                .partial_cmp(&records[a].throughput)
                .unwrap_or(Ordering::Equal)
        });
        let mut ranks = vec![0usize; records.len()];
        for (position, &idx) in order.iter().enumerate() {
            ranks[idx] = position + 1;
        }

        let baseline = baseline_idx.map(|idx| records[idx].name.clone());
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                let ratio = match baseline_throughput {
                    Some(best) if best > 0.0 && record.is_success() => record.throughput / best,
                    _ => 0.0,
                };
                let tier = classify(&record, ratio);
                ComparisonEntry {
                    is_baseline: Some(idx) == baseline_idx,
                    ratio_to_baseline: ratio,
                    rank: ranks[idx],
                    tier,
                    record,
                }
            })
            .collect();

        Self { baseline, entries }
    }

    /// Entries ordered by rank (highest throughput first).
    pub fn ranked(&self) -> Vec<&ComparisonEntry> {
        let mut entries: Vec<&ComparisonEntry> = self.entries.iter().collect();
        entries.sort_by_key(|entry| entry.rank);
        entries
    }

    /// The baseline entry, if any record produced events.
    pub fn baseline_entry(&self) -> Option<&ComparisonEntry> {
        self.entries.iter().find(|entry| entry.is_baseline)
    }
}

fn classify(record: &ResultRecord, ratio: f64) -> PerformanceTier {
    if !record.is_success() {
        PerformanceTier::Failed
    } else if ratio >= TIER_LEADING_RATIO {
        PerformanceTier::Leading
    } else if ratio >= TIER_COMPETITIVE_RATIO {
        PerformanceTier::Competitive
    } else {
        PerformanceTier::Trailing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::LatencyStats;
    use chrono::Utc;

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
            start_time: Utc::now(),
            end_time: Utc::now(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_baseline_selection_and_ratio() {
        let report = ComparisonReport::from_records(vec![
            record("c", 1_000_000, 100_000.0),
            record("python", 275_480, 27_548.0),
        ]);

        assert_eq!(report.baseline.as_deref(), Some("c"));
        assert_eq!(report.entries[0].ratio_to_baseline, 1.0);
        assert!(report.entries[0].is_baseline);
        assert!((report.entries[1].ratio_to_baseline - 0.27548).abs() < 1e-9);
        assert_eq!(report.entries[0].rank, 1);
        assert_eq!(report.entries[1].rank, 2);
    }

    #[test]
    fn test_exactly_one_baseline_ratio_of_one() {
        let report = ComparisonReport::from_records(vec![
            record("a", 10, 50.0),
            record("b", 10, 80.0),
            record("c", 0, 0.0),
            record("d", 10, 20.0),
        ]);

        let baselines: Vec<_> = report
            .entries
            .iter()
            .filter(|e| e.ratio_to_baseline == 1.0)
            .collect();
        assert_eq!(baselines.len(), 1);
        assert_eq!(baselines[0].record.name, "b");
        for entry in &report.entries {
            assert!(entry.ratio_to_baseline >= 0.0);
            assert!(entry.ratio_to_baseline <= 1.0);
        }
    }

    #[test]
    fn test_tie_break_keeps_input_order() {
        let report = ComparisonReport::from_records(vec![
            record("first", 10, 500.0),
            record("second", 10, 500.0),
        ]);
        assert_eq!(report.baseline.as_deref(), Some("first"));
        assert_eq!(report.entries[0].rank, 1);
        assert_eq!(report.entries[1].rank, 2);
    }

    #[test]
    fn test_failed_records_visible_but_never_baseline() {
        let report = ComparisonReport::from_records(vec![
            ResultRecord::failure("broken", "Go", "tracepoint", "ring_buffer", "timed out"),
            record("ok", 5, 10.0),
        ]);

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.baseline.as_deref(), Some("ok"));
        assert_eq!(report.entries[0].tier, PerformanceTier::Failed);
        assert_eq!(report.entries[0].ratio_to_baseline, 0.0);
    }

    #[test]
    fn test_all_failed_has_no_baseline() {
        let report = ComparisonReport::from_records(vec![
            ResultRecord::failure("a", "C", "tracepoint", "ring_buffer", "x"),
            ResultRecord::failure("b", "Go", "tracepoint", "ring_buffer", "y"),
        ]);
        assert!(report.baseline.is_none());
        assert!(report.baseline_entry().is_none());
    }

    #[test]
    fn test_tier_thresholds() {
        let report = ComparisonReport::from_records(vec![
            record("base", 10, 1_000.0),
            record("close", 10, 800.0),
            record("mid", 10, 300.0),
            record("slow", 10, 100.0),
        ]);
        let tiers: Vec<_> = report.entries.iter().map(|e| e.tier).collect();
        assert_eq!(
            tiers,
            vec![
                PerformanceTier::Leading,
                PerformanceTier::Leading,
                PerformanceTier::Competitive,
                PerformanceTier::Trailing,
            ]
        );
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let records = vec![
            record("c", 100, 9_000.0),
            record("go", 100, 4_000.0),
            ResultRecord::failure("py", "Python", "tracepoint", "ring_buffer", "oops"),
        ];
        let first = ComparisonReport::from_records(records.clone());
        let second = ComparisonReport::from_records(records);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_ranked_ordering() {
        let report = ComparisonReport::from_records(vec![
            record("slow", 10, 10.0),
            record("fast", 10, 100.0),
            record("mid", 10, 50.0),
        ]);
        let names: Vec<_> = report
            .ranked()
            .iter()
            .map(|e| e.record.name.as_str())
            .collect();
        assert_eq!(names, vec!["fast", "mid", "slow"]);
    }
}
