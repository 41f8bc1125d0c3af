// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Canonical result schema for one benchmark run.
//!
//! Every implementation, whatever its language, emits exactly this JSON
//! document. The harness reads the documents back and never needs to know
//! how the producing binary was built.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, ImplementationError};
use crate::stats::LatencyStats;

/// The durable, serializable unit of one run. Created once at the end of a
/// run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Human-readable implementation name.
    pub name: String,
    /// Implementation language.
    pub language: String,
    /// Kernel instrumentation mechanism label (kprobe, tracepoint, ...).
    pub program_type: String,
    /// Delivery channel label (ring_buffer, perf_buffer, map).
    pub data_mechanism: String,
    /// Measured wall time of the collection window in seconds.
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
    /// Samples retained during the window.
    pub event_count: u64,
    /// Samples rejected after the buffer filled.
    #[serde(default)]
    pub dropped_count: u64,
    /// Retained events per second.
    pub throughput: f64,
    /// Inter-arrival latency distribution in microseconds.
    pub latency_stats: LatencyStats,
    /// Best-effort resident memory at measurement end; 0 if unavailable.
    #[serde(default)]
    pub memory_bytes: u64,
    /// Wall-clock start of the run, informational only.
    pub start_time: DateTime<Utc>,
    /// Wall-clock end of the run, informational only.
    pub end_time: DateTime<Utc>,
    /// Non-fatal warnings accumulated during the run.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ResultRecord {
    /// Placeholder for an implementation that produced no usable result.
    /// Keeps the failure visible in the comparison instead of dropping it.
    pub fn failure(
        name: impl Into<String>,
        language: impl Into<String>,
        program_type: impl Into<String>,
        data_mechanism: impl Into<String>,
        reason: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            language: language.into(),
            program_type: program_type.into(),
            data_mechanism: data_mechanism.into(),
            duration_seconds: 0.0,
            event_count: 0,
            dropped_count: 0,
            throughput: 0.0,
            latency_stats: LatencyStats::default(),
            memory_bytes: 0,
            start_time: now,
            end_time: now,
            errors: vec![format!("implementation failed: {}", reason)],
        }
    }

    /// Whether this run produced any events at all. Zero-event records are
    /// reported but never considered for the comparison baseline.
    pub fn is_success(&self) -> bool {
        self.event_count > 0
    }

    /// Read a record emitted by an implementation process.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImplementationError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImplementationError::MissingResultFile {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|e| ImplementationError::ResultParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_reader(file).map_err(|e| ImplementationError::ResultParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write the record as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BenchError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BenchError::Io {
                    context: "creating results directory",
                    source: e,
                })?;
            }
        }
        let file = File::create(path).map_err(|e| BenchError::Io {
            context: "creating result file",
            source: e,
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| BenchError::Io {
            context: "serializing result record",
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record() -> ResultRecord {
        ResultRecord {
            name: "rust-aya".to_string(),
            language: "Rust".to_string(),
            program_type: "tracepoint".to_string(),
            data_mechanism: "ring_buffer".to_string(),
            duration_seconds: 10.02,
            event_count: 120_000,
            dropped_count: 37,
            throughput: 11_976.0,
            latency_stats: LatencyStats {
                min_us: 0.5,
                max_us: 912.0,
                average_us: 83.4,
            },
            memory_bytes: 14_680_064,
            start_time: Utc::now(),
            end_time: Utc::now(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_wire_schema_field_names() {
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("duration").is_some());
        assert!(json.get("duration_seconds").is_none());
        let latency = json.get("latency_stats").unwrap();
        assert!(latency.get("min").is_some());
        assert!(latency.get("max").is_some());
        assert!(latency.get("average").is_some());
        // ISO-8601 wall-clock stamps
        let start = json.get("start_time").unwrap().as_str().unwrap();
        assert!(start.contains('T'));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("rust_result.json");

        let record = record();
        record.save(&path).unwrap();
        let loaded = ResultRecord::load(&path).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = ResultRecord::load(temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ImplementationError::MissingResultFile { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ResultRecord::load(&path).unwrap_err();
        assert!(matches!(err, ImplementationError::ResultParse { .. }));
    }

    #[test]
    fn test_failure_placeholder() {
        let placeholder =
            ResultRecord::failure("go-ebpf", "Go", "tracepoint", "ring_buffer", "timed out");
        assert_eq!(placeholder.event_count, 0);
        assert_eq!(placeholder.throughput, 0.0);
        assert!(!placeholder.is_success());
        assert_eq!(
            placeholder.errors,
            vec!["implementation failed: timed out".to_string()]
        );
    }
}
