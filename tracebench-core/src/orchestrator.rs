// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Sequential execution of implementation processes.
//!
//! Each implementation runs alone - concurrent runs would contend for CPU
//! and kernel resources and invalidate the comparison. A hung process is
//! killed after `duration + grace_period`; any failure becomes a visible
//! placeholder record and the batch moves on to the next implementation.

use std::process::Stdio;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::{ImplementationSpec, SuiteConfig};
use crate::error::{BenchError, BenchResult, ImplementationError};
use crate::record::ResultRecord;
use crate::report::ComparisonReport;
use crate::system::SystemInfo;

/// Success/failure counts over one batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn from_records(records: &[ResultRecord]) -> Self {
        let successful = records.iter().filter(|r| r.is_success()).count();
        Self {
            total: records.len(),
            successful,
            failed: records.len() - successful,
        }
    }

    /// True when every implementation in the batch failed. This is the
    /// only condition under which the overall run exits non-zero.
    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.failed == self.total
    }
}

/// Merged comparison document written at the end of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDocument {
    /// Suite identifier
    pub suite: String,
    /// Harness version
    pub version: String,
    /// Timestamp when the batch ran
    pub timestamp: DateTime<Utc>,
    /// Requested collection window per implementation
    pub requested_duration_seconds: u64,
    /// System information
    pub system_info: SystemInfo,
    /// One record per requested implementation, in input order
    pub results: Vec<ResultRecord>,
    /// Derived comparison
    pub comparison: ComparisonReport,
    pub summary: BatchSummary,
}

/// Sequences implementation runs and merges their results.
pub struct Orchestrator {
    config: SuiteConfig,
}

impl Orchestrator {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run every configured implementation to completion, one at a time,
    /// then write per-implementation result files and the merged document.
    ///
    /// A single implementation's failure never aborts the batch; it is
    /// recorded as a placeholder and the batch continues. Cancellation
    /// kills the in-flight process and marks the remaining descriptors as
    /// cancelled, so the report still lists every requested implementation.
    pub async fn run_batch(&self, cancel: CancellationToken) -> BenchResult<BatchDocument> {
        std::fs::create_dir_all(&self.config.output_dir).map_err(|e| BenchError::Io {
            context: "creating output directory",
            source: e,
        })?;

        let mut records = Vec::with_capacity(self.config.implementations.len());

        for spec in &self.config.implementations {
            let record = if cancel.is_cancelled() {
                placeholder(spec, &ImplementationError::Cancelled)
            } else {
                match self.run_one(spec, &cancel).await {
                    Ok(record) => {
                        tracing::info!(
                            name = %spec.name,
                            throughput = record.throughput,
                            events = record.event_count,
                            "Implementation completed"
                        );
                        record
                    }
                    Err(err) => {
                        tracing::warn!(name = %spec.name, error = %err, "Implementation failed");
                        placeholder(spec, &err)
                    }
                }
            };

            let entry_path = self
                .config
                .output_dir
                .join(format!("{}_result.json", spec.name));
            record.save(&entry_path)?;
            records.push(record);
        }

        let document = self.merge(records);
        self.save_document(&document)?;
        Ok(document)
    }

    /// Run one implementation process and read back its result record.
    async fn run_one(
        &self,
        spec: &ImplementationSpec,
        cancel: &CancellationToken,
    ) -> Result<ResultRecord, ImplementationError> {
        let limit_secs = self.config.duration.as_secs() + self.config.grace_period_seconds;
        let limit = Duration::from_secs(limit_secs);

        let argv = self.substituted_command(spec);
        let (program, args) = argv
            .split_first()
            .expect("command validated non-empty at config load");

        // A stale result file from an earlier batch must not be read back
        // as this run's output.
        if spec.result_file.exists() {
            let _ = std::fs::remove_file(&spec.result_file);
        }

        tracing::info!(name = %spec.name, command = ?argv, limit_secs, "Starting implementation");

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ImplementationError::SpawnFailed {
                command: program.clone(),
                reason: e.to_string(),
            })?;

        enum WaitOutcome {
            Exited(std::io::Result<std::process::ExitStatus>),
            TimedOut,
            Cancelled,
        }

        // The wait future holds the only borrow of the child; the kill
        // paths below run after the race has resolved and released it.
        let outcome = {
            let deadline = tokio::time::sleep(limit);
            tokio::pin!(deadline);
            tokio::select! {
                waited = child.wait() => WaitOutcome::Exited(waited),
                _ = &mut deadline => WaitOutcome::TimedOut,
                _ = cancel.cancelled() => WaitOutcome::Cancelled,
            }
        };

        let status = match outcome {
            WaitOutcome::Exited(Ok(status)) => status,
            WaitOutcome::Exited(Err(e)) => {
                return Err(ImplementationError::WaitFailed {
                    reason: e.to_string(),
                });
            }
            WaitOutcome::TimedOut => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(ImplementationError::Timeout { limit_secs });
            }
            WaitOutcome::Cancelled => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(ImplementationError::Cancelled);
            }
        };

        if !status.success() {
            return Err(ImplementationError::NonZeroExit {
                status: status.to_string(),
            });
        }

        ResultRecord::load(&spec.result_file)
    }

    fn substituted_command(&self, spec: &ImplementationSpec) -> Vec<String> {
        let duration = self.config.duration.as_secs().to_string();
        let result_file = spec.result_file.display().to_string();
        spec.command
            .iter()
            .map(|arg| {
                arg.replace("{duration}", &duration)
                    .replace("{result_file}", &result_file)
            })
            .collect()
    }

    fn merge(&self, records: Vec<ResultRecord>) -> BatchDocument {
        let summary = BatchSummary::from_records(&records);
        let comparison = ComparisonReport::from_records(records.clone());
        BatchDocument {
            suite: "tracebench".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            requested_duration_seconds: self.config.duration.as_secs(),
            system_info: SystemInfo::collect(),
            results: records,
            comparison,
            summary,
        }
    }

    /// Write the merged document to a timestamped file plus `latest.json`.
    fn save_document(&self, document: &BatchDocument) -> BenchResult<()> {
        let stamp = document.timestamp.format("%Y-%m-%dT%H-%M-%SZ");
        let named = self.config.output_dir.join(format!("comparison_{}.json", stamp));
        let latest = self.config.output_dir.join("latest.json");

        let json = serde_json::to_string_pretty(document).map_err(|e| BenchError::Io {
            context: "serializing merged document",
            source: e.into(),
        })?;
        for path in [&named, &latest] {
            std::fs::write(path, &json).map_err(|e| BenchError::Io {
                context: "writing merged document",
                source: e,
            })?;
        }

        tracing::info!(path = %named.display(), "Merged comparison document written");
        Ok(())
    }
}

fn placeholder(spec: &ImplementationSpec, err: &ImplementationError) -> ResultRecord {
    ResultRecord::failure(
        spec.name.to_string(),
        spec.language.clone(),
        spec.program_type.to_string(),
        spec.data_mechanism.to_string(),
        &err.to_string(),
    )
}
