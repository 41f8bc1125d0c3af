// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Timed collection state machine.
//!
//! Drives one producer/buffer pair through a fixed measurement window:
//! Idle → Running → Stopping → Finished. The window ends when the
//! configured duration elapses or a cancellation signal fires, whichever
//! comes first; the two are raced in a select, never polled from inside
//! the tick loop. Either way the run drains and finalizes, so partially
//! collected samples are still reported.

use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::buffer::{EventBuffer, Sample};
use crate::error::CollectionError;
use crate::producer::EventProducer;
use crate::record::ResultRecord;
use crate::stats;
use crate::system;
use crate::types::{DataMechanism, ImplementationName, ProgramType};

/// Default buffer capacity when a run spec does not override it.
pub const DEFAULT_CAPACITY: usize = 1_000_000;

/// Default poll interval for the collection tick.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Collection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created but not yet started.
    Idle,
    /// Collection window open, producer being polled.
    Running,
    /// Window closed, draining and finalizing.
    Stopping,
    /// Terminal. The controller cannot be reused.
    Finished,
}

impl RunState {
    /// Get the state name for error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Stopping => "Stopping",
            Self::Finished => "Finished",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Configuration for one collection run.
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub name: ImplementationName,
    pub language: String,
    pub program_type: ProgramType,
    pub data_mechanism: DataMechanism,
    /// Requested window length. The record reports the measured length.
    pub duration: Duration,
    pub capacity: usize,
    pub tick_interval: Duration,
}

impl RunSpec {
    pub fn new(
        name: ImplementationName,
        language: impl Into<String>,
        program_type: ProgramType,
        data_mechanism: DataMechanism,
        duration: Duration,
    ) -> Self {
        Self {
            name,
            language: language.into(),
            program_type,
            data_mechanism,
            duration,
            capacity: DEFAULT_CAPACITY,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Override the buffer capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Override the collection tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

/// One-shot controller for a single measurement window.
///
/// Owns the buffer outright: the tick loop is the only writer while
/// Running, and statistics read it only after Stopping, so the buffer
/// itself needs no locking.
#[derive(Debug)]
pub struct RunController {
    spec: RunSpec,
    buffer: EventBuffer,
    state: RunState,
}

impl RunController {
    /// Create a controller. Fails if the spec's capacity is invalid.
    pub fn new(spec: RunSpec) -> Result<Self, CollectionError> {
        let buffer = EventBuffer::create(spec.capacity)?;
        Ok(Self {
            spec,
            buffer,
            state: RunState::Idle,
        })
    }

    /// Get the current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Drive the producer for the configured duration, or until `cancel`
    /// fires, and assemble the run's result record.
    ///
    /// Terminal: a second call fails with `AlreadyFinished`.
    pub async fn run(
        &mut self,
        producer: &mut dyn EventProducer,
        cancel: CancellationToken,
    ) -> Result<ResultRecord, CollectionError> {
        if self.state == RunState::Finished {
            return Err(CollectionError::AlreadyFinished);
        }

        self.transition(RunState::Running);
        let started_at = Utc::now();
        self.buffer.start();

        let deadline = tokio::time::sleep(self.spec.duration);
        tokio::pin!(deadline);
        let mut ticker = tokio::time::interval(self.spec.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut batch: Vec<Sample> = Vec::new();
        let mut interrupted = false;

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    tracing::debug!(name = %self.spec.name, "Collection window elapsed");
                    break;
                }
                _ = cancel.cancelled() => {
                    tracing::debug!(name = %self.spec.name, "Collection cancelled");
                    interrupted = true;
                    break;
                }
                _ = ticker.tick() => {
                    batch.clear();
                    producer.produce(&mut batch);
                    for sample in batch.drain(..) {
                        self.buffer.append(sample);
                    }
                }
            }
        }

        self.transition(RunState::Stopping);
        self.buffer.stop();
        let window = stats::compute(&self.buffer)?;
        let ended_at = Utc::now();

        let mut errors = Vec::new();
        if interrupted {
            errors.push("collection interrupted before the configured duration elapsed".to_string());
        }
        if window.dropped_count > 0 {
            tracing::warn!(
                name = %self.spec.name,
                dropped = window.dropped_count,
                "Buffer reached capacity during the window"
            );
        }

        let record = ResultRecord {
            name: self.spec.name.to_string(),
            language: self.spec.language.clone(),
            program_type: self.spec.program_type.to_string(),
            data_mechanism: self.spec.data_mechanism.to_string(),
            duration_seconds: window.duration_seconds,
            event_count: window.event_count,
            dropped_count: window.dropped_count,
            throughput: window.throughput,
            latency_stats: window.latency,
            memory_bytes: system::current_rss_bytes(),
            start_time: started_at,
            end_time: ended_at,
            errors,
        };

        self.transition(RunState::Finished);
        tracing::info!(
            name = %self.spec.name,
            events = record.event_count,
            dropped = record.dropped_count,
            throughput = record.throughput,
            "Run finished"
        );

        Ok(record)
    }

    fn transition(&mut self, target: RunState) {
        tracing::debug!(
            name = %self.spec.name,
            from = self.state.name(),
            to = target.name(),
            "State transition"
        );
        self.state = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventCategory;

    /// Producer emitting a fixed number of samples on the first poll only.
    struct OneShotProducer {
        samples: Vec<Sample>,
    }

    impl OneShotProducer {
        fn with_timestamps(timestamps: &[u64]) -> Self {
            Self {
                samples: timestamps
                    .iter()
                    .map(|&ts| Sample {
                        timestamp: ts,
                        producer_id: 0,
                        category: EventCategory::Tracepoint,
                        payload: 0,
                    })
                    .collect(),
            }
        }
    }

    impl EventProducer for OneShotProducer {
        fn produce(&mut self, batch: &mut Vec<Sample>) {
            batch.append(&mut self.samples);
        }
    }

    fn spec(duration: Duration) -> RunSpec {
        RunSpec::new(
            ImplementationName::new("unit-test").unwrap(),
            "Rust",
            ProgramType::Tracepoint,
            DataMechanism::RingBuffer,
            duration,
        )
        .with_capacity(1024)
    }

    #[test]
    fn test_invalid_capacity_rejected() {
        let spec = spec(Duration::from_millis(10)).with_capacity(0);
        assert!(matches!(
            RunController::new(spec),
            Err(CollectionError::InvalidCapacity { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_collects_until_deadline() {
        let mut controller = RunController::new(spec(Duration::from_millis(50))).unwrap();
        assert_eq!(controller.state(), RunState::Idle);

        let mut producer = OneShotProducer::with_timestamps(&[1_000, 2_000, 4_000]);
        let record = controller
            .run(&mut producer, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(controller.state(), RunState::Finished);
        assert_eq!(record.event_count, 3);
        assert_eq!(record.dropped_count, 0);
        assert!(record.duration_seconds > 0.0);
        assert!(record.throughput > 0.0);
        assert!(record.errors.is_empty());
        assert!(record.end_time >= record.start_time);
    }

    #[tokio::test]
    async fn test_cancellation_drains_and_finalizes() {
        let mut controller = RunController::new(spec(Duration::from_secs(60))).unwrap();
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            canceller.cancel();
        });

        let mut producer = OneShotProducer::with_timestamps(&[10, 20]);
        let record = controller.run(&mut producer, cancel).await.unwrap();

        // Partial collection is reported, not discarded
        assert_eq!(record.event_count, 2);
        assert_eq!(record.errors.len(), 1);
        assert!(record.errors[0].contains("interrupted"));
        assert_eq!(controller.state(), RunState::Finished);
    }

    #[tokio::test]
    async fn test_finished_controller_cannot_be_reused() {
        let mut controller = RunController::new(spec(Duration::from_millis(10))).unwrap();
        let mut producer = OneShotProducer::with_timestamps(&[]);

        controller
            .run(&mut producer, CancellationToken::new())
            .await
            .unwrap();
        let err = controller
            .run(&mut producer, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CollectionError::AlreadyFinished));
    }

    #[tokio::test]
    async fn test_overflow_is_counted_not_fatal() {
        let spec = spec(Duration::from_millis(20)).with_capacity(2);
        let mut controller = RunController::new(spec).unwrap();
        let mut producer = OneShotProducer::with_timestamps(&[1, 2, 3, 4, 5]);

        let record = controller
            .run(&mut producer, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(record.event_count, 2);
        assert_eq!(record.dropped_count, 3);
    }
}
