// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Throughput and latency statistics over a finished collection window.
//!
//! Latency here is inter-arrival delivery latency: the deltas between
//! consecutive delivered-sample timestamps. The buffer only observes
//! delivery time, so that is the only latency it can report.

use serde::{Deserialize, Serialize};

use crate::buffer::{EventBuffer, Sample};
use crate::error::CollectionError;

/// Inter-arrival latency distribution in microseconds.
///
/// All fields are zero when fewer than two samples were retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    #[serde(rename = "min")]
    pub min_us: f64,
    #[serde(rename = "max")]
    pub max_us: f64,
    #[serde(rename = "average")]
    pub average_us: f64,
}

/// Derived measurements for one collection window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowStats {
    /// Measured window length in seconds (not the requested duration).
    pub duration_seconds: f64,
    /// Samples retained in the buffer.
    pub event_count: u64,
    /// Samples rejected after the buffer filled.
    pub dropped_count: u64,
    /// Retained events per second; zero for a degenerate window.
    pub throughput: f64,
    /// Inter-arrival latency distribution.
    pub latency: LatencyStats,
}

/// Compute window statistics from a stopped buffer.
///
/// Deterministic, no side effects. Fails with `IncompleteWindow` if the
/// buffer's window was never closed.
pub fn compute(buffer: &EventBuffer) -> Result<WindowStats, CollectionError> {
    let duration_seconds = buffer.window_duration()?.as_secs_f64();
    let event_count = buffer.len() as u64;

    let throughput = if duration_seconds > 0.0 {
        event_count as f64 / duration_seconds
    } else {
        0.0
    };

    Ok(WindowStats {
        duration_seconds,
        event_count,
        dropped_count: buffer.dropped_count(),
        throughput,
        latency: latency_from_samples(buffer.samples()),
    })
}

/// Min/max/average over consecutive timestamp deltas, converted from
/// nanoseconds to microseconds. Full delta sequence, no trimming.
fn latency_from_samples(samples: &[Sample]) -> LatencyStats {
    if samples.len() < 2 {
        return LatencyStats::default();
    }

    let mut min_us = f64::MAX;
    let mut max_us = 0.0_f64;
    let mut sum_us = 0.0_f64;

    for pair in samples.windows(2) {
        let delta_ns = pair[1].timestamp.saturating_sub(pair[0].timestamp);
        let delta_us = delta_ns as f64 / 1_000.0;
        min_us = min_us.min(delta_us);
        max_us = max_us.max(delta_us);
        sum_us += delta_us;
    }

    let count = (samples.len() - 1) as f64;
    LatencyStats {
        min_us,
        max_us,
        average_us: sum_us / count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventCategory;
    use std::time::{Duration, Instant};

    fn sample(timestamp: u64) -> Sample {
        Sample {
            timestamp,
            producer_id: 0,
            category: EventCategory::Tracepoint,
            payload: 0,
        }
    }

    fn stopped_buffer(timestamps: &[u64], window: Duration) -> EventBuffer {
        let mut buffer = EventBuffer::create(timestamps.len().max(1)).unwrap();
        buffer.start();
        for &ts in timestamps {
            buffer.append(sample(ts));
        }
        buffer.stop();
        let start = Instant::now();
        buffer.set_window_for_test(start, start + window);
        buffer
    }

    #[test]
    fn test_compute_requires_stopped_window() {
        let mut buffer = EventBuffer::create(8).unwrap();
        buffer.start();
        assert!(matches!(
            compute(&buffer),
            Err(CollectionError::IncompleteWindow)
        ));
    }

    #[test]
    fn test_zero_duration_yields_zero_throughput() {
        let buffer = stopped_buffer(&[100, 200, 300], Duration::ZERO);
        let stats = compute(&buffer).unwrap();
        assert_eq!(stats.throughput, 0.0);
        assert_eq!(stats.event_count, 3);
    }

    #[test]
    fn test_single_sample_latency_is_zero() {
        let buffer = stopped_buffer(&[42], Duration::from_secs(1));
        let stats = compute(&buffer).unwrap();
        assert_eq!(stats.latency, LatencyStats::default());
    }

    #[test]
    fn test_latency_deltas_in_microseconds() {
        // Deltas: 1000ns, 3000ns, 2000ns -> 1us, 3us, 2us
        let buffer = stopped_buffer(&[0, 1_000, 4_000, 6_000], Duration::from_secs(1));
        let stats = compute(&buffer).unwrap();
        assert_eq!(stats.latency.min_us, 1.0);
        assert_eq!(stats.latency.max_us, 3.0);
        assert!((stats.latency.average_us - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_window_scenario() {
        // 5000 appends into a 1000-slot buffer over a 10 second window
        let mut buffer = EventBuffer::create(1000).unwrap();
        buffer.start();
        for i in 0..5000_u64 {
            buffer.append(sample(i * 2_000_000));
        }
        buffer.stop();
        let start = Instant::now();
        buffer.set_window_for_test(start, start + Duration::from_secs(10));

        let stats = compute(&buffer).unwrap();
        assert_eq!(stats.event_count, 1000);
        assert_eq!(stats.dropped_count, 4000);
        assert!((stats.throughput - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let buffer = stopped_buffer(&[0, 500, 1_500], Duration::from_secs(2));
        assert_eq!(compute(&buffer).unwrap(), compute(&buffer).unwrap());
    }
}
