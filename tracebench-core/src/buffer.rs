// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Bounded event buffer with drop accounting.
//!
//! One buffer per collection run. The storage is pre-sized at creation and
//! never grows past its capacity, so memory stays bounded no matter how fast
//! the producer emits. Overflow is not an error: rejected samples are
//! counted in `dropped_count` and reported alongside the retained ones.

use std::time::{Duration, Instant};

use crate::error::CollectionError;
use crate::types::EventCategory;

/// One observed event. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Monotonic nanoseconds from the producing clock.
    pub timestamp: u64,
    /// Opaque producer identifier (CPU id or PID).
    pub producer_id: u32,
    /// Event kind.
    pub category: EventCategory,
    /// Fixed-size opaque payload.
    pub payload: u32,
}

/// Bounded, append-only store of samples for one collection window.
///
/// Not internally synchronized: the run controller guarantees a single
/// writer during the window and a single reader after it.
#[derive(Debug)]
pub struct EventBuffer {
    samples: Vec<Sample>,
    capacity: usize,
    dropped_count: u64,
    window_start: Option<Instant>,
    window_end: Option<Instant>,
}

impl EventBuffer {
    /// Create an empty buffer holding at most `capacity` samples.
    pub fn create(capacity: usize) -> Result<Self, CollectionError> {
        if capacity == 0 {
            return Err(CollectionError::InvalidCapacity { capacity });
        }
        Ok(Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            dropped_count: 0,
            window_start: None,
            window_end: None,
        })
    }

    /// Arm the buffer for a new collection window.
    ///
    /// Clears any prior samples and drop accounting, so re-arming an
    /// already-used buffer behaves exactly like a fresh one.
    pub fn start(&mut self) {
        self.samples.clear();
        self.dropped_count = 0;
        self.window_start = Some(Instant::now());
        self.window_end = None;
    }

    /// Record one sample. Returns true if stored, false if the buffer is
    /// full (the sample is dropped and counted). Never blocks, never
    /// reallocates.
    pub fn append(&mut self, sample: Sample) -> bool {
        debug_assert!(self.window_end.is_none(), "append after stop");
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
            true
        } else {
            self.dropped_count += 1;
            false
        }
    }

    /// Close the collection window. The buffer is read-only afterwards.
    pub fn stop(&mut self) {
        self.window_end = Some(Instant::now());
    }

    /// Samples retained during the window, in arrival order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples were retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples the buffer will retain.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples rejected after the buffer reached capacity.
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count
    }

    /// Whether the window has been closed.
    pub fn is_stopped(&self) -> bool {
        self.window_end.is_some()
    }

    /// Measured window length. Fails if the window was never stopped.
    ///
    /// Saturates to zero if the end stamp does not lie after the start
    /// stamp, so a degenerate window can never yield a negative duration.
    pub fn window_duration(&self) -> Result<Duration, CollectionError> {
        match (self.window_start, self.window_end) {
            (Some(start), Some(end)) => Ok(end.saturating_duration_since(start)),
            _ => Err(CollectionError::IncompleteWindow),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_window_for_test(&mut self, start: Instant, end: Instant) {
        self.window_start = Some(start);
        self.window_end = Some(end);
    }
}
