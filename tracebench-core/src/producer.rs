// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Event producer capability.
//!
//! A producer is whatever feeds samples into a run: a real kernel-delivered
//! event source behind a ring/perf buffer, or a synthetic generator.
//! Concrete producers are swappable values selected by configuration, not a
//! type hierarchy.

use std::time::Instant;

use crate::buffer::Sample;
use crate::types::EventCategory;

/// A source of samples, polled once per collection tick.
///
/// `produce` appends zero or more new samples to `batch` and must not block
/// longer than one tick interval. Timestamps must be monotonic
/// non-decreasing across calls; the buffer does not reorder.
pub trait EventProducer: Send {
    fn produce(&mut self, batch: &mut Vec<Sample>);
}

/// Synthetic producer that fabricates kernel-like events at a fixed rate.
///
/// Emits `events_per_tick` samples per poll with monotonic timestamps,
/// CPU ids assigned round-robin across the host's cores, and a running
/// sequence number as payload. Stands in for a real tracing agent when
/// exercising the harness end to end.
pub struct SyntheticProducer {
    events_per_tick: usize,
    category: EventCategory,
    cpu_count: u32,
    sequence: u64,
    clock_origin: Instant,
}

impl SyntheticProducer {
    pub fn new(events_per_tick: usize, category: EventCategory) -> Self {
        Self {
            events_per_tick,
            category,
            cpu_count: num_cpus::get().max(1) as u32,
            sequence: 0,
            clock_origin: Instant::now(),
        }
    }

    /// Total samples emitted so far.
    pub fn emitted(&self) -> u64 {
        self.sequence
    }
}

impl EventProducer for SyntheticProducer {
    fn produce(&mut self, batch: &mut Vec<Sample>) {
        for _ in 0..self.events_per_tick {
            let timestamp = self.clock_origin.elapsed().as_nanos() as u64;
            batch.push(Sample {
                timestamp,
                producer_id: (self.sequence % u64::from(self.cpu_count)) as u32,
                category: self.category,
                payload: self.sequence as u32,
            });
            self.sequence += 1;
        }
    }
}
