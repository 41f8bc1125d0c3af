// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `tracebench drive` command - Run the built-in synthetic implementation.
//!
//! Collects fabricated events for the requested window and writes a
//! result record, so the harness can be exercised end to end (or listed
//! as an implementation in a suite configuration) without any kernel
//! instrumentation present.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use tracebench_core::{
    DataMechanism, EventCategory, ImplementationName, ProgramType, RunController, RunSpec,
    SyntheticProducer,
};

pub async fn execute(
    duration_secs: u64,
    output: &str,
    name: &str,
    rate: usize,
    capacity: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec = RunSpec::new(
        ImplementationName::new(name)?,
        "Rust",
        ProgramType::Tracepoint,
        DataMechanism::RingBuffer,
        Duration::from_secs(duration_secs),
    )
    .with_capacity(capacity);

    tracing::info!(name = %name, duration_secs, rate, "Starting synthetic collection");

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let mut controller = RunController::new(spec)?;
    let mut producer = SyntheticProducer::new(rate, EventCategory::Tracepoint);
    let record = controller.run(&mut producer, cancel).await?;

    record.save(output)?;

    println!("Synthetic Collection Results");
    println!("----------------------------");
    println!("Duration:     {:.2} seconds", record.duration_seconds);
    println!("Event count:  {}", record.event_count);
    println!("Dropped:      {}", record.dropped_count);
    println!("Throughput:   {:.0} events/sec", record.throughput);
    println!(
        "Latency (us): min={:.2} max={:.2} avg={:.2}",
        record.latency_stats.min_us, record.latency_stats.max_us, record.latency_stats.average_us
    );
    println!("Memory:       {} bytes", record.memory_bytes);
    println!();
    println!("Result saved to: {}", output);

    Ok(())
}
