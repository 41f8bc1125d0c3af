//! Tracebench Core Library
//!
//! Measurement and aggregation engine for comparing event-throughput and
//! latency characteristics of tracing agents. Provides the bounded event
//! buffer, collection state machine, statistics, canonical result schema,
//! sequential orchestrator, and comparison report derivation.

pub mod buffer;
pub mod config;
pub mod controller;
pub mod error;
pub mod orchestrator;
pub mod producer;
pub mod record;
pub mod report;
pub mod stats;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use buffer::{EventBuffer, Sample};
pub use config::{ConfigLoader, ImplementationSpec, SuiteConfig};
pub use controller::{RunController, RunSpec, RunState};
pub use error::{
    BenchError, BenchResult, CollectionError, HardValidationError, ImplementationError,
};
pub use orchestrator::{BatchDocument, BatchSummary, Orchestrator};
pub use producer::{EventProducer, SyntheticProducer};
pub use record::ResultRecord;
pub use report::{ComparisonEntry, ComparisonReport, PerformanceTier};
pub use stats::{LatencyStats, WindowStats};
pub use system::SystemInfo;
pub use types::{DataMechanism, EventCategory, ImplementationName, ProgramType, RunDuration};
