//! Custom error types for tracebench.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the tracebench harness.
/// All errors are explicit variants - no catch-all or generic handling.
#[derive(Debug, Error)]
pub enum BenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Collection Errors - Caller Bugs, Halt the Offending Run Only
    // =========================================================================
    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    // =========================================================================
    // Implementation Errors - Recovered at Orchestration Granularity
    // =========================================================================
    #[error("Implementation error: {0}")]
    Implementation(#[from] ImplementationError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Contract violations inside the measurement engine.
/// These indicate a caller bug and halt only the offending run,
/// never the whole comparison batch.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Invalid buffer capacity: {capacity} - capacity must be positive")]
    InvalidCapacity { capacity: usize },

    #[error("Statistics requested for a collection window that was never stopped")]
    IncompleteWindow,

    #[error("Run controller is finished - controllers are single-use")]
    AlreadyFinished,
}

/// Failures of an external implementation process.
/// Always recoverable at the orchestrator: surfaced in the result's
/// error list, the batch continues with the next implementation.
#[derive(Debug, Error)]
pub enum ImplementationError {
    #[error("Failed to spawn '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("Failed waiting for process: {reason}")]
    WaitFailed { reason: String },

    #[error("Process exited abnormally: {status}")]
    NonZeroExit { status: String },

    #[error("Timed out after {limit_secs}s (duration + grace period)")]
    Timeout { limit_secs: u64 },

    #[error("Cancelled by operator before completion")]
    Cancelled,

    #[error("Result file not found: {path}")]
    MissingResultFile { path: PathBuf },

    #[error("Malformed result file {path}: {reason}")]
    ResultParse { path: PathBuf, reason: String },
}

/// Hard validation errors for suite configuration.
/// Any invalid field prevents the batch from starting.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Missing required field: {field} in {context}")]
    MissingRequiredField {
        field: &'static str,
        context: String,
    },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Duplicate implementation name: {name}")]
    DuplicateImplementation { name: String },
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;
