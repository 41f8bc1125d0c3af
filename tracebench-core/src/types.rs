// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Enumerated labels and newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by
//! construction. Label enums mirror the tag values emitted by the
//! kernel-side programs and accepted on the wire.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Kernel instrumentation mechanism that generated the events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    Kprobe,
    Tracepoint,
    RawTracepoint,
    Uprobe,
    Xdp,
    Tc,
}

impl fmt::Display for ProgramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProgramType::Kprobe => "kprobe",
            ProgramType::Tracepoint => "tracepoint",
            ProgramType::RawTracepoint => "raw_tracepoint",
            ProgramType::Uprobe => "uprobe",
            ProgramType::Xdp => "xdp",
            ProgramType::Tc => "tc",
        };
        write!(f, "{}", label)
    }
}

/// Delivery channel between kernel and userspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMechanism {
    RingBuffer,
    PerfBuffer,
    Map,
}

impl fmt::Display for DataMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DataMechanism::RingBuffer => "ring_buffer",
            DataMechanism::PerfBuffer => "perf_buffer",
            DataMechanism::Map => "map",
        };
        write!(f, "{}", label)
    }
}

/// Event kind carried by each sample.
///
/// Discriminants match the `event_type` field written by the kernel-side
/// programs, so raw values read off a ring buffer map directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum EventCategory {
    Kprobe = 1,
    Tracepoint = 2,
    Uprobe = 3,
    Xdp = 4,
    Tc = 5,
}

impl EventCategory {
    /// Decode a raw `event_type` value. Returns None for unknown tags.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::Kprobe),
            2 => Some(Self::Tracepoint),
            3 => Some(Self::Uprobe),
            4 => Some(Self::Xdp),
            5 => Some(Self::Tc),
            _ => None,
        }
    }
}

/// Validated implementation identifier.
/// Must be non-empty, alphanumeric with hyphens/underscores, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImplementationName(String);

impl ImplementationName {
    /// Create a new ImplementationName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, HardValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "name",
                value: name,
                reason: "Implementation name cannot be empty".to_string(),
            });
        }

        if name.len() > 64 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "name",
                value: name.clone(),
                reason: format!("Implementation name too long: {} chars (max 64)", name.len()),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "name",
                value: name,
                reason: "Implementation name must contain only alphanumeric characters, hyphens, and underscores".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImplementationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ImplementationName {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImplementationName> for String {
    fn from(name: ImplementationName) -> Self {
        name.0
    }
}

/// Validated collection window length in whole seconds.
/// Must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct RunDuration(u64);

impl RunDuration {
    /// Create a new RunDuration with validation.
    pub fn new(secs: u64) -> Result<Self, HardValidationError> {
        if secs == 0 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "duration_seconds",
                value: "0".to_string(),
                reason: "Collection duration must be positive".to_string(),
            });
        }
        Ok(Self(secs))
    }

    /// Get the duration in seconds.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Convert to a std Duration.
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl fmt::Display for RunDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<u64> for RunDuration {
    type Error = HardValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RunDuration> for u64 {
    fn from(duration: RunDuration) -> Self {
        duration.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_display() {
        assert_eq!(ProgramType::RawTracepoint.to_string(), "raw_tracepoint");
        assert_eq!(DataMechanism::RingBuffer.to_string(), "ring_buffer");
        assert_eq!(DataMechanism::PerfBuffer.to_string(), "perf_buffer");
    }

    #[test]
    fn test_label_serde() {
        let json = serde_json::to_string(&ProgramType::Kprobe).unwrap();
        assert_eq!(json, "\"kprobe\"");
        let parsed: DataMechanism = serde_json::from_str("\"ring_buffer\"").unwrap();
        assert_eq!(parsed, DataMechanism::RingBuffer);
    }

    #[test]
    fn test_event_category_from_raw() {
        assert_eq!(EventCategory::from_raw(2), Some(EventCategory::Tracepoint));
        assert_eq!(EventCategory::from_raw(5), Some(EventCategory::Tc));
        assert_eq!(EventCategory::from_raw(0), None);
        assert_eq!(EventCategory::from_raw(99), None);
    }

    #[test]
    fn test_implementation_name_valid() {
        assert!(ImplementationName::new("c-libbpf").is_ok());
        assert!(ImplementationName::new("rust_aya").is_ok());
        assert!(ImplementationName::new("Go").is_ok());
    }

    #[test]
    fn test_implementation_name_invalid() {
        assert!(ImplementationName::new("").is_err());
        assert!(ImplementationName::new("a".repeat(65)).is_err());
        assert!(ImplementationName::new("python bcc").is_err());
        assert!(ImplementationName::new("go/ebpf").is_err());
    }

    #[test]
    fn test_run_duration() {
        assert!(RunDuration::new(0).is_err());
        let d = RunDuration::new(10).unwrap();
        assert_eq!(d.as_secs(), 10);
        assert_eq!(d.as_duration(), Duration::from_secs(10));
    }
}
