// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML suite configuration with strict schema validation.
//!
//! Validates the comparison suite at startup. Any invalid field results in
//! a HardValidationError that prevents the batch from running.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BenchError, BenchResult, HardValidationError};
use crate::types::{DataMechanism, ImplementationName, ProgramType, RunDuration};

/// Raw implementation descriptor as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawImplementation {
    name: String,
    language: String,
    program_type: ProgramType,
    data_mechanism: DataMechanism,
    command: Vec<String>,
    #[serde(default)]
    result_file: Option<String>,
}

/// Raw root configuration file.
#[derive(Debug, Deserialize)]
struct RawSuiteConfig {
    #[serde(default = "default_duration_seconds")]
    duration_seconds: u64,
    #[serde(default = "default_grace_period_seconds")]
    grace_period_seconds: u64,
    #[serde(default = "default_output_dir")]
    output_dir: String,
    implementations: Vec<RawImplementation>,
}

fn default_duration_seconds() -> u64 {
    10
}

fn default_grace_period_seconds() -> u64 {
    30
}

fn default_output_dir() -> String {
    "benchmarks/results".to_string()
}

/// Validated descriptor for one implementation under comparison.
#[derive(Debug, Clone)]
pub struct ImplementationSpec {
    pub name: ImplementationName,
    pub language: String,
    pub program_type: ProgramType,
    pub data_mechanism: DataMechanism,
    /// Program and arguments. Arguments may reference `{duration}` and
    /// `{result_file}`; the orchestrator substitutes both before spawning.
    pub command: Vec<String>,
    /// Where the implementation writes its result record.
    pub result_file: PathBuf,
}

/// Complete validated suite configuration.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub duration: RunDuration,
    pub grace_period_seconds: u64,
    pub output_dir: PathBuf,
    pub implementations: Vec<ImplementationSpec>,
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a suite configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> BenchResult<SuiteConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| BenchError::Io {
            context: "reading configuration file",
            source: e,
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse and validate a suite configuration from a YAML string.
    pub fn from_yaml_str(contents: &str) -> BenchResult<SuiteConfig> {
        let raw: RawSuiteConfig =
            serde_yaml::from_str(contents).map_err(|e| BenchError::ConfigParse {
                message: e.to_string(),
            })?;

        Self::validate(raw)
    }

    fn validate(raw: RawSuiteConfig) -> BenchResult<SuiteConfig> {
        let duration = RunDuration::new(raw.duration_seconds)?;
        let output_dir = PathBuf::from(&raw.output_dir);

        if raw.implementations.is_empty() {
            return Err(HardValidationError::MissingRequiredField {
                field: "implementations",
                context: "suite configuration".to_string(),
            }
            .into());
        }

        let mut seen = HashSet::new();
        let mut implementations = Vec::with_capacity(raw.implementations.len());

        for raw_impl in raw.implementations {
            let name = ImplementationName::new(raw_impl.name)?;

            if !seen.insert(name.clone()) {
                return Err(HardValidationError::DuplicateImplementation {
                    name: name.to_string(),
                }
                .into());
            }

            if raw_impl.language.is_empty() {
                return Err(HardValidationError::MissingRequiredField {
                    field: "language",
                    context: format!("implementation '{}'", name),
                }
                .into());
            }

            if raw_impl.command.is_empty() {
                return Err(HardValidationError::MissingRequiredField {
                    field: "command",
                    context: format!("implementation '{}'", name),
                }
                .into());
            }

            let result_file = match raw_impl.result_file {
                Some(file) => {
                    let file = PathBuf::from(file);
                    if file.is_absolute() {
                        file
                    } else {
                        output_dir.join(file)
                    }
                }
                None => output_dir.join(format!("{}_result.json", name)),
            };

            implementations.push(ImplementationSpec {
                name,
                language: raw_impl.language,
                program_type: raw_impl.program_type,
                data_mechanism: raw_impl.data_mechanism,
                command: raw_impl.command,
                result_file,
            });
        }

        Ok(SuiteConfig {
            duration,
            grace_period_seconds: raw.grace_period_seconds,
            output_dir,
            implementations,
        })
    }
}
