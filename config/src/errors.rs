// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Type for configuration / validation failures
//! Any result returned by the loading or validation methods of this crate is a
//! `ConfigError`.

use thiserror::Error;

/// The reasons why we may reject a configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Could not read configuration file {0}: {1}")]
    Io(String, String),
    #[error("Could not parse configuration: {0}")]
    Parse(String),
    #[error("Missing mandatory parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid deadline: {0}")]
    InvalidDeadline(&'static str),
    #[error("Invalid default VLANs '{0}': {1}")]
    InvalidVlans(String, String),
    #[error("Invalid tracing configuration '{0}': {1}")]
    InvalidTracing(String, String),
}

/// Result-like type for configurations
pub type ConfigResult = Result<(), ConfigError>;

#[must_use]
pub fn stringify(conf_result: &ConfigResult) -> String {
    match conf_result {
        Ok(()) => "Ok".to_string(),
        Err(e) => format!("FAILED: {e}"),
    }
}
