// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Configuration model of the path computation service. A configuration is
//! read from YAML and validated before the service is built from it.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]

pub mod display;
pub mod errors;
pub mod pceconfig;

pub use errors::{ConfigError, ConfigResult, stringify}; // re-export
pub use pceconfig::PceConfig; // re-export

use tracectl::trace_target;
trace_target!("config", LevelFilter::INFO, &["pce"]);
