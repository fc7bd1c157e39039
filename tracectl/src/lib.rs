// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tracing targets shared by the path computation crates, and runtime control
//! of their log levels.

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod control;
pub mod display;
pub mod targets;

// re-exports
pub use control::{LevelDirectives, TracingControl, TracingCtlError, get_trace_ctl};
pub use tracing::level_filters::LevelFilter;
