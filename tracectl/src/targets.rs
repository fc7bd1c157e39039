// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Link-time registry of the tracing targets declared by every linked crate

use crate::LevelFilter;
use linkme::distributed_slice;

/// Where the target string of a declaration comes from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// the module path of the declaring module
    Module,
    /// an explicit string, as for the targets of third-party crates
    Custom,
}

/// A tracing target as declared by [`trace_target!`] or [`custom_target!`]
#[derive(Debug)]
pub struct TargetDecl {
    pub target: &'static str,
    pub name: &'static str,
    pub level: LevelFilter,
    pub tags: &'static [&'static str],
    pub kind: TargetKind,
}

impl TargetDecl {
    #[must_use]
    pub const fn module(
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) -> Self {
        Self { target, name, level, tags, kind: TargetKind::Module }
    }
    #[must_use]
    pub const fn custom(target: &'static str, level: LevelFilter, tags: &'static [&'static str]) -> Self {
        Self { target, name: target, level, tags, kind: TargetKind::Custom }
    }
}

#[distributed_slice]
pub static TRACING_TARGETS: [TargetDecl];

/// Declare the tracing target of the calling module under a short name, with
/// its default level and the tags it can be addressed by.
///
/// The calling crate must depend on `linkme`.
#[macro_export]
macro_rules! trace_target {
    ($name:expr, $level:expr, $tags:expr) => {
        const _: () = {
            use linkme::distributed_slice;
            use $crate::LevelFilter;
            use $crate::targets::{TRACING_TARGETS, TargetDecl};

            #[distributed_slice(TRACING_TARGETS)]
            static DECL: TargetDecl = TargetDecl::module(module_path!(), $name, $level, $tags);
        };
    };
}

/// Declare a tracing target by its target string
#[macro_export]
macro_rules! custom_target {
    ($target:expr, $level:expr, $tags:expr) => {
        const _: () = {
            use linkme::distributed_slice;
            use $crate::LevelFilter;
            use $crate::targets::{TRACING_TARGETS, TargetDecl};

            #[distributed_slice(TRACING_TARGETS)]
            static DECL: TargetDecl = TargetDecl::custom($target, $level, $tags);
        };
    };
}
