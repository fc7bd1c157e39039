// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Module that implements Display for routes and logical links

use crate::request::{EroPair, NextHop};
use crate::servicetopo::LogicalEdge;
use std::fmt::Display;
use topology::pretty_utils::{Heading, line};

fn fmt_path(f: &mut std::fmt::Formatter<'_>, title: &str, path: &[topology::Edge]) -> std::fmt::Result {
    let metric: u64 = path.iter().map(|e| e.metric).sum();
    Heading(format!("{title} ({} hops, metric {metric})", path.len())).fmt(f)?;
    for edge in path {
        writeln!(f, "  {edge}")?;
    }
    Ok(())
}

impl Display for EroPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_path(f, "A-Z", &self.az)?;
        fmt_path(f, "Z-A", &self.za)?;
        line(f)
    }
}

impl Display for LogicalEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_path(
            f,
            &format!("Logical {} -> {}", self.a().urn, self.z().urn),
            self.physical(),
        )
    }
}

impl Display for NextHop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} via {}", self.urn, self.to, self.through)
    }
}
