// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tables of tracing targets and tags, as logged on request

use crate::control::{TargetCfg, TargetRegistry};
use std::fmt::{Display, Formatter, Result};

fn level(level: impl Display) -> String {
    level.to_string().to_lowercase()
}

impl Display for TargetCfg {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let tags: Vec<&str> = self.tags.iter().copied().filter(|t| *t != self.name).collect();
        let origin = if self.is_custom() { "custom" } else { "module" };
        write!(
            f,
            "  {:<16} {:<6} {:<36} {:<6} {}",
            self.name,
            level(self.level),
            self.target,
            origin,
            tags.join(" ")
        )
    }
}

impl Display for TargetRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Tracing targets: {} declared, default level {}", self.targets.len(), level(self.default))?;
        for cfg in self.targets.values() {
            writeln!(f, "{cfg}")?;
        }
        Ok(())
    }
}

/// Targets grouped by the tags that address them
pub(crate) struct ByTag<'a>(pub(crate) &'a TargetRegistry);

impl Display for ByTag<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let registry = self.0;
        writeln!(f, "Tracing tags: {}", registry.tags.len())?;
        for tag in registry.tags.values() {
            let members: Vec<String> = tag
                .targets
                .iter()
                .filter_map(|target| registry.targets.get(target))
                .map(|cfg| format!("{}={}", cfg.name, level(cfg.level)))
                .collect();
            writeln!(f, "  {:<16} {}", tag.name, members.join(" "))?;
        }
        Ok(())
    }
}
