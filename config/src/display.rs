// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display of configuration objects

use crate::pceconfig::PceConfig;
use std::fmt::Display;

const SEP: &str = "  ";

impl Display for PceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Configuration '{}'", self.name)?;
        match &self.snapshot {
            Some(path) => writeln!(f, "{SEP}snapshot      : {}", path.display())?,
            None => writeln!(f, "{SEP}snapshot      : none")?,
        }
        writeln!(f, "{SEP}tracing       : {}", self.tracing.as_deref().unwrap_or("default"))?;
        match self.deadline_ms {
            Some(ms) => writeln!(f, "{SEP}deadline      : {ms} ms")?,
            None => writeln!(f, "{SEP}deadline      : none")?,
        }
        writeln!(f, "{SEP}service layer : {}", self.service_layer)?;
        writeln!(f, "{SEP}default vlans : {}", self.default_vlans)
    }
}
