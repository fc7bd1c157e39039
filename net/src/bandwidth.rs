// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Bandwidth quantities and directions.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Bandwidth in megabits per second.
pub type Mbps = u32;

/// The direction of traffic with respect to a port.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BwDirection {
    /// Traffic entering the port
    Ingress,
    /// Traffic leaving the port
    Egress,
}

impl Display for BwDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BwDirection::Ingress => write!(f, "ingress"),
            BwDirection::Egress => write!(f, "egress"),
        }
    }
}

/// Ingress and egress bandwidth of a resource.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortBandwidth {
    /// Ingress bandwidth
    pub ingress: Mbps,
    /// Egress bandwidth
    pub egress: Mbps,
}

impl PortBandwidth {
    /// Build a [`PortBandwidth`] from ingress and egress values.
    #[must_use]
    pub const fn new(ingress: Mbps, egress: Mbps) -> Self {
        Self { ingress, egress }
    }

    /// Same bandwidth in both directions.
    #[must_use]
    pub const fn symmetric(mbps: Mbps) -> Self {
        Self::new(mbps, mbps)
    }

    /// Get the bandwidth in the given direction.
    #[must_use]
    pub const fn get(&self, direction: BwDirection) -> Mbps {
        match direction {
            BwDirection::Ingress => self.ingress,
            BwDirection::Egress => self.egress,
        }
    }

    /// Subtract another [`PortBandwidth`], direction by direction, saturating at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: PortBandwidth) -> PortBandwidth {
        PortBandwidth {
            ingress: self.ingress.saturating_sub(other.ingress),
            egress: self.egress.saturating_sub(other.egress),
        }
    }

    /// Tell if both directions can carry the given amounts.
    #[must_use]
    pub const fn admits(&self, ingress: Mbps, egress: Mbps) -> bool {
        self.ingress >= ingress && self.egress >= egress
    }
}

impl Display for PortBandwidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "in: {} Mbps, eg: {} Mbps", self.ingress, self.egress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_sub() {
        let avail = PortBandwidth::new(100, 50);
        let used = PortBandwidth::new(30, 80);
        assert_eq!(avail.saturating_sub(used), PortBandwidth::new(70, 0));
    }

    #[test]
    fn test_admits() {
        let bw = PortBandwidth::new(20, 10);
        assert!(bw.admits(20, 10));
        assert!(!bw.admits(21, 10));
        assert!(!bw.admits(0, 11));
        assert_eq!(bw.get(BwDirection::Egress), 10);
    }
}
