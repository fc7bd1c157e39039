// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The collaborators the path computation engine reads its inputs from.
//!
//! Implementors must offer a consistent point-in-time view for as long as a
//! computation holds a reference to them.

use crate::adjacency::PortAdjacency;
use crate::availability::{BandwidthAvailability, VlanAvailability};
use crate::edge::Layer;
use crate::topology::Topology;
use crate::urn::{Urn, UrnMap};
use net::bandwidth::{BwDirection, Mbps};
use ordermap::{OrderMap, OrderSet};

/// Source of per-layer topologies and URN records
pub trait TopologyProvider {
    /// The topology of one layer
    fn layer(&self, layer: Layer) -> Topology;

    /// Every known urn and its record
    fn urn_map(&self) -> &UrnMap;

    /// Customer-facing ports: ports that terminate no physical link
    fn edge_ports(&self) -> OrderSet<Urn>;

    /// The multi-layer topology of all physical layers
    fn merged(&self) -> Topology {
        let layers: Vec<Topology> = Layer::PHYSICAL.iter().map(|l| self.layer(*l)).collect();
        Topology::merge(&layers)
    }
}

/// Source of baseline availability
pub trait AvailabilityProvider {
    /// Reservable bandwidth in both directions, per urn
    fn bandwidth(&self) -> &BandwidthAvailability;

    /// Reservable VLANs per urn
    fn available_vlans(&self) -> &VlanAvailability;

    /// Reservable bandwidth in one direction, per urn
    fn available_bandwidth(&self, direction: BwDirection) -> OrderMap<Urn, Mbps> {
        self.bandwidth().in_direction(direction)
    }
}

/// Source of physical port adjacencies
pub trait AdjacencyProvider {
    fn adjacencies_originating_from(&self, port: &str) -> Vec<PortAdjacency>;
}
