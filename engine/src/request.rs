// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Circuit requests and computed routes

use net::bandwidth::{Mbps, PortBandwidth};
use net::vlan::{VlanRange, VlanSet};
use ordermap::OrderSet;
use serde::{Deserialize, Serialize};
use topology::{Edge, Layer, Urn};

/// Port-level endpoint of a request, with its own VLAN and bandwidth needs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub port: Urn,
    /// acceptable VLANs; none means any
    #[serde(default)]
    pub vlans: Vec<VlanRange>,
    #[serde(default)]
    pub ingress_mbps: Mbps,
    #[serde(default)]
    pub egress_mbps: Mbps,
}

impl Fixture {
    #[must_use]
    pub fn new(port: impl Into<Urn>, vlans: Vec<VlanRange>, ingress_mbps: Mbps, egress_mbps: Mbps) -> Self {
        Self {
            port: port.into(),
            vlans,
            ingress_mbps,
            egress_mbps,
        }
    }
    /// The bandwidth the fixture consumes at its port
    #[must_use]
    pub fn bandwidth(&self) -> PortBandwidth {
        PortBandwidth::new(self.ingress_mbps, self.egress_mbps)
    }
}

/// Device-level endpoint of a request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Junction {
    pub device: Urn,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
}

impl Junction {
    #[must_use]
    pub fn new(device: impl Into<Urn>, fixtures: Vec<Fixture>) -> Self {
        Self {
            device: device.into(),
            fixtures,
        }
    }
    /// The vertex a path to or from this junction ends at: the port of its first
    /// fixture, or the device itself if it has no fixture.
    #[must_use]
    pub fn endpoint(&self) -> &Urn {
        self.fixtures.first().map_or(&self.device, |f| &f.port)
    }
}

/// A request for a bidirectional circuit between two junctions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedVlanPipe {
    pub a: Junction,
    pub z: Junction,
    pub az_mbps: Mbps,
    pub za_mbps: Mbps,
    /// resources the path must avoid
    #[serde(default)]
    pub blacklist: OrderSet<Urn>,
}

impl RequestedVlanPipe {
    #[must_use]
    pub fn new(a: Junction, z: Junction, az_mbps: Mbps, za_mbps: Mbps) -> Self {
        Self {
            a,
            z,
            az_mbps,
            za_mbps,
            blacklist: OrderSet::new(),
        }
    }
    #[must_use]
    pub fn with_blacklist(mut self, blacklist: impl IntoIterator<Item = Urn>) -> Self {
        self.blacklist.extend(blacklist);
        self
    }
    /// The fixtures of both junctions
    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.a.fixtures.iter().chain(self.z.fixtures.iter())
    }
    /// The VLANs acceptable to the request: those of any fixture, or every legal
    /// VLAN if no fixture restricts them.
    #[must_use]
    pub fn requested_vlans(&self) -> VlanSet {
        let ranges: Vec<VlanRange> = self.fixtures().flat_map(|f| f.vlans.iter().copied()).collect();
        if ranges.is_empty() {
            VlanSet::full()
        } else {
            VlanSet::from_ranges(&ranges)
        }
    }
}

/// A device-to-device shortest path query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathRequest {
    pub a: Urn,
    pub z: Urn,
    #[serde(default)]
    pub az_bw: Mbps,
    #[serde(default)]
    pub za_bw: Mbps,
}

impl ShortestPathRequest {
    /// The equivalent pipe, with fixture-less junctions
    #[must_use]
    pub fn to_pipe(&self) -> RequestedVlanPipe {
        RequestedVlanPipe::new(
            Junction::new(self.a.clone(), vec![]),
            Junction::new(self.z.clone(), vec![]),
            self.az_bw,
            self.za_bw,
        )
    }
}

/// The pair of paths computed for a circuit, keyed `az` and `za`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EroPair {
    pub az: Vec<Edge>,
    pub za: Vec<Edge>,
}

/// One hop of a route, as returned to callers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub a: Urn,
    pub z: Urn,
    pub layer: Layer,
    pub metric: u64,
}

impl From<&Edge> for Hop {
    fn from(edge: &Edge) -> Self {
        Hop {
            a: edge.a.urn.clone(),
            z: edge.z.urn.clone(),
            layer: edge.layer,
            metric: edge.metric,
        }
    }
}

/// Answer to a [`ShortestPathRequest`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathResponse {
    pub az: Vec<Hop>,
    pub za: Vec<Hop>,
}

impl From<&EroPair> for ShortestPathResponse {
    fn from(eros: &EroPair) -> Self {
        Self {
            az: eros.az.iter().map(Hop::from).collect(),
            za: eros.za.iter().map(Hop::from).collect(),
        }
    }
}

/// A possible next hop out of the last device of a path prefix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextHop {
    /// port of the last device
    pub urn: Urn,
    /// device at the far end
    pub to: Urn,
    /// port at the far end
    pub through: Urn,
}
