// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Topology pruning: reduce a topology to the edges a request may use.
//!
//! Pruning runs three stages in order, each a pure function of the previous
//! stage's output: bandwidth, VLANs, blacklist. Bandwidth and VLAN stages only
//! drop edges; the blacklist stage drops vertices too.

pub mod bandwidth;
pub mod blacklist;
pub mod vlan;

pub use bandwidth::Demand;

use crate::request::RequestedVlanPipe;
use net::vlan::VlanSet;
use ordermap::{OrderMap, OrderSet};
use std::borrow::Cow;
use topology::{
    AvailabilityProvider, BandwidthAvailability, ReservedBandwidth, ReservedVlan, ScheduleSpec,
    Topology, TopologyProvider, Urn, UrnMap, VlanAvailability, availability::reserved_vlans_during,
};
use tracectl::trace_target;
use tracing::debug;

trace_target!("pruning", tracectl::LevelFilter::INFO, &["pce", "engine"]);

/// The availability a pruning runs against, with reservations already applied
#[derive(Clone, Debug)]
pub struct PruningContext<'a> {
    urn_map: &'a UrnMap,
    bandwidth: Cow<'a, BandwidthAvailability>,
    vlans: &'a VlanAvailability,
    reserved_vlans: OrderMap<Urn, VlanSet>,
}

impl<'a> PruningContext<'a> {
    /// A context over the baseline availability of a provider
    #[must_use]
    pub fn new<P: TopologyProvider + AvailabilityProvider>(provider: &'a P) -> Self {
        Self {
            urn_map: provider.urn_map(),
            bandwidth: Cow::Borrowed(provider.bandwidth()),
            vlans: provider.available_vlans(),
            reserved_vlans: OrderMap::new(),
        }
    }

    /// Subtract the reservations that overlap a schedule
    #[must_use]
    pub fn with_reservations(
        mut self,
        schedule: &ScheduleSpec,
        reserved_bw: &[ReservedBandwidth],
        reserved_vlans: &[ReservedVlan],
    ) -> Self {
        if !reserved_bw.is_empty() {
            self.bandwidth = Cow::Owned(self.bandwidth.minus_reserved(reserved_bw, schedule));
        }
        for (urn, held) in reserved_vlans_during(reserved_vlans, schedule) {
            let entry = self.reserved_vlans.entry(urn).or_default();
            *entry = entry.union(&held);
        }
        self
    }

    #[must_use]
    pub fn urn_map(&self) -> &UrnMap {
        self.urn_map
    }

    /// Prune for both directions of a pipe at once
    #[must_use]
    pub fn prune_with_pipe(&self, topo: &Topology, pipe: &RequestedVlanPipe) -> Topology {
        let demand = Demand::Bidirectional {
            az: pipe.az_mbps,
            za: pipe.za_mbps,
        };
        self.prune(topo, demand, pipe)
    }

    /// Prune for the a-to-z direction of a pipe only
    #[must_use]
    pub fn prune_with_pipe_az(&self, topo: &Topology, pipe: &RequestedVlanPipe) -> Topology {
        self.prune(topo, Demand::Unidirectional(pipe.az_mbps), pipe)
    }

    /// Prune for the z-to-a direction of a pipe only
    #[must_use]
    pub fn prune_with_pipe_za(&self, topo: &Topology, pipe: &RequestedVlanPipe) -> Topology {
        self.prune(topo, Demand::Unidirectional(pipe.za_mbps), pipe)
    }

    fn prune(&self, topo: &Topology, demand: Demand, pipe: &RequestedVlanPipe) -> Topology {
        let fixtures = bandwidth::fixture_bandwidth_map(pipe.fixtures());
        let edges = bandwidth::filter_edges(topo.edges(), demand, &self.bandwidth, &fixtures);
        debug!(
            "Bandwidth pruning ({demand:?}) kept {} of {} edges",
            edges.len(),
            topo.edges().len()
        );

        let edges = if topo.layer() == Some(topology::Layer::Mpls) || edges.is_empty() {
            edges
        } else {
            let avail = vlan::available_vlan_map(
                topo.vertices().iter().map(|v| &v.urn),
                self.urn_map,
                self.vlans,
                &self.reserved_vlans,
                &pipe.requested_vlans(),
            );
            vlan::max_valid_edge_set(edges, &avail).edges
        };

        let bad = blacklist::blacklisted_vertices(topo, self.urn_map, &pipe.blacklist);
        let pruned = blacklist::prune_blacklist(&topo.with_edges(edges), &bad);
        debug!(
            "Pruned topology has {} vertices and {} edges",
            pruned.vertices().len(),
            pruned.edges().len()
        );
        pruned
    }
}

/// A topology without the customer-facing ports a request does not terminate
/// at, so that no path transits through another customer's port
#[must_use]
pub fn prune_edge_ports_except(
    topo: &Topology,
    edge_ports: &OrderSet<Urn>,
    keep: &OrderSet<Urn>,
) -> Topology {
    topo.retain_vertices(|urn| !edge_ports.contains(urn) || keep.contains(urn))
}
