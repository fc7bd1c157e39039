// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Shortest path under a plain bandwidth constraint, over a chosen set of layers

use crate::dijkstra::shortest_path;
use crate::errors::{PceError, PceResult};
use crate::prune::Demand;
use crate::prune::bandwidth::filter_edges;
use net::bandwidth::Mbps;
use ordermap::OrderMap;
use std::time::Instant;
use topology::{AvailabilityProvider, Edge, Layer, Topology, TopologyProvider};
use tracing::debug;

/// The shortest path from `a` to `z` over the given layers, using only edges
/// whose ends can carry `mbps` in the direction of the edge. Edges found in
/// several layers are taken from the internal one if it has them.
///
/// Returns an empty path if `z` cannot be reached.
///
/// # Errors
///
/// Fails with [`PceError::NoSuchUrn`] if either end is unknown, and with
/// [`PceError::DeadlineExceeded`] if the deadline passes.
pub fn bandwidth_constrained_path<P: TopologyProvider + AvailabilityProvider>(
    provider: &P,
    a: &str,
    z: &str,
    mbps: Mbps,
    layers: &[Layer],
    deadline: Option<Instant>,
) -> PceResult<Vec<Edge>> {
    for urn in [a, z] {
        if !provider.urn_map().contains(urn) {
            return Err(PceError::NoSuchUrn(urn.into()));
        }
    }
    let topologies: Vec<Topology> = layers.iter().map(|l| provider.layer(*l)).collect();
    let merged = Topology::merge(&topologies);
    let edges = filter_edges(
        merged.edges(),
        Demand::Unidirectional(mbps),
        provider.bandwidth(),
        &OrderMap::new(),
    );
    debug!(
        "{} of {} edges over {layers:?} can carry {mbps} Mbps",
        edges.len(),
        merged.edges().len()
    );
    shortest_path(&merged.with_edges(edges), a, z, deadline)
}
