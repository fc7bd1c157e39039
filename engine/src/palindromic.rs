// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Palindromic route synthesis: compute the a-to-z route of a pipe and derive
//! the z-to-a route from it, hop for hop, over the same physical resources.

use crate::dijkstra::shortest_path;
use crate::errors::{PceError, PceResult};
use crate::prune::{PruningContext, prune_edge_ports_except};
use crate::request::{EroPair, RequestedVlanPipe};
use crate::servicetopo::ServiceLayerTopology;
use ordermap::OrderSet;
use std::time::Instant;
use topology::{
    AvailabilityProvider, Edge, ReservedBandwidth, ReservedVlan, ScheduleSpec, Topology,
    TopologyProvider, Urn,
};
use tracing::{debug, error, warn};

/// Knobs of a route computation
#[derive(Clone, Copy, Debug, Default)]
pub struct EroOptions {
    /// give up past this instant
    pub deadline: Option<Instant>,
    /// route over the service layer, then expand logical hops
    pub service_layer: bool,
}

/// The reverse of every hop of a path, in reverse order.
///
/// # Errors
///
/// Fails with [`PceError::MissingReverseEdge`] if some hop has no reverse in
/// the topology.
pub fn mirror(topo: &Topology, path: &[Edge]) -> PceResult<Vec<Edge>> {
    let mut reversed = Vec::with_capacity(path.len());
    for hop in path {
        let back = topo
            .edges()
            .iter()
            .find(|e| e.is_reverse_of(hop) && e.layer == hop.layer)
            .or_else(|| topo.reverse_of(hop))
            .ok_or_else(|| PceError::MissingReverseEdge(hop.a.urn.clone(), hop.z.urn.clone()))?;
        reversed.push(back.clone());
    }
    reversed.reverse();
    Ok(reversed)
}

fn known_urn<'a>(provider: &impl TopologyProvider, urn: &'a Urn) -> PceResult<&'a Urn> {
    if provider.urn_map().contains(urn.as_str()) {
        Ok(urn)
    } else {
        Err(PceError::NoSuchUrn(urn.clone()))
    }
}

/// Compute the a-to-z and z-to-a routes of a pipe.
///
/// Reservations overlapping `schedule` are subtracted from the provider's
/// availability before the topology is pruned for the pipe. The z-to-a route
/// uses the reverse of every a-to-z hop.
///
/// # Errors
///
/// - [`PceError::NoSuchUrn`] if an endpoint of the pipe is unknown
/// - [`PceError::NoPath`] if the pruned topology does not connect the endpoints
/// - [`PceError::MissingReverseEdge`] if some hop cannot be traversed backwards
/// - [`PceError::AsymmetricEro`] if the routes end up with different lengths
/// - [`PceError::DeadlineExceeded`] if the deadline passes
pub fn compute_palindromic_ero<P: TopologyProvider + AvailabilityProvider>(
    provider: &P,
    pipe: &RequestedVlanPipe,
    schedule: &ScheduleSpec,
    reserved_bw: &[ReservedBandwidth],
    reserved_vlans: &[ReservedVlan],
    options: EroOptions,
) -> PceResult<EroPair> {
    let src = known_urn(provider, pipe.a.endpoint())?;
    let dst = known_urn(provider, pipe.z.endpoint())?;

    let ctx = PruningContext::new(provider).with_reservations(schedule, reserved_bw, reserved_vlans);
    let pruned = ctx.prune_with_pipe(&provider.merged(), pipe);
    let terminating: OrderSet<Urn> = pipe
        .fixtures()
        .map(|f| f.port.clone())
        .chain([src.clone(), dst.clone()])
        .collect();
    let pruned = prune_edge_ports_except(&pruned, &provider.edge_ports(), &terminating);

    let az = if options.service_layer {
        let service = ServiceLayerTopology::from_provider(provider, &pruned, &[src, dst], options.deadline)?;
        let hops = shortest_path(&service.to_topology(), src.as_str(), dst.as_str(), options.deadline)?;
        service.expand(&hops)?
    } else {
        shortest_path(&pruned, src.as_str(), dst.as_str(), options.deadline)?
    };
    if az.is_empty() {
        warn!("No path from {src} to {dst}");
        return Err(PceError::NoPath(src.clone(), dst.clone()));
    }

    let za = mirror(&pruned, &az)?;
    if az.len() != za.len() {
        error!("A-Z route has {} hops but Z-A route has {}", az.len(), za.len());
        return Err(PceError::AsymmetricEro(az.len(), za.len()));
    }
    let eros = EroPair { az, za };
    debug!("Computed route {src} <-> {dst}:\n{eros}");
    Ok(eros)
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::request::{Fixture, Junction};
    use chrono::TimeDelta;
    use net::bandwidth::PortBandwidth;
    use pretty_assertions::assert_eq;
    use topology::testing::diamond;
    use topology::{Layer, TopologySnapshot, VertexType};

    fn schedule() -> ScheduleSpec {
        ScheduleSpec::starting_now(TimeDelta::hours(1)).unwrap()
    }

    fn pipe(az: u32, za: u32) -> RequestedVlanPipe {
        RequestedVlanPipe::new(
            Junction::new("west", vec![Fixture::new("west:1", vec![], 10, 10)]),
            Junction::new("east", vec![Fixture::new("east:3", vec![], 10, 10)]),
            az,
            za,
        )
    }

    fn ends(path: &[Edge]) -> Vec<(&str, &str)> {
        path.iter().map(|e| (e.a.urn.as_str(), e.z.urn.as_str())).collect()
    }

    #[test]
    fn test_mirror() {
        let snapshot = diamond().unwrap();
        let merged = snapshot.merged();
        let az = vec![
            merged.find_edge("west", "west:2").unwrap().clone(),
            merged.find_edge("west:2", "north:1").unwrap().clone(),
        ];
        let za = mirror(&merged, &az).unwrap();
        assert_eq!(ends(&za), vec![("north:1", "west:2"), ("west:2", "west")]);

        let one_way = merged.with_edges(az.iter().cloned());
        assert_eq!(
            mirror(&one_way, &az).err(),
            Some(PceError::MissingReverseEdge("west".into(), "west:2".into()))
        );
    }

    #[test]
    fn test_diamond_prefers_north_until_too_thin() {
        let snapshot = diamond().unwrap();
        let eros = compute_palindromic_ero(&snapshot, &pipe(50, 50), &schedule(), &[], &[], EroOptions::default()).unwrap();
        assert!(eros.az.iter().any(|e| e.touches("north")));
        assert_eq!(eros.az.len(), eros.za.len());

        let eros = compute_palindromic_ero(&snapshot, &pipe(500, 50), &schedule(), &[], &[], EroOptions::default()).unwrap();
        assert!(eros.az.iter().any(|e| e.touches("south")));
        assert!(eros.za.iter().all(|e| !e.touches("north")));
    }

    #[test]
    fn test_errors() {
        let snapshot = diamond().unwrap();
        let unknown = RequestedVlanPipe::new(Junction::new("nowhere", vec![]), Junction::new("east", vec![]), 1, 1);
        let err = compute_palindromic_ero(&snapshot, &unknown, &schedule(), &[], &[], EroOptions::default()).unwrap_err();
        assert_eq!(err, PceError::NoSuchUrn("nowhere".into()));

        let err = compute_palindromic_ero(&snapshot, &pipe(5000, 5000), &schedule(), &[], &[], EroOptions::default()).unwrap_err();
        assert_eq!(err, PceError::NoPath("west:1".into(), "east:3".into()));
    }

    #[test]
    fn test_reservations_steer_the_route() {
        let snapshot = diamond().unwrap();
        let window = schedule();
        let reserved = vec![ReservedBandwidth {
            urn: "north:2".into(),
            bandwidth: PortBandwidth::symmetric(60),
            schedule: window,
        }];
        let eros = compute_palindromic_ero(&snapshot, &pipe(50, 50), &window, &reserved, &[], EroOptions::default()).unwrap();
        assert!(eros.az.iter().all(|e| !e.touches("north")));
    }

    #[test]
    fn test_one_way_link_has_no_palindrome() {
        let mut snapshot = TopologySnapshot::new();
        snapshot.add_device("a", VertexType::Switch, Layer::Ethernet).unwrap();
        snapshot.add_device("z", VertexType::Switch, Layer::Ethernet).unwrap();
        snapshot.add_port("a:1", "a", None, None).unwrap();
        snapshot.add_port("z:1", "z", None, None).unwrap();
        snapshot.add_link(&"a:1".into(), &"z:1".into(), Layer::Ethernet, 1).unwrap();
        let pipe = RequestedVlanPipe::new(Junction::new("a", vec![]), Junction::new("z", vec![]), 1, 1);
        let err = compute_palindromic_ero(&snapshot, &pipe, &schedule(), &[], &[], EroOptions::default()).unwrap_err();
        assert_eq!(err, PceError::MissingReverseEdge("a:1".into(), "z:1".into()));
    }
}
