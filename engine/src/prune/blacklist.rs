// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Blacklist stage of pruning

use ordermap::OrderSet;
use topology::{Topology, Urn, UrnMap};

/// The vertices a blacklist excludes from a topology: the blacklisted urns,
/// plus every port of a blacklisted device. Ports are found both in the urn
/// map and among the edges of `topo`, which must be the topology before any
/// edge was pruned.
#[must_use]
pub fn blacklisted_vertices(
    topo: &Topology,
    urn_map: &UrnMap,
    blacklist: &OrderSet<Urn>,
) -> OrderSet<Urn> {
    let mut bad = blacklist.clone();
    for urn in blacklist {
        if topo.vertex(urn.as_str()).is_none_or(|v| v.is_port()) {
            continue;
        }
        bad.extend(urn_map.ports_of(urn.as_str()).cloned());
        for edge in topo.edges().iter().filter(|e| e.touches(urn.as_str())) {
            let other = if edge.a.urn == *urn { &edge.z } else { &edge.a };
            if other.is_port() {
                bad.insert(other.urn.clone());
            }
        }
    }
    bad
}

/// `pruned` without the `bad` vertices nor the edges touching them
#[must_use]
pub fn prune_blacklist(pruned: &Topology, bad: &OrderSet<Urn>) -> Topology {
    if bad.is_empty() {
        return pruned.clone();
    }
    pruned.retain_vertices(|urn| !bad.contains(urn))
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use topology::{Edge, Layer, UrnRecord, Vertex, VertexType};

    fn topo() -> Topology {
        let dev = Vertex::new("dev", VertexType::Router);
        let mut topo = Topology::new(None);
        for port in ["dev:1", "dev:2"] {
            topo.add_edge_with_endpoints(Edge::new(dev.clone(), Vertex::port(port), 0, Layer::Internal));
            topo.add_edge_with_endpoints(Edge::new(Vertex::port(port), dev.clone(), 0, Layer::Internal));
        }
        topo.add_edge_with_endpoints(Edge::new(Vertex::port("dev:2"), Vertex::port("far:1"), 5, Layer::Mpls));
        topo.add_edge_with_endpoints(Edge::new(Vertex::port("far:1"), Vertex::port("far:2"), 5, Layer::Mpls));
        topo
    }

    #[test]
    fn test_device_takes_its_ports() {
        let blacklist: OrderSet<Urn> = ["dev".into()].into_iter().collect();
        let bad = blacklisted_vertices(&topo(), &UrnMap::new(), &blacklist);
        assert_eq!(bad.len(), 3);
        let pruned = prune_blacklist(&topo(), &bad);
        assert_eq!(pruned.vertices().len(), 2);
        assert_eq!(pruned.edges().len(), 1);
        assert!(pruned.find_edge("far:1", "far:2").is_some());
    }

    #[test]
    fn test_port_only_takes_itself() {
        let blacklist: OrderSet<Urn> = ["far:1".into(), "unknown".into()].into_iter().collect();
        let bad = blacklisted_vertices(&topo(), &UrnMap::new(), &blacklist);
        assert_eq!(bad.len(), 2);
        let pruned = prune_blacklist(&topo(), &bad);
        assert_eq!(pruned.vertices().len(), 4);
        assert_eq!(pruned.edges().len(), 4);
    }

    #[test]
    fn test_ports_found_after_internal_edges_are_gone() {
        // earlier stages dropped the device to port edges
        let stripped = topo().with_edges(
            topo().edges().iter().filter(|e| e.layer != Layer::Internal).cloned().collect::<Vec<_>>(),
        );
        let blacklist: OrderSet<Urn> = ["dev".into()].into_iter().collect();

        let bad = blacklisted_vertices(&topo(), &UrnMap::new(), &blacklist);
        let pruned = prune_blacklist(&stripped, &bad);
        assert!(pruned.find_edge("dev:2", "far:1").is_none());
        assert!(!pruned.has_vertex("dev:2"));

        let mut urns = UrnMap::new();
        urns.insert(UrnRecord::device("dev".into()));
        urns.insert(UrnRecord::port("dev:2".into(), "dev".into()));
        let bad = blacklisted_vertices(&stripped, &urns, &blacklist);
        assert!(bad.contains("dev:2"));
        assert!(!bad.contains("dev:1"));
    }
}
