// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Bandwidth stage of pruning

use crate::request::Fixture;
use net::bandwidth::{Mbps, PortBandwidth};
use ordermap::OrderMap;
use topology::{BandwidthAvailability, Edge, Urn};

/// The bandwidth a request must find on every edge it may use
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Demand {
    /// `az` from a to z on every edge, `za` in the opposite direction
    Bidirectional { az: Mbps, za: Mbps },
    /// a single direction, the one of the edge
    Unidirectional(Mbps),
}

impl Demand {
    /// What the `a` end of an edge must admit, as (ingress, egress)
    fn at_a(self) -> (Mbps, Mbps) {
        match self {
            Demand::Bidirectional { az, za } => (za, az),
            Demand::Unidirectional(bw) => (0, bw),
        }
    }
    /// What the `z` end of an edge must admit, as (ingress, egress)
    fn at_z(self) -> (Mbps, Mbps) {
        match self {
            Demand::Bidirectional { az, za } => (az, za),
            Demand::Unidirectional(bw) => (bw, 0),
        }
    }
}

/// The bandwidth each fixture port will carry for the request itself
pub fn fixture_bandwidth_map<'f>(
    fixtures: impl IntoIterator<Item = &'f Fixture>,
) -> OrderMap<Urn, PortBandwidth> {
    let mut map: OrderMap<Urn, PortBandwidth> = OrderMap::new();
    for fixture in fixtures {
        let used = map.entry(fixture.port.clone()).or_default();
        used.ingress = used.ingress.saturating_add(fixture.ingress_mbps);
        used.egress = used.egress.saturating_add(fixture.egress_mbps);
    }
    map
}

/// What a urn must admit for a demand, as (ingress, egress). At a fixture port
/// the request carries the fixture's own traffic, and that traffic is counted
/// once whether it comes from the fixture or from the pipe.
fn required_at(
    urn: &str,
    (ingress, egress): (Mbps, Mbps),
    fixtures: &OrderMap<Urn, PortBandwidth>,
) -> (Mbps, Mbps) {
    match fixtures.get(urn) {
        Some(used) => (ingress.max(used.ingress), egress.max(used.egress)),
        None => (ingress, egress),
    }
}

/// Tell if both ends of an edge have enough bandwidth for a demand. Urns with
/// no bandwidth record always do.
#[must_use]
pub fn edge_admits(
    edge: &Edge,
    demand: Demand,
    table: &BandwidthAvailability,
    fixtures: &OrderMap<Urn, PortBandwidth>,
) -> bool {
    let fits = |urn: &Urn, need: (Mbps, Mbps)| {
        table.get(urn.as_str()).is_none_or(|bw| {
            let (ingress, egress) = required_at(urn.as_str(), need, fixtures);
            bw.admits(ingress, egress)
        })
    };
    fits(&edge.a.urn, demand.at_a()) && fits(&edge.z.urn, demand.at_z())
}

/// The edges whose ends have enough bandwidth for a demand, in input order
pub fn filter_edges<'e>(
    edges: impl IntoIterator<Item = &'e Edge>,
    demand: Demand,
    table: &BandwidthAvailability,
    fixtures: &OrderMap<Urn, PortBandwidth>,
) -> Vec<Edge> {
    edges
        .into_iter()
        .filter(|e| edge_admits(e, demand, table, fixtures))
        .cloned()
        .collect()
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use topology::{Layer, Vertex};

    fn table() -> BandwidthAvailability {
        [
            ("a".into(), PortBandwidth::new(50, 100)),
            ("z".into(), PortBandwidth::new(100, 30)),
        ].into_iter().collect()
    }

    fn edge() -> Edge {
        Edge::new(Vertex::port("a"), Vertex::port("z"), 1, Layer::Ethernet)
    }

    #[test]
    fn test_bidirectional_checks_all_four_sides() {
        let none = OrderMap::new();
        assert!(edge_admits(&edge(), Demand::Bidirectional { az: 100, za: 30 }, &table(), &none));
        // za limited by egress at z
        assert!(!edge_admits(&edge(), Demand::Bidirectional { az: 100, za: 31 }, &table(), &none));
        // az limited by egress at a and ingress at z
        assert!(!edge_admits(&edge(), Demand::Bidirectional { az: 101, za: 0 }, &table(), &none));
    }

    #[test]
    fn test_unidirectional() {
        let none = OrderMap::new();
        assert!(edge_admits(&edge(), Demand::Unidirectional(100), &table(), &none));
        assert!(!edge_admits(&edge(), Demand::Unidirectional(101), &table(), &none));
    }

    #[test]
    fn test_missing_record_is_unconstrained() {
        let none = OrderMap::new();
        let open = Edge::new(Vertex::port("x"), Vertex::port("y"), 1, Layer::Ethernet);
        assert!(edge_admits(&open, Demand::Unidirectional(u32::MAX), &table(), &none));
    }

    #[test]
    fn test_fixture_traffic_is_counted_once() {
        let fixtures = [
            Fixture::new("a", vec![], 0, 40),
            Fixture::new("a", vec![], 0, 40),
        ];
        let used = fixture_bandwidth_map(&fixtures);
        assert_eq!(used.get("a"), Some(&PortBandwidth::new(0, 80)));
        // the fixtures alone fit the egress of 100 at a, whatever the pipe asks
        assert!(edge_admits(&edge(), Demand::Unidirectional(20), &table(), &used));
        assert!(edge_admits(&edge(), Demand::Unidirectional(100), &table(), &used));
        assert!(!edge_admits(&edge(), Demand::Unidirectional(101), &table(), &used));

        let crowded = fixture_bandwidth_map(&[Fixture::new("a", vec![], 0, 60), Fixture::new("a", vec![], 0, 60)]);
        assert!(!edge_admits(&edge(), Demand::Unidirectional(20), &table(), &crowded));
        let kept = filter_edges([&edge()], Demand::Unidirectional(20), &table(), &crowded);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_exactly_sufficient_fixture_ports() {
        let full: BandwidthAvailability = [
            ("a:1".into(), PortBandwidth::symmetric(100)),
            ("z:2".into(), PortBandwidth::symmetric(100)),
        ].into_iter().collect();
        let fixtures = fixture_bandwidth_map(&[
            Fixture::new("a:1", vec![], 100, 100),
            Fixture::new("z:2", vec![], 100, 100),
        ]);
        let link = Edge::new(Vertex::port("a:1"), Vertex::port("z:2"), 1, Layer::Ethernet);
        assert!(edge_admits(&link, Demand::Bidirectional { az: 100, za: 100 }, &full, &fixtures));
        assert!(!edge_admits(&link, Demand::Bidirectional { az: 101, za: 100 }, &full, &fixtures));
    }
}
