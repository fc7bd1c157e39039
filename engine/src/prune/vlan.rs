// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN stage of pruning.
//!
//! A circuit uses a single VLAN end to end over the layer-2 part of its path.
//! Among the edges that survived the bandwidth stage, this stage keeps the
//! largest set that can agree on one VLAN.

use net::vlan::{Vid, VlanSet};
use ordermap::OrderMap;
use topology::{Edge, Layer, Urn, UrnMap, VlanAvailability};
use tracing::debug;

/// The VLANs a set of resources can still offer to a request: the baseline of
/// each urn (or of its device, if the urn has none itself), restricted to the
/// requested VLANs, minus what reservations hold on the urn or on its device.
///
/// Urns with no baseline anywhere are left out of the map and are unconstrained.
pub fn available_vlan_map<'u>(
    urns: impl IntoIterator<Item = &'u Urn>,
    urn_map: &UrnMap,
    baseline: &VlanAvailability,
    reserved: &OrderMap<Urn, VlanSet>,
    requested: &VlanSet,
) -> OrderMap<Urn, VlanSet> {
    let mut map = OrderMap::new();
    for urn in urns {
        let device = urn_map.device_of(urn.as_str());
        let Some(base) = baseline
            .get(urn.as_str())
            .or_else(|| device.and_then(|d| baseline.get(d.as_str())))
        else {
            continue;
        };
        let mut held = reserved.get(urn.as_str()).cloned().unwrap_or_default();
        if let Some(held_by_device) = device.and_then(|d| reserved.get(d.as_str())) {
            held = held.union(held_by_device);
        }
        map.insert(urn.clone(), base.intersection(requested).difference(&held));
    }
    map
}

/// Edges of these layers carry no VLAN tag and are never constrained
#[must_use]
pub fn bypasses_vlans(edge: &Edge) -> bool {
    matches!(edge.layer, Layer::Mpls | Layer::Logical)
}

/// The VLANs an edge admits, `None` if neither end constrains them
fn edge_vlans(edge: &Edge, avail: &OrderMap<Urn, VlanSet>) -> Option<VlanSet> {
    match (avail.get(edge.a.urn.as_str()), avail.get(edge.z.urn.as_str())) {
        (None, None) => None,
        (Some(one), None) | (None, Some(one)) => Some(one.clone()),
        (Some(a), Some(z)) => Some(a.intersection(z)),
    }
}

/// Outcome of [`max_valid_edge_set`]
#[derive(Clone, Debug)]
pub struct VlanSelection {
    /// The VLAN the kept constrained edges agree on, if any could
    pub vlan: Option<Vid>,
    pub edges: Vec<Edge>,
}

/// Pick the VLAN admitted by the largest number of constrained edges (the
/// lowest one on ties) and keep, in input order: the edges admitting it, the
/// edges no end of which is constrained, and the edges of layers that carry
/// no VLAN.
#[must_use]
pub fn max_valid_edge_set(edges: Vec<Edge>, avail: &OrderMap<Urn, VlanSet>) -> VlanSelection {
    let admitted: Vec<Option<VlanSet>> = edges
        .iter()
        .map(|e| if bypasses_vlans(e) { None } else { edge_vlans(e, avail) })
        .collect();

    let mut counts = vec![0usize; usize::from(Vid::MAX.as_u16()) + 1];
    for vid in admitted.iter().flatten().flat_map(VlanSet::iter) {
        counts[usize::from(vid.as_u16())] += 1;
    }
    let mut best: Option<(Vid, usize)> = None;
    for (raw, count) in counts.iter().enumerate().filter(|(_, c)| **c > 0) {
        if best.is_none_or(|(_, top)| *count > top) {
            let vid = u16::try_from(raw).ok().and_then(|v| Vid::new(v).ok());
            if let Some(vid) = vid {
                best = Some((vid, *count));
            }
        }
    }
    let vlan = best.map(|(vid, _)| vid);

    let edges: Vec<Edge> = edges
        .into_iter()
        .zip(admitted)
        .filter(|(_, vlans)| match vlans {
            None => true,
            Some(vlans) => vlan.is_some_and(|vid| vlans.contains(vid)),
        })
        .map(|(edge, _)| edge)
        .collect();

    match vlan {
        Some(vid) => debug!("VLAN {vid} keeps {} edges", edges.len()),
        None => debug!("No VLAN fits any constrained edge, {} edges left", edges.len()),
    }
    VlanSelection { vlan, edges }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use topology::{UrnRecord, Vertex};

    fn edge(a: &str, z: &str, layer: Layer) -> Edge {
        Edge::new(Vertex::port(a), Vertex::port(z), 1, layer)
    }

    fn set(expr: &str) -> VlanSet {
        expr.parse().unwrap()
    }

    #[test]
    fn test_available_vlan_map() {
        let mut urns = UrnMap::new();
        urns.insert(UrnRecord::device("sw".into()));
        urns.insert(UrnRecord::port("sw:1".into(), "sw".into()));
        urns.insert(UrnRecord::port("sw:2".into(), "sw".into()));
        urns.insert(UrnRecord::device("rt".into()));
        let baseline: VlanAvailability = [
            ("sw".into(), set("100-200")),
            ("sw:2".into(), set("150-160")),
        ].into_iter().collect();
        let reserved: OrderMap<Urn, VlanSet> = [
            ("sw".into(), set("100")),
            ("sw:1".into(), set("101")),
        ].into_iter().collect();
        let all: Vec<Urn> = ["sw", "sw:1", "sw:2", "rt"].into_iter().map(Urn::from).collect();

        let map = available_vlan_map(&all, &urns, &baseline, &reserved, &set("90-155"));
        assert_eq!(map.get("sw").map(ToString::to_string), Some("101-155".to_string()));
        // port inherits the device baseline and both reservations
        assert_eq!(map.get("sw:1").map(ToString::to_string), Some("102-155".to_string()));
        assert_eq!(map.get("sw:2").map(ToString::to_string), Some("150-155".to_string()));
        assert!(map.get("rt").is_none());
    }

    #[test]
    fn test_max_valid_edge_set_picks_most_shared_vlan() {
        let avail: OrderMap<Urn, VlanSet> = [
            ("a".into(), set("10-20")),
            ("b".into(), set("15-30")),
            ("c".into(), set("15")),
            ("d".into(), set("5")),
        ].into_iter().collect();
        let edges = vec![
            edge("a", "b", Layer::Ethernet),  // 15-20
            edge("b", "c", Layer::Ethernet),  // 15
            edge("c", "d", Layer::Ethernet),  // none
            edge("d", "x", Layer::Ethernet),  // 5
            edge("x", "y", Layer::Ethernet),  // unconstrained
            edge("d", "a", Layer::Mpls),      // bypass
        ];
        let selection = max_valid_edge_set(edges, &avail);
        assert_eq!(selection.vlan, Vid::new(15).ok());
        let kept: Vec<(&str, &str)> = selection.edges.iter().map(|e| (e.a.urn.as_str(), e.z.urn.as_str())).collect();
        assert_eq!(kept, vec![("a", "b"), ("b", "c"), ("x", "y"), ("d", "a")]);
    }

    #[test]
    fn test_ties_go_to_lowest_vlan() {
        let avail: OrderMap<Urn, VlanSet> = [
            ("a".into(), set("30")),
            ("b".into(), set("20")),
        ].into_iter().collect();
        let edges = vec![edge("a", "x", Layer::Ethernet), edge("b", "y", Layer::Ethernet)];
        let selection = max_valid_edge_set(edges, &avail);
        assert_eq!(selection.vlan, Vid::new(20).ok());
        assert_eq!(selection.edges.len(), 1);
        assert_eq!(selection.edges[0].a.urn.as_str(), "b");
    }

    #[test]
    fn test_no_common_vlan() {
        let avail: OrderMap<Urn, VlanSet> = [("a".into(), VlanSet::new())].into_iter().collect();
        let edges = vec![edge("a", "b", Layer::Ethernet), edge("c", "d", Layer::Ethernet)];
        let selection = max_valid_edge_set(edges, &avail);
        assert_eq!(selection.vlan, None);
        assert_eq!(selection.edges.len(), 1);
    }
}
