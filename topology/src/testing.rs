// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Topology fixtures for tests

use crate::edge::Layer;
use crate::errors::TopologyResult;
use crate::snapshot::TopologySnapshot;
use crate::vertex::VertexType;
use net::bandwidth::PortBandwidth;

/// Capacity of every port of the linear topology, both directions
pub const LINEAR_PORT_MBPS: u32 = 1000;

/// Metric of every non-internal link of the fixtures
pub const LINK_METRIC: u64 = 100;

/// Five devices in a row, each with ports `:1` and `:2`:
///
/// ```text
///  switchA:2 ══ routerB:1  routerB:2 ── routerC:1  routerC:2 ── routerD:1  routerD:2 ══ switchE:1
///    (ethernet)                (mpls)                  (mpls)                  (ethernet)
/// ```
///
/// Switches live in the ethernet layer, routers in the mpls layer. Every link
/// exists in both directions with metric [`LINK_METRIC`]; internal port/device
/// edges cost 0. Switches admit VLANs 1000-2000, routers carry no VLAN record.
///
/// # Errors
///
/// Never, unless the snapshot builder is broken.
pub fn linear() -> TopologyResult<TopologySnapshot> {
    let mut snapshot = TopologySnapshot::new();
    let devices = [
        ("switchA", VertexType::Switch, Layer::Ethernet),
        ("routerB", VertexType::Router, Layer::Mpls),
        ("routerC", VertexType::Router, Layer::Mpls),
        ("routerD", VertexType::Router, Layer::Mpls),
        ("switchE", VertexType::Switch, Layer::Ethernet),
    ];
    for (urn, model, layer) in devices {
        snapshot.add_device(urn, model, layer)?;
        for port in [":1", ":2"] {
            snapshot.add_port(
                format!("{urn}{port}"),
                urn,
                Some(PortBandwidth::symmetric(LINEAR_PORT_MBPS)),
                None,
            )?;
        }
        if layer == Layer::Ethernet {
            snapshot.set_device_vlans(urn, "1000-2000".parse().map_err(|e| {
                crate::TopologyError::InvalidVlans(urn.into(), e)
            })?)?;
        }
    }
    let links = [
        ("switchA:2", "routerB:1", Layer::Ethernet),
        ("routerB:2", "routerC:1", Layer::Mpls),
        ("routerC:2", "routerD:1", Layer::Mpls),
        ("routerD:2", "switchE:1", Layer::Ethernet),
    ];
    for (a, z, layer) in links {
        snapshot.add_bidirectional_link(&a.into(), &z.into(), layer, LINK_METRIC)?;
    }
    Ok(snapshot)
}

/// Two paths between the switches `west` and `east`, all in the ethernet layer:
///
/// ```text
///            north (100 Mbps, vlans 100-199)
///          /                                 \
///  west:1 west                               east  east:3
///          \                                 /
///            south (1000 Mbps, vlans 150-299)
/// ```
///
/// The north path is shorter. Ports `west:1` and `east:3` face customers.
pub const DIAMOND_YAML: &str = r#"
devices:
  - urn: west
    model: switch
    layer: ethernet
    vlans: "100-299"
    ports:
      - {urn: "west:1", ingress: 1000, egress: 1000}
      - {urn: "west:2", ingress: 1000, egress: 1000}
      - {urn: "west:3", ingress: 1000, egress: 1000}
  - urn: north
    model: switch
    layer: ethernet
    vlans: "100-199"
    ports:
      - {urn: "north:1", ingress: 100, egress: 100}
      - {urn: "north:2", ingress: 100, egress: 100}
  - urn: south
    model: switch
    layer: ethernet
    vlans: "150-299"
    ports:
      - {urn: "south:1", ingress: 1000, egress: 1000}
      - {urn: "south:2", ingress: 1000, egress: 1000}
  - urn: east
    model: switch
    layer: ethernet
    vlans: "100-299"
    ports:
      - {urn: "east:1", ingress: 1000, egress: 1000}
      - {urn: "east:2", ingress: 1000, egress: 1000}
      - {urn: "east:3", ingress: 1000, egress: 1000}
links:
  - {a: "west:2", z: "north:1", layer: ethernet, metric: 10}
  - {a: "north:2", z: "east:1", layer: ethernet, metric: 10}
  - {a: "west:3", z: "south:1", layer: ethernet, metric: 20}
  - {a: "south:2", z: "east:2", layer: ethernet, metric: 20}
"#;

/// The diamond topology of [`DIAMOND_YAML`]
///
/// # Errors
///
/// Never, unless the YAML loader is broken.
pub fn diamond() -> TopologyResult<TopologySnapshot> {
    TopologySnapshot::from_yaml_str(DIAMOND_YAML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::TopologyProvider;

    #[test]
    fn test_fixtures_build() {
        let linear = linear().unwrap();
        assert_eq!(linear.urn_map().len(), 15);
        assert_eq!(linear.layer(Layer::Ethernet).edges().len(), 4);
        assert_eq!(linear.layer(Layer::Mpls).edges().len(), 4);
        assert_eq!(linear.layer(Layer::Internal).edges().len(), 20);
        assert_eq!(linear.merged().edges().len(), 28);

        let diamond = diamond().unwrap();
        let edge_ports = diamond.edge_ports();
        assert_eq!(edge_ports.len(), 2);
        assert!(edge_ports.contains("west:1") && edge_ports.contains("east:3"));
    }
}
