// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! In-memory topology snapshot: the inventory as of one point in time, loadable
//! from YAML, implementing every provider trait.

use crate::adjacency::{AdjacencyTable, PortAdjacency};
use crate::availability::{BandwidthAvailability, VlanAvailability};
use crate::edge::{Edge, Layer};
use crate::errors::{TopologyError, TopologyResult};
use crate::provider::{AdjacencyProvider, AvailabilityProvider, TopologyProvider};
use crate::topology::Topology;
use crate::urn::{Urn, UrnMap, UrnRecord, UrnType};
use crate::vertex::{Vertex, VertexType};
use net::bandwidth::{Mbps, PortBandwidth};
use net::vlan::VlanSet;
use ordermap::{OrderMap, OrderSet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A port, as listed in a snapshot document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortSpec {
    pub urn: Urn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<Mbps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egress: Option<Mbps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlans: Option<VlanSet>,
}

/// A device and its ports, as listed in a snapshot document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub urn: Urn,
    #[serde(default = "default_model")]
    pub model: VertexType,
    pub layer: Layer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlans: Option<VlanSet>,
    #[serde(default)]
    pub ports: Vec<PortSpec>,
}
fn default_model() -> VertexType {
    VertexType::Device
}

/// A physical link between two ports, as listed in a snapshot document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkSpec {
    pub a: Urn,
    pub z: Urn,
    pub layer: Layer,
    pub metric: u64,
    /// also add the z -> a edge
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
}
fn default_bidirectional() -> bool {
    true
}

/// The YAML document a snapshot is loaded from
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotDoc {
    #[serde(default)]
    pub devices: Vec<DeviceSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Clone, Debug, Default)]
pub struct TopologySnapshot {
    layers: OrderMap<Layer, Topology>,
    urn_map: UrnMap,
    device_layer: OrderMap<Urn, Layer>,
    bandwidth: BandwidthAvailability,
    vlans: VlanAvailability,
    adjacencies: AdjacencyTable,
}

impl TopologySnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Topology {
        self.layers
            .entry(layer)
            .or_insert_with(|| Topology::new(Some(layer)))
    }

    /// Add a device vertex to a layer.
    ///
    /// # Errors
    ///
    /// Fails if the urn is already known.
    pub fn add_device(
        &mut self,
        urn: impl Into<Urn>,
        model: VertexType,
        layer: Layer,
    ) -> TopologyResult<()> {
        let urn = urn.into();
        if self.urn_map.contains(urn.as_str()) {
            return Err(TopologyError::DuplicateUrn(urn));
        }
        self.urn_map.insert(UrnRecord::device(urn.clone()));
        self.device_layer.insert(urn.clone(), layer);
        self.layer_mut(layer).add_vertex(Vertex::new(urn, model));
        Ok(())
    }

    /// Set the baseline reservable VLANs of a device, inherited by ports without
    /// their own.
    ///
    /// # Errors
    ///
    /// Fails if the device is unknown.
    pub fn set_device_vlans(&mut self, device: &str, vlans: VlanSet) -> TopologyResult<()> {
        if !self.device_layer.contains_key(device) {
            return Err(TopologyError::NoSuchUrn(device.into()));
        }
        self.vlans.insert(device.into(), vlans);
        Ok(())
    }

    /// Add a port to a device, along with the zero-cost internal edges joining them.
    ///
    /// # Errors
    ///
    /// Fails if the urn is already known or the device is not.
    pub fn add_port(
        &mut self,
        urn: impl Into<Urn>,
        device: &str,
        bandwidth: Option<PortBandwidth>,
        vlans: Option<VlanSet>,
    ) -> TopologyResult<()> {
        let urn = urn.into();
        if self.urn_map.contains(urn.as_str()) {
            return Err(TopologyError::DuplicateUrn(urn));
        }
        let Some(layer) = self.device_layer.get(device).copied() else {
            return Err(TopologyError::NoSuchDevice(urn, device.into()));
        };
        let dev_vertex = self
            .layer_mut(layer)
            .vertex(device)
            .cloned()
            .ok_or_else(|| TopologyError::NoSuchDevice(urn.clone(), device.into()))?;
        let port = Vertex::port(urn.clone());

        self.urn_map
            .insert(UrnRecord::port(urn.clone(), dev_vertex.urn.clone()));
        self.layer_mut(layer).add_vertex(port.clone());
        let internal = self.layer_mut(Layer::Internal);
        internal.add_edge(Edge::new(port.clone(), dev_vertex.clone(), 0, Layer::Internal));
        internal.add_edge(Edge::new(dev_vertex, port, 0, Layer::Internal));

        if let Some(bw) = bandwidth {
            self.bandwidth.insert(urn.clone(), bw);
        }
        if let Some(vlans) = vlans {
            self.vlans.insert(urn, vlans);
        }
        Ok(())
    }

    fn port_vertex(&self, urn: &Urn) -> Option<(Vertex, Urn)> {
        let record = self.urn_map.get(urn.as_str())?;
        if record.urn_type != UrnType::Port {
            return None;
        }
        Some((Vertex::port(urn.clone()), record.device.clone()?))
    }

    /// Add a directed physical link between two ports.
    ///
    /// # Errors
    ///
    /// Fails if either end is not a known port.
    pub fn add_link(&mut self, a: &Urn, z: &Urn, layer: Layer, metric: u64) -> TopologyResult<()> {
        let ((a_port, _), (z_port, z_device)) = self
            .port_vertex(a)
            .zip(self.port_vertex(z))
            .ok_or_else(|| TopologyError::NotAPort(a.clone(), z.clone()))?;
        if layer == Layer::Logical {
            return Err(TopologyError::InvalidSnapshot(format!(
                "link {a} -> {z} cannot be logical"
            )));
        }
        self.layer_mut(layer)
            .add_edge(Edge::new(a_port, z_port, metric, layer));
        self.adjacencies
            .add_adjacency(PortAdjacency::new(a.clone(), z.clone(), z_device));
        Ok(())
    }

    /// Add a link in both directions, with the same metric.
    ///
    /// # Errors
    ///
    /// Fails if either end is not a known port.
    pub fn add_bidirectional_link(
        &mut self,
        a: &Urn,
        z: &Urn,
        layer: Layer,
        metric: u64,
    ) -> TopologyResult<()> {
        self.add_link(a, z, layer, metric)?;
        self.add_link(z, a, layer, metric)
    }

    /// Build a snapshot from its document.
    ///
    /// # Errors
    ///
    /// Fails on duplicate or dangling urns, links between non-ports, ports with
    /// only one bandwidth direction, and duplicate bandwidth records.
    pub fn from_doc(doc: &SnapshotDoc) -> TopologyResult<Self> {
        let mut snapshot = TopologySnapshot::new();
        let mut bw_records = Vec::new();
        for dev in &doc.devices {
            snapshot.add_device(dev.urn.clone(), dev.model, dev.layer)?;
            if let Some(vlans) = &dev.vlans {
                snapshot.set_device_vlans(dev.urn.as_str(), vlans.clone())?;
            }
            for port in &dev.ports {
                let bw = match (port.ingress, port.egress) {
                    (Some(ingress), Some(egress)) => Some(PortBandwidth::new(ingress, egress)),
                    (None, None) => None,
                    _ => {
                        return Err(TopologyError::InvalidSnapshot(format!(
                            "port {} must have both ingress and egress bandwidth, or neither",
                            port.urn
                        )));
                    }
                };
                if let Some(bw) = bw {
                    bw_records.push((port.urn.clone(), bw));
                }
                snapshot.add_port(port.urn.clone(), dev.urn.as_str(), None, port.vlans.clone())?;
            }
        }
        snapshot.bandwidth = BandwidthAvailability::try_from_records(bw_records)?;
        for link in &doc.links {
            if link.bidirectional {
                snapshot.add_bidirectional_link(&link.a, &link.z, link.layer, link.metric)?;
            } else {
                snapshot.add_link(&link.a, &link.z, link.layer, link.metric)?;
            }
        }
        debug!(
            "Built snapshot with {} urns, {} bandwidth records and {} vlan records",
            snapshot.urn_map.len(),
            snapshot.bandwidth.len(),
            snapshot.vlans.len()
        );
        Ok(snapshot)
    }

    /// Parse a snapshot from a YAML string.
    ///
    /// # Errors
    ///
    /// Fails if the YAML is malformed or describes an invalid snapshot.
    pub fn from_yaml_str(yaml: &str) -> TopologyResult<Self> {
        let doc: SnapshotDoc = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TopologyError::InvalidSnapshot(e.to_string()))?;
        Self::from_doc(&doc)
    }

    /// Load a snapshot from a YAML file.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or its content is invalid.
    pub fn load(path: &Path) -> TopologyResult<Self> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TopologyError::SnapshotIo(path.display().to_string(), e.to_string()))?;
        let snapshot = Self::from_yaml_str(&yaml)?;
        info!(
            "Loaded topology snapshot from {} ({} resources)",
            path.display(),
            snapshot.urn_map.len()
        );
        Ok(snapshot)
    }

    /// Update the reservable bandwidth of a resource
    pub fn set_bandwidth(&mut self, urn: Urn, bandwidth: PortBandwidth) -> Option<PortBandwidth> {
        self.bandwidth.insert(urn, bandwidth)
    }

    /// Update the reservable VLANs of a resource
    pub fn set_vlans(&mut self, urn: Urn, vlans: VlanSet) -> Option<VlanSet> {
        self.vlans.insert(urn, vlans)
    }

    /// The layer a device was declared in
    #[must_use]
    pub fn device_layer(&self, device: &str) -> Option<Layer> {
        self.device_layer.get(device).copied()
    }
}

impl TopologyProvider for TopologySnapshot {
    fn layer(&self, layer: Layer) -> Topology {
        self.layers
            .get(&layer)
            .cloned()
            .unwrap_or_else(|| Topology::new(Some(layer)))
    }
    fn urn_map(&self) -> &UrnMap {
        &self.urn_map
    }
    fn edge_ports(&self) -> OrderSet<Urn> {
        let linked: OrderSet<&Urn> = self
            .layers
            .iter()
            .filter(|(layer, _)| **layer != Layer::Internal)
            .flat_map(|(_, topo)| topo.edges().iter())
            .flat_map(|e| [&e.a.urn, &e.z.urn])
            .collect();
        self.urn_map
            .records()
            .filter(|r| r.urn_type == UrnType::Port && !linked.contains(&r.urn))
            .map(|r| r.urn.clone())
            .collect()
    }
}

impl AvailabilityProvider for TopologySnapshot {
    fn bandwidth(&self) -> &BandwidthAvailability {
        &self.bandwidth
    }
    fn available_vlans(&self) -> &VlanAvailability {
        &self.vlans
    }
}

impl AdjacencyProvider for TopologySnapshot {
    fn adjacencies_originating_from(&self, port: &str) -> Vec<PortAdjacency> {
        self.adjacencies.originating_from(port).to_vec()
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    const SNAPSHOT: &str = r#"
devices:
  - urn: sw1
    model: switch
    layer: ethernet
    vlans: "100-200"
    ports:
      - urn: sw1:1
        ingress: 1000
        egress: 1000
      - urn: sw1:2
        ingress: 1000
        egress: 500
        vlans: "150"
  - urn: sw2
    model: switch
    layer: ethernet
    ports:
      - urn: sw2:1
links:
  - a: sw1:2
    z: sw2:1
    layer: ethernet
    metric: 10
"#;

    #[test]
    fn test_load_snapshot_from_yaml() {
        let snapshot = TopologySnapshot::from_yaml_str(SNAPSHOT).unwrap();
        let eth = snapshot.layer(Layer::Ethernet);
        assert_eq!(eth.vertices().len(), 5);
        assert_eq!(eth.edges().len(), 2);
        // two internal edges per port
        assert_eq!(snapshot.layer(Layer::Internal).edges().len(), 6);
        assert!(snapshot.layer(Layer::Mpls).edges().is_empty());

        assert_eq!(snapshot.bandwidth().get("sw1:2"), Some(PortBandwidth::new(1000, 500)));
        assert_eq!(snapshot.bandwidth().get("sw2:1"), None);
        assert_eq!(snapshot.available_vlans().get("sw1").map(ToString::to_string), Some("100-200".to_string()));
        assert_eq!(snapshot.available_vlans().get("sw1:2").map(ToString::to_string), Some("150".to_string()));

        let edge_ports = snapshot.edge_ports();
        assert_eq!(edge_ports.len(), 1);
        assert!(edge_ports.contains("sw1:1"));

        let adjs = snapshot.adjacencies_originating_from("sw2:1");
        assert_eq!(adjs.len(), 1);
        assert_eq!(adjs[0].far_device().as_str(), "sw1");
        assert_eq!(snapshot.urn_map().device_of("sw2:1"), Some(&Urn::from("sw2")));
    }

    #[test]
    #[traced_test]
    fn test_load_snapshot_file() {
        let path = std::env::temp_dir().join(format!("pce-snapshot-{}.yaml", std::process::id()));
        std::fs::write(&path, SNAPSHOT).unwrap();
        let snapshot = TopologySnapshot::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(snapshot.urn_map().contains("sw1:2"));
        assert!(logs_contain("Loaded topology snapshot"));

        let missing = TopologySnapshot::load(Path::new("/nonexistent/topology.yaml"));
        assert!(matches!(missing, Err(TopologyError::SnapshotIo(_, _))));
    }

    #[test]
    fn test_invalid_snapshots() {
        let dangling = "devices: []\nlinks:\n  - {a: x, z: y, layer: ethernet, metric: 1}\n";
        assert!(matches!(TopologySnapshot::from_yaml_str(dangling), Err(TopologyError::NotAPort(_, _))));

        let half_bw = "devices:\n  - urn: d\n    layer: mpls\n    ports:\n      - {urn: d:1, ingress: 10}\n";
        assert!(matches!(TopologySnapshot::from_yaml_str(half_bw), Err(TopologyError::InvalidSnapshot(_))));

        let dup = "devices:\n  - {urn: d, layer: mpls}\n  - {urn: d, layer: mpls}\n";
        assert_eq!(TopologySnapshot::from_yaml_str(dup).err(), Some(TopologyError::DuplicateUrn("d".into())));

        let bad_vlans = "devices:\n  - {urn: d, layer: mpls, vlans: \"5000\"}\n";
        assert!(matches!(TopologySnapshot::from_yaml_str(bad_vlans), Err(TopologyError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_port_needs_device() {
        let mut snapshot = TopologySnapshot::new();
        assert_eq!(
            snapshot.add_port("x:1", "x", None, None),
            Err(TopologyError::NoSuchDevice("x:1".into(), "x".into()))
        );
        snapshot.add_device("x", VertexType::Router, Layer::Mpls).unwrap();
        snapshot.add_port("x:1", "x", None, None).unwrap();
        assert_eq!(snapshot.device_layer("x"), Some(Layer::Mpls));
        assert!(snapshot.add_link(&"x".into(), &"x:1".into(), Layer::Mpls, 1).is_err());
    }
}
