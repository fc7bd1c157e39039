// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Directed, layered topology edges

use crate::vertex::Vertex;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// The layer an edge belongs to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Ethernet,
    Mpls,
    /// intra-device hops between a device and its ports
    Internal,
    /// aggregated chain of physical edges, only found in service-layer graphs
    Logical,
}

impl Layer {
    /// The layers the inventory provides
    pub const PHYSICAL: [Layer; 3] = [Layer::Ethernet, Layer::Mpls, Layer::Internal];
}

/// A directed edge. Edges are identified by `(a, z, layer)`; the metric is payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub a: Vertex,
    pub z: Vertex,
    pub metric: u64,
    pub layer: Layer,
}

impl Edge {
    #[must_use]
    pub fn new(a: Vertex, z: Vertex, metric: u64, layer: Layer) -> Self {
        Self {
            a,
            z,
            metric,
            layer,
        }
    }
    /// Tell if this edge runs exactly opposite to another one
    #[must_use]
    pub fn is_reverse_of(&self, other: &Edge) -> bool {
        self.a == other.z && self.z == other.a
    }
    /// Tell if either end of the edge is the given urn
    #[must_use]
    pub fn touches(&self, urn: &str) -> bool {
        self.a.urn.as_str() == urn || self.z.urn.as_str() == urn
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a && self.z == other.z && self.layer == other.layer
    }
}
impl Eq for Edge {}
impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.a.hash(state);
        self.z.hash(state);
        self.layer.hash(state);
    }
}
