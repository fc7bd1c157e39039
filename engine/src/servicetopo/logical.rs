// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Logical edges: a chain of physical edges seen as a single hop

use serde::Serialize;
use topology::{Edge, Layer, Vertex};

/// A contiguous chain of physical edges between two vertices.
///
/// The chain is never empty, each edge starts where the previous one ends, and
/// the metric is the sum of the chain's metrics.
#[derive(Clone, Debug, Serialize)]
pub struct LogicalEdge {
    a: Vertex,
    z: Vertex,
    metric: u64,
    physical: Vec<Edge>,
}

impl LogicalEdge {
    /// Build a logical edge out of a chain of edges. Returns `None` if the chain
    /// is empty or has a gap.
    #[must_use]
    pub fn from_chain(physical: Vec<Edge>) -> Option<Self> {
        let first = physical.first()?;
        let last = physical.last()?;
        if physical.windows(2).any(|w| w[0].z != w[1].a) {
            return None;
        }
        Some(Self {
            a: first.a.clone(),
            z: last.z.clone(),
            metric: physical.iter().fold(0u64, |sum, e| sum.saturating_add(e.metric)),
            physical,
        })
    }
    #[must_use]
    pub fn a(&self) -> &Vertex {
        &self.a
    }
    #[must_use]
    pub fn z(&self) -> &Vertex {
        &self.z
    }
    #[must_use]
    pub fn metric(&self) -> u64 {
        self.metric
    }
    #[must_use]
    pub fn physical(&self) -> &[Edge] {
        &self.physical
    }
    /// The edge standing for this chain in a service-layer graph
    #[must_use]
    pub fn to_edge(&self) -> Edge {
        Edge::new(self.a.clone(), self.z.clone(), self.metric, Layer::Logical)
    }
    /// Tell if this logical edge stands for the given service-layer edge
    #[must_use]
    pub fn matches(&self, edge: &Edge) -> bool {
        edge.layer == Layer::Logical && edge.a == self.a && edge.z == self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: &str, z: &str, metric: u64) -> Edge {
        Edge::new(Vertex::port(a), Vertex::port(z), metric, Layer::Mpls)
    }

    #[test]
    fn test_from_chain() {
        let logical = LogicalEdge::from_chain(vec![edge("a", "b", 3), edge("b", "c", 4)]).unwrap();
        assert_eq!(logical.a().urn.as_str(), "a");
        assert_eq!(logical.z().urn.as_str(), "c");
        assert_eq!(logical.metric(), 7);
        assert_eq!(logical.physical().len(), 2);
        let as_edge = logical.to_edge();
        assert_eq!(as_edge.layer, Layer::Logical);
        assert!(logical.matches(&as_edge));
        assert!(!logical.matches(&edge("a", "c", 7)));
    }

    #[test]
    fn test_broken_chains() {
        assert!(LogicalEdge::from_chain(vec![]).is_none());
        assert!(LogicalEdge::from_chain(vec![edge("a", "b", 1), edge("c", "d", 1)]).is_none());
    }
}
