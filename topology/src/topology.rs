// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Per-layer and multi-layer topologies

use crate::edge::{Edge, Layer};
use crate::urn::Urn;
use crate::vertex::Vertex;
use ordermap::OrderSet;
use tracing::debug;

/// A set of vertices and directed edges, optionally bound to a layer.
///
/// Sets keep insertion order, so every traversal of a topology is deterministic.
/// Transformations return new topologies and never mutate their input.
#[derive(Clone, Debug, Default)]
pub struct Topology {
    layer: Option<Layer>,
    vertices: OrderSet<Vertex>,
    edges: OrderSet<Edge>,
}

impl Topology {
    #[must_use]
    pub fn new(layer: Option<Layer>) -> Self {
        Self {
            layer,
            vertices: OrderSet::new(),
            edges: OrderSet::new(),
        }
    }
    #[must_use]
    pub fn layer(&self) -> Option<Layer> {
        self.layer
    }
    #[must_use]
    pub fn vertices(&self) -> &OrderSet<Vertex> {
        &self.vertices
    }
    #[must_use]
    pub fn edges(&self) -> &OrderSet<Edge> {
        &self.edges
    }
    #[must_use]
    pub fn vertex(&self, urn: &str) -> Option<&Vertex> {
        self.vertices.get(urn)
    }
    #[must_use]
    pub fn has_vertex(&self, urn: &str) -> bool {
        self.vertices.contains(urn)
    }

    /// Add a vertex. Returns false if a vertex with the same urn was present.
    pub fn add_vertex(&mut self, vertex: Vertex) -> bool {
        self.vertices.insert(vertex)
    }

    /// Add an edge. Returns false if an edge with the same `(a, z, layer)` was
    /// present, in which case the existing edge is kept.
    ///
    /// Endpoints are not added: a layer's edges may reach vertices owned by
    /// another layer.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        self.edges.insert(edge)
    }

    /// Add an edge along with whichever of its endpoints are missing
    pub fn add_edge_with_endpoints(&mut self, edge: Edge) -> bool {
        if !self.vertices.contains(&edge.a) {
            self.vertices.insert(edge.a.clone());
        }
        if !self.vertices.contains(&edge.z) {
            self.vertices.insert(edge.z.clone());
        }
        self.add_edge(edge)
    }

    /// A topology with the same layer and vertices, and the given edges
    #[must_use]
    pub fn with_edges(&self, edges: impl IntoIterator<Item = Edge>) -> Topology {
        let mut topo = Topology {
            layer: self.layer,
            vertices: self.vertices.clone(),
            edges: OrderSet::new(),
        };
        for edge in edges {
            topo.add_edge(edge);
        }
        topo
    }

    /// A topology without the vertices that fail the predicate, nor the edges
    /// touching them
    #[must_use]
    pub fn retain_vertices(&self, keep: impl Fn(&Urn) -> bool) -> Topology {
        Topology {
            layer: self.layer,
            vertices: self.vertices.iter().filter(|v| keep(&v.urn)).cloned().collect(),
            edges: self
                .edges
                .iter()
                .filter(|e| keep(&e.a.urn) && keep(&e.z.urn))
                .cloned()
                .collect(),
        }
    }

    /// Edges leaving a vertex, in insertion order
    pub fn edges_from<'a>(&'a self, urn: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.a.urn.as_str() == urn)
    }

    /// First edge (in insertion order) running from `a` to `z`, in any layer
    #[must_use]
    pub fn find_edge(&self, a: &str, z: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.a.urn.as_str() == a && e.z.urn.as_str() == z)
    }

    /// The edge running opposite to the given one
    #[must_use]
    pub fn reverse_of(&self, edge: &Edge) -> Option<&Edge> {
        self.find_edge(edge.z.urn.as_str(), edge.a.urn.as_str())
    }

    /// Merge several topologies into a multi-layer one.
    ///
    /// Vertex and edge sets are united, edges being told apart by
    /// `(a, z, layer)`, so parallel edges of different layers all remain. The
    /// one exception is a pair of vertices joined by an internal-layer edge:
    /// that edge replaces the edges of every other layer between the pair.
    #[must_use]
    pub fn merge<'a>(topologies: impl IntoIterator<Item = &'a Topology>) -> Topology {
        let mut merged = Topology::new(None);
        let mut edges: OrderSet<Edge> = OrderSet::new();
        for topo in topologies {
            for vertex in &topo.vertices {
                if !merged.vertices.contains(vertex) {
                    merged.vertices.insert(vertex.clone());
                }
            }
            edges.extend(topo.edges.iter().cloned());
        }
        let internal: OrderSet<(&Urn, &Urn)> = edges
            .iter()
            .filter(|e| e.layer == Layer::Internal)
            .map(|e| (&e.a.urn, &e.z.urn))
            .collect();
        for edge in &edges {
            if edge.layer == Layer::Internal || !internal.contains(&(&edge.a.urn, &edge.z.urn)) {
                merged.add_edge_with_endpoints(edge.clone());
            }
        }
        debug!(
            "Merged topology has {} vertices and {} edges",
            merged.vertices.len(),
            merged.edges.len()
        );
        merged
    }
}
