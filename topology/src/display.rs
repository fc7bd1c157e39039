// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Module that implements Display for topology objects

use crate::edge::{Edge, Layer};
use crate::pretty_utils::{Heading, line};
use crate::topology::Topology;
use crate::vertex::{Vertex, VertexType};
use std::fmt::Display;

impl Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Ethernet => write!(f, "ethernet"),
            Layer::Mpls => write!(f, "mpls"),
            Layer::Internal => write!(f, "internal"),
            Layer::Logical => write!(f, "logical"),
        }
    }
}

impl Display for VertexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VertexType::Device => write!(f, "device"),
            VertexType::Port => write!(f, "port"),
            VertexType::Switch => write!(f, "switch"),
            VertexType::Router => write!(f, "router"),
            VertexType::Internal => write!(f, "internal"),
        }
    }
}

impl Display for Vertex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.urn, self.vertex_type)
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<24} -> {:<24} {:>9} metric:{}",
            self.a.urn.as_str(),
            self.z.urn.as_str(),
            self.layer.to_string(),
            self.metric
        )
    }
}

impl Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layer = self
            .layer()
            .map_or_else(|| "multi-layer".to_string(), |l| l.to_string());
        Heading(format!(
            "Topology {layer} ({} vertices, {} edges)",
            self.vertices().len(),
            self.edges().len()
        ))
        .fmt(f)?;
        for vertex in self.vertices() {
            writeln!(f, "  {vertex}")?;
            for edge in self.edges_from(vertex.urn.as_str()) {
                writeln!(f, "      {edge}")?;
            }
        }
        line(f)
    }
}
