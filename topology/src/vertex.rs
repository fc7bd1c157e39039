// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Topology vertices

use crate::urn::Urn;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

/// The role of a vertex in the topology
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexType {
    Device,
    Port,
    Switch,
    Router,
    Internal,
}

impl VertexType {
    /// Tell if the vertex stands for a whole device (of any model)
    #[must_use]
    pub fn is_device(self) -> bool {
        matches!(
            self,
            VertexType::Device | VertexType::Switch | VertexType::Router
        )
    }
}

/// A vertex. Two vertices are equal iff their URNs are.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vertex {
    pub urn: Urn,
    pub vertex_type: VertexType,
}

impl Vertex {
    #[must_use]
    pub fn new(urn: impl Into<Urn>, vertex_type: VertexType) -> Self {
        Self {
            urn: urn.into(),
            vertex_type,
        }
    }
    #[must_use]
    pub fn port(urn: impl Into<Urn>) -> Self {
        Self::new(urn, VertexType::Port)
    }
    #[must_use]
    pub fn is_port(&self) -> bool {
        self.vertex_type == VertexType::Port
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.urn == other.urn
    }
}
impl Eq for Vertex {}

// must hash exactly like the urn (and its str) for Borrow lookups
impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.urn.hash(state);
    }
}
impl Borrow<Urn> for Vertex {
    fn borrow(&self) -> &Urn {
        &self.urn
    }
}
impl Borrow<str> for Vertex {
    fn borrow(&self) -> &str {
        self.urn.as_str()
    }
}
