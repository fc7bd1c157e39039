// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! State objects to keep port adjacency information

use crate::urn::Urn;
use ahash::RandomState;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A physical adjacency, as seen from the port it originates at
pub struct PortAdjacency {
    port: Urn,
    far_port: Urn,
    far_device: Urn,
}

impl PortAdjacency {
    /// Create a [`PortAdjacency`] object
    #[must_use]
    pub fn new(port: Urn, far_port: Urn, far_device: Urn) -> Self {
        Self {
            port,
            far_port,
            far_device,
        }
    }
    /// The port the adjacency originates at
    #[must_use]
    pub fn port(&self) -> &Urn {
        &self.port
    }
    /// The port at the far end
    #[must_use]
    pub fn far_port(&self) -> &Urn {
        &self.far_port
    }
    /// The device owning the port at the far end
    #[must_use]
    pub fn far_device(&self) -> &Urn {
        &self.far_device
    }
}

/// A table of [`PortAdjacency`]ies, indexed by originating port
#[derive(Default, Clone, Debug)]
pub struct AdjacencyTable(HashMap<Urn, Vec<PortAdjacency>, RandomState>);

impl AdjacencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::with_hasher(RandomState::with_seed(0)))
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
    pub fn add_adjacency(&mut self, adjacency: PortAdjacency) {
        let adjs = self.0.entry(adjacency.port.clone()).or_default();
        if !adjs.contains(&adjacency) {
            adjs.push(adjacency);
        }
    }
    /// The adjacencies originating at a port, in insertion order
    #[must_use]
    pub fn originating_from(&self, port: &str) -> &[PortAdjacency] {
        self.0.get(port).map_or(&[], Vec::as_slice)
    }
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    #[test]
    fn test_adj_table_minimal() {
        let mut atable = AdjacencyTable::new();
        assert!(atable.is_empty());
        atable.add_adjacency(PortAdjacency::new("a:1".into(), "b:1".into(), "b".into()));
        atable.add_adjacency(PortAdjacency::new("a:1".into(), "c:1".into(), "c".into()));
        atable.add_adjacency(PortAdjacency::new("a:1".into(), "b:1".into(), "b".into()));
        assert_eq!(atable.len(), 2);

        let adjs = atable.originating_from("a:1");
        assert_eq!(adjs[0].far_device().as_str(), "b");
        assert_eq!(adjs[1].far_port().as_str(), "c:1");
        assert!(atable.originating_from("b:1").is_empty());

        atable.clear();
        assert!(atable.is_empty());
    }
}
