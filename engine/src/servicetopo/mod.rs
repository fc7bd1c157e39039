// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Service-layer topology.
//!
//! The service layer is the set of vertices customers see (the ethernet
//! layer). Its *terminals* are the service vertices with a physical edge to or
//! from some vertex outside the layer, plus the request endpoints lying outside
//! the layer. Every chain of physical edges that leaves a terminal, crosses only
//! non-service vertices and lands on another terminal is collapsed into a
//! [`LogicalEdge`], so that a route over the service layer never needs to know
//! about the layers below it.

mod logical;

pub use logical::LogicalEdge;

use crate::dijkstra::shortest_path_tree;
use crate::errors::{PceError, PceResult};
use ordermap::OrderSet;
use std::time::Instant;
use topology::{Edge, Layer, Topology, TopologyProvider, Urn};
use tracectl::trace_target;
use tracing::debug;

trace_target!("service-layer", tracectl::LevelFilter::INFO, &["pce", "engine"]);

#[derive(Clone, Debug)]
pub struct ServiceLayerTopology {
    service: OrderSet<Urn>,
    terminals: OrderSet<Urn>,
    physical: Topology,
    logical: Vec<LogicalEdge>,
}

impl ServiceLayerTopology {
    /// Build the service layer of a physical topology.
    ///
    /// `service` names the service-layer vertices; those absent from `physical`
    /// are ignored. `endpoints` are the vertices a route will start or end at.
    ///
    /// # Errors
    ///
    /// Fails with [`PceError::DeadlineExceeded`] if the deadline passes.
    pub fn build<'u>(
        physical: &Topology,
        service: impl IntoIterator<Item = &'u Urn>,
        endpoints: &[&Urn],
        deadline: Option<Instant>,
    ) -> PceResult<Self> {
        let service: OrderSet<Urn> = service
            .into_iter()
            .filter(|u| physical.has_vertex(u.as_str()))
            .cloned()
            .collect();

        let mut terminals: OrderSet<Urn> = OrderSet::new();
        for urn in &service {
            let crosses = physical.edges().iter().any(|e| {
                (e.a.urn == *urn && !service.contains(&e.z.urn))
                    || (e.z.urn == *urn && !service.contains(&e.a.urn))
            });
            if crosses {
                terminals.insert(urn.clone());
            }
        }
        for urn in endpoints {
            if !service.contains(*urn) && physical.has_vertex(urn.as_str()) {
                terminals.insert((*urn).clone());
            }
        }

        let interior = |urn: &Urn| !service.contains(urn) && !terminals.contains(urn);
        let mut trees = Vec::with_capacity(terminals.len());
        for src in &terminals {
            let allow = |e: &Edge| {
                (e.a.urn == *src || interior(&e.a.urn))
                    && (interior(&e.z.urn) || terminals.contains(&e.z.urn))
                    && !(service.contains(&e.a.urn) && service.contains(&e.z.urn))
            };
            trees.push(shortest_path_tree(physical, src.as_str(), allow, deadline)?);
        }

        let mut logical = Vec::new();
        for (i, p) in terminals.iter().enumerate() {
            for (j, q) in terminals.iter().enumerate().skip(i + 1) {
                let pq = LogicalEdge::from_chain(trees[i].path_to(q.as_str()));
                let qp = LogicalEdge::from_chain(trees[j].path_to(p.as_str()));
                if let (Some(pq), Some(qp)) = (pq, qp) {
                    logical.push(pq);
                    logical.push(qp);
                }
            }
        }
        debug!(
            "Service layer: {} vertices, {} terminals, {} logical links",
            service.len(),
            terminals.len(),
            logical.len()
        );
        Ok(Self {
            service,
            terminals,
            physical: physical.clone(),
            logical,
        })
    }

    /// Build the service layer of a physical topology, taking the service
    /// vertices from the provider's ethernet layer
    ///
    /// # Errors
    ///
    /// Fails with [`PceError::DeadlineExceeded`] if the deadline passes.
    pub fn from_provider<P: TopologyProvider>(
        provider: &P,
        physical: &Topology,
        endpoints: &[&Urn],
        deadline: Option<Instant>,
    ) -> PceResult<Self> {
        let ethernet = provider.layer(Layer::Ethernet);
        Self::build(
            physical,
            ethernet.vertices().iter().map(|v| &v.urn),
            endpoints,
            deadline,
        )
    }

    #[must_use]
    pub fn terminals(&self) -> &OrderSet<Urn> {
        &self.terminals
    }

    #[must_use]
    pub fn logical_links(&self) -> &[LogicalEdge] {
        &self.logical
    }

    /// The logical links running from `a` to `z`
    pub fn logical_links_between<'s>(
        &'s self,
        a: &'s str,
        z: &'s str,
    ) -> impl Iterator<Item = &'s LogicalEdge> + 's {
        self.logical
            .iter()
            .filter(move |l| l.a().urn.as_str() == a && l.z().urn.as_str() == z)
    }

    /// The service-layer graph: service vertices and terminals, the physical
    /// edges between them, and one edge per logical link
    #[must_use]
    pub fn to_topology(&self) -> Topology {
        let keep = |urn: &Urn| self.service.contains(urn) || self.terminals.contains(urn);
        let mut topo = self.physical.retain_vertices(keep);
        for link in &self.logical {
            topo.add_edge_with_endpoints(link.to_edge());
        }
        topo
    }

    /// Replace every logical hop of a service-layer path by its physical chain
    ///
    /// # Errors
    ///
    /// Fails with [`PceError::UnknownLogicalHop`] if a logical hop matches no
    /// logical link of this service layer.
    pub fn expand(&self, path: &[Edge]) -> PceResult<Vec<Edge>> {
        let mut physical = Vec::with_capacity(path.len());
        for edge in path {
            if edge.layer != Layer::Logical {
                physical.push(edge.clone());
                continue;
            }
            let link = self
                .logical
                .iter()
                .find(|l| l.matches(edge))
                .ok_or_else(|| PceError::UnknownLogicalHop(edge.a.urn.clone(), edge.z.urn.clone()))?;
            physical.extend(link.physical().iter().cloned());
        }
        Ok(physical)
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::dijkstra::shortest_path;
    use pretty_assertions::assert_eq;
    use topology::testing::{LINK_METRIC, linear};
    use topology::Vertex;

    #[test]
    fn test_linear_logical_links() {
        let snapshot = linear().unwrap();
        let merged = snapshot.merged();
        let service = ServiceLayerTopology::from_provider(&snapshot, &merged, &[], None).unwrap();

        let terminals: Vec<&str> = service.terminals().iter().map(Urn::as_str).collect();
        assert_eq!(terminals, vec!["switchA:2", "switchE:1"]);
        assert_eq!(service.logical_links().len(), 2);
        for link in service.logical_links() {
            assert_eq!(link.metric(), 4 * LINK_METRIC);
            assert_eq!(link.physical().len(), 10);
            let sum: u64 = link.physical().iter().map(|e| e.metric).sum();
            assert_eq!(sum, link.metric());
        }
        assert_eq!(service.logical_links_between("switchA:2", "switchE:1").count(), 1);
        assert_eq!(service.logical_links_between("switchE:1", "switchA:2").count(), 1);
    }

    #[test]
    fn test_route_over_service_layer_and_expand() {
        let snapshot = linear().unwrap();
        let merged = snapshot.merged();
        let service = ServiceLayerTopology::from_provider(&snapshot, &merged, &[], None).unwrap();
        let graph = service.to_topology();
        assert!(!graph.has_vertex("routerC"));
        assert_eq!(graph.edges().iter().filter(|e| e.layer == Layer::Logical).count(), 2);

        let path = shortest_path(&graph, "switchA:1", "switchE:2", None).unwrap();
        assert_eq!(path.len(), 5);
        let expanded = service.expand(&path).unwrap();
        assert_eq!(expanded.len(), 14);
        assert!(expanded.iter().all(|e| e.layer != Layer::Logical));
        assert!(expanded.windows(2).all(|w| w[0].z == w[1].a));
    }

    #[test]
    fn test_endpoint_outside_service_layer() {
        let snapshot = linear().unwrap();
        let merged = snapshot.merged();
        let router: Urn = "routerC".into();
        let service = ServiceLayerTopology::from_provider(&snapshot, &merged, &[&router], None).unwrap();
        assert!(service.terminals().contains("routerC"));
        // routerC reaches both switches, and both switches reach it
        assert_eq!(service.logical_links_between("routerC", "switchA:2").count(), 1);
        assert_eq!(service.logical_links_between("switchE:1", "routerC").count(), 1);
        // chains stop at terminals, so the switches no longer see each other directly
        assert_eq!(service.logical_links_between("switchA:2", "switchE:1").count(), 0);
        assert_eq!(service.logical_links().len(), 4);
    }

    #[test]
    fn test_unknown_logical_hop() {
        let snapshot = linear().unwrap();
        let service = ServiceLayerTopology::from_provider(&snapshot, &snapshot.merged(), &[], None).unwrap();
        let bogus = Edge::new(Vertex::port("x"), Vertex::port("y"), 1, Layer::Logical);
        assert_eq!(service.expand(&[bogus]).err(), Some(PceError::UnknownLogicalHop("x".into(), "y".into())));
    }
}
