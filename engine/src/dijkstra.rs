// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Shortest paths over a [`Topology`], by edge metric.
//!
//! Traversal follows insertion order everywhere and ties between equal-cost
//! vertices are broken by their position in the topology, so the same inputs
//! always yield the same path.

use crate::errors::{PceError, PceResult};
use ahash::RandomState;
use ordermap::OrderSet;
use priority_queue::PriorityQueue;
use std::cmp::Ordering;
use std::time::Instant;
use topology::{Edge, Topology};
use tracectl::trace_target;
use tracing::trace;

trace_target!("solver", tracectl::LevelFilter::INFO, &["pce", "engine"]);

/// Queue priority of a vertex: lower cost first, then lower index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rank {
    cost: u64,
    index: usize,
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.cost, other.index).cmp(&(self.cost, self.index))
    }
}

/// The shortest paths from one source to every reachable vertex
pub struct ShortestPathTree<'t> {
    topo: &'t Topology,
    index: OrderSet<&'t str>,
    source: Option<usize>,
    cost: Vec<Option<u64>>,
    /// index of the edge each vertex is reached through
    via: Vec<Option<usize>>,
}

impl<'t> ShortestPathTree<'t> {
    /// Cost of the shortest path to a vertex, `None` if unreachable
    #[must_use]
    pub fn cost_to(&self, dst: &str) -> Option<u64> {
        self.index.get_index_of(dst).and_then(|i| self.cost[i])
    }

    /// The edges of the shortest path to a vertex, source first. Empty if the
    /// vertex is the source or is unreachable.
    #[must_use]
    pub fn path_to(&self, dst: &str) -> Vec<Edge> {
        let Some(mut at) = self.index.get_index_of(dst) else {
            return vec![];
        };
        if self.cost[at].is_none() {
            return vec![];
        }
        let mut path = Vec::new();
        while Some(at) != self.source {
            let Some(edge) = self.via[at].and_then(|e| self.topo.edges().get_index(e)) else {
                return vec![];
            };
            path.push(edge.clone());
            match self.index.get_index_of(edge.a.urn.as_str()) {
                Some(prev) => at = prev,
                None => return vec![],
            }
        }
        path.reverse();
        path
    }
}

fn check_deadline(deadline: Option<Instant>) -> PceResult<()> {
    if deadline.is_some_and(|d| Instant::now() >= d) {
        return Err(PceError::DeadlineExceeded);
    }
    Ok(())
}

/// Compute the shortest paths from `src`, through the edges `allow` accepts.
///
/// A source that is not in the topology yields a tree where nothing is reachable.
///
/// # Errors
///
/// Fails with [`PceError::DeadlineExceeded`] if the deadline passes before
/// the search completes.
pub fn shortest_path_tree<'t>(
    topo: &'t Topology,
    src: &str,
    allow: impl Fn(&Edge) -> bool,
    deadline: Option<Instant>,
) -> PceResult<ShortestPathTree<'t>> {
    let mut index: OrderSet<&'t str> = topo.vertices().iter().map(|v| v.urn.as_str()).collect();
    for edge in topo.edges() {
        index.insert(edge.a.urn.as_str());
        index.insert(edge.z.urn.as_str());
    }
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); index.len()];
    for (e, edge) in topo.edges().iter().enumerate() {
        if let Some(a) = index.get_index_of(edge.a.urn.as_str()) {
            adjacency[a].push(e);
        }
    }

    let mut cost: Vec<Option<u64>> = vec![None; index.len()];
    let mut via: Vec<Option<usize>> = vec![None; index.len()];
    let mut settled = vec![false; index.len()];
    let source = index.get_index_of(src);

    let mut queue: PriorityQueue<usize, Rank, RandomState> = PriorityQueue::with_default_hasher();
    if let Some(s) = source {
        cost[s] = Some(0);
        queue.push(s, Rank { cost: 0, index: s });
    }
    while let Some((u, rank)) = queue.pop() {
        check_deadline(deadline)?;
        settled[u] = true;
        for &e in &adjacency[u] {
            let Some(edge) = topo.edges().get_index(e) else {
                continue;
            };
            if !allow(edge) {
                continue;
            }
            let Some(v) = index.get_index_of(edge.z.urn.as_str()) else {
                continue;
            };
            if settled[v] {
                continue;
            }
            let next = rank.cost.saturating_add(edge.metric);
            if cost[v].is_none_or(|known| next < known) {
                cost[v] = Some(next);
                via[v] = Some(e);
                queue.push_increase(v, Rank { cost: next, index: v });
            }
        }
    }
    trace!(
        "Shortest path tree from {src}: {} of {} vertices reachable",
        cost.iter().filter(|c| c.is_some()).count(),
        index.len()
    );
    Ok(ShortestPathTree {
        topo,
        index,
        source,
        cost,
        via,
    })
}

/// The shortest path from `src` to `dst` over the whole topology. Empty if
/// `dst` is unreachable.
///
/// # Errors
///
/// Fails with [`PceError::DeadlineExceeded`] if the deadline passes.
pub fn shortest_path(
    topo: &Topology,
    src: &str,
    dst: &str,
    deadline: Option<Instant>,
) -> PceResult<Vec<Edge>> {
    Ok(shortest_path_tree(topo, src, |_| true, deadline)?.path_to(dst))
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use topology::{Layer, Vertex};

    fn topo(edges: &[(&str, &str, u64)]) -> Topology {
        let mut topo = Topology::new(None);
        for (a, z, metric) in edges {
            topo.add_edge_with_endpoints(Edge::new(Vertex::port(*a), Vertex::port(*z), *metric, Layer::Ethernet));
        }
        topo
    }

    fn hops(path: &[Edge]) -> Vec<&str> {
        path.iter().map(|e| e.z.urn.as_str()).collect()
    }

    #[test]
    fn test_shortest_path() {
        let topo = topo(&[("a", "b", 1), ("b", "d", 5), ("a", "c", 2), ("c", "d", 2), ("d", "e", 1)]);
        let path = shortest_path(&topo, "a", "e", None).unwrap();
        assert_eq!(hops(&path), vec!["c", "d", "e"]);
        let tree = shortest_path_tree(&topo, "a", |_| true, None).unwrap();
        assert_eq!(tree.cost_to("e"), Some(5));
        assert_eq!(tree.cost_to("a"), Some(0));
        assert!(tree.path_to("a").is_empty());
    }

    #[test]
    fn test_unreachable_and_unknown() {
        let topo = topo(&[("a", "b", 1), ("c", "a", 1)]);
        assert!(shortest_path(&topo, "a", "c", None).unwrap().is_empty());
        assert!(shortest_path(&topo, "a", "nowhere", None).unwrap().is_empty());
        assert!(shortest_path(&topo, "nowhere", "a", None).unwrap().is_empty());
    }

    #[test]
    fn test_equal_cost_is_deterministic() {
        let topo = topo(&[("a", "b", 1), ("a", "c", 1), ("b", "d", 1), ("c", "d", 1)]);
        for _ in 0..10 {
            assert_eq!(hops(&shortest_path(&topo, "a", "d", None).unwrap()), vec!["b", "d"]);
        }
    }

    #[test]
    fn test_edge_filter() {
        let topo = topo(&[("a", "b", 1), ("b", "c", 1), ("a", "c", 10)]);
        let tree = shortest_path_tree(&topo, "a", |e| e.z.urn.as_str() != "b", None).unwrap();
        assert_eq!(hops(&tree.path_to("c")), vec!["c"]);
        assert_eq!(tree.cost_to("b"), None);
    }

    #[test]
    fn test_deadline() {
        let topo = topo(&[("a", "b", 1)]);
        let past = Instant::now().checked_sub(Duration::from_millis(1));
        assert_eq!(shortest_path(&topo, "a", "b", past).err(), past.map(|_| PceError::DeadlineExceeded));
        let later = Instant::now() + Duration::from_secs(60);
        assert_eq!(shortest_path(&topo, "a", "b", Some(later)).unwrap().len(), 1);
    }
}
