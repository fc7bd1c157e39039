// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Path computation engine.
//!
//! Given a multi-layer topology and the bandwidth and VLANs still available on
//! it, compute routes for bidirectional circuits: prune the topology down to
//! what a request may use, optionally collapse lower-layer chains into logical
//! links, find the shortest a-to-z route and mirror it hop for hop into the
//! z-to-a route.

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod bwpce;
pub mod dijkstra;
mod display;
mod errors;
pub mod nexthop;
pub mod palindromic;
pub mod prune;
pub mod request;
pub mod service;
pub mod servicetopo;

use tracectl::trace_target;
trace_target!("engine", tracectl::LevelFilter::INFO, &["pce"]);

// re-exports
pub use bwpce::bandwidth_constrained_path;
pub use dijkstra::{ShortestPathTree, shortest_path, shortest_path_tree};
pub use errors::{PceError, PceErrorKind, PceResult};
pub use nexthop::next_hops_for_ero;
pub use palindromic::{EroOptions, compute_palindromic_ero, mirror};
pub use prune::{Demand, PruningContext, prune_edge_ports_except};
pub use request::{
    EroPair, Fixture, Hop, Junction, NextHop, RequestedVlanPipe, ShortestPathRequest,
    ShortestPathResponse,
};
pub use service::{Pce, PceParams, PceParamsBuilder, PceParamsBuilderError};
pub use servicetopo::{LogicalEdge, ServiceLayerTopology};
