// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Multi-layer network topology model consumed by the path computation engine:
//! resource URNs, typed vertices, layered directed edges, availability inputs,
//! the collaborator traits that supply them, and an in-memory snapshot that
//! implements those traits and can be published to concurrent readers.

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod adjacency;
pub mod availability;
mod display;
pub mod edge;
mod errors;
pub mod pretty_utils;
pub mod provider;
pub mod snapshot;
pub mod snapshotrw;
#[allow(clippy::module_inception)]
pub mod topology;
pub mod urn;
pub mod vertex;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use tracectl::trace_target;
trace_target!("topology", tracectl::LevelFilter::INFO, &["pce"]);

// re-exports
pub use adjacency::{AdjacencyTable, PortAdjacency};
pub use availability::{
    BandwidthAvailability, ReservedBandwidth, ReservedVlan, ScheduleSpec, VlanAvailability,
};
pub use edge::{Edge, Layer};
pub use errors::{TopologyError, TopologyResult};
pub use provider::{AdjacencyProvider, AvailabilityProvider, TopologyProvider};
pub use snapshot::TopologySnapshot;
pub use snapshotrw::{SnapshotReader, SnapshotReaderFactory, SnapshotWriter};
pub use topology::Topology;
pub use urn::{Urn, UrnMap, UrnRecord, UrnType};
pub use vertex::{Vertex, VertexType};
