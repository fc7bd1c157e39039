// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Publication of topology snapshots to concurrent readers.
//!
//! Computations run against a [`ReadGuard`], which remains a consistent view
//! for as long as it is held, whatever the writer publishes meanwhile.

use crate::snapshot::TopologySnapshot;
use crate::urn::Urn;
use left_right::{Absorb, ReadGuard, ReadHandle, ReadHandleFactory, WriteHandle};
use net::bandwidth::PortBandwidth;
use net::vlan::VlanSet;
use tracing::debug;

enum SnapshotChange {
    Replace(Box<TopologySnapshot>),
    SetBandwidth((Urn, PortBandwidth)),
    SetVlans((Urn, VlanSet)),
}

impl Absorb<SnapshotChange> for TopologySnapshot {
    fn absorb_first(&mut self, change: &mut SnapshotChange, _: &Self) {
        match change {
            SnapshotChange::Replace(snapshot) => *self = snapshot.as_ref().clone(),
            SnapshotChange::SetBandwidth((urn, bw)) => {
                self.set_bandwidth(urn.clone(), *bw);
            }
            SnapshotChange::SetVlans((urn, vlans)) => {
                self.set_vlans(urn.clone(), vlans.clone());
            }
        }
    }
    fn absorb_second(&mut self, change: SnapshotChange, _: &Self) {
        match change {
            SnapshotChange::Replace(snapshot) => *self = *snapshot,
            SnapshotChange::SetBandwidth((urn, bw)) => {
                self.set_bandwidth(urn, bw);
            }
            SnapshotChange::SetVlans((urn, vlans)) => {
                self.set_vlans(urn, vlans);
            }
        }
    }
    fn drop_first(self: Box<Self>) {}
    fn sync_with(&mut self, first: &Self) {
        *self = first.clone();
    }
}

pub struct SnapshotWriter(WriteHandle<TopologySnapshot, SnapshotChange>);
impl SnapshotWriter {
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (SnapshotWriter, SnapshotReader) {
        Self::new_with_data(TopologySnapshot::new())
    }
    #[must_use]
    pub fn new_with_data(snapshot: TopologySnapshot) -> (SnapshotWriter, SnapshotReader) {
        let (w, r) = left_right::new_from_empty::<TopologySnapshot, SnapshotChange>(snapshot);
        (SnapshotWriter(w), SnapshotReader(r))
    }
    #[must_use]
    pub fn as_snapshot_reader(&self) -> SnapshotReader {
        SnapshotReader::new(self.0.clone())
    }
    #[must_use]
    pub fn enter(&self) -> Option<ReadGuard<'_, TopologySnapshot>> {
        self.0.enter()
    }
    /// Publish a whole new snapshot
    pub fn replace(&mut self, snapshot: TopologySnapshot) {
        self.0.append(SnapshotChange::Replace(Box::new(snapshot)));
        self.0.publish();
        debug!("Published new topology snapshot");
    }
    pub fn set_bandwidth(&mut self, urn: Urn, bandwidth: PortBandwidth) {
        self.0
            .append(SnapshotChange::SetBandwidth((urn, bandwidth)));
        self.0.publish();
    }
    pub fn set_vlans(&mut self, urn: Urn, vlans: VlanSet) {
        self.0.append(SnapshotChange::SetVlans((urn, vlans)));
        self.0.publish();
    }
}

#[derive(Clone, Debug)]
pub struct SnapshotReader(ReadHandle<TopologySnapshot>);
impl SnapshotReader {
    #[must_use]
    pub fn new(rhandle: ReadHandle<TopologySnapshot>) -> Self {
        SnapshotReader(rhandle)
    }
    #[must_use]
    pub fn enter(&self) -> Option<ReadGuard<'_, TopologySnapshot>> {
        self.0.enter()
    }
    #[must_use]
    pub fn factory(&self) -> SnapshotReaderFactory {
        SnapshotReaderFactory(self.0.factory())
    }
}

#[derive(Debug)]
pub struct SnapshotReaderFactory(ReadHandleFactory<TopologySnapshot>);
impl SnapshotReaderFactory {
    #[must_use]
    pub fn handle(&self) -> SnapshotReader {
        SnapshotReader(self.0.handle())
    }
}
