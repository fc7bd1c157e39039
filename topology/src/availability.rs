// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Availability inputs: reservable bandwidth and VLANs per resource, and the
//! reservations that may be subtracted from them for a given schedule.

use crate::errors::{TopologyError, TopologyResult};
use crate::urn::Urn;
use chrono::{DateTime, Utc};
use net::bandwidth::{BwDirection, Mbps, PortBandwidth};
use net::vlan::{Vid, VlanSet};
use ordermap::OrderMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A time window, begin inclusive and end exclusive
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ScheduleSpec {
    /// Build a schedule.
    ///
    /// # Errors
    ///
    /// Fails if `end` is not after `begin`.
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>) -> TopologyResult<Self> {
        if end <= begin {
            return Err(TopologyError::InvalidSchedule(
                begin.to_rfc3339(),
                end.to_rfc3339(),
            ));
        }
        Ok(Self { begin, end })
    }
    /// A schedule starting now and lasting the given duration
    ///
    /// # Errors
    ///
    /// Fails if the duration is not positive.
    pub fn starting_now(duration: chrono::TimeDelta) -> TopologyResult<Self> {
        let begin = Utc::now();
        Self::new(begin, begin + duration)
    }
    #[must_use]
    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
    #[must_use]
    pub fn overlaps(&self, other: &ScheduleSpec) -> bool {
        self.begin < other.end && other.begin < self.end
    }
}

/// Bandwidth held by an existing reservation on a resource
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReservedBandwidth {
    pub urn: Urn,
    pub bandwidth: PortBandwidth,
    pub schedule: ScheduleSpec,
}

/// A VLAN held by an existing reservation on a resource
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReservedVlan {
    pub urn: Urn,
    pub vlan: Vid,
    pub schedule: ScheduleSpec,
}

/// Reservable bandwidth per resource. At most one record per urn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BandwidthAvailability(OrderMap<Urn, PortBandwidth>);

impl BandwidthAvailability {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from raw records.
    ///
    /// # Errors
    ///
    /// Fails with [`TopologyError::DuplicateBandwidthRecord`] if some urn has more than
    /// one record.
    pub fn try_from_records(
        records: impl IntoIterator<Item = (Urn, PortBandwidth)>,
    ) -> TopologyResult<Self> {
        let mut counts: OrderMap<Urn, usize> = OrderMap::new();
        let mut table = OrderMap::new();
        for (urn, bw) in records {
            *counts.entry(urn.clone()).or_default() += 1;
            table.insert(urn, bw);
        }
        if let Some((urn, count)) = counts.into_iter().find(|(_, count)| *count > 1) {
            return Err(TopologyError::DuplicateBandwidthRecord(urn, count));
        }
        Ok(Self(table))
    }

    /// Set the record of a urn, returning the previous one
    pub fn insert(&mut self, urn: Urn, bandwidth: PortBandwidth) -> Option<PortBandwidth> {
        self.0.insert(urn, bandwidth)
    }
    /// The record of a urn. A urn without a record is unconstrained.
    #[must_use]
    pub fn get(&self, urn: &str) -> Option<PortBandwidth> {
        self.0.get(urn).copied()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&Urn, &PortBandwidth)> {
        self.0.iter()
    }
    /// The available bandwidth of every resource, in one direction
    #[must_use]
    pub fn in_direction(&self, direction: BwDirection) -> OrderMap<Urn, Mbps> {
        self.0
            .iter()
            .map(|(urn, bw)| (urn.clone(), bw.get(direction)))
            .collect()
    }

    /// The availability left once the reservations overlapping a schedule are
    /// subtracted. Reservations on urns without a record are ignored.
    #[must_use]
    pub fn minus_reserved(
        &self,
        reserved: &[ReservedBandwidth],
        schedule: &ScheduleSpec,
    ) -> BandwidthAvailability {
        let mut out = self.clone();
        for rsv in reserved.iter().filter(|r| r.schedule.overlaps(schedule)) {
            if let Some(avail) = out.0.get_mut(rsv.urn.as_str()) {
                *avail = avail.saturating_sub(rsv.bandwidth);
            }
        }
        debug!(
            "Subtracted {} overlapping bandwidth reservations",
            reserved.iter().filter(|r| r.schedule.overlaps(schedule)).count()
        );
        out
    }
}

impl FromIterator<(Urn, PortBandwidth)> for BandwidthAvailability {
    fn from_iter<T: IntoIterator<Item = (Urn, PortBandwidth)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Baseline reservable VLANs per resource
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VlanAvailability(OrderMap<Urn, VlanSet>);

impl VlanAvailability {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, urn: Urn, vlans: VlanSet) -> Option<VlanSet> {
        self.0.insert(urn, vlans)
    }
    #[must_use]
    pub fn get(&self, urn: &str) -> Option<&VlanSet> {
        self.0.get(urn)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&Urn, &VlanSet)> {
        self.0.iter()
    }
}

impl FromIterator<(Urn, VlanSet)> for VlanAvailability {
    fn from_iter<T: IntoIterator<Item = (Urn, VlanSet)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The VLANs held, per urn, by the reservations overlapping a schedule
#[must_use]
pub fn reserved_vlans_during(
    reserved: &[ReservedVlan],
    schedule: &ScheduleSpec,
) -> OrderMap<Urn, VlanSet> {
    let mut out: OrderMap<Urn, VlanSet> = OrderMap::new();
    for rsv in reserved.iter().filter(|r| r.schedule.overlaps(schedule)) {
        out.entry(rsv.urn.clone()).or_default().insert(rsv.vlan);
    }
    out
}
