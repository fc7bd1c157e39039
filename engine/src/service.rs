// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The path computation service: answers requests against the latest
//! published topology snapshot.

use crate::errors::{PceError, PceResult};
use crate::nexthop::next_hops_for_ero;
use crate::palindromic::{EroOptions, compute_palindromic_ero};
use crate::request::{EroPair, NextHop, RequestedVlanPipe, ShortestPathRequest, ShortestPathResponse};
use crate::servicetopo::{LogicalEdge, ServiceLayerTopology};
use chrono::TimeDelta;
use derive_builder::Builder;
use net::vlan::VlanRange;
use std::fmt::Display;
use std::time::{Duration, Instant};
use topology::{
    ReservedBandwidth, ReservedVlan, ScheduleSpec, SnapshotReader, TopologyProvider, Urn,
};
use tracing::{debug, info};

/// Struct to configure the path computation service. N.B. we derive a builder
/// type `PceParamsBuilder` and provide defaults for each field.
#[derive(Builder, Clone, Debug)]
pub struct PceParams {
    #[builder(setter(into), default = "pce".to_string())]
    name: String,

    /// time budget of one computation, unbounded if unset
    #[builder(setter(strip_option), default)]
    pub deadline: Option<Duration>,

    /// route over the service layer
    #[builder(default)]
    pub service_layer: bool,

    /// VLANs for the fixtures that name none
    #[builder(setter(into), default)]
    pub default_vlans: Vec<VlanRange>,
}

impl PceParams {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for PceParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        writeln!(f, "PCE config")?;
        writeln!(f, "  name          : {}", self.name)?;
        match self.deadline {
            Some(deadline) => writeln!(f, "  deadline      : {deadline:?}")?,
            None => writeln!(f, "  deadline      : none")?,
        }
        writeln!(f, "  service layer : {}", self.service_layer)?;
        let vlans: Vec<String> = self.default_vlans.iter().map(ToString::to_string).collect();
        writeln!(f, "  default vlans : {}", if vlans.is_empty() { "any".to_string() } else { vlans.join(",") })
    }
}

/// A path computation service bound to a stream of topology snapshots.
///
/// Every request is served from the snapshot current when it starts, which
/// stays consistent until the request completes.
pub struct Pce {
    params: PceParams,
    snapshot: SnapshotReader,
}

impl Pce {
    #[must_use]
    pub fn new(params: PceParams, snapshot: SnapshotReader) -> Self {
        info!("Created PCE '{}'", params.name);
        Self { params, snapshot }
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.params.name
    }
    #[must_use]
    pub fn params(&self) -> &PceParams {
        &self.params
    }

    fn options(&self) -> EroOptions {
        EroOptions {
            deadline: self.params.deadline.and_then(|d| Instant::now().checked_add(d)),
            service_layer: self.params.service_layer,
        }
    }

    fn with_default_vlans(&self, pipe: &RequestedVlanPipe) -> RequestedVlanPipe {
        let mut pipe = pipe.clone();
        if !self.params.default_vlans.is_empty() {
            for fixture in pipe.a.fixtures.iter_mut().chain(pipe.z.fixtures.iter_mut()) {
                if fixture.vlans.is_empty() {
                    fixture.vlans.clone_from(&self.params.default_vlans);
                }
            }
        }
        pipe
    }

    /// Compute the routes of a pipe, net of the reservations overlapping
    /// `schedule`.
    ///
    /// # Errors
    ///
    /// See [`compute_palindromic_ero`]. Also fails with
    /// [`PceError::SnapshotUnavailable`] if no snapshot is published.
    pub fn compute(
        &self,
        pipe: &RequestedVlanPipe,
        schedule: &ScheduleSpec,
        reserved_bw: &[ReservedBandwidth],
        reserved_vlans: &[ReservedVlan],
    ) -> PceResult<EroPair> {
        let guard = self.snapshot.enter().ok_or(PceError::SnapshotUnavailable)?;
        let pipe = self.with_default_vlans(pipe);
        compute_palindromic_ero(&*guard, &pipe, schedule, reserved_bw, reserved_vlans, self.options())
    }

    /// Answer a device-to-device shortest path query, with no reservation
    /// subtracted.
    ///
    /// # Errors
    ///
    /// Fails with [`PceError::InvalidRequest`] if both ends are the same,
    /// otherwise as [`Pce::compute`].
    pub fn shortest_path(&self, request: &ShortestPathRequest) -> PceResult<ShortestPathResponse> {
        if request.a == request.z {
            return Err(PceError::InvalidRequest(format!(
                "both ends of the path are {}",
                request.a
            )));
        }
        debug!("Shortest path query {} -> {}", request.a, request.z);
        let schedule = ScheduleSpec::starting_now(TimeDelta::minutes(1))?;
        let eros = self.compute(&request.to_pipe(), &schedule, &[], &[])?;
        Ok(ShortestPathResponse::from(&eros))
    }

    /// The possible next hops out of the last device of a route prefix
    ///
    /// # Errors
    ///
    /// See [`next_hops_for_ero`]. Also fails with
    /// [`PceError::SnapshotUnavailable`] if no snapshot is published.
    pub fn next_hops_for_ero(&self, prefix: &[Urn]) -> PceResult<Vec<NextHop>> {
        let guard = self.snapshot.enter().ok_or(PceError::SnapshotUnavailable)?;
        next_hops_for_ero(&*guard, prefix)
    }

    /// The logical links of the service layer of the whole topology
    ///
    /// # Errors
    ///
    /// Fails with [`PceError::SnapshotUnavailable`] if no snapshot is published
    /// and with [`PceError::DeadlineExceeded`] if the deadline passes.
    pub fn logical_links(&self) -> PceResult<Vec<LogicalEdge>> {
        let guard = self.snapshot.enter().ok_or(PceError::SnapshotUnavailable)?;
        let merged = guard.merged();
        let service = ServiceLayerTopology::from_provider(&*guard, &merged, &[], self.options().deadline)?;
        Ok(service.logical_links().to_vec())
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::request::{Fixture, Junction};
    use pretty_assertions::assert_eq;
    use topology::testing::{diamond, linear};
    use topology::SnapshotWriter;

    #[test]
    fn test_params_builder_defaults() {
        let params = PceParamsBuilder::default().build().unwrap();
        assert_eq!(params.name(), "pce");
        assert_eq!(params.deadline, None);
        assert!(!params.service_layer);
        assert!(params.default_vlans.is_empty());

        let params = PceParamsBuilder::default()
            .name("lab")
            .deadline(Duration::from_millis(250))
            .service_layer(true)
            .build()
            .unwrap();
        assert_eq!(params.name(), "lab");
        assert_eq!(params.deadline, Some(Duration::from_millis(250)));
        assert!(params.to_string().contains("service layer : true"));
    }

    #[test]
    fn test_shortest_path_service() {
        let (_writer, reader) = SnapshotWriter::new_with_data(linear().unwrap());
        let pce = Pce::new(PceParamsBuilder::default().build().unwrap(), reader);
        let request = ShortestPathRequest { a: "switchA".into(), z: "switchE".into(), az_bw: 20, za_bw: 20 };
        let response = pce.shortest_path(&request).unwrap();
        assert_eq!(response.az.len(), 12);
        assert_eq!(response.za.len(), 12);
        assert_eq!(response.az[0].a.as_str(), "switchA");
        assert_eq!(response.za[11].z.as_str(), "switchA");

        let same = ShortestPathRequest { a: "switchA".into(), z: "switchA".into(), az_bw: 1, za_bw: 1 };
        assert!(matches!(pce.shortest_path(&same), Err(PceError::InvalidRequest(_))));

        let hops = pce.next_hops_for_ero(&["switchA".into()]).unwrap();
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].to.as_str(), "routerB");

        let links = pce.logical_links().unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.metric() == 400));
    }

    #[test]
    fn test_default_vlans_apply_to_bare_fixtures() {
        let (_writer, reader) = SnapshotWriter::new_with_data(diamond().unwrap());
        let params = PceParamsBuilder::default()
            .default_vlans(vec!["250-260".parse::<VlanRange>().unwrap()])
            .build()
            .unwrap();
        let pce = Pce::new(params, reader);
        let pipe = RequestedVlanPipe::new(
            Junction::new("west", vec![Fixture::new("west:1", vec![], 1, 1)]),
            Junction::new("east", vec![Fixture::new("east:3", vec![], 1, 1)]),
            10,
            10,
        );
        let window = ScheduleSpec::starting_now(TimeDelta::hours(1)).unwrap();
        let eros = pce.compute(&pipe, &window, &[], &[]).unwrap();
        // north does not carry 250-260
        assert!(eros.az.iter().any(|e| e.touches("south")));
    }
}
