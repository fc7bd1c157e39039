// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Execution of the queries given on the command line

use crate::args::Command;
use chrono::TimeDelta;
use engine::{Pce, PceError, RequestedVlanPipe, ShortestPathRequest, ShortestPathResponse};
use serde::Deserialize;
use std::fmt::Write;
use std::path::Path;
use thiserror::Error;
use topology::{
    ReservedBandwidth, ReservedVlan, ScheduleSpec, SnapshotWriter, TopologyError,
    TopologyProvider, Urn,
};
use tracing::debug;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("Could not read {0}: {1}")]
    Io(String, String),
    #[error("Invalid pipe request: {0}")]
    InvalidPipe(String),
    #[error("Could not render output: {0}")]
    Output(String),
    #[error(transparent)]
    Pce(#[from] PceError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// A pipe to route, with the reservations to route around
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PipeRequest {
    pipe: RequestedVlanPipe,
    /// one hour from now, if unset
    #[serde(default)]
    schedule: Option<ScheduleSpec>,
    #[serde(default)]
    reserved_bandwidth: Vec<ReservedBandwidth>,
    #[serde(default)]
    reserved_vlans: Vec<ReservedVlan>,
}

impl PipeRequest {
    pub(crate) fn from_yaml_str(yaml: &str) -> Result<Self, CliError> {
        serde_yaml_ng::from_str(yaml).map_err(|e| CliError::InvalidPipe(e.to_string()))
    }

    fn load(path: &Path) -> Result<Self, CliError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(path.display().to_string(), e.to_string()))?;
        Self::from_yaml_str(&yaml)
    }
}

fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_yaml_ng::to_string(value).map_err(|e| CliError::Output(e.to_string()))
}

fn route_pipe(pce: &Pce, request: &PipeRequest) -> Result<String, CliError> {
    let schedule = match request.schedule {
        Some(schedule) => schedule,
        None => ScheduleSpec::starting_now(TimeDelta::hours(1))?,
    };
    let eros = pce.compute(
        &request.pipe,
        &schedule,
        &request.reserved_bandwidth,
        &request.reserved_vlans,
    )?;
    let mut out = eros.to_string();
    out.push_str(&to_yaml(&ShortestPathResponse::from(&eros))?);
    Ok(out)
}

/// Run one query against the snapshot published by `writer` and render its
/// answer.
pub(crate) fn run(pce: &Pce, writer: &SnapshotWriter, command: &Command) -> Result<String, CliError> {
    debug!("Running {command:?}");
    match command {
        Command::ShortestPath { a, z, az_bw, za_bw } => {
            let request = ShortestPathRequest {
                a: a.as_str().into(),
                z: z.as_str().into(),
                az_bw: *az_bw,
                za_bw: *za_bw,
            };
            to_yaml(&pce.shortest_path(&request)?)
        }
        Command::Pipe { file } => route_pipe(pce, &PipeRequest::load(file)?),
        Command::NextHops { prefix } => {
            let prefix: Vec<Urn> = prefix.iter().map(|u| Urn::from(u.as_str())).collect();
            let mut out = String::new();
            for hop in pce.next_hops_for_ero(&prefix)? {
                let _ = writeln!(out, "{hop}");
            }
            Ok(out)
        }
        Command::LogicalLinks => {
            let mut out = String::new();
            for link in pce.logical_links()? {
                let _ = writeln!(out, "{link}");
            }
            Ok(out)
        }
        Command::Topology => {
            let guard = writer.enter().ok_or(PceError::SnapshotUnavailable)?;
            Ok(guard.merged().to_string())
        }
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use engine::PceParamsBuilder;
    use topology::testing::{diamond, linear};

    fn pce_on(snapshot: topology::TopologySnapshot) -> (SnapshotWriter, Pce) {
        let (writer, reader) = SnapshotWriter::new_with_data(snapshot);
        (writer, Pce::new(PceParamsBuilder::default().build().unwrap(), reader))
    }

    #[test]
    fn test_run_shortest_path() {
        let (writer, pce) = pce_on(linear().unwrap());
        let command = Command::ShortestPath {
            a: "switchA".to_string(),
            z: "switchE".to_string(),
            az_bw: 10,
            za_bw: 10,
        };
        let out = run(&pce, &writer, &command).unwrap();
        let response: ShortestPathResponse = serde_yaml_ng::from_str(&out).unwrap();
        assert_eq!(response.az.len(), 12);
        assert_eq!(response.az[0].a.as_str(), "switchA");

        let unknown = Command::ShortestPath { a: "switchA".to_string(), z: "nowhere".to_string(), az_bw: 0, za_bw: 0 };
        assert!(matches!(run(&pce, &writer, &unknown), Err(CliError::Pce(PceError::NoSuchUrn(_)))));
    }

    #[test]
    fn test_run_listings() {
        let (writer, pce) = pce_on(linear().unwrap());
        let out = run(&pce, &writer, &Command::NextHops { prefix: vec!["switchA".to_string()] }).unwrap();
        assert!(out.contains("routerB"));

        let out = run(&pce, &writer, &Command::LogicalLinks).unwrap();
        assert_eq!(out.matches("Logical ").count(), 2);

        let out = run(&pce, &writer, &Command::Topology).unwrap();
        assert!(out.contains("routerC"));
    }

    #[test]
    fn test_pipe_request() {
        let yaml = r#"
pipe:
  a:
    device: west
    fixtures:
      - port: "west:1"
        vlans: ["250"]
        ingress_mbps: 10
        egress_mbps: 10
  z:
    device: east
    fixtures:
      - port: "east:3"
        ingress_mbps: 10
        egress_mbps: 10
  az_mbps: 10
  za_mbps: 10
"#;
        let request = PipeRequest::from_yaml_str(yaml).unwrap();
        assert!(request.schedule.is_none());
        assert!(request.reserved_vlans.is_empty());

        let (_writer, pce) = pce_on(diamond().unwrap());
        let out = route_pipe(&pce, &request).unwrap();
        assert!(out.contains("south"));
        assert!(!out.contains("north"));

        assert!(matches!(PipeRequest::from_yaml_str("pipe: 3"), Err(CliError::InvalidPipe(_))));
    }
}
