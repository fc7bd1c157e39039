// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The error results used by this library.

use crate::urn::Urn;
use net::vlan::VlanExprError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TopologyError {
    #[error("No resource with urn '{0}'")]
    NoSuchUrn(Urn),

    #[error("A resource with urn '{0}' already exists")]
    DuplicateUrn(Urn),

    #[error("Port '{0}' refers to unknown device '{1}'")]
    NoSuchDevice(Urn, Urn),

    #[error("Link {0} -> {1} refers to a resource that is not a port")]
    NotAPort(Urn, Urn),

    #[error("Found {1} bandwidth records for urn '{0}', expected at most one")]
    DuplicateBandwidthRecord(Urn, usize),

    #[error("Invalid VLAN expression for '{0}': {1}")]
    InvalidVlans(Urn, VlanExprError),

    #[error("Schedule ends ({1}) before it begins ({0})")]
    InvalidSchedule(String, String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Failed to read snapshot '{0}': {1}")]
    SnapshotIo(String, String),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
