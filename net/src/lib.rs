// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![forbid(unsafe_code)] // Validation logic should always be strictly safe
#![deny(missing_docs, clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Strictly validated network resource types used to express circuit demands:
//! VLAN identifiers, ranges and sets, and bandwidth quantities.

pub mod bandwidth;
pub mod vlan;
