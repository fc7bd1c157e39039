// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The error results used by this library.

use thiserror::Error;
use topology::{TopologyError, Urn};

/// Coarse classification of [`PceError`]s, for callers mapping failures onto
/// their own status codes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PceErrorKind {
    /// A referenced resource does not exist
    NotFound,
    /// The resources exist but no feasible route does
    PathComputation,
    /// An invariant was violated by the inputs or by the engine itself
    Internal,
    /// The request is malformed
    InvalidRequest,
    /// The computation ran past its deadline
    Deadline,
}

#[derive(Error, Debug, PartialEq)]
pub enum PceError {
    #[error("No resource with urn '{0}'")]
    NoSuchUrn(Urn),

    #[error("'{0}' is not a device")]
    NotADevice(Urn),

    #[error("Empty path prefix")]
    EmptyPrefix,

    #[error("No path from {0} to {1}")]
    NoPath(Urn, Urn),

    #[error("No reverse edge for hop {0} -> {1}")]
    MissingReverseEdge(Urn, Urn),

    #[error("Logical hop {0} -> {1} has no physical expansion")]
    UnknownLogicalHop(Urn, Urn),

    #[error("A-Z and Z-A EROs differ in length ({0} vs {1})")]
    AsymmetricEro(usize, usize),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Topology snapshot is not available")]
    SnapshotUnavailable,

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),
}

impl PceError {
    #[must_use]
    pub fn kind(&self) -> PceErrorKind {
        match self {
            PceError::NoSuchUrn(_) | PceError::NotADevice(_) | PceError::EmptyPrefix => {
                PceErrorKind::NotFound
            }
            PceError::NoPath(_, _) | PceError::MissingReverseEdge(_, _) => {
                PceErrorKind::PathComputation
            }
            PceError::UnknownLogicalHop(_, _)
            | PceError::AsymmetricEro(_, _)
            | PceError::SnapshotUnavailable
            | PceError::Topology(_) => PceErrorKind::Internal,
            PceError::InvalidRequest(_) => PceErrorKind::InvalidRequest,
            PceError::DeadlineExceeded => PceErrorKind::Deadline,
        }
    }
}

pub type PceResult<T> = Result<T, PceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(PceError::NoSuchUrn("x".into()).kind(), PceErrorKind::NotFound);
        assert_eq!(PceError::EmptyPrefix.kind(), PceErrorKind::NotFound);
        assert_eq!(PceError::NoPath("a".into(), "z".into()).kind(), PceErrorKind::PathComputation);
        assert_eq!(PceError::AsymmetricEro(3, 2).kind(), PceErrorKind::Internal);
        assert_eq!(
            PceError::from(TopologyError::DuplicateBandwidthRecord("p".into(), 2)).kind(),
            PceErrorKind::Internal
        );
        assert_eq!(PceError::DeadlineExceeded.kind(), PceErrorKind::Deadline);
    }
}
