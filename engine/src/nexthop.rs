// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Next-hop advice for building a route interactively

use crate::errors::{PceError, PceResult};
use crate::request::NextHop;
use ordermap::OrderSet;
use topology::{AdjacencyProvider, TopologyProvider, Urn, UrnType};
use tracing::debug;

/// The adjacencies out of the last device of a route prefix that lead to a
/// device the prefix has not visited yet.
///
/// # Errors
///
/// Fails with [`PceError::EmptyPrefix`] on an empty prefix, with
/// [`PceError::NoSuchUrn`] if some urn of the prefix is unknown and with
/// [`PceError::NotADevice`] if the prefix does not end at a device.
pub fn next_hops_for_ero<P: TopologyProvider + AdjacencyProvider>(
    provider: &P,
    prefix: &[Urn],
) -> PceResult<Vec<NextHop>> {
    let urn_map = provider.urn_map();
    let mut visited: OrderSet<&Urn> = OrderSet::new();
    for urn in prefix {
        let record = urn_map
            .get(urn.as_str())
            .ok_or_else(|| PceError::NoSuchUrn(urn.clone()))?;
        match record.urn_type {
            UrnType::Device => {
                visited.insert(&record.urn);
            }
            _ => {
                if let Some(device) = &record.device {
                    visited.insert(device);
                }
            }
        }
    }
    let last = prefix.last().ok_or(PceError::EmptyPrefix)?;
    if urn_map
        .get(last.as_str())
        .is_none_or(|r| r.urn_type != UrnType::Device)
    {
        return Err(PceError::NotADevice(last.clone()));
    }

    let mut hops = Vec::new();
    for port in urn_map.ports_of(last.as_str()) {
        for adj in provider.adjacencies_originating_from(port.as_str()) {
            if visited.contains(adj.far_device()) {
                continue;
            }
            hops.push(NextHop {
                urn: port.clone(),
                to: adj.far_device().clone(),
                through: adj.far_port().clone(),
            });
        }
    }
    debug!("{} next hops out of {last}", hops.len());
    Ok(hops)
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use topology::testing::linear;

    fn urns(list: &[&str]) -> Vec<Urn> {
        list.iter().map(|u| Urn::from(*u)).collect()
    }

    #[test]
    fn test_next_hops_skip_visited_devices() {
        let snapshot = linear().unwrap();
        let hops = next_hops_for_ero(&snapshot, &urns(&["routerC"])).unwrap();
        assert_eq!(hops.len(), 2);

        let hops = next_hops_for_ero(&snapshot, &urns(&["routerB", "routerB:2", "routerC:1", "routerC"])).unwrap();
        assert_eq!(hops, vec![NextHop {
            urn: "routerC:2".into(),
            to: "routerD".into(),
            through: "routerD:1".into(),
        }]);
    }

    #[test]
    fn test_next_hops_errors() {
        let snapshot = linear().unwrap();
        assert_eq!(next_hops_for_ero(&snapshot, &[]).err(), Some(PceError::EmptyPrefix));
        assert_eq!(
            next_hops_for_ero(&snapshot, &urns(&["routerB", "bogus"])).err(),
            Some(PceError::NoSuchUrn("bogus".into()))
        );
        assert_eq!(
            next_hops_for_ero(&snapshot, &urns(&["routerB", "routerB:2"])).err(),
            Some(PceError::NotADevice("routerB:2".into()))
        );
    }
}
