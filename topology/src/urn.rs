// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Resource URNs and the map from URN strings to their records

use ordermap::OrderMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::Display;

/// Globally unique identifier of a topology resource
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    #[must_use]
    pub fn new(urn: impl Into<String>) -> Self {
        Self(urn.into())
    }
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for Urn {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<String> for Urn {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl Borrow<str> for Urn {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl Display for Urn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of resource a [`Urn`] names
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrnType {
    Device,
    Port,
    Ifce,
    Internal,
}

/// What the inventory knows about a [`Urn`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrnRecord {
    pub urn: Urn,
    pub urn_type: UrnType,
    /// owning device, for ports and interfaces
    pub device: Option<Urn>,
}

impl UrnRecord {
    #[must_use]
    pub fn device(urn: Urn) -> Self {
        Self {
            urn,
            urn_type: UrnType::Device,
            device: None,
        }
    }
    #[must_use]
    pub fn port(urn: Urn, device: Urn) -> Self {
        Self {
            urn,
            urn_type: UrnType::Port,
            device: Some(device),
        }
    }
}

/// Lookup from URN string to [`UrnRecord`], with the device / port relation
#[derive(Clone, Debug, Default)]
pub struct UrnMap {
    records: OrderMap<Urn, UrnRecord>,
    ports: OrderMap<Urn, Vec<Urn>>,
}

impl UrnMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add a record. Returns the previous record for the same urn, if any.
    pub fn insert(&mut self, record: UrnRecord) -> Option<UrnRecord> {
        if let Some(device) = &record.device {
            let ports = self.ports.entry(device.clone()).or_default();
            if !ports.contains(&record.urn) {
                ports.push(record.urn.clone());
            }
        }
        self.records.insert(record.urn.clone(), record)
    }
    #[must_use]
    pub fn get(&self, urn: &str) -> Option<&UrnRecord> {
        self.records.get(urn)
    }
    #[must_use]
    pub fn contains(&self, urn: &str) -> bool {
        self.records.contains_key(urn)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn records(&self) -> impl Iterator<Item = &UrnRecord> {
        self.records.values()
    }
    /// The device owning a port or interface
    #[must_use]
    pub fn device_of(&self, urn: &str) -> Option<&Urn> {
        self.records.get(urn).and_then(|r| r.device.as_ref())
    }
    /// The ports of a device, in insertion order
    pub fn ports_of(&self, device: &str) -> impl Iterator<Item = &Urn> {
        self.ports.get(device).into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urn_map_relations() {
        let mut map = UrnMap::new();
        map.insert(UrnRecord::device("dev".into()));
        map.insert(UrnRecord::port("dev:1".into(), "dev".into()));
        map.insert(UrnRecord::port("dev:2".into(), "dev".into()));
        assert!(map.insert(UrnRecord::port("dev:2".into(), "dev".into())).is_some());

        assert_eq!(map.len(), 3);
        assert_eq!(map.device_of("dev:1"), Some(&Urn::from("dev")));
        assert_eq!(map.device_of("dev"), None);
        let ports: Vec<&str> = map.ports_of("dev").map(Urn::as_str).collect();
        assert_eq!(ports, vec!["dev:1", "dev:2"]);
        assert_eq!(map.ports_of("nope").count(), 0);
    }
}
