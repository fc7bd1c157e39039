// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN identifiers, ranges and sets.

#[allow(unused_imports)] // conditional re-export
#[cfg(any(test, feature = "bolero"))]
pub use contract::*;

use core::num::NonZero;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A VLAN Identifier.
///
/// This type is marked `#[repr(transparent)]` so that [`Option<Vid>`] has the same size
/// as a `u16`.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Vid(NonZero<u16>);

/// Errors which can occur when converting a `u16` to a validated [`Vid`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[must_use]
pub enum InvalidVid {
    /// 0 is a reserved [`Vid`] which means "the native vlan".
    #[error("Zero is a reserved Vid")]
    Zero,
    /// 4095 is a reserved [`Vid`].
    #[error("4095 is a reserved Vid")]
    Reserved,
    /// The value is too large to be a legal [`Vid`] (12-bit max).
    #[error("{0} is too large to be a legal Vid ({MAX} is max legal value)", MAX = Vid::MAX)]
    TooLarge(u16),
}

impl InvalidVid {
    /// The raw `u16` value of the reserved (4095) [`Vid`]
    pub const RESERVED: u16 = 4095;
}

impl Vid {
    /// The minimum legal [`Vid`] value (1).
    #[allow(clippy::unwrap_used)] // safe due to const eval
    pub const MIN: Vid = Vid(NonZero::new(1).unwrap());

    /// The maximum legal [`Vid`] value (2^12 - 2).
    #[allow(clippy::unwrap_used)] // safe due to const eval
    pub const MAX: Vid = Vid(NonZero::new(4094).unwrap());

    /// Create a new [`Vid`] from a `u16`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is 0, 4095 (reserved), or greater than [`Vid::MAX`].
    pub fn new(vid: u16) -> Result<Self, InvalidVid> {
        match NonZero::new(vid) {
            None => Err(InvalidVid::Zero),
            Some(val) if val.get() == InvalidVid::RESERVED => Err(InvalidVid::Reserved),
            Some(val) if val.get() > InvalidVid::RESERVED => Err(InvalidVid::TooLarge(val.get())),
            Some(val) => Ok(Vid(val)),
        }
    }

    /// Get the value of the [`Vid`] as a `u16`.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0.get()
    }
}

impl From<Vid> for u16 {
    fn from(vid: Vid) -> u16 {
        vid.as_u16()
    }
}

impl TryFrom<u16> for Vid {
    type Error = InvalidVid;

    fn try_from(vid: u16) -> Result<Vid, Self::Error> {
        Vid::new(vid)
    }
}

impl Display for Vid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Errors when parsing VLAN ranges and expressions
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VlanExprError {
    /// The expression has nothing in it
    #[error("Empty VLAN expression")]
    Empty,
    /// A component is not a number
    #[error("'{0}' is not a VLAN id")]
    NotANumber(String),
    /// A number is not a legal [`Vid`]
    #[error("Invalid VLAN id: {0}")]
    InvalidVid(#[from] InvalidVid),
    /// A range whose first id is greater than its last
    #[error("Inverted VLAN range {0}-{1}")]
    Inverted(u16, u16),
}

/// An inclusive range of [`Vid`]s.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VlanRange {
    first: Vid,
    last: Vid,
}

impl VlanRange {
    /// The range of every legal [`Vid`]
    pub const ANY: VlanRange = VlanRange {
        first: Vid::MIN,
        last: Vid::MAX,
    };

    /// Build a range from its first and last [`Vid`]s.
    ///
    /// # Errors
    ///
    /// Returns [`VlanExprError::Inverted`] if `first` is greater than `last`.
    pub fn new(first: Vid, last: Vid) -> Result<Self, VlanExprError> {
        if first > last {
            return Err(VlanExprError::Inverted(first.as_u16(), last.as_u16()));
        }
        Ok(Self { first, last })
    }

    /// A range made of a single [`Vid`]
    #[must_use]
    pub const fn single(vid: Vid) -> Self {
        Self {
            first: vid,
            last: vid,
        }
    }

    /// First [`Vid`] of the range
    #[must_use]
    pub const fn first(&self) -> Vid {
        self.first
    }

    /// Last [`Vid`] of the range
    #[must_use]
    pub const fn last(&self) -> Vid {
        self.last
    }

    /// Tell if the range includes a [`Vid`]
    #[must_use]
    pub fn contains(&self, vid: Vid) -> bool {
        self.first <= vid && vid <= self.last
    }
}

fn parse_vid(input: &str) -> Result<Vid, VlanExprError> {
    let raw = input
        .trim()
        .parse::<u16>()
        .map_err(|_| VlanExprError::NotANumber(input.trim().to_string()))?;
    Ok(Vid::new(raw)?)
}

impl FromStr for VlanRange {
    type Err = VlanExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VlanExprError::Empty);
        }
        match s.split_once('-') {
            Some((first, last)) => VlanRange::new(parse_vid(first)?, parse_vid(last)?),
            None => Ok(VlanRange::single(parse_vid(s)?)),
        }
    }
}

impl TryFrom<String> for VlanRange {
    type Error = VlanExprError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VlanRange> for String {
    fn from(range: VlanRange) -> Self {
        range.to_string()
    }
}

impl Display for VlanRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// A set of [`Vid`]s
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VlanSet(RoaringBitmap);

impl VlanSet {
    /// The empty set
    #[must_use]
    pub fn new() -> Self {
        Self(RoaringBitmap::new())
    }

    /// The set of all legal [`Vid`]s
    #[must_use]
    pub fn full() -> Self {
        Self::from_ranges(&[VlanRange::ANY])
    }

    /// Build a set from a collection of ranges
    #[must_use]
    pub fn from_ranges(ranges: &[VlanRange]) -> Self {
        let mut bitmap = RoaringBitmap::new();
        for range in ranges {
            bitmap.insert_range(u32::from(range.first.as_u16())..=u32::from(range.last.as_u16()));
        }
        Self(bitmap)
    }

    /// Add a [`Vid`] to the set. Returns true if it was not present.
    pub fn insert(&mut self, vid: Vid) -> bool {
        self.0.insert(u32::from(vid.as_u16()))
    }

    /// Tell if the set contains a [`Vid`]
    #[must_use]
    pub fn contains(&self, vid: Vid) -> bool {
        self.0.contains(u32::from(vid.as_u16()))
    }

    /// Number of [`Vid`]s in the set
    #[must_use]
    pub fn len(&self) -> u64 {
        self.0.len()
    }

    /// Tell if the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowest [`Vid`] in the set, if any
    #[must_use]
    pub fn first(&self) -> Option<Vid> {
        self.iter().next()
    }

    /// The [`Vid`]s present in both sets
    #[must_use]
    pub fn intersection(&self, other: &VlanSet) -> VlanSet {
        VlanSet(&self.0 & &other.0)
    }

    /// The [`Vid`]s of this set not present in the other
    #[must_use]
    pub fn difference(&self, other: &VlanSet) -> VlanSet {
        VlanSet(&self.0 - &other.0)
    }

    /// The [`Vid`]s present in either set
    #[must_use]
    pub fn union(&self, other: &VlanSet) -> VlanSet {
        VlanSet(&self.0 | &other.0)
    }

    /// Iterate over the [`Vid`]s of the set, in increasing order
    pub fn iter(&self) -> impl Iterator<Item = Vid> + '_ {
        self.0
            .iter()
            .filter_map(|raw| u16::try_from(raw).ok())
            .filter_map(|raw| Vid::new(raw).ok())
    }

    /// Collapse the set into the minimal list of ranges covering it
    #[must_use]
    pub fn to_ranges(&self) -> Vec<VlanRange> {
        let mut ranges: Vec<VlanRange> = Vec::new();
        for vid in self.iter() {
            match ranges.last_mut() {
                Some(range) if range.last.as_u16() + 1 == vid.as_u16() => range.last = vid,
                _ => ranges.push(VlanRange::single(vid)),
            }
        }
        ranges
    }
}

impl FromIterator<Vid> for VlanSet {
    fn from_iter<T: IntoIterator<Item = Vid>>(iter: T) -> Self {
        let mut set = VlanSet::new();
        for vid in iter {
            set.insert(vid);
        }
        set
    }
}

impl Display for VlanSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges: Vec<String> = self.to_ranges().iter().map(ToString::to_string).collect();
        write!(f, "{}", ranges.join(","))
    }
}

/// Parse a VLAN expression into a [`VlanSet`].
///
/// An expression is a comma-separated list of ids and inclusive ranges, e.g.
/// `"100-200,300"`. The keywords `any` and `*` stand for every legal id.
///
/// # Errors
///
/// Returns a [`VlanExprError`] if the expression is empty or any component is not a
/// legal id or range.
pub fn parse_vlan_expression(expr: &str) -> Result<VlanSet, VlanExprError> {
    Ok(VlanSet::from_ranges(&parse_vlan_ranges(expr)?))
}

/// Parse a VLAN expression into its list of ranges, as written.
///
/// # Errors
///
/// Same as [`parse_vlan_expression`].
pub fn parse_vlan_ranges(expr: &str) -> Result<Vec<VlanRange>, VlanExprError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(VlanExprError::Empty);
    }
    if expr.eq_ignore_ascii_case("any") || expr == "*" {
        return Ok(vec![VlanRange::ANY]);
    }
    expr.split(',').map(str::parse).collect()
}

impl FromStr for VlanSet {
    type Err = VlanExprError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_vlan_expression(s)
    }
}

impl TryFrom<String> for VlanSet {
    type Error = VlanExprError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VlanSet> for String {
    fn from(set: VlanSet) -> Self {
        set.to_string()
    }
}

/// Contracts for VLAN types
#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::vlan::{InvalidVid, Vid, VlanRange};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Vid {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw = u.produce::<u16>()? & 0x0fff;
            match Vid::new(raw) {
                Ok(vid) => Some(vid),
                Err(InvalidVid::Zero) => Some(Vid::MIN),
                Err(InvalidVid::Reserved | InvalidVid::TooLarge(_)) => Some(Vid::MAX),
            }
        }
    }

    impl TypeGenerator for VlanRange {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let a: Vid = u.produce()?;
            let b: Vid = u.produce()?;
            VlanRange::new(a.min(b), a.max(b)).ok()
        }
    }
}
