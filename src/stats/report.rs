//! Stats report: the keyed record container delivered to callers.
//!
//! A report is built incrementally by producers, merged across domains, and
//! then published behind an `Arc`. Once published nobody holds a mutable
//! handle to it, so every holder sees the same immutable instance.

use std::collections::btree_map::{self, BTreeMap};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::record::{RtcStats, StatsType};
use crate::error::StatsError;

/// Records keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsReport {
    stats: BTreeMap<String, RtcStats>,
}

impl StatsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&RtcStats> {
        self.stats.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.stats.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, RtcStats> {
        self.stats.values()
    }

    /// Insert a record whose id must not be present yet.
    ///
    /// Producers that may see the same entity twice check [`get`](Self::get)
    /// first. A duplicate here is a producer bug and panics.
    pub fn add_stats(&mut self, stats: RtcStats) {
        if let Err(e) = self.try_add_stats(stats) {
            panic!("{}", e);
        }
    }

    pub fn try_add_stats(&mut self, stats: RtcStats) -> Result<(), StatsError> {
        match self.stats.entry(stats.id().to_string()) {
            btree_map::Entry::Occupied(entry) => Err(StatsError::DuplicateId(entry.key().clone())),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(stats);
                Ok(())
            }
        }
    }

    /// Move every record of `other` into this report.
    ///
    /// Domains contribute disjoint id spaces; a collision panics.
    pub fn take_members_from(&mut self, other: StatsReport) {
        for (_, stats) in other.stats {
            self.add_stats(stats);
        }
    }

    /// All records of concrete type `T`, in id order.
    pub fn get_stats_of_type<T: StatsType>(&self) -> Vec<&T> {
        self.stats.values().filter_map(T::from_stats).collect()
    }
}

impl<'a> IntoIterator for &'a StatsReport {
    type Item = &'a RtcStats;
    type IntoIter = btree_map::Values<'a, String, RtcStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for StatsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.stats.len()))?;
        for (id, stats) in &self.stats {
            map.serialize_entry(id, stats)?;
        }
        map.end()
    }
}
