//! Membership maps for subjects and objects.
//!
//! A `MembershipTracker` only does bookkeeping: it adds and removes zones
//! from records and keeps each record's cached flags current. Access
//! policy and notifications are layered on top by the registry, which
//! owns one tracker for subjects and one for objects.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use super::record::MembershipRecord;
use crate::core::ZoneKey;
use crate::flags::{FlagAggregator, FlagSet, FlagSource};

/// Records for one kind of member, keyed by member id.
#[derive(Clone, Debug)]
pub struct MembershipTracker<M> {
    records: FxHashMap<M, MembershipRecord>,
}

impl<M> Default for MembershipTracker<M> {
    fn default() -> Self {
        Self {
            records: FxHashMap::default(),
        }
    }
}

impl<M: Copy + Eq + Hash> MembershipTracker<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `zone` to `member`'s record, creating the record if needed.
    ///
    /// Returns false if the member was already in the zone.
    pub fn enter(
        &mut self,
        member: M,
        zone: ZoneKey,
        aggregator: &mut FlagAggregator,
        source: &impl FlagSource,
    ) -> bool {
        let record = self.records.entry(member).or_default();
        if !record.insert(zone) {
            return false;
        }
        let flags = aggregator.flags_for(record.zones(), source);
        record.set_flags(flags);
        true
    }

    /// Remove `zone` from `member`'s record, deleting the record when it
    /// becomes empty.
    ///
    /// Returns false if the member was not in the zone.
    pub fn exit(
        &mut self,
        member: M,
        zone: ZoneKey,
        aggregator: &mut FlagAggregator,
        source: &impl FlagSource,
    ) -> bool {
        let Some(record) = self.records.get_mut(&member) else {
            return false;
        };
        if !record.remove(zone) {
            return false;
        }
        if record.is_empty() {
            self.records.remove(&member);
        } else {
            let flags = aggregator.flags_for(record.zones(), source);
            record.set_flags(flags);
        }
        true
    }

    /// Effective flags for a member (empty if it has no record).
    #[must_use]
    pub fn flags(&self, member: M) -> FlagSet {
        self.records.get(&member).map_or(FlagSet::EMPTY, MembershipRecord::flags)
    }

    /// Zones a member occupies.
    #[must_use]
    pub fn zones(&self, member: M) -> &[ZoneKey] {
        self.records.get(&member).map_or(&[], MembershipRecord::zones)
    }

    #[must_use]
    pub fn is_in(&self, member: M, zone: ZoneKey) -> bool {
        self.records.get(&member).is_some_and(|r| r.contains(zone))
    }

    #[must_use]
    pub fn record(&self, member: M) -> Option<&MembershipRecord> {
        self.records.get(&member)
    }

    /// Members currently inside `zone`.
    #[must_use]
    pub fn members_of(&self, zone: ZoneKey) -> Vec<M> {
        self.records
            .iter()
            .filter(|(_, record)| record.contains(zone))
            .map(|(&member, _)| member)
            .collect()
    }

    /// Recompute cached flags of every record holding `zone`.
    pub fn refresh_zone(&mut self, zone: ZoneKey, aggregator: &mut FlagAggregator, source: &impl FlagSource) {
        for record in self.records.values_mut().filter(|r| r.contains(zone)) {
            let flags = aggregator.flags_for(record.zones(), source);
            record.set_flags(flags);
        }
    }

    /// Recompute cached flags of every record.
    pub fn refresh_all(&mut self, aggregator: &mut FlagAggregator, source: &impl FlagSource) {
        for record in self.records.values_mut() {
            let flags = aggregator.flags_for(record.zones(), source);
            record.set_flags(flags);
        }
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate members with records.
    pub fn members(&self) -> impl Iterator<Item = M> + '_ {
        self.records.keys().copied()
    }
}
