//! Effective flag computation for a set of occupied zones.
//!
//! The effective flags of a member are
//!
//! ```text
//! union(z.flags - z.disabled for z in zones) - union(p.flags for p in zones
//!                                                    that is the parent of another member of zones)
//! ```
//!
//! so a child zone overrides its parent whenever both hold the same member.
//! Only direct parent links are consulted, which keeps the computation
//! linear in the number of zones and immune to cyclic parent chains.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::set::FlagSet;
use crate::core::ZoneKey;

const CACHE_LIMIT: usize = 4096;

/// Flag data the aggregator needs from one zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoneFlagInfo {
    /// Flags from the zone's definition.
    pub flags: FlagSet,
    /// Flags locally disabled on the zone.
    pub disabled: FlagSet,
    /// Resolved parent zone, if any.
    pub parent: Option<ZoneKey>,
}

/// Source of per-zone flag data. Stale keys return `None` and are skipped.
pub trait FlagSource {
    fn flag_info(&self, key: ZoneKey) -> Option<ZoneFlagInfo>;
}

/// Computes and memoizes effective flags per zone combination.
///
/// The cache is keyed by the sorted list of zone keys. Any change to a
/// zone's flags, disabled flags or parent link must call
/// [`FlagAggregator::invalidate`].
#[derive(Clone, Debug, Default)]
pub struct FlagAggregator {
    cache: FxHashMap<SmallVec<[ZoneKey; 4]>, FlagSet>,
    hits: u64,
    misses: u64,
}

impl FlagAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective flags for `zones`, computed without the cache.
    pub fn compute(zones: &[ZoneKey], source: &impl FlagSource) -> FlagSet {
        let infos: SmallVec<[(ZoneKey, ZoneFlagInfo); 4]> = zones
            .iter()
            .filter_map(|&key| source.flag_info(key).map(|info| (key, info)))
            .collect();

        let mut granted = FlagSet::EMPTY;
        let mut suppressed = FlagSet::EMPTY;
        for (key, info) in &infos {
            granted |= info.flags.subtract(info.disabled);
            let is_parent_of_member = infos
                .iter()
                .any(|(other, other_info)| other != key && other_info.parent == Some(*key));
            if is_parent_of_member {
                suppressed |= info.flags;
            }
        }
        granted.subtract(suppressed)
    }

    /// Effective flags for `zones`, using the combination cache.
    ///
    /// `zones` must be sorted; membership records keep them that way.
    pub fn flags_for(&mut self, zones: &[ZoneKey], source: &impl FlagSource) -> FlagSet {
        debug_assert!(zones.windows(2).all(|w| w[0] < w[1]), "zone keys must be sorted");

        if zones.is_empty() {
            return FlagSet::EMPTY;
        }
        if let Some(&flags) = self.cache.get(zones) {
            self.hits += 1;
            return flags;
        }

        self.misses += 1;
        let flags = Self::compute(zones, source);
        if self.cache.len() >= CACHE_LIMIT {
            self.cache.clear();
        }
        self.cache.insert(SmallVec::from_slice(zones), flags);
        flags
    }

    /// Drop every memoized combination.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Number of memoized combinations.
    #[must_use]
    pub fn cached_combinations(&self) -> usize {
        self.cache.len()
    }

    /// (hits, misses) since creation.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
