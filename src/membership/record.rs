//! Per-member zone bookkeeping.

use smallvec::SmallVec;

use crate::core::ZoneKey;
use crate::flags::FlagSet;

/// Zones one member currently occupies, with its cached effective flags.
///
/// Zone keys are kept sorted so the list doubles as the key into the
/// aggregator's combination cache. A record only exists while it holds at
/// least one zone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipRecord {
    zones: SmallVec<[ZoneKey; 4]>,
    flags: FlagSet,
}

impl MembershipRecord {
    #[must_use]
    pub fn zones(&self) -> &[ZoneKey] {
        &self.zones
    }

    /// Cached effective flags.
    #[must_use]
    pub fn flags(&self) -> FlagSet {
        self.flags
    }

    #[must_use]
    pub fn contains(&self, zone: ZoneKey) -> bool {
        self.zones.binary_search(&zone).is_ok()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Add a zone. Returns false if already present.
    pub(crate) fn insert(&mut self, zone: ZoneKey) -> bool {
        match self.zones.binary_search(&zone) {
            Ok(_) => false,
            Err(pos) => {
                self.zones.insert(pos, zone);
                true
            }
        }
    }

    /// Remove a zone. Returns false if absent.
    pub(crate) fn remove(&mut self, zone: ZoneKey) -> bool {
        match self.zones.binary_search(&zone) {
            Ok(pos) => {
                self.zones.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn set_flags(&mut self, flags: FlagSet) {
        self.flags = flags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_insert() {
        let mut record = MembershipRecord::default();
        assert!(record.insert(ZoneKey::new(5, 0)));
        assert!(record.insert(ZoneKey::new(1, 0)));
        assert!(record.insert(ZoneKey::new(3, 2)));
        assert!(!record.insert(ZoneKey::new(1, 0)));

        assert_eq!(
            record.zones(),
            &[ZoneKey::new(1, 0), ZoneKey::new(3, 2), ZoneKey::new(5, 0)]
        );
    }

    #[test]
    fn test_remove() {
        let mut record = MembershipRecord::default();
        record.insert(ZoneKey::new(1, 0));

        assert!(record.contains(ZoneKey::new(1, 0)));
        assert!(!record.remove(ZoneKey::new(2, 0)));
        assert!(record.remove(ZoneKey::new(1, 0)));
        assert!(record.is_empty());
    }
}
