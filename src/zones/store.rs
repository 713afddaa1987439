//! Generational arena of zones with id lookup and spatial indexing.

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use super::zone::Zone;
use crate::core::ZoneKey;
use crate::flags::{FlagSource, ZoneFlagInfo};
use crate::geometry::SpatialGrid;

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    zone: Option<Zone>,
}

/// Owns every live zone.
///
/// Zones are addressed by [`ZoneKey`]. Removing a zone bumps its slot's
/// generation, so keys held elsewhere stop resolving instead of pointing
/// at whatever zone reuses the slot.
#[derive(Clone, Debug)]
pub struct ZoneStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_id: FxHashMap<String, ZoneKey>,
    grid: SpatialGrid,
}

impl ZoneStore {
    /// Create an empty store whose spatial index uses `cell_size`.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_id: FxHashMap::default(),
            grid: SpatialGrid::new(cell_size),
        }
    }

    /// Insert a zone. The caller guarantees its id is not registered.
    pub fn insert(&mut self, zone: Zone) -> ZoneKey {
        let id = zone.id().to_string();
        let key = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.zone = Some(zone);
                ZoneKey::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, zone: Some(zone) });
                ZoneKey::new(index, 0)
            }
        };
        self.by_id.insert(id, key);
        self.reindex(key);
        key
    }

    /// Remove a zone, invalidating its key.
    pub fn remove(&mut self, key: ZoneKey) -> Option<Zone> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let zone = slot.zone.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.by_id.remove(zone.id());
        self.grid.remove(key);
        Some(zone)
    }

    /// Refresh a zone's spatial index entry after its geometry or
    /// enabled state changed. Disabled zones are not indexed.
    pub fn reindex(&mut self, key: ZoneKey) {
        let bounds = self
            .get(key)
            .filter(|zone| zone.is_enabled())
            .map(|zone| zone.geometry().bounds());
        match bounds {
            Some((min, max)) => self.grid.insert(key, min, max),
            None => {
                self.grid.remove(key);
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: ZoneKey) -> Option<&Zone> {
        let slot = self.slots.get(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.zone.as_ref()
    }

    pub fn get_mut(&mut self, key: ZoneKey) -> Option<&mut Zone> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.zone.as_mut()
    }

    /// Is `key` still a live zone?
    #[must_use]
    pub fn is_live(&self, key: ZoneKey) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn key_of(&self, id: &str) -> Option<ZoneKey> {
        self.by_id.get(id).copied()
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Zone> {
        self.key_of(id).and_then(|key| self.get(key))
    }

    /// Enabled zones whose geometry contains `point`.
    pub fn containing(&self, point: Vec3) -> impl Iterator<Item = ZoneKey> + '_ {
        self.grid
            .candidates(point)
            .filter(move |&key| self.get(key).is_some_and(|zone| zone.contains(point)))
    }

    /// All live zones.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneKey, &Zone)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.zone
                .as_ref()
                .map(|zone| (ZoneKey::new(index as u32, slot.generation), zone))
        })
    }

    /// Keys of live zones whose definition names `parent_id` as parent.
    #[must_use]
    pub fn children_named(&self, parent_id: &str) -> Vec<ZoneKey> {
        self.iter()
            .filter(|(_, zone)| zone.definition().parent_id.as_deref() == Some(parent_id))
            .map(|(key, _)| key)
            .collect()
    }

    /// Would linking `zone` under `parent` make `zone` its own ancestor?
    #[must_use]
    pub fn would_cycle(&self, zone: ZoneKey, parent: ZoneKey) -> bool {
        let mut visited = FxHashSet::default();
        let mut current = Some(parent);
        while let Some(key) = current {
            if key == zone {
                return true;
            }
            if !visited.insert(key) {
                // A pre-existing loop that does not pass through `zone`.
                return false;
            }
            current = self.get(key).and_then(Zone::parent);
        }
        false
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FlagSource for ZoneStore {
    fn flag_info(&self, key: ZoneKey) -> Option<ZoneFlagInfo> {
        self.get(key).map(|zone| ZoneFlagInfo {
            flags: zone.flags(),
            disabled: zone.disabled_flags(),
            parent: zone.parent(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::ZoneDefinition;

    fn zone(id: &str, radius: f32) -> Zone {
        Zone::new(ZoneDefinition::new(id).with_radius(radius)).unwrap()
    }

    #[test]
    fn test_insert_lookup_remove() {
        let mut store = ZoneStore::new(32.0);
        let key = store.insert(zone("a", 10.0));

        assert_eq!(store.key_of("a"), Some(key));
        assert_eq!(store.get_by_id("a").map(Zone::id), Some("a"));
        assert_eq!(store.len(), 1);

        let removed = store.remove(key).unwrap();
        assert_eq!(removed.id(), "a");
        assert!(!store.is_live(key));
        assert!(store.key_of("a").is_none());
        assert!(store.remove(key).is_none());
    }

    #[test]
    fn test_stale_key_after_slot_reuse() {
        let mut store = ZoneStore::new(32.0);
        let old = store.insert(zone("a", 10.0));
        store.remove(old);
        let new = store.insert(zone("b", 10.0));

        assert_eq!(old.index, new.index);
        assert_ne!(old.generation, new.generation);
        assert!(store.get(old).is_none());
        assert_eq!(store.get(new).map(Zone::id), Some("b"));
    }

    #[test]
    fn test_containing_uses_index_and_geometry() {
        let mut store = ZoneStore::new(8.0);
        let small = store.insert(zone("small", 5.0));
        let big = store.insert(zone("big", 40.0));

        let mut found: Vec<_> = store.containing(Vec3::new(3.0, 0.0, 0.0)).collect();
        found.sort();
        assert_eq!(found, vec![small, big]);

        let found: Vec<_> = store.containing(Vec3::new(20.0, 0.0, 0.0)).collect();
        assert_eq!(found, vec![big]);
    }

    #[test]
    fn test_disabled_zone_not_indexed() {
        let mut store = ZoneStore::new(8.0);
        let key = store.insert(zone("a", 5.0));
        store.get_mut(key).unwrap().set_enabled(false);
        store.reindex(key);

        assert_eq!(store.containing(Vec3::ZERO).count(), 0);
    }

    #[test]
    fn test_would_cycle() {
        let mut store = ZoneStore::new(32.0);
        let a = store.insert(zone("a", 5.0));
        let b = store.insert(zone("b", 5.0));
        let c = store.insert(zone("c", 5.0));
        store.get_mut(b).unwrap().set_parent(Some(a));
        store.get_mut(c).unwrap().set_parent(Some(b));

        assert!(store.would_cycle(a, c));
        assert!(store.would_cycle(a, a));
        assert!(!store.would_cycle(c, a));
    }
}
