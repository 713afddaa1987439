//! Zone create, update, erase, enable and bulk load.
//!
//! Every change to a zone's definition goes through the same rebuild:
//! evict occupants, rebuild geometry, relink parents, reinstall ambient
//! effects, refresh flags and subscriptions, then re-admit whoever the new
//! geometry contains. There is no in-place partial patch.

use glam::Vec3;
use rustc_hash::FxHashSet;
use tracing::{info, warn};

use super::events::ExitCause;
use super::ZoneRegistry;
use crate::core::{Member, Result, SubjectId, ZoneError, ZoneKey};
use crate::geometry::ZoneGeometry;
use crate::host::Host;
use crate::zones::ambient::effects_for;
use crate::zones::{Zone, ZoneDefinition};

impl ZoneRegistry {
    /// Create a zone, or update it if `id` exists, from a field argument
    /// list (see [`ZoneDefinition::apply_args`]). An update starts from the
    /// zone's current definition, so omitted fields keep their values.
    pub fn create_or_update_zone<H: Host>(
        &mut self,
        host: &mut H,
        id: &str,
        args: &[&str],
        location: Option<Vec3>,
    ) -> bool {
        let mut definition = self
            .zones
            .get_by_id(id)
            .map_or_else(|| ZoneDefinition::new(id), |zone| zone.definition().clone());
        if let Some(location) = location {
            definition.location = location;
        }
        if let Err(err) = definition.apply_args(args) {
            warn!(zone = id, %err, "rejected zone fields");
            return false;
        }
        match self.create_or_update_definition(host, definition) {
            Ok(_) => true,
            Err(err) => {
                warn!(zone = id, %err, "rejected zone definition");
                false
            }
        }
    }

    /// Create or replace a zone from a full definition.
    ///
    /// Fails without changing anything if the geometry is invalid or the
    /// parent link would close a cycle.
    pub fn create_or_update_definition<H: Host>(&mut self, host: &mut H, definition: ZoneDefinition) -> Result<ZoneKey> {
        self.check_parent_cycle(&definition)?;
        match self.zones.key_of(&definition.id) {
            Some(key) => {
                self.update_zone(host, key, definition)?;
                Ok(key)
            }
            None => self.create_zone(host, definition),
        }
    }

    fn create_zone<H: Host>(&mut self, host: &mut H, definition: ZoneDefinition) -> Result<ZoneKey> {
        let zone = Zone::new(definition)?;
        let key = self.zones.insert(zone);
        self.link_zone(key);
        self.finish_build(host, &[key]);
        if let Some(zone) = self.zones.get(key) {
            info!(zone = zone.id(), %key, enabled = zone.is_enabled(), "created zone");
        }
        Ok(key)
    }

    fn update_zone<H: Host>(&mut self, host: &mut H, key: ZoneKey, definition: ZoneDefinition) -> Result<()> {
        ZoneGeometry::new(definition.location, &definition.shape)?;
        self.evict_all(host, key);
        self.rebuild_zone(key, definition)?;
        self.link_zone(key);
        self.finish_build(host, &[key]);
        if let Some(zone) = self.zones.get(key) {
            info!(zone = zone.id(), %key, enabled = zone.is_enabled(), "updated zone");
        }
        Ok(())
    }

    fn rebuild_zone(&mut self, key: ZoneKey, definition: ZoneDefinition) -> Result<()> {
        let zone = self
            .zones
            .get_mut(key)
            .ok_or_else(|| ZoneError::UnknownZone(definition.id.clone()))?;
        zone.rebuild(definition)?;
        self.zones.reindex(key);
        Ok(())
    }

    /// Remove a zone, evicting every occupant first.
    pub fn erase_zone<H: Host>(&mut self, host: &mut H, id: &str) -> bool {
        let Some(key) = self.lookup(id) else {
            return false;
        };
        self.evict_all(host, key);
        self.ambient.retire(key, self.config.ambient_teardown_ticks);
        self.zones.remove(key);
        for child in self.zones.children_named(id) {
            if let Some(zone) = self.zones.get_mut(child) {
                zone.set_parent(None);
            }
        }
        self.refresh_all();
        self.update_subscriptions(host);
        info!(zone = id, %key, "erased zone");
        true
    }

    /// Enable or disable a zone. Disabling evicts every occupant through
    /// the exit path; enabling re-admits whoever currently qualifies.
    pub fn set_zone_enabled<H: Host>(&mut self, host: &mut H, id: &str, enabled: bool) -> bool {
        let Some(key) = self.lookup(id) else {
            return false;
        };
        if self.zones.get(key).is_some_and(|zone| zone.is_enabled() == enabled) {
            return true;
        }

        if enabled {
            if let Some(zone) = self.zones.get_mut(key) {
                zone.set_enabled(true);
            }
            self.zones.reindex(key);
            self.install_ambient(key);
            self.seed(host, &[key]);
        } else {
            self.evict_all(host, key);
            if let Some(zone) = self.zones.get_mut(key) {
                zone.set_enabled(false);
            }
            self.zones.reindex(key);
            self.ambient.retire(key, self.config.ambient_teardown_ticks);
        }
        info!(zone = id, enabled, "zone enabled state changed");
        true
    }

    /// Definitions of every live zone, sorted by id. Runtime state
    /// (membership, disabled flags, keep-in lists) is not included.
    #[must_use]
    pub fn definitions(&self) -> Vec<ZoneDefinition> {
        let mut definitions: Vec<ZoneDefinition> = self
            .zones
            .iter()
            .map(|(_, zone)| zone.definition().clone())
            .collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions
    }

    /// Load a batch of definitions in two passes: build every zone, then
    /// resolve parent links against the complete set. Invalid definitions
    /// are skipped and cyclic links left unresolved, each with a warning.
    ///
    /// Returns the number of zones created or updated.
    pub fn load_definitions<H: Host>(&mut self, host: &mut H, definitions: Vec<ZoneDefinition>) -> usize {
        let mut loaded = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let id = definition.id.clone();
            let built = match self.zones.key_of(&id) {
                Some(key) => match ZoneGeometry::new(definition.location, &definition.shape) {
                    Ok(_) => {
                        self.evict_all(host, key);
                        self.rebuild_zone(key, definition).map(|()| key)
                    }
                    Err(err) => Err(err),
                },
                None => Zone::new(definition).map(|zone| self.zones.insert(zone)),
            };
            match built {
                Ok(key) => loaded.push(key),
                Err(err) => warn!(zone = %id, %err, "skipped zone definition"),
            }
        }

        for &key in &loaded {
            self.link_zone(key);
        }
        self.finish_build(host, &loaded);
        info!(zones = loaded.len(), "loaded zone definitions");
        loaded.len()
    }

    /// Walk the proposed parent chain by id, with `definition` standing in
    /// for any existing zone of the same id.
    fn check_parent_cycle(&self, definition: &ZoneDefinition) -> Result<()> {
        let Some(parent) = definition.parent_id.as_deref() else {
            return Ok(());
        };
        let mut visited = FxHashSet::default();
        let mut current = Some(parent.to_string());
        while let Some(id) = current {
            if id == definition.id {
                return Err(ZoneError::ParentCycle {
                    zone: definition.id.clone(),
                    parent: parent.to_string(),
                });
            }
            current = self
                .zones
                .get_by_id(&id)
                .and_then(|zone| zone.definition().parent_id.clone());
            if !visited.insert(id) {
                break;
            }
        }
        Ok(())
    }

    /// Resolve `key`'s parent and the parent of every zone naming it.
    fn link_zone(&mut self, key: ZoneKey) {
        self.resolve_parent(key);
        let Some(id) = self.zones.get(key).map(|zone| zone.id().to_string()) else {
            return;
        };
        for child in self.zones.children_named(&id) {
            self.resolve_parent(child);
        }
    }

    fn resolve_parent(&mut self, key: ZoneKey) {
        let Some(zone) = self.zones.get(key) else {
            return;
        };
        let parent = zone
            .definition()
            .parent_id
            .as_deref()
            .and_then(|parent_id| self.zones.key_of(parent_id))
            .filter(|&parent| {
                let cycles = self.zones.would_cycle(key, parent);
                if cycles {
                    warn!(zone = zone.id(), %parent, "parent link would loop, left unresolved");
                }
                !cycles
            });
        if let Some(zone) = self.zones.get_mut(key) {
            zone.set_parent(parent);
        }
    }

    /// Shared tail of every build: ambient effects, flag caches,
    /// subscriptions, then initial membership.
    fn finish_build<H: Host>(&mut self, host: &mut H, keys: &[ZoneKey]) {
        for &key in keys {
            self.install_ambient(key);
        }
        self.refresh_all();
        self.update_subscriptions(host);
        self.seed(host, keys);
    }

    fn install_ambient(&mut self, key: ZoneKey) {
        let Some(zone) = self.zones.get(key) else {
            return;
        };
        let effects = if zone.is_enabled() {
            effects_for(zone.definition(), zone.geometry().bounding_extent())
        } else {
            Default::default()
        };
        self.ambient.install(key, effects, self.config.ambient_teardown_ticks);
    }

    /// Admit every member the host reports near the zones and that the
    /// geometry actually contains. Seeded members start being reconciled.
    ///
    /// Entry consequences wait until every zone is seeded, so a child
    /// built alongside its parent already shields its occupants.
    fn seed<H: Host>(&mut self, host: &mut H, keys: &[ZoneKey]) {
        let mut entered: Vec<(SubjectId, Vec3)> = Vec::new();
        for &key in keys {
            let Some((center, extent)) = self
                .zones
                .get(key)
                .filter(|zone| zone.is_enabled())
                .map(|zone| (zone.geometry().center(), zone.geometry().bounding_extent()))
            else {
                continue;
            };

            for subject in host.subjects_in_sphere(center, extent) {
                self.scheduler.enqueue(Member::Subject(subject), self.tick);
                let Some(position) = host.subject_position(subject) else {
                    continue;
                };
                if self.subjects.is_in(subject, key) || !self.zones.get(key).is_some_and(|zone| zone.contains(position)) {
                    continue;
                }
                if !self.admits(&*host, subject, key) {
                    self.eject(host, subject, key, position);
                } else if self.admit_subject(host, subject, key) && !entered.iter().any(|&(s, _)| s == subject) {
                    entered.push((subject, position));
                }
            }

            for object in host.objects_in_sphere(center, extent) {
                self.scheduler.enqueue(Member::Object(object), self.tick);
                let Some(position) = host.object_position(object) else {
                    continue;
                };
                if self.zones.get(key).is_some_and(|zone| zone.contains(position)) {
                    self.enter_object(object, key);
                }
            }
        }

        for (subject, position) in entered {
            self.apply_entry_consequences(host, subject, position);
        }
    }

    /// Force every occupant out of a zone through the exit path.
    fn evict_all<H: Host>(&mut self, host: &mut H, key: ZoneKey) {
        for subject in self.subjects.members_of(key) {
            self.exit_subject(host, subject, key, ExitCause::Evicted);
        }
        for object in self.objects.members_of(key) {
            self.exit_object(object, key);
        }
    }
}
