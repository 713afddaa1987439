//! The zone engine context.
//!
//! `ZoneRegistry` composes every subsystem: the zone arena, the two
//! membership trackers, flag aggregation, the reconciliation scheduler,
//! subscription management and ambient effects. There is no global
//! instance; hosts own a registry and pass their collaborators into each
//! call that needs them.
//!
//! ## By-name API
//!
//! Methods taking a zone id or flag name are called by untrusted
//! collaborators. They never fail loudly: an unknown zone or flag is
//! logged at `warn` and the call returns `false`, `None` or an empty
//! collection.
//!
//! ## Example
//!
//! ```ignore
//! let mut registry = ZoneRegistry::new(EngineConfig::default());
//! registry.create_or_update_zone(&mut host, "Safe1", &["radius", "20", "nobuild", "true"], None);
//! registry.track_subject(player);
//! loop {
//!     registry.tick(&mut host);
//! }
//! ```

mod events;
mod lifecycle;
mod members;
mod policy;

pub use events::ZoneNotification;

use std::rc::Rc;

use glam::Vec3;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::core::{Clock, EngineConfig, MonotonicClock, ObjectId, SubjectId, ZoneKey};
use crate::flags::{FlagAggregator, FlagSet, ZoneFlag};
use crate::host::{EventBus, SubjectState};
use crate::membership::MembershipTracker;
use crate::reconcile::ReconciliationScheduler;
use crate::subscriptions::{Hook, SubscriptionOptimizer};
use crate::zones::{AmbientField, AmbientSample, Zone, ZoneStore};

/// Engine context owning all zones and membership state.
pub struct ZoneRegistry {
    config: EngineConfig,
    zones: ZoneStore,
    subjects: MembershipTracker<SubjectId>,
    objects: MembershipTracker<ObjectId>,
    aggregator: FlagAggregator,
    scheduler: ReconciliationScheduler,
    optimizer: SubscriptionOptimizer,
    ambient: AmbientField,
    states: FxHashMap<SubjectId, SubjectState>,
    notifications: Vec<ZoneNotification>,
    clock: Rc<dyn Clock>,
    tick: u64,
}

impl ZoneRegistry {
    /// Create an empty registry timed by the wall clock.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }

    /// Create an empty registry with a custom clock for the
    /// reconciliation budget.
    #[must_use]
    pub fn with_clock(config: EngineConfig, clock: impl Clock + 'static) -> Self {
        Self {
            zones: ZoneStore::new(config.grid_cell_size),
            subjects: MembershipTracker::new(),
            objects: MembershipTracker::new(),
            aggregator: FlagAggregator::new(),
            scheduler: ReconciliationScheduler::new(config.requeue_delay()),
            optimizer: SubscriptionOptimizer::new(),
            ambient: AmbientField::new(),
            states: FxHashMap::default(),
            notifications: Vec::new(),
            clock: Rc::new(clock),
            tick: 0,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ticks elapsed since creation.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    // === Zone queries ===

    /// Zone by internal key. Stale keys resolve to `None`.
    #[must_use]
    pub fn zone(&self, key: ZoneKey) -> Option<&Zone> {
        self.zones.get(key)
    }

    #[must_use]
    pub fn get_zone_by_id(&self, id: &str) -> Option<&Zone> {
        self.zones.get_by_id(id)
    }

    /// Ids of all live zones, sorted.
    #[must_use]
    pub fn zone_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.zones.iter().map(|(_, zone)| zone.id().to_string()).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Subjects inside a zone, sorted.
    #[must_use]
    pub fn players_in_zone(&self, id: &str) -> Vec<SubjectId> {
        let Some(key) = self.lookup(id) else {
            return Vec::new();
        };
        let mut members = self.subjects.members_of(key);
        members.sort_unstable();
        members
    }

    /// Objects inside a zone, sorted.
    #[must_use]
    pub fn entities_in_zone(&self, id: &str) -> Vec<ObjectId> {
        let Some(key) = self.lookup(id) else {
            return Vec::new();
        };
        let mut members = self.objects.members_of(key);
        members.sort_unstable();
        members
    }

    #[must_use]
    pub fn is_subject_in_zone(&self, id: &str, subject: SubjectId) -> bool {
        self.lookup(id).is_some_and(|key| self.subjects.is_in(subject, key))
    }

    #[must_use]
    pub fn is_object_in_zone(&self, id: &str, object: ObjectId) -> bool {
        self.lookup(id).is_some_and(|key| self.objects.is_in(object, key))
    }

    /// Ids of the zones a subject occupies.
    #[must_use]
    pub fn zones_for_subject(&self, subject: SubjectId) -> Vec<String> {
        self.ids_of(self.subjects.zones(subject))
    }

    /// Ids of the zones an object occupies.
    #[must_use]
    pub fn zones_for_object(&self, object: ObjectId) -> Vec<String> {
        self.ids_of(self.objects.zones(object))
    }

    fn ids_of(&self, keys: &[ZoneKey]) -> Vec<String> {
        keys.iter()
            .filter_map(|&key| self.zones.get(key))
            .map(|zone| zone.id().to_string())
            .collect()
    }

    // === Membership flags ===

    /// Aggregated flags of a subject's current zones.
    #[must_use]
    pub fn subject_flags(&self, subject: SubjectId) -> FlagSet {
        self.subjects.flags(subject)
    }

    #[must_use]
    pub fn object_flags(&self, object: ObjectId) -> FlagSet {
        self.objects.flags(object)
    }

    /// Does the subject's aggregated flag set hold `flag_name`?
    #[must_use]
    pub fn subject_has_flag(&self, subject: SubjectId, flag_name: &str) -> bool {
        parse_flag(flag_name).is_some_and(|flag| self.subjects.flags(subject).contains(flag))
    }

    #[must_use]
    pub fn object_has_flag(&self, object: ObjectId, flag_name: &str) -> bool {
        parse_flag(flag_name).is_some_and(|flag| self.objects.flags(object).contains(flag))
    }

    /// Number of subjects with a membership record.
    #[must_use]
    pub fn subject_record_count(&self) -> usize {
        self.subjects.len()
    }

    /// Number of objects with a membership record.
    #[must_use]
    pub fn object_record_count(&self) -> usize {
        self.objects.len()
    }

    // === Zone flags ===

    /// Does the zone carry `flag_name`, after local disables?
    #[must_use]
    pub fn has_flag(&self, id: &str, flag_name: &str) -> bool {
        let Some(flag) = parse_flag(flag_name) else {
            return false;
        };
        self.get_zone_by_id(id).is_some_and(|zone| zone.has_flag(flag))
    }

    /// Add a flag to a zone's definition.
    pub fn add_flag(&mut self, bus: &mut dyn EventBus, id: &str, flag_name: &str) -> bool {
        self.set_definition_flag(bus, id, flag_name, true)
    }

    /// Remove a flag from a zone's definition.
    pub fn remove_flag(&mut self, bus: &mut dyn EventBus, id: &str, flag_name: &str) -> bool {
        self.set_definition_flag(bus, id, flag_name, false)
    }

    fn set_definition_flag(&mut self, bus: &mut dyn EventBus, id: &str, flag_name: &str, on: bool) -> bool {
        let Some((key, flag)) = self.lookup_with_flag(id, flag_name) else {
            return false;
        };
        let changed = self.zones.get_mut(key).is_some_and(|zone| zone.set_flag(flag, on));
        if changed {
            self.refresh_topology(key);
            self.update_subscriptions(bus);
        }
        true
    }

    /// Suppress a flag on one zone without touching its definition.
    pub fn add_disabled_flag(&mut self, id: &str, flag_name: &str) -> bool {
        self.set_disabled_flag(id, flag_name, true)
    }

    pub fn remove_disabled_flag(&mut self, id: &str, flag_name: &str) -> bool {
        self.set_disabled_flag(id, flag_name, false)
    }

    fn set_disabled_flag(&mut self, id: &str, flag_name: &str, disabled: bool) -> bool {
        let Some((key, flag)) = self.lookup_with_flag(id, flag_name) else {
            return false;
        };
        let changed = self
            .zones
            .get_mut(key)
            .is_some_and(|zone| zone.set_disabled_flag(flag, disabled));
        if changed {
            self.refresh_topology(key);
        }
        true
    }

    // === Keep-in list and whitelist ===

    /// Stop a subject from leaving a zone.
    pub fn add_keep_in(&mut self, id: &str, subject: SubjectId) -> bool {
        self.with_zone_mut(id, |zone| {
            zone.keep_in_mut().insert(subject);
        })
    }

    pub fn remove_keep_in(&mut self, id: &str, subject: SubjectId) -> bool {
        self.with_zone_mut(id, |zone| {
            zone.keep_in_mut().remove(&subject);
        })
    }

    /// Let a subject past the zone's Eject and KeepPlayersOut gates.
    pub fn add_whitelist(&mut self, id: &str, subject: SubjectId) -> bool {
        self.with_zone_mut(id, |zone| {
            zone.whitelist_mut().insert(subject);
        })
    }

    pub fn remove_whitelist(&mut self, id: &str, subject: SubjectId) -> bool {
        self.with_zone_mut(id, |zone| {
            zone.whitelist_mut().remove(&subject);
        })
    }

    fn with_zone_mut(&mut self, id: &str, f: impl FnOnce(&mut Zone)) -> bool {
        let Some(key) = self.lookup(id) else {
            return false;
        };
        match self.zones.get_mut(key) {
            Some(zone) => {
                f(zone);
                true
            }
            None => false,
        }
    }

    // === Subscriptions, ambient, notifications ===

    /// Union of every live zone's definition flags.
    #[must_use]
    pub fn global_flags(&self) -> FlagSet {
        self.optimizer.global_flags()
    }

    /// Hooks currently subscribed on the host bus, sorted.
    #[must_use]
    pub fn subscribed_hooks(&self) -> Vec<Hook> {
        self.optimizer.subscribed()
    }

    /// Summed ambient values at a point, including retiring effects.
    #[must_use]
    pub fn ambient_at(&self, point: Vec3) -> AmbientSample {
        self.ambient.sample(point)
    }

    /// Take every notification buffered since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<ZoneNotification> {
        std::mem::take(&mut self.notifications)
    }

    /// Unsubscribe every managed hook, e.g. before the host unloads.
    pub fn shutdown(&mut self, bus: &mut dyn EventBus) {
        self.optimizer.clear(bus);
    }

    // === Internal helpers ===

    fn lookup(&self, id: &str) -> Option<ZoneKey> {
        let key = self.zones.key_of(id);
        if key.is_none() {
            warn!(zone = id, "unknown zone");
        }
        key
    }

    fn lookup_with_flag(&self, id: &str, flag_name: &str) -> Option<(ZoneKey, ZoneFlag)> {
        let flag = parse_flag(flag_name)?;
        let key = self.lookup(id)?;
        Some((key, flag))
    }

    /// Flag inputs of `key` changed: drop cached combinations and refresh
    /// every record holding it.
    fn refresh_topology(&mut self, key: ZoneKey) {
        self.aggregator.invalidate();
        self.subjects.refresh_zone(key, &mut self.aggregator, &self.zones);
        self.objects.refresh_zone(key, &mut self.aggregator, &self.zones);
    }

    /// Parent links or the zone set changed: refresh every record.
    fn refresh_all(&mut self) {
        self.aggregator.invalidate();
        self.subjects.refresh_all(&mut self.aggregator, &self.zones);
        self.objects.refresh_all(&mut self.aggregator, &self.zones);
    }

    fn update_subscriptions(&mut self, bus: &mut dyn EventBus) {
        let global = self
            .zones
            .iter()
            .fold(FlagSet::EMPTY, |acc, (_, zone)| acc | zone.flags());
        self.optimizer.recompute(global, bus, false);
    }
}

/// Validated name-to-flag lookup for the by-name API.
fn parse_flag(name: &str) -> Option<ZoneFlag> {
    let flag = ZoneFlag::from_name(name);
    if flag.is_none() {
        warn!(flag = name, "unknown flag");
    }
    flag
}

impl std::fmt::Debug for ZoneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneRegistry")
            .field("zones", &self.zones.len())
            .field("subjects", &self.subjects.len())
            .field("objects", &self.objects.len())
            .field("tracked", &self.scheduler.len())
            .field("global_flags", &self.optimizer.global_flags())
            .field("tick", &self.tick)
            .finish()
    }
}
