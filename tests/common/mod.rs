//! Scripted in-memory host shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};
use zone_engine::host::{EventBus, Permissions, SpawnProvider, SpawnSets, World};
use zone_engine::{Clock, EngineConfig, Hook, ObjectId, SubjectId, ZoneRegistry};

/// A flat world: members are points, the ground is at `ground` everywhere.
pub struct ScriptedHost {
    pub subjects: FxHashMap<SubjectId, Vec3>,
    pub objects: FxHashMap<ObjectId, Vec3>,
    pub granted: FxHashSet<(SubjectId, String)>,
    pub in_vehicle: FxHashSet<SubjectId>,
    pub subscribed: FxHashSet<Hook>,
    pub duplicate_subscribes: usize,
    pub stray_unsubscribes: usize,
    pub killed: Vec<SubjectId>,
    pub reversed: Vec<SubjectId>,
    pub teleports: Vec<(SubjectId, Vec3)>,
    pub messages: Vec<(SubjectId, String)>,
    pub spawns: SpawnSets,
    pub ground: f32,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            subjects: FxHashMap::default(),
            objects: FxHashMap::default(),
            granted: FxHashSet::default(),
            in_vehicle: FxHashSet::default(),
            subscribed: FxHashSet::default(),
            duplicate_subscribes: 0,
            stray_unsubscribes: 0,
            killed: Vec::new(),
            reversed: Vec::new(),
            teleports: Vec::new(),
            messages: Vec::new(),
            spawns: SpawnSets::from_config(&EngineConfig::default().with_seed(42)),
            ground: 0.0,
        }
    }

    pub fn place(&mut self, subject: SubjectId, position: Vec3) {
        self.subjects.insert(subject, position);
    }

    pub fn place_object(&mut self, object: ObjectId, position: Vec3) {
        self.objects.insert(object, position);
    }

    pub fn grant(&mut self, subject: SubjectId, permission: &str) {
        self.granted.insert((subject, permission.to_string()));
    }

    pub fn position(&self, subject: SubjectId) -> Option<Vec3> {
        self.subjects.get(&subject).copied()
    }
}

impl World for ScriptedHost {
    fn subject_position(&self, subject: SubjectId) -> Option<Vec3> {
        self.subjects.get(&subject).copied()
    }

    fn object_position(&self, object: ObjectId) -> Option<Vec3> {
        self.objects.get(&object).copied()
    }

    fn subjects_in_sphere(&self, center: Vec3, radius: f32) -> Vec<SubjectId> {
        let mut found: Vec<SubjectId> = self
            .subjects
            .iter()
            .filter(|(_, p)| p.distance(center) <= radius)
            .map(|(&id, _)| id)
            .collect();
        found.sort_unstable();
        found
    }

    fn objects_in_sphere(&self, center: Vec3, radius: f32) -> Vec<ObjectId> {
        let mut found: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, p)| p.distance(center) <= radius)
            .map(|(&id, _)| id)
            .collect();
        found.sort_unstable();
        found
    }

    fn ground_height(&self, _x: f32, _z: f32) -> f32 {
        self.ground
    }

    fn subject_in_vehicle(&self, subject: SubjectId) -> bool {
        self.in_vehicle.contains(&subject)
    }

    fn teleport_subject(&mut self, subject: SubjectId, position: Vec3) {
        self.teleports.push((subject, position));
        self.subjects.insert(subject, position);
    }

    fn reverse_vehicle_momentum(&mut self, subject: SubjectId) {
        self.reversed.push(subject);
    }

    fn kill_subject(&mut self, subject: SubjectId) {
        self.killed.push(subject);
    }

    fn send_message(&mut self, subject: SubjectId, message: &str) {
        self.messages.push((subject, message.to_string()));
    }
}

impl Permissions for ScriptedHost {
    fn has_permission(&self, subject: SubjectId, permission: &str) -> bool {
        self.granted.contains(&(subject, permission.to_string()))
    }
}

impl EventBus for ScriptedHost {
    fn subscribe(&mut self, hook: Hook) {
        if !self.subscribed.insert(hook) {
            self.duplicate_subscribes += 1;
        }
    }

    fn unsubscribe(&mut self, hook: Hook) {
        if !self.subscribed.remove(&hook) {
            self.stray_unsubscribes += 1;
        }
    }
}

impl SpawnProvider for ScriptedHost {
    fn random_spawn(&mut self, set: &str) -> Option<Vec3> {
        self.spawns.random_spawn(set)
    }
}

/// Clock that only moves when told to, optionally advancing a fixed step
/// on every read.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
    step: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Make every read cost `step`.
    pub fn set_step(&self, step: Duration) {
        self.step.set(step);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.step.get());
        now
    }
}

/// Route engine logs to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Registry reconciling every tick, on a manual clock, with a budget
/// generous enough that passes never run out.
pub fn registry() -> (ZoneRegistry, ManualClock) {
    init_tracing();
    let clock = ManualClock::new();
    let config = EngineConfig::default()
        .with_reconcile_interval(1)
        .with_requeue_delay(1)
        .with_reconcile_budget(Duration::from_secs(1));
    (ZoneRegistry::with_clock(config, clock.clone()), clock)
}

pub fn s(n: u64) -> SubjectId {
    SubjectId::new(n)
}

pub fn o(n: u64) -> ObjectId {
    ObjectId::new(n)
}
