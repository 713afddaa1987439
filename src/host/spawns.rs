//! Built-in spawn-set provider.

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::SpawnProvider;
use crate::core::{EngineConfig, EngineRng};

/// Named lists of spawn points with seeded random selection.
///
/// Hosts without their own spawn system can delegate
/// [`SpawnProvider::random_spawn`] to this.
///
/// ```
/// use glam::Vec3;
/// use zone_engine::host::{SpawnProvider, SpawnSets};
///
/// let mut spawns = SpawnSets::new(42);
/// spawns.add_point("beach", Vec3::new(500.0, 0.0, 0.0));
///
/// assert_eq!(spawns.random_spawn("beach"), Some(Vec3::new(500.0, 0.0, 0.0)));
/// assert_eq!(spawns.random_spawn("missing"), None);
/// ```
#[derive(Clone, Debug)]
pub struct SpawnSets {
    sets: FxHashMap<String, Vec<Vec3>>,
    rng: EngineRng,
}

impl SpawnSets {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            sets: FxHashMap::default(),
            rng: EngineRng::new(seed),
        }
    }

    /// Empty sets seeded from the engine configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.rng_seed)
    }

    /// Add a point to a set, creating the set if needed.
    pub fn add_point(&mut self, set: impl Into<String>, point: Vec3) {
        self.sets.entry(set.into()).or_default().push(point);
    }

    /// Remove a whole set. Returns false if it did not exist.
    pub fn remove_set(&mut self, set: &str) -> bool {
        self.sets.remove(set).is_some()
    }

    #[must_use]
    pub fn points(&self, set: &str) -> &[Vec3] {
        self.sets.get(set).map_or(&[], |p| p.as_slice())
    }
}

impl SpawnProvider for SpawnSets {
    fn random_spawn(&mut self, set: &str) -> Option<Vec3> {
        let points = self.sets.get(set)?;
        self.rng.choose(points).copied()
    }
}
