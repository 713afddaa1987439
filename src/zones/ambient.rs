//! Ambient effect volumes derived from zone magnitudes.
//!
//! A zone with a non-zero comfort, temperature or radiation value gets one
//! spherical effect per non-zero magnitude, sized to the zone's bounding
//! extent. When the zone is erased or rebuilt its effects are not dropped
//! at once: they retire, shrinking to zero radius over a few ticks.

use glam::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::ZoneDefinition;
use crate::core::ZoneKey;

/// Which ambient quantity an effect contributes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmbientKind {
    Comfort,
    Temperature,
    Radiation,
}

/// One spherical ambient contribution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbientEffect {
    pub kind: AmbientKind,
    pub magnitude: f32,
    pub center: Vec3,
    pub radius: f32,
}

impl AmbientEffect {
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        self.radius > 0.0 && point.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Summed ambient values at a point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AmbientSample {
    pub comfort: f32,
    pub temperature: f32,
    pub radiation: f32,
}

impl AmbientSample {
    fn add(&mut self, effect: &AmbientEffect) {
        match effect.kind {
            AmbientKind::Comfort => self.comfort += effect.magnitude,
            AmbientKind::Temperature => self.temperature += effect.magnitude,
            AmbientKind::Radiation => self.radiation += effect.magnitude,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.comfort == 0.0 && self.temperature == 0.0 && self.radiation == 0.0
    }
}

pub(crate) type ZoneEffects = SmallVec<[AmbientEffect; 3]>;

/// Build the effects a definition calls for. Zero magnitudes build nothing.
#[must_use]
pub(crate) fn effects_for(def: &ZoneDefinition, extent: f32) -> ZoneEffects {
    [
        (AmbientKind::Comfort, def.comfort),
        (AmbientKind::Temperature, def.temperature),
        (AmbientKind::Radiation, def.radiation),
    ]
    .into_iter()
    .filter(|(_, magnitude)| *magnitude != 0.0)
    .map(|(kind, magnitude)| AmbientEffect {
        kind,
        magnitude,
        center: def.location,
        radius: extent,
    })
    .collect()
}

#[derive(Clone, Debug)]
struct Retiring {
    effect: AmbientEffect,
    start_radius: f32,
    ticks_left: u32,
    ticks_total: u32,
}

/// All live and retiring ambient effects.
#[derive(Clone, Debug, Default)]
pub struct AmbientField {
    active: FxHashMap<ZoneKey, ZoneEffects>,
    retiring: Vec<Retiring>,
}

impl AmbientField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a zone's effects, retiring whatever it had before.
    pub(crate) fn install(&mut self, key: ZoneKey, effects: ZoneEffects, teardown_ticks: u32) {
        self.retire(key, teardown_ticks);
        if !effects.is_empty() {
            self.active.insert(key, effects);
        }
    }

    /// Start shrinking a zone's effects. With zero teardown ticks they are
    /// dropped immediately.
    pub fn retire(&mut self, key: ZoneKey, teardown_ticks: u32) {
        let Some(effects) = self.active.remove(&key) else {
            return;
        };
        if teardown_ticks == 0 {
            return;
        }
        self.retiring.extend(effects.into_iter().map(|effect| Retiring {
            effect,
            start_radius: effect.radius,
            ticks_left: teardown_ticks,
            ticks_total: teardown_ticks,
        }));
    }

    /// Advance retiring effects by one tick, releasing the ones that
    /// reached zero radius.
    pub fn advance(&mut self) {
        for retiring in &mut self.retiring {
            retiring.ticks_left = retiring.ticks_left.saturating_sub(1);
            let fraction = retiring.ticks_left as f32 / retiring.ticks_total as f32;
            retiring.effect.radius = retiring.start_radius * fraction;
        }
        self.retiring.retain(|r| r.ticks_left > 0);
    }

    /// Summed ambient values at `point`.
    #[must_use]
    pub fn sample(&self, point: Vec3) -> AmbientSample {
        let mut sample = AmbientSample::default();
        let live = self.active.values().flat_map(|effects| effects.iter());
        let fading = self.retiring.iter().map(|r| &r.effect);
        for effect in live.chain(fading).filter(|e| e.contains(point)) {
            sample.add(effect);
        }
        sample
    }

    /// Effects currently installed for a zone.
    #[must_use]
    pub fn effects(&self, key: ZoneKey) -> &[AmbientEffect] {
        self.active.get(&key).map_or(&[], |e| e.as_slice())
    }

    /// Number of effects still shrinking.
    #[must_use]
    pub fn retiring_count(&self) -> usize {
        self.retiring.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def() -> ZoneDefinition {
        ZoneDefinition::new("hot").with_radius(10.0).with_ambient(0.0, 30.0, 5.0)
    }

    #[test]
    fn test_only_nonzero_effects_built() {
        let effects = effects_for(&def(), 10.0);
        let kinds: Vec<_> = effects.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![AmbientKind::Temperature, AmbientKind::Radiation]);

        assert!(effects_for(&ZoneDefinition::new("plain"), 10.0).is_empty());
    }

    #[test]
    fn test_sample() {
        let mut field = AmbientField::new();
        let key = ZoneKey::new(0, 0);
        field.install(key, effects_for(&def(), 10.0), 5);

        let inside = field.sample(Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(inside.temperature, 30.0);
        assert_eq!(inside.radiation, 5.0);
        assert!(field.sample(Vec3::new(30.0, 0.0, 0.0)).is_zero());
    }

    #[test]
    fn test_retire_shrinks_over_ticks() {
        let mut field = AmbientField::new();
        let key = ZoneKey::new(0, 0);
        field.install(key, effects_for(&def(), 10.0), 4);
        field.retire(key, 4);

        assert!(field.effects(key).is_empty());
        assert_eq!(field.retiring_count(), 2);

        let probe = Vec3::new(6.0, 0.0, 0.0);
        assert_eq!(field.sample(probe).temperature, 30.0);

        field.advance(); // radius 7.5
        assert_eq!(field.sample(probe).temperature, 30.0);
        field.advance(); // radius 5.0
        assert!(field.sample(probe).is_zero());
        field.advance();
        field.advance();
        assert_eq!(field.retiring_count(), 0);
    }

    #[test]
    fn test_zero_teardown_drops_immediately() {
        let mut field = AmbientField::new();
        let key = ZoneKey::new(0, 0);
        field.install(key, effects_for(&def(), 10.0), 0);
        field.retire(key, 0);
        assert_eq!(field.retiring_count(), 0);
        assert!(field.sample(Vec3::ZERO).is_zero());
    }
}
