//! Runtime zone state.

use glam::Vec3;
use rustc_hash::FxHashSet;

use super::definition::ZoneDefinition;
use crate::core::{Result, SubjectId, ZoneKey};
use crate::flags::{FlagSet, ZoneFlag};
use crate::geometry::ZoneGeometry;

/// A live zone: its definition plus derived and overridden state.
///
/// - geometry is derived from the definition and rebuilt with it
/// - the parent link is resolved by the registry once the parent exists
/// - disabled flags, keep-in list and whitelist are local overrides that
///   survive definition updates but are never persisted
#[derive(Clone, Debug)]
pub struct Zone {
    definition: ZoneDefinition,
    geometry: ZoneGeometry,
    parent: Option<ZoneKey>,
    disabled_flags: FlagSet,
    keep_in: FxHashSet<SubjectId>,
    whitelist: FxHashSet<SubjectId>,
}

impl Zone {
    /// Build a zone from a definition. Fails on invalid geometry.
    pub fn new(definition: ZoneDefinition) -> Result<Self> {
        let geometry = Self::build_geometry(&definition)?;
        Ok(Self {
            definition,
            geometry,
            parent: None,
            disabled_flags: FlagSet::EMPTY,
            keep_in: FxHashSet::default(),
            whitelist: FxHashSet::default(),
        })
    }

    fn build_geometry(definition: &ZoneDefinition) -> Result<ZoneGeometry> {
        let mut geometry = ZoneGeometry::new(definition.location, &definition.shape)?;
        geometry.set_enabled(definition.enabled);
        Ok(geometry)
    }

    /// Replace the definition and rebuild geometry. The parent link is
    /// cleared for the registry to resolve again; local overrides stay.
    pub(crate) fn rebuild(&mut self, definition: ZoneDefinition) -> Result<()> {
        let geometry = Self::build_geometry(&definition)?;
        self.definition = definition;
        self.geometry = geometry;
        self.parent = None;
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[must_use]
    pub fn definition(&self) -> &ZoneDefinition {
        &self.definition
    }

    #[must_use]
    pub fn geometry(&self) -> &ZoneGeometry {
        &self.geometry
    }

    /// Containment test against current geometry.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        self.geometry.contains(point)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.definition.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.definition.enabled = enabled;
        self.geometry.set_enabled(enabled);
    }

    /// Flags from the definition, ignoring local disables.
    #[must_use]
    pub fn flags(&self) -> FlagSet {
        self.definition.flags
    }

    #[must_use]
    pub fn disabled_flags(&self) -> FlagSet {
        self.disabled_flags
    }

    /// Definition flags minus locally disabled flags.
    #[must_use]
    pub fn effective_flags(&self) -> FlagSet {
        self.definition.flags.subtract(self.disabled_flags)
    }

    #[must_use]
    pub fn has_flag(&self, flag: ZoneFlag) -> bool {
        self.effective_flags().contains(flag)
    }

    pub(crate) fn set_flag(&mut self, flag: ZoneFlag, on: bool) -> bool {
        if on {
            self.definition.flags.insert(flag)
        } else {
            self.definition.flags.remove(flag)
        }
    }

    pub(crate) fn set_disabled_flag(&mut self, flag: ZoneFlag, disabled: bool) -> bool {
        if disabled {
            self.disabled_flags.insert(flag)
        } else {
            self.disabled_flags.remove(flag)
        }
    }

    /// Resolved parent zone.
    #[must_use]
    pub fn parent(&self) -> Option<ZoneKey> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ZoneKey>) {
        self.parent = parent;
    }

    /// Subjects that may not leave this zone.
    #[must_use]
    pub fn is_kept_in(&self, subject: SubjectId) -> bool {
        self.keep_in.contains(&subject)
    }

    pub(crate) fn keep_in_mut(&mut self) -> &mut FxHashSet<SubjectId> {
        &mut self.keep_in
    }

    /// Subjects allowed past the Eject and KeepPlayersOut gates.
    #[must_use]
    pub fn is_whitelisted(&self, subject: SubjectId) -> bool {
        self.whitelist.contains(&subject)
    }

    pub(crate) fn whitelist_mut(&mut self) -> &mut FxHashSet<SubjectId> {
        &mut self.whitelist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_flags() {
        let def = ZoneDefinition::new("z")
            .with_flag(ZoneFlag::NoBuild)
            .with_flag(ZoneFlag::NoChat);
        let mut zone = Zone::new(def).unwrap();

        assert!(zone.set_disabled_flag(ZoneFlag::NoChat, true));
        assert!(zone.flags().contains(ZoneFlag::NoChat));
        assert!(!zone.has_flag(ZoneFlag::NoChat));
        assert!(zone.has_flag(ZoneFlag::NoBuild));
    }

    #[test]
    fn test_rebuild_keeps_overrides() {
        let mut zone = Zone::new(ZoneDefinition::new("z").with_radius(5.0)).unwrap();
        zone.set_disabled_flag(ZoneFlag::NoDecay, true);
        zone.whitelist_mut().insert(SubjectId(1));
        zone.set_parent(Some(ZoneKey::new(4, 0)));

        zone.rebuild(ZoneDefinition::new("z").with_radius(50.0)).unwrap();

        assert!(zone.contains(Vec3::new(40.0, 0.0, 0.0)));
        assert!(zone.disabled_flags().contains(ZoneFlag::NoDecay));
        assert!(zone.is_whitelisted(SubjectId(1)));
        assert_eq!(zone.parent(), None);
    }

    #[test]
    fn test_failed_rebuild_leaves_zone_intact() {
        let mut zone = Zone::new(ZoneDefinition::new("z").with_radius(5.0)).unwrap();
        assert!(zone.rebuild(ZoneDefinition::new("z").with_radius(-1.0)).is_err());
        assert!(zone.contains(Vec3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn test_disabled_definition() {
        let mut zone = Zone::new(ZoneDefinition::new("z").disabled()).unwrap();
        assert!(!zone.contains(Vec3::ZERO));
        zone.set_enabled(true);
        assert!(zone.contains(Vec3::ZERO));
        assert!(zone.definition().enabled);
    }
}
