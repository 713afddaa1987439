//! Fixed-width bitset of zone flags.

use std::ops::{BitAnd, BitOr, BitOrAssign, Sub};

use serde::{Deserialize, Serialize};

use super::flag::ZoneFlag;
use crate::core::{Result, ZoneError};

/// A set of [`ZoneFlag`]s packed into one integer.
///
/// ```
/// use zone_engine::flags::{FlagSet, ZoneFlag};
///
/// let zone = FlagSet::from_flags(&[ZoneFlag::NoBuild, ZoneFlag::NoChat]);
/// let disabled = FlagSet::from_flags(&[ZoneFlag::NoChat]);
///
/// let effective = zone.subtract(disabled);
/// assert!(effective.contains(ZoneFlag::NoBuild));
/// assert!(!effective.contains(ZoneFlag::NoChat));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagSet(u128);

impl FlagSet {
    /// The empty set.
    pub const EMPTY: FlagSet = FlagSet(0);

    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Set containing the given flags.
    #[must_use]
    pub fn from_flags(flags: &[ZoneFlag]) -> Self {
        flags.iter().copied().collect()
    }

    /// Parse a list of flag names. Fails on the first unknown name.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut set = FlagSet::EMPTY;
        for name in names {
            let flag = ZoneFlag::from_name(name).ok_or_else(|| ZoneError::UnknownFlag(name.to_string()))?;
            set.insert(flag);
        }
        Ok(set)
    }

    /// Raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, flag: ZoneFlag) -> bool {
        self.0 & (1u128 << flag as u32) != 0
    }

    /// True if any flag in `other` is also in `self`.
    #[must_use]
    pub const fn intersects(self, other: FlagSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Add a flag. Returns true if it was not already present.
    pub fn insert(&mut self, flag: ZoneFlag) -> bool {
        let had = self.contains(flag);
        self.0 |= 1u128 << flag.bit();
        !had
    }

    /// Remove a flag. Returns true if it was present.
    pub fn remove(&mut self, flag: ZoneFlag) -> bool {
        let had = self.contains(flag);
        self.0 &= !(1u128 << flag.bit());
        had
    }

    #[must_use]
    pub const fn union(self, other: FlagSet) -> FlagSet {
        FlagSet(self.0 | other.0)
    }

    /// Flags in `self` that are not in `other`.
    #[must_use]
    pub const fn subtract(self, other: FlagSet) -> FlagSet {
        FlagSet(self.0 & !other.0)
    }

    #[must_use]
    pub const fn intersect(self, other: FlagSet) -> FlagSet {
        FlagSet(self.0 & other.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate the flags in bit order.
    pub fn iter(self) -> impl Iterator<Item = ZoneFlag> {
        ZoneFlag::ALL.iter().copied().filter(move |f| self.contains(*f))
    }

    /// Flag names, for display and messages.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        self.iter().map(ZoneFlag::name).collect()
    }
}

impl FromIterator<ZoneFlag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = ZoneFlag>>(iter: I) -> Self {
        let mut set = FlagSet::EMPTY;
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl From<ZoneFlag> for FlagSet {
    fn from(flag: ZoneFlag) -> Self {
        FlagSet(1u128 << flag.bit())
    }
}

impl BitOr for FlagSet {
    type Output = FlagSet;
    fn bitor(self, rhs: FlagSet) -> FlagSet {
        self.union(rhs)
    }
}

impl BitOrAssign for FlagSet {
    fn bitor_assign(&mut self, rhs: FlagSet) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for FlagSet {
    type Output = FlagSet;
    fn bitand(self, rhs: FlagSet) -> FlagSet {
        self.intersect(rhs)
    }
}

impl Sub for FlagSet {
    type Output = FlagSet;
    fn sub(self, rhs: FlagSet) -> FlagSet {
        self.subtract(rhs)
    }
}

impl std::fmt::Display for FlagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.names().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut set = FlagSet::new();
        assert!(set.insert(ZoneFlag::NoBuild));
        assert!(!set.insert(ZoneFlag::NoBuild));
        assert!(set.contains(ZoneFlag::NoBuild));
        assert_eq!(set.len(), 1);

        assert!(set.remove(ZoneFlag::NoBuild));
        assert!(!set.remove(ZoneFlag::NoBuild));
        assert!(set.is_empty());
    }

    #[test]
    fn test_highest_bit() {
        let set = FlagSet::from(ZoneFlag::KeepPlayersOut);
        assert!(set.contains(ZoneFlag::KeepPlayersOut));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![ZoneFlag::KeepPlayersOut]);
    }

    #[test]
    fn test_set_algebra() {
        let a = FlagSet::from_flags(&[ZoneFlag::Kill, ZoneFlag::NoBuild]);
        let b = FlagSet::from_flags(&[ZoneFlag::NoBuild, ZoneFlag::Eject]);

        assert_eq!(a | b, FlagSet::from_flags(&[ZoneFlag::Kill, ZoneFlag::NoBuild, ZoneFlag::Eject]));
        assert_eq!(a & b, FlagSet::from(ZoneFlag::NoBuild));
        assert_eq!(a - b, FlagSet::from(ZoneFlag::Kill));
        assert!(a.intersects(b));
        assert!(!a.intersects(FlagSet::from(ZoneFlag::NoChat)));
    }

    #[test]
    fn test_from_names() {
        let set = FlagSet::from_names(["nobuild", "NoChat"]).unwrap();
        assert_eq!(set.names(), vec!["NoBuild", "NoChat"]);

        let err = FlagSet::from_names(["nobuild", "nofly"]).unwrap_err();
        assert!(matches!(err, ZoneError::UnknownFlag(name) if name == "nofly"));
    }

    #[test]
    fn test_display() {
        let set = FlagSet::from_flags(&[ZoneFlag::Eject, ZoneFlag::AutoLights]);
        assert_eq!(set.to_string(), "{AutoLights, Eject}");
    }
}
