//! Identifiers for tracked members and zones.
//!
//! ## Members
//!
//! The engine tracks two kinds of members:
//! - `SubjectId`: player-controlled entities, subject to access policy
//! - `ObjectId`: other world entities, which only receive passive effects
//!
//! Both are opaque to the engine. Hosts hand out whatever stable numeric
//! ids their world uses (user ids, network ids).
//!
//! ## Zones
//!
//! Zones are addressed two ways:
//! - a public string id (`"Safe1"`, `"48213977"`) used by the by-name API
//! - an internal `ZoneKey` handle into the zone arena
//!
//! `ZoneKey` carries a generation counter. A key kept past the removal of
//! its zone no longer matches the slot's generation and resolves to `None`,
//! so stale references are detected rather than followed.

use serde::{Deserialize, Serialize};

/// A player-controlled member, subject to access policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub u64);

impl SubjectId {
    /// Create a new subject ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for SubjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subject({})", self.0)
    }
}

/// A non-player world object. Receives passive effects only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Create a new object ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object({})", self.0)
    }
}

/// Handle to a zone slot in the arena.
///
/// Ordering is by `(index, generation)`, which gives membership lists a
/// canonical order for the flag combination cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneKey {
    /// Slot index in the arena.
    pub index: u32,
    /// Generation of the slot when this key was issued.
    pub generation: u32,
}

impl ZoneKey {
    /// Create a zone key.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl std::fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ZoneKey({}v{})", self.index, self.generation)
    }
}

/// A member of either kind, as queued for reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Member {
    Subject(SubjectId),
    Object(ObjectId),
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Member::Subject(id) => id.fmt(f),
            Member::Object(id) => id.fmt(f),
        }
    }
}
