//! # zone-engine
//!
//! Zone membership and flag composition for live game worlds.
//!
//! Zones are named regions (spheres or rotated boxes) carrying behavior
//! flags. The engine tracks which subjects (players) and objects (other
//! world entities) are inside each zone, keeps an aggregated flag set per
//! member, enforces access policy on entry and exit, and keeps host event
//! subscriptions down to the hooks some zone actually needs.
//!
//! ## Design Principles
//!
//! 1. **Explicit Context**: All state lives in a [`ZoneRegistry`] owned by
//!    the host. Collaborators (world, permissions, event bus, spawns) are
//!    passed into the calls that need them.
//!
//! 2. **Typed Inside, Named Outside**: Flags are a typed bitset internally.
//!    Strings are parsed once, at the by-name API boundary.
//!
//! 3. **Bounded Work**: Reconciliation runs under a wall-clock budget per
//!    pass and carries the remainder over to later passes.
//!
//! ## Modules
//!
//! - `core`: Ids, configuration, errors, clock, RNG
//! - `geometry`: Containment volumes and the spatial grid
//! - `flags`: Flag enumeration, bitset, aggregation
//! - `zones`: Definitions, runtime zones, the zone arena, ambient effects
//! - `membership`: Per-member records and trackers
//! - `reconcile`: Time-budgeted reconciliation queue
//! - `subscriptions`: Hook table and subscription optimizer
//! - `host`: Collaborator traits
//! - `registry`: The engine context tying it together
//! - `persist`: Definition snapshots

pub mod core;
pub mod geometry;
pub mod flags;
pub mod zones;
pub mod membership;
pub mod reconcile;
pub mod subscriptions;
pub mod host;
pub mod registry;
pub mod persist;

// Re-export commonly used types
pub use crate::core::{
    Member, ObjectId, SubjectId, ZoneKey,
    EngineConfig, Result, ZoneError,
    Clock, MonotonicClock,
    EngineRng,
};

pub use crate::geometry::{Shape, SpatialGrid, ZoneGeometry};

pub use crate::flags::{FlagAggregator, FlagSet, FlagSource, ZoneFlag, ZoneFlagInfo};

pub use crate::zones::{
    AmbientEffect, AmbientField, AmbientKind, AmbientSample,
    Zone, ZoneDefinition, ZoneStore,
};

pub use crate::membership::{MembershipRecord, MembershipTracker};

pub use crate::reconcile::{Outcome, PassReport, ReconciliationScheduler};

pub use crate::subscriptions::{Hook, SubscriptionOptimizer};

pub use crate::host::{
    EventBus, Host, Permissions, SpawnProvider, SpawnSets,
    SubjectState, World,
};

pub use crate::registry::{ZoneNotification, ZoneRegistry};

pub use crate::persist::{decode_definitions, encode_definitions};
