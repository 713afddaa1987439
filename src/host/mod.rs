//! Collaborator interfaces supplied by the host game.
//!
//! The engine never reaches into the world directly. Everything it needs
//! from the host is one of these traits:
//!
//! - [`World`]: positions, spatial queries, ground probing, and the few
//!   corrective actions the policy layer takes (teleport, kill, message)
//! - [`Permissions`]: permission checks for access gates and bypasses
//! - [`EventBus`]: named event subscription, driven by the optimizer
//! - [`SpawnProvider`]: optional spawn points used as ejection targets
//!
//! [`Host`] is implemented for anything that implements all four, so a
//! host can either implement them on one type or compose several.

mod spawns;

pub use spawns::SpawnSets;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{ObjectId, SubjectId};
use crate::subscriptions::Hook;

/// Whether a subject is actively playing or lying asleep in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectState {
    #[default]
    Awake,
    Sleeping,
}

/// World queries and corrective actions.
pub trait World {
    /// Current position of a subject. `None` means the subject no longer
    /// exists or is otherwise invalid.
    fn subject_position(&self, subject: SubjectId) -> Option<Vec3>;

    /// Current position of an object. `None` means the object is gone.
    fn object_position(&self, object: ObjectId) -> Option<Vec3>;

    /// Subjects within `radius` of `center`. Used only to seed membership
    /// when a zone is created or enabled.
    fn subjects_in_sphere(&self, center: Vec3, radius: f32) -> Vec<SubjectId>;

    /// Objects within `radius` of `center`.
    fn objects_in_sphere(&self, center: Vec3, radius: f32) -> Vec<ObjectId>;

    /// Ground height at the given horizontal position.
    fn ground_height(&self, x: f32, z: f32) -> f32;

    /// Is the subject currently driving or riding a vehicle?
    fn subject_in_vehicle(&self, subject: SubjectId) -> bool;

    /// Move a subject to `position`.
    fn teleport_subject(&mut self, subject: SubjectId, position: Vec3);

    /// Reverse the momentum of the vehicle carrying `subject`.
    fn reverse_vehicle_momentum(&mut self, subject: SubjectId);

    /// Kill a subject.
    fn kill_subject(&mut self, subject: SubjectId);

    /// Show a message to a subject.
    fn send_message(&mut self, subject: SubjectId, message: &str);
}

/// Permission lookup.
pub trait Permissions {
    fn has_permission(&self, subject: SubjectId, permission: &str) -> bool;
}

/// Named event subscription. Both calls must be idempotent.
pub trait EventBus {
    fn subscribe(&mut self, hook: Hook);
    fn unsubscribe(&mut self, hook: Hook);
}

/// Source of spawn points for ejection.
pub trait SpawnProvider {
    /// A random point from the named spawn set, if the set exists and is
    /// non-empty.
    fn random_spawn(&mut self, set: &str) -> Option<Vec3>;
}

/// Everything the registry needs from its host.
pub trait Host: World + Permissions + EventBus + SpawnProvider {}

impl<T: World + Permissions + EventBus + SpawnProvider> Host for T {}
