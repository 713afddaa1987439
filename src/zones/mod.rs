//! Zone definitions and runtime zones.
//!
//! ## Key Types
//!
//! - `ZoneDefinition`: the durable description of a zone
//! - `Zone`: runtime state (geometry, parent link, local overrides)
//! - `ZoneStore`: generational arena indexed by id and by space
//! - `AmbientField`: ambient effect volumes derived from definitions

pub mod definition;
pub mod zone;
pub mod store;
pub mod ambient;

pub use definition::ZoneDefinition;
pub use zone::Zone;
pub use store::ZoneStore;
pub use ambient::{AmbientEffect, AmbientField, AmbientKind, AmbientSample};
