//! Core engine types: identifiers, configuration, errors, time, RNG.
//!
//! These are the building blocks shared by every other module. None of
//! them know about zones' geometry or flags.

pub mod ids;
pub mod config;
pub mod error;
pub mod clock;
pub mod rng;

pub use ids::{Member, ObjectId, SubjectId, ZoneKey};
pub use config::EngineConfig;
pub use error::{Result, ZoneError};
pub use clock::{Clock, MonotonicClock};
pub use rng::EngineRng;
