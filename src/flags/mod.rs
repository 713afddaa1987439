//! Behavior flags.
//!
//! - [`ZoneFlag`]: typed flag enumeration with the name table
//! - [`FlagSet`]: fixed-width bitset with union/subtract/intersect
//! - [`FlagAggregator`]: effective flags for a set of occupied zones,
//!   applying parent suppression and local disables

mod flag;
mod set;
mod aggregate;

pub use flag::ZoneFlag;
pub use set::FlagSet;
pub use aggregate::{FlagAggregator, FlagSource, ZoneFlagInfo};
