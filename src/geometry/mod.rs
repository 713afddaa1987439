//! Zone geometry and the spatial index.
//!
//! - `Shape`: sphere or oriented box, as written in a definition
//! - `ZoneGeometry`: resolved volume answering `contains(point)`
//! - `SpatialGrid`: XZ grid narrowing point lookups to nearby zones

pub mod shape;
pub mod grid;

pub use shape::{Shape, ZoneGeometry};
pub use grid::SpatialGrid;
