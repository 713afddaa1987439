//! Durable zone definitions.
//!
//! A `ZoneDefinition` is the only zone state that persists. Everything a
//! runtime [`Zone`](super::Zone) holds besides it is derived (geometry,
//! ambient effects, parent link) or a local override.
//!
//! ## Field arguments
//!
//! External callers create and edit zones with flat key/value string
//! lists, as typed in a console:
//!
//! ```
//! use zone_engine::zones::ZoneDefinition;
//! use zone_engine::flags::ZoneFlag;
//!
//! let mut def = ZoneDefinition::new("Safe1");
//! def.apply_args(&["name", "Outpost", "radius", "35", "nobuild", "true"]).unwrap();
//!
//! assert_eq!(def.name, "Outpost");
//! assert!(def.flags.contains(ZoneFlag::NoBuild));
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{Result, ZoneError};
use crate::flags::{FlagSet, ZoneFlag};
use crate::geometry::Shape;

/// Persistent description of one zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Center of the zone.
    pub location: Vec3,

    /// Containment shape.
    pub shape: Shape,

    /// Ambient comfort applied inside the zone (0 = none).
    pub comfort: f32,

    /// Ambient temperature applied inside the zone (0 = none).
    pub temperature: f32,

    /// Ambient radiation applied inside the zone (0 = none).
    pub radiation: f32,

    /// Behavior flags.
    pub flags: FlagSet,

    /// Id of the enclosing parent zone.
    pub parent_id: Option<String>,

    /// Permission a subject needs to enter.
    pub permission: Option<String>,

    /// Message sent to a subject on entry.
    pub enter_message: Option<String>,

    /// Message sent to a subject on exit.
    pub leave_message: Option<String>,

    /// Spawn set used as the ejection destination.
    pub eject_spawns: Option<String>,

    /// Disabled zones admit nobody.
    pub enabled: bool,
}

impl ZoneDefinition {
    /// Create a definition with defaults: 20-unit sphere at the origin,
    /// no flags, enabled.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            location: Vec3::ZERO,
            shape: Shape::default(),
            comfort: 0.0,
            temperature: 0.0,
            radiation: 0.0,
            flags: FlagSet::EMPTY,
            parent_id: None,
            permission: None,
            enter_message: None,
            leave_message: None,
            eject_spawns: None,
            enabled: true,
        }
    }

    /// Set the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the location (builder pattern).
    #[must_use]
    pub fn at(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    /// Use a sphere of the given radius (builder pattern).
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.shape = Shape::Sphere { radius };
        self
    }

    /// Use an oriented box (builder pattern).
    #[must_use]
    pub fn with_box(mut self, size: Vec3, rotation: Vec3) -> Self {
        self.shape = Shape::Box { size, rotation };
        self
    }

    /// Add a flag (builder pattern).
    #[must_use]
    pub fn with_flag(mut self, flag: ZoneFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    /// Set the parent zone id (builder pattern).
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Require a permission to enter (builder pattern).
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Set enter and leave messages (builder pattern).
    #[must_use]
    pub fn with_messages(mut self, enter: impl Into<String>, leave: impl Into<String>) -> Self {
        self.enter_message = Some(enter.into());
        self.leave_message = Some(leave.into());
        self
    }

    /// Eject to a spawn set instead of the computed point (builder pattern).
    #[must_use]
    pub fn with_eject_spawns(mut self, set: impl Into<String>) -> Self {
        self.eject_spawns = Some(set.into());
        self
    }

    /// Set ambient magnitudes (builder pattern).
    #[must_use]
    pub fn with_ambient(mut self, comfort: f32, temperature: f32, radiation: f32) -> Self {
        self.comfort = comfort;
        self.temperature = temperature;
        self.radiation = radiation;
        self
    }

    /// Start disabled (builder pattern).
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Apply a flat `key value key value ...` argument list.
    ///
    /// Keys are case-insensitive. Any flag name is accepted as a key with a
    /// boolean value. Nothing is applied if any pair fails.
    pub fn apply_args(&mut self, args: &[&str]) -> Result<()> {
        let mut updated = self.clone();
        for pair in args.chunks(2) {
            let key = pair[0];
            let Some(&value) = pair.get(1) else {
                return Err(ZoneError::MissingValue(key.to_string()));
            };
            updated.apply_field(key, value)?;
        }
        updated.shape.validate()?;
        *self = updated;
        Ok(())
    }

    fn apply_field(&mut self, key: &str, value: &str) -> Result<()> {
        match key.to_ascii_lowercase().as_str() {
            "name" => self.name = value.to_string(),
            "radius" => self.shape = Shape::Sphere { radius: parse_f32(key, value)? },
            "size" => {
                let rotation = match self.shape {
                    Shape::Box { rotation, .. } => rotation,
                    Shape::Sphere { .. } => Vec3::ZERO,
                };
                self.shape = Shape::Box { size: parse_vec3(key, value)?, rotation };
            }
            "rotation" => match &mut self.shape {
                Shape::Box { rotation, .. } => *rotation = parse_rotation(key, value)?,
                Shape::Sphere { .. } => return Err(ZoneError::invalid_field(key, value)),
            },
            "location" => self.location = parse_vec3(key, value)?,
            "comfort" => self.comfort = parse_f32(key, value)?,
            "temperature" => self.temperature = parse_f32(key, value)?,
            "radiation" => self.radiation = parse_f32(key, value)?,
            "parent" => self.parent_id = optional(value),
            "permission" => self.permission = optional(value),
            "enter_message" => self.enter_message = optional(value),
            "leave_message" => self.leave_message = optional(value),
            "ejectspawns" => self.eject_spawns = optional(value),
            "enabled" => self.enabled = parse_bool(key, value)?,
            _ => {
                let flag = ZoneFlag::from_name(key).ok_or_else(|| ZoneError::invalid_field(key, value))?;
                if parse_bool(key, value)? {
                    self.flags.insert(flag);
                } else {
                    self.flags.remove(flag);
                }
            }
        }
        Ok(())
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_f32(key: &str, value: &str) -> Result<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ZoneError::invalid_field(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ZoneError::invalid_field(key, value)),
    }
}

fn parse_vec3(key: &str, value: &str) -> Result<Vec3> {
    let parts: Vec<f32> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| parse_f32(key, s))
        .collect::<Result<_>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(ZoneError::invalid_field(key, value)),
    }
}

/// A single number is a yaw; three numbers are pitch, yaw, roll.
fn parse_rotation(key: &str, value: &str) -> Result<Vec3> {
    match parse_f32(key, value) {
        Ok(yaw) => Ok(Vec3::new(0.0, yaw, 0.0)),
        Err(_) => parse_vec3(key, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let def = ZoneDefinition::new("arena")
            .with_name("Arena")
            .at(Vec3::new(10.0, 0.0, -4.0))
            .with_radius(50.0)
            .with_flag(ZoneFlag::PvpGod)
            .with_parent("world")
            .with_permission("vip");

        assert_eq!(def.id, "arena");
        assert_eq!(def.shape, Shape::Sphere { radius: 50.0 });
        assert!(def.flags.contains(ZoneFlag::PvpGod));
        assert_eq!(def.parent_id.as_deref(), Some("world"));
        assert_eq!(def.permission.as_deref(), Some("vip"));
        assert!(def.enabled);
    }

    #[test]
    fn test_apply_args_box() {
        let mut def = ZoneDefinition::new("1");
        def.apply_args(&["size", "10 4 6", "rotation", "45", "location", "1,2,3"]).unwrap();

        assert_eq!(
            def.shape,
            Shape::Box { size: Vec3::new(10.0, 4.0, 6.0), rotation: Vec3::new(0.0, 45.0, 0.0) }
        );
        assert_eq!(def.location, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_apply_args_flags_toggle() {
        let mut def = ZoneDefinition::new("1").with_flag(ZoneFlag::NoChat);
        def.apply_args(&["NOCHAT", "false", "eject", "true"]).unwrap();

        assert!(!def.flags.contains(ZoneFlag::NoChat));
        assert!(def.flags.contains(ZoneFlag::Eject));
    }

    #[test]
    fn test_apply_args_is_atomic() {
        let mut def = ZoneDefinition::new("1").with_name("Before");
        let err = def.apply_args(&["name", "After", "nofly", "true"]).unwrap_err();

        assert!(matches!(err, ZoneError::InvalidField { .. }));
        assert_eq!(def.name, "Before");
    }

    #[test]
    fn test_apply_args_errors() {
        let mut def = ZoneDefinition::new("1");
        assert!(matches!(def.apply_args(&["radius"]), Err(ZoneError::MissingValue(_))));
        assert!(def.apply_args(&["radius", "-3"]).is_err());
        assert!(def.apply_args(&["radius", "abc"]).is_err());
        assert!(def.apply_args(&["rotation", "90"]).is_err());
        assert!(def.apply_args(&["enabled", "maybe"]).is_err());
    }

    #[test]
    fn test_optional_fields_clear() {
        let mut def = ZoneDefinition::new("1").with_parent("p");
        def.apply_args(&["parent", "null", "permission", "zones.vip"]).unwrap();

        assert_eq!(def.parent_id, None);
        assert_eq!(def.permission.as_deref(), Some("zones.vip"));
    }

    #[test]
    fn test_json_roundtrip() {
        let def = ZoneDefinition::new("7")
            .with_box(Vec3::new(4.0, 4.0, 4.0), Vec3::new(0.0, 30.0, 0.0))
            .with_flag(ZoneFlag::NoDecay)
            .with_ambient(0.0, 12.5, 0.0);

        let json = serde_json::to_string(&def).unwrap();
        let back: ZoneDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(def, back);
    }
}
