//! Zone containment volumes.
//!
//! A zone is either a sphere or an oriented box. The variant is chosen
//! once when the geometry is built and never changes; changing a zone's
//! shape goes through a full rebuild.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::{Result, ZoneError};

/// Shape parameters as stored in a zone definition.
///
/// Box rotation is in degrees as `(pitch, yaw, roll)` about the X, Y and Z
/// axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { size: Vec3, rotation: Vec3 },
}

impl Shape {
    /// Sphere with the given radius.
    #[must_use]
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    /// Axis-aligned box with the given full size.
    #[must_use]
    pub fn cuboid(size: Vec3) -> Self {
        Shape::Box { size, rotation: Vec3::ZERO }
    }

    /// Check that the shape can contain something.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Shape::Sphere { radius } => {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(ZoneError::InvalidGeometry(format!("sphere radius {radius}")));
                }
            }
            Shape::Box { size, rotation } => {
                if !size.is_finite() || size.min_element() <= 0.0 {
                    return Err(ZoneError::InvalidGeometry(format!("box size {size}")));
                }
                if !rotation.is_finite() {
                    return Err(ZoneError::InvalidGeometry(format!("box rotation {rotation}")));
                }
            }
        }
        Ok(())
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Sphere { radius: 20.0 }
    }
}

#[derive(Clone, Copy, Debug)]
enum Volume {
    Sphere { radius: f32, radius_sq: f32 },
    Box { half: Vec3, rotation: Quat, inverse: Quat },
}

/// Resolved containment volume at a world position.
///
/// A disabled geometry admits nothing. Disabling does not evict anyone by
/// itself; the registry runs the exit path for current occupants.
#[derive(Clone, Copy, Debug)]
pub struct ZoneGeometry {
    center: Vec3,
    volume: Volume,
    enabled: bool,
}

impl ZoneGeometry {
    /// Build geometry for a shape centered at `center`.
    pub fn new(center: Vec3, shape: &Shape) -> Result<Self> {
        shape.validate()?;
        if !center.is_finite() {
            return Err(ZoneError::InvalidGeometry(format!("center {center}")));
        }

        let volume = match *shape {
            Shape::Sphere { radius } => Volume::Sphere {
                radius,
                radius_sq: radius * radius,
            },
            Shape::Box { size, rotation } => {
                let rotation = Quat::from_euler(
                    EulerRot::YXZ,
                    rotation.y.to_radians(),
                    rotation.x.to_radians(),
                    rotation.z.to_radians(),
                );
                Volume::Box {
                    half: size * 0.5,
                    rotation,
                    inverse: rotation.inverse(),
                }
            }
        };

        Ok(Self {
            center,
            volume,
            enabled: true,
        })
    }

    /// Does the volume contain `point`? Boundary points are inside.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        if !self.enabled {
            return false;
        }
        match self.volume {
            Volume::Sphere { radius_sq, .. } => point.distance_squared(self.center) <= radius_sq,
            Volume::Box { half, inverse, .. } => {
                let local = (inverse * (point - self.center)).abs();
                local.x <= half.x && local.y <= half.y && local.z <= half.z
            }
        }
    }

    /// Center of the volume.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Radius of the smallest center-anchored sphere enclosing the volume.
    #[must_use]
    pub fn bounding_extent(&self) -> f32 {
        match self.volume {
            Volume::Sphere { radius, .. } => radius,
            Volume::Box { half, .. } => half.length(),
        }
    }

    /// Radius of the largest center-anchored sphere inside the volume.
    #[must_use]
    pub fn inscribed_extent(&self) -> f32 {
        match self.volume {
            Volume::Sphere { radius, .. } => radius,
            Volume::Box { half, .. } => half.min_element(),
        }
    }

    /// World-space axis-aligned bounds as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        match self.volume {
            Volume::Sphere { radius, .. } => {
                (self.center - Vec3::splat(radius), self.center + Vec3::splat(radius))
            }
            Volume::Box { half, rotation, .. } => {
                let mut min = Vec3::splat(f32::MAX);
                let mut max = Vec3::splat(f32::MIN);
                for sx in [-1.0, 1.0] {
                    for sy in [-1.0, 1.0] {
                        for sz in [-1.0, 1.0] {
                            let corner = self.center + rotation * (half * Vec3::new(sx, sy, sz));
                            min = min.min(corner);
                            max = max.max(corner);
                        }
                    }
                }
                (min, max)
            }
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable admission.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
