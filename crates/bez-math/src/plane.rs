use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A plane in 3D space defined by a point and normal.
///
/// All curve editing happens on one such plane; points coming in from the
/// outside are projected onto it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
        }
    }

    pub fn xy() -> Self {
        Self::new(Point3::ZERO, Vector3::Z)
    }

    /// XY plane lifted to the given third coordinate.
    pub fn xy_at(z: f64) -> Self {
        Self::new(Point3::new(0.0, 0.0, z), Vector3::Z)
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    /// Project a point onto this plane.
    pub fn project_point(&self, point: Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }

    /// In-plane perpendicular of `dir`, rotated a quarter turn counter-clockwise
    /// around the normal. For the XY plane this is `(-dir.y, dir.x, 0)`.
    pub fn perpendicular(&self, dir: Vector3) -> Vector3 {
        self.normal.cross(dir)
    }

    /// Whether the normal has unit length (deserialized planes may not).
    pub fn is_normalized(&self) -> bool {
        self.normal.is_normalized()
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::xy()
    }
}
