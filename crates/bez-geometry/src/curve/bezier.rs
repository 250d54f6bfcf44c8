//! Cubic Bezier segment.

use bez_math::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::Curve;

/// `B(t) = (1-t)^3 p0 + 3(1-t)^2 t p1 + 3(1-t) t^2 p2 + t^3 p3`
///
/// Parameters outside `[0, 1]` extrapolate.
pub fn cubic_point(t: f64, p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Point3 {
    let u = 1.0 - t;
    let tt = t * t;
    let uu = u * u;

    uu * u * p0 + 3.0 * uu * t * p1 + 3.0 * u * tt * p2 + tt * t * p3
}

/// A cubic Bezier curve through `p0` and `p3`, shaped by the handles `p1` and `p2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl CubicBezier {
    pub fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    pub fn control_points(&self) -> [Point3; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }
}

impl Curve for CubicBezier {
    fn point_at(&self, t: f64) -> Point3 {
        cubic_point(t, self.p0, self.p1, self.p2, self.p3)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        let u = 1.0 - t;
        3.0 * u * u * (self.p1 - self.p0)
            + 6.0 * u * t * (self.p2 - self.p1)
            + 3.0 * t * t * (self.p3 - self.p2)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        self.p0 == self.p3
    }
}
