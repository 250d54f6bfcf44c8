use approx::abs_diff_eq;
use bez_core::Tolerance;

use crate::Point3;

/// Reflect `point` through `pivot`: `pivot + (pivot - point)`.
pub fn reflect_through(pivot: Point3, point: Point3) -> Point3 {
    pivot + (pivot - point)
}

/// Whether `a` and `b` are reflections of each other through `pivot`
/// (collinear with it and at equal distance).
pub fn are_mirrored(pivot: Point3, a: Point3, b: Point3, tol: Tolerance) -> bool {
    let midpoint = (a + b) * 0.5;
    abs_diff_eq!(midpoint.x, pivot.x, epsilon = tol.linear)
        && abs_diff_eq!(midpoint.y, pivot.y, epsilon = tol.linear)
        && abs_diff_eq!(midpoint.z, pivot.z, epsilon = tol.linear)
}
