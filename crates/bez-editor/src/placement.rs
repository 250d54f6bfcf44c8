//! Control-point placement for a single segment.

use bez_math::{reflect_through, Point3};

use crate::config::EditorConfig;

/// Handles for the segment from `start` to `end`.
///
/// The trailing handle sits at two thirds of the chord, pushed sideways by
/// `handle_offset * distance`. The leading handle mirrors the previous
/// segment's trailing handle through `start` when there is one, and otherwise
/// uses the same sideways push at one third of the chord. Both are projected
/// onto the working plane.
pub fn place_controls(
    start: Point3,
    end: Point3,
    previous_trailing: Option<Point3>,
    config: &EditorConfig,
) -> (Point3, Point3) {
    let plane = &config.plane;
    let dir = (end - start).normalize_or_zero();
    let distance = start.distance(end);
    let offset = plane.perpendicular(dir) * distance * config.handle_offset;

    let one_third = start + dir * (distance / 3.0);
    let two_thirds = start + dir * (2.0 * distance / 3.0);

    let leading = match previous_trailing {
        Some(prev) => reflect_through(start, prev),
        None => one_third + offset,
    };
    let trailing = two_thirds + offset;

    (plane.project_point(leading), plane.project_point(trailing))
}
