//! Uniform sampling of curves into polyline blocks.

use bez_math::Point3;

use crate::curve::Curve;

/// Sample `resolution` points at `t = i / resolution` for `i in 0..resolution`,
/// mapped onto the curve domain.
///
/// The end of the domain is never sampled: consecutive segments share their
/// boundary point through the next block's first sample.
pub fn sample_uniform(curve: &dyn Curve, resolution: usize) -> impl Iterator<Item = Point3> + '_ {
    let (t_min, t_max) = curve.domain();
    (0..resolution).map(move |i| {
        let s = i as f64 / resolution as f64;
        curve.point_at(t_min + (t_max - t_min) * s)
    })
}

/// Position of polyline block `block` (0-based) for a given resolution.
pub fn block_range(block: usize, resolution: usize) -> std::ops::Range<usize> {
    let start = block * resolution;
    start..start + resolution
}
