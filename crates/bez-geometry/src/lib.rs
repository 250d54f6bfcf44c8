//! BezEdit geometry: parametric curves and their sampling.

pub mod curve;
pub mod sample;

pub use curve::{cubic_point, CubicBezier, Curve};
pub use sample::{block_range, sample_uniform};
