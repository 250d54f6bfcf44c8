//! Interfaces to the display collaborators the editor drives.

use bez_core::EntityHandle;
use bez_math::Point3;
use serde::{Deserialize, Serialize};

/// Kind of display marker to instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    Anchor,
    Control,
    /// Display-only handle of the synthesized closing segment.
    ClosingControl,
}

/// Creates, moves, and destroys display markers.
pub trait Instancer {
    fn spawn(&mut self, kind: MarkerKind, position: Point3) -> EntityHandle;
    fn destroy(&mut self, handle: EntityHandle);
    fn position(&self, handle: EntityHandle) -> Option<Point3>;
    fn set_position(&mut self, handle: EntityHandle, position: Point3);
}

/// Receives the sampled polyline, one point at a time.
pub trait PolylineSink {
    fn set_point_count(&mut self, count: usize);
    fn set_point(&mut self, index: usize, point: Point3);
}
