//! In-memory collaborators that record every call.
//!
//! Useful headless and in tests, where spawn/destroy balance and the exact set
//! of rewritten polyline points need checking.

use std::collections::{BTreeSet, HashMap};

use bez_core::EntityHandle;
use bez_math::Point3;

use crate::collab::{Instancer, MarkerKind, PolylineSink};

#[derive(Debug, Default)]
pub struct RecordingInstancer {
    live: HashMap<EntityHandle, (MarkerKind, Point3)>,
    pub spawned: usize,
    pub destroyed: usize,
}

impl RecordingInstancer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live_of_kind(&self, kind: MarkerKind) -> usize {
        self.live.values().filter(|(k, _)| *k == kind).count()
    }

    pub fn kind(&self, handle: EntityHandle) -> Option<MarkerKind> {
        self.live.get(&handle).map(|(k, _)| *k)
    }

    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Every spawn has been paired with at most one destroy of a live marker.
    pub fn is_balanced(&self) -> bool {
        self.spawned == self.destroyed + self.live.len()
    }
}

impl Instancer for RecordingInstancer {
    fn spawn(&mut self, kind: MarkerKind, position: Point3) -> EntityHandle {
        let handle = EntityHandle::new();
        self.live.insert(handle, (kind, position));
        self.spawned += 1;
        handle
    }

    fn destroy(&mut self, handle: EntityHandle) {
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
        } else {
            log::warn!("destroy of unknown marker {}", handle);
        }
    }

    fn position(&self, handle: EntityHandle) -> Option<Point3> {
        self.live.get(&handle).map(|(_, p)| *p)
    }

    fn set_position(&mut self, handle: EntityHandle, position: Point3) {
        if let Some(entry) = self.live.get_mut(&handle) {
            entry.1 = position;
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingPolyline {
    pub points: Vec<Point3>,
    /// Indices written since the last [`RecordingPolyline::clear_touched`].
    pub touched: BTreeSet<usize>,
    pub writes: usize,
}

impl RecordingPolyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_touched(&mut self) {
        self.touched.clear();
        self.writes = 0;
    }
}

impl PolylineSink for RecordingPolyline {
    fn set_point_count(&mut self, count: usize) {
        self.points.resize(count, Point3::ZERO);
    }

    fn set_point(&mut self, index: usize, point: Point3) {
        if index >= self.points.len() {
            self.points.resize(index + 1, Point3::ZERO);
        }
        self.points[index] = point;
        self.touched.insert(index);
        self.writes += 1;
    }
}
