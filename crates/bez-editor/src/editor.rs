use std::collections::HashMap;

use bez_core::{CurveError, EntityHandle, Result};
use bez_geometry::{block_range, sample_uniform, CubicBezier};
use bez_math::{are_mirrored, reflect_through, Point3};
use slotmap::SlotMap;

use crate::closed_loop::LoopState;
use crate::collab::{Instancer, MarkerKind, PolylineSink};
use crate::config::EditorConfig;
use crate::input::{LoopToggle, PointerState};
use crate::iter::SegmentIter;
use crate::model::*;
use crate::placement::place_controls;

/// Interactive editor for a piecewise cubic Bezier curve.
///
/// Owns the anchor arena, the control pairs, and the sampled polyline, and
/// keeps the display collaborators in step with every edit. Segment `k`
/// (1-based) runs from anchor `k - 1` to anchor `k` and fills polyline block
/// `k - 1`.
pub struct CurveEditor<I: Instancer, P: PolylineSink> {
    pub(crate) config: EditorConfig,
    pub(crate) anchors: SlotMap<AnchorId, Anchor>,
    pub(crate) order: Vec<AnchorId>,
    pub(crate) markers: HashMap<EntityHandle, MarkerOwner>,
    pub(crate) polyline: Vec<Point3>,
    pub(crate) loop_state: LoopState,
    pub(crate) closing_markers: Option<[EntityHandle; 2]>,
    pub(crate) pointer: PointerState,
    pub(crate) loop_toggle: LoopToggle,
    pub(crate) instancer: I,
    pub(crate) sink: P,
}

impl<I: Instancer, P: PolylineSink> CurveEditor<I, P> {
    pub fn new(config: EditorConfig, instancer: I, sink: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            anchors: SlotMap::with_key(),
            order: Vec::new(),
            markers: HashMap::new(),
            polyline: Vec::new(),
            loop_state: LoopState::Open,
            closing_markers: None,
            pointer: PointerState::default(),
            loop_toggle: LoopToggle::default(),
            instancer,
            sink,
        })
    }

    // --- Queries ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn instancer(&self) -> &I {
        &self.instancer
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    pub fn anchor_count(&self) -> usize {
        self.order.len()
    }

    pub fn control_count(&self) -> usize {
        2 * self.order.len().saturating_sub(1)
    }

    pub fn anchor(&self, index: usize) -> Option<&Anchor> {
        self.order.get(index).map(|&id| &self.anchors[id])
    }

    pub fn anchor_positions(&self) -> Vec<Point3> {
        self.order.iter().map(|&id| self.anchors[id].position).collect()
    }

    /// Flat view of all control points, pair by pair in path order.
    pub fn control_points(&self) -> Vec<Point3> {
        self.order
            .iter()
            .filter_map(|&id| self.anchors[id].incoming)
            .flat_map(|pair| [pair.leading.position, pair.trailing.position])
            .collect()
    }

    /// Control point at flat index `index` (see [`control_index`]).
    pub fn control(&self, index: usize) -> Option<&ControlPoint> {
        let (anchor_index, slot) = control_location(index);
        let id = *self.order.get(anchor_index)?;
        self.anchors[id].incoming.as_ref().map(|pair| pair.get(slot))
    }

    pub fn polyline(&self) -> &[Point3] {
        &self.polyline
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    /// Display handles of the synthesized closing segment, while closed.
    pub fn closing_markers(&self) -> Option<[EntityHandle; 2]> {
        self.closing_markers
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.dragging
    }

    /// The stored (open) segments, derived from anchors and their control pairs.
    pub fn segments(&self) -> SegmentIter<'_> {
        SegmentIter::new(&self.anchors, &self.order)
    }

    /// For each interior anchor, whether its adjacent handles mirror each other.
    pub fn smooth_joints(&self) -> Vec<bool> {
        let count = self.order.len();
        (1..count.saturating_sub(1))
            .map(|i| {
                let pivot = self.anchors[self.order[i]].position;
                match (
                    self.anchors[self.order[i]].incoming,
                    self.anchors[self.order[i + 1]].incoming,
                ) {
                    (Some(before), Some(after)) => are_mirrored(
                        pivot,
                        before.trailing.position,
                        after.leading.position,
                        self.config.tolerance,
                    ),
                    _ => false,
                }
            })
            .collect()
    }

    // --- Edits ---

    /// Append an anchor at the end of the path and draw the new segment.
    pub fn add_anchor(&mut self, point: Point3) -> Result<EntityHandle> {
        self.ensure_open("add an anchor")?;

        let position = self.config.plane.project_point(point);
        let marker = self.instancer.spawn(MarkerKind::Anchor, position);
        let id = self.anchors.insert(Anchor {
            position,
            marker,
            incoming: None,
        });
        self.markers.insert(marker, MarkerOwner::Anchor(id));
        self.order.push(id);

        let index = self.order.len() - 1;
        if index > 0 {
            self.append_controls(index);
            self.draw_segment(index);
        }
        log::debug!("added anchor {} at index {}", marker, index);
        Ok(marker)
    }

    /// Delete the anchor shown by `handle` and rebuild the polyline.
    pub fn delete_anchor(&mut self, handle: EntityHandle) -> Result<()> {
        self.ensure_open("delete an anchor")?;

        let id = match self.markers.get(&handle) {
            Some(MarkerOwner::Anchor(id)) => *id,
            Some(MarkerOwner::Control(..)) => {
                return Err(CurveError::InvalidReference(format!(
                    "marker {} is a control point, not an anchor",
                    handle
                )))
            }
            None => return Err(CurveError::NotFound(format!("marker {}", handle))),
        };
        let index = self
            .order
            .iter()
            .position(|&a| a == id)
            .ok_or_else(|| CurveError::NotFound(format!("anchor for marker {}", handle)))?;

        self.order.remove(index);
        let removed = self.anchors.remove(id).ok_or_else(|| {
            CurveError::NotFound(format!("anchor record for marker {}", handle))
        })?;
        self.destroy_marker(removed.marker);

        if index == 0 {
            // The new first anchor starts the path and loses its incoming pair.
            if let Some(&first) = self.order.first() {
                if let Some(pair) = self.anchors[first].incoming.take() {
                    self.destroy_pair(pair);
                }
            }
        } else {
            if let Some(pair) = removed.incoming {
                self.destroy_pair(pair);
            }
            if index < self.order.len() {
                self.update_controls(index);
                if index + 1 < self.order.len() {
                    self.update_controls(index + 1);
                }
            }
        }

        log::debug!("deleted anchor {} at index {}", handle, index);
        self.redraw_all();
        Ok(())
    }

    /// Move the anchor or control point shown by `handle` to `point` and
    /// re-smooth the segments it touches.
    pub fn drag_update(&mut self, handle: EntityHandle, point: Point3) -> Result<()> {
        self.ensure_open("drag a point")?;

        let owner = *self
            .markers
            .get(&handle)
            .ok_or_else(|| CurveError::NotFound(format!("marker {}", handle)))?;
        let position = self.config.plane.project_point(point);
        self.instancer.set_position(handle, position);

        match owner {
            MarkerOwner::Anchor(id) => self.drag_anchor(id, position),
            MarkerOwner::Control(id, slot) => self.drag_control(id, slot, position),
        }
    }

    fn drag_anchor(&mut self, id: AnchorId, position: Point3) -> Result<()> {
        let index = self.index_of(id)?;
        self.anchors[id].position = position;

        let last = self.order.len() - 1;
        if index == 0 {
            if last >= 1 {
                self.update_controls(1);
                self.draw_segment(1);
            }
            if last >= 2 {
                // Segment 2 mirrors the handle that was just recomputed.
                self.update_controls(2);
                self.draw_segment(2);
            }
        } else if index < last {
            self.update_controls(index);
            self.update_controls(index + 1);
            self.draw_segment(index);
            self.draw_segment(index + 1);
        } else {
            self.update_controls(index);
            self.draw_segment(index);
        }
        Ok(())
    }

    fn drag_control(&mut self, id: AnchorId, slot: Slot, position: Point3) -> Result<()> {
        let anchor_index = self.index_of(id)?;
        let index = control_index(anchor_index, slot);
        if let Some(pair) = self.anchors[id].incoming.as_mut() {
            pair.get_mut(slot).position = position;
        }

        let total = self.control_count();
        if index == 0 {
            self.draw_segment(1);
        } else if index == total - 1 {
            self.draw_segment(self.order.len() - 1);
        } else {
            // Even handles lead out of anchor idx/2, odd ones trail into (idx+1)/2.
            let (shared, partner) = if index % 2 == 0 {
                (index / 2, index - 1)
            } else {
                ((index + 1) / 2, index + 1)
            };
            let pivot = self.anchors[self.order[shared]].position;
            self.set_control(partner, reflect_through(pivot, position));
            self.draw_segment(shared);
            self.draw_segment(shared + 1);
        }
        Ok(())
    }

    // --- Control pairs ---

    /// Placement for the segment ending at anchor `k`, if that segment exists.
    fn compute_controls(&self, k: usize) -> Option<(Point3, Point3)> {
        if k == 0 || k >= self.order.len() {
            return None;
        }
        let start = self.anchors[self.order[k - 1]].position;
        let end = self.anchors[self.order[k]].position;
        let previous_trailing = if k > 1 {
            self.anchors[self.order[k - 1]]
                .incoming
                .map(|pair| pair.trailing.position)
        } else {
            None
        };
        Some(place_controls(start, end, previous_trailing, &self.config))
    }

    fn append_controls(&mut self, k: usize) {
        let Some((leading, trailing)) = self.compute_controls(k) else {
            return;
        };
        let id = self.order[k];
        let pair = ControlPair {
            leading: ControlPoint {
                position: leading,
                marker: self.instancer.spawn(MarkerKind::Control, leading),
            },
            trailing: ControlPoint {
                position: trailing,
                marker: self.instancer.spawn(MarkerKind::Control, trailing),
            },
        };
        self.markers
            .insert(pair.leading.marker, MarkerOwner::Control(id, Slot::Leading));
        self.markers
            .insert(pair.trailing.marker, MarkerOwner::Control(id, Slot::Trailing));
        self.anchors[id].incoming = Some(pair);
    }

    fn update_controls(&mut self, k: usize) {
        let Some((leading, trailing)) = self.compute_controls(k) else {
            return;
        };
        let id = self.order[k];
        let Some(pair) = self.anchors[id].incoming.as_mut() else {
            log::warn!("segment {} has no control pair to update", k);
            return;
        };
        pair.leading.position = leading;
        pair.trailing.position = trailing;
        let [lead_marker, trail_marker] = pair.markers();
        self.instancer.set_position(lead_marker, leading);
        self.instancer.set_position(trail_marker, trailing);
    }

    fn set_control(&mut self, index: usize, position: Point3) {
        let (anchor_index, slot) = control_location(index);
        let Some(&id) = self.order.get(anchor_index) else {
            return;
        };
        if let Some(pair) = self.anchors[id].incoming.as_mut() {
            let control = pair.get_mut(slot);
            control.position = position;
            let marker = control.marker;
            self.instancer.set_position(marker, position);
        }
    }

    fn destroy_pair(&mut self, pair: ControlPair) {
        for marker in pair.markers() {
            self.destroy_marker(marker);
        }
    }

    fn destroy_marker(&mut self, marker: EntityHandle) {
        self.markers.remove(&marker);
        self.instancer.destroy(marker);
    }

    fn index_of(&self, id: AnchorId) -> Result<usize> {
        self.order
            .iter()
            .position(|&a| a == id)
            .ok_or_else(|| CurveError::NotFound("anchor is not on the path".into()))
    }

    pub(crate) fn ensure_open(&self, action: &str) -> Result<()> {
        match self.loop_state {
            LoopState::Open => Ok(()),
            LoopState::Closed => Err(CurveError::Precondition(format!(
                "cannot {} while the curve is closed",
                action
            ))),
        }
    }

    // --- Sampling ---

    /// Stored geometry of the segment ending at anchor `k`.
    pub fn segment_curve(&self, k: usize) -> Option<CubicBezier> {
        if k == 0 || k >= self.order.len() {
            return None;
        }
        let start = &self.anchors[self.order[k - 1]];
        let end = &self.anchors[self.order[k]];
        let pair = end.incoming?;
        Some(CubicBezier::new(
            start.position,
            pair.leading.position,
            pair.trailing.position,
            end.position,
        ))
    }

    /// Closing segment from the last anchor back to the first, with handles
    /// mirrored from the path's outermost control points.
    pub fn closing_curve(&self) -> Option<CubicBezier> {
        if self.order.len() < 2 {
            return None;
        }
        let first = &self.anchors[self.order[0]];
        let second = &self.anchors[self.order[1]];
        let last = &self.anchors[self.order[self.order.len() - 1]];

        let first_leading = second.incoming?.leading.position;
        let last_trailing = last.incoming?.trailing.position;
        Some(CubicBezier::new(
            last.position,
            reflect_through(last.position, last_trailing),
            reflect_through(first.position, first_leading),
            first.position,
        ))
    }

    /// Resample segment `k` into polyline block `k - 1`. Index `anchor_count`
    /// draws the closing segment while closed; anything else out of range is
    /// ignored.
    pub(crate) fn draw_segment(&mut self, k: usize) {
        let count = self.order.len();
        if k == 0 || k > count {
            return;
        }
        let curve = if k == count {
            if self.loop_state != LoopState::Closed {
                return;
            }
            match self.closing_curve() {
                Some(curve) => {
                    self.respawn_closing_markers(&curve);
                    curve
                }
                None => return,
            }
        } else {
            match self.segment_curve(k) {
                Some(curve) => curve,
                None => return,
            }
        };
        self.write_block(k - 1, &curve);
    }

    fn respawn_closing_markers(&mut self, curve: &CubicBezier) {
        self.destroy_closing_markers();
        self.closing_markers = Some([
            self.instancer.spawn(MarkerKind::ClosingControl, curve.p1),
            self.instancer.spawn(MarkerKind::ClosingControl, curve.p2),
        ]);
    }

    pub(crate) fn destroy_closing_markers(&mut self) {
        if let Some(markers) = self.closing_markers.take() {
            for marker in markers {
                self.instancer.destroy(marker);
            }
        }
    }

    fn write_block(&mut self, block: usize, curve: &CubicBezier) {
        let resolution = self.config.resolution;
        let range = block_range(block, resolution);
        if self.polyline.len() < range.end {
            self.polyline.resize(range.end, Point3::ZERO);
            self.sink.set_point_count(range.end);
        }
        for (i, point) in range.zip(sample_uniform(curve, resolution)) {
            self.polyline[i] = point;
            self.sink.set_point(i, point);
        }
    }

    pub(crate) fn truncate_polyline(&mut self, len: usize) {
        self.polyline.truncate(len);
        self.sink.set_point_count(self.polyline.len());
    }

    /// Rebuild the whole polyline from the stored segments.
    pub(crate) fn redraw_all(&mut self) {
        self.truncate_polyline(0);
        for k in 1..self.order.len() {
            self.draw_segment(k);
        }
    }
}
