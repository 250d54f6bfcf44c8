use bez_core::error::{CurveError, Result};
use bez_core::traits::Validate;

use crate::closed_loop::LoopState;
use crate::collab::{Instancer, PolylineSink};
use crate::editor::CurveEditor;
use crate::model::{MarkerOwner, Slot};

impl<I: Instancer, P: PolylineSink> Validate for CurveEditor<I, P> {
    fn validate(&self) -> Result<()> {
        let count = self.order.len();

        // 1. Arena and path order agree
        if self.anchors.len() != count {
            return Err(CurveError::Invariant(format!(
                "{} anchors stored but {} on the path",
                self.anchors.len(),
                count
            )));
        }

        // 2. Exactly the non-first anchors own a control pair
        for (index, &id) in self.order.iter().enumerate() {
            let anchor = self.anchors.get(id).ok_or_else(|| {
                CurveError::Invariant(format!("path index {} has no anchor record", index))
            })?;
            if anchor.incoming.is_some() != (index > 0) {
                return Err(CurveError::Invariant(format!(
                    "anchor {} at index {} has wrong control pair ownership",
                    anchor.marker, index
                )));
            }
        }
        let controls = self.control_points().len();
        if controls != 2 * count.saturating_sub(1) {
            return Err(CurveError::Invariant(format!(
                "{} control points for {} anchors",
                controls, count
            )));
        }

        // 3. Marker index maps every live marker to its owner
        if self.markers.len() != count + controls {
            return Err(CurveError::Invariant(format!(
                "{} markers tracked, expected {}",
                self.markers.len(),
                count + controls
            )));
        }
        for (&handle, &owner) in &self.markers {
            let consistent = match owner {
                MarkerOwner::Anchor(id) => self.anchors.get(id).map(|a| a.marker) == Some(handle),
                MarkerOwner::Control(id, slot) => self
                    .anchors
                    .get(id)
                    .and_then(|a| a.incoming)
                    .map(|pair| pair.get(slot).marker)
                    == Some(handle),
            };
            if !consistent {
                return Err(CurveError::Invariant(format!(
                    "marker {} does not match its owner {:?}",
                    handle, owner
                )));
            }
        }

        // 4. Polyline length follows the segment count
        let segments = match self.loop_state {
            LoopState::Open => count.saturating_sub(1),
            LoopState::Closed => count,
        };
        let expected = segments * self.config.resolution;
        if self.polyline.len() != expected {
            return Err(CurveError::Invariant(format!(
                "polyline has {} points, expected {}",
                self.polyline.len(),
                expected
            )));
        }
        if self.closing_markers.is_some() != (self.loop_state == LoopState::Closed) {
            return Err(CurveError::Invariant(
                "closing markers out of step with loop state".into(),
            ));
        }

        // 5. Everything stays on the working plane
        let plane = &self.config.plane;
        let tol = self.config.tolerance;
        let off_plane = self
            .order
            .iter()
            .flat_map(|&id| {
                let anchor = &self.anchors[id];
                let pair = anchor.incoming;
                std::iter::once(anchor.position).chain(
                    pair.into_iter()
                        .flat_map(|p| [p.get(Slot::Leading).position, p.get(Slot::Trailing).position]),
                )
            })
            .find(|&p| !tol.is_zero(plane.signed_distance(p)));
        if let Some(p) = off_plane {
            return Err(CurveError::Invariant(format!(
                "point {:?} lies off the working plane",
                p
            )));
        }

        Ok(())
    }
}
