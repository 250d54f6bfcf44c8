//! Open/closed state machine for the curve.

use bez_core::{CurveError, Result};
use serde::{Deserialize, Serialize};

use crate::collab::{Instancer, PolylineSink};
use crate::editor::CurveEditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopState {
    #[default]
    Open,
    /// A synthesized segment joins the last anchor back to the first.
    Closed,
}

impl<I: Instancer, P: PolylineSink> CurveEditor<I, P> {
    /// Open -> Closed: append the closing segment to the polyline.
    ///
    /// Needs at least two anchors; otherwise the editor stays open. Closing an
    /// already closed curve does nothing.
    pub fn close_loop(&mut self) -> Result<()> {
        if self.loop_state == LoopState::Closed {
            return Ok(());
        }
        let count = self.anchor_count();
        if count < 2 {
            return Err(CurveError::Precondition(
                "You need at least two anchor points to close the curve.".into(),
            ));
        }

        self.loop_state = LoopState::Closed;
        self.draw_segment(count);
        log::debug!("closed curve with {} anchors", count);
        Ok(())
    }

    /// Closed -> Open: drop the closing segment's samples and handles.
    pub fn open_loop(&mut self) -> Result<()> {
        if self.loop_state == LoopState::Open {
            return Ok(());
        }
        if self.anchor_count() < 2 {
            return Err(CurveError::Precondition(
                "You need at least two anchor points to open the curve.".into(),
            ));
        }

        let len = self.polyline.len().saturating_sub(self.config.resolution);
        self.truncate_polyline(len);
        self.destroy_closing_markers();
        self.loop_state = LoopState::Open;
        log::debug!("opened curve");
        Ok(())
    }
}
