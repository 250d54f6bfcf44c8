//! BezEdit curve editor: anchors, mirrored control pairs, and the sampled
//! polyline of an interactively edited piecewise cubic Bezier curve.

pub mod closed_loop;
pub mod collab;
pub mod config;
pub mod editor;
pub mod input;
mod iter;
pub mod model;
pub mod placement;
pub mod recording;
mod validate;

pub use closed_loop::LoopState;
pub use collab::{Instancer, MarkerKind, PolylineSink};
pub use config::EditorConfig;
pub use editor::CurveEditor;
pub use input::{ClickRole, FrameInput, PickKind, Picked};
pub use iter::{Segment, SegmentIter};
pub use model::*;
pub use recording::{RecordingInstancer, RecordingPolyline};
