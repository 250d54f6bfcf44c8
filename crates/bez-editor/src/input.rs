//! Per-tick pointer and toggle dispatch.

use bez_core::{CurveError, EntityHandle};
use bez_math::Point3;
use serde::{Deserialize, Serialize};

use crate::closed_loop::LoopState;
use crate::collab::{Instancer, PolylineSink};
use crate::editor::CurveEditor;

/// How a pointer press is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClickRole {
    #[default]
    AddAnchor,
    DeleteAnchor,
    SelectAndDrag,
}

/// Tag the hit-tester attaches to a picked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickKind {
    Anchor,
    Control,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picked {
    pub handle: EntityHandle,
    pub kind: PickKind,
}

impl Picked {
    pub fn new(handle: EntityHandle, kind: PickKind) -> Self {
        Self { handle, kind }
    }
}

/// Everything the input collaborator reports for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    pub pointer_pressed: bool,
    pub pointer_released: bool,
    /// World-space pointer position, projected onto the working plane on use.
    pub pointer_position: Point3,
    pub picked: Option<Picked>,
    pub click_role: ClickRole,
    pub closed_loop: bool,
}

/// Transient selection and drag state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerState {
    pub selected: Option<EntityHandle>,
    pub dragging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    Close,
    Open,
}

/// Turns the external closed-loop flag into edge events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopToggle {
    flag: bool,
}

impl LoopToggle {
    /// A command when `flag` differs from the previous tick's value.
    pub fn edge(&mut self, flag: bool) -> Option<LoopCommand> {
        if flag == self.flag {
            return None;
        }
        self.flag = flag;
        Some(if flag {
            LoopCommand::Close
        } else {
            LoopCommand::Open
        })
    }
}

impl<I: Instancer, P: PolylineSink> CurveEditor<I, P> {
    /// Run one frame: resolve the loop toggle, then (while open) at most one
    /// press classification plus one drag update.
    pub fn tick(&mut self, input: &FrameInput) {
        if let Some(command) = self.loop_toggle.edge(input.closed_loop) {
            let result = match command {
                LoopCommand::Close => self.close_loop(),
                LoopCommand::Open => self.open_loop(),
            };
            if let Err(err) = result {
                report(err);
            }
        }

        if self.loop_state == LoopState::Open {
            self.handle_pointer(input);
        }
    }

    fn handle_pointer(&mut self, input: &FrameInput) {
        let position = self.config.plane.project_point(input.pointer_position);

        if input.pointer_pressed {
            match input.click_role {
                ClickRole::AddAnchor => {
                    if let Err(err) = self.add_anchor(position) {
                        report(err);
                    }
                }
                ClickRole::DeleteAnchor => {
                    if let Some(picked) = input.picked.filter(|p| p.kind == PickKind::Anchor) {
                        if let Err(err) = self.delete_anchor(picked.handle) {
                            report(err);
                        }
                    }
                }
                ClickRole::SelectAndDrag => {
                    if let Some(picked) = input.picked {
                        if matches!(picked.kind, PickKind::Anchor | PickKind::Control) {
                            self.pointer.selected = Some(picked.handle);
                            self.pointer.dragging = true;
                        }
                    }
                }
            }
        }

        if input.pointer_released {
            self.pointer = PointerState::default();
        }

        if self.pointer.dragging {
            if let Some(handle) = self.pointer.selected {
                if let Err(err) = self.drag_update(handle, position) {
                    report(err);
                }
            }
        }
    }
}

fn report(err: CurveError) {
    match err {
        CurveError::Precondition(msg) => log::info!("{}", msg),
        err if err.is_invalid_reference() => log::debug!("ignoring input: {}", err),
        err => log::warn!("{}", err),
    }
}
