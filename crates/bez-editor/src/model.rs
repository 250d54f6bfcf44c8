use bez_core::EntityHandle;
use bez_math::Point3;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

// --- SlotMap key types ---

new_key_type! {
    pub struct AnchorId;
}

/// Which handle of a segment's control pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Handle next to the segment's start anchor.
    Leading,
    /// Handle next to the segment's end anchor.
    Trailing,
}

impl Slot {
    /// Slot of flat control index `index` (even = leading, odd = trailing).
    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 {
            Slot::Leading
        } else {
            Slot::Trailing
        }
    }

    pub fn offset(self) -> usize {
        match self {
            Slot::Leading => 0,
            Slot::Trailing => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: Point3,
    pub marker: EntityHandle,
}

/// The two handles of the segment ending at the owning anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPair {
    pub leading: ControlPoint,
    pub trailing: ControlPoint,
}

impl ControlPair {
    pub fn get(&self, slot: Slot) -> &ControlPoint {
        match slot {
            Slot::Leading => &self.leading,
            Slot::Trailing => &self.trailing,
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut ControlPoint {
        match slot {
            Slot::Leading => &mut self.leading,
            Slot::Trailing => &mut self.trailing,
        }
    }

    pub fn markers(&self) -> [EntityHandle; 2] {
        [self.leading.marker, self.trailing.marker]
    }
}

/// A point the curve passes through. Every anchor except the first owns the
/// control pair of its incoming segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub position: Point3,
    pub marker: EntityHandle,
    pub incoming: Option<ControlPair>,
}

/// What a live marker handle stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOwner {
    Anchor(AnchorId),
    Control(AnchorId, Slot),
}

/// Flat index of a control point: `2(k-1)` / `2(k-1)+1` for the segment ending at anchor `k`.
pub fn control_index(anchor_index: usize, slot: Slot) -> usize {
    2 * (anchor_index - 1) + slot.offset()
}

/// Inverse of [`control_index`]: the anchor index owning the pair, and the slot.
pub fn control_location(index: usize) -> (usize, Slot) {
    (index / 2 + 1, Slot::from_index(index))
}
