use bez_geometry::CubicBezier;
use slotmap::SlotMap;

use crate::model::{Anchor, AnchorId};

/// A stored segment: `index` is the 1-based index of its end anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub curve: CubicBezier,
}

/// Iterator over the open path's segments, assembled from anchors and their
/// incoming control pairs.
pub struct SegmentIter<'a> {
    anchors: &'a SlotMap<AnchorId, Anchor>,
    order: &'a [AnchorId],
    next: usize,
}

impl<'a> SegmentIter<'a> {
    pub fn new(anchors: &'a SlotMap<AnchorId, Anchor>, order: &'a [AnchorId]) -> Self {
        Self {
            anchors,
            order,
            next: 1,
        }
    }
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        while self.next < self.order.len() {
            let k = self.next;
            self.next += 1;

            let start = self.anchors.get(self.order[k - 1])?;
            let end = self.anchors.get(self.order[k])?;
            if let Some(pair) = end.incoming {
                return Some(Segment {
                    index: k,
                    curve: CubicBezier::new(
                        start.position,
                        pair.leading.position,
                        pair.trailing.position,
                        end.position,
                    ),
                });
            }
        }
        None
    }
}
