#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::Document;
use crate::element::ElementId;
use crate::geometry::Point;
use crate::input::ResizeHandle;

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Test which element (if any) is under `pt`.
///
/// Handles of `handles_for` are checked first (only unlocked elements expose
/// handles), then element bodies from the top of the paint order down.
#[must_use]
pub fn hit_test(pt: Point, doc: &Document, handles_for: Option<ElementId>) -> Option<Hit> {
    if let Some(el) = handles_for.and_then(|id| doc.get(&id)).filter(|el| !el.locked) {
        let rect = el.rect();
        let handle = ResizeHandle::ALL.into_iter().find(|h| {
            let anchor = h.anchor_point(&rect);
            (pt.x - anchor.x).abs() <= HANDLE_RADIUS_PX && (pt.y - anchor.y).abs() <= HANDLE_RADIUS_PX
        });
        if let Some(handle) = handle {
            return Some(Hit { element_id: el.id, part: HitPart::ResizeHandle(handle) });
        }
    }

    doc.paint_order()
        .into_iter()
        .rev()
        .find(|el| el.rect().contains(pt))
        .map(|el| Hit { element_id: el.id, part: HitPart::Body })
}
