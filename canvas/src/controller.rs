//! Selection and manipulation controller.
//!
//! DESIGN
//! ======
//! The controller owns only transient editing state: the selection, the
//! active gesture, and the guide lines matched during the latest drag frame.
//! The document itself is passed in by the caller on every call, so there is
//! exactly one authoritative element list and no private copies.
//!
//! Every mutating operation returns whether the document changed. The caller
//! (the editor session) records one history entry per `true` returned from a
//! committing operation; gesture frames (`update_*`) never record.
//!
//! ERROR HANDLING
//! ==============
//! Unknown ids are no-ops. An element deleted mid-gesture is skipped; the
//! gesture keeps going for the rest, or ends quietly if nothing is left.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Capabilities, EditorConfig};
use crate::consts::{ROTATION_STEP_DEG, Z_INDEX_LIMIT};
use crate::doc::Document;
use crate::element::{Content, Element, ElementId, StylePatch};
use crate::geometry::{self, Point, Rect, Size, SnapLine};
use crate::input::{InputState, ResizeHandle};

/// Canvas-relative alignment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone)]
pub struct Controller {
    selection: Vec<ElementId>,
    input: InputState,
    canvas: Size,
    snap_threshold: f64,
    min_element_size: f64,
    duplicate_offset: f64,
    capabilities: Capabilities,
    active_guides: Vec<SnapLine>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Controller {
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            selection: Vec::new(),
            input: InputState::Idle,
            canvas: config.canvas,
            snap_threshold: config.snap_threshold,
            min_element_size: config.min_element_size,
            duplicate_offset: config.duplicate_offset,
            capabilities: config.capabilities,
            active_guides: Vec::new(),
        }
    }

    // --- Queries ---

    /// Selected ids in the order they were selected.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.contains(id)
    }

    /// The active gesture.
    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Guide lines the primary element snapped to on the latest drag frame.
    #[must_use]
    pub fn active_guides(&self) -> &[SnapLine] {
        &self.active_guides
    }

    #[must_use]
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Change the page size. Existing elements are not re-clamped until they
    /// are next moved or resized.
    pub fn set_canvas(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    // --- Selection ---

    /// Replace the selection with `{id}`, or toggle `id` when `additive`.
    /// Returns whether the selection changed.
    pub fn select(&mut self, doc: &Document, id: ElementId, additive: bool) -> bool {
        if !doc.contains(&id) {
            return false;
        }
        if additive && self.capabilities.multi_select {
            if let Some(idx) = self.selection.iter().position(|s| *s == id) {
                self.selection.remove(idx);
            } else {
                self.selection.push(id);
            }
            return true;
        }
        if self.selection == [id] {
            return false;
        }
        self.selection = vec![id];
        true
    }

    pub fn select_all(&mut self, doc: &Document) -> bool {
        if !self.capabilities.multi_select {
            return false;
        }
        let all = doc.ids();
        if all == self.selection {
            return false;
        }
        self.selection = all;
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        true
    }

    /// Replace the selection with the ids of `ids` present in `doc`.
    pub fn set_selection(&mut self, doc: &Document, ids: &[ElementId]) -> bool {
        let mut next: Vec<ElementId> = Vec::with_capacity(ids.len());
        for id in ids {
            if doc.contains(id) && !next.contains(id) {
                next.push(*id);
            }
        }
        if next == self.selection {
            return false;
        }
        self.selection = next;
        true
    }

    /// Drop selected ids that no longer exist in `doc`.
    pub fn prune_selection(&mut self, doc: &Document) -> bool {
        let before = self.selection.len();
        self.selection.retain(|id| doc.contains(id));
        before != self.selection.len()
    }

    /// Select every element whose rectangle intersects the marquee spanned by
    /// `start` and `current`.
    pub fn marquee_select(&mut self, start: Point, current: Point, elements: &[Element]) -> bool {
        let marquee = Rect::from_corners(start, current);
        let next: Vec<ElementId> = elements
            .iter()
            .filter(|el| geometry::intersects(&el.rect(), &marquee))
            .map(|el| el.id)
            .collect();
        if next == self.selection {
            return false;
        }
        self.selection = next;
        true
    }

    // --- Drag ---

    /// Start moving the selection, or just `hit` when it is not selected.
    ///
    /// Locked elements stay put. Returns whether a drag began.
    pub fn begin_drag(&mut self, doc: &Document, pointer: Point, hit: Option<ElementId>) -> bool {
        if !self.input.is_idle() {
            return false;
        }

        let hit = hit.filter(|id| doc.contains(id));
        let candidates: Vec<ElementId> = match hit {
            Some(id) if !self.is_selected(&id) => vec![id],
            _ => self.selection.clone(),
        };

        let start_positions: Vec<(ElementId, Point)> = doc
            .elements()
            .iter()
            .filter(|el| candidates.contains(&el.id) && !el.locked)
            .map(|el| (el.id, el.position))
            .collect();
        if start_positions.is_empty() {
            return false;
        }

        let primary = hit.filter(|id| start_positions.iter().any(|(sid, _)| sid == id)).or_else(|| {
            doc.paint_order()
                .into_iter()
                .rev()
                .find(|el| start_positions.iter().any(|(sid, _)| *sid == el.id))
                .map(|el| el.id)
        });
        let Some(primary) = primary else {
            return false;
        };

        debug!(%primary, count = start_positions.len(), "drag started");
        self.input = InputState::Dragging { primary, start_pointer: pointer, start_positions };
        true
    }

    /// Move every dragged element by `pointer - start_pointer`, clamped to the
    /// page. The primary element additionally snaps its edges or center to
    /// guide lines.
    pub fn update_drag(&mut self, doc: &mut Document, pointer: Point) -> bool {
        let InputState::Dragging { primary, start_pointer, start_positions } = &self.input else {
            return false;
        };
        let delta = pointer.delta_from(*start_pointer);

        let lines = if self.capabilities.snapping {
            let dragged: Vec<ElementId> = start_positions.iter().map(|(id, _)| *id).collect();
            geometry::candidate_snap_lines(doc.elements(), &dragged, self.canvas)
        } else {
            Vec::new()
        };

        let mut guides = Vec::new();
        let mut changed = false;
        for (id, start) in start_positions {
            let Some(el) = doc.get_mut(id) else {
                continue;
            };
            let mut rect = geometry::clamp(&Rect::from_parts(start.offset(delta), el.size), self.canvas);
            if id == primary && !lines.is_empty() {
                let m = geometry::snap_rect(&rect, &lines, self.snap_threshold);
                guides.extend(m.vertical);
                guides.extend(m.horizontal);
                rect = geometry::clamp(&Rect::from_parts(m.point, el.size), self.canvas);
            }
            if el.position != rect.position() {
                el.position = rect.position();
                changed = true;
            }
        }

        self.active_guides = guides;
        changed
    }

    /// Finish the drag. Returns whether any element ended somewhere new.
    pub fn end_drag(&mut self, doc: &Document) -> bool {
        if !matches!(self.input, InputState::Dragging { .. }) {
            return false;
        }
        let InputState::Dragging { start_positions, .. } = std::mem::take(&mut self.input) else {
            return false;
        };
        self.active_guides.clear();
        let moved = start_positions
            .iter()
            .any(|(id, start)| doc.get(id).is_some_and(|el| el.position != *start));
        debug!(moved, "drag ended");
        moved
    }

    // --- Resize ---

    pub fn begin_resize(&mut self, doc: &Document, id: ElementId, handle: ResizeHandle, pointer: Point) -> bool {
        if !self.input.is_idle() {
            return false;
        }
        let Some(el) = doc.get(&id).filter(|el| !el.locked) else {
            return false;
        };
        debug!(%id, ?handle, "resize started");
        self.input = InputState::Resizing { id, handle, start_pointer: pointer, start_rect: el.rect() };
        true
    }

    pub fn update_resize(&mut self, doc: &mut Document, pointer: Point) -> bool {
        let InputState::Resizing { id, handle, start_pointer, start_rect } = &self.input else {
            return false;
        };
        let Some(el) = doc.get_mut(id) else {
            self.input = InputState::Idle;
            return false;
        };
        let rect = resize_rect(
            start_rect,
            *handle,
            pointer.delta_from(*start_pointer),
            self.min_element_size,
            self.canvas,
        );
        if el.rect() == rect {
            return false;
        }
        el.set_rect(rect);
        true
    }

    /// Finish the resize. Returns whether the element's rectangle changed.
    pub fn end_resize(&mut self, doc: &Document) -> bool {
        if !matches!(self.input, InputState::Resizing { .. }) {
            return false;
        }
        let InputState::Resizing { id, start_rect, .. } = std::mem::take(&mut self.input) else {
            return false;
        };
        let resized = doc.get(&id).is_some_and(|el| el.rect() != start_rect);
        debug!(%id, resized, "resize ended");
        resized
    }

    // --- Marquee ---

    /// Start a rubber band at `pointer`. An additive marquee adds its hits to
    /// the selection held at this point instead of replacing it.
    pub fn begin_marquee(&mut self, pointer: Point, additive: bool) -> bool {
        if !self.input.is_idle() || !self.capabilities.multi_select {
            return false;
        }
        let kept = if additive { self.selection.clone() } else { Vec::new() };
        self.input = InputState::MarqueeSelecting { start: pointer, current: pointer, kept };
        true
    }

    /// Extend the marquee to `pointer` and reselect. Returns whether the
    /// selection changed.
    pub fn update_marquee(&mut self, doc: &Document, pointer: Point) -> bool {
        let InputState::MarqueeSelecting { start, current, kept } = &mut self.input else {
            return false;
        };
        *current = pointer;
        let marquee = Rect::from_corners(*start, pointer);
        let mut next = kept.clone();
        for el in doc.elements() {
            if geometry::intersects(&el.rect(), &marquee) && !next.contains(&el.id) {
                next.push(el.id);
            }
        }
        next.retain(|id| doc.contains(id));
        if next == self.selection {
            return false;
        }
        self.selection = next;
        true
    }

    pub fn end_marquee(&mut self) -> bool {
        if !matches!(self.input, InputState::MarqueeSelecting { .. }) {
            return false;
        }
        self.input = InputState::Idle;
        true
    }

    /// Abort the active gesture, restoring start positions and sizes. Nothing
    /// here should be recorded. Returns whether a gesture was active.
    pub fn cancel_gesture(&mut self, doc: &mut Document) -> bool {
        self.active_guides.clear();
        match std::mem::take(&mut self.input) {
            InputState::Idle => false,
            InputState::Dragging { start_positions, .. } => {
                for (id, start) in start_positions {
                    if let Some(el) = doc.get_mut(&id) {
                        el.position = start;
                    }
                }
                debug!("drag cancelled");
                true
            }
            InputState::Resizing { id, start_rect, .. } => {
                if let Some(el) = doc.get_mut(&id) {
                    el.set_rect(start_rect);
                }
                debug!(%id, "resize cancelled");
                true
            }
            InputState::MarqueeSelecting { .. } => true,
        }
    }

    // --- Commands ---

    /// Append `elements`, fitted to the page, and select them.
    pub fn insert(&mut self, doc: &mut Document, mut elements: Vec<Element>) -> Vec<ElementId> {
        self.fit_all(&mut elements);
        let mut ids = Vec::with_capacity(elements.len());
        for el in elements {
            ids.push(doc.push(el));
        }
        if !ids.is_empty() {
            self.selection.clone_from(&ids);
        }
        ids
    }

    /// Give `el` a drawable size and clamp it onto the page.
    ///
    /// Non-positive or non-finite dimensions become the minimum element size;
    /// small positive ones (a 2px divider) are kept. Returns whether the size
    /// had to be repaired.
    pub fn fit(&self, el: &mut Element) -> bool {
        let usable = |v: f64| if v.is_finite() && v > 0.0 { v } else { self.min_element_size };
        let size = Size::new(usable(el.size.width), usable(el.size.height));
        let repaired = size != el.size;
        el.set_rect(geometry::clamp(&Rect::from_parts(el.position, size), self.canvas));
        repaired
    }

    /// Fit every element of an externally supplied list, logging each size
    /// repair. Returns how many sizes were repaired.
    pub fn fit_all(&self, elements: &mut [Element]) -> usize {
        let mut repaired = 0;
        for el in &mut *elements {
            let original = el.size;
            if self.fit(el) {
                warn!(id = %el.id, ?original, size = ?el.size, "unusable element size repaired");
                repaired += 1;
            }
        }
        repaired
    }

    /// Raise `id` above everything else (`max z + 1`).
    pub fn bring_to_front(&mut self, doc: &mut Document, id: ElementId) -> bool {
        if !doc.contains(&id) {
            return false;
        }
        let Some((_, mut max)) = doc.z_range() else {
            return false;
        };
        if max >= Z_INDEX_LIMIT {
            doc.normalize_z();
            max = doc.z_range().map_or(0, |(_, hi)| hi);
        }
        if let Some(el) = doc.get_mut(&id) {
            el.style.z_index = max + 1;
        }
        true
    }

    /// Lower `id` beneath everything else (`min z - 1`).
    pub fn send_to_back(&mut self, doc: &mut Document, id: ElementId) -> bool {
        if !doc.contains(&id) {
            return false;
        }
        let Some((mut min, _)) = doc.z_range() else {
            return false;
        };
        if min <= -Z_INDEX_LIMIT {
            doc.normalize_z();
            min = doc.z_range().map_or(0, |(lo, _)| lo);
        }
        if let Some(el) = doc.get_mut(&id) {
            el.style.z_index = min - 1;
        }
        true
    }

    /// Move each selected element to a page edge or center on one axis.
    /// Elements align to the page independently, not to each other.
    pub fn align(&mut self, doc: &mut Document, mode: AlignMode) -> bool {
        let canvas = self.canvas;
        let mut changed = false;
        for id in &self.selection {
            let Some(el) = doc.get_mut(id).filter(|el| !el.locked) else {
                continue;
            };
            let mut rect = el.rect();
            match mode {
                AlignMode::Left => rect.x = 0.0,
                AlignMode::Center => rect.x = (canvas.width - rect.width) / 2.0,
                AlignMode::Right => rect.x = canvas.width - rect.width,
                AlignMode::Top => rect.y = 0.0,
                AlignMode::Middle => rect.y = (canvas.height - rect.height) / 2.0,
                AlignMode::Bottom => rect.y = canvas.height - rect.height,
            }
            let rect = geometry::clamp(&rect, canvas);
            if el.position != rect.position() {
                el.position = rect.position();
                changed = true;
            }
        }
        changed
    }

    /// Remove every selected element and clear the selection.
    pub fn delete_selected(&mut self, doc: &mut Document) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let removed = doc.remove_all(&self.selection);
        self.selection.clear();
        debug!(removed, "deleted selection");
        removed > 0
    }

    /// Copy every selected element with a fresh id and offset, then select
    /// the copies.
    pub fn duplicate_selected(&mut self, doc: &mut Document) -> bool {
        let offset = Point::new(self.duplicate_offset, self.duplicate_offset);
        let copies: Vec<Element> = doc
            .elements()
            .iter()
            .filter(|el| self.selection.contains(&el.id))
            .map(|el| el.copy_with_offset(offset))
            .collect();
        if copies.is_empty() {
            return false;
        }
        let ids = self.insert(doc, copies);
        debug!(count = ids.len(), "duplicated selection");
        true
    }

    pub fn update_style(&mut self, doc: &mut Document, id: ElementId, patch: &StylePatch) -> bool {
        doc.get_mut(&id).is_some_and(|el| patch.apply(&mut el.style))
    }

    /// Replace `id`'s content. Content of a different kind is ignored.
    pub fn update_content(&mut self, doc: &mut Document, id: ElementId, content: Content) -> bool {
        let Some(el) = doc.get_mut(&id) else {
            return false;
        };
        if el.kind() != content.kind() {
            debug!(%id, current = %el.kind(), requested = %content.kind(), "content kind mismatch; ignored");
            return false;
        }
        if el.content == content {
            return false;
        }
        el.content = content;
        true
    }

    pub fn set_locked(&mut self, doc: &mut Document, id: ElementId, locked: bool) -> bool {
        let Some(el) = doc.get_mut(&id) else {
            return false;
        };
        if el.locked == locked {
            return false;
        }
        el.locked = locked;
        true
    }

    /// Advance `id`'s rotation by one 90° step.
    pub fn rotate(&mut self, doc: &mut Document, id: ElementId) -> bool {
        let Some(el) = doc.get_mut(&id) else {
            return false;
        };
        el.rotation = (el.rotation + ROTATION_STEP_DEG).rem_euclid(360.0);
        true
    }
}

/// Rectangle produced by dragging `handle` of `start` by `delta`.
///
/// The edge opposite the handle stays fixed; width and height never drop
/// below `min_size` and never extend past the page.
#[must_use]
pub fn resize_rect(start: &Rect, handle: ResizeHandle, delta: Point, min_size: f64, canvas: Size) -> Rect {
    let (mut x, mut width) = (start.x, start.width);
    if handle.moves_right() {
        let max_w = (canvas.width - start.x).max(min_size);
        width = (start.width + delta.x).max(min_size).min(max_w);
    } else if handle.moves_left() {
        let right = start.right();
        width = (start.width - delta.x).max(min_size).min(right.max(min_size));
        x = right - width;
    }

    let (mut y, mut height) = (start.y, start.height);
    if handle.moves_bottom() {
        let max_h = (canvas.height - start.y).max(min_size);
        height = (start.height + delta.y).max(min_size).min(max_h);
    } else if handle.moves_top() {
        let bottom = start.bottom();
        height = (start.height - delta.y).max(min_size).min(bottom.max(min_size));
        y = bottom - height;
    }

    geometry::clamp(&Rect::new(x, y, width, height), canvas)
}
