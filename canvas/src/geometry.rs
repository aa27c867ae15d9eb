//! Pure rectangle math: intersection, clamping, and snap-line computation.
//!
//! Everything here is side-effect free. The controller feeds element
//! rectangles through these helpers while a gesture is in progress; nothing in
//! this module knows about selection or history.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};

/// A point in canvas space (top-left origin, pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Component-wise `self + delta`.
    #[must_use]
    pub fn offset(self, delta: Point) -> Point {
        Point::new(self.x + delta.x, self.y + delta.y)
    }
}

/// Width and height in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Normalized rectangle spanning two arbitrary corner points.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive point containment (edges count as inside).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }
}

/// True iff `a` and `b` overlap on both axes. Rectangles that only share an
/// edge do not intersect.
#[must_use]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    !(a.right() <= b.x || a.x >= b.right() || a.bottom() <= b.y || a.y >= b.bottom())
}

/// Shift `rect` so it lies inside a `bounds`-sized box anchored at the origin.
///
/// Size is never altered. A rectangle larger than the bounds on an axis is
/// pinned to 0 on that axis.
#[must_use]
pub fn clamp(rect: &Rect, bounds: Size) -> Rect {
    let max_x = (bounds.width - rect.width).max(0.0);
    let max_y = (bounds.height - rect.height).max(0.0);
    Rect {
        x: rect.x.max(0.0).min(max_x),
        y: rect.y.max(0.0).min(max_y),
        width: rect.width,
        height: rect.height,
    }
}

/// Smallest rectangle enclosing every input rectangle, or `None` when empty.
#[must_use]
pub fn bounding_box<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
    let mut iter = rects.into_iter();
    let first = iter.next()?;
    let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.right(), first.bottom());
    for r in iter {
        left = left.min(r.x);
        top = top.min(r.y);
        right = right.max(r.right());
        bottom = bottom.max(r.bottom());
    }
    Some(Rect::new(left, top, right - left, bottom - top))
}

// ── Snapping ────────────────────────────────────────────────────

/// Orientation of a snap line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// A vertical line at `x = offset`; snaps the x coordinate.
    Vertical,
    /// A horizontal line at `y = offset`; snaps the y coordinate.
    Horizontal,
}

/// Where a snap line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum SnapSource {
    Canvas,
    Element(ElementId),
}

/// A candidate guide line a dragged element can snap to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapLine {
    pub axis: Axis,
    pub offset: f64,
    pub source: SnapSource,
}

/// Result of snapping a point: the adjusted point and the lines that won.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapMatch {
    pub point: Point,
    pub vertical: Option<SnapLine>,
    pub horizontal: Option<SnapLine>,
}

/// Every guide line for `elements` not listed in `exclude`.
///
/// Canvas center lines come first, then each element in list order
/// contributes left/center/right verticals and top/center/bottom horizontals.
#[must_use]
pub fn candidate_snap_lines(elements: &[Element], exclude: &[ElementId], canvas: Size) -> Vec<SnapLine> {
    let mut lines = vec![
        SnapLine { axis: Axis::Vertical, offset: canvas.width / 2.0, source: SnapSource::Canvas },
        SnapLine { axis: Axis::Horizontal, offset: canvas.height / 2.0, source: SnapSource::Canvas },
    ];

    for el in elements.iter().filter(|el| !exclude.contains(&el.id)) {
        let r = el.rect();
        let source = SnapSource::Element(el.id);
        let center = r.center();
        for offset in [r.x, center.x, r.right()] {
            lines.push(SnapLine { axis: Axis::Vertical, offset, source });
        }
        for offset in [r.y, center.y, r.bottom()] {
            lines.push(SnapLine { axis: Axis::Horizontal, offset, source });
        }
    }
    lines
}

/// Snap each axis of `point` independently to the first line within
/// `threshold`, reporting which lines matched.
#[must_use]
pub fn snap_match(point: Point, lines: &[SnapLine], threshold: f64) -> SnapMatch {
    let first_within = |axis: Axis, coord: f64| {
        lines
            .iter()
            .find(|line| line.axis == axis && (coord - line.offset).abs() <= threshold)
            .copied()
    };

    let vertical = first_within(Axis::Vertical, point.x);
    let horizontal = first_within(Axis::Horizontal, point.y);
    SnapMatch {
        point: Point::new(
            vertical.map_or(point.x, |l| l.offset),
            horizontal.map_or(point.y, |l| l.offset),
        ),
        vertical,
        horizontal,
    }
}

/// Snap `rect` so an edge or its center lands on a guide line.
///
/// Per axis, lines are tried in order and, for each line, the leading edge,
/// then the center, then the trailing edge. The first within `threshold`
/// wins. The returned point is the adjusted top-left corner.
#[must_use]
pub fn snap_rect(rect: &Rect, lines: &[SnapLine], threshold: f64) -> SnapMatch {
    let first_within = |axis: Axis, start: f64, extent: f64| {
        lines.iter().filter(|line| line.axis == axis).find_map(|line| {
            [0.0, extent / 2.0, extent]
                .into_iter()
                .find(|inset| (start + inset - line.offset).abs() <= threshold)
                .map(|inset| (line.offset - inset, *line))
        })
    };

    let vertical = first_within(Axis::Vertical, rect.x, rect.width);
    let horizontal = first_within(Axis::Horizontal, rect.y, rect.height);
    SnapMatch {
        point: Point::new(vertical.map_or(rect.x, |(x, _)| x), horizontal.map_or(rect.y, |(y, _)| y)),
        vertical: vertical.map(|(_, line)| line),
        horizontal: horizontal.map(|(_, line)| line),
    }
}

/// Snap each axis of `point` independently to the first line within `threshold`.
#[must_use]
pub fn snap(point: Point, lines: &[SnapLine], threshold: f64) -> Point {
    snap_match(point, lines, threshold).point
}
