//! Shared numeric constants for the canvas crate.

// ── Page ────────────────────────────────────────────────────────

/// Logical A4 page width at 96 dpi, in canvas pixels.
pub const CANVAS_WIDTH: f64 = 794.0;

/// Logical A4 page height at 96 dpi, in canvas pixels.
pub const CANVAS_HEIGHT: f64 = 1123.0;

// ── Manipulation ────────────────────────────────────────────────

/// Smallest width or height a resize gesture may produce.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Distance in pixels within which a dragged element snaps to a guide line.
pub const SNAP_THRESHOLD_PX: f64 = 5.0;

/// Offset applied to pasted elements on both axes.
pub const PASTE_OFFSET_PX: f64 = 20.0;

/// Offset applied to duplicated elements on both axes.
pub const DUPLICATE_OFFSET_PX: f64 = 20.0;

/// Rotation step applied by a single rotate command, in degrees.
pub const ROTATION_STEP_DEG: f64 = 90.0;

// ── History ─────────────────────────────────────────────────────

/// Number of document snapshots retained for undo/redo.
pub const HISTORY_CAPACITY: usize = 50;

// ── Z-order ─────────────────────────────────────────────────────

/// Largest z-index magnitude tolerated before z-indices are renormalized.
pub const Z_INDEX_LIMIT: i64 = 1_000_000;

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop in pixels around a resize handle's anchor point.
pub const HANDLE_RADIUS_PX: f64 = 8.0;
