//! Editor configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use crate::consts::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DUPLICATE_OFFSET_PX, HISTORY_CAPACITY, MIN_ELEMENT_SIZE, PASTE_OFFSET_PX,
    SNAP_THRESHOLD_PX,
};
use crate::geometry::Size;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Optional editor behaviors. One controller covers every editor variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Additive selection, marquee selection, and select-all.
    pub multi_select: bool,
    /// Snap the primary dragged element to guide lines.
    pub snapping: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { multi_select: true, snapping: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub canvas: Size,
    pub snap_threshold: f64,
    pub history_capacity: usize,
    pub min_element_size: f64,
    pub paste_offset: f64,
    pub duplicate_offset: f64,
    pub capabilities: Capabilities,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: Size::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            snap_threshold: SNAP_THRESHOLD_PX,
            history_capacity: HISTORY_CAPACITY,
            min_element_size: MIN_ELEMENT_SIZE,
            paste_offset: PASTE_OFFSET_PX,
            duplicate_offset: DUPLICATE_OFFSET_PX,
            capabilities: Capabilities::default(),
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables. Every variable is optional:
    ///
    /// - `CANVAS_WIDTH`, `CANVAS_HEIGHT`: page size in pixels (794 × 1123)
    /// - `SNAP_THRESHOLD_PX`: default 5
    /// - `HISTORY_CAPACITY`: default 50
    /// - `MIN_ELEMENT_SIZE`: default 20
    /// - `PASTE_OFFSET_PX`, `DUPLICATE_OFFSET_PX`: default 20
    /// - `MULTI_SELECT`, `SNAPPING`: `true`/`false`, default true
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a present variable does not parse
    /// or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(v) => Some(v),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`EditorConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let width = positive(parse_var(&lookup, "CANVAS_WIDTH", defaults.canvas.width)?, "CANVAS_WIDTH")?;
        let height = positive(parse_var(&lookup, "CANVAS_HEIGHT", defaults.canvas.height)?, "CANVAS_HEIGHT")?;
        let min_element_size =
            positive(parse_var(&lookup, "MIN_ELEMENT_SIZE", defaults.min_element_size)?, "MIN_ELEMENT_SIZE")?;

        let snap_threshold = parse_var(&lookup, "SNAP_THRESHOLD_PX", defaults.snap_threshold)?;
        if snap_threshold < 0.0 || !snap_threshold.is_finite() {
            return Err(ConfigError::Invalid { var: "SNAP_THRESHOLD_PX", value: snap_threshold.to_string() });
        }

        let history_capacity = parse_var(&lookup, "HISTORY_CAPACITY", defaults.history_capacity)?;
        if history_capacity == 0 {
            return Err(ConfigError::Invalid { var: "HISTORY_CAPACITY", value: "0".into() });
        }

        Ok(Self {
            canvas: Size::new(width, height),
            snap_threshold,
            history_capacity,
            min_element_size,
            paste_offset: parse_var(&lookup, "PASTE_OFFSET_PX", defaults.paste_offset)?,
            duplicate_offset: parse_var(&lookup, "DUPLICATE_OFFSET_PX", defaults.duplicate_offset)?,
            capabilities: Capabilities {
                multi_select: parse_flag(&lookup, "MULTI_SELECT", defaults.capabilities.multi_select)?,
                snapping: parse_flag(&lookup, "SNAPPING", defaults.capabilities.snapping)?,
            },
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value: raw }),
    }
}

fn positive(value: f64, var: &'static str) -> Result<f64, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid { var, value: value.to_string() })
    }
}
