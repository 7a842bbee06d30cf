//! Grid ↔ display coordinate mapping

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display units per grid unit, before scaling
pub const GRID_UNIT: i32 = 3;

/// Scale applied when nothing else is configured
pub const DEFAULT_SCALE: u32 = 11;

/// A cell on the editor grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Zoom factor; never zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Scale(u32);

impl Scale {
    /// Returns `None` for a zero scale
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Display units covered by one grid unit at this scale
    fn unit(self) -> i64 {
        GRID_UNIT as i64 * self.0 as i64
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self(DEFAULT_SCALE)
    }
}

impl TryFrom<u32> for Scale {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Scale::new(value).ok_or_else(|| "scale must be positive".to_string())
    }
}

impl From<Scale> for u32 {
    fn from(scale: Scale) -> Self {
        scale.0
    }
}

/// Snap a display offset to the nearest grid line.
///
/// Halves round away from zero.
pub fn to_grid(offset: i32, scale: Scale) -> i32 {
    let v = (offset as f64 / scale.unit() as f64).round();
    v.clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

/// Display offset of a grid coordinate.
///
/// Saturates at the `i64` bounds for extreme cells at extreme scales.
pub fn to_display(v: i32, scale: Scale) -> i64 {
    (v as i64).saturating_mul(scale.unit())
}

/// Map a pixel offset pair to its grid cell
pub fn pixel_to_cell(x: i32, y: i32, scale: Scale) -> GridPos {
    GridPos::new(to_grid(x, scale), to_grid(y, scale))
}

/// Display center of a grid cell
pub fn cell_to_pixel(pos: GridPos, scale: Scale) -> (i64, i64) {
    (to_display(pos.x, scale), to_display(pos.y, scale))
}
