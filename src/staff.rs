//! # Staff Geometry
//!
//! Pure layout math for one staff: spacing derived from the viewport, the vertical
//! position of each slot, and which ledger lines a note needs.
//!
//! Slots follow [`crate::note_space`]: 0..=16 from the bottom, with the five staff
//! lines at 4, 6, 8, 10 and 12. Ledger lines are drawn on the even slots outside the
//! staff (0, 2 below and 14, 16 above).

use serde::Serialize;

use crate::note_space::TOP_SLOT;

pub const STAFF_LINES: [u8; 5] = [4, 6, 8, 10, 12];
pub const BOTTOM_LINE: u8 = 4;
pub const TOP_LINE: u8 = 12;
pub const LOWEST_SLOT: u8 = 0;
pub const HIGHEST_SLOT: u8 = TOP_SLOT;

/// Share of the viewport height the 16 diatonic steps may use
pub const USABLE_HEIGHT_FRACTION: f64 = 0.8;
pub const DIATONIC_STEPS: f64 = 16.0;

/// Margins in line spacings: room for the clef on the left, a little air on the right
const LEFT_MARGIN_LINES: f64 = 3.0;
const RIGHT_MARGIN_LINES: f64 = 1.0;

/// Drawable area in points, with the device pixel ratio used for snapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMetrics {
    /// Distance between adjacent slots (line to space)
    pub step_spacing: f64,
    /// Distance between adjacent staff lines
    pub line_spacing: f64,
    pub left_margin: f64,
    pub right_margin: f64,
}

fn round_to_pixel(value: f64, scale: f64) -> f64 {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    (value * scale).round() / scale
}

/// Spacing for a viewport.
///
/// # Example
/// ```
/// use sightread::staff::{metrics, Viewport};
///
/// let m = metrics(Viewport::new(800.0, 400.0));
/// assert_eq!(m.step_spacing, 20.0);
/// assert_eq!(m.line_spacing, 40.0);
/// ```
pub fn metrics(viewport: Viewport) -> StaffMetrics {
    let height = viewport.height.max(0.0);
    let step_spacing = round_to_pixel(height * USABLE_HEIGHT_FRACTION / DIATONIC_STEPS, viewport.scale);
    let line_spacing = step_spacing * 2.0;
    StaffMetrics {
        step_spacing,
        line_spacing,
        left_margin: round_to_pixel(line_spacing * LEFT_MARGIN_LINES, viewport.scale),
        right_margin: round_to_pixel(line_spacing * RIGHT_MARGIN_LINES, viewport.scale),
    }
}

/// Vertical centre of a slot, measured from the top; the middle line sits at mid-height
pub fn slot_y(index: u8, metrics: &StaffMetrics, viewport: Viewport) -> f64 {
    let middle = (BOTTOM_LINE + TOP_LINE) as f64 / 2.0;
    viewport.height / 2.0 + (middle - index as f64) * metrics.step_spacing
}

/// Slot whose centre is closest to `y`, clamped to the staff's slot range
pub fn slot_at(y: f64, metrics: &StaffMetrics, viewport: Viewport) -> u8 {
    if metrics.step_spacing <= 0.0 || !y.is_finite() {
        return (BOTTOM_LINE + TOP_LINE) / 2;
    }
    let middle = (BOTTOM_LINE + TOP_LINE) as f64 / 2.0;
    let index = middle - (y - viewport.height / 2.0) / metrics.step_spacing;
    index.round().clamp(LOWEST_SLOT as f64, HIGHEST_SLOT as f64) as u8
}

pub fn is_on_line(index: u8) -> bool {
    index % 2 == 0
}

/// Ledger lines a note at `note_index` needs, nearest to the staff first.
///
/// Slots 3 and 13 hang just outside the staff and need none.
///
/// # Example
/// ```
/// use sightread::staff::ledger_line_indices;
///
/// assert_eq!(ledger_line_indices(0), vec![2, 0]);
/// assert_eq!(ledger_line_indices(16), vec![14, 16]);
/// assert!(ledger_line_indices(8).is_empty());
/// ```
pub fn ledger_line_indices(note_index: u8) -> Vec<u8> {
    if note_index < BOTTOM_LINE {
        if note_index == BOTTOM_LINE - 1 {
            return Vec::new();
        }
        // round up to even parity, never below the lowest slot
        let lowest = (note_index + note_index % 2).max(LOWEST_SLOT);
        (lowest..=BOTTOM_LINE - 2).rev().step_by(2).collect()
    } else if note_index > TOP_LINE {
        if note_index == TOP_LINE + 1 {
            return Vec::new();
        }
        let highest = (note_index - note_index % 2).min(HIGHEST_SLOT);
        (TOP_LINE + 2..=highest).step_by(2).collect()
    } else {
        Vec::new()
    }
}
