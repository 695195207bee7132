use serde::{Deserialize, Serialize};

/// Axis-aligned box in viewport coordinates (pixels, y grows downward).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_top_height(top: f64, height: f64) -> Self {
        Rect::new(0.0, top, 0.0, top + height.max(0.0))
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// True when the whole box has already scrolled past the top edge.
    pub fn is_above_viewport(&self) -> bool {
        self.bottom < 0.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    /// Y coordinate (from the top) of a line at `fraction` of the viewport height.
    pub fn line_at(&self, fraction: f64) -> f64 {
        self.height * fraction
    }
}
