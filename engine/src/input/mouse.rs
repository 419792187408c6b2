//! Mouse Input Module
//!
//! Pointer state for the preview viewport, decoupled from winit.

/// Scroll wheel delta, can be line-based or pixel-based.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollDelta {
    /// Horizontal scroll (positive = right)
    pub x: f32,
    /// Vertical scroll (positive = up/forward)
    pub y: f32,
}

impl ScrollDelta {
    /// Create from line delta (common for mouse wheels).
    pub fn from_lines(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create from pixel delta (common for trackpads).
    /// Normalizes by dividing by 100 to get approximate line equivalents.
    pub fn from_pixels(x: f64, y: f64) -> Self {
        Self {
            x: (x / 100.0) as f32,
            y: (y / 100.0) as f32,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Where the cursor is across the viewport. File drops in the left or right
/// quarter pick the front or back slot; anywhere else goes to the active tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    pub position: Option<(f32, f32)>,
    pub left_pressed: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Some((x, y));
    }

    pub fn clear(&mut self) {
        self.position = None;
        self.left_pressed = false;
    }

    /// Fraction of the viewport width the cursor sits at, if known.
    pub fn horizontal_fraction(&self, width: u32) -> Option<f32> {
        if width == 0 {
            return None;
        }
        self.position.map(|(x, _)| (x / width as f32).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_scroll_is_normalized() {
        let delta = ScrollDelta::from_pixels(0.0, 250.0);
        assert_eq!(delta.y, 2.5);
        assert!(!delta.is_zero());
        assert!(ScrollDelta::default().is_zero());
    }

    #[test]
    fn horizontal_fraction() {
        let mut pointer = PointerState::new();
        assert_eq!(pointer.horizontal_fraction(800), None);
        pointer.set_position(200.0, 10.0);
        assert_eq!(pointer.horizontal_fraction(800), Some(0.25));
        pointer.set_position(2000.0, 10.0);
        assert_eq!(pointer.horizontal_fraction(800), Some(1.0));
        assert_eq!(pointer.horizontal_fraction(0), None);
    }
}
