use serde::{Deserialize, Serialize};

/// Upper bound on the device pixel ratio used for the drawing buffer.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Logical window size, effective pixel ratio and fullscreen state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    fullscreen: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            pixel_ratio: 1.0,
            fullscreen: false,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        let mut viewport = Self::default();
        viewport.resize(width, height, device_pixel_ratio);
        viewport
    }

    /// Apply a new logical size. The pixel ratio is capped at [`MAX_PIXEL_RATIO`].
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.pixel_ratio = if device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Width over height, or `None` for a collapsed viewport.
    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }

    /// Physical size of the drawing buffer, at least 1x1.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).round() as u32;
        let h = (self.height * self.pixel_ratio).round() as u32;
        (w.max(1), h.max(1))
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Flip fullscreen; returns the new state.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        tracing::info!(fullscreen = self.fullscreen, "fullscreen toggled");
        self.fullscreen
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        let v = Viewport::new(800.0, 600.0, 3.0);
        assert_eq!(v.pixel_ratio, 2.0);
        assert_eq!(v.drawing_buffer_size(), (1600, 1200));
        let v = Viewport::new(800.0, 600.0, 1.25);
        assert_eq!(v.pixel_ratio, 1.25);
        assert_eq!(v.drawing_buffer_size(), (1000, 750));
    }

    #[test]
    fn collapsed_viewport_has_no_aspect() {
        let v = Viewport::new(800.0, 0.0, 1.0);
        assert!(v.aspect().is_none());
        assert_eq!(v.drawing_buffer_size(), (800, 1));
    }

    #[test]
    fn fullscreen_toggles() {
        let mut v = Viewport::default();
        assert!(v.toggle_fullscreen());
        assert!(v.is_fullscreen());
        assert!(!v.toggle_fullscreen());
    }
}
