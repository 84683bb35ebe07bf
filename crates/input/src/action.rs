use glam::Vec2;

/// A high-level viewer action produced from keyboard or pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Show or hide the debug panel.
    TogglePanel,
    /// Enter or leave fullscreen.
    ToggleFullscreen,
    /// Leave fullscreen if active.
    ExitFullscreen,
    /// Orbit the camera by a pointer delta in physical pixels.
    Orbit(Vec2),
    /// Zoom by wheel steps; positive moves closer.
    Zoom(f32),
    /// Input with no binding.
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::Noop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_detection() {
        assert!(Action::Noop.is_noop());
        assert!(!Action::TogglePanel.is_noop());
        assert!(!Action::Orbit(Vec2::ONE).is_noop());
    }
}
