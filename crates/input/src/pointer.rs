use crate::action::Action;
use glam::Vec2;
use std::time::{Duration, Instant};

/// Longest gap between the two presses of a double-click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Furthest the pointer may travel between the two presses, in pixels.
pub const DOUBLE_CLICK_SLOP: f32 = 6.0;

/// Detects double-clicks from a stream of primary-button presses.
#[derive(Debug, Clone, Default)]
pub struct DoubleClickDetector {
    last: Option<(Instant, Vec2)>,
}

impl DoubleClickDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press at `pos`; returns true if it completes a double-click.
    pub fn press(&mut self, now: Instant, pos: Vec2) -> bool {
        match self.last.take() {
            Some((at, first))
                if now.saturating_duration_since(at) <= DOUBLE_CLICK_WINDOW
                    && first.distance(pos) <= DOUBLE_CLICK_SLOP =>
            {
                true
            }
            _ => {
                self.last = Some((now, pos));
                false
            }
        }
    }
}

/// Pointer state: cursor position, primary-button drag and double-click.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    cursor: Vec2,
    dragging: bool,
    clicks: DoubleClickDetector,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Primary button pressed or released at the current cursor.
    pub fn primary(&mut self, pressed: bool, now: Instant) -> Action {
        self.dragging = pressed;
        if pressed && self.clicks.press(now, self.cursor) {
            tracing::debug!(x = self.cursor.x, y = self.cursor.y, "double-click");
            return Action::ToggleFullscreen;
        }
        Action::Noop
    }

    /// Cursor moved to `pos`; orbits while the primary button is held.
    pub fn moved(&mut self, pos: Vec2) -> Action {
        let delta = pos - self.cursor;
        self.cursor = pos;
        if self.dragging && delta != Vec2::ZERO {
            Action::Orbit(delta)
        } else {
            Action::Noop
        }
    }

    /// Wheel scrolled by `lines`; positive scrolls away from the user.
    pub fn wheel(&mut self, lines: f32) -> Action {
        if lines == 0.0 {
            Action::Noop
        } else {
            Action::Zoom(lines)
        }
    }

    /// The pointer left the window or input was captured elsewhere.
    pub fn cancel(&mut self) {
        self.dragging = false;
    }

    /// Cursor moved to `pos` over UI that captured the event. Tracks the
    /// position so the next canvas move yields no jump, and ends any drag.
    pub fn captured_move(&mut self, pos: Vec2) {
        self.cursor = pos;
        self.dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_quick_presses_double_click() {
        let t0 = Instant::now();
        let mut d = DoubleClickDetector::new();
        assert!(!d.press(t0, Vec2::new(10.0, 10.0)));
        assert!(d.press(t0 + Duration::from_millis(250), Vec2::new(12.0, 11.0)));
    }

    #[test]
    fn slow_or_distant_presses_do_not() {
        let t0 = Instant::now();
        let mut d = DoubleClickDetector::new();
        assert!(!d.press(t0, Vec2::ZERO));
        assert!(!d.press(t0 + Duration::from_millis(500), Vec2::ZERO));
        // The slow press became the new first press.
        assert!(!d.press(t0 + Duration::from_millis(600), Vec2::new(20.0, 0.0)));
    }

    #[test]
    fn triple_press_starts_new_pair() {
        let t0 = Instant::now();
        let mut d = DoubleClickDetector::new();
        assert!(!d.press(t0, Vec2::ZERO));
        assert!(d.press(t0 + Duration::from_millis(100), Vec2::ZERO));
        assert!(!d.press(t0 + Duration::from_millis(200), Vec2::ZERO));
        assert!(d.press(t0 + Duration::from_millis(300), Vec2::ZERO));
    }

    #[test]
    fn drag_orbits_only_while_held() {
        let t0 = Instant::now();
        let mut p = PointerState::new();
        assert_eq!(p.moved(Vec2::new(5.0, 5.0)), Action::Noop);
        p.primary(true, t0);
        assert_eq!(p.moved(Vec2::new(8.0, 3.0)), Action::Orbit(Vec2::new(3.0, -2.0)));
        p.primary(false, t0);
        assert_eq!(p.moved(Vec2::new(9.0, 3.0)), Action::Noop);
    }

    #[test]
    fn release_lost_to_ui_does_not_keep_orbiting() {
        let t0 = Instant::now();
        let mut p = PointerState::new();
        p.moved(Vec2::new(10.0, 10.0));
        p.primary(true, t0);
        assert!(p.is_dragging());
        // Button released over the panel: the release never reaches us.
        p.cancel();
        assert!(!p.is_dragging());
        assert_eq!(p.moved(Vec2::new(40.0, 10.0)), Action::Noop);
    }

    #[test]
    fn captured_move_tracks_cursor_without_orbit() {
        let t0 = Instant::now();
        let mut p = PointerState::new();
        p.primary(true, t0);
        p.captured_move(Vec2::new(200.0, 50.0));
        assert_eq!(p.cursor(), Vec2::new(200.0, 50.0));
        assert_eq!(p.moved(Vec2::new(201.0, 50.0)), Action::Noop);
    }

    #[test]
    fn double_press_toggles_fullscreen() {
        let t0 = Instant::now();
        let mut p = PointerState::new();
        assert_eq!(p.primary(true, t0), Action::Noop);
        p.primary(false, t0);
        assert_eq!(
            p.primary(true, t0 + Duration::from_millis(200)),
            Action::ToggleFullscreen
        );
    }

    #[test]
    fn wheel_zooms() {
        let mut p = PointerState::new();
        assert_eq!(p.wheel(1.5), Action::Zoom(1.5));
        assert_eq!(p.wheel(0.0), Action::Noop);
    }
}
