use crate::camera::PerspectiveCamera;
use glam::Vec3;
use serde::{Deserialize, Serialize};

const MIN_POLAR: f32 = 1e-3;
const MAX_POLAR: f32 = std::f32::consts::PI - 1e-3;

/// Orbit controls: the camera circles its target on a sphere.
///
/// Pointer input accumulates into pending deltas; `update` applies them once
/// per frame. With damping on, only `damping_factor` of the pending delta is
/// applied per frame and the remainder decays, so motion eases out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitControls {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    #[serde(skip)]
    pending_theta: f32,
    #[serde(skip)]
    pending_phi: f32,
    #[serde(skip, default = "unit_scale")]
    pending_scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.1,
            max_distance: 50.0,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        }
    }
}

fn unit_scale() -> f32 {
    1.0
}

impl OrbitControls {
    /// Queue a rotation from a pointer drag of `(dx, dy)` pixels on a
    /// viewport `height` pixels tall. A full-height drag turns half a circle.
    pub fn rotate(&mut self, dx: f32, dy: f32, height: f32) {
        if height <= 0.0 {
            return;
        }
        let k = std::f32::consts::TAU * self.rotate_speed / height;
        self.pending_theta -= dx * k;
        self.pending_phi -= dy * k;
    }

    /// Queue a zoom step. Positive `steps` move the camera closer.
    pub fn zoom(&mut self, steps: f32) {
        self.pending_scale *= 0.95_f32.powf(steps * self.zoom_speed);
    }

    /// True while queued motion is still being applied.
    pub fn is_moving(&self) -> bool {
        self.pending_theta.abs() > 1e-5
            || self.pending_phi.abs() > 1e-5
            || (self.pending_scale - 1.0).abs() > 1e-5
    }

    /// Move `camera` by the pending deltas.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let (apply, keep) = if self.enable_damping {
            (self.damping_factor, 1.0 - self.damping_factor)
        } else {
            (1.0, 0.0)
        };
        theta += self.pending_theta * apply;
        phi = (phi + self.pending_phi * apply).clamp(MIN_POLAR, MAX_POLAR);
        let scale = 1.0 + (self.pending_scale - 1.0) * apply;
        let radius = (radius * scale).clamp(self.min_distance, self.max_distance);

        camera.position = camera.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );

        self.pending_theta *= keep;
        self.pending_phi *= keep;
        self.pending_scale = 1.0 + (self.pending_scale - 1.0) * keep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_update_keeps_camera() {
        let mut cam = PerspectiveCamera::default();
        let start = cam.position;
        let mut controls = OrbitControls::default();
        controls.update(&mut cam);
        assert!((cam.position - start).length() < 1e-5);
    }

    #[test]
    fn rotation_preserves_distance() {
        let mut cam = PerspectiveCamera::default();
        let r = cam.position.length();
        let mut controls = OrbitControls::default();
        controls.rotate(120.0, 40.0, 600.0);
        for _ in 0..10 {
            controls.update(&mut cam);
        }
        assert!((cam.position.length() - r).abs() < 1e-4);
        assert!(controls.is_moving());
    }

    #[test]
    fn damping_eases_out() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        controls.rotate(300.0, 0.0, 600.0);
        let mut prev = cam.position;
        let mut steps = Vec::new();
        for _ in 0..5 {
            controls.update(&mut cam);
            steps.push((cam.position - prev).length());
            prev = cam.position;
        }
        assert!(steps.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn undamped_applies_at_once() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..OrbitControls::default()
        };
        controls.zoom(3.0);
        controls.update(&mut cam);
        assert!(!controls.is_moving());
        assert!(cam.position.length() < PerspectiveCamera::default().position.length());
    }

    #[test]
    fn zoom_respects_limits() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..OrbitControls::default()
        };
        controls.zoom(-500.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - controls.max_distance).abs() < 1e-3);
    }
}
