use crate::camera::PerspectiveCamera;
use crate::clock::Clock;
use crate::controls::OrbitControls;
use crate::geometry::BoxGeometry;
use crate::mesh::{BasicMaterial, Mesh};
use crate::store::GeometryStore;
use crate::tween::{Ease, Tween, TweenQueue};
use crate::viewport::Viewport;
use cubelab_common::{Shared, shared};
use serde::{Deserialize, Serialize};

/// Auto-rotation rate about Y, radians per second.
pub const AUTO_ROTATE_SPEED: f32 = std::f32::consts::FRAC_PI_4;

/// Length of one spin, seconds.
const SPIN_DURATION: f32 = 1.0;

/// Everything needed to build a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub geometry: BoxGeometry,
    pub material: BasicMaterial,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            geometry: BoxGeometry::cube(1.0, 2),
            material: BasicMaterial::default(),
            camera: PerspectiveCamera::default(),
            controls: OrbitControls::default(),
            width: 800.0,
            height: 600.0,
            device_pixel_ratio: 1.0,
        }
    }
}

/// The live scene: one mesh, its geometry store, camera, controls and viewport.
///
/// The mesh, store and tween queue are shared handles so panel bindings and
/// callbacks can reach them.
#[derive(Debug)]
pub struct Scene {
    pub mesh: Shared<Mesh>,
    pub geometries: Shared<GeometryStore>,
    pub tweens: Shared<TweenQueue>,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,
    pub clock: Clock,
    frame: u64,
}

impl Scene {
    pub fn build(params: SceneParams) -> Self {
        let mut store = GeometryStore::new();
        let mesh = Mesh::new(&mut store, params.geometry, params.material);
        let mut scene = Self {
            mesh: shared(mesh),
            geometries: shared(store),
            tweens: shared(TweenQueue::new()),
            camera: params.camera,
            controls: params.controls,
            viewport: Viewport::default(),
            clock: Clock::new(),
            frame: 0,
        };
        scene.resize(params.width, params.height, params.device_pixel_ratio);
        tracing::info!(
            segments = params.geometry.width_segments,
            width = params.width,
            height = params.height,
            "scene built"
        );
        scene
    }

    /// Apply a new logical size and device pixel ratio.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport.resize(width, height, device_pixel_ratio);
        self.camera.set_aspect_from(width, height);
        tracing::debug!(width, height, pixel_ratio = self.viewport.pixel_ratio, "scene resized");
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.viewport.toggle_fullscreen()
    }

    /// Queue one additive full turn about Y.
    pub fn spin(&self) {
        spin(&self.tweens);
    }

    /// Advance one frame: animation, tweens, then controls.
    pub fn tick(&mut self, dt: f32, auto_rotate: bool) {
        let dt = self.clock.advance(dt);
        let spin = self.tweens.borrow_mut().advance(dt);
        {
            let mut mesh = self.mesh.borrow_mut();
            if auto_rotate {
                mesh.transform.rotation.y += AUTO_ROTATE_SPEED * dt;
            }
            mesh.transform.rotation.y += spin;
        }
        self.controls.update(&mut self.camera);
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Release every geometry the scene owns.
    pub fn dispose(&mut self) {
        let mut store = self.geometries.borrow_mut();
        self.mesh.borrow_mut().dispose(&mut store);
        tracing::info!(released = store.released_total(), "scene disposed");
    }
}

/// Queue a spin on a shared tween queue. Used by action bindings that hold
/// only the queue handle.
pub fn spin(tweens: &Shared<TweenQueue>) {
    tweens
        .borrow_mut()
        .push(Tween::new(std::f32::consts::TAU, SPIN_DURATION, Ease::OutQuad));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn build_allocates_one_geometry() {
        let scene = Scene::build(SceneParams::default());
        assert_eq!(scene.geometries.borrow().live_count(), 1);
        assert!(scene.mesh.borrow().geometry_id().is_some());
    }

    #[test]
    fn resize_updates_aspect_and_viewport() {
        let mut scene = Scene::build(SceneParams::default());
        scene.resize(1280.0, 720.0, 3.0);
        assert!((scene.camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(scene.viewport.size(), (1280.0, 720.0));
        assert_eq!(scene.viewport.pixel_ratio, 2.0);
    }

    #[test]
    fn auto_rotate_turns_at_fixed_rate() {
        let mut scene = Scene::build(SceneParams::default());
        for _ in 0..4 {
            scene.tick(0.5, true);
        }
        let y = scene.mesh.borrow().transform.rotation.y;
        assert!((y - AUTO_ROTATE_SPEED * 2.0).abs() < 1e-5);
        assert_eq!(scene.frame(), 4);
    }

    #[test]
    fn paused_scene_keeps_rotation() {
        let mut scene = Scene::build(SceneParams::default());
        scene.tick(1.0, false);
        assert_eq!(scene.mesh.borrow().transform.rotation.y, 0.0);
    }

    #[test]
    fn two_spins_are_additive() {
        let mut scene = Scene::build(SceneParams::default());
        scene.spin();
        scene.tick(0.25, false);
        scene.spin();
        assert_eq!(scene.tweens.borrow().len(), 2);
        for _ in 0..10 {
            scene.tick(0.2, false);
        }
        let y = scene.mesh.borrow().transform.rotation.y;
        assert!((y - 2.0 * TAU).abs() < 1e-4);
        assert!(scene.tweens.borrow().is_empty());
    }

    #[test]
    fn dispose_releases_geometry() {
        let mut scene = Scene::build(SceneParams::default());
        scene.dispose();
        assert_eq!(scene.geometries.borrow().live_count(), 0);
        assert_eq!(scene.geometries.borrow().released_total(), 1);
    }
}
