//! Scene Graph: one box mesh, its geometry resources, a camera with orbit controls,
//! the viewport and the per-frame animation state.
//!
//! # Invariants
//! - A geometry resource has exactly one owner; replacing it releases the old one first.
//! - The scene never touches the GPU; backends mirror the geometry store's event log.
//! - Rotation effects (auto-rotate, spin tweens) are additive.

mod camera;
mod clock;
mod controls;
mod geometry;
mod mesh;
mod scene;
mod store;
mod tween;
mod viewport;

pub use camera::PerspectiveCamera;
pub use clock::Clock;
pub use controls::OrbitControls;
pub use geometry::{BoxGeometry, GeometryVertex, MeshData};
pub use mesh::{BasicMaterial, Mesh};
pub use scene::{AUTO_ROTATE_SPEED, Scene, SceneParams, spin};
pub use store::{Geometry, GeometryEvent, GeometryHandle, GeometryId, GeometryStore};
pub use tween::{Ease, Tween, TweenQueue};
pub use viewport::{MAX_PIXEL_RATIO, Viewport};
