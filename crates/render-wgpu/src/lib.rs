//! wgpu render backend for the cube scene.
//!
//! Draws the scene's single mesh with an unlit shader, as filled triangles or
//! as a line-list wireframe.
//!
//! # Invariants
//! - The renderer never mutates scene state; it only drains the geometry event log.
//! - GPU buffers for a geometry live exactly as long as the geometry is live in the store.

mod cache;
mod gpu;
mod shaders;

pub use cache::{GeometrySync, plan_sync};
pub use gpu::MeshRenderer;
