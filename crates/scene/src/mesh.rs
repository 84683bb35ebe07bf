use crate::geometry::BoxGeometry;
use crate::store::{GeometryHandle, GeometryId, GeometryStore};
use cubelab_common::{Color, Transform};
use cubelab_panel::{FieldValue, PanelError, Tweakable};
use serde::{Deserialize, Serialize};

/// Unlit material: a flat base colour, optionally drawn as wireframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicMaterial {
    pub color: Color,
    pub wireframe: bool,
}

impl Default for BasicMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            wireframe: false,
        }
    }
}

/// A renderable object: transform, visibility, one owned geometry, one material.
#[derive(Debug)]
pub struct Mesh {
    pub transform: Transform,
    pub visible: bool,
    pub material: BasicMaterial,
    geometry: Option<GeometryHandle>,
}

impl Mesh {
    /// Allocate geometry for `params` in `store` and wrap it in a mesh.
    pub fn new(store: &mut GeometryStore, params: BoxGeometry, material: BasicMaterial) -> Self {
        Self {
            transform: Transform::default(),
            visible: true,
            material,
            geometry: Some(store.allocate(params)),
        }
    }

    /// Id of the current geometry, if the mesh has not been disposed.
    pub fn geometry_id(&self) -> Option<GeometryId> {
        self.geometry.as_ref().map(GeometryHandle::id)
    }

    /// Release the current geometry, then allocate and install a new one.
    ///
    /// At no point does the mesh own two live geometries.
    pub fn replace_geometry(
        &mut self,
        store: &mut GeometryStore,
        params: BoxGeometry,
    ) -> GeometryId {
        let old = self.geometry.take().map(|h| release(store, h));
        let handle = store.allocate(params);
        let id = handle.id();
        self.geometry = Some(handle);
        tracing::info!(
            old = ?old,
            new = %id,
            segments = params.width_segments,
            "mesh geometry rebuilt"
        );
        id
    }

    /// Release the geometry. The mesh renders nothing afterwards.
    pub fn dispose(&mut self, store: &mut GeometryStore) {
        if let Some(handle) = self.geometry.take() {
            release(store, handle);
        }
    }
}

fn release(store: &mut GeometryStore, handle: GeometryHandle) -> GeometryId {
    let id = handle.id();
    if store.release(handle).is_none() {
        tracing::warn!(%id, "geometry handle not live in this store; nothing released");
    }
    id
}

fn axis(v: &glam::Vec3, name: &str) -> Option<f32> {
    match name {
        "x" => Some(v.x),
        "y" => Some(v.y),
        "z" => Some(v.z),
        _ => None,
    }
}

fn axis_mut<'a>(v: &'a mut glam::Vec3, name: &str) -> Option<&'a mut f32> {
    match name {
        "x" => Some(&mut v.x),
        "y" => Some(&mut v.y),
        "z" => Some(&mut v.z),
        _ => None,
    }
}

impl Tweakable for Mesh {
    fn field(&self, field: &str) -> Option<FieldValue> {
        match field.split_once('.') {
            Some(("position", a)) => {
                axis(&self.transform.position, a).map(|v| FieldValue::Number(v as f64))
            }
            Some(("rotation", a)) => {
                axis(&self.transform.rotation, a).map(|v| FieldValue::Number(v as f64))
            }
            Some(("material", "wireframe")) => Some(FieldValue::Bool(self.material.wireframe)),
            Some(("material", "color")) => Some(FieldValue::Color(self.material.color.to_hex())),
            None if field == "visible" => Some(FieldValue::Bool(self.visible)),
            _ => None,
        }
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), PanelError> {
        match field.split_once('.') {
            Some(("position", a)) => {
                let slot = axis_mut(&mut self.transform.position, a)
                    .ok_or_else(|| PanelError::unknown(field))?;
                *slot = value.expect_number(field)? as f32;
            }
            Some(("rotation", a)) => {
                let slot = axis_mut(&mut self.transform.rotation, a)
                    .ok_or_else(|| PanelError::unknown(field))?;
                *slot = value.expect_number(field)? as f32;
            }
            Some(("material", "wireframe")) => self.material.wireframe = value.expect_bool(field)?,
            Some(("material", "color")) => {
                self.material.color = Color::from_hex(value.expect_color(field)?)?;
            }
            None if field == "visible" => self.visible = value.expect_bool(field)?,
            _ => return Err(PanelError::unknown(field)),
        }
        tracing::debug!(field, "mesh field written");
        Ok(())
    }
}
