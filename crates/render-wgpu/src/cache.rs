use bytemuck::{Pod, Zeroable};
use cubelab_scene::{GeometryEvent, GeometryId, GeometryStore, MeshData};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// What a batch of geometry events means for the GPU.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometrySync {
    /// Buffers to destroy, in event order.
    pub release: Vec<GeometryId>,
    /// Geometries to upload, in event order.
    pub upload: Vec<GeometryId>,
}

/// Collapse an event batch: a geometry allocated and released within the
/// same batch is never uploaded.
pub fn plan_sync(events: &[GeometryEvent]) -> GeometrySync {
    let mut plan = GeometrySync::default();
    for event in events {
        match event {
            GeometryEvent::Allocated { id, .. } => plan.upload.push(*id),
            GeometryEvent::Released { id } => {
                if let Some(pos) = plan.upload.iter().position(|u| u == id) {
                    plan.upload.remove(pos);
                } else {
                    plan.release.push(*id);
                }
            }
        }
    }
    plan
}

/// GPU buffers for one geometry resource.
pub(crate) struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub line_buffer: wgpu::Buffer,
    pub line_count: u32,
}

impl GpuGeometry {
    fn upload(device: &wgpu::Device, id: GeometryId, data: &MeshData) -> Self {
        let vertices: Vec<Vertex> = data
            .vertices
            .iter()
            .map(|v| Vertex {
                position: v.position,
                normal: v.normal,
                uv: v.uv,
            })
            .collect();
        let lines = data.wireframe_indices();
        let label = format!("{id}");
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_triangles")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let line_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_lines")),
            contents: bytemuck::cast_slice(&lines),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            line_buffer,
            line_count: lines.len() as u32,
        }
    }

    fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.line_buffer.destroy();
    }
}

/// Mirror of the geometry store on the GPU.
#[derive(Default)]
pub(crate) struct GeometryCache {
    entries: BTreeMap<GeometryId, GpuGeometry>,
}

impl GeometryCache {
    /// Drain the store's events and apply them: destroy released buffers,
    /// then upload new geometry.
    pub fn sync(&mut self, device: &wgpu::Device, store: &mut GeometryStore) {
        let events = store.drain_events();
        if events.is_empty() {
            return;
        }
        let plan = plan_sync(&events);
        for id in plan.release {
            if let Some(gpu) = self.entries.remove(&id) {
                gpu.destroy();
                tracing::debug!(%id, "gpu geometry destroyed");
            }
        }
        for id in plan.upload {
            let Some(geometry) = store.get_by_id(id) else {
                continue;
            };
            let gpu = GpuGeometry::upload(device, id, &geometry.data);
            tracing::debug!(%id, triangles = gpu.index_count / 3, "gpu geometry uploaded");
            self.entries.insert(id, gpu);
        }
    }

    pub fn get(&self, id: GeometryId) -> Option<&GpuGeometry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubelab_scene::BoxGeometry;

    #[test]
    fn rebuild_releases_then_uploads() {
        let mut store = GeometryStore::new();
        let first = store.allocate(BoxGeometry::default());
        let first_id = first.id();
        let initial = plan_sync(&store.drain_events());
        assert_eq!(initial.upload, vec![first_id]);

        store.release(first);
        let second = store.allocate(BoxGeometry::cube(1.0, 3));
        let plan = plan_sync(&store.drain_events());
        assert_eq!(plan.release, vec![first_id]);
        assert_eq!(plan.upload, vec![second.id()]);
        store.release(second);
    }

    #[test]
    fn short_lived_geometry_is_skipped() {
        let mut store = GeometryStore::new();
        let a = store.allocate(BoxGeometry::default());
        store.release(a);
        let b = store.allocate(BoxGeometry::default());
        let plan = plan_sync(store.events());
        assert!(plan.release.is_empty());
        assert_eq!(plan.upload, vec![b.id()]);
        store.release(b);
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }
}
