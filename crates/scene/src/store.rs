use crate::geometry::{BoxGeometry, MeshData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a geometry resource. Never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GeometryId(pub u64);

impl std::fmt::Display for GeometryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "geometry#{}", self.0)
    }
}

/// Exclusive ownership of one live geometry resource.
///
/// Not `Clone`: the only way to free the resource is to give the handle back
/// to [`GeometryStore::release`], which consumes it. A handle dropped without
/// release leaks the resource until the store itself is dropped.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "geometry must be released through GeometryStore::release"]
pub struct GeometryHandle {
    id: GeometryId,
}

impl GeometryHandle {
    pub fn id(&self) -> GeometryId {
        self.id
    }
}

/// A live geometry resource: its parameters and the generated buffers.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub params: BoxGeometry,
    pub data: MeshData,
}

/// Lifecycle record for geometry resources, mirrored by GPU backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryEvent {
    Allocated { id: GeometryId, params: BoxGeometry },
    Released { id: GeometryId },
}

/// Owner of every geometry resource in the scene.
#[derive(Debug, Default)]
pub struct GeometryStore {
    live: BTreeMap<GeometryId, Geometry>,
    next_id: u64,
    released: u64,
    event_log: Vec<GeometryEvent>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the geometry for `params` and hand out its sole owner handle.
    pub fn allocate(&mut self, params: BoxGeometry) -> GeometryHandle {
        self.next_id += 1;
        let id = GeometryId(self.next_id);
        let data = params.build();
        tracing::debug!(
            %id,
            vertices = data.vertex_count(),
            triangles = data.triangle_count(),
            "geometry allocated"
        );
        self.live.insert(id, Geometry { params, data });
        self.event_log.push(GeometryEvent::Allocated { id, params });
        GeometryHandle { id }
    }

    /// Free the resource owned by `handle`.
    ///
    /// Returns `None` only for a handle minted by a different store.
    pub fn release(&mut self, handle: GeometryHandle) -> Option<Geometry> {
        let geometry = self.live.remove(&handle.id)?;
        self.released += 1;
        tracing::debug!(id = %handle.id, "geometry released");
        self.event_log.push(GeometryEvent::Released { id: handle.id });
        Some(geometry)
    }

    pub fn get(&self, handle: &GeometryHandle) -> Option<&Geometry> {
        self.live.get(&handle.id)
    }

    pub fn get_by_id(&self, id: GeometryId) -> Option<&Geometry> {
        self.live.get(&id)
    }

    pub fn is_live(&self, id: GeometryId) -> bool {
        self.live.contains_key(&id)
    }

    /// Number of resources allocated and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of successful releases over the store's lifetime.
    pub fn released_total(&self) -> u64 {
        self.released
    }

    /// Read-only access to the pending event log.
    pub fn events(&self) -> &[GeometryEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GeometryEvent> {
        std::mem::take(&mut self.event_log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_then_release() {
        let mut store = GeometryStore::new();
        let h = store.allocate(BoxGeometry::cube(1.0, 2));
        let id = h.id();
        assert_eq!(store.live_count(), 1);
        assert!(store.get(&h).is_some());

        let g = store.release(h).unwrap();
        assert_eq!(g.params.width_segments, 2);
        assert_eq!(store.live_count(), 0);
        assert!(!store.is_live(id));
        assert_eq!(store.released_total(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = GeometryStore::new();
        let a = store.allocate(BoxGeometry::default());
        let a_id = a.id();
        store.release(a);
        let b = store.allocate(BoxGeometry::default());
        assert_ne!(a_id, b.id());
        store.release(b);
    }

    #[test]
    fn foreign_handle_is_ignored() {
        let mut a = GeometryStore::new();
        let mut b = GeometryStore::new();
        let _keep = b.allocate(BoxGeometry::default());
        let foreign = b.allocate(BoxGeometry::default());
        assert!(a.release(foreign).is_none());
        assert_eq!(a.released_total(), 0);
        assert!(a.events().is_empty());
    }

    #[test]
    fn events_are_recorded_in_order() {
        let mut store = GeometryStore::new();
        let h = store.allocate(BoxGeometry::default());
        let id = h.id();
        store.release(h);
        assert_eq!(
            store.events(),
            &[
                GeometryEvent::Allocated {
                    id,
                    params: BoxGeometry::default()
                },
                GeometryEvent::Released { id },
            ]
        );
    }

    #[test]
    fn drain_events_clears_log() {
        let mut store = GeometryStore::new();
        let _h = store.allocate(BoxGeometry::default());
        assert_eq!(store.drain_events().len(), 1);
        assert!(store.events().is_empty());
        assert_eq!(store.live_count(), 1);
    }
}
