//! Slotmap-backed reference scene

use std::any::Any;

use slotmap::SlotMap;

use crate::scene::{Mesh, MeshHandle, SceneComponent};

/// Reference implementation of [`SceneComponent`]
///
/// Owns mesh storage behind stable slotmap handles. The per-frame update
/// integrates each mesh's angular velocity, which is what drives the demo
/// cube rotation.
pub struct SimpleScene {
    meshes: SlotMap<MeshHandle, Mesh>,
    elapsed: f32,
}

impl Default for SimpleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            meshes: SlotMap::with_key(),
            elapsed: 0.0,
        }
    }

    /// Total scene time in seconds accumulated through updates
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Iterate over all meshes with their handles
    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &Mesh)> {
        self.meshes.iter()
    }
}

impl SceneComponent for SimpleScene {
    fn update(&mut self, delta: f32) {
        self.elapsed += delta;

        for mesh in self.meshes.values_mut() {
            let spin = mesh.spin;
            let rate = spin.magnitude();
            if rate > 0.0 {
                mesh.transform.rotate_axis(spin, rate * delta);
            }
        }
    }

    fn add_mesh(&mut self, mesh: Mesh) -> MeshHandle {
        log::debug!("Scene: adding mesh '{}'", mesh.name);
        self.meshes.insert(mesh)
    }

    fn remove_mesh(&mut self, handle: MeshHandle) -> Option<Mesh> {
        let removed = self.meshes.remove(handle);
        if let Some(mesh) = &removed {
            log::debug!("Scene: removed mesh '{}'", mesh.name);
        }
        removed
    }

    fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }

    fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut Mesh> {
        self.meshes.get_mut(handle)
    }

    fn mesh_handles(&self) -> Vec<MeshHandle> {
        self.meshes.keys().collect()
    }

    fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
