//! Scene management
//!
//! Defines the scene sub-system contract consumed by the orchestrator and
//! a slotmap-backed reference implementation. The scene owns mesh storage;
//! the orchestrator's `meshes` list only tracks membership, so callers add
//! to both.

mod mesh;
mod simple_scene;

pub use mesh::{Mesh, MeshHandle};
pub use simple_scene::SimpleScene;

use std::any::Any;

/// Contract for the scene sub-system slot
///
/// The orchestrator only requires the delta-time update; the mesh store
/// surface exists for tools and raycasters that walk the scene contents.
pub trait SceneComponent {
    /// Advance scene-internal state by `delta` seconds
    fn update(&mut self, delta: f32);

    /// Add a mesh to the scene, returning its handle
    fn add_mesh(&mut self, mesh: Mesh) -> MeshHandle;

    /// Remove a mesh, returning it if present
    fn remove_mesh(&mut self, handle: MeshHandle) -> Option<Mesh>;

    /// Look up a mesh by handle
    fn mesh(&self, handle: MeshHandle) -> Option<&Mesh>;

    /// Look up a mesh mutably by handle
    fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut Mesh>;

    /// Handles of all meshes currently in the scene
    fn mesh_handles(&self) -> Vec<MeshHandle>;

    /// Number of meshes in the scene
    fn mesh_count(&self) -> usize;

    /// Downcast to Any for type-specific access
    fn as_any(&self) -> &dyn Any;

    /// Downcast to Any for mutable type-specific access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
