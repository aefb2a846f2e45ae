//! Picking contract and mesh raycaster
//!
//! The raycaster slot is never part of the frame update chain; it exists
//! for tools that pick meshes, such as the clipper. Acceleration is
//! opt-in: when [`crate::spatial::install_acceleration`] has run, the
//! reference raycaster maintains an octree index over the scene's meshes.

use std::any::Any;

use crate::foundation::math::{Point3, Vec3};
use crate::scene::{MeshHandle, SceneComponent};
use crate::spatial::{acceleration, AccelerationConfig, Octree, AABB};

/// A picking ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin
    pub origin: Point3,
    /// Normalized ray direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    ///
    /// A degenerate direction defaults to `-z` (into the screen for a
    /// right-handed viewer).
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let direction = if direction.magnitude_squared() > 1.0e-12 {
            direction.normalize()
        } else {
            -Vec3::z()
        };
        Self { origin, direction }
    }

    /// Point at parameter `t` along the ray
    pub fn point_at(&self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }
}

/// Result of a successful pick
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// Handle of the mesh that was hit
    pub mesh: MeshHandle,
    /// World-space hit point
    pub point: Point3,
    /// Outward surface normal at the hit point
    pub normal: Vec3,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
}

/// Contract for the raycaster sub-system slot
pub trait RaycasterComponent {
    /// Pick the closest visible mesh along the ray, if any
    fn cast(&self, scene: &dyn SceneComponent, ray: &Ray) -> Option<RaycastHit>;

    /// Rebuild any internal index from the scene's current contents
    ///
    /// Call after adding, removing, or moving meshes. A no-op when no
    /// acceleration is installed.
    fn rebuild_index(&mut self, scene: &dyn SceneComponent);

    /// Downcast to Any for type-specific access
    fn as_any(&self) -> &dyn Any;

    /// Downcast to Any for mutable type-specific access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Reference implementation of [`RaycasterComponent`]
///
/// Tests candidate meshes with the slab method against their world-space
/// bounds. With acceleration installed, candidates come from an octree ray
/// query instead of the full mesh list.
pub struct MeshRaycaster {
    index: Option<Octree<MeshHandle>>,
}

impl Default for MeshRaycaster {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshRaycaster {
    /// Create a raycaster honoring the process-wide acceleration setting
    pub fn new() -> Self {
        match acceleration() {
            Some(config) => Self::with_acceleration(config.clone()),
            None => Self::unaccelerated(),
        }
    }

    /// Create a raycaster with an explicit acceleration configuration
    pub fn with_acceleration(config: AccelerationConfig) -> Self {
        let half = config.world_half_extent;
        let bounds = AABB::from_center_extents(Vec3::zeros(), Vec3::new(half, half, half));
        Self {
            index: Some(Octree::new(bounds, config.octree)),
        }
    }

    /// Create a raycaster that always scans the full mesh list
    pub fn unaccelerated() -> Self {
        Self { index: None }
    }

    /// Whether an octree index is in use
    pub fn is_accelerated(&self) -> bool {
        self.index.is_some()
    }

    fn candidates(&self, scene: &dyn SceneComponent, ray: &Ray) -> Vec<MeshHandle> {
        match &self.index {
            Some(octree) => octree
                .query_ray(ray.origin.coords, ray.direction)
                .into_iter()
                .map(|item| item.key)
                .collect(),
            None => scene.mesh_handles(),
        }
    }
}

impl RaycasterComponent for MeshRaycaster {
    fn cast(&self, scene: &dyn SceneComponent, ray: &Ray) -> Option<RaycastHit> {
        let mut closest: Option<RaycastHit> = None;

        for handle in self.candidates(scene, ray) {
            let Some(mesh) = scene.mesh(handle) else {
                continue;
            };
            if !mesh.visible {
                continue;
            }

            let bounds = mesh.world_bounds();
            let Some(distance) = bounds.intersect_ray(ray.origin.coords, ray.direction) else {
                continue;
            };
            if closest.is_some_and(|hit| hit.distance <= distance) {
                continue;
            }

            let point = ray.point_at(distance);
            closest = Some(RaycastHit {
                mesh: handle,
                point,
                normal: bounds.face_normal_at(point.coords),
                distance,
            });
        }

        closest
    }

    fn rebuild_index(&mut self, scene: &dyn SceneComponent) {
        let Some(octree) = &mut self.index else {
            return;
        };

        octree.clear();
        for handle in scene.mesh_handles() {
            if let Some(mesh) = scene.mesh(handle) {
                let bounds = mesh.world_bounds();
                octree.insert(handle, bounds.center(), bounds.extents().magnitude());
            }
        }
        log::debug!("Raycaster index rebuilt over {} meshes", octree.len());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Mesh, SimpleScene};
    use approx::assert_relative_eq;

    fn scene_with_row_of_cubes() -> SimpleScene {
        let mut scene = SimpleScene::new();
        scene.add_mesh(Mesh::cube("near", 2.0).at(Vec3::new(0.0, 0.0, -5.0)));
        scene.add_mesh(Mesh::cube("far", 2.0).at(Vec3::new(0.0, 0.0, -15.0)));
        scene.add_mesh(Mesh::cube("aside", 2.0).at(Vec3::new(20.0, 0.0, -5.0)));
        scene
    }

    #[test]
    fn test_cast_hits_closest_mesh() {
        let scene = scene_with_row_of_cubes();
        let raycaster = MeshRaycaster::unaccelerated();

        let hit = raycaster
            .cast(&scene, &Ray::new(Point3::origin(), -Vec3::z()))
            .expect("ray should hit the near cube");

        assert_eq!(scene.mesh(hit.mesh).unwrap().name, "near");
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1.0e-4);
        assert_relative_eq!(hit.point.z, -4.0, epsilon = 1.0e-4);
        assert_eq!(hit.normal, Vec3::z());
    }

    #[test]
    fn test_cast_misses_empty_space() {
        let scene = scene_with_row_of_cubes();
        let raycaster = MeshRaycaster::unaccelerated();

        let hit = raycaster.cast(&scene, &Ray::new(Point3::origin(), Vec3::y()));
        assert!(hit.is_none());
    }

    #[test]
    fn test_cast_skips_invisible_meshes() {
        let mut scene = scene_with_row_of_cubes();
        let near = scene
            .iter()
            .find(|(_, mesh)| mesh.name == "near")
            .map(|(handle, _)| handle)
            .unwrap();
        scene.mesh_mut(near).unwrap().visible = false;
        let raycaster = MeshRaycaster::unaccelerated();

        let hit = raycaster
            .cast(&scene, &Ray::new(Point3::origin(), -Vec3::z()))
            .expect("ray should pass through to the far cube");
        assert_eq!(scene.mesh(hit.mesh).unwrap().name, "far");
    }

    #[test]
    fn test_accelerated_cast_matches_unaccelerated() {
        let scene = scene_with_row_of_cubes();
        let mut accelerated = MeshRaycaster::with_acceleration(AccelerationConfig {
            world_half_extent: 100.0,
            ..AccelerationConfig::default()
        });
        accelerated.rebuild_index(&scene);
        assert!(accelerated.is_accelerated());

        let ray = Ray::new(Point3::origin(), -Vec3::z());
        let plain = MeshRaycaster::unaccelerated().cast(&scene, &ray).unwrap();
        let fast = accelerated.cast(&scene, &ray).unwrap();

        assert_eq!(plain.mesh, fast.mesh);
        assert_relative_eq!(plain.distance, fast.distance, epsilon = 1.0e-5);
    }

    #[test]
    fn test_index_rebuild_tracks_removals() {
        let mut scene = SimpleScene::new();
        let handle = scene.add_mesh(Mesh::cube("only", 2.0).at(Vec3::new(0.0, 0.0, -5.0)));
        let mut raycaster = MeshRaycaster::with_acceleration(AccelerationConfig {
            world_half_extent: 100.0,
            ..AccelerationConfig::default()
        });
        raycaster.rebuild_index(&scene);

        let ray = Ray::new(Point3::origin(), -Vec3::z());
        assert!(raycaster.cast(&scene, &ray).is_some());

        scene.remove_mesh(handle);
        raycaster.rebuild_index(&scene);
        assert!(raycaster.cast(&scene, &ray).is_none());
    }

    #[test]
    fn test_degenerate_direction_defaults_forward() {
        let ray = Ray::new(Point3::origin(), Vec3::zeros());
        assert_eq!(ray.direction, -Vec3::z());
    }
}
