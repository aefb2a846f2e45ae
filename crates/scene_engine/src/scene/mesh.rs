//! Mesh data tracked by the scene

use slotmap::new_key_type;

use crate::foundation::math::{Transform, Vec3};
use crate::spatial::AABB;

new_key_type! {
    /// Stable handle to a mesh in a scene's store
    pub struct MeshHandle;
}

/// A visual object tracked by the scene
///
/// Geometry detail is out of scope for this toolkit; a mesh is its local
/// bounds, a world transform, and a few per-frame attributes. That is
/// enough surface for picking, clipping, and composition.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Human-readable name, used in logs and pick reports
    pub name: String,

    /// Local-space bounding box
    pub local_bounds: AABB,

    /// World transform
    pub transform: Transform,

    /// Angular velocity in radians per second, applied by the scene update
    pub spin: Vec3,

    /// Whether renderers should consider this mesh at all
    pub visible: bool,
}

impl Mesh {
    /// Create a named mesh with the given local bounds
    pub fn new(name: impl Into<String>, local_bounds: AABB) -> Self {
        Self {
            name: name.into(),
            local_bounds,
            transform: Transform::identity(),
            spin: Vec3::zeros(),
            visible: true,
        }
    }

    /// Create an axis-aligned cube mesh with the given edge length
    pub fn cube(name: impl Into<String>, edge: f32) -> Self {
        let half = edge * 0.5;
        Self::new(
            name,
            AABB::from_center_extents(Vec3::zeros(), Vec3::new(half, half, half)),
        )
    }

    /// Set the world position, builder-style
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Set the angular velocity, builder-style
    pub fn spinning(mut self, spin: Vec3) -> Self {
        self.spin = spin;
        self
    }

    /// World-space bounding box
    ///
    /// Conservative: the rotated local box is re-wrapped axis-aligned, so
    /// the result may be larger than the tightest fit but never smaller.
    pub fn world_bounds(&self) -> AABB {
        let matrix = self.transform.to_matrix();
        let local = self.local_bounds;

        let mut min = Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = -min;
        for corner in 0..8 {
            let corner = Vec3::new(
                if corner & 1 != 0 { local.max.x } else { local.min.x },
                if corner & 2 != 0 { local.max.y } else { local.min.y },
                if corner & 4 != 0 { local.max.z } else { local.min.z },
            );
            let world = matrix.transform_point(&corner.into());
            min = min.inf(&world.coords);
            max = max.sup(&world.coords);
        }

        AABB::new(min, max)
    }

    /// Radius of the bounding sphere around the world-space bounds
    pub fn bounding_radius(&self) -> f32 {
        self.world_bounds().extents().magnitude()
    }
}
