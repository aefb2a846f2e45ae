//! Bounding volumes and half-space planes

use crate::foundation::math::{Point3, Vec3};

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow the AABB uniformly by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        let expansion = Vec3::new(margin, margin, margin);
        Self {
            min: self.min - expansion,
            max: self.max + expansion,
        }
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Test ray intersection with this AABB using the slab method
    ///
    /// Returns the distance to the entry point if the ray intersects
    /// (`0.0` when the origin is inside the box), `None` otherwise.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv_dir = Vec3::new(
            if ray_dir.x != 0.0 { 1.0 / ray_dir.x } else { f32::INFINITY },
            if ray_dir.y != 0.0 { 1.0 / ray_dir.y } else { f32::INFINITY },
            if ray_dir.z != 0.0 { 1.0 / ray_dir.z } else { f32::INFINITY },
        );

        let t1 = (self.min.x - ray_origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray_origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray_origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray_origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray_origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray_origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }

    /// Outward normal of the box face closest to a surface point
    ///
    /// Used to orient clipping planes created from a pick on the box.
    pub fn face_normal_at(&self, point: Vec3) -> Vec3 {
        let center = self.center();
        let extents = self.extents();
        let local = point - center;

        // Relative penetration along each axis; the largest wins.
        let rx = if extents.x > 0.0 { local.x / extents.x } else { 0.0 };
        let ry = if extents.y > 0.0 { local.y / extents.y } else { 0.0 };
        let rz = if extents.z > 0.0 { local.z / extents.z } else { 0.0 };

        if rx.abs() >= ry.abs() && rx.abs() >= rz.abs() {
            Vec3::new(rx.signum(), 0.0, 0.0)
        } else if ry.abs() >= rz.abs() {
            Vec3::new(0.0, ry.signum(), 0.0)
        } else {
            Vec3::new(0.0, 0.0, rz.signum())
        }
    }
}

/// Half-space plane defined by a unit normal and distance from origin
///
/// A point `p` is on the positive side when `normal · p + distance >= 0`.
/// Renderers treat the negative side as clipped away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (should be normalized)
    pub normal: Vec3,
    /// Signed distance from the origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a normal and distance
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Create a plane passing through a point with the given normal
    ///
    /// The normal is normalized; a degenerate normal yields a plane facing
    /// `+y` through the point.
    pub fn from_point_normal(point: Point3, normal: Vec3) -> Self {
        let normal = if normal.magnitude_squared() > 1.0e-12 {
            normal.normalize()
        } else {
            Vec3::y()
        };
        let distance = -normal.dot(&point.coords);
        Self { normal, distance }
    }

    /// Signed distance from the plane to a point
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }

    /// Flip the plane so it faces the opposite way
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }
}
