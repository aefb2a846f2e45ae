//! Spatial primitives and partitioning
//!
//! Provides bounding volumes, half-space planes, and a loose octree used
//! for accelerated ray picking, plus the process-wide acceleration switch
//! that raycasters consult.

mod acceleration;
mod bounds;
mod octree;

pub use acceleration::{acceleration, install_acceleration, AccelerationConfig};
pub use bounds::{Plane, AABB};
pub use octree::{Octree, OctreeConfig, OctreeItem, OctreeNode};
