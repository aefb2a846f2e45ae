//! Octree spatial partitioning structure
//!
//! Divides 3D space into hierarchical octants for fast radius and ray
//! queries. Generic over the key type so callers can index meshes, scene
//! nodes, or anything else that is `Copy + PartialEq`.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::spatial::AABB;

/// Configuration for octree behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum items per node before subdivision
    pub max_items_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Minimum node size (prevents excessive subdivision)
    pub min_node_size: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_items_per_node: 8,
            max_depth: 8,
            min_node_size: 1.0,
        }
    }
}

/// Item stored in the octree with a position and bounding radius
#[derive(Debug, Clone, Copy)]
pub struct OctreeItem<K> {
    /// Caller-supplied key identifying the item
    pub key: K,
    /// Item position in world space
    pub position: Vec3,
    /// Bounding-sphere radius of the item
    pub radius: f32,
}

/// Octant index (0-7) of a position relative to a node center
fn octant_index(center: Vec3, position: Vec3) -> usize {
    let x_bit = usize::from(position.x >= center.x);
    let y_bit = usize::from(position.y >= center.y);
    let z_bit = usize::from(position.z >= center.z);
    (z_bit << 2) | (y_bit << 1) | x_bit
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode<K> {
    /// World-space bounds of this node
    pub bounds: AABB,

    /// Items contained in this node (if leaf)
    pub items: Vec<OctreeItem<K>>,

    /// Child nodes (8 octants), None if this is a leaf
    pub children: Option<Box<[OctreeNode<K>; 8]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl<K: Copy + PartialEq> OctreeNode<K> {
    fn new(bounds: AABB, depth: u32) -> Self {
        Self {
            bounds,
            items: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }

        let center = self.bounds.center();
        let quarter = self.bounds.extents() * 0.5;

        let mut children = Box::new(std::array::from_fn(|octant| {
            let sign = |bit: usize| if octant & bit != 0 { 1.0 } else { -1.0 };
            let child_center = Vec3::new(
                center.x + quarter.x * sign(1),
                center.y + quarter.y * sign(2),
                center.z + quarter.z * sign(4),
            );
            Self::new(AABB::from_center_extents(child_center, quarter), self.depth + 1)
        }));

        // Push existing items down into the octant that holds their center.
        for item in std::mem::take(&mut self.items) {
            children[octant_index(center, item.position)].items.push(item);
        }
        self.children = Some(children);
    }

    fn insert(&mut self, item: OctreeItem<K>, config: &OctreeConfig) -> bool {
        if !self.bounds.contains_point(item.position) {
            return false;
        }

        if self.is_leaf() {
            let should_subdivide = self.items.len() >= config.max_items_per_node
                && self.depth < config.max_depth
                && self.bounds.extents().x > config.min_node_size;

            if !should_subdivide {
                self.items.push(item);
                return true;
            }
            self.subdivide();
        }

        let octant = octant_index(self.bounds.center(), item.position);
        match self.children.as_mut() {
            Some(children) => children[octant].insert(item, config),
            None => false,
        }
    }

    fn remove(&mut self, key: K) -> bool {
        if let Some(index) = self.items.iter().position(|item| item.key == key) {
            self.items.swap_remove(index);
            return true;
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.remove(key) {
                    return true;
                }
            }
        }

        false
    }

    fn query_radius(&self, center: Vec3, radius: f32, results: &mut Vec<OctreeItem<K>>) {
        // Closest point on the node bounds to the query center; if even that
        // is out of range the whole subtree is.
        let closest = Vec3::new(
            center.x.clamp(self.bounds.min.x, self.bounds.max.x),
            center.y.clamp(self.bounds.min.y, self.bounds.max.y),
            center.z.clamp(self.bounds.min.z, self.bounds.max.z),
        );
        if (closest - center).magnitude_squared() > radius * radius {
            return;
        }

        for item in &self.items {
            let combined = radius + item.radius;
            if (item.position - center).magnitude_squared() <= combined * combined {
                results.push(*item);
            }
        }

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query_radius(center, radius, results);
            }
        }
    }

    fn query_ray(
        &self,
        ray_origin: Vec3,
        ray_dir: Vec3,
        max_item_radius: f32,
        results: &mut Vec<OctreeItem<K>>,
    ) {
        // Items can extend past the node that stores their center, so the
        // node bounds are grown by the largest item radius in the tree.
        let bounds = if max_item_radius > 0.0 {
            self.bounds.expanded(max_item_radius)
        } else {
            self.bounds
        };
        if bounds.intersect_ray(ray_origin, ray_dir).is_none() {
            return;
        }

        results.extend_from_slice(&self.items);

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query_ray(ray_origin, ray_dir, max_item_radius, results);
            }
        }
    }

    fn find(&self, key: K) -> Option<OctreeItem<K>> {
        if let Some(item) = self.items.iter().find(|item| item.key == key) {
            return Some(*item);
        }

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                if let Some(item) = child.find(key) {
                    return Some(item);
                }
            }
        }

        None
    }

    fn count(&self) -> usize {
        let mut count = self.items.len();
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                count += child.count();
            }
        }
        count
    }
}

/// Octree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct Octree<K> {
    /// Root node containing the entire world space
    pub root: OctreeNode<K>,

    config: OctreeConfig,

    /// Cached maximum item radius in the tree (updated on insert)
    max_item_radius: f32,
}

impl<K: Copy + PartialEq> Octree<K> {
    /// Create a new octree with given world bounds
    pub fn new(world_bounds: AABB, config: OctreeConfig) -> Self {
        Self {
            root: OctreeNode::new(world_bounds, 0),
            config,
            max_item_radius: 0.0,
        }
    }

    /// Insert an item into the octree
    ///
    /// Returns `false` if the position lies outside the world bounds.
    pub fn insert(&mut self, key: K, position: Vec3, radius: f32) -> bool {
        if radius > self.max_item_radius {
            self.max_item_radius = radius;
        }
        self.root.insert(
            OctreeItem {
                key,
                position,
                radius,
            },
            &self.config,
        )
    }

    /// Remove an item from the octree
    pub fn remove(&mut self, key: K) -> bool {
        self.root.remove(key)
    }

    /// Query all items within a radius of a point
    pub fn query_radius(&self, center: Vec3, radius: f32) -> Vec<OctreeItem<K>> {
        let mut results = Vec::new();
        self.root.query_radius(center, radius, &mut results);
        results
    }

    /// Query all items that potentially intersect a ray
    ///
    /// Returns items stored in nodes the ray passes through; callers still
    /// test each candidate for an actual intersection.
    pub fn query_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Vec<OctreeItem<K>> {
        let mut results = Vec::new();
        self.root
            .query_ray(ray_origin, ray_dir, self.max_item_radius, &mut results);
        results
    }

    /// Find an item and return its stored data
    pub fn find(&self, key: K) -> Option<OctreeItem<K>> {
        self.root.find(key)
    }

    /// Get total item count
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Check whether the octree holds no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the octree
    pub fn clear(&mut self) {
        self.root = OctreeNode::new(self.root.bounds, 0);
        self.max_item_radius = 0.0;
    }
}
