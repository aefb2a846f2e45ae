//! Interactive clipping-plane tool

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Point3;
use crate::raycaster::RaycastHit;
use crate::render::ClippingPlanes;
use crate::spatial::Plane;
use crate::tools::Tool;

/// Appearance and behavior settings for the clipper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipperConfig {
    /// Edge length of the rendered plane helper, in world units
    pub plane_size: f32,

    /// RGB color of the plane helper
    pub color: [f32; 3],

    /// Target opacity of the plane helper when the tool is enabled
    pub opacity: f32,

    /// Seconds for the helper opacity to settle after toggling
    pub fade_time: f32,
}

impl Default for ClipperConfig {
    fn default() -> Self {
        Self {
            plane_size: 5.0,
            color: [0.8, 0.2, 0.2],
            opacity: 0.35,
            fade_time: 0.2,
        }
    }
}

/// Tool that creates and deletes clipping planes from picks
///
/// The clipper shares the renderer's clipping-plane list by handle, so a
/// created plane takes effect on the next composed frame without any
/// copying or syncing step. Disabling the tool withdraws its planes from
/// the shared list; re-enabling restores them.
pub struct Clipper {
    /// Appearance settings, tweakable at runtime
    pub config: ClipperConfig,
    shared: ClippingPlanes,
    planes: Vec<Plane>,
    enabled: bool,
    visual_opacity: f32,
}

impl Clipper {
    /// Create a clipper writing into the given shared plane list
    pub fn new(shared: ClippingPlanes) -> Self {
        Self::with_config(shared, ClipperConfig::default())
    }

    /// Create a clipper with explicit settings
    pub fn with_config(shared: ClippingPlanes, config: ClipperConfig) -> Self {
        Self {
            config,
            shared,
            planes: Vec::new(),
            enabled: true,
            visual_opacity: 0.0,
        }
    }

    /// Create a clipping plane from a pick
    ///
    /// The plane passes through the hit point facing against the picked
    /// surface, so the volume behind the face is cut away.
    pub fn create_from_hit(&mut self, hit: &RaycastHit) {
        let plane = Plane::from_point_normal(hit.point, -hit.normal);
        log::info!(
            "Clipper: created plane through ({:.2}, {:.2}, {:.2})",
            hit.point.x,
            hit.point.y,
            hit.point.z
        );
        self.planes.push(plane);
        if self.enabled {
            self.shared.write().unwrap().push(plane);
        }
    }

    /// Delete the plane closest to a point
    ///
    /// Returns `true` if a plane was deleted.
    pub fn delete_nearest(&mut self, point: Point3) -> bool {
        let nearest = self
            .planes
            .iter()
            .enumerate()
            .map(|(i, plane)| (i, plane.distance_to_point(point.coords).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((index, _)) = nearest else {
            return false;
        };
        let plane = self.planes.remove(index);
        self.withdraw(&plane);
        log::info!("Clipper: deleted plane {}", index);
        true
    }

    /// Delete all planes created by this clipper
    pub fn delete_all(&mut self) {
        for plane in std::mem::take(&mut self.planes) {
            self.withdraw(&plane);
        }
        log::info!("Clipper: deleted all planes");
    }

    /// Enable or disable the tool
    ///
    /// Disabling withdraws this clipper's planes from the shared list
    /// without forgetting them; re-enabling restores them.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;

        let mut shared = self.shared.write().unwrap();
        if enabled {
            shared.extend(self.planes.iter().copied());
        } else {
            for plane in &self.planes {
                if let Some(index) = shared.iter().position(|p| p == plane) {
                    shared.remove(index);
                }
            }
        }
    }

    /// Whether the tool is currently enabled
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Planes created by this clipper (including withdrawn ones)
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Current helper opacity, eased toward the configured target
    pub fn visual_opacity(&self) -> f32 {
        self.visual_opacity
    }

    fn withdraw(&self, plane: &Plane) {
        if !self.enabled {
            return;
        }
        let mut shared = self.shared.write().unwrap();
        if let Some(index) = shared.iter().position(|p| p == plane) {
            shared.remove(index);
        }
    }
}

impl Tool for Clipper {
    fn update(&mut self, delta: f32) {
        let target = if self.enabled { self.config.opacity } else { 0.0 };
        if self.config.fade_time <= 0.0 {
            self.visual_opacity = target;
            return;
        }
        let step = delta / self.config.fade_time;
        let diff = target - self.visual_opacity;
        if diff.abs() <= step {
            self.visual_opacity = target;
        } else {
            self.visual_opacity += diff.signum() * step;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
