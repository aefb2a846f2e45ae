//! Headless forward-composition renderer

use std::any::Any;
use std::sync::{Arc, RwLock};

use crate::camera::CameraComponent;
use crate::foundation::math::Vec3;
use crate::render::{ClippingPlanes, PostEffects, RendererComponent};
use crate::scene::SceneComponent;

/// Frame composition statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames the renderer has been updated for
    pub frames: u64,
    /// Meshes submitted for drawing last pass
    pub drawn: usize,
    /// Meshes culled because they were fully behind a clipping plane
    pub clipped: usize,
    /// Meshes skipped because they were marked invisible
    pub hidden: usize,
}

/// Reference implementation of [`RendererComponent`]
///
/// Headless by design: `compose` walks the scene, culls against the shared
/// clipping-plane list, and reports what it would have drawn. GPU
/// submission is out of scope for the toolkit.
pub struct ForwardRenderer {
    clipping: ClippingPlanes,
    effects: PostEffects,
    background: Vec3,
    stats: RenderStats,
}

impl Default for ForwardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ForwardRenderer {
    /// Create a renderer with an empty clipping-plane list
    pub fn new() -> Self {
        Self {
            clipping: Arc::new(RwLock::new(Vec::new())),
            effects: PostEffects::GAMMA_CORRECTION,
            background: Vec3::new(0.1, 0.1, 0.12),
            stats: RenderStats::default(),
        }
    }

    /// Set the background color
    pub fn set_background(&mut self, color: Vec3) {
        self.background = color;
    }

    /// Background color
    pub fn background(&self) -> Vec3 {
        self.background
    }

    /// Enable or disable a post-processing pass
    pub fn set_post_effect(&mut self, effect: PostEffects, enabled: bool) {
        self.effects.set(effect, enabled);
    }

    /// Running renderer statistics (frame counter)
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Compose one frame from the scene as seen by the camera
    ///
    /// A mesh is culled when its whole world-space bounding box sits on
    /// the negative side of any clipping plane; meshes straddling a plane
    /// are still drawn (the cut happens per-fragment in a real backend).
    pub fn compose(
        &self,
        scene: &dyn SceneComponent,
        camera: &dyn CameraComponent,
    ) -> RenderStats {
        let _view = camera.view_matrix();
        let planes = self.clipping.read().unwrap().clone();

        let mut drawn = 0;
        let mut clipped = 0;
        let mut hidden = 0;

        for handle in scene.mesh_handles() {
            let Some(mesh) = scene.mesh(handle) else {
                continue;
            };
            if !mesh.visible {
                hidden += 1;
                continue;
            }

            let bounds = mesh.world_bounds();
            let radius = bounds.extents().magnitude();
            let center = bounds.center();
            let fully_clipped = planes
                .iter()
                .any(|plane| plane.distance_to_point(center) < -radius);

            if fully_clipped {
                clipped += 1;
            } else {
                drawn += 1;
            }
        }

        log::trace!(
            "Composed frame {}: {} drawn, {} clipped, {} hidden",
            self.stats.frames,
            drawn,
            clipped,
            hidden
        );
        RenderStats {
            frames: self.stats.frames,
            drawn,
            clipped,
            hidden,
        }
    }
}

impl RendererComponent for ForwardRenderer {
    fn update(&mut self, delta: f32) {
        let _ = delta;
        self.stats.frames += 1;
    }

    fn clipping_planes(&self) -> ClippingPlanes {
        Arc::clone(&self.clipping)
    }

    fn post_effects(&self) -> PostEffects {
        self.effects
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
