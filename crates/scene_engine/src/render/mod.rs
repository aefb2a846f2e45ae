//! Rendering contract and headless reference renderer
//!
//! The orchestrator only requires a delta-time update and access to the
//! renderer's clipping-plane list. The list is shared by handle
//! ([`ClippingPlanes`]) so tools and callers mutate the very list the
//! renderer culls against, never a copy.

mod forward;

pub use forward::{ForwardRenderer, RenderStats};

use std::any::Any;
use std::sync::{Arc, RwLock};

use bitflags::bitflags;

use crate::spatial::Plane;

/// Shared handle to a renderer's clipping-plane list
///
/// Cloning the handle aliases the same underlying list.
pub type ClippingPlanes = Arc<RwLock<Vec<Plane>>>;

bitflags! {
    /// Post-processing toggles exposed by renderers
    ///
    /// Opaque to the orchestrator; callers flip these through the concrete
    /// renderer type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PostEffects: u32 {
        /// Silhouette outlines around selected meshes
        const OUTLINE = 1 << 0;
        /// Screen-space ambient occlusion
        const AMBIENT_OCCLUSION = 1 << 1;
        /// Gamma correction pass
        const GAMMA_CORRECTION = 1 << 2;
    }
}

/// Contract for the renderer sub-system slot
pub trait RendererComponent {
    /// Advance renderer-internal state by `delta` seconds
    fn update(&mut self, delta: f32);

    /// Shared handle to the clipping-plane list used for culling
    fn clipping_planes(&self) -> ClippingPlanes;

    /// Currently enabled post-processing passes
    fn post_effects(&self) -> PostEffects;

    /// Downcast to Any for type-specific access
    fn as_any(&self) -> &dyn Any;

    /// Downcast to Any for mutable type-specific access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
