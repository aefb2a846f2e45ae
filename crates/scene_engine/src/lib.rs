//! # Scene Engine
//!
//! A 3D scene composition toolkit built around a pluggable component
//! orchestrator.
//!
//! ## Features
//!
//! - **Component Orchestrator**: Central registry that owns optional scene,
//!   renderer, camera, and raycaster sub-systems and drives them with a
//!   fixed-order frame update
//! - **Tool Registry**: Polymorphic, independently updatable feature modules
//!   (e.g. an interactive clipping-plane tool)
//! - **Clipping Planes**: Renderer-owned half-space cuts, shared by handle
//!   so tools and callers mutate the same list
//! - **Accelerated Picking**: Slab-method ray casting with an optional
//!   octree index enabled by a one-time bootstrap call
//! - **Deterministic Scheduling**: The frame loop runs against an injected
//!   scheduler port, so the whole update protocol is testable headlessly
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! fn main() -> Result<(), ComponentsError> {
//!     let scheduler = Arc::new(Mutex::new(IntervalScheduler::new(60)));
//!     let mut components = Components::new(scheduler.clone());
//!
//!     components.set_scene(Box::new(SimpleScene::new()));
//!     components.set_renderer(Box::new(ForwardRenderer::new()));
//!     components.set_camera(Box::new(OrbitCamera::new(10.0)));
//!
//!     components.init();
//!     for _ in 0..600 {
//!         components.tick();
//!     }
//!     components.dispose();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod spatial;

pub mod camera;
pub mod raycaster;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod settings;
pub mod tools;

mod components;

pub use components::{Components, ComponentsError};

/// Common imports for toolkit users
pub mod prelude {
    pub use crate::{
        Components, ComponentsError,
        camera::{CameraComponent, OrbitCamera},
        foundation::{
            math::{Mat4, Point3, Transform, Vec3},
            time::Clock,
        },
        raycaster::{MeshRaycaster, Ray, RaycastHit, RaycasterComponent},
        render::{ClippingPlanes, ForwardRenderer, PostEffects, RenderStats, RendererComponent},
        scene::{Mesh, MeshHandle, SceneComponent, SimpleScene},
        scheduler::{FrameHandle, FrameScheduler, IntervalScheduler, ManualScheduler, SharedScheduler},
        settings::{Settings, SettingsError, TomlSettings},
        spatial::{install_acceleration, AccelerationConfig, Plane, AABB},
        tools::{Clipper, ClipperConfig, Tool, ToolRegistry},
    };
}
