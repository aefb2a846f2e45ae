//! Tool registry and built-in tools
//!
//! A tool is an opaque, independently updatable feature module registered
//! under a capability key. The orchestrator stores and updates tools; it
//! never constructs them and never looks past the [`Tool`] contract.

mod clipper;
mod registry;

pub use clipper::{Clipper, ClipperConfig};
pub use registry::ToolRegistry;

use std::any::Any;

/// Contract for registry entries
pub trait Tool {
    /// Advance tool-internal state by `delta` seconds
    fn update(&mut self, delta: f32);

    /// Downcast to Any for type-specific access
    fn as_any(&self) -> &dyn Any;

    /// Downcast to Any for mutable type-specific access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
