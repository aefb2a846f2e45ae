//! Process-wide picking acceleration switch
//!
//! Accelerated ray picking is opt-in and installed exactly once by the
//! application's bootstrap, before any raycaster is built. Raycasters call
//! [`acceleration`] to decide whether to maintain an octree index over the
//! scene's meshes. Installation is idempotent: only the first call takes
//! effect.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::spatial::OctreeConfig;

/// Parameters for the shared picking acceleration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccelerationConfig {
    /// Half-size of the world volume covered by the octree index
    pub world_half_extent: f32,

    /// Octree subdivision parameters
    pub octree: OctreeConfig,
}

impl Default for AccelerationConfig {
    fn default() -> Self {
        Self {
            world_half_extent: 1_000.0,
            octree: OctreeConfig::default(),
        }
    }
}

static ACCELERATION: OnceLock<AccelerationConfig> = OnceLock::new();

/// Install the process-wide picking acceleration configuration
///
/// Returns `true` if this call installed the configuration, `false` if one
/// was already installed (the earlier configuration stays in effect).
pub fn install_acceleration(config: AccelerationConfig) -> bool {
    let mut installed = false;
    ACCELERATION.get_or_init(|| {
        installed = true;
        config
    });
    if installed {
        log::info!("Picking acceleration installed");
    } else {
        log::debug!("Picking acceleration already installed; ignoring reinstall");
    }
    installed
}

/// The installed acceleration configuration, if any
pub fn acceleration() -> Option<&'static AccelerationConfig> {
    ACCELERATION.get()
}
