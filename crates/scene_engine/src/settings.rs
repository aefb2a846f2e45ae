//! TOML-backed settings for toolkit applications
//!
//! Applications describe their startup state in a single TOML file: frame
//! rate, camera placement, clipping-tool appearance, and picking
//! acceleration. Every section and field has a default, so an empty file
//! (or a missing one handled by the caller) yields a usable configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spatial::AccelerationConfig;
use crate::tools::ClipperConfig;

/// Settings load/save errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid TOML for the target type
    #[error("parse error: {0}")]
    Parse(String),

    /// Settings could not be serialized to TOML
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Load and save support for TOML settings types
pub trait TomlSettings: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load settings from a TOML file
    ///
    /// # Errors
    /// Fails if the file cannot be read or does not parse.
    fn load_from_file(path: &str) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Save settings to a TOML file
    ///
    /// # Errors
    /// Fails if serialization or the write fails.
    fn save_to_file(&self, path: &str) -> Result<(), SettingsError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| SettingsError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Frame-loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Target frame rate for the interval scheduler
    pub target_fps: u32,
    /// Number of frames a bounded demo run lasts; `None` runs until
    /// interrupted
    pub run_frames: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            target_fps: 60,
            run_frames: None,
        }
    }
}

/// Demo scene content settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Multiplier applied to every mesh's spin rate
    pub spin_rate: f32,
    /// Number of randomly scattered debris cubes
    pub debris_count: usize,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            spin_rate: 1.0,
            debris_count: 8,
        }
    }
}

/// Orbit-camera startup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Initial distance from the orbit target
    pub distance: f32,
    /// Initial yaw in radians
    pub yaw: f32,
    /// Initial pitch in radians
    pub pitch: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.4,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frame-loop settings
    pub engine: EngineSettings,
    /// Camera startup settings
    pub camera: CameraSettings,
    /// Demo scene content
    pub scene: SceneSettings,
    /// Clipping-tool appearance
    pub clipper: ClipperConfig,
    /// Picking acceleration parameters
    pub acceleration: AccelerationConfig,
}

impl TomlSettings for Settings {}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist
    ///
    /// # Errors
    /// Fails only on a present-but-invalid file; absence is not an error.
    pub fn load_or_default(path: &str) -> Result<Self, SettingsError> {
        if std::path::Path::new(path).exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No settings file at {path}, using defaults");
            Ok(Self::default())
        }
    }
}
