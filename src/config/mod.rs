//! First-person view configuration
//!
//! Loaded from TOML or JSON, picked by file extension. Every field has a
//! default, so partial files are fine.

use std::path::Path;

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(ConfigFormat::Json),
            Some("toml") => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Static placement of the held-item mount point relative to the camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountPointConfig {
    pub translate: [f32; 3],
    pub rotate_degrees: [f32; 3],
    pub scale: f32,
}

impl Default for MountPointConfig {
    fn default() -> Self {
        Self {
            translate: [0.0, 0.0, 0.0],
            rotate_degrees: [0.0, 0.0, 0.0],
            scale: 1.0,
        }
    }
}

/// Shape of the "use" swing applied to the mount point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UseAnimationConfig {
    /// Full swing duration; the peak is at half of it
    pub length_ms: u64,
    pub peak_pitch_degrees: f32,
    pub peak_yaw_degrees: f32,
    pub peak_offset: [f32; 3],
}

impl Default for UseAnimationConfig {
    fn default() -> Self {
        Self {
            length_ms: 200,
            peak_pitch_degrees: 15.0,
            peak_yaw_degrees: 10.0,
            peak_offset: [0.25, -0.12, 0.0],
        }
    }
}

impl UseAnimationConfig {
    pub fn peak_offset(&self) -> Vector3<f32> {
        Vector3::from(self.peak_offset)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstPersonConfig {
    pub mount_point: MountPointConfig,
    pub use_animation: UseAnimationConfig,
}

impl FirstPersonConfig {
    /// Load from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| EngineError::UnknownConfigFormat {
            path: path.display().to_string(),
        })?;
        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;

        let config = match format {
            ConfigFormat::Toml => Self::from_toml_str(&raw)?,
            ConfigFormat::Json => Self::from_json_str(&raw)?,
        };
        log::info!("[FirstPersonConfig] Loaded {}", path.display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("[FirstPersonConfig] {}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn from_toml_str(raw: &str) -> EngineResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_json_str(raw: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
