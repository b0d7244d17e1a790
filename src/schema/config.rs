//! Configuration types for the point cloud viewer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Color;
use crate::view::Easing;

/// Vertex-buffer ceiling of the reference platform (16-bit index meshes).
pub const DEFAULT_MAX_VERTICES_PER_BATCH: usize = 65_535;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Point rendering and batch construction.
    pub render: RenderConfig,
    /// Animation playback.
    pub playback: PlaybackConfig,
    /// Automatic recentering.
    pub framer: FramerConfig,
}

/// Point rendering parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Edge length of each point quad in world units.
    pub point_size: f64,
    /// Uniform color used when the data carries no complete color set.
    pub point_color: Color,
    /// Orient each quad towards the camera.
    pub billboard: bool,
    /// Hard vertex ceiling per draw batch.
    pub max_vertices_per_batch: usize,
    /// Camera translation (world units) that forces a billboard rebuild.
    pub deadband_position: f64,
    /// Camera rotation (degrees) that forces a billboard rebuild.
    pub deadband_degrees: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_size: 0.01,
            point_color: Color::WHITE,
            billboard: true,
            max_vertices_per_batch: DEFAULT_MAX_VERTICES_PER_BATCH,
            deadband_position: 0.01,
            deadband_degrees: 1.0,
        }
    }
}

/// Animation playback parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Frames per second; values below 1 are clamped to 1 when applied.
    pub frame_rate: f64,
    /// Wrap around at either end instead of stopping.
    pub loop_playback: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            loop_playback: true,
        }
    }
}

/// View framing and camera reset parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FramerConfig {
    /// Check for a lost subject automatically.
    pub enabled: bool,
    /// Seconds between out-of-view checks.
    pub poll_interval_seconds: f64,
    /// Seconds the smoothed camera reset takes.
    pub reset_duration_seconds: f64,
    /// Interpolation curve of the camera reset.
    pub easing: Easing,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_seconds: 0.25,
            reset_duration_seconds: 0.5,
            easing: Easing::SmoothStep,
        }
    }
}

impl ViewerConfig {
    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        if !render.point_size.is_finite() || render.point_size <= 0.0 {
            return Err(ConfigError::InvalidPointSize(render.point_size));
        }
        if render.max_vertices_per_batch < 4 {
            return Err(ConfigError::InvalidBatchCeiling(
                render.max_vertices_per_batch,
            ));
        }
        if !(render.deadband_position >= 0.0 && render.deadband_degrees >= 0.0) {
            return Err(ConfigError::InvalidDeadband);
        }
        if !self.playback.frame_rate.is_finite() {
            return Err(ConfigError::InvalidFrameRate(self.playback.frame_rate));
        }
        let framer = &self.framer;
        if !framer.poll_interval_seconds.is_finite() || framer.poll_interval_seconds < 0.0 {
            return Err(ConfigError::InvalidDuration {
                field: "poll_interval_seconds",
                value: framer.poll_interval_seconds,
            });
        }
        if !framer.reset_duration_seconds.is_finite() || framer.reset_duration_seconds < 0.0 {
            return Err(ConfigError::InvalidDuration {
                field: "reset_duration_seconds",
                value: framer.reset_duration_seconds,
            });
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Point size must be positive and finite, got {0}")]
    InvalidPointSize(f64),
    #[error("Batch vertex ceiling must hold at least one quad (4 vertices), got {0}")]
    InvalidBatchCeiling(usize),
    #[error("Camera deadband values must be non-negative")]
    InvalidDeadband,
    #[error("Frame rate must be finite, got {0}")]
    InvalidFrameRate(f64),
    #[error("{field} must be non-negative and finite, got {value}")]
    InvalidDuration { field: &'static str, value: f64 },
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
