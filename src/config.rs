//! Configuration management for hand pose reconstruction

use crate::constants::{
    DEFAULT_DERIVATIVE_CUTOFF, DEFAULT_FIXED_MIN_CUTOFF, DEFAULT_ROBUST_BETA, DEFAULT_ROBUST_MIN_CUTOFF,
};
use crate::joint_smoother::SmoothingType;
use crate::joints::Handedness;
use crate::transform::RigidTransform;
use crate::{Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracked hand configuration
    pub hand: HandConfig,

    /// Filter tunables per smoothing type
    pub smoothing: SmoothingConfig,

    /// Device-to-working-frame offset
    pub playspace: PlayspaceConfig,
}

/// Which hand is tracked and how it is smoothed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    /// Left or right hand
    pub handedness: Handedness,

    /// Smoothing applied to joint positions
    pub smoothing: SmoothingType,
}

/// One-euro tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EuroParams {
    /// Cutoff frequency at rest, in Hz
    pub min_cutoff: f32,

    /// Cutoff increase per unit of speed
    pub beta: f32,

    /// Cutoff for the derivative estimate, in Hz
    pub derivative_cutoff: f32,
}

/// Smoothing tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Reset a joint filter when it receives an all-zero position
    pub reset_on_zero: bool,

    /// Constant-cutoff smoothing; `beta` is always treated as zero
    pub fixed: EuroParams,

    /// Speed-adaptive smoothing
    pub robust: EuroParams,
}

/// Rigid offset from the device frame into the working frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayspaceConfig {
    /// Translation applied after rotation, in meters
    pub translation: [f32; 3],

    /// Rotation around the global up axis, in degrees
    pub yaw_degrees: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            reset_on_zero: true,
            fixed: EuroParams {
                min_cutoff: DEFAULT_FIXED_MIN_CUTOFF,
                beta: 0.0,
                derivative_cutoff: DEFAULT_DERIVATIVE_CUTOFF,
            },
            robust: EuroParams {
                min_cutoff: DEFAULT_ROBUST_MIN_CUTOFF,
                beta: DEFAULT_ROBUST_BETA,
                derivative_cutoff: DEFAULT_DERIVATIVE_CUTOFF,
            },
        }
    }
}

impl Default for PlayspaceConfig {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            yaw_degrees: 0.0,
        }
    }
}

impl EuroParams {
    fn validate(&self, section: &str) -> Result<()> {
        let values = [self.min_cutoff, self.beta, self.derivative_cutoff];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(Error::ConfigError(format!(
                "{section} tunables must be finite and non-negative"
            )));
        }
        if self.min_cutoff <= 0.0 || self.derivative_cutoff <= 0.0 {
            return Err(Error::ConfigError(format!(
                "{section} cutoff frequencies must be greater than 0"
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Build the device-to-working-frame transform
    #[must_use]
    pub fn create_transform(&self) -> RigidTransform {
        let [x, y, z] = self.playspace.translation;
        RigidTransform::new(Vector3::new(x, y, z), self.playspace.yaw_degrees)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.smoothing.fixed.validate("Fixed smoothing")?;
        self.smoothing.robust.validate("Robust smoothing")?;

        if self.smoothing.fixed.beta != 0.0 {
            log::warn!(
                "Fixed smoothing ignores beta ({}), using a constant cutoff",
                self.smoothing.fixed.beta
            );
        }

        if self.playspace.translation.iter().any(|v| !v.is_finite()) || !self.playspace.yaw_degrees.is_finite() {
            return Err(Error::ConfigError("Playspace offset must be finite".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Hand Pose Estimation Configuration

# Tracked hand
hand:
  handedness: right
  smoothing: robust

# Joint position smoothing (one-euro filter)
smoothing:
  reset_on_zero: true
  fixed:
    min_cutoff: 2.5
    beta: 0.0
    derivative_cutoff: 1.0
  robust:
    min_cutoff: 1.0
    beta: 8.0
    derivative_cutoff: 1.0

# Device to working frame offset
playspace:
  translation: [0.0, 0.0, 0.0]
  yaw_degrees: 0.0
"#;
