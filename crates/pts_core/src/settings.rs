//! Per-asset import settings.
//!
//! These are the placement values an asset pipeline stores alongside each
//! imported file. They compose into the affine transform applied to every
//! point.

use std::fs;
use std::path::Path;

use pts_math::{trs, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Placement applied to imported points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Translation
    pub position: Vec3,

    /// Euler rotation in degrees (applied Z, then X, then Y)
    pub rotation: Vec3,

    /// Per-axis scale
    pub scale: Vec3,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl ImportSettings {
    /// Settings that only translate.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        trs(self.position, self.rotation, self.scale)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
