use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_index() -> u32 {
    0
}

fn default_width() -> u32 {
    720
}

fn default_height() -> u32 {
    480
}

/// Where captured frames come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Camera,
    Screen,
    /// Still image re-read from disk on every capture
    File(PathBuf),
}

impl Default for SourceKind {
    fn default() -> Self {
        SourceKind::Camera
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix("file:") {
            if path.is_empty() {
                return Err("file source needs a path, e.g. file:receipt.png".to_string());
            }
            return Ok(SourceKind::File(PathBuf::from(path)));
        }

        match s.to_ascii_lowercase().as_str() {
            "camera" => Ok(SourceKind::Camera),
            "screen" => Ok(SourceKind::Screen),
            other => Err(format!(
                "unknown source '{other}', expected camera, screen or file:<path>"
            )),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Camera => write!(f, "camera"),
            SourceKind::Screen => write!(f, "screen"),
            SourceKind::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// Which way the preferred camera points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Rear camera, pointed away from the user
    #[default]
    Environment,
    User,
}

impl FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "environment" | "rear" | "back" => Ok(Facing::Environment),
            "user" | "front" => Ok(Facing::User),
            other => Err(format!("unknown facing mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub source: SourceKind,
    #[serde(default = "default_index")]
    pub index: u32,
    /// Ideal frame width, the device may pick the closest it supports
    #[serde(default = "default_width")]
    pub ideal_width: u32,
    #[serde(default = "default_height")]
    pub ideal_height: u32,
    pub facing: Facing,
}

impl CameraConfig {
    pub fn new() -> Self {
        let source = env::var("TALLY_SOURCE")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(source) => Some(source),
                Err(e) => {
                    tracing::warn!("ignoring TALLY_SOURCE: {e}");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            source,
            index: env_or("TALLY_CAMERA_INDEX", default_index()),
            ideal_width: env_or("TALLY_CAMERA_WIDTH", default_width()),
            ideal_height: env_or("TALLY_CAMERA_HEIGHT", default_height()),
            facing: env_or("TALLY_CAMERA_FACING", Facing::default()),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            index: default_index(),
            ideal_width: default_width(),
            ideal_height: default_height(),
            facing: Facing::default(),
        }
    }
}
