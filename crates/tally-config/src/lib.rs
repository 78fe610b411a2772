use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::camera::CameraConfig;
use self::logging::LoggingConfig;
use self::ocr::OcrConfig;

pub mod camera;
pub mod logging;
pub mod ocr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub camera: CameraConfig,
    pub ocr: OcrConfig,
    pub logging: LoggingConfig,

    /// Capacity of the channel carrying user actions to the event loop
    pub action_queue: usize,
}

impl Config {
    pub fn new() -> Self {
        let action_queue = env_or("TALLY_ACTION_QUEUE", 64);

        Config {
            camera: CameraConfig::new(),
            ocr: OcrConfig::new(),
            logging: LoggingConfig::new(),

            action_queue,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            ocr: OcrConfig::default(),
            logging: LoggingConfig::default(),
            action_queue: 64,
        }
    }
}

/// Read `key` from the environment, falling back to `default` when unset or unparsable
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("ignoring invalid value {raw:?} for {key}");
                default
            }
        },
        Err(_) => default,
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|raw| parse_flag(&raw))
        .unwrap_or(default)
}
