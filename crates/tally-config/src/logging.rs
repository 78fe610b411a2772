use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{env_flag, env_or};

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    #[serde(default = "default_level")]
    pub level: String,
    pub json: bool,
    /// Write a daily rolling log file here instead of stderr
    pub dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self {
            level: env_or("TALLY_LOG_LEVEL", default_level()),
            json: env_flag("TALLY_LOG_JSON", false),
            dir: env::var_os("TALLY_LOG_DIR").map(PathBuf::from),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            dir: None,
        }
    }
}
