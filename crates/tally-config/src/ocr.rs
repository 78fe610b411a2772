use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{env_flag, env_or};

fn default_language() -> String {
    "eng".to_string()
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_normalize() -> bool {
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrEngineKind {
    /// External `tesseract` executable
    Tesseract,
    /// Windows.Media.Ocr
    Windows,
}

impl Default for OcrEngineKind {
    fn default() -> Self {
        if cfg!(windows) {
            OcrEngineKind::Windows
        } else {
            OcrEngineKind::Tesseract
        }
    }
}

impl FromStr for OcrEngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tesseract" => Ok(OcrEngineKind::Tesseract),
            "windows" => Ok(OcrEngineKind::Windows),
            other => Err(format!("unknown OCR engine '{other}'")),
        }
    }
}

impl fmt::Display for OcrEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcrEngineKind::Tesseract => write!(f, "tesseract"),
            OcrEngineKind::Windows => write!(f, "windows"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub engine: OcrEngineKind,
    /// Recognition language, fixed for the whole session
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    /// Upper bound for one recognition call, 0 waits forever
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// NFKC-normalize recognized lines before looking for totals, off unless asked for
    #[serde(default = "default_normalize")]
    pub normalize_text: bool,
}

impl OcrConfig {
    pub fn new() -> Self {
        Self {
            engine: env_or("TALLY_OCR_ENGINE", OcrEngineKind::default()),
            language: env_or("TALLY_OCR_LANGUAGE", default_language()),
            tesseract_path: env_or("TALLY_TESSERACT_PATH", default_tesseract_path()),
            timeout_seconds: env_or("TALLY_OCR_TIMEOUT_SECONDS", default_timeout_seconds()),
            normalize_text: env_flag("TALLY_NORMALIZE_TEXT", default_normalize()),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::default(),
            language: default_language(),
            tesseract_path: default_tesseract_path(),
            timeout_seconds: default_timeout_seconds(),
            normalize_text: default_normalize(),
        }
    }
}
