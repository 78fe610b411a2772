use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_config::Config;
use tally_config::camera::SourceKind;
use tally_config::ocr::OcrEngineKind;

#[derive(Parser, Debug)]
#[command(
    name = "receipt-tally",
    version,
    about = "Keep a running total of receipt TOTAL lines read by OCR"
)]
pub struct Cli {
    /// Frame source: camera, screen or file:<path>
    #[arg(long, global = true)]
    pub source: Option<SourceKind>,

    /// OCR language, e.g. eng
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// OCR engine: tesseract or windows
    #[arg(long, global = true)]
    pub engine: Option<OcrEngineKind>,

    /// NFKC-normalize OCR lines (full-width glyphs) before matching TOTAL
    #[arg(long, global = true)]
    pub normalize: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive session: capture and reset from the keyboard (default)
    Run,
    /// Treat each image as one capture and print the resulting total
    Scan {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Print the effective configuration as JSON
    Config,
}

impl Cli {
    /// Overlay command line flags on the environment configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.camera.source = source.clone();
        }
        if let Some(language) = &self.language {
            config.ocr.language = language.clone();
        }
        if let Some(engine) = self.engine {
            config.ocr.engine = engine;
        }
        if self.normalize {
            config.ocr.normalize_text = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["receipt-tally"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "receipt-tally",
            "scan",
            "a.png",
            "b.png",
            "--engine",
            "tesseract",
            "--language",
            "deu",
            "--normalize",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Scan {
                images: vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
            })
        );

        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.ocr.engine, OcrEngineKind::Tesseract);
        assert_eq!(config.ocr.language, "deu");
        assert!(config.ocr.normalize_text);
    }

    #[test]
    fn test_source_flag() {
        let cli = Cli::try_parse_from(["receipt-tally", "--source", "file:r.png"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.camera.source, SourceKind::File(PathBuf::from("r.png")));
        assert!(!config.ocr.normalize_text);
    }

    #[test]
    fn test_scan_needs_images() {
        assert!(Cli::try_parse_from(["receipt-tally", "scan"]).is_err());
        assert!(Cli::try_parse_from(["receipt-tally", "--source", "webcam"]).is_err());
    }
}
