use unicode_normalization::UnicodeNormalization;

/// Cleans up one recognized line before it is inspected for totals
pub trait Preprocessor: Send + Sync {
    // Default receipt preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC), folds full-width glyphs to ASCII
        let text: String = text.nfkc().collect();

        text.replace(['\n', '\r'], " ").trim().to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Hands the OCR text over untouched
pub struct Passthrough;
impl Preprocessor for Passthrough {
    fn process(&self, text: &str) -> String {
        text.to_string()
    }
}
