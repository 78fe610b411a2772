use tally_types::RecognizedLine;

/// Result of one recognition request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrOutput {
    /// Full transcription as the engine returned it
    pub text: String,
    /// Non-blank lines in reading order
    pub lines: Vec<RecognizedLine>,
}

impl OcrOutput {
    /// Split plain engine output into lines, dropping blank ones and page breaks
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text
            .lines()
            .map(|line| line.trim_matches(|c: char| c == '\u{c}' || c.is_whitespace()))
            .filter(|line| !line.is_empty())
            .map(RecognizedLine::new)
            .collect();

        Self { text, lines }
    }

    pub fn from_lines(lines: Vec<RecognizedLine>) -> Self {
        let text = lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self { text, lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_skips_blank_lines() {
        let output = OcrOutput::from_text("STORE 42\n\n  Milk 2.00 \nTOTAL 2.00\n\u{c}");
        let texts: Vec<_> = output.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["STORE 42", "Milk 2.00", "TOTAL 2.00"]);
    }

    #[test]
    fn test_from_lines_joins_text() {
        let output = OcrOutput::from_lines(vec!["a".into(), "b".into()]);
        assert_eq!(output.text, "a\nb");
    }
}
