//! Turning a receipt line into an amount.
//!
//! The rules are deliberately loose: a line counts when it contains "total"
//! in any case, and its amount is whatever is left after dropping letters,
//! whitespace and the usual currency punctuation.

const TOTAL_MARKER: &str = "total";

/// Case-insensitive substring test for the TOTAL marker
pub fn is_total_line(text: &str) -> bool {
    text.to_lowercase().contains(TOTAL_MARKER)
}

/// Remove whitespace, ASCII letters, `,` `$` `(` `)` and `:` from `text`
pub fn strip_amount(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !(c.is_whitespace()
                || c.is_ascii_alphabetic()
                || matches!(c, ',' | '$' | '(' | ')' | ':'))
        })
        .collect()
}

/// Parse the numeric payload of a TOTAL line.
///
/// Returns NaN when nothing numeric survives stripping. NaN is not an error
/// here: it is added to the running total like any other amount.
pub fn parse_amount(text: &str) -> f64 {
    let stripped = strip_amount(text);
    if stripped.is_empty() {
        return f64::NAN;
    }
    stripped.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_any_case() {
        for text in ["total", "Total", "TOTAL", "ToTaL", "Grand total: 3"] {
            assert!(is_total_line(text), "{text}");
        }
        assert!(!is_total_line("TAX $1.00"));
        assert!(!is_total_line("TOT AL"));
    }

    #[test]
    fn test_strip_amount() {
        assert_eq!(strip_amount("TOTAL: $12.50"), "12.50");
        assert_eq!(strip_amount("Total (USD): 1,234.00"), "1234.00");
        assert_eq!(strip_amount("TOTAL -$3"), "-3");
        assert_eq!(strip_amount("TOTAL abc"), "");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("TOTAL: $12.50"), 12.5);
        assert_eq!(parse_amount("TOTAL $5"), 5.0);
        assert_eq!(parse_amount("Total due: -4.25"), -4.25);
        assert_eq!(parse_amount("TOTAL 1,234.56"), 1234.56);
    }

    #[test]
    fn test_parse_amount_nan() {
        assert!(parse_amount("TOTAL abc").is_nan());
        assert!(parse_amount("TOTAL").is_nan());
        assert!(parse_amount("TOTAL #12").is_nan());
        assert!(parse_amount("TOTAL 1.2.3").is_nan());
        assert!(parse_amount("TOTAL -").is_nan());
    }
}
