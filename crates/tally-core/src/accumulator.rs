use tally_types::RecognizedLine;

use crate::amount::{is_total_line, parse_amount};
use crate::display::TotalDisplay;
use crate::preprocess::{DefaultPreprocessor, Passthrough, Preprocessor};

/// What one batch of recognized lines did to the total
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineSummary {
    pub lines: usize,
    pub matched: usize,
    /// Sum of the amounts added by this batch, NaN if any of them was
    pub amount: f64,
}

/// Running total of every TOTAL amount seen since the last reset.
///
/// Amounts are summed, never replaced, so a receipt printing both a subtotal
/// and a total contributes both. A line that fails to parse adds NaN and the
/// total stays NaN until [`TotalAccumulator::reset`]. Lines are matched
/// exactly as the OCR engine produced them unless built with
/// [`TotalAccumulator::normalized`].
pub struct TotalAccumulator {
    total: f64,
    preprocessor: Box<dyn Preprocessor>,
}

impl TotalAccumulator {
    pub fn new() -> Self {
        Self::with_preprocessor(Box::new(Passthrough))
    }

    /// Accumulator that NFKC-folds lines first, so full-width receipt glyphs
    /// read like ASCII
    pub fn normalized() -> Self {
        Self::with_preprocessor(Box::new(DefaultPreprocessor))
    }

    pub fn with_preprocessor(preprocessor: Box<dyn Preprocessor>) -> Self {
        Self {
            total: 0.0,
            preprocessor,
        }
    }

    pub fn value(&self) -> f64 {
        self.total
    }

    pub fn is_poisoned(&self) -> bool {
        self.total.is_nan()
    }

    pub fn add(&mut self, amount: f64) {
        self.total += amount;
    }

    pub fn reset(&mut self) {
        self.total = 0.0;
    }

    /// Fold recognized lines into the total, refreshing `display` after every line
    pub fn apply_lines<'a, I, D>(&mut self, lines: I, display: &mut D) -> LineSummary
    where
        I: IntoIterator<Item = &'a RecognizedLine>,
        D: TotalDisplay + ?Sized,
    {
        let mut summary = LineSummary::default();

        for line in lines {
            summary.lines += 1;
            let text = self.preprocessor.process(&line.text);

            if is_total_line(&text) {
                let amount = parse_amount(&text);
                if amount.is_nan() {
                    tracing::warn!("no amount on TOTAL line {:?}", line.text);
                } else {
                    tracing::debug!("TOTAL line {:?} -> {}", line.text, amount);
                }
                self.add(amount);
                summary.matched += 1;
                summary.amount += amount;
            }

            display.show(self.total);
        }

        summary
    }
}

impl Default for TotalAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
