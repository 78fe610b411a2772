pub mod accumulator;
pub mod amount;
pub mod display;
pub mod preprocess;

pub use accumulator::{LineSummary, TotalAccumulator};
pub use amount::{is_total_line, parse_amount, strip_amount};
pub use display::{TotalDisplay, format_total};
pub use preprocess::{DefaultPreprocessor, Passthrough, Preprocessor};
