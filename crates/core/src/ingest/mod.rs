pub mod parse;
pub mod source;

pub use parse::{latest_day, parse_transactions};
pub use source::{CsvFileSource, DataSource, HttpCsvSource};
