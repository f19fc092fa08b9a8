//! Output formatting module
//!
//! Report formats for headless runs.

mod formatter;

pub use formatter::{write_outcome_to_file, CaseReport, OutputFormat, ResultFormatter};
