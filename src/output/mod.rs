//! Output of aggregation results.
//!
//! - [`text`] - One CIDR per line files and the JSON summary
//! - [`terminal`] - End of run summary on stdout

mod terminal;
mod text;

pub use terminal::{format_row, print_summary, summary_lines};
pub use text::{write_cidr_file, write_result, write_summary_json};
