//! Output formatting for CLI.

mod json;
mod progress;
mod summary;

pub use json::{JsonLayout, JsonOutput};
pub use progress::ProgressBar;
pub use summary::SummaryOutput;
