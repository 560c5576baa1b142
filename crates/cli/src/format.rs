//! Output formatting for merge results and errors.

use std::path::Path;

use orbit_merge::MergeSummary;
use serde_json::json;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a finished merge.
pub fn format_summary(output: &Path, summary: &MergeSummary, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format!("Saved → {}\n{}", output.display(), summary.summary()),
        OutputMode::Json => json!({
            "output": output.display().to_string(),
            "summary": summary,
        })
        .to_string(),
    }
}

/// Format an error message.
pub fn format_error(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format!("(error) {}", message),
        OutputMode::Json => json!({ "error": message }).to_string(),
    }
}
