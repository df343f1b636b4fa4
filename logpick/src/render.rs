//! Output rendering for a selection.

use std::str::FromStr;

use console::Style;
use logpicklib::{Errors, Selection};
use serde::Serialize;

/// How selected files are printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One path per line
    #[default]
    Plain,
    /// A single JSON object per poll
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// JSON shape of one poll
#[derive(Debug, Serialize)]
struct SelectionReport {
    files: Vec<String>,
    no_match: bool,
    errors: Vec<String>,
}

impl SelectionReport {
    fn from_selection(selection: &Selection) -> Self {
        Self {
            files: selection
                .files
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect(),
            no_match: selection.is_no_match(),
            errors: selection.errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Render the selected files for stdout.
pub fn render(selection: &Selection, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Plain => Ok(selection
            .files
            .iter()
            .map(|p| format!("{}\n", p.display()))
            .collect()),
        OutputFormat::Json => {
            let report = SelectionReport::from_selection(selection);
            Ok(format!("{}\n", serde_json::to_string(&report)?))
        }
    }
}

/// Format non-fatal causes as warning lines for stderr.
pub fn render_warnings(errors: &Errors) -> String {
    let label = Style::new().yellow().bold();
    errors
        .iter()
        .map(|e| format!("{} {}\n", label.apply_to("warning:"), e))
        .collect()
}
