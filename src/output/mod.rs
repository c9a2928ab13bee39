//! Output formatters
//!
//! Render one or more check reports for the terminal or for machine
//! consumption. Formatters consume the serializable report, never live
//! node references.

mod grouped;
mod json;
mod text;

pub use grouped::GroupedFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::report::CheckReport;

/// A named check result: the source label (file path or URL) plus its report
pub type NamedReport = (String, CheckReport);

/// Format check reports as a string
pub trait OutputFormatter {
    fn format(&self, reports: &[NamedReport]) -> String;
}

/// Shared severity glyphs for the terminal formatters
pub(crate) fn severity_symbol(severity: crate::issue::Severity) -> &'static str {
    match severity {
        crate::issue::Severity::Error => "E",
        crate::issue::Severity::Warning => "W",
        crate::issue::Severity::Info => "I",
    }
}
