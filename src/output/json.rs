//! JSON output formatter

use super::{NamedReport, OutputFormatter};
use crate::report::CheckReport;
use serde::Serialize;

/// Machine-readable formatter: an array of per-document entries
pub struct JsonFormatter {
    /// Pretty-print the output
    pub pretty: bool,
}

#[derive(Serialize)]
struct Entry<'a> {
    source: &'a str,
    #[serde(flatten)]
    report: &'a CheckReport,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, reports: &[NamedReport]) -> String {
        let entries: Vec<Entry> = reports
            .iter()
            .map(|(source, report)| Entry { source, report })
            .collect();
        let serialized = if self.pretty {
            serde_json::to_string_pretty(&entries)
        } else {
            serde_json::to_string(&entries)
        };
        serialized.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Checker;
    use crate::config::Config;

    #[test]
    fn test_json_output_parses_back() {
        let report = Checker::new(Config::default())
            .unwrap()
            .check_source("<h2>no h1</h2>")
            .unwrap();
        let output = JsonFormatter::new().format(&[("page.html".to_string(), report)]);

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["source"], "page.html");
        assert_eq!(value[0]["issues"][0]["rule"], "missing_h1");
        assert_eq!(value[0]["issues"][0]["severity"], "error");
    }
}
