//! semlint - Semantic HTML Checker
//!
//! A heuristic rule-evaluation engine that inspects a parsed HTML document
//! and reports semantic, accessibility and SEO-cleanup problems.
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> Checker -> classify (one pass) -> CandidatePools
//!                    -> Detectors (independent, isolated)
//!                    -> severity-sorted CheckResult -> CheckReport
//! ```
//!
//! The classifier walks the tree exactly once and buckets nodes into typed
//! candidate pools. Each detector is a pure function of those pools; none
//! re-traverses the document. The aggregated result is severity-sorted and
//! projects into a serializable report for hosts.
//!
//! # Example
//!
//! ```
//! use semlint::{Checker, Config};
//!
//! let checker = Checker::new(Config::default()).unwrap();
//! let report = checker
//!     .check_source("<html><body><h2>No main title</h2></body></html>")
//!     .unwrap();
//! assert!(report.issues.iter().any(|i| i.rule == "missing_h1"));
//! ```

pub mod checker;
pub mod classify;
pub mod config;
pub mod detectors;
pub mod dom;
pub mod error;
pub mod exclude;
pub mod issue;
pub mod output;
pub mod patterns;
pub mod report;
pub mod rules;
pub mod score;

// Re-export main types
pub use checker::Checker;
pub use classify::{classify, CandidatePools, HeadingPools};
pub use config::{ColorMode, Config, OutputFormat};
pub use detectors::{CheckContext, Detector};
pub use error::{CheckError, ConfigError, DetectorError};
pub use exclude::ExclusionFilter;
pub use issue::{Category, CheckResult, Issue, PageInfo, ScanStats, Severity};
pub use output::{GroupedFormatter, JsonFormatter, OutputFormatter, TextFormatter};
pub use report::{CheckReport, IssueReport};
pub use rules::{rule, Rule, ALL_RULES};
pub use score::{Confidence, Signal};
