//! Rule detectors
//!
//! One detector per concern, each a pure function of the candidate pools
//! (plus bounded secondary lookups that re-apply the exclusion predicate).
//! Detectors are independent: their order does not matter, they share no
//! state, and one failing never aborts the check - the engine logs the
//! failure and keeps the rest.

pub mod accessibility;
pub mod cleanup;
pub mod heading;
pub mod semantic;

use crate::classify::CandidatePools;
use crate::config::Config;
use crate::error::{ConfigError, DetectorError};
use crate::exclude::ExclusionFilter;
use crate::issue::Issue;
use scraper::ElementRef;

/// Read-only context shared by all detectors during one check.
///
/// `'a` is the document borrow issues inherit; `'c` is the (usually
/// shorter-lived) borrow of the engine's configuration and filters.
pub struct CheckContext<'a, 'c> {
    /// Document root
    pub root: ElementRef<'a>,
    /// Engine configuration
    pub config: &'c Config,
    /// The exclusion predicate, for secondary queries
    pub exclusion: &'c ExclusionFilter,
}

/// A rule detector: inspects pools, emits zero or more issues
pub trait Detector: Send + Sync {
    /// Detector name, for logs
    fn name(&self) -> &'static str;

    /// Run the detector over the classified pools
    fn detect<'a>(
        &self,
        ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError>;
}

/// The full built-in detector set. Cleanup signatures compile from the
/// configuration here, once, so an invalid pattern surfaces at
/// construction rather than mid-check.
pub fn default_detectors(config: &Config) -> Result<Vec<Box<dyn Detector>>, ConfigError> {
    Ok(vec![
        Box::new(heading::HeadingDetector::new()),
        Box::new(accessibility::AltTextDetector::new()),
        Box::new(accessibility::FormLabelDetector::new()),
        Box::new(accessibility::AriaStateDetector::new()),
        Box::new(accessibility::AriaRequiredDetector::new()),
        Box::new(accessibility::LinkButtonDetector::new()),
        Box::new(accessibility::LayoutTableDetector::new()),
        Box::new(semantic::DateInDivDetector::new()),
        Box::new(semantic::HeadingInDivDetector::new()),
        Box::new(semantic::ListInDivDetector::new()),
        Box::new(semantic::ArticleInDivDetector::new()),
        Box::new(cleanup::CleanupDetector::new(&config.signatures)?),
    ])
}
