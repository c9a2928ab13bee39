//! Configuration for the checker engine and CLI
//!
//! Reads configuration from:
//! - `.semlintrc.yaml` / `.semlintrc.json` (project-level)
//! - `~/.semlintrc.yaml` (user-level)

use crate::error::ConfigError;
use crate::issue::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Engine settings (multi-document CLI runs only; a single check is
/// always synchronous)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Check multiple files in parallel
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Show scan statistics
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            statistics: false,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Grouped,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "grouped" => Ok(OutputFormat::Grouped),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Exclusion settings: the tool's own reserved namespace plus
/// host-designated regions that no detector may look at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Element ids owned by the tool's injected UI
    pub reserved_ids: Vec<String>,

    /// Class-name prefixes owned by the tool's injected UI
    pub reserved_class_prefixes: Vec<String>,

    /// Ancestor selectors for host regions to skip entirely
    /// (e.g. shared header/footer wrappers maintained elsewhere)
    pub excluded_selectors: Vec<String>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            reserved_ids: vec![
                "html-semantic-checker-drawer".to_string(),
                "html-semantic-checker-styles".to_string(),
                "html-semantic-checker-highlight-styles".to_string(),
            ],
            reserved_class_prefixes: vec![
                "hsc-".to_string(),
                "html-semantic-checker".to_string(),
            ],
            excluded_selectors: Vec::new(),
        }
    }
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Enabled rules (empty = all)
    pub enabled: Vec<String>,

    /// Severity overrides (rule_id -> severity)
    pub severity: HashMap<String, Severity>,
}

/// Cleanup signature lists. The matching mechanism is fixed; the literal
/// signatures are deployment data, so they live here with defaults that
/// reproduce the common legacy stacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Legacy analytics patterns (regex, matched against script text and src)
    pub analytics_patterns: Vec<String>,

    /// Known-orphaned tag-manager container ids. Empty means "surface every
    /// container-shaped id for review".
    pub tag_manager_ids: Vec<String>,

    /// Vendor analytics signatures (regex)
    pub vendor_patterns: Vec<String>,

    /// Ancestor selectors marking meta tags as intentionally retained
    /// (templating conditionals the host controls)
    pub retained_meta_selectors: Vec<String>,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            analytics_patterns: vec![
                r"UA-\d+-\d+".to_string(),
                r"_gat\._getTracker".to_string(),
                r"pageTracker".to_string(),
                r"google-analytics\.com/ga\.js".to_string(),
            ],
            tag_manager_ids: Vec::new(),
            vendor_patterns: vec![
                r"/sitecatalyst/s_code\.js".to_string(),
                r"s_code\.js".to_string(),
                r"omniture\.js".to_string(),
                r"(?i)sitecatalyst".to_string(),
                r"s_gi\s*\(".to_string(),
                r"sendSiteCatalyst".to_string(),
            ],
            retained_meta_selectors: Vec::new(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Exclusion settings
    pub exclude: ExclusionConfig,

    /// Rule settings
    pub rules: RulesConfig,

    /// Cleanup signature data
    pub signatures: SignatureConfig,

    /// URL of the page being checked (enables exact-URL matching for
    /// aria-current detection). The CLI sets this from --url.
    pub page_url: Option<String>,
}

impl Config {
    /// Load configuration from a specific file (YAML or JSON by extension)
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Ok(serde_yaml::from_str(&content)?),
        }
    }

    /// Discover configuration: explicit path, project file, user file,
    /// or defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        for name in [".semlintrc.yaml", ".semlintrc.yml", ".semlintrc.json"] {
            let candidate = PathBuf::from(name);
            if candidate.exists() {
                return Self::load_file(&candidate);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let candidate = home.join(".semlintrc.yaml");
            if candidate.exists() {
                return Self::load_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    /// Check whether a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if self.rules.disabled.iter().any(|id| id == rule_id) {
            return false;
        }
        if !self.rules.enabled.is_empty() {
            return self.rules.enabled.iter().any(|id| id == rule_id);
        }
        true
    }

    /// Get a severity override for a rule, if configured
    pub fn severity_override(&self, rule_id: &str) -> Option<Severity> {
        self.rules.severity.get(rule_id).copied()
    }
}
