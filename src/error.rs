//! Error types for the checker engine

use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Error produced while running a check
#[derive(Debug, Error)]
pub enum CheckError {
    /// The caller handed us nothing to scan. Distinct from "no problems
    /// found" so callers can tell an empty result from a skipped scan.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure inside a single detector. Never aborts the whole check;
/// the engine logs it and keeps the other detectors' issues.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("detector '{detector}' failed: {message}")]
    Failed { detector: String, message: String },
}

impl DetectorError {
    pub fn failed(detector: &str, message: impl Into<String>) -> Self {
        Self::Failed {
            detector: detector.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = CheckError::InvalidInput("empty document".to_string());
        assert_eq!(format!("{}", err), "Invalid input: empty document");
    }

    #[test]
    fn test_detector_error_display() {
        let err = DetectorError::failed("heading", "bad selector");
        assert_eq!(
            format!("{}", err),
            "detector 'heading' failed: bad selector"
        );
    }
}
