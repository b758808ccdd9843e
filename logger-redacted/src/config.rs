// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set and respected
    pub level: String,
    /// Let `RUST_LOG` replace `level`; off when the level was forced on the command line
    pub respect_rust_log: bool,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
    pub redaction_enabled: bool,
    /// Replace redacted values with a short hash instead of a mask
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<CustomPattern>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            respect_rust_log: true,
            json: false,
            redaction_enabled: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// Practice-specific pattern, e.g. an internal chart number format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPattern {
    pub pattern: String,
    pub replacement: String,
}
