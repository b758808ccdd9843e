use chrono::NaiveDate;
use figment::providers::Serialized;
use figment::Figment;
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::providers::ConfigSource;

/// Top-level configuration for the practice engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LoggerConfig,
    pub practice: PracticeSettings,
    pub referrals: ReferralSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeSettings {
    /// Display name used in command output
    pub name: Option<String>,
    /// Evaluate rules as of this date instead of today
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferralSettings {
    /// Warn when a usable referral expires within this many days
    pub expiring_soon_days: u32,
}

impl Default for ReferralSettings {
    fn default() -> Self {
        Self {
            expiring_soon_days: 14,
        }
    }
}

/// Builder that layers configuration sources over the defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigEngine {
    sources: Vec<ConfigSource>,
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source; later sources override earlier ones
    #[must_use]
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Default layering: optional `practice.yaml`, then the environment
    pub fn with_defaults() -> Self {
        Self::new()
            .add_source(ConfigSource::file("practice.yaml"))
            .add_source(ConfigSource::env())
    }

    pub fn figment(&self) -> Result<Figment> {
        self.sources.iter().try_fold(
            Figment::from(Serialized::defaults(EngineConfig::default())),
            |figment, source| source.merge_into(figment),
        )
    }

    /// Extract and validate the configuration
    ///
    /// # Errors
    ///
    /// Fails when a required source is missing, a value does not parse, or
    /// the merged configuration is invalid.
    pub fn load(&self) -> Result<EngineConfig> {
        let config: EngineConfig = self.figment()?.extract()?;
        config.validate()?;
        tracing::debug!(sources = self.sources.len(), "Configuration loaded");
        Ok(config)
    }
}
