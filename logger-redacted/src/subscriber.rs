use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggerConfig;
use crate::error::{LoggerError, LoggerResult};
use crate::redactor::{install_redactor, PiiRedactor, RedactionConfig};

/// Build the filter: `RUST_LOG` wins unless the config opts out, then the configured level
///
/// # Errors
///
/// Returns [`LoggerError::InvalidFilter`] if the configured directive does not parse.
pub fn build_filter(config: &LoggerConfig) -> LoggerResult<EnvFilter> {
    if config.respect_rust_log {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
    }
    EnvFilter::try_new(&config.level).map_err(|e| LoggerError::InvalidFilter {
        directive: config.level.clone(),
        reason: e.to_string(),
    })
}

/// Initialise the global tracing subscriber and the redactor used by the macros
///
/// # Errors
///
/// Fails on an invalid filter or custom pattern, or when a global subscriber
/// is already set.
pub fn init(config: &LoggerConfig) -> LoggerResult<()> {
    let filter = build_filter(config)?;
    let redaction = RedactionConfig::from_logger_config(config)?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };
    result.map_err(|e| LoggerError::Init(e.to_string()))?;

    if !install_redactor(PiiRedactor::new(redaction)) {
        tracing::debug!("Redactor already installed, keeping the existing one");
    }

    tracing::debug!(
        level = %config.level,
        json = config.json,
        redaction = config.redaction_enabled,
        "Logging initialised"
    );
    Ok(())
}
