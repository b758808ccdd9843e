// Validation of the merged configuration
use crate::engine::EngineConfig;
use crate::error::{ConfigError, Result};

/// Referral authorizations rarely run longer than a year
const MAX_EXPIRING_SOON_DAYS: u32 = 365;

impl EngineConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }

        if self.referrals.expiring_soon_days > MAX_EXPIRING_SOON_DAYS {
            return Err(ConfigError::ValidationError(format!(
                "referrals.expiring_soon_days must be at most {MAX_EXPIRING_SOON_DAYS}, got {}",
                self.referrals.expiring_soon_days
            )));
        }

        Ok(())
    }
}
