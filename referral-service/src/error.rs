use std::collections::BTreeMap;

use error_common::PracticeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferralError {
    #[error("Invalid referral: {}", .errors.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation { errors: BTreeMap<String, String> },

    #[error("Repository error: {0}")]
    Repository(String),
}

pub type ReferralResult<T> = Result<T, ReferralError>;

impl From<ReferralError> for PracticeError {
    fn from(err: ReferralError) -> Self {
        match err {
            ReferralError::Validation { errors } => PracticeError::Validation { errors },
            ReferralError::Repository(msg) => PracticeError::Repository(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_keeps_fields() {
        let mut errors = BTreeMap::new();
        errors.insert("referring_physician_npi".to_string(), "must be 10 digits".to_string());
        let err = ReferralError::Validation { errors };
        assert_eq!(err.to_string(), "Invalid referral: referring_physician_npi");

        let err: PracticeError = err.into();
        assert_eq!(err.code(), "VALIDATION_1001");
        let report = err.to_report();
        assert!(report.fields.contains_key("referring_physician_npi"));
    }
}
