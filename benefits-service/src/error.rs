use std::collections::BTreeMap;

use error_common::PracticeError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BenefitsError {
    #[error("Patient not found: {0}")]
    PatientNotFound(Uuid),

    #[error("No benefits on file for patient {0}")]
    BenefitsNotFound(Uuid),

    #[error("Invalid benefits: {}", .errors.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation { errors: BTreeMap<String, String> },

    #[error("Invalid payment amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Repository error: {0}")]
    Repository(String),
}

pub type BenefitsResult<T> = Result<T, BenefitsError>;

impl From<BenefitsError> for PracticeError {
    fn from(err: BenefitsError) -> Self {
        match err {
            BenefitsError::PatientNotFound(id) => PracticeError::PatientNotFound(id.to_string()),
            BenefitsError::BenefitsNotFound(id) => {
                PracticeError::NotFound(format!("benefits for patient {id}"))
            }
            BenefitsError::Validation { errors } => PracticeError::Validation { errors },
            BenefitsError::InvalidAmount(amount) => {
                PracticeError::validation([("amount", format!("must not be negative, got {amount}"))])
            }
            BenefitsError::Repository(msg) => PracticeError::Repository(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_codes_after_conversion() {
        let err: PracticeError = BenefitsError::PatientNotFound(Uuid::nil()).into();
        assert_eq!(err.code(), "NOT_FOUND_2001");

        let err: PracticeError = BenefitsError::InvalidAmount(dec!(-1)).into();
        assert_eq!(err.code(), "VALIDATION_1001");
        assert!(err.is_client_error());
    }
}
