use std::collections::BTreeMap;

use error_common::PracticeError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Invalid payment: {}", .errors.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation { errors: BTreeMap<String, String> },

    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    #[error("Refund of {requested} exceeds refundable balance {refundable}")]
    RefundExceedsPayment {
        requested: Decimal,
        refundable: Decimal,
    },

    #[error("Repository error: {0}")]
    Repository(String),
}

pub type BillingResult<T> = Result<T, BillingError>;

impl From<BillingError> for PracticeError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::Validation { errors } => PracticeError::Validation { errors },
            BillingError::PaymentNotFound(id) => PracticeError::NotFound(format!("payment {id}")),
            err @ BillingError::RefundExceedsPayment { .. } => {
                PracticeError::validation([("amount", err.to_string())])
            }
            BillingError::Repository(msg) => PracticeError::Repository(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_refund_overflow_is_client_error() {
        let err: PracticeError = BillingError::RefundExceedsPayment {
            requested: dec!(30),
            refundable: dec!(20),
        }
        .into();
        assert_eq!(err.code(), "VALIDATION_1001");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_missing_payment_maps_to_not_found() {
        let err: PracticeError = BillingError::PaymentNotFound(Uuid::nil()).into();
        assert_eq!(err.code(), "NOT_FOUND_2002");
    }
}
