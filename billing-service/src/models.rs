use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};

/// Payment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(default)]
    pub claim_id: Option<Uuid>,
    /// Always positive; a refund is its own record with status `refunded`
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub is_copay: bool,
    pub status: PaymentStatus,
    pub received_date: DateTime<Utc>,
    #[serde(default)]
    pub check_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Original payment this refund reverses
    #[serde(default)]
    pub refund_of: Option<Uuid>,
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Check,
    Ach,
    Wire,
    Insurance,
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl Payment {
    /// Check the fields a statement depends on
    ///
    /// # Errors
    ///
    /// [`BillingError::Validation`] with one entry per offending field.
    pub fn validate(&self) -> BillingResult<()> {
        let mut errors = BTreeMap::new();

        if self.amount <= Decimal::ZERO {
            errors.insert("amount".to_string(), "must be greater than zero".to_string());
        }
        if self.amount.scale() > 2 {
            errors.insert("amount".to_string(), "must be whole cents".to_string());
        }
        if self.payment_method == PaymentMethod::Check && self.check_number.is_none() {
            errors.insert(
                "check_number".to_string(),
                "required for check payments".to_string(),
            );
        }
        if self.refund_of.is_some() && self.status != PaymentStatus::Refunded {
            errors.insert(
                "status".to_string(),
                "refund records must have status refunded".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BillingError::Validation { errors })
        }
    }

    /// Refund record reversing `amount` of this payment
    pub fn refund(&self, amount: Decimal, now: DateTime<Utc>) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            amount,
            status: PaymentStatus::Refunded,
            received_date: now,
            check_number: None,
            notes: None,
            refund_of: Some(self.id),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn payment() -> Payment {
        Payment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            claim_id: None,
            amount: dec!(25.00),
            payment_method: PaymentMethod::CreditCard,
            is_copay: true,
            status: PaymentStatus::Completed,
            received_date: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
            check_number: None,
            notes: None,
            refund_of: None,
        }
    }

    #[test]
    fn test_valid_payment() {
        assert!(payment().validate().is_ok());
    }

    #[test]
    fn test_validation_errors_by_field() {
        let bad = Payment {
            amount: dec!(-5),
            payment_method: PaymentMethod::Check,
            ..payment()
        };
        match bad.validate() {
            Err(BillingError::Validation { errors }) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.contains_key("amount"));
                assert!(errors.contains_key("check_number"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_fractional_cents_rejected() {
        let bad = Payment {
            amount: dec!(10.005),
            ..payment()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_refund_record_links_original() {
        let original = payment();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let refund = original.refund(dec!(10), now);

        assert_ne!(refund.id, original.id);
        assert_eq!(refund.refund_of, Some(original.id));
        assert_eq!(refund.status, PaymentStatus::Refunded);
        assert_eq!(refund.payment_method, original.payment_method);
        assert!(refund.is_copay);
        assert!(refund.validate().is_ok());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(payment()).unwrap();
        assert_eq!(json["payment_method"], "credit_card");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["amount"], "25.00");
    }
}
