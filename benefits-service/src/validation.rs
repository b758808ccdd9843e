use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{BenefitsError, BenefitsResult};
use crate::models::PatientBenefits;

impl PatientBenefits {
    /// Check a benefits edit before it is saved.
    ///
    /// The calculator never calls this; it clamps instead.
    ///
    /// # Errors
    ///
    /// Returns [`BenefitsError::Validation`] with one message per offending field.
    pub fn validate(&self) -> BenefitsResult<()> {
        let mut errors = BTreeMap::new();

        let amounts = [
            ("deductible_amount", Some(self.deductible_amount)),
            ("deductible_paid", Some(self.deductible_paid)),
            ("oop_max", self.oop_max),
            ("oop_paid", Some(self.oop_paid)),
            ("allowed_amount", Some(self.allowed_amount)),
        ];
        for (field, value) in amounts {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                errors.insert(field.to_string(), "Amount cannot be negative.".to_string());
            }
        }

        if self.coinsurance_percent < Decimal::ZERO || self.coinsurance_percent > Decimal::ONE_HUNDRED {
            errors.insert(
                "coinsurance_percent".to_string(),
                "Coinsurance must be between 0 and 100 percent.".to_string(),
            );
        }

        if self.deductible_paid > self.deductible_amount {
            errors.entry("deductible_paid".to_string()).or_insert_with(|| {
                "Deductible paid cannot exceed the deductible amount.".to_string()
            });
        }

        if let Some(oop_max) = self.oop_max {
            if self.oop_paid > oop_max {
                errors.entry("oop_paid".to_string()).or_insert_with(|| {
                    "Out-of-pocket paid cannot exceed the out-of-pocket maximum.".to_string()
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BenefitsError::Validation { errors })
        }
    }
}
