//! Patient collection-amount calculation.
//!
//! Pure functions: no I/O, no errors. Inputs are clamped rather than
//! rejected, so a half-filled benefits form still produces an answer.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CollectionResult, Patient, PatientBenefits};

pub const OOP_MAX_MET: &str = "OOP max met.";

/// Numbers the calculator works from, extracted from a benefits record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInput {
    pub allowed_amount: Decimal,
    pub deductible_amount: Decimal,
    pub deductible_paid: Decimal,
    pub coinsurance_percent: Decimal,
    pub oop_max: Option<Decimal>,
    pub oop_paid: Decimal,
}

impl CollectionInput {
    pub fn from_benefits(benefits: &PatientBenefits) -> Self {
        Self {
            allowed_amount: benefits.allowed_amount,
            deductible_amount: benefits.deductible_amount,
            deductible_paid: benefits.deductible_paid,
            coinsurance_percent: benefits.coinsurance_percent,
            oop_max: benefits.oop_max,
            oop_paid: benefits.oop_paid,
        }
    }

    /// Money clamped to >= 0 and rounded to cents; coinsurance clamped to 0-100
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            allowed_amount: money(self.allowed_amount),
            deductible_amount: money(self.deductible_amount),
            deductible_paid: money(self.deductible_paid),
            coinsurance_percent: self
                .coinsurance_percent
                .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
            oop_max: self.oop_max.map(money),
            oop_paid: money(self.oop_paid),
        }
    }
}

/// How much to collect from `patient` today.
///
/// Falls back to the patient's default copay when `benefits` is `None`.
pub fn get_collect_amount(patient: &Patient, benefits: Option<&PatientBenefits>) -> CollectionResult {
    match benefits {
        Some(benefits) => compute_collection(&CollectionInput::from_benefits(benefits)),
        None => default_copay(patient),
    }
}

fn default_copay(patient: &Patient) -> CollectionResult {
    let Some(copay) = patient.default_copay_amount.map(money) else {
        debug!(patient_id = %patient.id, "No benefits and no default copay");
        return CollectionResult {
            collect_amount: Decimal::ZERO,
            deductible_met: false,
            explanation: "No benefits on file and no default copay set.".to_string(),
        };
    };

    debug!(patient_id = %patient.id, copay = %copay, "No benefits, using default copay");
    CollectionResult {
        collect_amount: copay,
        deductible_met: false,
        explanation: format!("No benefits on file. Collecting default copay of {}.", usd(copay)),
    }
}

/// Collection amount for a patient with benefits on file
pub fn compute_collection(input: &CollectionInput) -> CollectionResult {
    let input = input.sanitized();
    let deductible_met = input.deductible_paid >= input.deductible_amount;

    if let Some(oop_max) = input.oop_max {
        if input.oop_paid >= oop_max {
            debug!(oop_paid = %input.oop_paid, oop_max = %oop_max, "Out-of-pocket max met");
            return CollectionResult {
                collect_amount: Decimal::ZERO,
                deductible_met,
                explanation: OOP_MAX_MET.to_string(),
            };
        }
    }

    if !deductible_met {
        let remaining = input.deductible_amount - input.deductible_paid;
        let (owed, capped) = cap_at_oop_room(input.allowed_amount.min(remaining), &input);
        debug!(remaining = %remaining, owed = %owed, capped, "Deductible active");

        let mut explanation = format!(
            "Deductible active: {} of {} remaining. Collecting {} toward deductible.",
            usd(remaining),
            usd(input.deductible_amount),
            usd(owed)
        );
        if capped {
            explanation.push_str(&format!(" Capped at {} remaining out-of-pocket.", usd(owed)));
        }
        return CollectionResult {
            collect_amount: owed,
            deductible_met,
            explanation,
        };
    }

    let coinsurance = input.allowed_amount * input.coinsurance_percent / Decimal::ONE_HUNDRED;
    let (owed, capped) = cap_at_oop_room(coinsurance, &input);
    debug!(coinsurance = %coinsurance, owed = %owed, capped, "Coinsurance applied");

    let mut explanation = format!(
        "Deductible met. {}% coinsurance applied to {} allowed amount.",
        input.coinsurance_percent.normalize(),
        usd(input.allowed_amount)
    );
    if capped {
        explanation.push_str(&format!(" Capped at {} remaining out-of-pocket.", usd(owed)));
    }

    CollectionResult {
        collect_amount: owed,
        deductible_met,
        explanation,
    }
}

// Owed amount limited to what is left under the out-of-pocket max, and whether the limit applied
fn cap_at_oop_room(amount: Decimal, input: &CollectionInput) -> (Decimal, bool) {
    let room = input.oop_max.map(|max| max - input.oop_paid);
    match room {
        Some(room) if amount > room => (round_cents(room), true),
        _ => (round_cents(amount), false),
    }
}

fn money(amount: Decimal) -> Decimal {
    round_cents(amount.max(Decimal::ZERO))
}

// Always scale 2, so serialized amounts read as cents
fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

fn usd(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan_year::PlanYearType;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn input() -> CollectionInput {
        CollectionInput {
            allowed_amount: dec!(88),
            deductible_amount: dec!(625),
            deductible_paid: dec!(0),
            coinsurance_percent: dec!(10),
            oop_max: Some(dec!(2000)),
            oop_paid: dec!(0),
        }
    }

    fn patient(copay: Option<Decimal>) -> Patient {
        Patient {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            default_copay_amount: copay,
            insurance_name: Some("Regence".to_string()),
        }
    }

    #[test]
    fn test_full_allowed_amount_goes_to_deductible() {
        let result = compute_collection(&input());
        assert_eq!(result.collect_amount, dec!(88));
        assert!(!result.deductible_met);
        assert_eq!(
            result.explanation,
            "Deductible active: $625.00 of $625.00 remaining. Collecting $88.00 toward deductible."
        );
    }

    #[test]
    fn test_remaining_deductible_smaller_than_allowed() {
        let result = compute_collection(&CollectionInput {
            deductible_paid: dec!(600),
            ..input()
        });
        assert_eq!(result.collect_amount, dec!(25));
        assert!(!result.deductible_met);
    }

    #[test]
    fn test_coinsurance_after_deductible_met() {
        let result = compute_collection(&CollectionInput {
            deductible_paid: dec!(625),
            ..input()
        });
        assert_eq!(result.collect_amount, dec!(8.80));
        assert!(result.deductible_met);
        assert_eq!(
            result.explanation,
            "Deductible met. 10% coinsurance applied to $88.00 allowed amount."
        );
    }

    #[test]
    fn test_coinsurance_capped_by_oop_room() {
        let result = compute_collection(&CollectionInput {
            deductible_paid: dec!(625),
            oop_paid: dec!(1995),
            ..input()
        });
        assert_eq!(result.collect_amount, dec!(5));
        assert!(result.explanation.ends_with("Capped at $5.00 remaining out-of-pocket."));
    }

    #[test]
    fn test_deductible_phase_capped_by_oop_room() {
        let result = compute_collection(&CollectionInput {
            oop_max: Some(dec!(100)),
            oop_paid: dec!(90),
            ..input()
        });
        assert_eq!(result.collect_amount, dec!(10));
        assert!(!result.deductible_met);
        assert_eq!(
            result.explanation,
            "Deductible active: $625.00 of $625.00 remaining. Collecting $10.00 toward deductible. \
             Capped at $10.00 remaining out-of-pocket."
        );
    }

    #[test]
    fn test_oop_met_overrides_deductible() {
        let result = compute_collection(&CollectionInput {
            oop_paid: dec!(2000),
            ..input()
        });
        assert_eq!(result.collect_amount, Decimal::ZERO);
        assert!(!result.deductible_met);
        assert_eq!(result.explanation, OOP_MAX_MET);
    }

    #[test]
    fn test_zero_oop_max_is_met() {
        let result = compute_collection(&CollectionInput {
            oop_max: Some(Decimal::ZERO),
            ..input()
        });
        assert_eq!(result.collect_amount, Decimal::ZERO);
    }

    #[test]
    fn test_no_oop_max_means_no_ceiling() {
        let result = compute_collection(&CollectionInput {
            deductible_paid: dec!(625),
            coinsurance_percent: dec!(20),
            oop_max: None,
            oop_paid: dec!(50000),
            ..input()
        });
        assert_eq!(result.collect_amount, dec!(17.60));
    }

    #[test]
    fn test_negative_and_out_of_range_inputs_are_clamped() {
        let result = compute_collection(&CollectionInput {
            allowed_amount: dec!(88),
            deductible_amount: dec!(-100),
            deductible_paid: dec!(-5),
            coinsurance_percent: dec!(150),
            oop_max: Some(dec!(5000)),
            oop_paid: dec!(-20),
        });
        assert!(result.deductible_met);
        assert_eq!(result.collect_amount, dec!(88));
    }

    #[test]
    fn test_coinsurance_rounds_half_away_from_zero() {
        let result = compute_collection(&CollectionInput {
            allowed_amount: dec!(87.25),
            deductible_paid: dec!(625),
            coinsurance_percent: dec!(15),
            ..input()
        });
        // 87.25 * 0.15 = 13.0875
        assert_eq!(result.collect_amount, dec!(13.09));
        assert_eq!(
            result.explanation,
            "Deductible met. 15% coinsurance applied to $87.25 allowed amount."
        );
    }

    #[test]
    fn test_default_copay_without_benefits() {
        let result = get_collect_amount(&patient(Some(dec!(25))), None);
        assert_eq!(result.collect_amount, dec!(25));
        assert!(!result.deductible_met);
        assert_eq!(
            result.explanation,
            "No benefits on file. Collecting default copay of $25.00."
        );
    }

    #[test]
    fn test_no_benefits_and_no_copay() {
        let result = get_collect_amount(&patient(None), None);
        assert_eq!(result.collect_amount, Decimal::ZERO);
        assert!(result.explanation.starts_with("No benefits on file"));
    }

    #[test]
    fn test_benefits_take_precedence_over_default_copay() {
        let p = patient(Some(dec!(25)));
        let benefits = PatientBenefits {
            patient_id: p.id,
            deductible_amount: dec!(0),
            deductible_paid: dec!(0),
            coinsurance_percent: dec!(20),
            oop_max: None,
            oop_paid: dec!(0),
            allowed_amount: dec!(95),
            plan_year: PlanYearType::Calendar,
            notes: None,
            updated_at: None,
        };
        let result = get_collect_amount(&p, Some(&benefits));
        assert_eq!(result.collect_amount, dec!(19));
        assert!(result.deductible_met);
    }
}
