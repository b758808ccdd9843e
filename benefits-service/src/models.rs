use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::plan_year::{PlanYearPeriod, PlanYearType};

/// Patient as seen by the benefits calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Flat amount collected when no benefits are on file
    #[serde(default)]
    pub default_copay_amount: Option<Decimal>,
    #[serde(default)]
    pub insurance_name: Option<String>,
}

/// Insurance benefits snapshot, one per patient
///
/// Created on the first benefits edit and updated in place afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientBenefits {
    pub patient_id: Uuid,
    #[serde(default)]
    pub deductible_amount: Decimal,
    #[serde(default)]
    pub deductible_paid: Decimal,
    /// 0-100
    #[serde(default)]
    pub coinsurance_percent: Decimal,
    /// `None` when the plan has no out-of-pocket ceiling on file
    #[serde(default)]
    pub oop_max: Option<Decimal>,
    #[serde(default)]
    pub oop_paid: Decimal,
    /// Insurance-approved amount per visit
    #[serde(default)]
    pub allowed_amount: Decimal,
    #[serde(default)]
    pub plan_year: PlanYearType,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PatientBenefits {
    /// Apply an edit, keeping the patient link
    pub fn from_update(patient_id: Uuid, update: BenefitsUpdate, now: DateTime<Utc>) -> Self {
        Self {
            patient_id,
            deductible_amount: update.deductible_amount,
            deductible_paid: update.deductible_paid,
            coinsurance_percent: update.coinsurance_percent,
            oop_max: update.oop_max,
            oop_paid: update.oop_paid,
            allowed_amount: update.allowed_amount,
            plan_year: update.plan_year,
            notes: update.notes,
            updated_at: Some(now),
        }
    }

    pub fn deductible_met(&self) -> bool {
        self.deductible_paid >= self.deductible_amount
    }

    /// Paid amounts were last touched in an earlier plan year
    pub fn accumulators_stale(&self, today: NaiveDate) -> bool {
        let period = self.plan_year.period_containing(today);
        self.updated_at
            .is_some_and(|updated| updated.date_naive() < period.start)
    }

    /// Zero the paid totals when they belong to an earlier plan year
    ///
    /// Returns whether a reset happened. Amounts and plan terms are kept.
    pub fn roll_over_plan_year(&mut self, today: NaiveDate) -> bool {
        if !self.accumulators_stale(today) {
            return false;
        }
        self.deductible_paid = Decimal::ZERO;
        self.oop_paid = Decimal::ZERO;
        true
    }

    /// Count a collected patient payment toward the deductible and the
    /// out-of-pocket total
    pub fn apply_patient_payment(&mut self, amount: Decimal, now: DateTime<Utc>) {
        let amount = amount.max(Decimal::ZERO);
        let remaining_deductible = (self.deductible_amount - self.deductible_paid).max(Decimal::ZERO);
        self.deductible_paid += amount.min(remaining_deductible);

        let oop_paid = self.oop_paid + amount;
        self.oop_paid = match self.oop_max {
            Some(max) => oop_paid.min(max.max(self.oop_paid)),
            None => oop_paid,
        };
        self.updated_at = Some(now);
    }
}

/// Fields submitted by a benefits edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenefitsUpdate {
    pub deductible_amount: Decimal,
    pub deductible_paid: Decimal,
    pub coinsurance_percent: Decimal,
    pub oop_max: Option<Decimal>,
    pub oop_paid: Decimal,
    pub allowed_amount: Decimal,
    pub plan_year: PlanYearType,
    pub notes: Option<String>,
}

/// Amount to collect from the patient today and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionResult {
    /// Rounded to cents, never negative
    pub collect_amount: Decimal,
    pub deductible_met: bool,
    pub explanation: String,
}

/// Collection result plus the plan-year context shown in the payment prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPrompt {
    pub patient_id: Uuid,
    pub result: CollectionResult,
    pub plan_year: Option<PlanYearPeriod>,
    pub accumulators_stale: bool,
}
