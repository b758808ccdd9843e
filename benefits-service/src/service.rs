use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use logger_redacted::redacted_info;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculator::get_collect_amount;
use crate::error::{BenefitsError, BenefitsResult};
use crate::models::{BenefitsUpdate, CollectionPrompt, Patient, PatientBenefits};
use crate::repository::BenefitsRepository;

/// Benefits service
pub struct BenefitsService<R: BenefitsRepository> {
    repository: Arc<R>,
}

impl<R: BenefitsRepository> BenefitsService<R> {
    /// Create a new benefits service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    async fn require_patient(&self, patient_id: Uuid) -> BenefitsResult<Patient> {
        self.repository
            .get_patient(patient_id)
            .await?
            .ok_or(BenefitsError::PatientNotFound(patient_id))
    }

    /// Amount to collect for a visit today, with plan-year context
    ///
    /// # Errors
    ///
    /// [`BenefitsError::PatientNotFound`] for an unknown patient, or a repository error.
    pub async fn collection_prompt(
        &self,
        patient_id: Uuid,
        today: NaiveDate,
    ) -> BenefitsResult<CollectionPrompt> {
        let (patient, benefits) = tokio::try_join!(
            self.repository.get_patient(patient_id),
            self.repository.get_benefits(patient_id),
        )?;
        let patient = patient.ok_or(BenefitsError::PatientNotFound(patient_id))?;

        let result = get_collect_amount(&patient, benefits.as_ref());
        let plan_year = benefits
            .as_ref()
            .map(|b| b.plan_year.period_containing(today));
        let accumulators_stale = benefits
            .as_ref()
            .is_some_and(|b| b.accumulators_stale(today));

        if accumulators_stale {
            warn!(
                patient_id = %patient_id,
                "Deductible and out-of-pocket totals predate the current plan year"
            );
        }
        if let Some(notes) = benefits.as_ref().and_then(|b| b.notes.as_deref()) {
            redacted_info!(patient_id = patient_id; "Benefits notes: {}", notes);
        }
        info!(
            patient_id = %patient_id,
            collect_amount = %result.collect_amount,
            deductible_met = result.deductible_met,
            "Collection amount computed"
        );

        Ok(CollectionPrompt {
            patient_id,
            result,
            plan_year,
            accumulators_stale,
        })
    }

    /// Save a benefits edit; the first edit creates the record
    ///
    /// # Errors
    ///
    /// [`BenefitsError::PatientNotFound`], [`BenefitsError::Validation`], or a
    /// repository error.
    pub async fn upsert_benefits(
        &self,
        patient_id: Uuid,
        update: BenefitsUpdate,
        now: DateTime<Utc>,
    ) -> BenefitsResult<PatientBenefits> {
        self.require_patient(patient_id).await?;
        let existed = self.repository.get_benefits(patient_id).await?.is_some();

        let benefits = PatientBenefits::from_update(patient_id, update, now);
        benefits.validate()?;
        self.repository.save_benefits(benefits.clone()).await?;

        info!(patient_id = %patient_id, created = !existed, "Benefits saved");
        Ok(benefits)
    }

    /// Count a collected patient payment toward the deductible and out-of-pocket totals
    ///
    /// # Errors
    ///
    /// [`BenefitsError::InvalidAmount`] for a negative amount,
    /// [`BenefitsError::BenefitsNotFound`] when there are no accumulators to update.
    pub async fn record_patient_payment(
        &self,
        patient_id: Uuid,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> BenefitsResult<PatientBenefits> {
        if amount < Decimal::ZERO {
            return Err(BenefitsError::InvalidAmount(amount));
        }

        let mut benefits = self
            .repository
            .get_benefits(patient_id)
            .await?
            .ok_or(BenefitsError::BenefitsNotFound(patient_id))?;

        if benefits.roll_over_plan_year(now.date_naive()) {
            warn!(
                patient_id = %patient_id,
                "New plan year, deductible and out-of-pocket totals reset before applying payment"
            );
        }
        let was_met = benefits.deductible_met();
        benefits.apply_patient_payment(amount, now);
        self.repository.save_benefits(benefits.clone()).await?;

        if !was_met && benefits.deductible_met() {
            info!(patient_id = %patient_id, "Deductible met");
        }
        info!(
            patient_id = %patient_id,
            amount = %amount,
            deductible_paid = %benefits.deductible_paid,
            oop_paid = %benefits.oop_paid,
            "Patient payment applied to benefits"
        );
        Ok(benefits)
    }
}
