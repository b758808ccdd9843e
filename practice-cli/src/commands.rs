use std::collections::BTreeMap;
use std::sync::Arc;

use benefits_service::{
    BenefitsRepository, BenefitsService, CollectionPrompt, InMemoryBenefitsRepository, Patient,
    PatientBenefits,
};
use billing_service::{summarize_payments, Payment, PatientPaymentSummary};
use chrono::NaiveDate;
use error_common::{PracticeError, Result};
use referral_service::{
    best_referrals_by_patient, compute_referral_usage, Referral, ReferralWithUsage, Visit,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Output of `practice collect`
#[derive(Debug, Serialize)]
pub struct CollectReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice: Option<String>,
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub prompt: CollectionPrompt,
}

/// Output of `practice referrals`
#[derive(Debug, Serialize)]
pub struct ReferralReport {
    pub as_of: NaiveDate,
    pub referrals: Vec<ReferralWithUsage>,
    pub best_referral_by_patient: BTreeMap<Uuid, Uuid>,
    pub expiring_soon: Vec<Uuid>,
}

/// Output of `practice statement`
#[derive(Debug, Serialize)]
pub struct StatementReport {
    pub year: i32,
    pub statements: Vec<PatientPaymentSummary>,
    /// Payments left out because they failed validation
    pub skipped_payments: Vec<Uuid>,
}

/// Amount to collect for one patient, through the benefits service
///
/// # Errors
///
/// Fails with a validation error when the benefits belong to a different
/// patient, or with the benefits service error otherwise.
pub async fn collect(
    patient: Patient,
    benefits: Option<PatientBenefits>,
    as_of: NaiveDate,
    practice: Option<String>,
) -> Result<CollectReport> {
    let patient_id = patient.id;
    let repository = Arc::new(InMemoryBenefitsRepository::new());
    repository.insert_patient(patient);

    if let Some(benefits) = benefits {
        if benefits.patient_id != patient_id {
            return Err(PracticeError::validation([(
                "patient_id",
                format!("benefits are for patient {}, not {}", benefits.patient_id, patient_id),
            )]));
        }
        if let Err(err) = benefits.validate() {
            warn!(patient_id = %patient_id, error = %err, "Benefits on file are inconsistent, amounts will be clamped");
        }
        repository.save_benefits(benefits).await?;
    }

    let prompt = BenefitsService::new(repository)
        .collection_prompt(patient_id, as_of)
        .await?;

    Ok(CollectReport {
        practice,
        as_of,
        prompt,
    })
}

/// Usage for every referral and the default referral per patient
pub fn referrals(
    referrals: &[Referral],
    visits: &[Visit],
    as_of: NaiveDate,
    expiring_soon_days: u32,
) -> ReferralReport {
    let usages = compute_referral_usage(referrals, visits, as_of);
    let best_referral_by_patient = best_referrals_by_patient(&usages);

    let expiring_soon: Vec<Uuid> = usages
        .iter()
        .filter(|usage| usage.is_usable() && usage.expires_within(expiring_soon_days, as_of))
        .map(|usage| {
            warn!(
                referral_id = %usage.referral.id,
                patient_id = %usage.referral.patient_id,
                expires = ?usage.referral.referral_expiration_date,
                remaining = ?usage.remaining_for_display(),
                "Referral expiring soon"
            );
            usage.referral.id
        })
        .collect();

    info!(
        referrals = usages.len(),
        patients = best_referral_by_patient.len(),
        expiring = expiring_soon.len(),
        "Referral usage computed"
    );

    ReferralReport {
        as_of,
        referrals: usages,
        best_referral_by_patient,
        expiring_soon,
    }
}

/// Year-end statements; invalid payments are skipped with a warning
pub fn statement(payments: &[Payment], year: i32) -> StatementReport {
    let mut valid = Vec::with_capacity(payments.len());
    let mut skipped_payments = Vec::new();

    for payment in payments {
        match payment.validate() {
            Ok(()) => valid.push(payment.clone()),
            Err(err) => {
                warn!(payment_id = %payment.id, error = %err, "Skipping invalid payment");
                skipped_payments.push(payment.id);
            }
        }
    }

    StatementReport {
        year,
        statements: summarize_payments(&valid, year),
        skipped_payments,
    }
}
