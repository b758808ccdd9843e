use std::sync::Arc;

use chrono::NaiveDate;
use logger_redacted::redacted_info;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ReferralResult;
use crate::models::{Referral, ReferralSummary};
use crate::repository::ReferralRepository;
use crate::usage::{compute_referral_usage, select_best_referral};

/// Days before expiration at which a usable referral is flagged
pub const DEFAULT_EXPIRING_SOON_DAYS: u32 = 14;

/// Referral service
pub struct ReferralService<R: ReferralRepository> {
    repository: Arc<R>,
    expiring_soon_days: u32,
}

impl<R: ReferralRepository> ReferralService<R> {
    /// Create a new referral service
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
        }
    }

    pub fn with_expiring_soon_days(mut self, days: u32) -> Self {
        self.expiring_soon_days = days;
        self
    }

    /// Validate and store a referral
    ///
    /// # Errors
    ///
    /// [`crate::ReferralError::Validation`] when the referral's dates or NPI are invalid.
    pub async fn add_referral(&self, referral: Referral) -> ReferralResult<Referral> {
        referral.validate()?;
        self.repository.save_referral(referral.clone()).await?;

        if let Some(auth) = referral.authorization_number.as_deref() {
            redacted_info!(referral_id = referral.id; "Referral saved with authorization {}", auth);
        } else {
            info!(referral_id = %referral.id, "Referral saved");
        }
        Ok(referral)
    }

    /// Usage for all of a patient's referrals and the one to default a visit to
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn referral_summary(
        &self,
        patient_id: Uuid,
        today: NaiveDate,
    ) -> ReferralResult<ReferralSummary> {
        let (referrals, visits) = tokio::try_join!(
            self.repository.list_referrals(patient_id),
            self.repository.list_visits(patient_id),
        )?;

        let usages = compute_referral_usage(&referrals, &visits, today);
        let best_referral_id = select_best_referral(&usages).map(|usage| usage.referral.id);

        let expiring_soon: Vec<Uuid> = usages
            .iter()
            .filter(|usage| usage.is_usable() && usage.expires_within(self.expiring_soon_days, today))
            .map(|usage| usage.referral.id)
            .collect();

        for referral_id in &expiring_soon {
            warn!(
                patient_id = %patient_id,
                referral_id = %referral_id,
                within_days = self.expiring_soon_days,
                "Referral expiring soon"
            );
        }
        info!(
            patient_id = %patient_id,
            referrals = usages.len(),
            visits = visits.len(),
            best_referral_id = ?best_referral_id,
            "Referral usage computed"
        );

        Ok(ReferralSummary {
            patient_id,
            referrals: usages,
            best_referral_id,
            expiring_soon,
        })
    }

    /// Referral a new visit should be billed against, `None` for self-pay
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn default_referral_for_visit(
        &self,
        patient_id: Uuid,
        today: NaiveDate,
    ) -> ReferralResult<Option<Uuid>> {
        Ok(self.referral_summary(patient_id, today).await?.best_referral_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReferralError;
    use crate::models::{Visit, VisitLimitType};
    use crate::repository::InMemoryReferralRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (ReferralService<InMemoryReferralRepository>, Arc<InMemoryReferralRepository>) {
        let repo = Arc::new(InMemoryReferralRepository::new());
        (ReferralService::new(repo.clone()), repo)
    }

    fn limited(patient_id: Uuid, count: u32, start: NaiveDate) -> Referral {
        Referral {
            visit_limit_count: Some(count),
            referral_start_date: Some(start),
            authorization_number: Some("AUTH20240001".to_string()),
            ..Referral::new(patient_id, VisitLimitType::PerReferral)
        }
    }

    async fn visit(repo: &InMemoryReferralRepository, referral: &Referral, on: NaiveDate) {
        repo.save_visit(Visit {
            id: Uuid::new_v4(),
            patient_id: referral.patient_id,
            visit_date: on,
            referral_id: Some(referral.id),
            is_billable_to_insurance: true,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_summary_for_patient_without_referrals() {
        let (service, _) = setup();
        let patient = Uuid::new_v4();
        let summary = service.referral_summary(patient, date(2024, 6, 1)).await.unwrap();
        assert_eq!(summary.patient_id, patient);
        assert!(summary.referrals.is_empty());
        assert!(summary.best_referral_id.is_none());
    }

    #[tokio::test]
    async fn test_default_moves_to_next_referral_once_exhausted() {
        let (service, repo) = setup();
        let patient = Uuid::new_v4();
        let first = limited(patient, 2, date(2024, 1, 5));
        let second = limited(patient, 12, date(2024, 3, 1));
        service.add_referral(first.clone()).await.unwrap();
        service.add_referral(second.clone()).await.unwrap();

        let today = date(2024, 6, 1);
        assert_eq!(
            service.default_referral_for_visit(patient, today).await.unwrap(),
            Some(first.id)
        );

        visit(&repo, &first, date(2024, 1, 10)).await;
        visit(&repo, &first, date(2024, 1, 17)).await;
        assert_eq!(
            service.default_referral_for_visit(patient, today).await.unwrap(),
            Some(second.id)
        );

        let summary = service.referral_summary(patient, today).await.unwrap();
        let first_usage = summary
            .referrals
            .iter()
            .find(|u| u.referral.id == first.id)
            .unwrap();
        assert_eq!(first_usage.visits_used, 2);
        assert!(first_usage.is_exhausted);
    }

    #[tokio::test]
    async fn test_other_patients_referrals_are_not_visible() {
        let (service, _) = setup();
        let patient = Uuid::new_v4();
        service
            .add_referral(limited(Uuid::new_v4(), 5, date(2024, 1, 1)))
            .await
            .unwrap();

        let summary = service.referral_summary(patient, date(2024, 6, 1)).await.unwrap();
        assert!(summary.referrals.is_empty());
    }

    #[tokio::test]
    async fn test_expiring_soon_flagged() {
        let (service, _) = setup();
        let service = service.with_expiring_soon_days(7);
        let patient = Uuid::new_v4();
        let mut referral = limited(patient, 10, date(2024, 1, 1));
        referral.referral_expiration_date = Some(date(2024, 6, 5));
        service.add_referral(referral.clone()).await.unwrap();

        let summary = service.referral_summary(patient, date(2024, 6, 1)).await.unwrap();
        assert_eq!(summary.expiring_soon, vec![referral.id]);

        let summary = service.referral_summary(patient, date(2024, 5, 1)).await.unwrap();
        assert!(summary.expiring_soon.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_referral_rejected() {
        let (service, repo) = setup();
        let patient = Uuid::new_v4();
        let mut referral = limited(patient, 10, date(2024, 3, 1));
        referral.referral_expiration_date = Some(date(2024, 2, 1));

        let err = service.add_referral(referral).await.unwrap_err();
        assert!(matches!(err, ReferralError::Validation { .. }));
        assert!(repo.list_referrals(patient).await.unwrap().is_empty());
    }
}
