use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::ReferralResult;
use crate::models::{Referral, Visit};

/// Storage interface for referrals and the visits billed against them
#[async_trait]
pub trait ReferralRepository: Send + Sync {
    async fn list_referrals(&self, patient_id: Uuid) -> ReferralResult<Vec<Referral>>;

    async fn list_visits(&self, patient_id: Uuid) -> ReferralResult<Vec<Visit>>;

    async fn save_referral(&self, referral: Referral) -> ReferralResult<()>;

    async fn save_visit(&self, visit: Visit) -> ReferralResult<()>;
}

/// In-memory repository for testing and development
#[derive(Clone, Default)]
pub struct InMemoryReferralRepository {
    referrals: Arc<DashMap<Uuid, Referral>>,
    visits: Arc<DashMap<Uuid, Visit>>,
}

impl InMemoryReferralRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReferralRepository for InMemoryReferralRepository {
    /// Ordered by start date then id so selection ties resolve the same way every call
    async fn list_referrals(&self, patient_id: Uuid) -> ReferralResult<Vec<Referral>> {
        let mut referrals: Vec<Referral> = self
            .referrals
            .iter()
            .filter(|entry| entry.value().patient_id == patient_id)
            .map(|entry| entry.value().clone())
            .collect();
        referrals.sort_by_key(|r| (r.referral_start_date.is_none(), r.referral_start_date, r.id));
        Ok(referrals)
    }

    async fn list_visits(&self, patient_id: Uuid) -> ReferralResult<Vec<Visit>> {
        let mut visits: Vec<Visit> = self
            .visits
            .iter()
            .filter(|entry| entry.value().patient_id == patient_id)
            .map(|entry| entry.value().clone())
            .collect();
        visits.sort_by_key(|v| (v.visit_date, v.id));
        Ok(visits)
    }

    async fn save_referral(&self, referral: Referral) -> ReferralResult<()> {
        self.referrals.insert(referral.id, referral);
        Ok(())
    }

    async fn save_visit(&self, visit: Visit) -> ReferralResult<()> {
        self.visits.insert(visit.id, visit);
        Ok(())
    }
}
