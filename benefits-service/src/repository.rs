use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::BenefitsResult;
use crate::models::{Patient, PatientBenefits};

/// Storage interface for patients and their benefits
#[async_trait]
pub trait BenefitsRepository: Send + Sync {
    async fn get_patient(&self, patient_id: Uuid) -> BenefitsResult<Option<Patient>>;

    async fn get_benefits(&self, patient_id: Uuid) -> BenefitsResult<Option<PatientBenefits>>;

    /// Insert or replace the benefits row for `benefits.patient_id`
    async fn save_benefits(&self, benefits: PatientBenefits) -> BenefitsResult<()>;
}

/// In-memory repository for testing and development
#[derive(Clone, Default)]
pub struct InMemoryBenefitsRepository {
    patients: Arc<DashMap<Uuid, Patient>>,
    benefits: Arc<DashMap<Uuid, PatientBenefits>>,
}

impl InMemoryBenefitsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_patient(&self, patient: Patient) {
        self.patients.insert(patient.id, patient);
    }
}

#[async_trait]
impl BenefitsRepository for InMemoryBenefitsRepository {
    async fn get_patient(&self, patient_id: Uuid) -> BenefitsResult<Option<Patient>> {
        Ok(self.patients.get(&patient_id).map(|entry| entry.value().clone()))
    }

    async fn get_benefits(&self, patient_id: Uuid) -> BenefitsResult<Option<PatientBenefits>> {
        Ok(self.benefits.get(&patient_id).map(|entry| entry.value().clone()))
    }

    async fn save_benefits(&self, benefits: PatientBenefits) -> BenefitsResult<()> {
        self.benefits.insert(benefits.patient_id, benefits);
        Ok(())
    }
}
