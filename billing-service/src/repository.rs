use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::BillingResult;
use crate::models::Payment;

/// Storage interface for payments
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn get_payment(&self, payment_id: Uuid) -> BillingResult<Option<Payment>>;

    async fn list_payments(&self, patient_id: Uuid) -> BillingResult<Vec<Payment>>;

    /// Refund records that reference `payment_id`
    async fn list_refunds(&self, payment_id: Uuid) -> BillingResult<Vec<Payment>>;

    async fn save_payment(&self, payment: Payment) -> BillingResult<()>;
}

/// In-memory repository for testing and development
#[derive(Clone, Default)]
pub struct InMemoryPaymentRepository {
    payments: Arc<DashMap<Uuid, Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn get_payment(&self, payment_id: Uuid) -> BillingResult<Option<Payment>> {
        Ok(self.payments.get(&payment_id).map(|entry| entry.value().clone()))
    }

    async fn list_payments(&self, patient_id: Uuid) -> BillingResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|entry| entry.value().patient_id == patient_id)
            .map(|entry| entry.value().clone())
            .collect();
        payments.sort_by_key(|p| (p.received_date, p.id));
        Ok(payments)
    }

    async fn list_refunds(&self, payment_id: Uuid) -> BillingResult<Vec<Payment>> {
        Ok(self
            .payments
            .iter()
            .filter(|entry| entry.value().refund_of == Some(payment_id))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn save_payment(&self, payment: Payment) -> BillingResult<()> {
        self.payments.insert(payment.id, payment);
        Ok(())
    }
}
