use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::{Payment, PaymentStatus};
use crate::reporting::{summarize_payments, PatientPaymentSummary};
use crate::repository::PaymentRepository;

/// Billing service
pub struct BillingService<R: PaymentRepository> {
    repository: Arc<R>,
}

impl<R: PaymentRepository> BillingService<R> {
    /// Create a new billing service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Record a payment
    ///
    /// # Errors
    ///
    /// [`BillingError::Validation`] for an invalid payment, or a repository error.
    pub async fn record_payment(&self, payment: Payment) -> BillingResult<Payment> {
        payment.validate()?;
        self.repository.save_payment(payment.clone()).await?;

        info!(
            payment_id = %payment.id,
            patient_id = %payment.patient_id,
            amount = %payment.amount,
            status = ?payment.status,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Refund part or all of a completed payment
    ///
    /// # Errors
    ///
    /// [`BillingError::PaymentNotFound`] for an unknown payment,
    /// [`BillingError::RefundExceedsPayment`] when earlier refunds plus `amount`
    /// exceed the original, or a validation error for a non-completed original.
    pub async fn refund_payment(
        &self,
        payment_id: Uuid,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> BillingResult<Payment> {
        let (original, refunds) = tokio::try_join!(
            self.repository.get_payment(payment_id),
            self.repository.list_refunds(payment_id),
        )?;
        let original = original.ok_or(BillingError::PaymentNotFound(payment_id))?;

        if original.status != PaymentStatus::Completed {
            return Err(BillingError::Validation {
                errors: [(
                    "status".to_string(),
                    "only completed payments can be refunded".to_string(),
                )]
                .into_iter()
                .collect(),
            });
        }

        let refunded: Decimal = refunds.iter().map(|r| r.amount).sum();
        let refundable = original.amount - refunded;
        if amount > refundable {
            return Err(BillingError::RefundExceedsPayment {
                requested: amount,
                refundable,
            });
        }

        let refund = original.refund(amount, now);
        refund.validate()?;
        self.repository.save_payment(refund.clone()).await?;

        info!(
            payment_id = %payment_id,
            refund_id = %refund.id,
            amount = %amount,
            "Payment refunded"
        );
        Ok(refund)
    }

    /// Year-end statement aggregate for one patient
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn annual_statement(
        &self,
        patient_id: Uuid,
        year: i32,
    ) -> BillingResult<Option<PatientPaymentSummary>> {
        let payments = self.repository.list_payments(patient_id).await?;
        Ok(summarize_payments(&payments, year).into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use crate::repository::InMemoryPaymentRepository;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn setup() -> BillingService<InMemoryPaymentRepository> {
        BillingService::new(Arc::new(InMemoryPaymentRepository::new()))
    }

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap()
    }

    fn payment(patient_id: Uuid, amount: Decimal, status: PaymentStatus) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            patient_id,
            claim_id: None,
            amount,
            payment_method: PaymentMethod::DebitCard,
            is_copay: true,
            status,
            received_date: at(2, 12),
            check_number: None,
            notes: None,
            refund_of: None,
        }
    }

    #[tokio::test]
    async fn test_record_and_statement() {
        let service = setup();
        let patient = Uuid::new_v4();
        service
            .record_payment(payment(patient, dec!(25), PaymentStatus::Completed))
            .await
            .unwrap();
        service
            .record_payment(payment(patient, dec!(88), PaymentStatus::Completed))
            .await
            .unwrap();

        let statement = service.annual_statement(patient, 2024).await.unwrap().unwrap();
        assert_eq!(statement.total_paid, dec!(113));
        assert_eq!(statement.payment_count, 2);
        assert!(service.annual_statement(patient, 2023).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_payment_rejected() {
        let service = setup();
        let err = service
            .record_payment(payment(Uuid::new_v4(), dec!(0), PaymentStatus::Completed))
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_partial_refunds_limited_to_original() {
        let service = setup();
        let patient = Uuid::new_v4();
        let original = service
            .record_payment(payment(patient, dec!(50), PaymentStatus::Completed))
            .await
            .unwrap();

        service.refund_payment(original.id, dec!(30), at(3, 1)).await.unwrap();
        let err = service
            .refund_payment(original.id, dec!(30), at(3, 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BillingError::RefundExceedsPayment { refundable, .. } if refundable == dec!(20)
        ));

        let statement = service.annual_statement(patient, 2024).await.unwrap().unwrap();
        assert_eq!(statement.total_paid, dec!(20));
        assert_eq!(statement.refund_total, dec!(30));
    }

    #[tokio::test]
    async fn test_refund_requires_completed_original() {
        let service = setup();
        let pending = service
            .record_payment(payment(Uuid::new_v4(), dec!(50), PaymentStatus::Pending))
            .await
            .unwrap();

        let err = service
            .refund_payment(pending.id, dec!(10), at(3, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::Validation { .. }));

        let err = service
            .refund_payment(Uuid::new_v4(), dec!(10), at(3, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::PaymentNotFound(_)));
    }
}
