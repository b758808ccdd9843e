use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Payment, PaymentMethod, PaymentStatus};

/// Net payments for one patient over one calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientPaymentSummary {
    pub patient_id: Uuid,
    pub year: i32,
    /// Completed payments less refunds
    pub total_paid: Decimal,
    pub copay_total: Decimal,
    pub refund_total: Decimal,
    /// Completed payments only
    pub payment_count: u32,
    pub by_method: BTreeMap<PaymentMethod, Decimal>,
}

impl PatientPaymentSummary {
    fn new(patient_id: Uuid, year: i32) -> Self {
        Self {
            patient_id,
            year,
            total_paid: Decimal::ZERO,
            copay_total: Decimal::ZERO,
            refund_total: Decimal::ZERO,
            payment_count: 0,
            by_method: BTreeMap::new(),
        }
    }

    fn apply(&mut self, payment: &Payment, signed: Decimal) {
        self.total_paid += signed;
        if payment.is_copay {
            self.copay_total += signed;
        }
        *self
            .by_method
            .entry(payment.payment_method)
            .or_insert(Decimal::ZERO) += signed;
    }
}

/// Per-patient payment aggregate for `year`, ordered by patient id
///
/// Completed payments add, refunded payments subtract, pending and failed
/// payments are ignored. The year is taken from `received_date` in UTC.
pub fn summarize_payments(payments: &[Payment], year: i32) -> Vec<PatientPaymentSummary> {
    let mut summaries: BTreeMap<Uuid, PatientPaymentSummary> = BTreeMap::new();
    let mut skipped = 0usize;

    for payment in payments.iter().filter(|p| p.received_date.year() == year) {
        let summary = || PatientPaymentSummary::new(payment.patient_id, year);
        match payment.status {
            PaymentStatus::Completed => {
                let entry = summaries.entry(payment.patient_id).or_insert_with(summary);
                entry.apply(payment, payment.amount);
                entry.payment_count += 1;
            }
            PaymentStatus::Refunded => {
                let entry = summaries.entry(payment.patient_id).or_insert_with(summary);
                entry.apply(payment, -payment.amount);
                entry.refund_total += payment.amount;
            }
            PaymentStatus::Pending | PaymentStatus::Failed => skipped += 1,
        }
    }

    debug!(
        year,
        patients = summaries.len(),
        skipped,
        "Payment statements aggregated"
    );
    summaries.into_values().collect()
}
