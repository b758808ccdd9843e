//! Visit usage against referral limits.
//!
//! Usage is derived entirely from the visits that reference a referral, so
//! it is recomputed on every read rather than stored.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Referral, ReferralWithUsage, Visit, VisitLimitType};

/// Number of visits referencing each referral id
pub fn count_visits_by_referral(visits: &[Visit]) -> HashMap<Uuid, u32> {
    let mut counts = HashMap::new();
    for referral_id in visits.iter().filter_map(|v| v.referral_id) {
        *counts.entry(referral_id).or_insert(0u32) += 1;
    }
    counts
}

/// Attach usage state to each referral, preserving input order
pub fn compute_referral_usage(
    referrals: &[Referral],
    visits: &[Visit],
    today: NaiveDate,
) -> Vec<ReferralWithUsage> {
    let counts = count_visits_by_referral(visits);

    referrals
        .iter()
        .map(|referral| {
            let visits_used = counts.get(&referral.id).copied().unwrap_or(0);
            ReferralWithUsage::new(referral.clone(), visits_used, today)
        })
        .collect()
}

impl ReferralWithUsage {
    pub fn new(referral: Referral, visits_used: u32, today: NaiveDate) -> Self {
        let is_expired = referral
            .referral_expiration_date
            .is_some_and(|expiration| expiration < today);

        let limit = match referral.visit_limit_type {
            VisitLimitType::Unlimited => None,
            VisitLimitType::PerReferral | VisitLimitType::PerCalendarYear => {
                referral.visit_limit_count
            }
        };
        let visits_remaining = limit.map(|limit| i64::from(limit) - i64::from(visits_used));
        let is_exhausted = limit.is_some_and(|limit| visits_used >= limit);

        Self {
            referral,
            visits_used,
            visits_remaining,
            is_expired,
            is_exhausted,
        }
    }

    /// Neither expired nor exhausted
    pub fn is_usable(&self) -> bool {
        !self.is_expired && !self.is_exhausted
    }

    /// Remaining visits floored at zero, `None` when there is no count limit
    pub fn remaining_for_display(&self) -> Option<u32> {
        self.visits_remaining
            .map(|remaining| u32::try_from(remaining.max(0)).unwrap_or(u32::MAX))
    }

    /// True when the referral has not yet expired but will within `days`
    pub fn expires_within(&self, days: u32, today: NaiveDate) -> bool {
        self.referral
            .referral_expiration_date
            .is_some_and(|expiration| {
                expiration >= today && expiration - today <= Duration::days(i64::from(days))
            })
    }
}

// Dated referrals first, oldest start first
fn start_key(usage: &ReferralWithUsage) -> (bool, Option<NaiveDate>) {
    let start = usage.referral.referral_start_date;
    (start.is_none(), start)
}

/// The oldest usable referral; the first one wins on equal start dates
pub fn select_best_referral(usages: &[ReferralWithUsage]) -> Option<&ReferralWithUsage> {
    let best = usages
        .iter()
        .filter(|usage| usage.is_usable())
        .min_by_key(|usage| start_key(usage));

    if best.is_none() && !usages.is_empty() {
        debug!(count = usages.len(), "No usable referral, visit defaults to self-pay");
    }
    best
}

/// Best referral id per patient for a mixed set of referrals
///
/// Patients whose referrals are all expired or exhausted have no entry.
pub fn best_referrals_by_patient(usages: &[ReferralWithUsage]) -> BTreeMap<Uuid, Uuid> {
    let mut best: BTreeMap<Uuid, &ReferralWithUsage> = BTreeMap::new();

    for usage in usages.iter().filter(|usage| usage.is_usable()) {
        best.entry(usage.referral.patient_id)
            .and_modify(|current| {
                if start_key(usage) < start_key(*current) {
                    *current = usage;
                }
            })
            .or_insert(usage);
    }

    best.into_iter()
        .map(|(patient_id, usage)| (patient_id, usage.referral.id))
        .collect()
}
