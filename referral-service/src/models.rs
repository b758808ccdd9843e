use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ReferralError, ReferralResult};

/// How a referral's visit limit is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitLimitType {
    #[default]
    PerReferral,
    PerCalendarYear,
    Unlimited,
}

/// Referral or prior authorization from a referring physician
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(default)]
    pub referring_physician_name: Option<String>,
    #[serde(default)]
    pub referring_physician_npi: Option<String>,
    #[serde(default)]
    pub payer_name: Option<String>,
    #[serde(default)]
    pub visit_limit_type: VisitLimitType,
    #[serde(default)]
    pub visit_limit_count: Option<u32>,
    #[serde(default)]
    pub referral_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub referral_expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub authorization_number: Option<String>,
    #[serde(default)]
    pub diagnosis_codes: Vec<String>,
    #[serde(default)]
    pub procedure_codes: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Referral {
    /// Minimal referral with no dates or limits
    pub fn new(patient_id: Uuid, visit_limit_type: VisitLimitType) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            referring_physician_name: None,
            referring_physician_npi: None,
            payer_name: None,
            visit_limit_type,
            visit_limit_count: None,
            referral_start_date: None,
            referral_expiration_date: None,
            authorization_number: None,
            diagnosis_codes: Vec::new(),
            procedure_codes: Vec::new(),
            notes: None,
        }
    }

    /// Reject referrals whose dates are out of order or whose NPI is malformed
    ///
    /// Missing dates and limits are allowed; they simply impose no constraint.
    ///
    /// # Errors
    ///
    /// [`ReferralError::Validation`] with one entry per offending field.
    pub fn validate(&self) -> ReferralResult<()> {
        let mut errors = BTreeMap::new();

        if let (Some(start), Some(expiration)) =
            (self.referral_start_date, self.referral_expiration_date)
        {
            if expiration < start {
                errors.insert(
                    "referral_expiration_date".to_string(),
                    "must not be before referral_start_date".to_string(),
                );
            }
        }

        if let Some(npi) = &self.referring_physician_npi {
            if npi.len() != 10 || !npi.chars().all(|c| c.is_ascii_digit()) {
                errors.insert(
                    "referring_physician_npi".to_string(),
                    "must be 10 digits".to_string(),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ReferralError::Validation { errors })
        }
    }
}

/// Patient visit, optionally billed against a referral
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub visit_date: NaiveDate,
    #[serde(default)]
    pub referral_id: Option<Uuid>,
    #[serde(default = "default_billable")]
    pub is_billable_to_insurance: bool,
}

fn default_billable() -> bool {
    true
}

/// Referral with its derived usage state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralWithUsage {
    #[serde(flatten)]
    pub referral: Referral,
    pub visits_used: u32,
    /// `None` when the referral has no count limit
    pub visits_remaining: Option<i64>,
    pub is_expired: bool,
    pub is_exhausted: bool,
}

/// All of a patient's referrals with usage, plus the one to default a new visit to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralSummary {
    pub patient_id: Uuid,
    pub referrals: Vec<ReferralWithUsage>,
    pub best_referral_id: Option<Uuid>,
    /// Usable referrals expiring within the configured warning window
    pub expiring_soon: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_limit_type_wire_names() {
        let json = serde_json::to_string(&VisitLimitType::PerCalendarYear).unwrap();
        assert_eq!(json, "\"PER_CALENDAR_YEAR\"");
        let parsed: VisitLimitType = serde_json::from_str("\"UNLIMITED\"").unwrap();
        assert_eq!(parsed, VisitLimitType::Unlimited);
    }

    #[test]
    fn test_sparse_referral_deserializes() {
        let patient_id = Uuid::new_v4();
        let json = format!(r#"{{"id":"{}","patient_id":"{}"}}"#, Uuid::new_v4(), patient_id);
        let referral: Referral = serde_json::from_str(&json).unwrap();
        assert_eq!(referral.patient_id, patient_id);
        assert_eq!(referral.visit_limit_type, VisitLimitType::PerReferral);
        assert!(referral.visit_limit_count.is_none());
        assert!(referral.diagnosis_codes.is_empty());
    }

    #[test]
    fn test_visit_billable_by_default() {
        let json = format!(
            r#"{{"id":"{}","patient_id":"{}","visit_date":"2024-03-01"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let visit: Visit = serde_json::from_str(&json).unwrap();
        assert!(visit.is_billable_to_insurance);
        assert!(visit.referral_id.is_none());
    }

    #[test]
    fn test_validate_dates_and_npi() {
        let mut referral = Referral::new(Uuid::new_v4(), VisitLimitType::PerReferral);
        assert!(referral.validate().is_ok());

        referral.referral_start_date = Some(date(2024, 6, 1));
        referral.referral_expiration_date = Some(date(2024, 5, 1));
        referral.referring_physician_npi = Some("12345".to_string());

        match referral.validate() {
            Err(ReferralError::Validation { errors }) => {
                assert!(errors.contains_key("referral_expiration_date"));
                assert!(errors.contains_key("referring_physician_npi"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
