use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// When the plan's deductible and out-of-pocket totals reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanYearType {
    /// Resets every January 1st
    #[default]
    Calendar,
    /// Resets every year on the month/day of `start`
    Custom { start: NaiveDate },
}

/// Inclusive date range of one plan year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanYearPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PlanYearPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl PlanYearType {
    fn reset_day(self) -> (u32, u32) {
        match self {
            Self::Calendar => (1, 1),
            Self::Custom { start } => (start.month(), start.day()),
        }
    }

    /// The plan year that `today` falls in
    pub fn period_containing(self, today: NaiveDate) -> PlanYearPeriod {
        let (month, day) = self.reset_day();

        let this_year = anniversary(today.year(), month, day);
        let start = if this_year <= today {
            this_year
        } else {
            anniversary(today.year() - 1, month, day)
        };

        let next = anniversary(start.year() + 1, month, day);
        PlanYearPeriod {
            start,
            end: next.pred_opt().unwrap_or(next),
        }
    }
}

/// Reset date in `year`; Feb 29 falls back to Feb 28 outside leap years
fn anniversary(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 28))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_year() {
        let period = PlanYearType::Calendar.period_containing(date(2024, 7, 15));
        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2024, 12, 31));
        assert!(period.contains(date(2024, 1, 1)));
        assert!(!period.contains(date(2025, 1, 1)));
    }

    #[test]
    fn test_custom_year_before_reset_day() {
        let plan = PlanYearType::Custom { start: date(2019, 7, 1) };
        let period = plan.period_containing(date(2024, 3, 10));
        assert_eq!(period.start, date(2023, 7, 1));
        assert_eq!(period.end, date(2024, 6, 30));
    }

    #[test]
    fn test_custom_year_on_reset_day() {
        let plan = PlanYearType::Custom { start: date(2019, 7, 1) };
        let period = plan.period_containing(date(2024, 7, 1));
        assert_eq!(period.start, date(2024, 7, 1));
        assert_eq!(period.end, date(2025, 6, 30));
    }

    #[test]
    fn test_leap_day_start_rolls_to_feb_28() {
        let plan = PlanYearType::Custom { start: date(2020, 2, 29) };

        let period = plan.period_containing(date(2023, 3, 1));
        assert_eq!(period.start, date(2023, 2, 28));
        assert_eq!(period.end, date(2024, 2, 28));

        let period = plan.period_containing(date(2024, 2, 29));
        assert_eq!(period.start, date(2024, 2, 29));
        assert_eq!(period.end, date(2025, 2, 27));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(PlanYearType::Custom { start: date(2024, 7, 1) }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "custom", "start": "2024-07-01"}));
        let parsed: PlanYearType = serde_json::from_str(r#"{"type":"calendar"}"#).unwrap();
        assert_eq!(parsed, PlanYearType::Calendar);
    }
}
