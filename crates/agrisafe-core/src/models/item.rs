//! Recommendation line items.
//!
//! Dosage fields are produced by an external calculator and persisted as-is.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Antibiotic name written by the recommendation flow before a real medicine
/// has been chosen.
pub const PLACEHOLDER_ANTIBIOTIC: &str = "Placeholder - Update Required";

/// One medicine entry within a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    pub id: i64,
    pub recommendation_id: i64,
    pub antibiotic_name: Option<String>,
    /// Maximum quantity allowed, free text (e.g. "50 ml")
    pub total_limit: Option<String>,
    pub animal_type: Option<String>,
    /// Animal weight in kg
    pub weight: Option<f64>,
    /// Animal age in years
    pub age: Option<f64>,
    pub disease: Option<String>,
    pub single_dose_ml: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub treatment_days: Option<i64>,
    pub daily_frequency: Option<i64>,
    pub total_daily_dosage_ml: Option<f64>,
    pub total_treatment_dosage_ml: Option<f64>,
    pub frequency_description: Option<String>,
    pub dosage_per_kg: Option<f64>,
    pub age_category: Option<String>,
    pub confidence: Option<String>,
    pub calculation_note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl RecommendationItem {
    /// True when no real medicine has been filled in yet.
    pub fn is_placeholder(&self) -> bool {
        match self.antibiotic_name.as_deref() {
            None => true,
            Some(name) => name.trim().is_empty() || name == PLACEHOLDER_ANTIBIOTIC,
        }
    }

    /// Treatment length, defaulting to a single day.
    pub fn effective_treatment_days(&self) -> i64 {
        self.treatment_days.filter(|d| *d > 0).unwrap_or(1)
    }

    /// Single dose times daily frequency (frequency defaults to 1).
    pub fn daily_dosage_ml(&self) -> f64 {
        let dose = self.single_dose_ml.unwrap_or(0.0);
        let frequency = self.daily_frequency.filter(|f| *f > 0).unwrap_or(1);
        dose * frequency as f64
    }

    /// Last day of treatment when started on `start` (start counts as day 1).
    pub fn end_date_from(&self, start: NaiveDate) -> Option<NaiveDate> {
        treatment_end(start, self.effective_treatment_days())
    }

    /// Short dosage line for display, e.g. "5ml 2 times daily".
    pub fn dosage_summary(&self) -> String {
        match (self.single_dose_ml, self.daily_frequency) {
            (Some(dose), Some(freq)) if dose > 0.0 && freq > 0 => {
                format!("{}ml {} times daily", dose, freq)
            }
            _ => "Dosage to be determined".to_string(),
        }
    }
}

/// Last day of a `days`-long treatment beginning on `start`, or `None` when
/// it falls outside the representable calendar.
pub fn treatment_end(start: NaiveDate, days: i64) -> Option<NaiveDate> {
    let extra = days.max(1) as u64 - 1;
    start.checked_add_days(Days::new(extra))
}

/// Fields supplied when an item is generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewRecommendationItem {
    pub recommendation_id: i64,
    pub antibiotic_name: Option<String>,
    pub total_limit: Option<String>,
    pub animal_type: Option<String>,
    pub weight: Option<f64>,
    pub age: Option<f64>,
    pub disease: Option<String>,
    pub single_dose_ml: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub treatment_days: Option<i64>,
    pub daily_frequency: Option<i64>,
    pub total_daily_dosage_ml: Option<f64>,
    pub total_treatment_dosage_ml: Option<f64>,
    pub frequency_description: Option<String>,
    pub dosage_per_kg: Option<f64>,
    pub age_category: Option<String>,
    pub confidence: Option<String>,
    pub calculation_note: Option<String>,
}

impl NewRecommendationItem {
    pub fn new(recommendation_id: i64, antibiotic_name: impl Into<String>) -> Self {
        Self {
            recommendation_id,
            antibiotic_name: Some(antibiotic_name.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: Option<&str>) -> RecommendationItem {
        RecommendationItem {
            id: 1,
            recommendation_id: 1,
            antibiotic_name: name.map(String::from),
            total_limit: None,
            animal_type: Some("cow".into()),
            weight: Some(350.0),
            age: Some(4.0),
            disease: Some("Mastitis".into()),
            single_dose_ml: Some(17.5),
            start_date: None,
            end_date: None,
            treatment_days: Some(5),
            daily_frequency: Some(2),
            total_daily_dosage_ml: Some(35.0),
            total_treatment_dosage_ml: Some(175.0),
            frequency_description: None,
            dosage_per_kg: Some(0.05),
            age_category: Some("adult".into()),
            confidence: Some("high".into()),
            calculation_note: None,
            created_at: "2026-01-01 00:00:00".into(),
            updated_at: "2026-01-01 00:00:00".into(),
        }
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(item(None).is_placeholder());
        assert!(item(Some(PLACEHOLDER_ANTIBIOTIC)).is_placeholder());
        assert!(item(Some("")).is_placeholder());
        assert!(!item(Some("Oxytetracycline")).is_placeholder());
    }

    #[test]
    fn test_daily_dosage() {
        let mut it = item(Some("Oxytetracycline"));
        assert_eq!(it.daily_dosage_ml(), 35.0);

        it.daily_frequency = None;
        assert_eq!(it.daily_dosage_ml(), 17.5);

        it.single_dose_ml = None;
        assert_eq!(it.daily_dosage_ml(), 0.0);
    }

    #[test]
    fn test_end_date_counts_start_day() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 30).unwrap();
        let it = item(Some("Oxytetracycline"));
        assert_eq!(it.end_date_from(start), NaiveDate::from_ymd_opt(2026, 11, 3));

        let mut single = item(Some("Enrofloxacin"));
        single.treatment_days = None;
        assert_eq!(single.end_date_from(start), Some(start));
    }

    #[test]
    fn test_end_date_out_of_range() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(treatment_end(start, i64::MAX), None);

        let mut it = item(Some("Oxytetracycline"));
        it.treatment_days = Some(i64::MAX);
        assert_eq!(it.end_date_from(start), None);
    }

    #[test]
    fn test_dosage_summary() {
        assert_eq!(item(Some("X")).dosage_summary(), "17.5ml 2 times daily");
        let mut it = item(Some("X"));
        it.daily_frequency = None;
        assert_eq!(it.dosage_summary(), "Dosage to be determined");
    }
}
