//! Medicine recommendation models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Doctor, Farmer, MedicalShop, RecommendationItem};

/// A doctor-issued recommendation for one farmer, optionally claimed by a shop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecommendation {
    pub id: i64,
    pub farmer_id: i64,
    pub doctor_id: i64,
    pub is_claimed: bool,
    /// Cleared when the claiming shop is deleted; `is_claimed` stays set
    pub claimed_by_shop_id: Option<i64>,
    pub claimed_at: Option<NaiveDateTime>,
    pub claim_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Unclaimed recommendation joined with its farmer and doctor, as shown in
/// shop search results. Joined columns are `None` when the row is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnclaimedRecommendation {
    pub id: i64,
    pub farmer_id: i64,
    pub doctor_id: i64,
    pub created_at: String,
    pub farmer_name: Option<String>,
    pub farmer_mobile: Option<String>,
    pub farmer_area: Option<String>,
    pub farmer_pincode: Option<String>,
    pub doctor_name: Option<String>,
    pub hospital_name: Option<String>,
    pub doctor_mobile: Option<String>,
    pub doctor_address: Option<String>,
    pub doctor_pincode: Option<String>,
}

/// 1-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    pub per_page: u32,
}

impl Page {
    pub fn new(number: u32, per_page: u32) -> Self {
        Self { number, per_page }
    }

    /// Rows to skip; `None` for a zero page number or size.
    pub fn offset(&self) -> Option<i64> {
        if self.number == 0 || self.per_page == 0 {
            return None;
        }
        Some((self.number as i64 - 1) * self.per_page as i64)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            per_page: 10,
        }
    }
}

/// Filters for a shop's claim history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClaimFilter {
    /// Inclusive lower bound on `claimed_at`
    pub from: Option<NaiveDateTime>,
    /// Exclusive upper bound on `claimed_at`
    pub to: Option<NaiveDateTime>,
    pub animal_type: Option<String>,
}

/// Filters for the unclaimed-recommendation search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchFilter {
    /// Numeric text matches a recommendation id; anything else matches
    /// farmer name or area by substring.
    pub query: Option<String>,
    /// Matches either the farmer's or the doctor's pincode
    pub pincode: Option<String>,
    pub animal_type: Option<String>,
}

/// Outcome of claiming a recommendation with a treatment start date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimReceipt {
    pub recommendation_id: i64,
    pub shop_id: i64,
    pub claimed_at: NaiveDateTime,
    pub start_date: NaiveDate,
    /// End of the longest item's treatment
    pub end_date: NaiveDate,
    pub max_treatment_days: i64,
    pub notes: Option<String>,
}

/// A recommendation with everything it references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationDetail {
    pub recommendation: MedicineRecommendation,
    pub farmer: Option<Farmer>,
    pub doctor: Option<Doctor>,
    pub claimed_shop: Option<MedicalShop>,
    pub items: Vec<RecommendationItem>,
}

impl RecommendationDetail {
    /// Names of the real (non-placeholder) medicines, in item order.
    pub fn medicines(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| !item.is_placeholder())
            .filter_map(|item| item.antibiotic_name.as_deref())
            .collect()
    }
}
