//! Medical shop models.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Accepted shape of a mobile number at registration: optional `+`, no
/// leading zero, 2 to 15 digits.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[1-9]\d{1,14}$").unwrap());

/// A registered medical shop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalShop {
    pub id: i64,
    pub shop_name: String,
    pub owner_name: String,
    /// Unique across shops; used as the login identifier
    pub mobile_no: String,
    pub email: Option<String>,
    pub license_number: String,
    pub pincode: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when a shop registers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedicalShop {
    pub shop_name: String,
    pub owner_name: String,
    pub mobile_no: String,
    pub email: Option<String>,
    pub license_number: String,
    pub pincode: String,
    pub address: String,
    pub city: String,
    pub state: String,
    /// Already hashed by the caller
    pub password_hash: String,
    pub is_verified: bool,
    pub is_active: bool,
}

impl NewMedicalShop {
    /// Check required fields and mobile number format.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("shop_name", &self.shop_name),
            ("owner_name", &self.owner_name),
            ("mobile_no", &self.mobile_no),
            ("license_number", &self.license_number),
            ("pincode", &self.pincode),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("password_hash", &self.password_hash),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{} is required", field));
            }
        }

        if !is_valid_mobile(&self.mobile_no) {
            return Err(format!("Invalid mobile number: {}", self.mobile_no));
        }
        Ok(())
    }
}

/// Check a mobile number against the registration format.
pub fn is_valid_mobile(mobile_no: &str) -> bool {
    MOBILE_RE.is_match(mobile_no)
}

/// Partial profile edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShopProfileUpdate {
    pub shop_name: Option<String>,
    pub owner_name: Option<String>,
    pub mobile_no: Option<String>,
    pub email: Option<String>,
    pub license_number: Option<String>,
    /// Stored in the `city` column
    pub district: Option<String>,
    pub address: Option<String>,
}

impl ShopProfileUpdate {
    /// Column/value pairs for every provided field.
    pub(crate) fn assignments(&self) -> Vec<(&'static str, &str)> {
        [
            ("shop_name", &self.shop_name),
            ("owner_name", &self.owner_name),
            ("mobile_no", &self.mobile_no),
            ("email", &self.email),
            ("license_number", &self.license_number),
            ("city", &self.district),
            ("address", &self.address),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }
}

/// Claim counts for one shop.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopStatistics {
    pub total_claims: i64,
    pub todays_claims: i64,
    /// Monday through Sunday of the current ISO week
    pub this_week_claims: i64,
    pub this_month_claims: i64,
}
