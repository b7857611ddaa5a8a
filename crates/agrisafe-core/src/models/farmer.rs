//! Farmer models.

use serde::{Deserialize, Serialize};

/// A client of a doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farmer {
    pub id: i64,
    pub name: String,
    pub mobile_no: String,
    /// Village or locality
    pub area: Option<String>,
    pub pincode: Option<String>,
    /// Owning doctor (required)
    pub doctor_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when a farmer is onboarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFarmer {
    pub name: String,
    pub mobile_no: String,
    pub area: Option<String>,
    pub pincode: Option<String>,
    pub doctor_id: i64,
}

impl NewFarmer {
    /// Create a farmer with required fields.
    pub fn new(name: String, mobile_no: String, doctor_id: i64) -> Self {
        Self {
            name,
            mobile_no,
            area: None,
            pincode: None,
            doctor_id,
        }
    }
}
