//! Doctor models.

use serde::{Deserialize, Serialize};

/// A veterinary practice and its doctor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: i64,
    pub hospital_name: String,
    pub doctor_name: String,
    pub mobile_no: String,
    pub pincode: Option<String>,
    pub address: Option<String>,
    /// Link to the hospital on a map service
    pub map_link: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: String,
}

/// Fields supplied when a doctor is onboarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewDoctor {
    pub hospital_name: String,
    pub doctor_name: String,
    pub mobile_no: String,
    pub pincode: Option<String>,
    pub address: Option<String>,
    pub map_link: Option<String>,
    pub password_hash: Option<String>,
}

impl NewDoctor {
    /// Create a doctor with required fields.
    pub fn new(hospital_name: String, doctor_name: String, mobile_no: String) -> Self {
        Self {
            hospital_name,
            doctor_name,
            mobile_no,
            ..Default::default()
        }
    }
}
