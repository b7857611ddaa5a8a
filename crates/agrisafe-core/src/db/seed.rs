//! Sample data for a fresh database.

use serde::{Deserialize, Serialize};

use super::{Database, DbResult};
use crate::models::{NewDoctor, NewFarmer, NewMedicalShop, NewRecommendationItem};

/// Ids of the rows created by [`Database::seed_sample_data`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub doctor_id: i64,
    pub farmer_id: i64,
    pub shop_id: i64,
    pub recommendation_id: i64,
    pub item_ids: Vec<i64>,
}

fn sample_doctor() -> NewDoctor {
    NewDoctor {
        hospital_name: "Sri Venkateswara Veterinary Hospital".into(),
        doctor_name: "Dr. Ramesh Kumar".into(),
        mobile_no: "919845012345".into(),
        pincode: Some("602001".into()),
        address: Some("45 Gandhi Road, Thiruvallur".into()),
        map_link: Some("https://maps.google.com/?q=13.1439,79.9087".into()),
        password_hash: None,
    }
}

fn sample_farmer(doctor_id: i64) -> NewFarmer {
    NewFarmer {
        name: "Murugan".into(),
        mobile_no: "918122762374".into(),
        area: Some("Thiruvallur".into()),
        pincode: Some("602001".into()),
        doctor_id,
    }
}

fn sample_shop() -> NewMedicalShop {
    NewMedicalShop {
        shop_name: "Sri Lakshmi Medicals".into(),
        owner_name: "Lakshmi Narayanan".into(),
        mobile_no: "919876543210".into(),
        email: Some("lakshmi.medicals@example.com".into()),
        license_number: "TN-MED-2024-001".into(),
        pincode: "602001".into(),
        address: "12 Market Road, Thiruvallur".into(),
        city: "Thiruvallur".into(),
        state: "Tamil Nadu".into(),
        password_hash: "pbkdf2:sha256:600000$sample$not-a-real-hash".into(),
        is_verified: true,
        is_active: true,
    }
}

fn sample_items(recommendation_id: i64) -> Vec<NewRecommendationItem> {
    vec![
        NewRecommendationItem {
            recommendation_id,
            antibiotic_name: Some("Oxytetracycline".into()),
            total_limit: Some("200 ml".into()),
            animal_type: Some("cow".into()),
            weight: Some(350.0),
            age: Some(4.0),
            disease: Some("Mastitis".into()),
            single_dose_ml: Some(17.5),
            treatment_days: Some(5),
            daily_frequency: Some(2),
            total_daily_dosage_ml: Some(35.0),
            total_treatment_dosage_ml: Some(175.0),
            frequency_description: Some("Twice daily, every 12 hours".into()),
            dosage_per_kg: Some(0.05),
            age_category: Some("adult".into()),
            confidence: Some("high".into()),
            calculation_note: Some("Standard adult cattle dose".into()),
            ..Default::default()
        },
        NewRecommendationItem {
            recommendation_id,
            antibiotic_name: Some("Meloxicam".into()),
            total_limit: Some("50 ml".into()),
            animal_type: Some("cow".into()),
            weight: Some(350.0),
            age: Some(4.0),
            disease: Some("Mastitis".into()),
            single_dose_ml: Some(17.5),
            treatment_days: Some(3),
            daily_frequency: Some(1),
            total_daily_dosage_ml: Some(17.5),
            total_treatment_dosage_ml: Some(52.5),
            frequency_description: Some("Once daily".into()),
            dosage_per_kg: Some(0.05),
            age_category: Some("adult".into()),
            confidence: Some("medium".into()),
            calculation_note: None,
            ..Default::default()
        },
    ]
}

impl Database {
    /// Insert one doctor, farmer, shop and an unclaimed two-item
    /// recommendation, all or nothing.
    ///
    /// Fails with a constraint error if the sample shop is already present.
    pub fn seed_sample_data(&self) -> DbResult<SeedSummary> {
        let tx = self.transaction()?;

        let doctor_id = self.insert_doctor(&sample_doctor())?;
        let farmer_id = self.insert_farmer(&sample_farmer(doctor_id))?;
        let shop_id = self.insert_shop(&sample_shop())?;
        let recommendation_id = self.create_recommendation(farmer_id, doctor_id)?;
        let item_ids = sample_items(recommendation_id)
            .iter()
            .map(|item| self.insert_item(item))
            .collect::<DbResult<Vec<_>>>()?;

        tx.commit()?;
        log::info!(
            "Seeded sample data: doctor {}, farmer {}, shop {}, recommendation {}",
            doctor_id,
            farmer_id,
            shop_id,
            recommendation_id
        );

        Ok(SeedSummary {
            doctor_id,
            farmer_id,
            shop_id,
            recommendation_id,
            item_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbError, SchemaVariant};

    #[test]
    fn test_seed() {
        let db = Database::open_in_memory().unwrap();
        let summary = db.seed_sample_data().unwrap();

        let farmer = db.get_farmer(summary.farmer_id).unwrap().unwrap();
        assert_eq!(farmer.mobile_no, "918122762374");
        assert_eq!(farmer.doctor_id, summary.doctor_id);

        let rec = db.get_recommendation(summary.recommendation_id).unwrap().unwrap();
        assert!(!rec.is_claimed);
        assert_eq!(db.list_items(summary.recommendation_id).unwrap().len(), 2);
        assert_eq!(summary.item_ids.len(), 2);
    }

    #[test]
    fn test_seed_strict_variant() {
        let db = Database::open_in_memory_with_variant(SchemaVariant::Strict).unwrap();
        assert!(db.seed_sample_data().is_ok());
    }

    #[test]
    fn test_seed_twice_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        db.seed_sample_data().unwrap();

        let err = db.seed_sample_data().unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));

        let doctors: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))
            .unwrap();
        assert_eq!(doctors, 1);
    }
}
