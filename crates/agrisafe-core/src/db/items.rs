//! Recommendation item database operations.

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{Database, DbResult};
use crate::models::{NewRecommendationItem, RecommendationItem};

const ITEM_COLUMNS: &str = r#"
    id, recommendation_id, antibiotic_name, total_limit, animal_type,
    weight, age, disease, single_dose_ml, start_date, end_date,
    treatment_days, daily_frequency, total_daily_dosage_ml,
    total_treatment_dosage_ml, frequency_description, dosage_per_kg,
    age_category, confidence, calculation_note, created_at, updated_at
"#;

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<RecommendationItem> {
    Ok(RecommendationItem {
        id: row.get(0)?,
        recommendation_id: row.get(1)?,
        antibiotic_name: row.get(2)?,
        total_limit: row.get(3)?,
        animal_type: row.get(4)?,
        weight: row.get(5)?,
        age: row.get(6)?,
        disease: row.get(7)?,
        single_dose_ml: row.get(8)?,
        start_date: row.get(9)?,
        end_date: row.get(10)?,
        treatment_days: row.get(11)?,
        daily_frequency: row.get(12)?,
        total_daily_dosage_ml: row.get(13)?,
        total_treatment_dosage_ml: row.get(14)?,
        frequency_description: row.get(15)?,
        dosage_per_kg: row.get(16)?,
        age_category: row.get(17)?,
        confidence: row.get(18)?,
        calculation_note: row.get(19)?,
        created_at: row.get(20)?,
        updated_at: row.get(21)?,
    })
}

impl Database {
    /// Persist a generated item and return its id.
    pub fn insert_item(&self, item: &NewRecommendationItem) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO recommendation_items (
                recommendation_id, antibiotic_name, total_limit, animal_type, weight, age,
                disease, single_dose_ml, start_date, end_date, treatment_days, daily_frequency,
                total_daily_dosage_ml, total_treatment_dosage_ml, frequency_description,
                dosage_per_kg, age_category, confidence, calculation_note
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
            "#,
            params![
                item.recommendation_id,
                item.antibiotic_name,
                item.total_limit,
                item.animal_type,
                item.weight,
                item.age,
                item.disease,
                item.single_dose_ml,
                item.start_date,
                item.end_date,
                item.treatment_days,
                item.daily_frequency,
                item.total_daily_dosage_ml,
                item.total_treatment_dosage_ml,
                item.frequency_description,
                item.dosage_per_kg,
                item.age_category,
                item.confidence,
                item.calculation_note,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Items of a recommendation in insertion order.
    pub fn list_items(&self, recommendation_id: i64) -> DbResult<Vec<RecommendationItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM recommendation_items WHERE recommendation_id = ? ORDER BY id",
            ITEM_COLUMNS
        ))?;

        let rows = stmt.query_map([recommendation_id], item_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Set the treatment window of an item.
    pub fn update_item_dates(&self, item_id: i64, start: NaiveDate, end: NaiveDate) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE recommendation_items
            SET start_date = ?2, end_date = ?3, updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![item_id, start, end],
        )?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::models::{NewDoctor, NewFarmer};

    fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let doctor_id = db
            .insert_doctor(&NewDoctor::new(
                "Sri Venkateswara Veterinary Hospital".into(),
                "Dr. Ramesh Kumar".into(),
                "919845012345".into(),
            ))
            .unwrap();
        let farmer_id = db
            .insert_farmer(&NewFarmer::new("Murugan".into(), "918122762374".into(), doctor_id))
            .unwrap();
        let rec_id = db.create_recommendation(farmer_id, doctor_id).unwrap();
        (db, rec_id)
    }

    #[test]
    fn test_insert_and_list() {
        let (db, rec_id) = setup_db();

        let mut first = NewRecommendationItem::new(rec_id, "Oxytetracycline");
        first.animal_type = Some("cow".into());
        first.weight = Some(350.0);
        first.single_dose_ml = Some(17.5);
        first.daily_frequency = Some(2);
        first.treatment_days = Some(5);
        first.total_daily_dosage_ml = Some(35.0);
        first.confidence = Some("high".into());
        db.insert_item(&first).unwrap();
        db.insert_item(&NewRecommendationItem::new(rec_id, "Meloxicam"))
            .unwrap();

        let items = db.list_items(rec_id).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].antibiotic_name.as_deref(), Some("Oxytetracycline"));
        assert_eq!(items[0].total_daily_dosage_ml, Some(35.0));
        assert_eq!(items[0].treatment_days, Some(5));
        assert_eq!(items[1].antibiotic_name.as_deref(), Some("Meloxicam"));
        assert_eq!(items[1].start_date, None);
    }

    #[test]
    fn test_update_dates() {
        let (db, rec_id) = setup_db();
        let item_id = db
            .insert_item(&NewRecommendationItem::new(rec_id, "Oxytetracycline"))
            .unwrap();

        let start = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        assert!(db.update_item_dates(item_id, start, end).unwrap());
        assert!(!db.update_item_dates(item_id + 1, start, end).unwrap());

        let items = db.list_items(rec_id).unwrap();
        assert_eq!(items[0].start_date, Some(start));
        assert_eq!(items[0].end_date, Some(end));
    }

    #[test]
    fn test_item_requires_recommendation() {
        let (db, rec_id) = setup_db();
        let err = db
            .insert_item(&NewRecommendationItem::new(rec_id + 1, "Oxytetracycline"))
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn test_animal_type_width_enforced() {
        let (db, rec_id) = setup_db();
        let mut item = NewRecommendationItem::new(rec_id, "Oxytetracycline");
        item.animal_type = Some("x".repeat(51));
        assert!(matches!(db.insert_item(&item), Err(DbError::Constraint(_))));
    }
}
