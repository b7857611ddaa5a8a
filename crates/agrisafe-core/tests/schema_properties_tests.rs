//! Referential and structural behavior of the two schema variants.

use agrisafe_core::db::{Database, DbError, OwnerColumnState, SchemaVariant};
use agrisafe_core::models::{NewDoctor, NewFarmer, NewMedicalShop, NewRecommendationItem};
use proptest::prelude::*;

struct Graph {
    doctor_id: i64,
    farmer_id: i64,
    recommendation_id: i64,
}

fn make_shop(mobile_no: &str) -> NewMedicalShop {
    NewMedicalShop {
        shop_name: "Green Cross Pharmacy".to_string(),
        owner_name: "Arul Selvam".to_string(),
        mobile_no: mobile_no.to_string(),
        email: None,
        license_number: "TN-MED-2023-117".to_string(),
        pincode: "641001".to_string(),
        address: "3 Cross Cut Road".to_string(),
        city: "Coimbatore".to_string(),
        state: "Tamil Nadu".to_string(),
        password_hash: "pbkdf2:sha256:600000$x$y".to_string(),
        is_verified: false,
        is_active: true,
    }
}

fn build_graph(db: &Database) -> Graph {
    let doctor_id = db
        .insert_doctor(&NewDoctor::new(
            "Kaveri Animal Clinic".to_string(),
            "Dr. Priya".to_string(),
            "919845000000".to_string(),
        ))
        .unwrap();
    let farmer_id = db
        .insert_farmer(&NewFarmer::new(
            "Murugan".to_string(),
            "918122762374".to_string(),
            doctor_id,
        ))
        .unwrap();
    let recommendation_id = db.create_recommendation(farmer_id, doctor_id).unwrap();
    db.insert_item(&NewRecommendationItem::new(recommendation_id, "Oxytetracycline"))
        .unwrap();
    db.insert_item(&NewRecommendationItem::new(recommendation_id, "Meloxicam"))
        .unwrap();

    Graph {
        doctor_id,
        farmer_id,
        recommendation_id,
    }
}

fn count(db: &Database, table: &str) -> i64 {
    db.conn()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_cascading_schema_applies_twice() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.apply_schema(SchemaVariant::Cascading).is_ok());
}

#[test]
fn test_strict_schema_applies_once() {
    let db = Database::open_in_memory_with_variant(SchemaVariant::Strict).unwrap();
    let err = db.apply_schema(SchemaVariant::Strict).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn test_file_reopen_per_variant() {
    let dir = tempfile::tempdir().unwrap();
    let cascading_path = dir.path().join("cascading.db");
    let strict_path = dir.path().join("strict.db");

    {
        let db = Database::open(&cascading_path).unwrap();
        build_graph(&db);
    }
    let db = Database::open(&cascading_path).unwrap();
    assert_eq!(count(&db, "farmers"), 1);

    Database::open_with_variant(&strict_path, SchemaVariant::Strict).unwrap();
    assert!(Database::open_with_variant(&strict_path, SchemaVariant::Strict).is_err());
}

#[test]
fn test_duplicate_shop_mobile_rejected() {
    for variant in [SchemaVariant::Cascading, SchemaVariant::Strict] {
        let db = Database::open_in_memory_with_variant(variant).unwrap();
        db.insert_shop(&make_shop("919443012345")).unwrap();

        let err = db.insert_shop(&make_shop("919443012345")).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)), "{}: {:?}", variant, err);
    }
}

#[test]
fn test_doctor_delete_cascades() {
    let db = Database::open_in_memory().unwrap();
    let graph = build_graph(&db);

    assert!(db.delete_doctor(graph.doctor_id).unwrap());

    assert!(db.get_farmer(graph.farmer_id).unwrap().is_none());
    assert!(db.get_recommendation(graph.recommendation_id).unwrap().is_none());
    assert_eq!(count(&db, "recommendation_items"), 0);
}

#[test]
fn test_doctor_delete_rejected_by_strict_schema() {
    let db = Database::open_in_memory_with_variant(SchemaVariant::Strict).unwrap();
    let graph = build_graph(&db);

    let err = db.delete_doctor(graph.doctor_id).unwrap_err();
    assert!(matches!(err, DbError::Constraint(_)), "got {:?}", err);

    assert!(db.get_doctor(graph.doctor_id).unwrap().is_some());
    assert_eq!(count(&db, "recommendation_items"), 2);
}

#[test]
fn test_farmer_delete_cascades_to_items() {
    let db = Database::open_in_memory().unwrap();
    let graph = build_graph(&db);

    assert!(db.delete_farmer(graph.farmer_id).unwrap());
    assert!(db.get_recommendation(graph.recommendation_id).unwrap().is_none());
    assert_eq!(count(&db, "recommendation_items"), 0);
    assert!(db.get_doctor(graph.doctor_id).unwrap().is_some());
}

#[test]
fn test_recommendation_delete_cascades_to_items() {
    let db = Database::open_in_memory().unwrap();
    let graph = build_graph(&db);

    assert!(db.delete_recommendation(graph.recommendation_id).unwrap());
    assert!(db.list_items(graph.recommendation_id).unwrap().is_empty());
    assert!(db.get_farmer(graph.farmer_id).unwrap().is_some());
}

#[test]
fn test_shop_delete_clears_claim_reference() {
    let db = Database::open_in_memory().unwrap();
    let graph = build_graph(&db);
    let shop_id = db.insert_shop(&make_shop("919443012345")).unwrap();
    assert!(db
        .claim_recommendation(graph.recommendation_id, shop_id, Some("Delivered"))
        .unwrap());

    assert!(db.delete_shop(shop_id).unwrap());

    let rec = db.get_recommendation(graph.recommendation_id).unwrap().unwrap();
    assert_eq!(rec.claimed_by_shop_id, None);
    assert!(rec.is_claimed);
    assert!(rec.claimed_at.is_some());
    assert_eq!(rec.claim_notes.as_deref(), Some("Delivered"));
    assert_eq!(db.list_items(graph.recommendation_id).unwrap().len(), 2);
}

#[test]
fn test_shop_delete_rejected_by_strict_schema_while_claimed() {
    let db = Database::open_in_memory_with_variant(SchemaVariant::Strict).unwrap();
    let graph = build_graph(&db);
    let shop_id = db.insert_shop(&make_shop("919443012345")).unwrap();
    db.claim_recommendation(graph.recommendation_id, shop_id, None)
        .unwrap();

    assert!(matches!(db.delete_shop(shop_id), Err(DbError::Constraint(_))));
}

#[test]
fn test_migration_against_current_schema_fails() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.verify_owner_column().unwrap(), OwnerColumnState::Current);

    let err = db.rename_owner_column().unwrap_err();
    assert!(matches!(err, DbError::ColumnNotFound(_)), "got {:?}", err);
    assert!(err.to_string().contains("shop_owner"));
}

#[test]
fn test_sample_farmer_mobile_fits() {
    let db = Database::open_in_memory().unwrap();
    let graph = build_graph(&db);
    let farmer = db.get_farmer(graph.farmer_id).unwrap().unwrap();
    assert_eq!(farmer.mobile_no, "918122762374");
    assert_eq!(farmer.mobile_no.len(), 12);
}

proptest! {
    #[test]
    fn prop_farmer_mobile_width(mobile in "[0-9]{1,30}") {
        let db = Database::open_in_memory().unwrap();
        let doctor_id = db
            .insert_doctor(&NewDoctor::new("H".to_string(), "D".to_string(), "919845000000".to_string()))
            .unwrap();

        let result = db.insert_farmer(&NewFarmer::new("F".to_string(), mobile.clone(), doctor_id));
        if mobile.len() <= 20 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(result, Err(DbError::Constraint(_))));
        }
    }

    #[test]
    fn prop_shop_pincode_width(pincode in "[1-9][0-9]{0,14}") {
        let db = Database::open_in_memory().unwrap();
        let mut shop = make_shop("919443012345");
        shop.pincode = pincode.clone();

        let result = db.insert_shop(&shop);
        if pincode.len() <= 10 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(result, Err(DbError::Constraint(_))));
        }
    }
}
