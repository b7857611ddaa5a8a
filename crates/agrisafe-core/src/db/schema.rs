//! SQLite schema definition.
//!
//! Two forms of the same five tables are kept side by side. [`SCHEMA`] is the
//! re-runnable form with cascading deletes; [`STRICT_SCHEMA`] creates the
//! tables unconditionally and leaves foreign keys without an action clause,
//! so deleting a referenced row is rejected.
//!
//! Column widths are enforced with `CHECK (length(..) <= n)`.

use std::fmt;
use std::str::FromStr;

/// Which DDL form to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVariant {
    /// `IF NOT EXISTS` everywhere, `ON DELETE CASCADE` / `ON DELETE SET NULL`.
    #[default]
    Cascading,
    /// Plain `CREATE TABLE`; referenced rows cannot be deleted.
    Strict,
}

impl SchemaVariant {
    /// DDL text for this variant.
    pub fn sql(&self) -> &'static str {
        match self {
            SchemaVariant::Cascading => SCHEMA,
            SchemaVariant::Strict => STRICT_SCHEMA,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVariant::Cascading => "cascading",
            SchemaVariant::Strict => "strict",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cascading" | "database_schema" => Ok(SchemaVariant::Cascading),
            "strict" | "create_tables" => Ok(SchemaVariant::Strict),
            other => Err(format!("Unknown schema variant: {}", other)),
        }
    }
}

/// Names of every table the schema creates, in creation order.
pub const TABLES: [&str; 5] = [
    "medical_shops",
    "doctors",
    "farmers",
    "medicine_recommendations",
    "recommendation_items",
];

/// Re-runnable schema with cascading deletes.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medical Shops
-- ============================================================================

CREATE TABLE IF NOT EXISTS medical_shops (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    shop_name TEXT NOT NULL CHECK (length(shop_name) <= 255),
    owner_name TEXT NOT NULL CHECK (length(owner_name) <= 255),
    mobile_no TEXT NOT NULL UNIQUE CHECK (length(mobile_no) <= 20),
    email TEXT CHECK (length(email) <= 255),
    license_number TEXT NOT NULL CHECK (length(license_number) <= 100),
    pincode TEXT NOT NULL CHECK (length(pincode) <= 10),
    address TEXT NOT NULL,
    city TEXT NOT NULL CHECK (length(city) <= 100),
    state TEXT NOT NULL CHECK (length(state) <= 100),
    password_hash TEXT NOT NULL CHECK (length(password_hash) <= 255),
    is_verified INTEGER NOT NULL DEFAULT 0 CHECK (is_verified IN (0, 1)),
    is_active INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1)),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medical_shops_mobile ON medical_shops(mobile_no);
CREATE INDEX IF NOT EXISTS idx_medical_shops_pincode ON medical_shops(pincode);
CREATE INDEX IF NOT EXISTS idx_medical_shops_license ON medical_shops(license_number);
CREATE INDEX IF NOT EXISTS idx_medical_shops_status ON medical_shops(is_verified, is_active);

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hospital_name TEXT NOT NULL CHECK (length(hospital_name) <= 255),
    doctor_name TEXT NOT NULL CHECK (length(doctor_name) <= 255),
    mobile_no TEXT NOT NULL CHECK (length(mobile_no) <= 20),
    pincode TEXT CHECK (length(pincode) <= 10),
    address TEXT,
    map_link TEXT,
    password_hash TEXT CHECK (length(password_hash) <= 255),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_doctors_mobile ON doctors(mobile_no);
CREATE INDEX IF NOT EXISTS idx_doctors_pincode ON doctors(pincode);

-- ============================================================================
-- Farmers
-- ============================================================================

CREATE TABLE IF NOT EXISTS farmers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) <= 255),
    mobile_no TEXT NOT NULL CHECK (length(mobile_no) <= 20),
    area TEXT CHECK (length(area) <= 255),
    pincode TEXT CHECK (length(pincode) <= 10),
    doctor_id INTEGER NOT NULL REFERENCES doctors(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_farmers_mobile ON farmers(mobile_no);
CREATE INDEX IF NOT EXISTS idx_farmers_pincode ON farmers(pincode);
CREATE INDEX IF NOT EXISTS idx_farmers_doctor ON farmers(doctor_id);

-- ============================================================================
-- Medicine Recommendations
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicine_recommendations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    farmer_id INTEGER NOT NULL REFERENCES farmers(id) ON DELETE CASCADE,
    doctor_id INTEGER NOT NULL REFERENCES doctors(id) ON DELETE CASCADE,
    is_claimed INTEGER NOT NULL DEFAULT 0 CHECK (is_claimed IN (0, 1)),
    claimed_by_shop_id INTEGER REFERENCES medical_shops(id) ON DELETE SET NULL,
    claimed_at TEXT,
    claim_notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_recommendations_farmer ON medicine_recommendations(farmer_id);
CREATE INDEX IF NOT EXISTS idx_recommendations_doctor ON medicine_recommendations(doctor_id);
CREATE INDEX IF NOT EXISTS idx_recommendations_claimed ON medicine_recommendations(is_claimed);
CREATE INDEX IF NOT EXISTS idx_recommendations_shop ON medicine_recommendations(claimed_by_shop_id);

-- ============================================================================
-- Recommendation Items (dosage values are stored, never computed here)
-- ============================================================================

CREATE TABLE IF NOT EXISTS recommendation_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recommendation_id INTEGER NOT NULL REFERENCES medicine_recommendations(id) ON DELETE CASCADE,
    antibiotic_name TEXT CHECK (length(antibiotic_name) <= 255),
    total_limit TEXT CHECK (length(total_limit) <= 100),
    animal_type TEXT CHECK (length(animal_type) <= 50),
    weight REAL,
    age REAL,
    disease TEXT CHECK (length(disease) <= 255),
    single_dose_ml REAL,
    start_date TEXT,
    end_date TEXT,
    treatment_days INTEGER,
    daily_frequency INTEGER,
    total_daily_dosage_ml REAL,
    total_treatment_dosage_ml REAL,
    frequency_description TEXT CHECK (length(frequency_description) <= 255),
    dosage_per_kg REAL,
    age_category TEXT CHECK (length(age_category) <= 50),
    confidence TEXT CHECK (length(confidence) <= 50),
    calculation_note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_items_recommendation ON recommendation_items(recommendation_id);
CREATE INDEX IF NOT EXISTS idx_items_animal_type ON recommendation_items(animal_type);
"#;

/// One-shot schema: fails if any table already exists, and foreign keys
/// carry no `ON DELETE` action.
pub const STRICT_SCHEMA: &str = r#"
CREATE TABLE medical_shops (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    shop_name TEXT NOT NULL CHECK (length(shop_name) <= 255),
    owner_name TEXT NOT NULL CHECK (length(owner_name) <= 255),
    mobile_no TEXT NOT NULL UNIQUE CHECK (length(mobile_no) <= 20),
    email TEXT CHECK (length(email) <= 255),
    license_number TEXT NOT NULL CHECK (length(license_number) <= 100),
    pincode TEXT NOT NULL CHECK (length(pincode) <= 10),
    address TEXT NOT NULL,
    city TEXT NOT NULL CHECK (length(city) <= 100),
    state TEXT NOT NULL CHECK (length(state) <= 100),
    password_hash TEXT NOT NULL CHECK (length(password_hash) <= 255),
    is_verified INTEGER NOT NULL DEFAULT 0 CHECK (is_verified IN (0, 1)),
    is_active INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1)),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_medical_shops_mobile ON medical_shops(mobile_no);
CREATE INDEX idx_medical_shops_pincode ON medical_shops(pincode);
CREATE INDEX idx_medical_shops_license ON medical_shops(license_number);
CREATE INDEX idx_medical_shops_status ON medical_shops(is_verified, is_active);

CREATE TABLE doctors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hospital_name TEXT NOT NULL CHECK (length(hospital_name) <= 255),
    doctor_name TEXT NOT NULL CHECK (length(doctor_name) <= 255),
    mobile_no TEXT NOT NULL CHECK (length(mobile_no) <= 20),
    pincode TEXT CHECK (length(pincode) <= 10),
    address TEXT,
    map_link TEXT,
    password_hash TEXT CHECK (length(password_hash) <= 255),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_doctors_mobile ON doctors(mobile_no);
CREATE INDEX idx_doctors_pincode ON doctors(pincode);

CREATE TABLE farmers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) <= 255),
    mobile_no TEXT NOT NULL CHECK (length(mobile_no) <= 20),
    area TEXT CHECK (length(area) <= 255),
    pincode TEXT CHECK (length(pincode) <= 10),
    doctor_id INTEGER NOT NULL REFERENCES doctors(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_farmers_mobile ON farmers(mobile_no);
CREATE INDEX idx_farmers_pincode ON farmers(pincode);
CREATE INDEX idx_farmers_doctor ON farmers(doctor_id);

CREATE TABLE medicine_recommendations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    farmer_id INTEGER NOT NULL REFERENCES farmers(id),
    doctor_id INTEGER NOT NULL REFERENCES doctors(id),
    is_claimed INTEGER NOT NULL DEFAULT 0 CHECK (is_claimed IN (0, 1)),
    claimed_by_shop_id INTEGER REFERENCES medical_shops(id),
    claimed_at TEXT,
    claim_notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_recommendations_farmer ON medicine_recommendations(farmer_id);
CREATE INDEX idx_recommendations_doctor ON medicine_recommendations(doctor_id);
CREATE INDEX idx_recommendations_claimed ON medicine_recommendations(is_claimed);
CREATE INDEX idx_recommendations_shop ON medicine_recommendations(claimed_by_shop_id);

CREATE TABLE recommendation_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recommendation_id INTEGER NOT NULL REFERENCES medicine_recommendations(id),
    antibiotic_name TEXT CHECK (length(antibiotic_name) <= 255),
    total_limit TEXT CHECK (length(total_limit) <= 100),
    animal_type TEXT CHECK (length(animal_type) <= 50),
    weight REAL,
    age REAL,
    disease TEXT CHECK (length(disease) <= 255),
    single_dose_ml REAL,
    start_date TEXT,
    end_date TEXT,
    treatment_days INTEGER,
    daily_frequency INTEGER,
    total_daily_dosage_ml REAL,
    total_treatment_dosage_ml REAL,
    frequency_description TEXT CHECK (length(frequency_description) <= 255),
    dosage_per_kg REAL,
    age_category TEXT CHECK (length(age_category) <= 50),
    confidence TEXT CHECK (length(confidence) <= 50),
    calculation_note TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_items_recommendation ON recommendation_items(recommendation_id);
CREATE INDEX idx_items_animal_type ON recommendation_items(animal_type);
"#;
