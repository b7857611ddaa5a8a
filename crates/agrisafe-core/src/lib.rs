//! AgriSafe Core Library
//!
//! Relational storage for veterinary medicine recommendations that doctors
//! issue to farmers and that medical shops claim and fulfil.
//!
//! # Data model
//!
//! ```text
//!   doctors ──< farmers ──< medicine_recommendations >── doctors
//!                                   │        │
//!                                   │        └──(claimed_by, SET NULL)── medical_shops
//!                                   │
//!                                   └──< recommendation_items
//! ```
//!
//! Deleting a doctor or farmer removes their recommendations, and deleting a
//! recommendation removes its items. Deleting a shop only clears the claim
//! reference; the claim flag and timestamp stay. These rules hold for the
//! default [`SchemaVariant::Cascading`] schema; [`SchemaVariant::Strict`]
//! rejects such deletes instead.
//!
//! # Modules
//!
//! - [`db`]: SQLite schema, the `shop_owner` rename migration, and data access
//! - [`models`]: Domain types (MedicalShop, Doctor, Farmer, recommendations)

pub mod db;
pub mod models;

// Re-export commonly used types
pub use db::{Database, DbError, DbResult, OwnerColumnState, RenameForm, SchemaVariant, SeedSummary};
pub use models::{
    ClaimFilter, ClaimReceipt, Doctor, Farmer, MedicalShop, MedicineRecommendation, NewDoctor,
    NewFarmer, NewMedicalShop, NewRecommendationItem, Page, RecommendationDetail,
    RecommendationItem, SearchFilter, ShopProfileUpdate, ShopStatistics, UnclaimedRecommendation,
};
