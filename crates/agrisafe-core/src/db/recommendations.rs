//! Medicine recommendation database operations.
//!
//! Covers issuing recommendations, the shop claim flow, a shop's claim
//! history and the unclaimed-recommendation search.

use chrono::{NaiveDate, NaiveDateTime, SubsecRound, Utc};
use rusqlite::{params, params_from_iter, types::Value, OptionalExtension, Row};

use super::{sql_datetime, Database, DbError, DbResult};
use crate::models::{
    treatment_end, ClaimFilter, ClaimReceipt, MedicineRecommendation, Page, RecommendationDetail,
    SearchFilter, UnclaimedRecommendation,
};

const RECOMMENDATION_COLUMNS: &str = r#"
    mr.id, mr.farmer_id, mr.doctor_id, mr.is_claimed, mr.claimed_by_shop_id,
    mr.claimed_at, mr.claim_notes, mr.created_at, mr.updated_at
"#;

fn recommendation_from_row(row: &Row<'_>) -> rusqlite::Result<MedicineRecommendation> {
    Ok(MedicineRecommendation {
        id: row.get(0)?,
        farmer_id: row.get(1)?,
        doctor_id: row.get(2)?,
        is_claimed: row.get(3)?,
        claimed_by_shop_id: row.get(4)?,
        claimed_at: row.get(5)?,
        claim_notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn unclaimed_from_row(row: &Row<'_>) -> rusqlite::Result<UnclaimedRecommendation> {
    Ok(UnclaimedRecommendation {
        id: row.get(0)?,
        farmer_id: row.get(1)?,
        doctor_id: row.get(2)?,
        created_at: row.get(3)?,
        farmer_name: row.get(4)?,
        farmer_mobile: row.get(5)?,
        farmer_area: row.get(6)?,
        farmer_pincode: row.get(7)?,
        doctor_name: row.get(8)?,
        hospital_name: row.get(9)?,
        doctor_mobile: row.get(10)?,
        doctor_address: row.get(11)?,
        doctor_pincode: row.get(12)?,
    })
}

fn page_offset(page: Page) -> DbResult<i64> {
    page.offset().ok_or_else(|| {
        DbError::InvalidInput(format!(
            "Page number and size must be at least 1 (got page {}, size {})",
            page.number, page.per_page
        ))
    })
}

/// Wall-clock claim time, stored without fractional seconds.
fn claim_time() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

impl Database {
    /// Issue a new, unclaimed recommendation and return its id.
    pub fn create_recommendation(&self, farmer_id: i64, doctor_id: i64) -> DbResult<i64> {
        self.conn.execute(
            "INSERT INTO medicine_recommendations (farmer_id, doctor_id, is_claimed) VALUES (?1, ?2, 0)",
            params![farmer_id, doctor_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a recommendation by id.
    pub fn get_recommendation(&self, id: i64) -> DbResult<Option<MedicineRecommendation>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM medicine_recommendations mr WHERE mr.id = ?",
                    RECOMMENDATION_COLUMNS
                ),
                [id],
                recommendation_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Mark a recommendation as claimed by `shop_id` now.
    ///
    /// Returns `false` if it does not exist or was already claimed.
    pub fn claim_recommendation(&self, id: i64, shop_id: i64, notes: Option<&str>) -> DbResult<bool> {
        self.claim_recommendation_at(id, shop_id, notes, claim_time())
    }

    /// Mark a recommendation as claimed by `shop_id` at `claimed_at`.
    pub fn claim_recommendation_at(
        &self,
        id: i64,
        shop_id: i64,
        notes: Option<&str>,
        claimed_at: NaiveDateTime,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medicine_recommendations SET
                is_claimed = 1,
                claimed_by_shop_id = ?2,
                claimed_at = ?3,
                claim_notes = ?4,
                updated_at = datetime('now')
            WHERE id = ?1 AND is_claimed = 0
            "#,
            params![id, shop_id, sql_datetime(claimed_at), notes],
        )?;
        Ok(rows_affected > 0)
    }

    /// Claim a recommendation and schedule every item from `start_date`.
    ///
    /// Runs in one transaction: either the claim and all item dates are
    /// written, or nothing is.
    pub fn claim_with_schedule(
        &self,
        id: i64,
        shop_id: i64,
        start_date: NaiveDate,
        notes: Option<&str>,
    ) -> DbResult<ClaimReceipt> {
        let tx = self.transaction()?;

        let recommendation = self
            .get_recommendation(id)?
            .ok_or_else(|| DbError::NotFound(format!("recommendation {}", id)))?;
        if recommendation.is_claimed {
            return Err(DbError::AlreadyClaimed(id));
        }

        let items = self.list_items(id)?;
        if items.is_empty() {
            return Err(DbError::NotFound(format!("items for recommendation {}", id)));
        }
        let max_treatment_days = items
            .iter()
            .map(|item| item.effective_treatment_days())
            .max()
            .unwrap_or(1);

        let out_of_range = || {
            DbError::InvalidInput(format!(
                "treatment for recommendation {} starting {} ends past the calendar",
                id, start_date
            ))
        };
        let end_date = treatment_end(start_date, max_treatment_days).ok_or_else(out_of_range)?;
        let schedule = items
            .iter()
            .map(|item| Ok((item.id, item.end_date_from(start_date).ok_or_else(out_of_range)?)))
            .collect::<DbResult<Vec<_>>>()?;

        let claimed_at = claim_time();
        if !self.claim_recommendation_at(id, shop_id, notes, claimed_at)? {
            return Err(DbError::AlreadyClaimed(id));
        }
        for (item_id, item_end) in schedule {
            self.update_item_dates(item_id, start_date, item_end)?;
        }

        tx.commit()?;
        log::info!(
            "Shop {} claimed recommendation {} ({} items, {} days)",
            shop_id,
            id,
            items.len(),
            max_treatment_days
        );

        Ok(ClaimReceipt {
            recommendation_id: id,
            shop_id,
            claimed_at,
            start_date,
            end_date,
            max_treatment_days,
            notes: notes.map(String::from),
        })
    }

    /// Recommendations claimed by a shop, newest claim first, with the total
    /// matching count.
    pub fn list_claimed_by_shop(
        &self,
        shop_id: i64,
        filter: &ClaimFilter,
        page: Page,
    ) -> DbResult<(Vec<MedicineRecommendation>, i64)> {
        let offset = page_offset(page)?;

        let mut where_sql = String::from("WHERE mr.claimed_by_shop_id = ? AND mr.is_claimed = 1");
        let mut values = vec![Value::Integer(shop_id)];

        if let Some(from) = filter.from {
            where_sql.push_str(" AND mr.claimed_at >= ?");
            values.push(Value::Text(sql_datetime(from)));
        }
        if let Some(to) = filter.to {
            where_sql.push_str(" AND mr.claimed_at < ?");
            values.push(Value::Text(sql_datetime(to)));
        }
        push_animal_type(&mut where_sql, &mut values, filter.animal_type.as_deref());

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM medicine_recommendations mr {}", where_sql),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        values.push(Value::Integer(page.per_page as i64));
        values.push(Value::Integer(offset));
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM medicine_recommendations mr {} ORDER BY mr.claimed_at DESC, mr.id DESC LIMIT ? OFFSET ?",
            RECOMMENDATION_COLUMNS, where_sql
        ))?;
        let rows = stmt.query_map(params_from_iter(values.iter()), recommendation_from_row)?;
        let recommendations = rows.collect::<Result<Vec<_>, _>>()?;

        Ok((recommendations, total))
    }

    /// Unclaimed recommendations matching `filter`, newest first, with the
    /// total matching count.
    pub fn search_unclaimed(
        &self,
        filter: &SearchFilter,
        page: Page,
    ) -> DbResult<(Vec<UnclaimedRecommendation>, i64)> {
        let offset = page_offset(page)?;

        let mut where_sql = String::from("WHERE mr.is_claimed = 0");
        let mut values = Vec::new();

        if let Some(query) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            match query.parse::<i64>() {
                Ok(id) => {
                    where_sql.push_str(" AND mr.id = ?");
                    values.push(Value::Integer(id));
                }
                Err(_) => {
                    let pattern = format!("%{}%", query);
                    where_sql.push_str(" AND (f.name LIKE ? OR f.area LIKE ?)");
                    values.push(Value::Text(pattern.clone()));
                    values.push(Value::Text(pattern));
                }
            }
        }
        if let Some(pincode) = filter.pincode.as_deref().filter(|p| !p.is_empty()) {
            where_sql.push_str(" AND (f.pincode = ? OR d.pincode = ?)");
            values.push(Value::Text(pincode.to_string()));
            values.push(Value::Text(pincode.to_string()));
        }
        push_animal_type(&mut where_sql, &mut values, filter.animal_type.as_deref());

        let from_sql = r#"
            FROM medicine_recommendations mr
            LEFT JOIN farmers f ON mr.farmer_id = f.id
            LEFT JOIN doctors d ON mr.doctor_id = d.id
        "#;

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) {} {}", from_sql, where_sql),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        values.push(Value::Integer(page.per_page as i64));
        values.push(Value::Integer(offset));
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT mr.id, mr.farmer_id, mr.doctor_id, mr.created_at,
                   f.name, f.mobile_no, f.area, f.pincode,
                   d.doctor_name, d.hospital_name, d.mobile_no, d.address, d.pincode
            {} {}
            ORDER BY mr.created_at DESC, mr.id DESC
            LIMIT ? OFFSET ?
            "#,
            from_sql, where_sql
        ))?;
        let rows = stmt.query_map(params_from_iter(values.iter()), unclaimed_from_row)?;
        let recommendations = rows.collect::<Result<Vec<_>, _>>()?;

        Ok((recommendations, total))
    }

    /// Delete a recommendation and, under the cascading schema, its items.
    pub fn delete_recommendation(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medicine_recommendations WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// A recommendation together with its farmer, doctor, claiming shop and items.
    pub fn recommendation_detail(&self, id: i64) -> DbResult<Option<RecommendationDetail>> {
        let Some(recommendation) = self.get_recommendation(id)? else {
            return Ok(None);
        };

        let farmer = self.get_farmer(recommendation.farmer_id)?;
        let doctor = self.get_doctor(recommendation.doctor_id)?;
        let claimed_shop = match recommendation.claimed_by_shop_id {
            Some(shop_id) if recommendation.is_claimed => self.get_shop(shop_id)?,
            _ => None,
        };
        let items = self.list_items(id)?;

        Ok(Some(RecommendationDetail {
            recommendation,
            farmer,
            doctor,
            claimed_shop,
            items,
        }))
    }
}

fn push_animal_type(where_sql: &mut String, values: &mut Vec<Value>, animal_type: Option<&str>) {
    if let Some(animal_type) = animal_type.filter(|a| !a.is_empty()) {
        where_sql.push_str(
            r#" AND EXISTS (
                SELECT 1 FROM recommendation_items ri
                WHERE ri.recommendation_id = mr.id AND ri.animal_type = ?
            )"#,
        );
        values.push(Value::Text(animal_type.to_string()));
    }
}
