//! Medical shop database operations.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, params_from_iter, types::Value, OptionalExtension, Row};

use super::{sql_datetime, Database, DbError, DbResult};
use crate::models::{MedicalShop, NewMedicalShop, ShopProfileUpdate, ShopStatistics};

const SHOP_COLUMNS: &str = r#"
    id, shop_name, owner_name, mobile_no, email, license_number,
    pincode, address, city, state, password_hash, is_verified,
    is_active, created_at, updated_at
"#;

fn shop_from_row(row: &Row<'_>) -> rusqlite::Result<MedicalShop> {
    Ok(MedicalShop {
        id: row.get(0)?,
        shop_name: row.get(1)?,
        owner_name: row.get(2)?,
        mobile_no: row.get(3)?,
        email: row.get(4)?,
        license_number: row.get(5)?,
        pincode: row.get(6)?,
        address: row.get(7)?,
        city: row.get(8)?,
        state: row.get(9)?,
        password_hash: row.get(10)?,
        is_verified: row.get(11)?,
        is_active: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

impl Database {
    /// Register a shop and return its id.
    ///
    /// A mobile number already used by another shop is a
    /// [`DbError::Constraint`].
    pub fn insert_shop(&self, shop: &NewMedicalShop) -> DbResult<i64> {
        shop.validate().map_err(DbError::InvalidInput)?;

        self.conn.execute(
            r#"
            INSERT INTO medical_shops (
                shop_name, owner_name, mobile_no, email, license_number, pincode,
                address, city, state, password_hash, is_verified, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                shop.shop_name,
                shop.owner_name,
                shop.mobile_no,
                shop.email,
                shop.license_number,
                shop.pincode,
                shop.address,
                shop.city,
                shop.state,
                shop.password_hash,
                shop.is_verified,
                shop.is_active,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("Registered medical shop {} ({})", id, shop.mobile_no);
        Ok(id)
    }

    /// Get a shop by id.
    pub fn get_shop(&self, id: i64) -> DbResult<Option<MedicalShop>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM medical_shops WHERE id = ?", SHOP_COLUMNS),
                [id],
                shop_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a shop by its login mobile number.
    pub fn get_shop_by_mobile(&self, mobile_no: &str) -> DbResult<Option<MedicalShop>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM medical_shops WHERE mobile_no = ?", SHOP_COLUMNS),
                [mobile_no],
                shop_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Apply a partial profile edit.
    ///
    /// Returns `true` when a row changed, or when there was nothing to change.
    pub fn update_shop_profile(&self, id: i64, update: &ShopProfileUpdate) -> DbResult<bool> {
        let assignments = update.assignments();
        if assignments.is_empty() {
            return Ok(true);
        }

        let mut set_clauses: Vec<String> = assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
            .collect();
        set_clauses.push("updated_at = datetime('now')".to_string());

        let mut values: Vec<Value> = assignments
            .iter()
            .map(|(_, value)| Value::Text(value.to_string()))
            .collect();
        values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE medical_shops SET {} WHERE id = ?{}",
            set_clauses.join(", "),
            values.len()
        );
        let rows_affected = self.conn.execute(&sql, params_from_iter(values))?;
        Ok(rows_affected > 0)
    }

    /// Delete a shop. Recommendations it claimed keep their claim flag but
    /// lose the shop reference.
    pub fn delete_shop(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medical_shops WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Claim counts for a shop relative to `today`.
    pub fn shop_statistics(&self, shop_id: i64, today: NaiveDate) -> DbResult<ShopStatistics> {
        let total_claims: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM medicine_recommendations WHERE claimed_by_shop_id = ? AND is_claimed = 1",
            [shop_id],
            |row| row.get(0),
        )?;

        let (day_start, day_end) = day_bounds(today);
        let (week_start, week_end) = week_bounds(today);
        let (month_start, month_end) = month_bounds(today);

        Ok(ShopStatistics {
            total_claims,
            todays_claims: self.count_claims_between(shop_id, day_start, day_end)?,
            this_week_claims: self.count_claims_between(shop_id, week_start, week_end)?,
            this_month_claims: self.count_claims_between(shop_id, month_start, month_end)?,
        })
    }

    fn count_claims_between(
        &self,
        shop_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> DbResult<i64> {
        self.conn
            .query_row(
                r#"
                SELECT COUNT(*) FROM medicine_recommendations
                WHERE claimed_by_shop_id = ?1 AND is_claimed = 1
                  AND claimed_at >= ?2 AND claimed_at < ?3
                "#,
                params![shop_id, sql_datetime(from), sql_datetime(to)],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn day_bounds(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    (midnight(today), midnight(tomorrow))
}

/// Monday 00:00 to the following Monday 00:00.
fn week_bounds(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let back = today.weekday().num_days_from_monday() as u64;
    let monday = today.checked_sub_days(Days::new(back)).unwrap_or(today);
    let next_monday = monday.checked_add_days(Days::new(7)).unwrap_or(monday);
    (midnight(monday), midnight(next_monday))
}

fn month_bounds(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let first = today.with_day(1).unwrap_or(today);
    let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
    (midnight(first), midnight(next))
}
