//! Farmer database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Farmer, NewFarmer};

fn farmer_from_row(row: &Row<'_>) -> rusqlite::Result<Farmer> {
    Ok(Farmer {
        id: row.get(0)?,
        name: row.get(1)?,
        mobile_no: row.get(2)?,
        area: row.get(3)?,
        pincode: row.get(4)?,
        doctor_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl Database {
    /// Onboard a farmer under an existing doctor and return the new id.
    pub fn insert_farmer(&self, farmer: &NewFarmer) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO farmers (name, mobile_no, area, pincode, doctor_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                farmer.name,
                farmer.mobile_no,
                farmer.area,
                farmer.pincode,
                farmer.doctor_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a farmer by id.
    pub fn get_farmer(&self, id: i64) -> DbResult<Option<Farmer>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, mobile_no, area, pincode, doctor_id, created_at, updated_at
                FROM farmers
                WHERE id = ?
                "#,
                [id],
                farmer_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List a doctor's farmers by name.
    pub fn list_farmers_for_doctor(&self, doctor_id: i64) -> DbResult<Vec<Farmer>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, mobile_no, area, pincode, doctor_id, created_at, updated_at
            FROM farmers
            WHERE doctor_id = ?
            ORDER BY name, id
            "#,
        )?;

        let rows = stmt.query_map([doctor_id], farmer_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a farmer.
    pub fn delete_farmer(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM farmers WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
