//! Doctor database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Doctor, NewDoctor};

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        hospital_name: row.get(1)?,
        doctor_name: row.get(2)?,
        mobile_no: row.get(3)?,
        pincode: row.get(4)?,
        address: row.get(5)?,
        map_link: row.get(6)?,
        password_hash: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl Database {
    /// Onboard a doctor and return the new id.
    pub fn insert_doctor(&self, doctor: &NewDoctor) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO doctors (
                hospital_name, doctor_name, mobile_no, pincode, address, map_link, password_hash
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                doctor.hospital_name,
                doctor.doctor_name,
                doctor.mobile_no,
                doctor.pincode,
                doctor.address,
                doctor.map_link,
                doctor.password_hash,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a doctor by id.
    pub fn get_doctor(&self, id: i64) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                r#"
                SELECT id, hospital_name, doctor_name, mobile_no, pincode, address,
                       map_link, password_hash, created_at
                FROM doctors
                WHERE id = ?
                "#,
                [id],
                doctor_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Delete a doctor.
    ///
    /// Under the cascading schema this removes the doctor's farmers and every
    /// recommendation (and item) tied to either; under the strict schema it is
    /// rejected while anything still references the doctor.
    pub fn delete_doctor(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM doctors WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
