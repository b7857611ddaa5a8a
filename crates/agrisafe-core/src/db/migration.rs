//! One-off rename of `medical_shops.shop_owner` to `owner_name`.
//!
//! The migration is run by hand against a deployment the operator knows to
//! still carry the legacy column. Nothing is checked up front: running it a
//! second time fails with [`DbError::ColumnNotFound`].

use std::fmt;
use std::str::FromStr;

use super::{Database, DbError, DbResult};

pub const MIGRATED_TABLE: &str = "medical_shops";
pub const LEGACY_OWNER_COLUMN: &str = "shop_owner";
pub const OWNER_COLUMN: &str = "owner_name";

/// Statement used to eyeball the result after the rename.
pub const VERIFY_STATEMENT: &str = "DESCRIBE medical_shops;";

/// Engine-specific spelling of the rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameForm {
    /// `CHANGE COLUMN`, which restates the column type.
    ChangeColumn,
    /// `RENAME COLUMN ... TO ...`, understood by SQLite and newer MySQL.
    #[default]
    RenameColumn,
}

impl RenameForm {
    pub fn statement(&self) -> String {
        match self {
            RenameForm::ChangeColumn => format!(
                "ALTER TABLE {} CHANGE COLUMN {} {} VARCHAR(255) NOT NULL;",
                MIGRATED_TABLE, LEGACY_OWNER_COLUMN, OWNER_COLUMN
            ),
            RenameForm::RenameColumn => format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {};",
                MIGRATED_TABLE, LEGACY_OWNER_COLUMN, OWNER_COLUMN
            ),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenameForm::ChangeColumn => "change-column",
            RenameForm::RenameColumn => "rename-column",
        }
    }
}

impl fmt::Display for RenameForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenameForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "change-column" | "change" => Ok(RenameForm::ChangeColumn),
            "rename-column" | "rename" => Ok(RenameForm::RenameColumn),
            other => Err(format!("Unknown rename form: {}", other)),
        }
    }
}

/// Full operator script: the rename in the chosen form, then verification.
pub fn render_script(form: RenameForm) -> String {
    format!(
        "-- Rename {table}.{old} to {new}\n\
         -- Run once, only against a schema that still has {old}.\n\
         {stmt}\n\
         \n\
         -- Verify\n\
         {verify}\n",
        table = MIGRATED_TABLE,
        old = LEGACY_OWNER_COLUMN,
        new = OWNER_COLUMN,
        stmt = form.statement(),
        verify = VERIFY_STATEMENT,
    )
}

/// Which owner column `medical_shops` currently carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerColumnState {
    /// `owner_name` present, `shop_owner` gone
    Current,
    /// Still on `shop_owner`
    Legacy,
    /// Neither column, or the table itself is missing
    Missing,
}

impl Database {
    /// Rename `shop_owner` to `owner_name` in place.
    pub fn rename_owner_column(&self) -> DbResult<()> {
        let statement = RenameForm::RenameColumn.statement();
        log::info!("Running migration: {}", statement);
        self.conn.execute_batch(&statement).map_err(|e| {
            let err = DbError::from(e);
            log::error!("Migration failed: {}", err);
            err
        })?;
        Ok(())
    }

    /// Inspect `medical_shops` for the owner column.
    pub fn verify_owner_column(&self) -> DbResult<OwnerColumnState> {
        let columns = self.table_columns(MIGRATED_TABLE)?;
        let has = |name: &str| columns.iter().any(|c| c == name);

        let state = if has(OWNER_COLUMN) && !has(LEGACY_OWNER_COLUMN) {
            OwnerColumnState::Current
        } else if has(LEGACY_OWNER_COLUMN) {
            OwnerColumnState::Legacy
        } else {
            OwnerColumnState::Missing
        };
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_SHOPS: &str = r#"
        CREATE TABLE medical_shops (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            shop_name TEXT NOT NULL,
            shop_owner TEXT NOT NULL,
            mobile_no TEXT NOT NULL UNIQUE
        );
        INSERT INTO medical_shops (shop_name, shop_owner, mobile_no)
        VALUES ('Green Cross Pharmacy', 'Arul Selvam', '919443012345');
    "#;

    fn legacy_db() -> Database {
        let db = Database::connect_in_memory().unwrap();
        db.conn().execute_batch(LEGACY_SHOPS).unwrap();
        db
    }

    #[test]
    fn test_statements() {
        assert_eq!(
            RenameForm::RenameColumn.statement(),
            "ALTER TABLE medical_shops RENAME COLUMN shop_owner TO owner_name;"
        );
        assert_eq!(
            RenameForm::ChangeColumn.statement(),
            "ALTER TABLE medical_shops CHANGE COLUMN shop_owner owner_name VARCHAR(255) NOT NULL;"
        );
    }

    #[test]
    fn test_render_script_includes_verification() {
        let script = render_script(RenameForm::ChangeColumn);
        assert!(script.contains("CHANGE COLUMN shop_owner owner_name"));
        assert!(script.trim_end().ends_with(VERIFY_STATEMENT));
    }

    #[test]
    fn test_rename_preserves_data() {
        let db = legacy_db();
        assert_eq!(db.verify_owner_column().unwrap(), OwnerColumnState::Legacy);

        db.rename_owner_column().unwrap();
        assert_eq!(db.verify_owner_column().unwrap(), OwnerColumnState::Current);

        let owner: String = db
            .conn()
            .query_row("SELECT owner_name FROM medical_shops", [], |row| row.get(0))
            .unwrap();
        assert_eq!(owner, "Arul Selvam");
    }

    #[test]
    fn test_rename_twice_fails_with_column_not_found() {
        let db = legacy_db();
        db.rename_owner_column().unwrap();

        let err = db.rename_owner_column().unwrap_err();
        assert!(matches!(err, DbError::ColumnNotFound(_)), "got {:?}", err);
    }

    #[test]
    fn test_rename_against_current_schema_fails() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.verify_owner_column().unwrap(), OwnerColumnState::Current);

        let err = db.rename_owner_column().unwrap_err();
        assert!(matches!(err, DbError::ColumnNotFound(_)), "got {:?}", err);
    }

    #[test]
    fn test_missing_table() {
        let db = Database::connect_in_memory().unwrap();
        assert_eq!(db.verify_owner_column().unwrap(), OwnerColumnState::Missing);
    }

    #[test]
    fn test_form_parse() {
        assert_eq!("change-column".parse::<RenameForm>(), Ok(RenameForm::ChangeColumn));
        assert_eq!("RENAME".parse::<RenameForm>(), Ok(RenameForm::RenameColumn));
        assert!("drop".parse::<RenameForm>().is_err());
    }
}
