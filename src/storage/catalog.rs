use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;

use crate::{
    error::{Error, Result},
    sql::schema::{Column, Table},
    storage::engine::Storage,
};

/// Format of backup ids (local time of the snapshot)
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

/// Checks a database, table or column identifier
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name_regex().is_match(name) {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid {} name: '{}'", kind, name)))
    }
}

/// Catalog & table store
///
/// Owns the storage and guards every operation with identifier
/// validation and existence checks, so a rejected call never leaves a
/// partial effect behind.
pub struct Catalog<S: Storage> {
    storage: S,
}

impl<S: Storage> Catalog<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn must_have_database(&self, db: &str) -> Result<()> {
        validate_name("database", db)?;
        if !self.storage.has_database(db)? {
            return Err(Error::NotFound(format!("database {} does not exist", db)));
        }
        Ok(())
    }

    fn must_have_table(&self, db: &str, table: &str) -> Result<()> {
        validate_name("database", db)?;
        validate_name("table", table)?;
        if !self.storage.has_table(db, table)? {
            return Err(Error::NotFound(format!(
                "table {} does not exist in database {}",
                table, db
            )));
        }
        Ok(())
    }

    pub fn create_database(&mut self, name: &str) -> Result<()> {
        validate_name("database", name)?;
        if self.storage.has_database(name)? {
            return Err(Error::Conflict(format!("database {} already exists", name)));
        }
        self.storage.create_database(name)?;
        tracing::info!(database = name, "database created");
        Ok(())
    }

    pub fn drop_database(&mut self, name: &str) -> Result<()> {
        self.must_have_database(name)?;
        self.storage.remove_database(name)?;
        tracing::info!(database = name, "database dropped");
        Ok(())
    }

    pub fn rename_database(&mut self, old: &str, new: &str) -> Result<()> {
        validate_name("database", new)?;
        self.must_have_database(old)?;
        if self.storage.has_database(new)? {
            return Err(Error::Conflict(format!("database {} already exists", new)));
        }
        self.storage.rename_database(old, new)?;
        tracing::info!(from = old, to = new, "database renamed");
        Ok(())
    }

    pub fn list_databases(&self) -> Result<Vec<String>> {
        self.storage.list_databases()
    }

    pub fn list_tables(&self, db: &str) -> Result<Vec<String>> {
        self.must_have_database(db)?;
        self.storage.list_tables(db)
    }

    /// Creates an empty table, the database must already exist
    pub fn create_table(&mut self, db: &str, table: &str, columns: Vec<Column>) -> Result<()> {
        validate_name("table", table)?;
        self.must_have_database(db)?;
        for col in &columns {
            validate_name("column", &col.name)?;
        }
        let data = Table::new(columns);
        data.validate()?;
        if self.storage.has_table(db, table)? {
            return Err(Error::Conflict(format!(
                "table {} already exists in database {}",
                table, db
            )));
        }
        self.storage.write_table(db, table, &data)?;
        tracing::info!(database = db, table, "table created");
        Ok(())
    }

    pub fn load_table(&self, db: &str, table: &str) -> Result<Table> {
        validate_name("database", db)?;
        validate_name("table", table)?;
        self.storage.read_table(db, table)?.ok_or_else(|| {
            Error::NotFound(format!("table {} does not exist in database {}", table, db))
        })
    }

    /// Column definitions of a table
    pub fn describe_table(&self, db: &str, table: &str) -> Result<Vec<Column>> {
        Ok(self.load_table(db, table)?.columns)
    }

    pub fn save_table(&mut self, db: &str, table: &str, data: &Table) -> Result<()> {
        validate_name("database", db)?;
        validate_name("table", table)?;
        self.storage.write_table(db, table, data)
    }

    pub fn drop_table(&mut self, db: &str, table: &str) -> Result<()> {
        self.must_have_table(db, table)?;
        self.storage.remove_table(db, table)?;
        tracing::info!(database = db, table, "table dropped");
        Ok(())
    }

    pub fn rename_table(&mut self, db: &str, old: &str, new: &str) -> Result<()> {
        validate_name("table", new)?;
        self.must_have_table(db, old)?;
        if self.storage.has_table(db, new)? {
            return Err(Error::Conflict(format!(
                "table {} already exists in database {}",
                new, db
            )));
        }
        self.storage.rename_table(db, old, new)?;
        tracing::info!(database = db, from = old, to = new, "table renamed");
        Ok(())
    }

    /// Writes a timestamped snapshot and returns its id
    ///
    /// An existing snapshot is never overwritten: a second backup within
    /// the same second gets a `_1`, `_2`, ... suffix.
    pub fn backup_table(&mut self, db: &str, table: &str, data: &Table) -> Result<String> {
        validate_name("database", db)?;
        validate_name("table", table)?;
        let stamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut id = stamp.clone();
        let mut n = 0;
        while !self.storage.write_backup(db, table, &id, data)? {
            n += 1;
            id = format!("{}_{}", stamp, n);
        }
        tracing::info!(database = db, table, backup = %id, "table backed up");
        Ok(id)
    }

    pub fn list_backups(&self, db: &str, table: &str) -> Result<Vec<String>> {
        validate_name("database", db)?;
        validate_name("table", table)?;
        self.storage.list_backups(db, table)
    }

    /// Overwrites the live table with a snapshot's contents
    pub fn restore_backup(&mut self, db: &str, table: &str, backup_id: &str) -> Result<()> {
        self.must_have_database(db)?;
        validate_name("table", table)?;
        let data = self.storage.read_backup(db, table, backup_id)?.ok_or_else(|| {
            Error::NotFound(format!(
                "backup {} of table {} does not exist in database {}",
                backup_id, table, db
            ))
        })?;
        self.storage.write_table(db, table, &data)?;
        tracing::info!(database = db, table, backup = backup_id, "backup restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, validate_name};
    use crate::{
        error::{Error, Result},
        sql::{
            schema::Column,
            types::{ColumnType, DataType, Row, Value},
        },
        storage::memory::MemoryStorage,
    };

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", ColumnType::new(DataType::Int)),
            Column::new("name", ColumnType::new(DataType::Text)),
        ]
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("table", "_t1").is_ok());
        assert!(validate_name("table", "1t").is_err());
        assert!(validate_name("table", "a-b").is_err());
        assert!(validate_name("table", "").is_err());
        assert!(validate_name("table", "../etc").is_err());
    }

    #[test]
    fn test_database_lifecycle() -> Result<()> {
        let mut c = Catalog::new(MemoryStorage::new());
        c.create_database("shop")?;
        assert!(matches!(c.create_database("shop"), Err(Error::Conflict(_))));
        assert!(matches!(c.create_database("9shop"), Err(Error::Validation(_))));

        c.create_database("hr")?;
        assert!(matches!(c.rename_database("shop", "hr"), Err(Error::Conflict(_))));
        assert!(matches!(c.rename_database("nope", "x"), Err(Error::NotFound(_))));
        c.rename_database("shop", "store")?;
        assert_eq!(c.list_databases()?, vec!["hr".to_string(), "store".to_string()]);

        c.drop_database("hr")?;
        assert!(matches!(c.drop_database("hr"), Err(Error::NotFound(_))));
        Ok(())
    }

    #[test]
    fn test_table_lifecycle() -> Result<()> {
        let mut c = Catalog::new(MemoryStorage::new());
        assert!(matches!(
            c.create_table("shop", "items", columns()),
            Err(Error::NotFound(_))
        ));
        c.create_database("shop")?;
        c.create_table("shop", "items", columns())?;
        assert!(matches!(
            c.create_table("shop", "items", columns()),
            Err(Error::Conflict(_))
        ));
        assert_eq!(c.describe_table("shop", "items")?, columns());

        c.create_table("shop", "orders", columns())?;
        assert!(matches!(
            c.rename_table("shop", "items", "orders"),
            Err(Error::Conflict(_))
        ));
        c.rename_table("shop", "items", "products")?;
        assert_eq!(
            c.list_tables("shop")?,
            vec!["orders".to_string(), "products".to_string()]
        );

        c.drop_table("shop", "orders")?;
        assert!(matches!(c.drop_table("shop", "orders"), Err(Error::NotFound(_))));
        assert!(matches!(c.load_table("shop", "orders"), Err(Error::NotFound(_))));
        Ok(())
    }

    #[test]
    fn test_backup_restore() -> Result<()> {
        let mut c = Catalog::new(MemoryStorage::new());
        c.create_database("shop")?;
        c.create_table("shop", "items", columns())?;

        let before = c.load_table("shop", "items")?;
        let first = c.backup_table("shop", "items", &before)?;
        let second = c.backup_table("shop", "items", &before)?;
        assert_ne!(first, second);
        assert_eq!(c.list_backups("shop", "items")?.len(), 2);

        let mut changed = before.clone();
        let mut row = Row::new();
        row.insert("id".into(), Value::from("1"));
        row.insert("name".into(), Value::from("pen"));
        changed.rows.push(row);
        c.save_table("shop", "items", &changed)?;
        assert_eq!(c.load_table("shop", "items")?.rows.len(), 1);

        c.restore_backup("shop", "items", &first)?;
        assert_eq!(c.load_table("shop", "items")?, before);
        assert!(matches!(
            c.restore_backup("shop", "items", "19990101_000000"),
            Err(Error::NotFound(_))
        ));
        Ok(())
    }
}
