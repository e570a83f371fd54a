use crate::{error::Result, sql::schema::Table};

/// Abstract storage interface (database/table unit operations)
///
/// Different from `storage::catalog::Catalog` which validates names and
/// existence. Implementations only move whole units around: every read
/// returns a full copy and every write replaces the unit.
pub trait Storage {
    fn list_databases(&self) -> Result<Vec<String>>;
    fn has_database(&self, db: &str) -> Result<bool>;
    fn create_database(&mut self, db: &str) -> Result<()>;
    /// Removes the database with all its tables and backups
    fn remove_database(&mut self, db: &str) -> Result<()>;
    fn rename_database(&mut self, from: &str, to: &str) -> Result<()>;

    fn list_tables(&self, db: &str) -> Result<Vec<String>>;
    fn read_table(&self, db: &str, table: &str) -> Result<Option<Table>>;
    fn write_table(&mut self, db: &str, table: &str, data: &Table) -> Result<()>;
    fn remove_table(&mut self, db: &str, table: &str) -> Result<()>;
    fn rename_table(&mut self, db: &str, from: &str, to: &str) -> Result<()>;

    fn has_table(&self, db: &str, table: &str) -> Result<bool> {
        Ok(self.read_table(db, table)?.is_some())
    }

    /// Backup ids of a table, oldest first
    fn list_backups(&self, db: &str, table: &str) -> Result<Vec<String>>;
    fn read_backup(&self, db: &str, table: &str, id: &str) -> Result<Option<Table>>;
    /// Writes a snapshot under `id`; returns false without writing if that
    /// id is already taken
    fn write_backup(&mut self, db: &str, table: &str, id: &str, data: &Table) -> Result<bool>;
}
