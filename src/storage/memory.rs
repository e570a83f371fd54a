use std::collections::BTreeMap;

use crate::{
    error::{Error, Result},
    sql::schema::Table,
    storage::engine::Storage,
};

/// In-memory database contents
#[derive(Debug, Default)]
struct Database {
    tables: BTreeMap<String, Table>,
    /// (table, backup id) -> snapshot
    backups: BTreeMap<(String, String), Table>,
}

/// In-memory storage engine
#[derive(Debug, Default)]
pub struct MemoryStorage {
    databases: BTreeMap<String, Database>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn database(&self, db: &str) -> Result<&Database> {
        self.databases
            .get(db)
            .ok_or_else(|| Error::Internal(format!("database {} is missing", db)))
    }

    fn database_mut(&mut self, db: &str) -> Result<&mut Database> {
        self.databases
            .get_mut(db)
            .ok_or_else(|| Error::Internal(format!("database {} is missing", db)))
    }
}

impl Storage for MemoryStorage {
    fn list_databases(&self) -> Result<Vec<String>> {
        Ok(self.databases.keys().cloned().collect())
    }

    fn has_database(&self, db: &str) -> Result<bool> {
        Ok(self.databases.contains_key(db))
    }

    fn create_database(&mut self, db: &str) -> Result<()> {
        self.databases.entry(db.to_string()).or_default();
        Ok(())
    }

    fn remove_database(&mut self, db: &str) -> Result<()> {
        self.databases.remove(db);
        Ok(())
    }

    fn rename_database(&mut self, from: &str, to: &str) -> Result<()> {
        let database = self
            .databases
            .remove(from)
            .ok_or_else(|| Error::Internal(format!("database {} is missing", from)))?;
        self.databases.insert(to.to_string(), database);
        Ok(())
    }

    fn list_tables(&self, db: &str) -> Result<Vec<String>> {
        Ok(self.database(db)?.tables.keys().cloned().collect())
    }

    fn read_table(&self, db: &str, table: &str) -> Result<Option<Table>> {
        Ok(self
            .databases
            .get(db)
            .and_then(|d| d.tables.get(table))
            .cloned())
    }

    fn write_table(&mut self, db: &str, table: &str, data: &Table) -> Result<()> {
        self.databases
            .entry(db.to_string())
            .or_default()
            .tables
            .insert(table.to_string(), data.clone());
        Ok(())
    }

    fn remove_table(&mut self, db: &str, table: &str) -> Result<()> {
        self.database_mut(db)?.tables.remove(table);
        Ok(())
    }

    fn rename_table(&mut self, db: &str, from: &str, to: &str) -> Result<()> {
        let database = self.database_mut(db)?;
        let data = database
            .tables
            .remove(from)
            .ok_or_else(|| Error::Internal(format!("table {} is missing", from)))?;
        database.tables.insert(to.to_string(), data);
        Ok(())
    }

    fn list_backups(&self, db: &str, table: &str) -> Result<Vec<String>> {
        Ok(match self.databases.get(db) {
            Some(d) => d
                .backups
                .keys()
                .filter(|(t, _)| t == table)
                .map(|(_, id)| id.clone())
                .collect(),
            None => Vec::new(),
        })
    }

    fn read_backup(&self, db: &str, table: &str, id: &str) -> Result<Option<Table>> {
        Ok(self
            .databases
            .get(db)
            .and_then(|d| d.backups.get(&(table.to_string(), id.to_string())))
            .cloned())
    }

    fn write_backup(&mut self, db: &str, table: &str, id: &str, data: &Table) -> Result<bool> {
        let key = (table.to_string(), id.to_string());
        let database = self.databases.entry(db.to_string()).or_default();
        if database.backups.contains_key(&key) {
            return Ok(false);
        }
        database.backups.insert(key, data.clone());
        Ok(true)
    }
}
