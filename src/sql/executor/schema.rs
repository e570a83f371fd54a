use crate::{
    error::Result,
    sql::{executor::Executor, schema::Column},
    storage::{Catalog, Storage},
};

use super::ResultSet;

/// CREATE DATABASE executor
pub struct CreateDatabase {
    name: String,
}

impl CreateDatabase {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Storage> Executor<S> for CreateDatabase {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        catalog.create_database(&self.name)?;
        Ok(ResultSet::Message {
            message: format!("Database {} created", self.name),
        })
    }
}

/// SHOW DATABASES executor
pub struct ShowDatabases;

impl ShowDatabases {
    pub fn new() -> Box<Self> {
        Box::new(Self {})
    }
}

impl<S: Storage> Executor<S> for ShowDatabases {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        Ok(ResultSet::Databases {
            databases: catalog.list_databases()?,
        })
    }
}

/// RENAME DATABASE executor
pub struct RenameDatabase {
    from: String,
    to: String,
}

impl RenameDatabase {
    pub fn new(from: String, to: String) -> Box<Self> {
        Box::new(Self { from, to })
    }
}

impl<S: Storage> Executor<S> for RenameDatabase {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        catalog.rename_database(&self.from, &self.to)?;
        Ok(ResultSet::Message {
            message: format!("Database {} renamed to {}", self.from, self.to),
        })
    }
}

/// DROP DATABASE executor, removes all tables and backups with it
pub struct DropDatabase {
    name: String,
}

impl DropDatabase {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Storage> Executor<S> for DropDatabase {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        catalog.drop_database(&self.name)?;
        Ok(ResultSet::Message {
            message: format!("Database {} dropped", self.name),
        })
    }
}

/// CREATE TABLE executor
pub struct CreateTable {
    database: String,
    table: String,
    columns: Vec<Column>,
}

impl CreateTable {
    pub fn new(database: String, table: String, columns: Vec<Column>) -> Box<Self> {
        Box::new(Self {
            database,
            table,
            columns,
        })
    }
}

impl<S: Storage> Executor<S> for CreateTable {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let described: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.datatype))
            .collect();
        catalog.create_table(&self.database, &self.table, self.columns)?;
        Ok(ResultSet::Message {
            message: format!(
                "Table {} created in database {} with columns [{}]",
                self.table,
                self.database,
                described.join(", ")
            ),
        })
    }
}

/// DROP TABLE executor
pub struct DropTable {
    database: String,
    table: String,
}

impl DropTable {
    pub fn new(database: String, table: String) -> Box<Self> {
        Box::new(Self { database, table })
    }
}

impl<S: Storage> Executor<S> for DropTable {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        catalog.drop_table(&self.database, &self.table)?;
        Ok(ResultSet::Message {
            message: format!("Table {} dropped from database {}", self.table, self.database),
        })
    }
}

/// RENAME TABLE executor, within one database
pub struct RenameTable {
    database: String,
    from: String,
    to: String,
}

impl RenameTable {
    pub fn new(database: String, from: String, to: String) -> Box<Self> {
        Box::new(Self { database, from, to })
    }
}

impl<S: Storage> Executor<S> for RenameTable {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        catalog.rename_table(&self.database, &self.from, &self.to)?;
        Ok(ResultSet::Message {
            message: format!(
                "Table {} renamed to {} in database {}",
                self.from, self.to, self.database
            ),
        })
    }
}
