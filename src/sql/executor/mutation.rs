use crate::{
    error::Result,
    sql::{
        executor::{ResultSet, query::matches},
        parser::ast::Predicate,
        types::Value,
    },
    storage::{Catalog, Storage},
};

use super::Executor;

/// INSERT executor
pub struct Insert {
    database: String,
    table: String,
    columns: Vec<String>,
    values: Vec<String>,
}

impl Insert {
    pub fn new(
        database: String,
        table: String,
        columns: Vec<String>,
        values: Vec<String>,
    ) -> Box<Self> {
        Box::new(Self {
            database,
            table,
            columns,
            values,
        })
    }
}

impl<S: Storage> Executor<S> for Insert {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let mut data = catalog.load_table(&self.database, &self.table)?;
        // Column set and value types are checked before anything is written
        let row = data.make_row(&self.columns, &self.values)?;
        data.rows.push(row.clone());
        catalog.save_table(&self.database, &self.table, &data)?;
        tracing::info!(database = %self.database, table = %self.table, "row inserted");
        Ok(ResultSet::Insert {
            message: format!("Row inserted into {} in {}", self.table, self.database),
            row,
        })
    }
}

/// UPDATE executor - single assignment, single equality predicate
pub struct Update {
    database: String,
    table: String,
    set: (String, String),
    predicate: (String, String),
}

impl Update {
    pub fn new(
        database: String,
        table: String,
        set: (String, String),
        predicate: (String, String),
    ) -> Box<Self> {
        Box::new(Self {
            database,
            table,
            set,
            predicate,
        })
    }
}

impl<S: Storage> Executor<S> for Update {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let mut data = catalog.load_table(&self.database, &self.table)?;
        let (set_col, set_val) = &self.set;
        let (where_col, where_val) = &self.predicate;
        data.must_get_column(where_col, &self.table)?;
        // Types are enforced at insert time only
        data.must_get_column(set_col, &self.table)?;

        catalog.backup_table(&self.database, &self.table, &data)?;

        let mut count = 0;
        for row in data.rows.iter_mut() {
            // Plain string equality, no numeric coercion
            if row.get(where_col).is_some_and(|v| v.to_string() == *where_val) {
                row.insert(set_col.clone(), Value::Text(set_val.clone()));
                count += 1;
            }
        }
        catalog.save_table(&self.database, &self.table, &data)?;
        tracing::info!(database = %self.database, table = %self.table, count, "rows updated");
        Ok(ResultSet::Message {
            message: format!(
                "{} rows updated in {} of {}",
                count, self.table, self.database
            ),
        })
    }
}

/// DELETE executor - `WHERE col OP value`
pub struct Delete {
    database: String,
    table: String,
    predicate: Predicate,
}

impl Delete {
    pub fn new(database: String, table: String, predicate: Predicate) -> Box<Self> {
        Box::new(Self {
            database,
            table,
            predicate,
        })
    }
}

impl<S: Storage> Executor<S> for Delete {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let mut data = catalog.load_table(&self.database, &self.table)?;
        data.must_get_column(&self.predicate.column, &self.table)?;

        catalog.backup_table(&self.database, &self.table, &data)?;

        let before = data.rows.len();
        let Predicate { column, op, value } = &self.predicate;
        data.rows
            .retain(|row| !row.get(column).is_some_and(|v| matches(v, *op, value)));
        let count = before - data.rows.len();

        catalog.save_table(&self.database, &self.table, &data)?;
        tracing::info!(database = %self.database, table = %self.table, count, "rows deleted");
        Ok(ResultSet::Message {
            message: format!(
                "{} rows deleted from {} in {}",
                count, self.table, self.database
            ),
        })
    }
}
