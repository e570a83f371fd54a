use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    sql::types::{ColumnType, Row, Value},
};

/// Column schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub datatype: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: ColumnType) -> Self {
        Self {
            name: name.into(),
            datatype,
        }
    }
}

/// A persisted table unit: ordered schema plus rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given schema
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Validates table schema
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::Validation("table has no columns".into()));
        }
        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::Validation(format!(
                    "duplicate column {} in table definition",
                    col.name
                )));
            }
        }
        Ok(())
    }

    /// Column names in declared order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the column, or NotFound if the table has no such column
    pub fn must_get_column(&self, name: &str, table: &str) -> Result<&Column> {
        self.get_column(name).ok_or_else(|| {
            Error::NotFound(format!("column {} does not exist in table {}", name, table))
        })
    }

    /// Builds a row from an INSERT column list and its values
    ///
    /// The column list must be exactly the table's column set (order does
    /// not matter) and every value must satisfy its column's type.
    pub fn make_row(&self, columns: &[String], values: &[String]) -> Result<Row> {
        if columns.len() != values.len() {
            return Err(Error::Validation(format!(
                "{} columns given but {} values",
                columns.len(),
                values.len()
            )));
        }

        let given: HashSet<&str> = columns.iter().map(|c| c.as_str()).collect();
        let declared: HashSet<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        if given != declared || given.len() != columns.len() {
            return Err(Error::Validation(format!(
                "insert must list every table column exactly once: expected [{}], got [{}]",
                self.column_names().join(", "),
                columns.join(", ")
            )));
        }

        let mut row = Row::new();
        for (name, value) in columns.iter().zip(values) {
            if let Some(col) = self.get_column(name) {
                col.datatype.check(name, value)?;
            }
            row.insert(name.clone(), Value::Text(value.clone()));
        }
        Ok(row)
    }
}
