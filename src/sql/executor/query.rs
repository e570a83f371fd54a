use std::cmp::Ordering;

use crate::{
    error::{Error, Result},
    sql::{
        executor::{ResultSet, agg::per_row},
        parser::ast::{self, Operator, Predicate, unqualified},
        types::{Row, Value},
    },
    storage::{Catalog, Storage},
};

use super::Executor;

/// Table scan executor (SELECT)
pub struct Scan {
    database: String,
    table: String,
}

impl Scan {
    pub fn new(database: String, table: String) -> Box<Self> {
        Box::new(Self { database, table })
    }
}

impl<S: Storage> Executor<S> for Scan {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog.load_table(&self.database, &self.table)?;
        Ok(ResultSet::Scan {
            columns: table.column_names(),
            rows: table.rows,
        })
    }
}

/// WHERE executor - keeps rows matching a single `col OP value` predicate
pub struct Filter<S: Storage> {
    source: Box<dyn Executor<S>>,
    predicate: Predicate,
}

impl<S: Storage> Filter<S> {
    pub fn new(source: Box<dyn Executor<S>>, predicate: Predicate) -> Box<Self> {
        Box::new(Self { source, predicate })
    }
}

impl<S: Storage> Executor<S> for Filter<S> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        match self.source.execute(catalog)? {
            ResultSet::Scan { columns, rows } => {
                let column = unqualified(&self.predicate.column);
                if !columns.iter().any(|c| c == column) {
                    return Err(Error::NotFound(format!(
                        "column {} does not exist",
                        self.predicate.column
                    )));
                }
                let rows = rows
                    .into_iter()
                    .filter(|row| {
                        row.get(column)
                            .is_some_and(|v| matches(v, self.predicate.op, &self.predicate.value))
                    })
                    .collect();
                Ok(ResultSet::Scan { columns, rows })
            }
            _ => Err(Error::Internal("Unexpected result set".into())),
        }
    }
}

/// Evaluates `value OP literal`
///
/// Both sides are compared as numbers when both parse as numbers,
/// otherwise as strings. NULL never matches.
pub fn matches(value: &Value, op: Operator, literal: &str) -> bool {
    if *value == Value::Null {
        return false;
    }
    let ordering = match value.compare(&Value::from(literal)) {
        Some(ordering) => ordering,
        None => return false,
    };
    match op {
        Operator::Equal => ordering == Ordering::Equal,
        Operator::NotEqual => ordering != Ordering::Equal,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::LessThanOrEqual => ordering != Ordering::Greater,
        Operator::GreaterThan => ordering == Ordering::Greater,
        Operator::GreaterThanOrEqual => ordering != Ordering::Less,
    }
}

/// Projection executor - shapes each row into the requested output
///
/// Plain columns are keyed by their alias or unqualified name and
/// project as NULL when absent. Aggregates outside GROUP BY are
/// evaluated against each row on its own.
pub struct Projection<S: Storage> {
    source: Box<dyn Executor<S>>,
    columns: Vec<ast::Projection>,
    aggregates: Vec<ast::Aggregate>,
    infer_columns: bool,
}

impl<S: Storage> Projection<S> {
    pub fn new(
        source: Box<dyn Executor<S>>,
        columns: Vec<ast::Projection>,
        aggregates: Vec<ast::Aggregate>,
        infer_columns: bool,
    ) -> Box<Self> {
        Box::new(Self {
            source,
            columns,
            aggregates,
            infer_columns,
        })
    }
}

impl<S: Storage> Executor<S> for Projection<S> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let (source_columns, rows) = match self.source.execute(catalog)? {
            ResultSet::Scan { columns, rows } => (columns, rows),
            _ => return Err(Error::Internal("Unexpected result set".into())),
        };

        // (output key, source column)
        let mut outputs: Vec<(String, String)> = Vec::new();
        for item in &self.columns {
            match item {
                ast::Projection::All => {
                    outputs.extend(source_columns.iter().map(|c| (c.clone(), c.clone())))
                }
                ast::Projection::Column { name, alias } => {
                    let column = unqualified(name).to_string();
                    outputs.push((alias.clone().unwrap_or_else(|| column.clone()), column));
                }
            }
        }

        let mut columns: Vec<String> = Vec::new();
        for key in outputs
            .iter()
            .map(|(key, _)| key.clone())
            .chain(self.aggregates.iter().map(|a| a.output_name()))
        {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }

        let mut new_rows = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut new_row = Row::new();
            for (key, column) in &outputs {
                new_row.insert(key.clone(), row.get(column).cloned().unwrap_or(Value::Null));
            }
            for agg in &self.aggregates {
                new_row.insert(agg.output_name(), per_row(agg, row)?);
            }
            new_rows.push(new_row);
        }

        // Join output has no schema of its own, its columns come from the rows
        if self.infer_columns && new_rows.is_empty() {
            columns.clear();
        }

        Ok(ResultSet::Scan {
            columns,
            rows: new_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::matches;
    use crate::sql::{parser::ast::Operator, types::Value};

    #[test]
    fn test_matches_numeric_then_text() {
        let v = Value::from("9");
        assert!(matches(&v, Operator::LessThan, "10"));
        assert!(!matches(&v, Operator::GreaterThan, "10"));
        assert!(matches(&Value::from("9.0"), Operator::Equal, "9"));

        let s = Value::from("b");
        assert!(matches(&s, Operator::GreaterThan, "a"));
        assert!(matches(&s, Operator::NotEqual, "10"));
        assert!(matches(&s, Operator::LessThanOrEqual, "b"));
        assert!(!matches(&Value::Null, Operator::NotEqual, "x"));
    }
}
