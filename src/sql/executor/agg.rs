use crate::{
    error::{Error, Result},
    sql::{
        parser::ast::{self, AggregateFunc, unqualified},
        types::{Row, Value},
    },
    storage::{Catalog, Storage},
};

use super::{Executor, ResultSet};

/// Aggregate executor - GROUP BY partitioning (COUNT, SUM, MIN, MAX, AVG)
///
/// Groups are keyed by exact values and keep first-appearance order.
/// Output columns are the group-by columns followed by the aggregates.
pub struct Aggregate<S: Storage> {
    source: Box<dyn Executor<S>>,
    group_by: Vec<String>,
    aggregates: Vec<ast::Aggregate>,
}

impl<S: Storage> Aggregate<S> {
    pub fn new(
        source: Box<dyn Executor<S>>,
        group_by: Vec<String>,
        aggregates: Vec<ast::Aggregate>,
    ) -> Box<Self> {
        Box::new(Self {
            source,
            group_by,
            aggregates,
        })
    }
}

impl<S: Storage> Executor<S> for Aggregate<S> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let (columns, rows) = match self.source.execute(catalog)? {
            ResultSet::Scan { columns, rows } => (columns, rows),
            _ => return Err(Error::Internal("Unexpected result set".into())),
        };

        let group_cols: Vec<&str> = self.group_by.iter().map(|c| unqualified(c)).collect();
        for col in group_cols
            .iter()
            .copied()
            .chain(self.aggregates.iter().map(|a| unqualified(&a.column)))
        {
            if col != "*" && !columns.iter().any(|c| c == col) {
                return Err(Error::NotFound(format!("column {} does not exist", col)));
            }
        }

        let mut groups: Vec<(Vec<Value>, Vec<&Row>)> = Vec::new();
        for row in &rows {
            let key: Vec<Value> = group_cols
                .iter()
                .map(|c| row.get(*c).cloned().unwrap_or(Value::Null))
                .collect();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(row),
                None => groups.push((key, vec![row])),
            }
        }

        let mut new_rows = Vec::with_capacity(groups.len());
        for (key, members) in &groups {
            let mut new_row: Row = group_cols
                .iter()
                .map(|c| c.to_string())
                .zip(key.iter().cloned())
                .collect();
            for agg in &self.aggregates {
                let calculator = <dyn Calculator>::build(agg.func);
                new_row.insert(
                    agg.output_name(),
                    calculator.calc(unqualified(&agg.column), members)?,
                );
            }
            new_rows.push(new_row);
        }

        // No groups, no inferred schema
        let new_cols = if groups.is_empty() {
            Vec::new()
        } else {
            group_cols
                .iter()
                .map(|c| c.to_string())
                .chain(self.aggregates.iter().map(|a| a.output_name()))
                .collect()
        };

        Ok(ResultSet::Scan {
            columns: new_cols,
            rows: new_rows,
        })
    }
}

/// Evaluates an aggregate against a single row
///
/// This is the output of aggregates without GROUP BY: SUM and AVG yield
/// the row's own value as a float, COUNT yields 1, MIN and MAX the value.
pub fn per_row(agg: &ast::Aggregate, row: &Row) -> Result<Value> {
    let column = unqualified(&agg.column);
    Ok(match agg.func {
        AggregateFunc::Count => Value::Integer(1),
        AggregateFunc::Sum | AggregateFunc::Avg => Value::Float(numeric(column, row.get(column))?),
        AggregateFunc::Min | AggregateFunc::Max => {
            row.get(column).cloned().unwrap_or(Value::Null)
        }
    })
}

/// Numeric value of a cell, missing or NULL counts as 0
fn numeric(column: &str, value: Option<&Value>) -> Result<f64> {
    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(v) => v.as_f64().ok_or_else(|| {
            Error::Execution(format!(
                "cannot aggregate non-numeric value '{}' in column {}",
                v, column
            ))
        }),
    }
}

/// Trait for aggregate function calculations
pub trait Calculator {
    fn calc(&self, column: &str, rows: &[&Row]) -> Result<Value>;
}

impl dyn Calculator {
    /// Runtime dispatch to appropriate calculator based on function
    pub fn build(func: AggregateFunc) -> Box<dyn Calculator> {
        match func {
            AggregateFunc::Count => Count::new(),
            AggregateFunc::Sum => Sum::new(),
            AggregateFunc::Min => Min::new(),
            AggregateFunc::Max => Max::new(),
            AggregateFunc::Avg => Avg::new(),
        }
    }
}

/// COUNT - partition size
pub struct Count;

impl Count {
    fn new() -> Box<Self> {
        Box::new(Self {})
    }
}

impl Calculator for Count {
    fn calc(&self, _column: &str, rows: &[&Row]) -> Result<Value> {
        Ok(Value::Integer(rows.len() as i64))
    }
}

/// MIN - smallest value, numbers before text ordering
pub struct Min;

impl Min {
    fn new() -> Box<Self> {
        Box::new(Self {})
    }
}

impl Calculator for Min {
    fn calc(&self, column: &str, rows: &[&Row]) -> Result<Value> {
        Ok(extreme(column, rows, std::cmp::Ordering::Less))
    }
}

/// MAX - largest value
pub struct Max;

impl Max {
    fn new() -> Box<Self> {
        Box::new(Self {})
    }
}

impl Calculator for Max {
    fn calc(&self, column: &str, rows: &[&Row]) -> Result<Value> {
        Ok(extreme(column, rows, std::cmp::Ordering::Greater))
    }
}

fn extreme(column: &str, rows: &[&Row], wanted: std::cmp::Ordering) -> Value {
    let mut best: Option<&Value> = None;
    for value in rows.iter().filter_map(|r| r.get(column)) {
        if *value == Value::Null {
            continue;
        }
        best = match best {
            Some(b) if value.compare(b) != Some(wanted) => Some(b),
            _ => Some(value),
        };
    }
    best.cloned().unwrap_or(Value::Null)
}

/// SUM - float sum, missing values count as 0
pub struct Sum;

impl Sum {
    fn new() -> Box<Self> {
        Box::new(Self {})
    }
}

impl Calculator for Sum {
    fn calc(&self, column: &str, rows: &[&Row]) -> Result<Value> {
        let mut sum = 0.0;
        for row in rows {
            sum += numeric(column, row.get(column))?;
        }
        Ok(Value::Float(sum))
    }
}

/// AVG - mean of the non-null values
pub struct Avg;

impl Avg {
    fn new() -> Box<Self> {
        Box::new(Self {})
    }
}

impl Calculator for Avg {
    fn calc(&self, column: &str, rows: &[&Row]) -> Result<Value> {
        let present: Vec<&Row> = rows
            .iter()
            .copied()
            .filter(|r| !matches!(r.get(column), None | Some(Value::Null)))
            .collect();
        if present.is_empty() {
            return Ok(Value::Null);
        }
        // AVG = SUM / COUNT
        match Sum::new().calc(column, &present)? {
            Value::Float(s) => Ok(Value::Float(s / present.len() as f64)),
            _ => Ok(Value::Null),
        }
    }
}
