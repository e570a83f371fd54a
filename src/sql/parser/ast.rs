use std::fmt::Display;

use crate::{
    error::{Error, Result},
    sql::schema::Column,
};

/// Statement kinds recognized from the leading keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    CreateDatabase,
    ShowDatabases,
    RenameDatabase,
    DropDatabase,
    CreateTable,
    DropTable,
    RenameTable,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn to_str(&self) -> &str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::CreateDatabase => "CREATE DATABASE",
            StatementKind::ShowDatabases => "SHOW DATABASES",
            StatementKind::RenameDatabase => "RENAME DATABASE",
            StatementKind::DropDatabase => "DROP DATABASE",
            StatementKind::CreateTable => "CREATE TABLE",
            StatementKind::DropTable => "DROP TABLE",
            StatementKind::RenameTable => "RENAME TABLE",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }

    /// Whether a successful statement of this kind changes stored data
    pub fn is_mutation(&self) -> bool {
        !matches!(self, StatementKind::Select | StatementKind::ShowDatabases)
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Abstract Syntax Tree (AST) node definitions for SQL statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateDatabase { name: String },
    ShowDatabases,
    RenameDatabase { from: String, to: String },
    DropDatabase { name: String },
    CreateTable { table: TableRef, columns: Vec<Column> },
    DropTable { table: TableRef },
    RenameTable { from: TableRef, to: TableRef },
    /// INSERT INTO t (cols) VALUES (vals), values already unquoted
    Insert {
        table: TableRef,
        columns: Vec<String>,
        values: Vec<String>,
    },
    /// UPDATE t SET col = value WHERE col = value
    Update {
        table: TableRef,
        set: (String, String),
        predicate: (String, String),
    },
    /// DELETE FROM t WHERE col OP value
    Delete { table: TableRef, predicate: Predicate },
    Select(Select),
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::CreateDatabase { .. } => StatementKind::CreateDatabase,
            Statement::ShowDatabases => StatementKind::ShowDatabases,
            Statement::RenameDatabase { .. } => StatementKind::RenameDatabase,
            Statement::DropDatabase { .. } => StatementKind::DropDatabase,
            Statement::CreateTable { .. } => StatementKind::CreateTable,
            Statement::DropTable { .. } => StatementKind::DropTable,
            Statement::RenameTable { .. } => StatementKind::RenameTable,
            Statement::Insert { .. } => StatementKind::Insert,
            Statement::Update { .. } => StatementKind::Update,
            Statement::Delete { .. } => StatementKind::Delete,
            Statement::Select(_) => StatementKind::Select,
        }
    }
}

/// A `db.table` or bare `table` reference, alias already stripped
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub database: Option<String>,
    pub name: String,
}

impl TableRef {
    /// Splits `db.table` (or `table`) text
    pub fn parse(text: &str) -> Self {
        match text.trim().split_once('.') {
            Some((db, table)) => Self {
                database: Some(db.trim().to_string()),
                name: table.trim().to_string(),
            },
            None => Self {
                database: None,
                name: text.trim().to_string(),
            },
        }
    }

    /// Returns (database, table), both parts are required
    pub fn qualified(&self) -> Result<(&str, &str)> {
        match &self.database {
            Some(db) => Ok((db, &self.name)),
            None => Err(Error::Validation(format!(
                "table {} must be qualified as database.table",
                self.name
            ))),
        }
    }
}

impl Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.database {
            Some(db) => write!(f, "{}.{}", db, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Comparison operators accepted in WHERE clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Operator {
    pub fn from_str(op: &str) -> Option<Operator> {
        Some(match op {
            "=" => Operator::Equal,
            "!=" | "<>" => Operator::NotEqual,
            "<" => Operator::LessThan,
            "<=" => Operator::LessThanOrEqual,
            ">" => Operator::GreaterThan,
            ">=" => Operator::GreaterThanOrEqual,
            _ => return None,
        })
    }
}

/// `column OP value`, value already unquoted
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: Operator,
    pub value: String,
}

/// One projected item of a SELECT
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `*`
    All,
    /// A column, possibly table-qualified (`c.name`), with optional alias
    Column { name: String, alias: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Sum,
    Count,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    pub fn from_str(name: &str) -> Option<AggregateFunc> {
        Some(match name.to_uppercase().as_ref() {
            "SUM" => AggregateFunc::Sum,
            "COUNT" => AggregateFunc::Count,
            "AVG" => AggregateFunc::Avg,
            "MIN" => AggregateFunc::Min,
            "MAX" => AggregateFunc::Max,
            _ => return None,
        })
    }

    pub fn to_str(&self) -> &str {
        match self {
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
        }
    }
}

/// Aggregate call, e.g. `SUM(o.total) AS revenue`
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub func: AggregateFunc,
    /// Argument as written (`*` for `COUNT(*)`)
    pub column: String,
    pub alias: Option<String>,
}

impl Aggregate {
    /// Output column name, `{func}_{column}` unless aliased
    pub fn output_name(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        let func = self.func.to_str().to_lowercase();
        match self.column.as_str() {
            "*" => func,
            col => format!("{}_{}", func, unqualified(col)),
        }
    }
}

/// Equality join: `JOIN table ON left_key = right_key`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub left_key: String,
    pub right_key: String,
}

/// Structure extracted from a SELECT statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub tables: Vec<TableRef>,
    pub columns: Vec<Projection>,
    pub aggregates: Vec<Aggregate>,
    pub joins: Vec<Join>,
    pub group_by: Vec<String>,
    pub filter: Option<Predicate>,
}

/// Strips a table qualifier: `c.name` -> `name`
pub fn unqualified(column: &str) -> &str {
    column.rsplit('.').next().unwrap_or(column)
}

#[cfg(test)]
mod tests {
    use super::{Aggregate, AggregateFunc, TableRef, unqualified};

    #[test]
    fn test_table_ref() {
        let t = TableRef::parse("shop.items");
        assert_eq!(t.qualified().ok(), Some(("shop", "items")));
        assert_eq!(t.to_string(), "shop.items");
        assert!(TableRef::parse("items").qualified().is_err());
    }

    #[test]
    fn test_aggregate_output_name() {
        let agg = Aggregate {
            func: AggregateFunc::Sum,
            column: "o.total".into(),
            alias: None,
        };
        assert_eq!(agg.output_name(), "sum_total");

        let agg = Aggregate {
            func: AggregateFunc::Count,
            column: "*".into(),
            alias: None,
        };
        assert_eq!(agg.output_name(), "count");
        assert_eq!(unqualified("v"), "v");
    }
}
