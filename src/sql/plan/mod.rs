use crate::{
    error::Result,
    sql::{
        executor::{Executor, ResultSet},
        parser::ast::{Aggregate, Predicate, Projection, Statement},
        plan::planner::Planner,
        schema::Column,
    },
    storage::{Catalog, Storage},
};

mod planner;

/// Execution plan node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    CreateDatabase {
        name: String,
    },
    ShowDatabases,
    RenameDatabase {
        from: String,
        to: String,
    },
    DropDatabase {
        name: String,
    },
    CreateTable {
        database: String,
        table: String,
        columns: Vec<Column>,
    },
    DropTable {
        database: String,
        table: String,
    },
    RenameTable {
        database: String,
        from: String,
        to: String,
    },
    Insert {
        database: String,
        table: String,
        columns: Vec<String>,
        values: Vec<String>,
    },
    Update {
        database: String,
        table: String,
        set: (String, String),
        predicate: (String, String),
    },
    Delete {
        database: String,
        table: String,
        predicate: Predicate,
    },
    /// Full scan of a live table, columns in declared order
    Scan {
        database: String,
        table: String,
    },
    Filter {
        source: Box<Node>,
        predicate: Predicate,
    },
    /// Equality join on normalized key values
    NestedLoopJoin {
        left: Box<Node>,
        right: Box<Node>,
        left_key: String,
        right_key: String,
    },
    /// GROUP BY partitioning with one output row per group
    Aggregate {
        source: Box<Node>,
        group_by: Vec<String>,
        aggregates: Vec<Aggregate>,
    },
    /// Per-row output; aggregates here are evaluated on each row alone
    Projection {
        source: Box<Node>,
        columns: Vec<Projection>,
        aggregates: Vec<Aggregate>,
        infer_columns: bool,
    },
}

/// Execution plan
#[derive(Debug, PartialEq)]
pub struct Plan(pub Node);

impl Plan {
    /// Builds a plan from a statement
    ///
    /// With `strict_aggregates`, a SELECT with aggregates but no GROUP BY
    /// is rejected instead of producing per-row aggregate values.
    pub fn build(stmt: Statement, strict_aggregates: bool) -> Result<Self> {
        Planner::new(strict_aggregates).build(stmt)
    }

    /// Executes the plan against the catalog
    pub fn execute<S: Storage + 'static>(self, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        <dyn Executor<S>>::build(self.0).execute(catalog)
    }
}
