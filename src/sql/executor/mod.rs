use crate::{
    error::Result,
    sql::{
        executor::{
            agg::Aggregate,
            join::NestedLoopJoin,
            mutation::{Delete, Insert, Update},
            query::{Filter, Projection, Scan},
            schema::{
                CreateDatabase, CreateTable, DropDatabase, DropTable, RenameDatabase, RenameTable,
                ShowDatabases,
            },
        },
        plan::Node,
        types::Row,
    },
    storage::{Catalog, Storage},
};

mod agg;
mod join;
mod mutation;
mod query;
mod schema;

/// SQL executor trait
pub trait Executor<S: Storage> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet>;
}

/// Builds an executor from a plan node
///
/// The `'static` bound is required for trait object usage in recursive executor building.
impl<S: Storage + 'static> dyn Executor<S> {
    pub fn build(node: Node) -> Box<dyn Executor<S>> {
        match node {
            Node::CreateDatabase { name } => CreateDatabase::new(name),
            Node::ShowDatabases => ShowDatabases::new(),
            Node::RenameDatabase { from, to } => RenameDatabase::new(from, to),
            Node::DropDatabase { name } => DropDatabase::new(name),
            Node::CreateTable {
                database,
                table,
                columns,
            } => CreateTable::new(database, table, columns),
            Node::DropTable { database, table } => DropTable::new(database, table),
            Node::RenameTable { database, from, to } => RenameTable::new(database, from, to),
            Node::Insert {
                database,
                table,
                columns,
                values,
            } => Insert::new(database, table, columns, values),
            Node::Update {
                database,
                table,
                set,
                predicate,
            } => Update::new(database, table, set, predicate),
            Node::Delete {
                database,
                table,
                predicate,
            } => Delete::new(database, table, predicate),
            Node::Scan { database, table } => Scan::new(database, table),
            Node::Filter { source, predicate } => Filter::new(Self::build(*source), predicate),
            Node::NestedLoopJoin {
                left,
                right,
                left_key,
                right_key,
            } => NestedLoopJoin::new(
                // Recursively build both sides (Scan nodes from planner.rs)
                Self::build(*left),
                Self::build(*right),
                left_key,
                right_key,
            ),
            Node::Aggregate {
                source,
                group_by,
                aggregates,
            } => Aggregate::new(Self::build(*source), group_by, aggregates),
            Node::Projection {
                source,
                columns,
                aggregates,
                infer_columns,
            } => Projection::new(Self::build(*source), columns, aggregates, infer_columns),
        }
    }
}

/// Execution result set
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    /// Rows with their output column order
    Scan { columns: Vec<String>, rows: Vec<Row> },
    Databases { databases: Vec<String> },
    Message { message: String },
    Insert { message: String, row: Row },
}
