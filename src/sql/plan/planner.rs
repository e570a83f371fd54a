use crate::{
    error::{Error, Result},
    sql::{
        parser::ast::{self, Statement, unqualified},
        plan::{Node, Plan},
    },
};

/// Query planner - converts AST into execution plan nodes
pub struct Planner {
    strict_aggregates: bool,
}

impl Planner {
    pub fn new(strict_aggregates: bool) -> Self {
        Self { strict_aggregates }
    }

    /// Builds an execution plan from an AST statement
    pub fn build(&mut self, stmt: Statement) -> Result<Plan> {
        Ok(Plan(self.build_statement(stmt)?))
    }

    pub fn build_statement(&self, stmt: Statement) -> Result<Node> {
        Ok(match stmt {
            Statement::CreateDatabase { name } => Node::CreateDatabase { name },
            Statement::ShowDatabases => Node::ShowDatabases,
            Statement::RenameDatabase { from, to } => Node::RenameDatabase { from, to },
            Statement::DropDatabase { name } => Node::DropDatabase { name },
            Statement::CreateTable { table, columns } => {
                let (database, table) = table.qualified()?;
                Node::CreateTable {
                    database: database.to_string(),
                    table: table.to_string(),
                    columns,
                }
            }
            Statement::DropTable { table } => {
                let (database, table) = table.qualified()?;
                Node::DropTable {
                    database: database.to_string(),
                    table: table.to_string(),
                }
            }
            Statement::RenameTable { from, to } => {
                let (database, old) = from.qualified()?;
                let (new_database, new) = to.qualified()?;
                if database != new_database {
                    return Err(Error::Validation(format!(
                        "cannot rename table {} across databases ({} -> {})",
                        old, database, new_database
                    )));
                }
                Node::RenameTable {
                    database: database.to_string(),
                    from: old.to_string(),
                    to: new.to_string(),
                }
            }
            Statement::Insert {
                table,
                columns,
                values,
            } => {
                let (database, table) = table.qualified()?;
                Node::Insert {
                    database: database.to_string(),
                    table: table.to_string(),
                    columns,
                    values,
                }
            }
            Statement::Update {
                table,
                set,
                predicate,
            } => {
                let (database, table) = table.qualified()?;
                Node::Update {
                    database: database.to_string(),
                    table: table.to_string(),
                    set,
                    predicate,
                }
            }
            Statement::Delete { table, predicate } => {
                let (database, table) = table.qualified()?;
                Node::Delete {
                    database: database.to_string(),
                    table: table.to_string(),
                    predicate,
                }
            }
            Statement::Select(select) => self.build_select(select)?,
        })
    }

    fn build_select(&self, select: ast::Select) -> Result<Node> {
        let base = select
            .tables
            .first()
            .ok_or_else(|| Error::Syntax("SELECT requires a FROM table".into()))?;
        let mut node = scan(base)?;

        // Join: base table on the left, joined table on the right
        let joined = !select.joins.is_empty();
        if let Some(join) = select.joins.first() {
            node = Node::NestedLoopJoin {
                left: Box::new(node),
                right: Box::new(scan(&join.table)?),
                left_key: unqualified(&join.left_key).to_string(),
                right_key: unqualified(&join.right_key).to_string(),
            };
        }

        if let Some(predicate) = select.filter {
            node = Node::Filter {
                source: Box::new(node),
                predicate,
            };
        }

        if !select.group_by.is_empty() {
            return Ok(Node::Aggregate {
                source: Box::new(node),
                group_by: select.group_by,
                aggregates: select.aggregates,
            });
        }

        if self.strict_aggregates && !select.aggregates.is_empty() {
            return Err(Error::Validation(
                "aggregate functions require a GROUP BY clause".into(),
            ));
        }

        Ok(Node::Projection {
            source: Box::new(node),
            columns: select.columns,
            aggregates: select.aggregates,
            infer_columns: joined,
        })
    }
}

fn scan(table: &ast::TableRef) -> Result<Node> {
    let (database, table) = table.qualified()?;
    Ok(Node::Scan {
        database: database.to_string(),
        table: table.to_string(),
    })
}
