//! Generic-grammar front end for SELECT
//!
//! The statement is parsed into a full expression tree by `sqlparser`;
//! only the shape the executor understands is extracted from it.

use sqlparser::{
    ast::{
        self, BinaryOperator, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, GroupByExpr,
        JoinConstraint, JoinOperator, SelectItem, SetExpr, TableFactor,
    },
    dialect::GenericDialect,
    parser::Parser,
};

use crate::{
    error::{Error, Result},
    sql::parser::{
        ast::{Aggregate, AggregateFunc, Join, Operator, Predicate, Projection, Select, TableRef},
        grammar::unquote,
    },
};

/// Parses a single SELECT statement
pub fn parse(sql: &str) -> Result<Select> {
    let mut statements = Parser::parse_sql(&GenericDialect {}, sql)?;
    if statements.len() != 1 {
        return Err(Error::Syntax(format!(
            "expected exactly one statement, got {}",
            statements.len()
        )));
    }
    match statements.remove(0) {
        ast::Statement::Query(query) => parse_query(&query),
        stmt => Err(Error::Unsupported(first_words(&stmt.to_string()))),
    }
}

/// Names a statement by its leading keyword(s), e.g. `CREATE INDEX`
pub fn statement_name(sql: &str) -> Result<String> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)?;
    let stmt = statements
        .first()
        .ok_or_else(|| Error::Syntax("empty statement".into()))?;
    Ok(first_words(&stmt.to_string()))
}

fn first_words(text: &str) -> String {
    let mut words = text.split_whitespace().map(|w| w.to_uppercase());
    let first = words.next().unwrap_or_default();
    match first.as_str() {
        "CREATE" | "DROP" | "ALTER" | "SHOW" | "TRUNCATE" => match words.next() {
            Some(second) => format!("{} {}", first, second),
            None => first,
        },
        _ => first,
    }
}

fn parse_query(query: &ast::Query) -> Result<Select> {
    if query.with.is_some() {
        return Err(Error::Unsupported("SELECT with WITH clause".into()));
    }
    if query.order_by.is_some() {
        return Err(Error::Unsupported("SELECT with ORDER BY".into()));
    }
    if query.limit_clause.is_some() {
        return Err(Error::Unsupported("SELECT with LIMIT/OFFSET".into()));
    }
    let select = match &*query.body {
        SetExpr::Select(select) => select,
        _ => return Err(Error::Unsupported("compound SELECT".into())),
    };
    if select.having.is_some() {
        return Err(Error::Unsupported("SELECT with HAVING".into()));
    }

    let mut result = Select::default();

    // FROM: exactly one table, at most one inner equality join
    let from = match select.from.as_slice() {
        [from] => from,
        [] => return Err(Error::Syntax("SELECT requires a FROM table".into())),
        _ => return Err(Error::Unsupported("SELECT from multiple tables".into())),
    };
    result.tables.push(table_ref(&from.relation)?);
    match from.joins.as_slice() {
        [] => {}
        [join] => {
            let table = table_ref(&join.relation)?;
            let constraint = match &join.join_operator {
                JoinOperator::Join(c) | JoinOperator::Inner(c) => c,
                other => {
                    return Err(Error::Unsupported(format!("join operator {:?}", other)));
                }
            };
            let (left_key, right_key) = match constraint {
                JoinConstraint::On(expr) => join_keys(expr)?,
                _ => return Err(Error::Unsupported("join without ON condition".into())),
            };
            result.tables.push(table.clone());
            result.joins.push(Join {
                table,
                left_key,
                right_key,
            });
        }
        _ => return Err(Error::Unsupported("more than one join".into())),
    }

    for item in &select.projection {
        match item {
            SelectItem::Wildcard(_) => result.columns.push(Projection::All),
            SelectItem::QualifiedWildcard(..) => {
                return Err(Error::Unsupported("qualified wildcard".into()));
            }
            SelectItem::UnnamedExpr(expr) => project(&mut result, expr, None)?,
            SelectItem::ExprWithAlias { expr, alias } => {
                project(&mut result, expr, Some(alias.value.clone()))?
            }
        }
    }

    match &select.group_by {
        GroupByExpr::Expressions(exprs, _) => {
            for expr in exprs {
                result.group_by.push(column_name(expr)?);
            }
        }
        GroupByExpr::All(_) => return Err(Error::Unsupported("GROUP BY ALL".into())),
    }

    if let Some(expr) = &select.selection {
        result.filter = Some(predicate(expr)?);
    }

    Ok(result)
}

/// `db.table` or `table`, alias ignored
fn table_ref(relation: &TableFactor) -> Result<TableRef> {
    match relation {
        TableFactor::Table { name, .. } => {
            let parts: Vec<String> = name
                .to_string()
                .split('.')
                .map(|p| p.trim_matches(|c| c == '"' || c == '`').to_string())
                .collect();
            match parts.as_slice() {
                [table] => Ok(TableRef {
                    database: None,
                    name: table.clone(),
                }),
                [db, table] => Ok(TableRef {
                    database: Some(db.clone()),
                    name: table.clone(),
                }),
                _ => Err(Error::Unsupported(format!("table name {}", name))),
            }
        }
        _ => Err(Error::Unsupported("only plain tables can be selected from".into())),
    }
}

/// Column reference, possibly table-qualified
fn column_name(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Identifier(ident) => Ok(ident.value.clone()),
        Expr::CompoundIdentifier(parts) => Ok(parts
            .iter()
            .map(|p| p.value.clone())
            .collect::<Vec<_>>()
            .join(".")),
        Expr::Nested(inner) => column_name(inner),
        _ => Err(Error::Unsupported(format!("expression {}", expr))),
    }
}

fn join_keys(expr: &Expr) -> Result<(String, String)> {
    match expr {
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Eq,
            right,
        } => Ok((column_name(left)?, column_name(right)?)),
        Expr::Nested(inner) => join_keys(inner),
        _ => Err(Error::Unsupported(format!(
            "join condition {}, only `a = b` is supported",
            expr
        ))),
    }
}

fn project(select: &mut Select, expr: &Expr, alias: Option<String>) -> Result<()> {
    match expr {
        Expr::Function(f) => {
            let name = f.name.to_string();
            let func = AggregateFunc::from_str(&name)
                .ok_or_else(|| Error::Unsupported(format!("function {}", name)))?;
            let args = match &f.args {
                FunctionArguments::List(list) => &list.args,
                _ => return Err(Error::Syntax(format!("{} takes one argument", name))),
            };
            let column = match args.as_slice() {
                [FunctionArg::Unnamed(FunctionArgExpr::Expr(e))] => column_name(e)?,
                [FunctionArg::Unnamed(FunctionArgExpr::Wildcard)]
                    if func == AggregateFunc::Count =>
                {
                    "*".to_string()
                }
                _ => return Err(Error::Syntax(format!("{} takes one column argument", name))),
            };
            select.aggregates.push(Aggregate {
                func,
                column,
                alias,
            });
        }
        expr => select.columns.push(Projection::Column {
            name: column_name(expr)?,
            alias,
        }),
    }
    Ok(())
}

/// Single `col OP literal` WHERE clause
fn predicate(expr: &Expr) -> Result<Predicate> {
    match expr {
        Expr::BinaryOp { left, op, right } => {
            let op = match op {
                BinaryOperator::Eq => Operator::Equal,
                BinaryOperator::NotEq => Operator::NotEqual,
                BinaryOperator::Lt => Operator::LessThan,
                BinaryOperator::LtEq => Operator::LessThanOrEqual,
                BinaryOperator::Gt => Operator::GreaterThan,
                BinaryOperator::GtEq => Operator::GreaterThanOrEqual,
                op => return Err(Error::Unsupported(format!("WHERE operator {}", op))),
            };
            if matches!(**right, Expr::Identifier(_) | Expr::CompoundIdentifier(_)) {
                return Err(Error::Unsupported(
                    "WHERE compares a column with a literal only".into(),
                ));
            }
            Ok(Predicate {
                column: column_name(left)?,
                op,
                value: unquote(&right.to_string()),
            })
        }
        Expr::Nested(inner) => predicate(inner),
        _ => Err(Error::Unsupported(format!(
            "WHERE clause {}, only `column OP value` is supported",
            expr
        ))),
    }
}
