//! Fixed-form statement grammar
//!
//! Every non-SELECT statement has one positional shape: keywords, a
//! `db.table` (or bare) identifier with an optional `AS alias`, and a
//! clause payload. Each shape is an anchored, case-insensitive pattern.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::{
    error::{Error, Result},
    sql::{
        parser::ast::{Operator, Predicate, Statement, StatementKind, TableRef},
        schema::Column,
        types::ColumnType,
    },
};

/// Table identifier with an optional alias that is dropped
const TABLE: &str = r"(\w+(?:\.\w+)?)(?:\s+as\s+\w+)?";
/// Optional trailing semicolon and whitespace
const END: &str = r"\s*;?\s*$";

struct Form {
    kind: StatementKind,
    usage: &'static str,
    pattern: String,
}

fn forms() -> &'static Vec<(Form, Regex)> {
    static FORMS: OnceLock<Vec<(Form, Regex)>> = OnceLock::new();
    FORMS.get_or_init(|| {
        vec![
            Form {
                kind: StatementKind::CreateDatabase,
                usage: "CREATE DATABASE name",
                pattern: format!(r"^\s*create\s+database\s+(\w+){END}"),
            },
            Form {
                kind: StatementKind::ShowDatabases,
                usage: "SHOW DATABASES",
                pattern: format!(r"^\s*show\s+databases{END}"),
            },
            Form {
                kind: StatementKind::RenameDatabase,
                usage: "RENAME DATABASE old_name TO new_name",
                pattern: format!(r"^\s*rename\s+database\s+(\w+)\s+to\s+(\w+){END}"),
            },
            Form {
                kind: StatementKind::DropDatabase,
                usage: "DROP DATABASE name",
                pattern: format!(r"^\s*drop\s+database\s+(\w+){END}"),
            },
            Form {
                kind: StatementKind::CreateTable,
                usage: "CREATE TABLE db.table (column TYPE, ...)",
                pattern: format!(r"^\s*create\s+table\s+{TABLE}\s*\((.+)\){END}"),
            },
            Form {
                kind: StatementKind::DropTable,
                usage: "DROP TABLE db.table",
                pattern: format!(r"^\s*drop\s+table\s+{TABLE}{END}"),
            },
            Form {
                kind: StatementKind::RenameTable,
                usage: "RENAME TABLE db.table TO db.new_name",
                pattern: format!(r"^\s*rename\s+table\s+{TABLE}\s+to\s+(\w+(?:\.\w+)?){END}"),
            },
            Form {
                kind: StatementKind::Insert,
                usage: "INSERT INTO db.table (col, ...) VALUES (value, ...)",
                pattern: format!(
                    r"^\s*insert\s+into\s+{TABLE}\s*\((.+?)\)\s*values\s*\((.+)\){END}"
                ),
            },
            Form {
                kind: StatementKind::Update,
                usage: "UPDATE db.table SET col = value WHERE col = value",
                pattern: format!(r"^\s*update\s+{TABLE}\s+set\s+(.+?)\s+where\s+(.+?){END}"),
            },
            Form {
                kind: StatementKind::Delete,
                usage: "DELETE FROM db.table WHERE col OP value",
                pattern: format!(
                    r"^\s*delete\s+from\s+{TABLE}\s+where\s+(\w+)\s*(<=|>=|!=|<>|=|<|>)\s*(.+?){END}"
                ),
            },
        ]
        .into_iter()
        .map(|form| {
            let re = Regex::new(&format!("(?is){}", form.pattern))
                .expect("valid statement grammar");
            (form, re)
        })
        .collect()
    })
}

fn capture(caps: &Captures, i: usize) -> String {
    caps.get(i).map_or_else(String::new, |m| m.as_str().trim().to_string())
}

/// Matches statement text against the fixed grammar of `kind`
pub fn parse(kind: StatementKind, sql: &str) -> Result<Statement> {
    let (form, re) = forms()
        .iter()
        .find(|(form, _)| form.kind == kind)
        .ok_or_else(|| Error::Unsupported(format!("no fixed grammar for {}", kind)))?;
    let caps = re.captures(sql).ok_or_else(|| {
        Error::Syntax(format!("invalid {} syntax, expected: {}", kind, form.usage))
    })?;

    Ok(match kind {
        StatementKind::CreateDatabase => Statement::CreateDatabase {
            name: capture(&caps, 1),
        },
        StatementKind::ShowDatabases => Statement::ShowDatabases,
        StatementKind::RenameDatabase => Statement::RenameDatabase {
            from: capture(&caps, 1),
            to: capture(&caps, 2),
        },
        StatementKind::DropDatabase => Statement::DropDatabase {
            name: capture(&caps, 1),
        },
        StatementKind::CreateTable => Statement::CreateTable {
            table: TableRef::parse(&capture(&caps, 1)),
            columns: parse_column_defs(&capture(&caps, 2))?,
        },
        StatementKind::DropTable => Statement::DropTable {
            table: TableRef::parse(&capture(&caps, 1)),
        },
        StatementKind::RenameTable => Statement::RenameTable {
            from: TableRef::parse(&capture(&caps, 1)),
            to: TableRef::parse(&capture(&caps, 2)),
        },
        StatementKind::Insert => Statement::Insert {
            table: TableRef::parse(&capture(&caps, 1)),
            columns: split_top_level(&capture(&caps, 2))
                .iter()
                .map(|c| c.trim().to_string())
                .collect(),
            values: split_top_level(&capture(&caps, 3))
                .iter()
                .map(|v| unquote(v))
                .collect(),
        },
        StatementKind::Update => Statement::Update {
            table: TableRef::parse(&capture(&caps, 1)),
            set: parse_assignment(&capture(&caps, 2), "SET")?,
            predicate: parse_assignment(&capture(&caps, 3), "WHERE")?,
        },
        StatementKind::Delete => Statement::Delete {
            table: TableRef::parse(&capture(&caps, 1)),
            predicate: Predicate {
                column: capture(&caps, 2),
                op: Operator::from_str(&capture(&caps, 3)).ok_or_else(|| {
                    Error::Syntax(format!("unknown operator {}", capture(&caps, 3)))
                })?,
                value: unquote(&capture(&caps, 4)),
            },
        },
        StatementKind::Select => {
            return Err(Error::Unsupported("SELECT has no fixed grammar".into()));
        }
    })
}

/// Parses `name TYPE[(params)], ...` column definitions
fn parse_column_defs(text: &str) -> Result<Vec<Column>> {
    let mut columns = Vec::new();
    for def in split_top_level(text) {
        let def = def.trim();
        if def.is_empty() {
            continue;
        }
        let (name, ty) = def
            .split_once(char::is_whitespace)
            .ok_or_else(|| {
                Error::Syntax(format!(
                    "column definition '{}' needs a name and a type, e.g. id INT",
                    def
                ))
            })?;
        columns.push(Column::new(name.trim(), ColumnType::parse(ty)?));
    }
    Ok(columns)
}

/// Parses a single `col = value`
fn parse_assignment(text: &str, clause: &str) -> Result<(String, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?s)^\s*(\w+)\s*=\s*(.+?)\s*$").expect("valid assignment regex")
    });
    let caps = re.captures(text).ok_or_else(|| {
        Error::Syntax(format!(
            "{} supports exactly one `column = value`, got '{}'",
            clause, text
        ))
    })?;
    let value = capture(&caps, 2);
    if split_top_level(&value).len() > 1 || contains_keyword(&value) {
        return Err(Error::Syntax(format!(
            "{} supports exactly one `column = value`, got '{}'",
            clause, text
        )));
    }
    Ok((capture(&caps, 1), unquote(&value)))
}

/// Whether unquoted text continues with AND/OR, i.e. more than one term
fn contains_keyword(value: &str) -> bool {
    if value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2 {
        return false;
    }
    value
        .split_whitespace()
        .any(|w| w.eq_ignore_ascii_case("and") || w.eq_ignore_ascii_case("or"))
}

/// Splits on commas outside parentheses and single-quoted strings
pub fn split_top_level(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quoted = false;
    for c in text.chars() {
        match c {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth = depth.saturating_sub(1),
            ',' if !quoted && depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    parts.push(current);
    parts
}

/// Trims and strips one pair of enclosing single quotes ('' -> ')
pub fn unquote(text: &str) -> String {
    let text = text.trim();
    match text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(inner) => inner.replace("''", "'"),
        None => text.to_string(),
    }
}
