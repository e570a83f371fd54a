//! Statement recognizer
//!
//! Leading keywords pick the statement kind. SELECT is handed to the
//! generic-grammar front end (`select`), the fixed DDL/DML forms to the
//! pattern front end (`grammar`). The two are never mixed.

use crate::{
    error::{Error, Result},
    sql::parser::{
        ast::{Statement, StatementKind},
        lexer::{Keyword, Lexer, Token},
    },
};

pub mod ast;
pub mod grammar;
mod lexer;
pub mod select;

/// SQL Parser - classifies statement text and extracts its structure
pub struct Parser<'a> {
    sql: &'a str,
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given SQL input
    pub fn new(sql: &'a str) -> Self {
        Parser {
            sql,
            lexer: Lexer::new(sql),
        }
    }

    /// Parses the input statement into an AST
    pub fn parse(&mut self) -> Result<Statement> {
        if self.sql.trim().trim_end_matches(';').trim().is_empty() {
            return Err(Error::Syntax("empty statement".into()));
        }
        let stmt = match self.classify() {
            Some(StatementKind::Select) => Statement::Select(select::parse(self.sql)?),
            Some(kind) => grammar::parse(kind, self.sql)?,
            None => return Err(self.unsupported()),
        };
        tracing::debug!(kind = %stmt.kind(), "statement recognized");
        Ok(stmt)
    }

    /// Picks the statement kind from the leading keywords
    fn classify(&mut self) -> Option<StatementKind> {
        Some(match self.next_keyword()? {
            Keyword::Select => StatementKind::Select,
            Keyword::Create => match self.next_keyword()? {
                Keyword::Database => StatementKind::CreateDatabase,
                Keyword::Table => StatementKind::CreateTable,
                _ => return None,
            },
            Keyword::Show => match self.next_keyword()? {
                Keyword::Databases => StatementKind::ShowDatabases,
                _ => return None,
            },
            Keyword::Rename => match self.next_keyword()? {
                Keyword::Database => StatementKind::RenameDatabase,
                Keyword::Table => StatementKind::RenameTable,
                _ => return None,
            },
            Keyword::Drop => match self.next_keyword()? {
                Keyword::Database => StatementKind::DropDatabase,
                Keyword::Table => StatementKind::DropTable,
                _ => return None,
            },
            Keyword::Insert => match self.next_keyword()? {
                Keyword::Into => StatementKind::Insert,
                _ => return None,
            },
            Keyword::Update => StatementKind::Update,
            Keyword::Delete => match self.next_keyword()? {
                Keyword::From => StatementKind::Delete,
                _ => return None,
            },
            _ => return None,
        })
    }

    /// Error for text outside the supported statement set
    ///
    /// The generic grammar is only used to name what was submitted.
    fn unsupported(&self) -> Error {
        match select::statement_name(self.sql) {
            Ok(name) => Error::Unsupported(format!("unsupported statement type: {}", name)),
            Err(err) => err,
        }
    }

    /// Consumes the next token if it is a keyword
    fn next_keyword(&mut self) -> Option<Keyword> {
        match self.lexer.next()? {
            Token::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }
}
