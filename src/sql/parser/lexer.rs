//! Word lexer for statement classification
//!
//! The recognizer only pulls the leading words it needs to pick a
//! statement kind, the rest of the text is handed to one of the front ends.

use std::{fmt::Display, iter::Peekable, str::Chars};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    /// Any other word, case preserved
    Ident(String),
    /// A single non-word character
    Symbol(char),
}

/// Keywords that open a supported statement
#[derive(Debug, Clone, PartialEq)]
pub enum Keyword {
    Select,
    From,
    Create,
    Show,
    Rename,
    Drop,
    Database,
    Databases,
    Table,
    Insert,
    Into,
    Update,
    Delete,
}

impl Keyword {
    /// Case-insensitive keyword lookup
    pub fn from_str(ident: &str) -> Option<Keyword> {
        Some(match ident.to_uppercase().as_ref() {
            "SELECT" => Keyword::Select,
            "FROM" => Keyword::From,
            "CREATE" => Keyword::Create,
            "SHOW" => Keyword::Show,
            "RENAME" => Keyword::Rename,
            "DROP" => Keyword::Drop,
            "DATABASE" => Keyword::Database,
            "DATABASES" => Keyword::Databases,
            "TABLE" => Keyword::Table,
            "INSERT" => Keyword::Insert,
            "INTO" => Keyword::Into,
            "UPDATE" => Keyword::Update,
            "DELETE" => Keyword::Delete,
            _ => return None,
        })
    }

    pub fn to_str(&self) -> &str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Create => "CREATE",
            Keyword::Show => "SHOW",
            Keyword::Rename => "RENAME",
            Keyword::Drop => "DROP",
            Keyword::Database => "DATABASE",
            Keyword::Databases => "DATABASES",
            Keyword::Table => "TABLE",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Update => "UPDATE",
            Keyword::Delete => "DELETE",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.iter.next_if(|c| c.is_whitespace()).is_some() {}
        match self.iter.peek()? {
            c if c.is_alphabetic() || *c == '_' => Some(self.scan_word()),
            _ => self.iter.next().map(Token::Symbol),
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(sql_text: &'a str) -> Self {
        Self {
            iter: sql_text.chars().peekable(),
        }
    }

    fn scan_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(c) = self.iter.next_if(|c| c.is_alphanumeric() || *c == '_') {
            word.push(c);
        }
        Keyword::from_str(&word).map_or(Token::Ident(word), Token::Keyword)
    }
}
