//! SQL processing module
//!
//! This module provides:
//! - `parser`: statement recognizer (lexer, fixed-form grammar, SELECT front end)
//! - `types`: column types and row values
//! - `schema`: table and column schema definitions
//! - `plan`: execution plan generation
//! - `executor`: query and mutation execution
//! - `engine`: engine handle, sessions and the result cache

pub mod engine;
pub mod executor;
pub mod parser;
pub mod plan;
pub mod schema;
pub mod types;
