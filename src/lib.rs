//! TableDB - a small file-backed relational engine
//!
//! This crate provides:
//! - Named databases of typed tables persisted as JSON
//! - A constrained SQL dialect (fixed DDL/DML forms, SELECT with one join,
//!   GROUP BY and aggregates)
//! - A SELECT result cache cleared by every mutation
//! - Timestamped table backups taken before UPDATE and DELETE
//!
//! ```no_run
//! use tabledb::{Config, Engine};
//!
//! # fn main() -> tabledb::Result<()> {
//! let engine = Engine::open(Config::from_env())?;
//! let mut session = engine.session();
//! session.execute("CREATE DATABASE shop")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod sql;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use sql::engine::{Engine, QueryResult, Session, Source};
