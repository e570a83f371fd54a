//! Catalog & table store
//!
//! - `engine`: the `Storage` trait (raw database/table/backup units)
//! - `file`: JSON files on disk
//! - `memory`: in-memory maps, used by tests
//! - `catalog`: validated catalog operations on top of a `Storage`

pub mod catalog;
pub mod engine;
pub mod file;
pub mod memory;

pub use catalog::Catalog;
pub use engine::Storage;
pub use file::FileStorage;
pub use memory::MemoryStorage;
