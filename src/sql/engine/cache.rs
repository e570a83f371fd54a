use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sql::types::Row;

/// A memoized SELECT result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRows {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// SELECT result cache keyed by the verbatim statement text
///
/// No normalization: statements that differ only in whitespace or case
/// are different keys. There is no eviction, any successful mutation
/// clears every entry.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, CachedRows>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, statement: &str) -> Option<&CachedRows> {
        self.entries.get(statement)
    }

    pub fn store(&mut self, statement: &str, result: CachedRows) {
        self.entries.insert(statement.to_string(), result);
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(entries = self.entries.len(), "result cache cleared");
        }
        self.entries.clear();
    }

    pub fn contains(&self, statement: &str) -> bool {
        self.entries.contains_key(statement)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
