//! Store lookup over the loaded directory.

use fieldserve_core::{DomainError, DomainResult};

use crate::ingest::StoreRecord;

/// The loaded IP directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    records: Vec<StoreRecord>,
}

impl Directory {
    pub fn new(records: Vec<StoreRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StoreRecord] {
        &self.records
    }

    pub fn is_loaded(&self) -> bool {
        !self.records.is_empty()
    }

    /// Find a store by number (exact) or name (case-insensitive substring).
    ///
    /// An empty query is a validation error; an unknown store is `NotFound`.
    pub fn lookup(&self, store: &str) -> DomainResult<&StoreRecord> {
        let query = store.trim();
        if query.is_empty() {
            return Err(DomainError::validation("store query cannot be empty"));
        }

        let needle = query.to_lowercase();
        self.records
            .iter()
            .find(|r| r.store_number == query || r.store_name.to_lowercase().contains(&needle))
            .ok_or(DomainError::NotFound)
    }
}
