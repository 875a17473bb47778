//! `fieldserve-directory` — store/PDV IP directory.
//!
//! Loaded from the operations spreadsheet export (delimiter-tolerant,
//! column-positional), queried by store, with a small bounded search
//! history.

pub mod history;
pub mod ingest;
pub mod lookup;

pub use history::{HistoryEntry, SearchHistory};
pub use ingest::{StoreRecord, parse_directory};
pub use lookup::Directory;
