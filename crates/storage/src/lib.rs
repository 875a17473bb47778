//! `fieldserve-storage` — key-value JSON blob persistence.
//!
//! State is written as whole snapshots under well-known keys: there is a
//! single writer (the local session), no partial updates and no versioned
//! concurrency. Anything unreadable falls back to compiled-in defaults; a
//! corrupt store never takes the application down.

pub mod file;
pub mod kv;
pub mod snapshot;

pub use file::FileBlobStore;
pub use kv::{BlobStore, MemoryBlobStore, keys};
pub use snapshot::{CallsSnapshot, load_json_or, save_json};
