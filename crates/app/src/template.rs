//! Template loading seam.
//!
//! Fetching is async (it suspends the calling flow, never blocks other
//! interaction) and resolves or rejects exactly once; there is no cancel
//! token. A failed fetch is surfaced as a resource error, the user simply
//! resubmits.

use std::path::PathBuf;

use async_trait::async_trait;

use fieldserve_core::{DomainError, DomainResult};

/// Source of the RAT template bytes.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch(&self) -> DomainResult<Vec<u8>>;
}

/// Template loaded from a file path.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TemplateSource for FileTemplateSource {
    async fn fetch(&self) -> DomainResult<Vec<u8>> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            DomainError::resource(format!("template fetch failed ({:?}): {e}", self.path))
        })
    }
}

/// In-memory template bytes (tests, embedded assets).
#[derive(Debug, Clone)]
pub struct StaticTemplateSource {
    bytes: Vec<u8>,
}

impl StaticTemplateSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[async_trait]
impl TemplateSource for StaticTemplateSource {
    async fn fetch(&self) -> DomainResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}
