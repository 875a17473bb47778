//! File-backed blob store: one JSON file per key under the app data dir.

use std::path::PathBuf;

use anyhow::Context;

use crate::kv::BlobStore;

/// Blob store writing `<dir>/<key>.json` files.
///
/// Reads/writes are whole-file; the single local session is the only writer,
/// so last-write-wins is acceptable.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open a store rooted at an explicit directory (created if absent).
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create storage directory at {dir:?}"))?;
        Ok(Self { dir })
    }

    /// Open the default store at `{app_data_dir}/fieldserve/`.
    pub fn open_default() -> anyhow::Result<Self> {
        let base = dirs::data_dir()
            .or_else(|| {
                dirs::home_dir().map(|mut h| {
                    h.push(".local");
                    h.push("share");
                    h
                })
            })
            .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

        let mut dir = base;
        dir.push("fieldserve");
        Self::new(dir)
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::error!(key, "failed to read blob: {e}");
                None
            }
        }
    }

    fn put(&self, key: &str, value: String) {
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            tracing::error!(key, "failed to write blob: {e}");
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!(key, "failed to remove blob: {e}"),
        }
    }
}
