use crate::error::IndexResult;
use crate::index::Index;
use crate::persist::load_index;
use crate::ranking::{search, SearchOutcome};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Holds the currently published index for one artifact location.
///
/// Searches run on an `Arc` snapshot and never block on a reload; a reload
/// swaps in a freshly loaded index only after it loaded completely.
pub struct IndexStore {
    path: PathBuf,
    current: RwLock<Arc<Index>>,
}

impl IndexStore {
    pub fn open<P: AsRef<Path>>(path: P) -> IndexResult<Self> {
        let path = path.as_ref().to_path_buf();
        let index = load_index(&path)?;
        Ok(Self { path, current: RwLock::new(Arc::new(index)) })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn snapshot(&self) -> Arc<Index> {
        self.current.read().clone()
    }

    /// Re-read the artifact. On failure the previous index stays published.
    pub fn reload(&self) -> IndexResult<Arc<Index>> {
        let fresh = match load_index(&self.path) {
            Ok(idx) => Arc::new(idx),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "reload failed, keeping previous index");
                return Err(e);
            }
        };
        *self.current.write() = fresh.clone();
        tracing::info!(path = %self.path.display(), docs = fresh.len(), "index reloaded");
        Ok(fresh)
    }

    pub fn search(&self, query: &str, top_k: i64) -> SearchOutcome {
        search(&self.snapshot(), query, top_k)
    }
}
