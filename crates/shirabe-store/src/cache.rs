//! オントロジーストアのキャッシュ
//!
//! パース済みオントロジーをパス単位で保持する明示的なキャッシュ。
//! 無効化は手動 (invalidate / clear)。呼び出し側が同期を担う。

use crate::store::TripleStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache of parsed ontology stores, keyed by source path or URI
#[derive(Debug, Default)]
pub struct OntologyCache {
    entries: HashMap<String, Arc<TripleStore>>,
}

impl OntologyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached ontology store
    pub fn get(&self, path: &str) -> Option<Arc<TripleStore>> {
        self.entries.get(path).cloned()
    }

    /// Cache a store under the given path, replacing any previous entry.
    /// Returns the shared handle.
    pub fn insert<S: Into<String>>(&mut self, path: S, store: TripleStore) -> Arc<TripleStore> {
        let handle = Arc::new(store);
        self.entries.insert(path.into(), Arc::clone(&handle));
        handle
    }

    /// Drop the entry for a path. Returns true if an entry existed.
    pub fn invalidate(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
