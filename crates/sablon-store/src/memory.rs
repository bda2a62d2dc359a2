use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sablon_types::{Document, RecordId};

use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};
use crate::namespace::Namespace;
use crate::traits::{Cursor, DocumentStore};

/// In-memory, HashMap-based document store.
///
/// Intended for tests and embedding. Collections are created on first
/// insert and held behind a `RwLock` for safe concurrent access. Documents
/// are cloned on read.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<Namespace, Collection>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<Namespace, Collection>>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<Namespace, Collection>>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    /// Number of documents in `ns`.
    pub fn count(&self, ns: &Namespace) -> StoreResult<usize> {
        Ok(self.read()?.get(ns).map_or(0, Collection::len))
    }

    /// Remove every document from every namespace.
    pub fn clear(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert(&self, ns: &Namespace, document: Document) -> StoreResult<RecordId> {
        ns.validate()?;
        let id = self.write()?.entry(ns.clone()).or_default().insert(document);
        tracing::debug!(namespace = %ns, %id, "inserted document");
        Ok(id)
    }

    fn find_all(&self, ns: &Namespace) -> StoreResult<Cursor> {
        ns.validate()?;
        let docs = self.read()?.get(ns).map(Collection::all).unwrap_or_default();
        Ok(Cursor::new(docs))
    }

    fn find_by_id(&self, ns: &Namespace, id: &RecordId) -> StoreResult<Option<Document>> {
        ns.validate()?;
        Ok(self.read()?.get(ns).and_then(|c| c.get(id)))
    }

    fn find_by_query(&self, ns: &Namespace, query: &Document) -> StoreResult<Cursor> {
        ns.validate()?;
        let docs = self
            .read()?
            .get(ns)
            .map(|c| c.select(query))
            .unwrap_or_default();
        Ok(Cursor::new(docs))
    }

    fn update_by_id(&self, ns: &Namespace, id: &RecordId, partial: &Document) -> StoreResult<u64> {
        ns.validate()?;
        crate::collection::check_update(partial)?;
        match self.write()?.get_mut(ns) {
            Some(c) => c.update(id, partial),
            None => Ok(0),
        }
    }

    fn delete_by_id(&self, ns: &Namespace, id: &RecordId) -> StoreResult<u64> {
        ns.validate()?;
        Ok(self.write()?.get_mut(ns).map_or(0, |c| c.remove(id)))
    }

    fn delete_by_query(&self, ns: &Namespace, query: &Document) -> StoreResult<u64> {
        ns.validate()?;
        Ok(self.write()?.get_mut(ns).map_or(0, |c| c.remove_first(query)))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let namespaces = self.read().map(|m| m.len()).unwrap_or_default();
        f.debug_struct("InMemoryDocumentStore")
            .field("namespaces", &namespaces)
            .finish()
    }
}
