use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sablon_types::{Document, RecordId};

use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};
use crate::namespace::Namespace;
use crate::traits::{Cursor, DocumentStore};

/// Filesystem-backed document store.
///
/// Each namespace lives in `<root>/<database>/<collection>.json` as a JSON
/// array of documents. A missing file is an empty collection. Writes go to a
/// temporary file in the same directory which is then renamed over the
/// original, so a crash never leaves a half-written collection behind.
///
/// Access is serialized through a process-local lock; running two processes
/// against the same root is not supported.
pub struct JsonFileDocumentStore {
    root: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileDocumentStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "opened file document store");
        Ok(Self {
            root,
            lock: RwLock::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, ns: &Namespace) -> StoreResult<PathBuf> {
        ns.validate()?;
        Ok(self
            .root
            .join(&ns.database)
            .join(format!("{}.json", ns.collection)))
    }

    fn shared(&self) -> StoreResult<RwLockReadGuard<'_, ()>> {
        self.lock
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn exclusive(&self) -> StoreResult<RwLockWriteGuard<'_, ()>> {
        self.lock
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn load(path: &Path) -> StoreResult<Collection> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Collection::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Serialization(format!("{}: {e}", path.display())))
    }

    fn save(path: &Path, collection: &Collection) -> StoreResult<()> {
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::Io(io::Error::other("collection path has no parent")))?;
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, collection)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// Load, mutate and persist a collection under the exclusive lock.
    /// The file is only rewritten when `f` reports a change.
    fn mutate<T>(
        &self,
        ns: &Namespace,
        f: impl FnOnce(&mut Collection) -> StoreResult<(T, bool)>,
    ) -> StoreResult<T> {
        let path = self.path_for(ns)?;
        let _guard = self.exclusive()?;
        let mut collection = Self::load(&path)?;
        let (out, changed) = f(&mut collection)?;
        if changed {
            Self::save(&path, &collection)?;
        }
        Ok(out)
    }

    fn snapshot(&self, ns: &Namespace) -> StoreResult<Collection> {
        let path = self.path_for(ns)?;
        let _guard = self.shared()?;
        Self::load(&path)
    }
}

impl DocumentStore for JsonFileDocumentStore {
    fn insert(&self, ns: &Namespace, document: Document) -> StoreResult<RecordId> {
        let id = self.mutate(ns, |c| Ok((c.insert(document), true)))?;
        tracing::debug!(namespace = %ns, %id, "inserted document");
        Ok(id)
    }

    fn find_all(&self, ns: &Namespace) -> StoreResult<Cursor> {
        Ok(Cursor::new(self.snapshot(ns)?.all()))
    }

    fn find_by_id(&self, ns: &Namespace, id: &RecordId) -> StoreResult<Option<Document>> {
        Ok(self.snapshot(ns)?.get(id))
    }

    fn find_by_query(&self, ns: &Namespace, query: &Document) -> StoreResult<Cursor> {
        Ok(Cursor::new(self.snapshot(ns)?.select(query)))
    }

    fn update_by_id(&self, ns: &Namespace, id: &RecordId, partial: &Document) -> StoreResult<u64> {
        crate::collection::check_update(partial)?;
        self.mutate(ns, |c| {
            let n = c.update(id, partial)?;
            Ok((n, n > 0))
        })
    }

    fn delete_by_id(&self, ns: &Namespace, id: &RecordId) -> StoreResult<u64> {
        self.mutate(ns, |c| {
            let n = c.remove(id);
            Ok((n, n > 0))
        })
    }

    fn delete_by_query(&self, ns: &Namespace, query: &Document) -> StoreResult<u64> {
        self.mutate(ns, |c| {
            let n = c.remove_first(query);
            Ok((n, n > 0))
        })
    }
}

impl std::fmt::Debug for JsonFileDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileDocumentStore")
            .field("root", &self.root)
            .finish()
    }
}
