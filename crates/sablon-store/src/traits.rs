use sablon_types::{Document, RecordId};

use crate::error::StoreResult;
use crate::namespace::Namespace;

/// Lazily consumed sequence of documents.
///
/// A cursor owns a snapshot taken when the producing call ran; later writes
/// do not show through and no state is shared between cursors.
pub struct Cursor {
    inner: std::vec::IntoIter<Document>,
}

impl Cursor {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            inner: documents.into_iter(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Iterator for Cursor {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Cursor {}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

/// Generic document store.
///
/// All implementations must satisfy these invariants:
/// - `insert` always succeeds on duplicate content; there are no uniqueness
///   constraints beyond the assigned identifier.
/// - Documents are returned with their identifier under `_id`.
/// - Queries use top-level equality only. A key absent from a document
///   matches a `null` query value.
/// - A missing identifier is never an error: lookups return `None` and
///   mutations report a zero count.
/// - No schema validation happens here.
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its newly assigned identifier.
    ///
    /// Any caller-supplied `_id` is replaced.
    fn insert(&self, ns: &Namespace, document: Document) -> StoreResult<RecordId>;

    /// All documents in insertion order.
    fn find_all(&self, ns: &Namespace) -> StoreResult<Cursor>;

    /// Single-document lookup. Returns `Ok(None)` if absent.
    fn find_by_id(&self, ns: &Namespace, id: &RecordId) -> StoreResult<Option<Document>>;

    /// All documents whose top-level values equal every pair in `query`.
    fn find_by_query(&self, ns: &Namespace, query: &Document) -> StoreResult<Cursor>;

    /// Merge `partial` into the document with `id`. Returns the number of
    /// documents whose contents changed (0 or 1).
    fn update_by_id(&self, ns: &Namespace, id: &RecordId, partial: &Document) -> StoreResult<u64>;

    /// Delete the document with `id`. Returns the number removed (0 or 1).
    fn delete_by_id(&self, ns: &Namespace, id: &RecordId) -> StoreResult<u64>;

    /// Delete the first document matching `query`. Returns 0 or 1.
    fn delete_by_query(&self, ns: &Namespace, query: &Document) -> StoreResult<u64>;
}
