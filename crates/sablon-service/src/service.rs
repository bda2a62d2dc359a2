use std::sync::Arc;

use serde_json::Value;

use sablon_store::{DocumentStore, Namespace, StoreError};
use sablon_types::{Document, RecordId, SablonRecord, ID_FIELD};

use crate::error::{ServiceError, ServiceResult};
use crate::outcome::{DeleteSummary, Inserted, UpdateSummary};

/// Sablon-specific operations over a shared document store.
///
/// Construct once at startup and share behind an `Arc`; the store handle is
/// safe for concurrent use.
pub struct RecordService {
    store: Arc<dyn DocumentStore>,
    namespace: Namespace,
}

fn parse_id(raw: &str) -> ServiceResult<RecordId> {
    raw.parse::<RecordId>()
        .map_err(|e| ServiceError::Storage(StoreError::InvalidId(e)))
}

/// Strip the storage identifier and parse the remainder.
fn coerce(mut document: Document) -> ServiceResult<SablonRecord> {
    let id = match document.remove(ID_FIELD) {
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => "<no id>".to_string(),
    };
    SablonRecord::from_document(document).map_err(|e| ServiceError::Coercion {
        id,
        reason: e.to_string(),
    })
}

fn coerce_all(documents: impl Iterator<Item = Document>) -> ServiceResult<Vec<SablonRecord>> {
    documents.map(coerce).collect()
}

impl RecordService {
    pub fn new(store: Arc<dyn DocumentStore>, namespace: Namespace) -> Self {
        Self { store, namespace }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Store a typed record.
    pub fn add_record(&self, record: &SablonRecord) -> ServiceResult<Inserted> {
        record.validate()?;
        let oid = self.store.insert(&self.namespace, record.to_document())?;
        tracing::info!(namespace = %self.namespace, %oid, "sablon added");
        Ok(Inserted { oid })
    }

    /// Validate an untyped payload, then store it.
    pub fn add_raw(&self, payload: Value) -> ServiceResult<Inserted> {
        let record = SablonRecord::from_value(payload)?;
        self.add_record(&record)
    }

    /// Every stored record. Fails entirely if any document is malformed.
    pub fn list_all(&self) -> ServiceResult<Vec<SablonRecord>> {
        let cursor = self.store.find_all(&self.namespace)?;
        coerce_all(cursor)
    }

    pub fn get_by_id(&self, id: &str) -> ServiceResult<SablonRecord> {
        let oid = parse_id(id)?;
        match self.store.find_by_id(&self.namespace, &oid)? {
            Some(document) => coerce(document),
            None => Err(ServiceError::NotFound(oid.to_hex())),
        }
    }

    /// Records matching `query` exactly. Fails entirely if any match is malformed.
    pub fn get_by_query(&self, query: &Document) -> ServiceResult<Vec<SablonRecord>> {
        let cursor = self.store.find_by_query(&self.namespace, query)?;
        coerce_all(cursor)
    }

    /// Merge `partial` into the stored document. No schema checks happen
    /// here; a missing identifier reports zero modifications.
    pub fn update_by_id(&self, id: &str, partial: &Document) -> ServiceResult<UpdateSummary> {
        let oid = parse_id(id)?;
        let modified_count = self.store.update_by_id(&self.namespace, &oid, partial)?;
        tracing::info!(namespace = %self.namespace, %oid, modified_count, "sablon updated");
        Ok(UpdateSummary { modified_count })
    }

    pub fn delete_by_id(&self, id: &str) -> ServiceResult<DeleteSummary> {
        let oid = parse_id(id)?;
        let deleted_count = self.store.delete_by_id(&self.namespace, &oid)?;
        tracing::info!(namespace = %self.namespace, %oid, deleted_count, "sablon deleted");
        Ok(DeleteSummary { deleted_count })
    }

    /// Delete the first record matching `query`.
    pub fn delete_by_query(&self, query: &Document) -> ServiceResult<DeleteSummary> {
        let deleted_count = self.store.delete_by_query(&self.namespace, query)?;
        tracing::info!(namespace = %self.namespace, deleted_count, "sablon deleted by query");
        Ok(DeleteSummary { deleted_count })
    }
}

impl std::fmt::Debug for RecordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordService")
            .field("namespace", &self.namespace)
            .finish()
    }
}
