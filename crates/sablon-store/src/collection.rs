//! In-process collection shared by the memory and file backends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sablon_types::{Document, RecordId, ID_FIELD};

use crate::error::{StoreError, StoreResult};

/// Ordered set of documents belonging to one namespace.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    documents: Vec<Document>,
}

/// Whether `document` satisfies every equality pair in `query`.
///
/// A key missing from the document matches only a `null` query value.
pub fn matches(document: &Document, query: &Document) -> bool {
    query.iter().all(|(key, expected)| match document.get(key) {
        Some(actual) => actual == expected,
        None => expected.is_null(),
    })
}

/// Reject partial documents that cannot be merged.
pub fn check_update(partial: &Document) -> StoreResult<()> {
    if partial.is_empty() {
        return Err(StoreError::InvalidUpdate("update document is empty".into()));
    }
    if partial.contains_key(ID_FIELD) {
        return Err(StoreError::InvalidUpdate(format!(
            "field '{ID_FIELD}' is immutable"
        )));
    }
    Ok(())
}

fn id_value(id: &RecordId) -> Value {
    Value::String(id.to_hex())
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        let wanted = id_value(id);
        self.documents
            .iter()
            .position(|doc| doc.get(ID_FIELD) == Some(&wanted))
    }

    /// Append `document` under a fresh identifier.
    pub fn insert(&mut self, mut document: Document) -> RecordId {
        let id = RecordId::generate();
        document.insert(ID_FIELD.into(), id_value(&id));
        self.documents.push(document);
        id
    }

    pub fn all(&self) -> Vec<Document> {
        self.documents.clone()
    }

    pub fn get(&self, id: &RecordId) -> Option<Document> {
        self.position(id).map(|i| self.documents[i].clone())
    }

    pub fn select(&self, query: &Document) -> Vec<Document> {
        self.documents
            .iter()
            .filter(|doc| matches(doc, query))
            .cloned()
            .collect()
    }

    /// Merge top-level keys. Returns 1 only if some value actually changed.
    pub fn update(&mut self, id: &RecordId, partial: &Document) -> StoreResult<u64> {
        check_update(partial)?;
        let Some(i) = self.position(id) else {
            return Ok(0);
        };
        let doc = &mut self.documents[i];
        let mut changed = false;
        for (key, value) in partial {
            if doc.get(key) != Some(value) {
                doc.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        Ok(u64::from(changed))
    }

    pub fn remove(&mut self, id: &RecordId) -> u64 {
        match self.position(id) {
            Some(i) => {
                self.documents.remove(i);
                1
            }
            None => 0,
        }
    }

    /// Remove the first document matching `query`.
    pub fn remove_first(&mut self, query: &Document) -> u64 {
        match self.documents.iter().position(|doc| matches(doc, query)) {
            Some(i) => {
                self.documents.remove(i);
                1
            }
            None => 0,
        }
    }
}
