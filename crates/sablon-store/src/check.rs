//! End-to-end probe of a [`DocumentStore`] against one namespace.

use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};

use sablon_types::{Document, RecordId, ID_FIELD};

use crate::error::StoreResult;
use crate::namespace::Namespace;
use crate::traits::DocumentStore;

const PROBE_NAME: &str = "__sablon_probe__";
const PROBE_NAME_UPDATED: &str = "__sablon_probe_updated__";

/// One step of the self-check sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStep {
    Insert,
    FindAll,
    FindById,
    UpdateById,
    FindByQuery,
    DeleteById,
}

impl CheckStep {
    pub const ALL: [CheckStep; 6] = [
        CheckStep::Insert,
        CheckStep::FindAll,
        CheckStep::FindById,
        CheckStep::UpdateById,
        CheckStep::FindByQuery,
        CheckStep::DeleteById,
    ];
}

impl fmt::Display for CheckStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Insert => "insert",
            Self::FindAll => "find_all",
            Self::FindById => "find_by_id",
            Self::UpdateById => "update_by_id",
            Self::FindByQuery => "find_by_query",
            Self::DeleteById => "delete_by_id",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub step: CheckStep,
    pub passed: bool,
    pub detail: String,
}

/// Result of [`self_check`]. Steps after the first failure are not run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SelfCheckReport {
    pub namespace: String,
    pub steps: Vec<StepOutcome>,
}

impl SelfCheckReport {
    pub fn passed(&self) -> bool {
        self.steps.len() == CheckStep::ALL.len() && self.steps.iter().all(|s| s.passed)
    }

    pub fn failed_step(&self) -> Option<CheckStep> {
        self.steps.iter().find(|s| !s.passed).map(|s| s.step)
    }

    fn record(&mut self, step: CheckStep, result: StoreResult<Result<String, String>>) -> bool {
        let (passed, detail) = match result {
            Ok(Ok(detail)) => (true, detail),
            Ok(Err(detail)) => (false, detail),
            Err(e) => (false, e.to_string()),
        };
        self.steps.push(StepOutcome {
            step,
            passed,
            detail,
        });
        passed
    }
}

fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

fn has_id(doc: &Document, id: &RecordId) -> bool {
    doc.get(ID_FIELD) == Some(&Value::String(id.to_hex()))
}

/// Exercise every store operation with a probe document.
///
/// Runs insert, find_all, find_by_id, update_by_id, find_by_query and
/// delete_by_id in order, stopping at the first failure. The probe document
/// is removed even when an intermediate step fails.
pub fn self_check(store: &dyn DocumentStore, ns: &Namespace) -> SelfCheckReport {
    let mut report = SelfCheckReport {
        namespace: ns.to_string(),
        steps: Vec::new(),
    };

    let id = match store.insert(ns, object(json!({ "name": PROBE_NAME }))) {
        Ok(id) => {
            report.record(CheckStep::Insert, Ok(Ok(format!("added {id}"))));
            id
        }
        Err(e) => {
            report.record(CheckStep::Insert, Err(e));
            return report;
        }
    };

    let deleted = run_steps(store, ns, &id, &mut report);
    if !deleted {
        if let Err(e) = store.delete_by_id(ns, &id) {
            tracing::warn!(namespace = %ns, %id, error = %e, "failed to remove probe document");
        }
    }
    report
}

/// Returns whether the probe was deleted by the final step.
fn run_steps(
    store: &dyn DocumentStore,
    ns: &Namespace,
    id: &RecordId,
    report: &mut SelfCheckReport,
) -> bool {
    let found = store.find_all(ns).map(|mut cursor| {
        if cursor.any(|doc| has_id(&doc, id)) {
            Ok("probe listed".to_string())
        } else {
            Err("probe missing from listing".to_string())
        }
    });
    if !report.record(CheckStep::FindAll, found) {
        return false;
    }

    let found = store.find_by_id(ns, id).map(|doc| match doc {
        Some(doc) if has_id(&doc, id) => Ok("probe found".to_string()),
        _ => Err("probe not found by id".to_string()),
    });
    if !report.record(CheckStep::FindById, found) {
        return false;
    }

    let update = object(json!({ "name": PROBE_NAME_UPDATED }));
    let updated = store.update_by_id(ns, id, &update).map(|n| match n {
        1 => Ok("updated: 1".to_string()),
        n => Err(format!("expected 1 modified document, got {n}")),
    });
    if !report.record(CheckStep::UpdateById, updated) {
        return false;
    }

    let found = store.find_by_query(ns, &update).map(|mut cursor| {
        match cursor.next() {
            Some(doc) if has_id(&doc, id) => Ok("probe matched".to_string()),
            _ => Err("updated probe not matched by query".to_string()),
        }
    });
    if !report.record(CheckStep::FindByQuery, found) {
        return false;
    }

    let deleted = store.delete_by_id(ns, id).map(|n| match n {
        1 => Ok("deleted: 1".to_string()),
        n => Err(format!("expected 1 deleted document, got {n}")),
    });
    report.record(CheckStep::DeleteById, deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDocumentStore;
    use crate::traits::Cursor;

    #[test]
    fn healthy_store_passes() {
        let store = InMemoryDocumentStore::new();
        let report = self_check(&store, &Namespace::default());
        assert!(report.passed(), "{report:?}");
        assert_eq!(report.steps.len(), 6);
        assert_eq!(store.count(&Namespace::default()).unwrap(), 0);
    }

    #[test]
    fn preexisting_documents_do_not_matter() {
        let store = InMemoryDocumentStore::new();
        store
            .insert(&Namespace::default(), object(json!({"name": "keep"})))
            .unwrap();
        assert!(self_check(&store, &Namespace::default()).passed());
        assert_eq!(store.count(&Namespace::default()).unwrap(), 1);
    }

    /// Store whose updates never modify anything.
    struct StuckUpdates(InMemoryDocumentStore);

    impl DocumentStore for StuckUpdates {
        fn insert(&self, ns: &Namespace, d: Document) -> StoreResult<RecordId> {
            self.0.insert(ns, d)
        }
        fn find_all(&self, ns: &Namespace) -> StoreResult<Cursor> {
            self.0.find_all(ns)
        }
        fn find_by_id(&self, ns: &Namespace, id: &RecordId) -> StoreResult<Option<Document>> {
            self.0.find_by_id(ns, id)
        }
        fn find_by_query(&self, ns: &Namespace, q: &Document) -> StoreResult<Cursor> {
            self.0.find_by_query(ns, q)
        }
        fn update_by_id(&self, _: &Namespace, _: &RecordId, _: &Document) -> StoreResult<u64> {
            Ok(0)
        }
        fn delete_by_id(&self, ns: &Namespace, id: &RecordId) -> StoreResult<u64> {
            self.0.delete_by_id(ns, id)
        }
        fn delete_by_query(&self, ns: &Namespace, q: &Document) -> StoreResult<u64> {
            self.0.delete_by_query(ns, q)
        }
    }

    #[test]
    fn failure_stops_and_cleans_up() {
        let store = StuckUpdates(InMemoryDocumentStore::new());
        let report = self_check(&store, &Namespace::default());
        assert!(!report.passed());
        assert_eq!(report.failed_step(), Some(CheckStep::UpdateById));
        assert_eq!(report.steps.len(), 4);
        assert_eq!(store.0.count(&Namespace::default()).unwrap(), 0);
    }

    #[test]
    fn insert_failure_is_reported() {
        let store = InMemoryDocumentStore::new();
        let bad = Namespace {
            database: "a/b".into(),
            collection: "c".into(),
        };
        let report = self_check(&store, &bad);
        assert_eq!(report.failed_step(), Some(CheckStep::Insert));
        assert!(report.steps[0].detail.contains("invalid namespace"));
    }
}
