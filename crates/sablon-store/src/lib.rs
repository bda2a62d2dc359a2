//! Generic document storage for the Sablon record service.
//!
//! The store addresses documents by a two-level [`Namespace`]
//! (database, collection) and knows nothing about the Sablon schema. Every
//! stored document carries its [`RecordId`](sablon_types::RecordId) as a hex
//! string under the reserved `_id` key.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- `HashMap`-based store for tests and embedding
//! - [`JsonFileDocumentStore`] -- one JSON file per namespace on local disk
//!
//! # Design Rules
//!
//! 1. Queries are exact-match on top-level keys; no operators.
//! 2. Updates merge top-level keys and never create documents.
//! 3. Delete-by-query removes the first match in insertion order only.
//! 4. Sequences are snapshots: each call returns a fresh [`Cursor`].
//! 5. The store never validates document contents.

pub mod check;
pub mod collection;
pub mod error;
pub mod file;
pub mod memory;
pub mod namespace;
pub mod traits;

pub use check::{self_check, CheckStep, SelfCheckReport, StepOutcome};
pub use error::{StoreError, StoreResult};
pub use file::JsonFileDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use namespace::Namespace;
pub use traits::{Cursor, DocumentStore};
