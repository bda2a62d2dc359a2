//! Record service for Sablon documents.
//!
//! Wraps a [`DocumentStore`](sablon_store::DocumentStore) with the Sablon
//! schema: payloads are validated before storage is touched, and stored
//! documents are coerced back into [`SablonRecord`](sablon_types::SablonRecord)
//! with the storage identifier stripped. Reads are all-or-nothing: one
//! document that fails coercion fails the whole call.
//!
//! Every operation returns a [`ServiceResult`]; translating failures into
//! transport-level responses is left to the caller.

pub mod error;
pub mod outcome;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use outcome::{DeleteSummary, Inserted, UpdateSummary};
pub use service::RecordService;
