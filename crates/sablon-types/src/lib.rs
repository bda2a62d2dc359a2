//! Foundation types for the Sablon record service.
//!
//! Every other Sablon crate depends on `sablon-types`.
//!
//! # Key Types
//!
//! - [`RecordId`] -- 12-byte storage identifier rendered as 24 hex characters
//! - [`SablonRecord`] -- the validated entity: a name plus optional age and gender
//! - [`Document`] -- untyped JSON object as held by a document store

pub mod error;
pub mod record;
pub mod record_id;

pub use error::TypeError;
pub use record::{Document, SablonRecord, ID_FIELD};
pub use record_id::RecordId;
