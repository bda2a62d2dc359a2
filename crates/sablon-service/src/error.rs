use sablon_store::StoreError;
use sablon_types::TypeError;

/// Errors from record service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The payload does not satisfy the Sablon schema. Storage was not touched.
    #[error("validation error: {0}")]
    Validation(String),

    /// No document has the requested identifier.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A stored document cannot be parsed back into a Sablon record.
    #[error("stored record {id} is malformed: {reason}")]
    Coercion { id: String, reason: String },

    /// Failure reported by the storage adapter.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<TypeError> for ServiceError {
    fn from(e: TypeError) -> Self {
        match e {
            TypeError::InvalidRecord(reason) => Self::Validation(reason),
            other => Self::Storage(StoreError::InvalidId(other)),
        }
    }
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
