use sablon_types::TypeError;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The identifier could not be parsed into a [`RecordId`](sablon_types::RecordId).
    #[error("invalid record id: {0}")]
    InvalidId(#[from] TypeError),

    /// The database or collection name is not addressable.
    #[error("invalid namespace {namespace}: {reason}")]
    InvalidNamespace { namespace: String, reason: String },

    /// The partial document cannot be applied as an update.
    #[error("invalid update: {0}")]
    InvalidUpdate(String),

    /// Stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend cannot serve requests (e.g. a poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the failure stems from the arguments rather than the backend.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_) | Self::InvalidNamespace { .. } | Self::InvalidUpdate(_)
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
