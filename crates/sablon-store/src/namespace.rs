use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default database name.
pub const DEFAULT_DATABASE: &str = "sablon_db";
/// Default collection name.
pub const DEFAULT_COLLECTION: &str = "sablon_collection";

/// A (database, collection) pair addressing one logical document set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace {
    pub database: String,
    pub collection: String,
}

impl Namespace {
    /// Create a namespace, rejecting names that cannot be addressed.
    ///
    /// Both parts must be non-empty and free of path separators, `.` and NUL,
    /// since the file backend maps them onto directory and file names.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> StoreResult<Self> {
        let ns = Self {
            database: database.into(),
            collection: collection.into(),
        };
        ns.validate()?;
        Ok(ns)
    }

    pub fn validate(&self) -> StoreResult<()> {
        for (part, value) in [("database", &self.database), ("collection", &self.collection)] {
            if value.is_empty() {
                return Err(self.invalid(format!("{part} name is empty")));
            }
            if let Some(c) = value.chars().find(|c| matches!(c, '/' | '\\' | '.' | '\0')) {
                return Err(self.invalid(format!("{part} name contains {c:?}")));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> StoreError {
        StoreError::InvalidNamespace {
            namespace: self.to_string(),
            reason,
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.into(),
            collection: DEFAULT_COLLECTION.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}
