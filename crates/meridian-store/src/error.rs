//! Storage error taxonomy.

use meridian_core::CoreError;
use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the persistence layer and the flows built on it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lookup by id found nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Underlying filesystem failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An import payload was rejected before any write.
    #[error("import rejected: {0}")]
    ImportRejected(String),

    /// A business rule failed during a store-level flow.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Shorthand for a typed not-found error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = StoreError::not_found("customer", "c42");
        assert_eq!(err.to_string(), "customer not found: c42");
    }

    #[test]
    fn core_error_passes_through() {
        let err: StoreError = CoreError::EmptyInvoice.into();
        assert_eq!(err.to_string(), "cannot generate an invoice with no items");
    }
}
