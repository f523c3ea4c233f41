//! Error types for key cache bindings
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Key Cache Error Enum ==
/// Unified error type for bindings, the decoder and store backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyCacheError {
    /// A binding was declared without one of its required fields
    #[error("Configuration incomplete: {0}")]
    ConfigurationIncomplete(String),

    /// A template segment or resolver names an accessor the record lacks
    #[error("Resolver not found: {0}")]
    ResolverNotFound(String),

    /// The store cannot be reached
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store rejected an operation
    #[error("Store operation failed: {0}")]
    StoreOperationFailed(String),
}

impl KeyCacheError {
    /// Returns true for errors raised by the store rather than by the binding.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            KeyCacheError::StoreUnavailable(_) | KeyCacheError::StoreOperationFailed(_)
        )
    }
}

// == Result Type Alias ==
/// Convenience Result type for key cache operations.
pub type Result<T> = std::result::Result<T, KeyCacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = KeyCacheError::ResolverNotFound(":account_id".to_string());
        assert_eq!(err.to_string(), "Resolver not found: :account_id");

        let err = KeyCacheError::ConfigurationIncomplete("missing key".to_string());
        assert_eq!(err.to_string(), "Configuration incomplete: missing key");
    }

    #[test]
    fn test_is_store_error() {
        assert!(KeyCacheError::StoreUnavailable("down".into()).is_store_error());
        assert!(KeyCacheError::StoreOperationFailed("full".into()).is_store_error());
        assert!(!KeyCacheError::ResolverNotFound("id".into()).is_store_error());
        assert!(!KeyCacheError::ConfigurationIncomplete("key".into()).is_store_error());
    }
}
