//! Custom error types for the cart core

use thiserror::Error;

/// Main error type for the cart core
#[derive(Error, Debug)]
pub enum Error {
    /// Serialization or deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data or parameter
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Operation not permitted in current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Storage key cannot be used as a slot name
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Storage backend refused the write because its quota is exhausted
    #[error("Storage full: {needed} bytes needed, {quota} bytes allowed")]
    StorageFull { needed: usize, quota: usize },

    /// Storage backend is unavailable
    #[error("Storage error: {0}")]
    Storage(String),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::StorageFull {
            needed: 120,
            quota: 64,
        };
        assert_eq!(
            err.to_string(),
            "Storage full: 120 bytes needed, 64 bytes allowed"
        );

        let err: Error = "boom".into();
        assert!(matches!(err, Error::Other(ref s) if s == "boom"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
