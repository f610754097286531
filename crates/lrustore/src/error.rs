//! Error types for lrustore

/// Result type alias for lrustore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store construction
///
/// Lookups never fail: a missing key is reported as `None`, not as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A store must be able to hold at least one entry
    #[error("capacity must be greater than 0")]
    ZeroCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::ZeroCapacity.to_string(),
            "capacity must be greater than 0"
        );
    }
}
