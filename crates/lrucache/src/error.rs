//! Error types for lrucache

use std::fmt;

/// Result type alias for lrucache configuration
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache setup
///
/// Cache operations themselves never fail; a missing key is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity setting is not an integer
    InvalidCapacity(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(raw) => write!(f, "Invalid cache capacity: {:?}", raw),
        }
    }
}

impl std::error::Error for Error {}
