//! Error types for recencylist

use std::fmt;

/// Result type alias for handle-based list operations
pub type Result<T> = std::result::Result<T, Error>;

/// Usage errors raised by handle-based list operations
///
/// Every variant means the caller passed a handle the list does not own.
/// The list is never modified when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Handle was never issued by any list
    Detached,

    /// Operation needs at least one node
    Empty,

    /// Handle was issued by another list, or before this list was cleared
    Foreign,

    /// Handle points at a slot whose node has already been removed
    Stale,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Detached => write!(f, "Handle is detached (never inserted)"),
            Error::Empty => write!(f, "List is empty"),
            Error::Foreign => write!(f, "Handle belongs to a different list"),
            Error::Stale => write!(f, "Handle refers to a removed item"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::Empty.to_string(), "List is empty");
        assert_eq!(
            Error::Foreign.to_string(),
            "Handle belongs to a different list"
        );
    }
}
