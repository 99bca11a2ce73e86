//! Error handling for the edit-trie library
//!
//! Every fatal condition in the crate (capacity overflow, duplicate hash-table
//! keys, broken trie invariants, out-of-range indexing) is reported through
//! [`EditTrieError`]. Nothing in the library retries; an error means either a
//! caller contract violation or corrupt build state.

use thiserror::Error;

/// Main error type for the edit-trie library
#[derive(Error, Debug)]
pub enum EditTrieError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input data
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message describing the issue
        message: String,
    },

    /// Index or length out of the supported range
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// Hash table capacity that cannot be represented as a bucket mask
    #[error("Capacity overflow: requested capacity {requested}")]
    CapacityOverflow {
        /// The suggested capacity passed by the caller
        requested: usize,
    },

    /// Key inserted twice into a table that forbids it
    #[error("Duplicate key: {key}")]
    DuplicateKey {
        /// Debug rendering of the offending key
        key: String,
    },

    /// Trie invariant breach or call made in the wrong build state
    #[error("Trie error: {message}")]
    Trie {
        /// Error message describing the trie issue
        message: String,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl EditTrieError {
    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create a capacity overflow error
    pub fn capacity_overflow(requested: usize) -> Self {
        Self::CapacityOverflow { requested }
    }

    /// Create a duplicate key error
    pub fn duplicate_key<K: std::fmt::Debug>(key: K) -> Self {
        Self::DuplicateKey {
            key: format!("{:?}", key),
        }
    }

    /// Create a trie error
    pub fn trie<S: Into<String>>(message: S) -> Self {
        Self::Trie {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Configuration { .. } => true,
            Self::InvalidData { .. } => false,
            Self::OutOfBounds { .. } => false,
            Self::CapacityOverflow { .. } => false,
            Self::DuplicateKey { .. } => false,
            Self::Trie { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidData { .. } => "data",
            Self::OutOfBounds { .. } => "bounds",
            Self::CapacityOverflow { .. } => "capacity",
            Self::DuplicateKey { .. } => "duplicate",
            Self::Trie { .. } => "trie",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, EditTrieError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    if index >= size {
        Err(EditTrieError::out_of_bounds(index, size))
    } else {
        Ok(())
    }
}

/// Assert that a range is within bounds
#[inline]
pub fn check_range(start: usize, end: usize, size: usize) -> Result<()> {
    if start > end {
        return Err(EditTrieError::invalid_data(format!(
            "Invalid range: start {} > end {}",
            start, end
        )));
    }
    if end > size {
        return Err(EditTrieError::out_of_bounds(end, size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = EditTrieError::invalid_data("test message");
        assert_eq!(err.category(), "data");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_bounds_checking() {
        assert!(check_bounds(5, 10).is_ok());
        assert!(check_bounds(10, 10).is_err());
        assert!(check_bounds(15, 10).is_err());
    }

    #[test]
    fn test_range_checking() {
        assert!(check_range(2, 8, 10).is_ok());
        assert!(check_range(0, 10, 10).is_ok());
        assert!(check_range(8, 2, 10).is_err()); // start > end
        assert!(check_range(2, 15, 10).is_err()); // end > size
    }

    #[test]
    fn test_error_categories() {
        let io_err = EditTrieError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "test"));
        assert_eq!(io_err.category(), "io");
        assert!(io_err.is_recoverable());

        let dup = EditTrieError::duplicate_key((3u32, 97u32));
        assert_eq!(dup.category(), "duplicate");
        assert_eq!(dup.to_string(), "Duplicate key: (3, 97)");

        let cap = EditTrieError::capacity_overflow(usize::MAX);
        assert_eq!(cap.category(), "capacity");
        assert!(!cap.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = EditTrieError::out_of_bounds(130, 128);
        assert_eq!(err.to_string(), "Out of bounds: index 130, size 128");

        let err = EditTrieError::trie("Output size exceeded 1");
        assert_eq!(err.to_string(), "Trie error: Output size exceeded 1");
    }
}
