//! Error handling for the memband library
//!
//! Every public operation validates its ranges before any work is scheduled,
//! so an error always means that no destination memory was touched.

use thiserror::Error;

/// Main error type for the memband library
#[derive(Error, Debug)]
pub enum MembandError {
    /// Requested range exceeds the backing storage
    #[error("Out of range: start {start}, length {length}, capacity {capacity}")]
    OutOfRange {
        /// First index of the requested range
        start: usize,
        /// Number of elements requested
        length: usize,
        /// Number of elements actually available
        capacity: usize,
    },

    /// Memory allocation failures while materializing a destination
    #[error("Memory allocation failed: requested {size} bytes")]
    OutOfMemory {
        /// Number of bytes requested
        size: usize,
    },

    /// Invalid argument shape, such as mismatched slice lengths
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message describing the issue
        message: String,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },

}

impl MembandError {
    /// Create an out of range error
    pub fn out_of_range(start: usize, length: usize, capacity: usize) -> Self {
        Self::OutOfRange {
            start,
            length,
            capacity,
        }
    }

    /// Create an out of memory error
    pub fn out_of_memory(size: usize) -> Self {
        Self::OutOfMemory { size }
    }

    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData {
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
            Self::OutOfMemory { .. } => true,
            Self::OutOfRange { .. } => false,
            Self::InvalidData { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "range",
            Self::OutOfMemory { .. } => "memory",
            Self::InvalidData { .. } => "data",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MembandError>;

/// Check that `[start, start + length)` lies within `capacity` elements.
///
/// Overflow of `start + length` is reported as out of range.
#[inline]
pub fn check_range(start: usize, length: usize, capacity: usize) -> Result<()> {
    match start.checked_add(length) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(MembandError::out_of_range(start, length, capacity)),
    }
}
