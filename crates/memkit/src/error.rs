//! Standalone error types for memkit
//!
//! Uses thiserror for clean, idiomatic Rust error definitions.
//!
//! Only resource exhaustion and I/O are reported through these types.
//! Precondition violations (out-of-bounds indices, erase ranges past the end)
//! are programming errors and panic instead.

use std::path::Path;

use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::{error, warn};

// ============================================================================
// Main Error Types
// ============================================================================

/// Memory management errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum MemoryError {
    // --- Allocation Errors ---
    #[error("Memory allocation failed: {size} bytes")]
    AllocationFailed { size: usize },

    #[error("Size overflow during operation: {operation}")]
    SizeOverflow { operation: String },

    // --- Arena Errors ---
    #[error("Arena '{arena_id}' exhausted: requested {requested} words, available {available}")]
    ArenaExhausted {
        arena_id: &'static str,
        requested: usize,
        available: usize,
    },

    // --- Configuration Errors ---
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // --- State Errors ---
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    // --- I/O Errors ---
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File '{path}' is not valid UTF-8")]
    InvalidUtf8 { path: String },
}

impl MemoryError {
    /// Check if error is retryable
    ///
    /// Exhaustion of a bounded arena can clear after a reset; everything else
    /// is permanent for the given input.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ArenaExhausted { .. })
    }

    /// Check if error reports running out of memory
    #[must_use]
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            Self::AllocationFailed { .. } | Self::ArenaExhausted { .. }
        )
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AllocationFailed { .. } => "MEM:ALLOC:FAILED",
            Self::SizeOverflow { .. } => "MEM:ALLOC:OVERFLOW",
            Self::ArenaExhausted { .. } => "MEM:ARENA:EXHAUSTED",
            Self::InvalidConfig { .. } => "MEM:CONFIG:INVALID",
            Self::InvalidState { .. } => "MEM:SYSTEM:STATE",
            Self::Io { .. } => "MEM:IO:READ",
            Self::InvalidUtf8 { .. } => "MEM:IO:UTF8",
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create allocation failed error
    pub fn allocation_failed(size: usize) -> Self {
        #[cfg(feature = "logging")]
        error!(size, "memory allocation failed");

        Self::AllocationFailed { size }
    }

    /// Create size overflow error
    pub fn size_overflow(operation: &str) -> Self {
        Self::SizeOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create arena exhausted error
    pub fn arena_exhausted(arena_id: &'static str, requested: usize, available: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(arena_id, requested, available, "arena exhausted");

        Self::ArenaExhausted {
            arena_id,
            requested,
            available,
        }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }

    /// Create invalid state error
    pub fn invalid_state(reason: &str) -> Self {
        Self::InvalidState {
            reason: reason.to_string(),
        }
    }

    /// Create I/O error for the given path
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create invalid UTF-8 error for the given path
    pub fn invalid_utf8(path: &Path) -> Self {
        Self::InvalidUtf8 {
            path: path.display().to_string(),
        }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for memory operations
pub type MemoryResult<T> = core::result::Result<T, MemoryError>;

/// Generic result type alias
pub type Result<T> = MemoryResult<T>;

/// Type aliases used by the allocator module
pub type AllocError = MemoryError;
pub type AllocResult<T> = MemoryResult<T>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_error_creation() {
        let error = MemoryError::allocation_failed(1024);
        assert!(error.to_string().contains("1024"));
    }

    #[test]
    fn test_arena_errors() {
        let error = MemoryError::arena_exhausted("fixed", 64, 8);
        assert!(error.to_string().contains("fixed"));
        assert!(error.to_string().contains("64"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(MemoryError::allocation_failed(8).code(), "MEM:ALLOC:FAILED");
        assert_eq!(
            MemoryError::arena_exhausted("scratch", 1, 0).code(),
            "MEM:ARENA:EXHAUSTED"
        );
        assert_eq!(MemoryError::invalid_config("x").code(), "MEM:CONFIG:INVALID");
    }

    #[test]
    fn test_retryable() {
        assert!(MemoryError::arena_exhausted("fixed", 16, 0).is_retryable());
        assert!(!MemoryError::size_overflow("vector growth").is_retryable());
    }

    #[test]
    fn test_exhaustion() {
        assert!(MemoryError::allocation_failed(1).is_exhaustion());
        assert!(MemoryError::arena_exhausted("fixed", 1, 0).is_exhaustion());
        assert!(!MemoryError::invalid_state("failed vector").is_exhaustion());
    }

    #[test]
    fn test_io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = MemoryError::io(Path::new("/tmp/nope.txt"), source);
        assert!(error.to_string().contains("/tmp/nope.txt"));
        assert_eq!(error.code(), "MEM:IO:READ");
    }
}
