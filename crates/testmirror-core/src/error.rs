//! Error types for the mirror-test engine.
//!
//! This module provides a unified error type (`MirrorError`) that bridges
//! domain-specific errors from the codec and merge subsystems into a common
//! format for callers.
//!
//! ## Design
//!
//! - **Unified type**: `MirrorError` is the single error type surfaced by
//!   the orchestrator
//! - **Bridging**: `impl From<X> for MirrorError` bridges domain errors
//! - **Nothing swallowed**: every error is raised synchronously from the
//!   operation that detects it; the only designed fallback is
//!   "test module not yet existing", which is a create-empty path, not an
//!   error

use std::io;

use thiserror::Error;

// ============================================================================
// Domain Error: Naming
// ============================================================================

/// A source object's identity cannot be converted to a test identity.
///
/// Raised by the convention codec when a name is empty, not a valid Python
/// identifier, or otherwise has no derivable test counterpart. The codec
/// never silently falls back to a placeholder name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot derive a test identity for '{name}': {reason}")]
pub struct NamingError {
    /// The offending name or import path.
    pub name: String,
    /// Why no test identity could be derived.
    pub reason: String,
}

impl NamingError {
    /// Create a naming error.
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        NamingError {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, NamingError>;

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for mirror-test operations.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// A source object has no derivable test identity.
    /// Aborts processing of that object only.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// More than one literal occurrence of a class skeleton was found
    /// during merge. The merger cannot know which occurrence to splice
    /// into, so it fails loudly rather than guessing.
    #[error("class skeleton for '{class_name}' occurs {occurrences} times in the test module")]
    StructuralAmbiguity {
        class_name: String,
        occurrences: usize,
    },

    /// Parent-directory creation or file read/write failure.
    /// Propagated to the caller; not retried automatically.
    #[error("filesystem error: {0}")]
    Filesystem(#[from] io::Error),
}

impl MirrorError {
    /// Create a structural ambiguity error.
    pub fn ambiguous_skeleton(class_name: impl Into<String>, occurrences: usize) -> Self {
        MirrorError::StructuralAmbiguity {
            class_name: class_name.into(),
            occurrences,
        }
    }
}

/// Result type for mirror-test operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod display {
        use super::*;

        #[test]
        fn naming_error_display() {
            let err = NamingError::new("<lambda>", "not a valid Python identifier");
            assert_eq!(
                err.to_string(),
                "cannot derive a test identity for '<lambda>': not a valid Python identifier"
            );
        }

        #[test]
        fn naming_error_passes_through_unified_type() {
            let err = MirrorError::from(NamingError::new("x-y", "invalid character '-'"));
            assert_eq!(
                err.to_string(),
                "cannot derive a test identity for 'x-y': invalid character '-'"
            );
        }

        #[test]
        fn structural_ambiguity_display() {
            let err = MirrorError::ambiguous_skeleton("TestFoo", 2);
            assert_eq!(
                err.to_string(),
                "class skeleton for 'TestFoo' occurs 2 times in the test module"
            );
        }

        #[test]
        fn filesystem_error_wraps_io() {
            let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
            let err = MirrorError::from(io_err);
            assert!(err.to_string().starts_with("filesystem error:"));
        }
    }
}
