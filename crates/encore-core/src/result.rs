//! Result type aliases for Encore.

use crate::EncoreError;

/// A specialized `Result` type for Encore operations.
pub type EncoreResult<T> = Result<T, EncoreError>;
