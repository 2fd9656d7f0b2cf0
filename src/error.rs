//! Error handling for the algebra engines.
//!
//! Provides a single `AlgebraError` taxonomy shared by all spaces and engines.
//! Every composite operation fails fast: the first element-level error is
//! returned verbatim and any partially computed result is discarded. No
//! operation in this crate panics on caller errors.

use std::fmt;

use crate::provider::ProviderError;

/// Failure of a space or engine operation.
///
/// The variants mirror the distinct ways an operation can be rejected, so
/// callers can match on the kind rather than parse a message:
///
/// - [`DimensionMismatch`](AlgebraError::DimensionMismatch): incompatible
///   shapes for construction, addition, subtraction, multiplication or
///   concatenation
/// - [`IndexOutOfBounds`](AlgebraError::IndexOutOfBounds): `at`/`set`/crop
///   outside the valid range
/// - [`TypeMismatch`](AlgebraError::TypeMismatch): an element is not a member
///   of the stated space
/// - [`UnsupportedOperation`](AlgebraError::UnsupportedOperation): the bound
///   algebra cannot perform the requested primitive, notably
///   ciphertext-by-ciphertext multiplication in a partially homomorphic space
/// - [`Provider`](AlgebraError::Provider): a cryptosystem provider failure,
///   wrapped and passed through unchanged
#[derive(Debug)]
pub enum AlgebraError {
    /// Incompatible shapes for the requested operation.
    DimensionMismatch(String),
    /// Row, column or coefficient index outside the valid range.
    IndexOutOfBounds(String),
    /// Element is not a member of the stated space.
    TypeMismatch(String),
    /// The bound algebra cannot perform the requested primitive.
    UnsupportedOperation(String),
    /// Failure surfaced from the cryptosystem provider.
    Provider(ProviderError),
}

impl fmt::Display for AlgebraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgebraError::DimensionMismatch(msg) => write!(f, "dimension mismatch: {}", msg),
            AlgebraError::IndexOutOfBounds(msg) => write!(f, "index out of bounds: {}", msg),
            AlgebraError::TypeMismatch(msg) => write!(f, "type mismatch: {}", msg),
            AlgebraError::UnsupportedOperation(msg) => write!(f, "unsupported operation: {}", msg),
            AlgebraError::Provider(err) => write!(f, "provider error: {}", err),
        }
    }
}

impl std::error::Error for AlgebraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AlgebraError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProviderError> for AlgebraError {
    fn from(err: ProviderError) -> Self {
        AlgebraError::Provider(err)
    }
}

/// Result type for all space and engine operations.
pub type Result<T> = std::result::Result<T, AlgebraError>;
