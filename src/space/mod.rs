//! Algebraic space contract and the opaque element model.
//!
//! A [`Space`] describes the operations available over a family of element
//! values: plaintext big integers, or ciphertexts under a partially
//! homomorphic scheme. Matrices and polynomials treat elements as black boxes
//! and combine them exclusively through the space they are bound to, so the
//! same algorithms run unchanged over plaintext, encrypted, or mixed operands.
//!
//! The capability set is deliberately asymmetric: every space supports
//! addition, but only a *scalar* space (one whose elements are valid
//! multipliers for other spaces, see [`Space::is_scalar`]) supports a direct
//! element-by-element product. A partially homomorphic space instead exposes
//! [`Space::scale`], ciphertext-by-plaintext multiplication, and rejects
//! [`Space::multiply`] outright.
//!
//! # Example
//!
//! ```
//! use genmatrix::space::{Element, Integers, Space};
//!
//! let ints = Integers;
//! let sum = ints.add(&Element::from_i64(2), &Element::from_i64(3)).unwrap();
//! assert_eq!(sum, Element::from_i64(5));
//! assert!(ints.is_scalar());
//! ```

use std::sync::Arc;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::error::{AlgebraError, Result};

pub mod encrypted;
pub mod integers;

pub use encrypted::Encrypted;
pub use integers::Integers;

/// Opaque element value held by a matrix or polynomial.
///
/// The closed variant carries exactly the tag needed to route an element to
/// the right space primitive without unchecked casts: a plaintext
/// arbitrary-precision integer, or a ciphertext whose internals only the
/// bound space's provider may interpret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    /// Plaintext arbitrary-precision integer.
    Int(BigInt),
    /// Ciphertext under the bound space's cryptosystem.
    Cipher(BigInt),
}

impl Element {
    /// Create a plaintext integer element.
    pub fn from_i64(value: i64) -> Self {
        Element::Int(BigInt::from(value))
    }

    /// View as a plaintext integer, or fail with `TypeMismatch`.
    pub fn as_int(&self) -> Result<&BigInt> {
        match self {
            Element::Int(v) => Ok(v),
            Element::Cipher(_) => Err(AlgebraError::TypeMismatch(
                "expected a plaintext integer element, got a ciphertext".into(),
            )),
        }
    }

    /// View as a ciphertext, or fail with `TypeMismatch`.
    pub fn as_cipher(&self) -> Result<&BigInt> {
        match self {
            Element::Cipher(v) => Ok(v),
            Element::Int(_) => Err(AlgebraError::TypeMismatch(
                "expected a ciphertext element, got a plaintext integer".into(),
            )),
        }
    }
}

/// Capability contract for algebraic operations over opaque elements.
///
/// Implementations hold no per-call mutable state, so one instance can be
/// shared by reference among many matrices and polynomials and across
/// threads.
pub trait Space: Send + Sync {
    /// Add two elements of this space.
    fn add(&self, x: &Element, y: &Element) -> Result<Element>;

    /// Subtract `y` from `x`. Spaces without a native subtraction derive it
    /// as `add(x, negate(y))`.
    fn subtract(&self, x: &Element, y: &Element) -> Result<Element>;

    /// Additive inverse of `x`.
    fn negate(&self, x: &Element) -> Result<Element>;

    /// Direct element-by-element product. Fails with `UnsupportedOperation`
    /// when this space's algebra has no such product (the deliberate
    /// restriction of partially homomorphic spaces).
    fn multiply(&self, x: &Element, y: &Element) -> Result<Element>;

    /// Multiply an element of this space by a factor drawn from a companion
    /// scalar space.
    fn scale(&self, spaced: &Element, factor: &Element) -> Result<Element>;

    /// True iff elements of this space are valid scalar multipliers for any
    /// other space's `scale`.
    fn is_scalar(&self) -> bool;

    /// Zero placeholder used to fill default-constructed containers.
    fn zero(&self) -> Element;
}

/// Shared reference to a space.
///
/// Spaces are never owned by a single matrix or polynomial; every container
/// bound to the same space holds the same `Arc`.
pub type SpaceRef = Arc<dyn Space>;
