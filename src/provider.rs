//! Cryptosystem provider contract.
//!
//! The [`Cryptosystem`] trait is the seam between the algebra engines and a
//! concrete partially homomorphic, threshold-decryptable scheme. The
//! homomorphic space adapter consumes only `homomorphic_add` and
//! `homomorphic_scale`; `encrypt` (and the key-generation / partial-decryption
//! / share-combination methods on the concrete scheme's key types) are invoked
//! by surrounding application code to prepare encrypted inputs and recover
//! plaintext results. See [`crate::paillier`] for the bundled implementation.

use std::fmt;

use num_bigint::BigInt;

/// Failure raised by a cryptosystem provider.
///
/// Providers report failures (malformed ciphertexts, invalid parameters) as
/// plain messages; the homomorphic space wraps them unchanged into
/// [`AlgebraError::Provider`](crate::error::AlgebraError::Provider).
#[derive(Debug, Clone)]
pub struct ProviderError(pub String);

impl ProviderError {
    /// Create a new provider error with the given message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ProviderError {}

/// Partially homomorphic cryptosystem handle bound to a public key.
///
/// Plaintexts and ciphertexts are both represented as big integers; only the
/// provider may interpret ciphertext internals. Implementations must be
/// stateless per call so a single handle can be shared across concurrently
/// executing operations.
pub trait Cryptosystem: Send + Sync {
    /// Encrypt a plaintext under the bound public key.
    fn encrypt(&self, plaintext: &BigInt) -> Result<BigInt, ProviderError>;

    /// Homomorphically add two ciphertexts.
    fn homomorphic_add(&self, a: &BigInt, b: &BigInt) -> Result<BigInt, ProviderError>;

    /// Homomorphically multiply a ciphertext by a plaintext factor.
    fn homomorphic_scale(&self, ciphertext: &BigInt, factor: &BigInt)
        -> Result<BigInt, ProviderError>;
}
