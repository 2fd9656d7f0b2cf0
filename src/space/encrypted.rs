//! Homomorphic space adapter over a partially homomorphic cryptosystem.
//!
//! Binds a provider handle (a public key, opaque to the engines) to the
//! [`Space`] contract. Ciphertext addition and ciphertext-by-plaintext
//! scaling delegate to the provider; subtraction and negation are derived
//! from scaling by minus one. A direct ciphertext-by-ciphertext product is
//! outside a partially homomorphic scheme's capability by construction, so
//! `multiply` always fails with `UnsupportedOperation` rather than computing
//! something wrong.

use std::sync::Arc;

use num_bigint::BigInt;

use super::{Element, Space};
use crate::error::{AlgebraError, Result};
use crate::provider::Cryptosystem;

/// Space of ciphertexts under one partially homomorphic public key.
#[derive(Clone)]
pub struct Encrypted {
    provider: Arc<dyn Cryptosystem>,
}

impl Encrypted {
    /// Bind a provider handle to the space contract.
    pub fn new(provider: Arc<dyn Cryptosystem>) -> Self {
        Self { provider }
    }

    /// The bound provider handle.
    pub fn provider(&self) -> &Arc<dyn Cryptosystem> {
        &self.provider
    }
}

impl Space for Encrypted {
    fn add(&self, x: &Element, y: &Element) -> Result<Element> {
        let sum = self.provider.homomorphic_add(x.as_cipher()?, y.as_cipher()?)?;
        Ok(Element::Cipher(sum))
    }

    fn subtract(&self, x: &Element, y: &Element) -> Result<Element> {
        let neg_y = self.negate(y)?;
        self.add(x, &neg_y)
    }

    fn negate(&self, x: &Element) -> Result<Element> {
        self.scale(x, &Element::Int(BigInt::from(-1)))
    }

    fn multiply(&self, _x: &Element, _y: &Element) -> Result<Element> {
        Err(AlgebraError::UnsupportedOperation(
            "ciphertext-by-ciphertext multiplication is not available in a partially \
             homomorphic space"
                .into(),
        ))
    }

    fn scale(&self, spaced: &Element, factor: &Element) -> Result<Element> {
        let product = self
            .provider
            .homomorphic_scale(spaced.as_cipher()?, factor.as_int()?)?;
        Ok(Element::Cipher(product))
    }

    fn is_scalar(&self) -> bool {
        false
    }

    fn zero(&self) -> Element {
        // The trivial encryption of zero (unit randomness) in any
        // Paillier-form scheme.
        Element::Cipher(BigInt::from(1))
    }
}
