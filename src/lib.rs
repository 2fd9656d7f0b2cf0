//! Generic matrix and polynomial algebra over plaintext big integers and
//! partially homomorphic ciphertexts.
//!
//! The same engines run over either kind of operand, or a mix, by dispatching
//! every element-level step through an algebraic [`Space`]:
//!
//! - [`Integers`]: the reference scalar space over arbitrary-precision
//!   integers
//! - [`Encrypted`]: ciphertexts under a partially homomorphic, threshold
//!   decryptable public key, where ciphertext+ciphertext addition and
//!   ciphertext-by-plaintext scaling are legal but a direct
//!   ciphertext-by-ciphertext product is rejected with
//!   [`AlgebraError::UnsupportedOperation`]
//!
//! [`Matrix`] and [`Polynomial`] pick the right primitive per operand pair,
//! so a plaintext-by-encrypted matrix product decrypts to the plaintext-only
//! result, while an encrypted-by-encrypted product fails predictably instead
//! of computing nonsense.
//!
//! Key generation, encryption and threshold decryption live behind the
//! [`Cryptosystem`] provider contract; [`paillier`] ships a threshold
//! Paillier implementation of it.
//!
//! # Example
//!
//! ```
//! use genmatrix::{Element, Matrix};
//!
//! let a = Matrix::from_i64(2, 3, &[3, 4, 2, 1, 8, 5]).unwrap();
//! let b = Matrix::from_i64(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
//!
//! let sum = a.add(&b).unwrap();
//! assert_eq!(sum.at(1, 1).unwrap(), &Element::from_i64(13));
//! ```

pub mod error;
pub mod matrix;
pub mod paillier;
pub mod polynomial;
pub mod provider;
pub mod space;

pub use error::{AlgebraError, Result};
pub use matrix::Matrix;
pub use polynomial::Polynomial;
pub use provider::{Cryptosystem, ProviderError};
pub use space::{Element, Encrypted, Integers, Space, SpaceRef};
