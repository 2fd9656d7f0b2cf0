//! Threshold Paillier cryptosystem (Damgård–Jurik with s = 1).
//!
//! The bundled [`Cryptosystem`] provider: additively homomorphic encryption
//! over Z_n with threshold decryption. The decryption exponent is split
//! additively across all key shares, so every share must contribute a partial
//! decryption before [`PublicKey::combine_shares`] can recover the plaintext.
//!
//! Ciphertext-domain identities, for n² the public modulus:
//!
//! ```text
//! Enc(a) * Enc(b) mod n^2   = Enc(a + b)
//! Enc(a)^k mod n^2          = Enc(k * a)
//! ```
//!
//! This module exists to realize the provider contract end to end (key
//! generation through share combination); it makes no constant-time or
//! side-channel claims.
//!
//! # Example
//!
//! ```
//! use genmatrix::paillier::{generate_keys, KeyParams};
//! use genmatrix::Cryptosystem;
//! use num_bigint::BigInt;
//!
//! let params = KeyParams { prime_bits: 128, shares: 3 };
//! let (pk, shares) = generate_keys(&params, &mut rand::thread_rng()).unwrap();
//!
//! let ct = pk.encrypt(&BigInt::from(41)).unwrap();
//! let ct = pk.homomorphic_add(&ct, &pk.encrypt(&BigInt::from(1)).unwrap()).unwrap();
//!
//! let partial: Vec<_> = shares.iter().map(|s| s.partial_decrypt(&ct).unwrap()).collect();
//! assert_eq!(pk.combine_shares(&partial).unwrap(), BigInt::from(42));
//! ```

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::provider::{Cryptosystem, ProviderError};

/// Security parameters for key generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyParams {
    /// Bit length of each of the two primes; the modulus n is twice as long.
    pub prime_bits: u64,
    /// Number of key shares; all of them are required to decrypt.
    pub shares: usize,
}

impl Default for KeyParams {
    fn default() -> Self {
        Self {
            prime_bits: 512,
            shares: 3,
        }
    }
}

/// Paillier public key; doubles as the [`Cryptosystem`] provider handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    n: BigUint,
    n_squared: BigUint,
    g: BigUint,
    shares: usize,
}

/// One additive share of the decryption exponent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyShare {
    index: usize,
    exponent: BigUint,
    n_squared: BigUint,
}

/// A single share-holder's contribution to a decryption.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecryptionShare {
    index: usize,
    value: BigUint,
}

/// Generate a public key and the full set of decryption key shares.
///
/// Picks two random `prime_bits`-bit primes p, q and sets n = pq, g = n + 1.
/// The decryption exponent d satisfies d ≡ 0 (mod λ(n)) and d ≡ 1 (mod n),
/// so c^d = 1 + mn (mod n²); it is shared additively modulo nλ among
/// `params.shares` holders.
pub fn generate_keys<R: Rng + ?Sized>(
    params: &KeyParams,
    rng: &mut R,
) -> Result<(PublicKey, Vec<KeyShare>), ProviderError> {
    if params.shares == 0 {
        return Err(ProviderError::new(
            "key must be split into at least one share",
        ));
    }
    if params.prime_bits < 16 {
        return Err(ProviderError::new(format!(
            "prime size of {} bits is too small to form a Paillier modulus",
            params.prime_bits
        )));
    }

    let p = generate_prime(params.prime_bits, rng);
    let q = loop {
        let q = generate_prime(params.prime_bits, rng);
        if q != p {
            break q;
        }
    };

    let n = &p * &q;
    let n_squared = &n * &n;
    let g = &n + 1u32;
    let lambda = (&p - 1u32).lcm(&(&q - 1u32));

    // CRT: d = λ * (λ^{-1} mod n) is 0 mod λ and 1 mod n.
    let lambda_inv = mod_inverse(&lambda, &n)
        .ok_or_else(|| ProviderError::new("carmichael value is not invertible modulo n"))?;
    let d = &lambda * &lambda_inv;

    // Exponents of Z*_{n^2} live modulo nλ, so the additive sharing does too.
    let exponent_modulus = &n * &lambda;
    let mut shares = Vec::with_capacity(params.shares);
    let mut allocated = BigUint::zero();
    for index in 0..params.shares - 1 {
        let exponent = rng.gen_biguint_below(&exponent_modulus);
        allocated = (&allocated + &exponent) % &exponent_modulus;
        shares.push(KeyShare {
            index,
            exponent,
            n_squared: n_squared.clone(),
        });
    }
    let last = ((&d % &exponent_modulus) + &exponent_modulus - &allocated) % &exponent_modulus;
    shares.push(KeyShare {
        index: params.shares - 1,
        exponent: last,
        n_squared: n_squared.clone(),
    });

    let public_key = PublicKey {
        n,
        n_squared,
        g,
        shares: params.shares,
    };
    Ok((public_key, shares))
}

impl PublicKey {
    /// The public modulus n.
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Number of key shares required to decrypt.
    pub fn share_count(&self) -> usize {
        self.shares
    }

    /// Encrypt a plaintext with randomness drawn from `rng`.
    ///
    /// The plaintext is reduced into [0, n); signed values round-trip through
    /// the centre-lift in [`PublicKey::combine_shares`] as long as their
    /// magnitude stays below n/2.
    pub fn encrypt_with_rng<R: Rng + ?Sized>(
        &self,
        plaintext: &BigInt,
        rng: &mut R,
    ) -> Result<BigInt, ProviderError> {
        let n_int = BigInt::from(self.n.clone());
        let m = plaintext
            .mod_floor(&n_int)
            .to_biguint()
            .ok_or_else(|| ProviderError::new("plaintext reduction produced a negative value"))?;
        let r = loop {
            let r = rng.gen_biguint_range(&BigUint::one(), &self.n);
            if r.gcd(&self.n).is_one() {
                break r;
            }
        };
        let c = (self.g.modpow(&m, &self.n_squared) * r.modpow(&self.n, &self.n_squared))
            % &self.n_squared;
        Ok(BigInt::from(c))
    }

    /// Combine one decryption share from every key holder into a plaintext.
    ///
    /// The recovered residue is centre-lifted to (−n/2, n/2], so results of
    /// homomorphic subtraction and negation come back as signed integers.
    pub fn combine_shares(&self, shares: &[DecryptionShare]) -> Result<BigInt, ProviderError> {
        if shares.len() != self.shares {
            return Err(ProviderError::new(format!(
                "decryption requires {} shares, got {}",
                self.shares,
                shares.len()
            )));
        }
        for (pos, share) in shares.iter().enumerate() {
            if shares[..pos].iter().any(|other| other.index == share.index) {
                return Err(ProviderError::new(format!(
                    "duplicate decryption share from holder {}",
                    share.index
                )));
            }
        }

        let mut combined = BigUint::one();
        for share in shares {
            combined = (combined * &share.value) % &self.n_squared;
        }
        // combined = c^d = 1 + mn (mod n^2); invert L(u) = (u - 1) / n.
        if combined.is_zero() {
            return Err(ProviderError::new("combined shares decode to zero"));
        }
        let numerator = combined - BigUint::one();
        if !numerator.is_multiple_of(&self.n) {
            return Err(ProviderError::new(
                "combined shares do not decode to a valid plaintext",
            ));
        }
        let residue = (numerator / &self.n) % &self.n;

        let n_int = BigInt::from(self.n.clone());
        let residue = BigInt::from(residue);
        if &residue * 2 > n_int {
            Ok(residue - BigInt::from(self.n.clone()))
        } else {
            Ok(residue)
        }
    }

    fn checked_ciphertext(&self, ciphertext: &BigInt) -> Result<BigUint, ProviderError> {
        let value = match ciphertext.to_biguint() {
            Some(v) if !v.is_zero() && v < self.n_squared => v,
            _ => {
                return Err(ProviderError::new(
                    "ciphertext is outside the multiplicative group modulo n^2",
                ))
            }
        };
        Ok(value)
    }
}

impl Cryptosystem for PublicKey {
    fn encrypt(&self, plaintext: &BigInt) -> Result<BigInt, ProviderError> {
        self.encrypt_with_rng(plaintext, &mut rand::thread_rng())
    }

    fn homomorphic_add(&self, a: &BigInt, b: &BigInt) -> Result<BigInt, ProviderError> {
        let a = self.checked_ciphertext(a)?;
        let b = self.checked_ciphertext(b)?;
        Ok(BigInt::from((a * b) % &self.n_squared))
    }

    fn homomorphic_scale(
        &self,
        ciphertext: &BigInt,
        factor: &BigInt,
    ) -> Result<BigInt, ProviderError> {
        let c = self.checked_ciphertext(ciphertext)?;
        let magnitude = factor.magnitude();
        let base = match factor.sign() {
            Sign::Minus => mod_inverse(&c, &self.n_squared)
                .ok_or_else(|| ProviderError::new("ciphertext is not invertible modulo n^2"))?,
            _ => c,
        };
        Ok(BigInt::from(base.modpow(magnitude, &self.n_squared)))
    }
}

impl KeyShare {
    /// This holder's index within the share set.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raise a ciphertext to this share's exponent.
    pub fn partial_decrypt(&self, ciphertext: &BigInt) -> Result<DecryptionShare, ProviderError> {
        let c = match ciphertext.to_biguint() {
            Some(v) if !v.is_zero() && v < self.n_squared => v,
            _ => {
                return Err(ProviderError::new(
                    "ciphertext is outside the multiplicative group modulo n^2",
                ))
            }
        };
        Ok(DecryptionShare {
            index: self.index,
            value: c.modpow(&self.exponent, &self.n_squared),
        })
    }
}

/// Modular inverse via the extended Euclidean algorithm, or `None` when the
/// value is not invertible.
fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    let value = BigInt::from(value.clone());
    let modulus = BigInt::from(modulus.clone());
    let gcd = value.extended_gcd(&modulus);
    if !gcd.gcd.is_one() {
        return None;
    }
    gcd.x.mod_floor(&modulus).to_biguint()
}

/// Sample random odd candidates with the top bit set until one passes
/// Miller–Rabin.
fn generate_prime<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> BigUint {
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        if is_probable_prime(&candidate, rng) {
            return candidate;
        }
    }
}

/// Miller–Rabin with 25 random witnesses (error probability below 4^-25).
fn is_probable_prime<R: Rng + ?Sized>(n: &BigUint, rng: &mut R) -> bool {
    const SMALL_PRIMES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }
    if *n < BigUint::from(2u32) {
        return false;
    }

    // n - 1 = 2^s * t with t odd
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let t = &n_minus_one >> s;

    'witness: for _ in 0..25 {
        let a = rng.gen_biguint_range(&BigUint::from(2u32), &n_minus_one);
        let mut x = a.modpow(&t, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
