//! End-to-end algebra over the threshold Paillier provider.
//!
//! Exercises the full flow: key generation, element-wise encryption, engine
//! operations over the encrypted space (alone and mixed with plaintext),
//! partial decryption by every share holder, and share combination.

use std::sync::Arc;

use genmatrix::paillier::{generate_keys, KeyParams, KeyShare, PublicKey};
use genmatrix::{AlgebraError, Element, Encrypted, Integers, Matrix, Polynomial, SpaceRef};
use num_bigint::BigInt;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn test_key() -> (Arc<PublicKey>, Vec<KeyShare>) {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let params = KeyParams {
        prime_bits: 128,
        shares: 3,
    };
    let (pk, shares) = generate_keys(&params, &mut rng).unwrap();
    (Arc::new(pk), shares)
}

fn encrypted_space(pk: &Arc<PublicKey>) -> SpaceRef {
    Arc::new(Encrypted::new(pk.clone()))
}

fn encrypt_matrix(m: &Matrix, pk: &Arc<PublicKey>, rng: &mut ChaCha20Rng) -> Matrix {
    let mut values = Vec::with_capacity(m.rows() * m.cols());
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            let plain = m.at(i, j).unwrap().as_int().unwrap();
            values.push(Element::Cipher(pk.encrypt_with_rng(plain, rng).unwrap()));
        }
    }
    Matrix::new(m.rows(), m.cols(), values, encrypted_space(pk)).unwrap()
}

fn decrypt_element(e: &Element, pk: &PublicKey, shares: &[KeyShare]) -> BigInt {
    let ct = e.as_cipher().unwrap();
    let partial: Vec<_> = shares
        .iter()
        .map(|s| s.partial_decrypt(ct).unwrap())
        .collect();
    pk.combine_shares(&partial).unwrap()
}

fn decrypt_matrix(m: &Matrix, pk: &PublicKey, shares: &[KeyShare]) -> Matrix {
    let mut values = Vec::with_capacity(m.rows() * m.cols());
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            values.push(Element::Int(decrypt_element(
                m.at(i, j).unwrap(),
                pk,
                shares,
            )));
        }
    }
    Matrix::new(m.rows(), m.cols(), values, Arc::new(Integers)).unwrap()
}

#[test]
fn encrypted_addition_matches_plaintext_addition() {
    let (pk, shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(2);

    let a = Matrix::from_i64(2, 3, &[3, 4, 2, 1, 8, 5]).unwrap();
    let b = Matrix::from_i64(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
    let expected = Matrix::from_i64(2, 3, &[4, 6, 5, 5, 13, 11]).unwrap();
    assert_eq!(a.add(&b).unwrap(), expected);

    let ae = encrypt_matrix(&a, &pk, &mut rng);
    let be = encrypt_matrix(&b, &pk, &mut rng);
    let sum = ae.add(&be).unwrap();

    assert_eq!(decrypt_matrix(&sum, &pk, &shares), expected);
}

#[test]
fn encrypted_subtraction_matches_plaintext_subtraction() {
    let (pk, shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(3);

    let a = Matrix::from_i64(2, 3, &[3, 4, 2, 1, 8, 5]).unwrap();
    let b = Matrix::from_i64(2, 3, &[1, 2, 2, 0, 4, 3]).unwrap();
    let expected = Matrix::from_i64(2, 3, &[2, 2, 0, 1, 4, 2]).unwrap();

    let ae = encrypt_matrix(&a, &pk, &mut rng);
    let be = encrypt_matrix(&b, &pk, &mut rng);
    let diff = ae.subtract(&be).unwrap();

    assert_eq!(decrypt_matrix(&diff, &pk, &shares), expected);
}

#[test]
fn mixed_multiplication_matches_plaintext_multiplication() {
    let (pk, shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(4);

    let a = Matrix::from_i64(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
    let b = Matrix::from_i64(3, 2, &[1, 2, 3, 4, 5, 6]).unwrap();
    let ae = encrypt_matrix(&a, &pk, &mut rng);

    // Plaintext from the right: encrypted rows scaled by plain columns.
    let ab = ae.multiply(&b).unwrap();
    assert_eq!(decrypt_matrix(&ab, &pk, &shares), a.multiply(&b).unwrap());

    // Plaintext from the left: the scalar operand leads.
    let ba = b.multiply(&ae).unwrap();
    assert_eq!(decrypt_matrix(&ba, &pk, &shares), b.multiply(&a).unwrap());
}

#[test]
fn encrypted_by_encrypted_multiplication_is_rejected() {
    let (pk, _shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(5);

    let a = Matrix::from_i64(2, 2, &[1, 2, 3, 4]).unwrap();
    let ae = encrypt_matrix(&a, &pk, &mut rng);
    let be = encrypt_matrix(&a, &pk, &mut rng);

    let err = ae.multiply(&be).unwrap_err();
    assert!(matches!(err, AlgebraError::UnsupportedOperation(_)));
}

#[test]
fn scaling_an_encrypted_matrix_by_a_plaintext_factor() {
    let (pk, shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(6);

    let a = Matrix::from_i64(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
    let expected = Matrix::from_i64(2, 3, &[3, 6, 9, 12, 15, 18]).unwrap();

    let ae = encrypt_matrix(&a, &pk, &mut rng);
    let scaled = ae.scale(&Element::from_i64(3)).unwrap();

    assert_eq!(decrypt_matrix(&scaled, &pk, &shares), expected);
}

#[test]
fn concatenate_then_crop_recovers_the_encrypted_block() {
    let (pk, shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(7);

    let a = Matrix::from_i64(2, 2, &[1, 2, 3, 4]).unwrap();
    let b = Matrix::from_i64(2, 3, &[5, 6, 7, 8, 9, 10]).unwrap();
    let ae = encrypt_matrix(&a, &pk, &mut rng);
    let be = encrypt_matrix(&b, &pk, &mut rng);

    let cropped = ae
        .concatenate(&be)
        .unwrap()
        .crop_horizontally(be.cols())
        .unwrap();

    // The crop returns the very same ciphertexts, not re-randomized ones.
    assert_eq!(cropped, be);
    assert_eq!(decrypt_matrix(&cropped, &pk, &shares), b);
}

fn encrypt_polynomial(p: &Polynomial, pk: &Arc<PublicKey>, rng: &mut ChaCha20Rng) -> Polynomial {
    let mut values = Vec::with_capacity(p.size());
    for i in 0..p.size() {
        let plain = p.at(i).unwrap().as_int().unwrap();
        values.push(Element::Cipher(pk.encrypt_with_rng(plain, rng).unwrap()));
    }
    Polynomial::new(values, encrypted_space(pk))
}

fn decrypt_polynomial(p: &Polynomial, pk: &PublicKey, shares: &[KeyShare]) -> Polynomial {
    let mut values = Vec::with_capacity(p.size());
    for i in 0..p.size() {
        values.push(Element::Int(decrypt_element(p.at(i).unwrap(), pk, shares)));
    }
    Polynomial::new(values, Arc::new(Integers))
}

#[test]
fn mixed_polynomial_multiplication_matches_plaintext_multiplication() {
    let (pk, shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(10);

    // (1 + 2x + 3x^2) * (4 + 5x) = 4 + 13x + 22x^2 + 15x^3
    let a = Polynomial::from_i64(&[1, 2, 3]);
    let b = Polynomial::from_i64(&[4, 5]);
    let expected = Polynomial::from_i64(&[4, 13, 22, 15]);
    assert_eq!(a.multiply(&b).unwrap(), expected);

    let ae = encrypt_polynomial(&a, &pk, &mut rng);

    // Plaintext from the right: encrypted coefficients scaled by plain ones.
    let ab = ae.multiply(&b).unwrap();
    assert_eq!(decrypt_polynomial(&ab, &pk, &shares), expected);

    // Plaintext from the left: the scalar operand leads.
    let ba = b.multiply(&ae).unwrap();
    assert_eq!(decrypt_polynomial(&ba, &pk, &shares), expected);
}

#[test]
fn encrypted_by_encrypted_polynomial_multiplication_is_rejected() {
    let (pk, _shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(11);

    let a = Polynomial::from_i64(&[1, 2, 3]);
    let ae = encrypt_polynomial(&a, &pk, &mut rng);
    let be = encrypt_polynomial(&a, &pk, &mut rng);

    let err = ae.multiply(&be).unwrap_err();
    assert!(matches!(err, AlgebraError::UnsupportedOperation(_)));
}

#[test]
fn encrypted_polynomial_evaluated_at_a_plaintext_point() {
    let (pk, shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(8);

    // 1 + 2x + 3x^2 with encrypted coefficients, evaluated at plain x = 2.
    let coefficients = [1i64, 2, 3]
        .iter()
        .map(|&c| Element::Cipher(pk.encrypt_with_rng(&BigInt::from(c), &mut rng).unwrap()))
        .collect();
    let p = Polynomial::new(coefficients, encrypted_space(&pk));

    let ints: SpaceRef = Arc::new(Integers);
    let value = p.evaluate_in_space(&Element::from_i64(2), &ints).unwrap();

    assert_eq!(decrypt_element(&value, &pk, &shares), BigInt::from(17));
}

#[test]
fn evaluating_encrypted_coefficients_at_an_encrypted_point_is_rejected() {
    let (pk, _shares) = test_key();
    let mut rng = ChaCha20Rng::seed_from_u64(9);

    let coefficients = [1i64, 2]
        .iter()
        .map(|&c| Element::Cipher(pk.encrypt_with_rng(&BigInt::from(c), &mut rng).unwrap()))
        .collect();
    let p = Polynomial::new(coefficients, encrypted_space(&pk));

    let x = Element::Cipher(pk.encrypt_with_rng(&BigInt::from(2), &mut rng).unwrap());
    let err = p.evaluate(&x).unwrap_err();
    assert!(matches!(err, AlgebraError::UnsupportedOperation(_)));
}
