//! Polynomial engine over an algebraic space.
//!
//! A [`Polynomial`] is an ordered coefficient sequence (index 0 is the
//! constant term) bound to one space, with the same capability routing as the
//! matrix engine. Point evaluation supports polynomial-based secret sharing:
//! shares are evaluations at distinct points, and reconstructing a secret is
//! evaluating an interpolated polynomial. [`Polynomial::evaluate_in_space`]
//! additionally lets the powers of the point live in a companion scalar space
//! while coefficients stay encrypted, the shape needed to evaluate a
//! ciphertext-coefficient polynomial at a plaintext point.
//!
//! # Example
//!
//! ```
//! use genmatrix::{Element, Polynomial};
//!
//! // 1 + 2x + 3x^2 at x = 2
//! let p = Polynomial::from_i64(&[1, 2, 3]);
//! let value = p.evaluate(&Element::from_i64(2)).unwrap();
//! assert_eq!(value, Element::from_i64(17));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{AlgebraError, Result};
use crate::space::{Element, Integers, SpaceRef};

/// Coefficient sequence bound to a space; index 0 is the constant term.
#[derive(Clone)]
pub struct Polynomial {
    values: Vec<Element>,
    space: SpaceRef,
}

impl Polynomial {
    /// Create a polynomial from its coefficients, constant term first.
    pub fn new(values: Vec<Element>, space: SpaceRef) -> Self {
        Self { values, space }
    }

    /// Create a plaintext integer polynomial over [`Integers`].
    pub fn from_i64(values: &[i64]) -> Self {
        let elements = values.iter().map(|&v| Element::from_i64(v)).collect();
        Self::new(elements, Arc::new(Integers))
    }

    /// Number of coefficients (degree plus one for a non-empty polynomial).
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// The bound space.
    pub fn space(&self) -> &SpaceRef {
        &self.space
    }

    /// Coefficient at `index`, where index 0 is the constant term.
    pub fn at(&self, index: usize) -> Result<&Element> {
        self.values.get(index).ok_or_else(|| {
            AlgebraError::IndexOutOfBounds(format!(
                "coefficient {} of a size-{} polynomial",
                index,
                self.values.len()
            ))
        })
    }

    /// Replace the coefficient at `index`. The polynomial is fixed-size;
    /// setting at `size` is an error, not an append.
    pub fn set(&mut self, index: usize, value: Element) -> Result<()> {
        let size = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(AlgebraError::IndexOutOfBounds(format!(
                "coefficient {} of a size-{} polynomial",
                index, size
            ))),
        }
    }

    /// Coefficient-wise addition; the result has `max(size_a, size_b)`
    /// coefficients, high-order ones copied from the longer operand.
    pub fn add(&self, other: &Polynomial) -> Result<Polynomial> {
        let size = self.values.len().max(other.values.len());
        let mut values = Vec::with_capacity(size);
        for i in 0..size {
            let v = match (self.values.get(i), other.values.get(i)) {
                (Some(x), Some(y)) => self.space.add(x, y)?,
                (Some(x), None) => x.clone(),
                (None, Some(y)) => y.clone(),
                (None, None) => unreachable!(),
            };
            values.push(v);
        }
        Ok(Polynomial::new(values, self.space.clone()))
    }

    /// Coefficient-wise subtraction; coefficients present only in `other`
    /// enter the result negated.
    pub fn subtract(&self, other: &Polynomial) -> Result<Polynomial> {
        let size = self.values.len().max(other.values.len());
        let mut values = Vec::with_capacity(size);
        for i in 0..size {
            let v = match (self.values.get(i), other.values.get(i)) {
                (Some(x), Some(y)) => self.space.subtract(x, y)?,
                (Some(x), None) => x.clone(),
                (None, Some(y)) => other.space.negate(y)?,
                (None, None) => unreachable!(),
            };
            values.push(v);
        }
        Ok(Polynomial::new(values, self.space.clone()))
    }

    /// Polynomial product `self * other`: the full convolution.
    ///
    /// Coefficient `n` of the result sums the products of every coefficient
    /// pair `(i, j)` with `i + j == n`, each pair routed by the operands'
    /// spaces exactly as in [`Matrix::multiply`](crate::Matrix::multiply).
    /// A pair that would need a ciphertext-by-ciphertext product fails the
    /// whole multiplication with `UnsupportedOperation`.
    pub fn multiply(&self, other: &Polynomial) -> Result<Polynomial> {
        let self_scalar = self.space.is_scalar();
        let other_scalar = other.space.is_scalar();
        let result_space = if self_scalar {
            other.space.clone()
        } else {
            self.space.clone()
        };

        if self.values.is_empty() || other.values.is_empty() {
            return Ok(Polynomial::new(Vec::new(), result_space));
        }

        let size = self.values.len() + other.values.len() - 1;
        let mut values = Vec::with_capacity(size);
        for n in 0..size {
            let lo = (n + 1).saturating_sub(other.values.len());
            let hi = n.min(self.values.len() - 1);
            let mut sum: Option<Element> = None;
            for i in lo..=hi {
                let a = &self.values[i];
                let b = &other.values[n - i];
                let term = if self_scalar {
                    other.space.scale(b, a)?
                } else if other_scalar {
                    self.space.scale(a, b)?
                } else {
                    self.space.multiply(a, b)?
                };
                sum = Some(match sum {
                    Some(acc) => result_space.add(&acc, &term)?,
                    None => term,
                });
            }
            values.push(sum.unwrap_or_else(|| result_space.zero()));
        }
        Ok(Polynomial::new(values, result_space))
    }

    /// Coefficient-wise product with a scalar from the polynomial's own
    /// space. For an encrypted polynomial and a plaintext factor use
    /// [`Polynomial::scale`].
    pub fn multiply_scalar(&self, scalar: &Element) -> Result<Polynomial> {
        self.map_with(|v| self.space.multiply(v, scalar))
    }

    /// Coefficient-wise scaling by a factor from a companion scalar space.
    pub fn scale(&self, factor: &Element) -> Result<Polynomial> {
        self.map_with(|v| self.space.scale(v, factor))
    }

    /// Evaluate at a point `x` drawn from the polynomial's own space.
    pub fn evaluate(&self, x: &Element) -> Result<Element> {
        let space = self.space.clone();
        self.evaluate_in_space(x, &space)
    }

    /// Evaluate at `x`, computing the successive powers of `x` inside
    /// `power_space` while combining them with coefficients in the
    /// polynomial's native space.
    ///
    /// With encrypted coefficients and a plaintext `x`, the powers are plain
    /// integer arithmetic and each term is a homomorphic scaling, so the
    /// evaluation stays inside the partially homomorphic capability set.
    pub fn evaluate_in_space(&self, x: &Element, power_space: &SpaceRef) -> Result<Element> {
        let mut coefficients = self.values.iter();
        let mut sum = match coefficients.next() {
            Some(c) => c.clone(),
            None => return Ok(self.space.zero()),
        };
        let route_through_scale = power_space.is_scalar() && !self.space.is_scalar();
        let mut power = x.clone();
        for (i, c) in coefficients.enumerate() {
            let term = if route_through_scale {
                self.space.scale(c, &power)?
            } else {
                self.space.multiply(c, &power)?
            };
            sum = self.space.add(&sum, &term)?;
            if i + 2 < self.values.len() {
                power = power_space.multiply(&power, x)?;
            }
        }
        Ok(sum)
    }

    /// Map every coefficient through `f`, building a same-size polynomial.
    ///
    /// The first error `f` produces fails the whole operation.
    pub fn apply<F>(&self, f: F) -> Result<Polynomial>
    where
        F: Fn(&Element) -> Result<Element>,
    {
        self.map_with(f)
    }

    fn map_with<F>(&self, f: F) -> Result<Polynomial>
    where
        F: Fn(&Element) -> Result<Element>,
    {
        let mut values = Vec::with_capacity(self.values.len());
        for v in &self.values {
            values.push(f(v)?);
        }
        Ok(Polynomial::new(values, self.space.clone()))
    }
}

/// Coefficient equality; the bound space is not compared.
impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polynomial")
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_and_set_are_bounds_checked() {
        let mut p = Polynomial::from_i64(&[1, 2, 3]);

        assert_eq!(p.at(2).unwrap(), &Element::from_i64(3));
        assert!(matches!(
            p.at(3).unwrap_err(),
            AlgebraError::IndexOutOfBounds(_)
        ));

        p.set(0, Element::from_i64(7)).unwrap();
        assert_eq!(p.at(0).unwrap(), &Element::from_i64(7));
        // Fixed size: setting one past the end is an error, not an append.
        assert!(matches!(
            p.set(3, Element::from_i64(4)).unwrap_err(),
            AlgebraError::IndexOutOfBounds(_)
        ));
    }

    #[test]
    fn addition() {
        let a = Polynomial::from_i64(&[1, 2, 3, 4]);
        let double = a.add(&a).unwrap();
        assert_eq!(double, Polynomial::from_i64(&[2, 4, 6, 8]));
    }

    #[test]
    fn addition_copies_high_order_tail() {
        let a = Polynomial::from_i64(&[1, 2]);
        let b = Polynomial::from_i64(&[10, 20, 30, 40]);
        let expected = Polynomial::from_i64(&[11, 22, 30, 40]);

        assert_eq!(a.add(&b).unwrap(), expected);
        assert_eq!(b.add(&a).unwrap(), expected);
    }

    #[test]
    fn subtraction() {
        let a = Polynomial::from_i64(&[5, 3, 7, 9]);
        let b = Polynomial::from_i64(&[1, 2, 3]);

        assert_eq!(a.subtract(&b).unwrap(), Polynomial::from_i64(&[4, 1, 4, 9]));
        // The tail present only in the longer subtrahend comes out negated.
        assert_eq!(
            b.subtract(&a).unwrap(),
            Polynomial::from_i64(&[-4, -1, -4, -9])
        );
    }

    #[test]
    fn multiplication_is_the_full_convolution() {
        let a = Polynomial::from_i64(&[1, 2, 3, 4]);
        let b = Polynomial::from_i64(&[1, 2, 3]);
        let expected = Polynomial::from_i64(&[1, 4, 10, 16, 17, 12]);

        assert_eq!(a.multiply(&b).unwrap(), expected);
        assert_eq!(b.multiply(&a).unwrap(), expected);
    }

    #[test]
    fn multiplication_result_size() {
        let a = Polynomial::from_i64(&[1, 1]);
        let b = Polynomial::from_i64(&[1, 1, 1]);
        let product = a.multiply(&b).unwrap();
        assert_eq!(product.size(), 4);

        let empty = Polynomial::from_i64(&[]);
        assert_eq!(a.multiply(&empty).unwrap().size(), 0);
    }

    #[test]
    fn scalar_multiplication() {
        let a = Polynomial::from_i64(&[1, 2, 3]);
        let tripled = a.multiply_scalar(&Element::from_i64(3)).unwrap();
        assert_eq!(tripled, Polynomial::from_i64(&[3, 6, 9]));
        assert_eq!(a.scale(&Element::from_i64(3)).unwrap(), tripled);
    }

    #[test]
    fn evaluation() {
        // 1 + 2x + 3x^2 at x = 2 is 17
        let p = Polynomial::from_i64(&[1, 2, 3]);
        assert_eq!(p.evaluate(&Element::from_i64(2)).unwrap(), Element::from_i64(17));

        // Constant polynomial ignores the point.
        let c = Polynomial::from_i64(&[9]);
        assert_eq!(c.evaluate(&Element::from_i64(5)).unwrap(), Element::from_i64(9));

        // Empty polynomial evaluates to the space's zero.
        let empty = Polynomial::from_i64(&[]);
        assert_eq!(empty.evaluate(&Element::from_i64(5)).unwrap(), Element::from_i64(0));
    }

    #[test]
    fn evaluation_reconstructs_shared_secret() {
        // f(x) = 42 + 7x + 5x^2; the secret is f(0) and any evaluation is a
        // share. Check a few share points directly.
        let f = Polynomial::from_i64(&[42, 7, 5]);
        assert_eq!(f.evaluate(&Element::from_i64(0)).unwrap(), Element::from_i64(42));
        assert_eq!(f.evaluate(&Element::from_i64(1)).unwrap(), Element::from_i64(54));
        assert_eq!(f.evaluate(&Element::from_i64(3)).unwrap(), Element::from_i64(108));
    }

    #[test]
    fn apply_propagates_the_first_error() {
        let p = Polynomial::from_i64(&[1, 2, 3]);
        let err = p
            .apply(|v| {
                if v == &Element::from_i64(2) {
                    Err(AlgebraError::TypeMismatch("poisoned".into()))
                } else {
                    Ok(v.clone())
                }
            })
            .unwrap_err();
        assert!(matches!(err, AlgebraError::TypeMismatch(_)));
    }
}
