//! Plaintext space over arbitrary-precision integers.

use num_bigint::BigInt;
use num_traits::Zero;

use super::{Element, Space};
use crate::error::Result;

/// The reference scalar space: ordinary ring arithmetic over `BigInt`.
///
/// Every operation reduces to big-integer arithmetic and `scale` coincides
/// with `multiply`. Integer elements are valid scalar multipliers for any
/// other space, so `is_scalar` reports true.
#[derive(Clone, Copy, Debug, Default)]
pub struct Integers;

impl Space for Integers {
    fn add(&self, x: &Element, y: &Element) -> Result<Element> {
        Ok(Element::Int(x.as_int()? + y.as_int()?))
    }

    fn subtract(&self, x: &Element, y: &Element) -> Result<Element> {
        Ok(Element::Int(x.as_int()? - y.as_int()?))
    }

    fn negate(&self, x: &Element) -> Result<Element> {
        let value = x.as_int()?;
        Ok(Element::Int(-value))
    }

    fn multiply(&self, x: &Element, y: &Element) -> Result<Element> {
        Ok(Element::Int(x.as_int()? * y.as_int()?))
    }

    fn scale(&self, spaced: &Element, factor: &Element) -> Result<Element> {
        self.multiply(spaced, factor)
    }

    fn is_scalar(&self) -> bool {
        true
    }

    fn zero(&self) -> Element {
        Element::Int(BigInt::zero())
    }
}
