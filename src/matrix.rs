//! Matrix engine over an algebraic space.
//!
//! A [`Matrix`] is a row-major 2-D container of opaque elements bound to one
//! [`Space`](crate::space::Space) at a time. Every operation routes
//! element-level steps through the bound space, so the same code multiplies
//! plaintext matrices, scales encrypted ones, and rejects the products a
//! partially homomorphic space cannot form.
//!
//! Operations have value semantics: they build a new matrix and never mutate
//! an input, except the explicit [`Matrix::set`].
//!
//! # Example
//!
//! ```
//! use genmatrix::{Element, Matrix};
//!
//! let a = Matrix::from_i64(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
//! let b = Matrix::from_i64(3, 2, &[1, 2, 3, 4, 5, 6]).unwrap();
//!
//! let product = a.multiply(&b).unwrap();
//! assert_eq!(product.at(0, 0).unwrap(), &Element::from_i64(22));
//! assert_eq!(product.at(1, 1).unwrap(), &Element::from_i64(64));
//! ```

use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;

use crate::error::{AlgebraError, Result};
use crate::space::{Element, Integers, SpaceRef};

/// 2-D matrix of opaque elements bound to a space.
///
/// Invariant: `values.len() == rows * cols`, row-major (row index varies
/// slower than column index).
#[derive(Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<Element>,
    space: SpaceRef,
}

impl Matrix {
    /// Create a matrix from a flat row-major element sequence.
    ///
    /// Fails with `DimensionMismatch` unless `values.len() == rows * cols`.
    pub fn new(rows: usize, cols: usize, values: Vec<Element>, space: SpaceRef) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(AlgebraError::DimensionMismatch(format!(
                "a {} x {} matrix needs {} elements, got {}",
                rows,
                cols,
                rows * cols,
                values.len()
            )));
        }
        Ok(Self {
            rows,
            cols,
            values,
            space,
        })
    }

    /// Create a matrix filled with the space's zero placeholder.
    pub fn zero(rows: usize, cols: usize, space: SpaceRef) -> Self {
        let values = vec![space.zero(); rows * cols];
        Self {
            rows,
            cols,
            values,
            space,
        }
    }

    /// Create a plaintext integer matrix over [`Integers`].
    pub fn from_i64(rows: usize, cols: usize, values: &[i64]) -> Result<Self> {
        let elements = values.iter().map(|&v| Element::from_i64(v)).collect();
        Self::new(rows, cols, elements, Arc::new(Integers))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The bound space.
    pub fn space(&self) -> &SpaceRef {
        &self.space
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(AlgebraError::IndexOutOfBounds(format!(
                "({}, {}) outside a {} x {} matrix",
                row, col, self.rows, self.cols
            )));
        }
        Ok(self.cols * row + col)
    }

    /// Element at `(row, col)`, zero-based.
    pub fn at(&self, row: usize, col: usize) -> Result<&Element> {
        let i = self.index(row, col)?;
        Ok(&self.values[i])
    }

    /// Replace the element at `(row, col)`, zero-based.
    pub fn set(&mut self, row: usize, col: usize, value: Element) -> Result<()> {
        let i = self.index(row, col)?;
        self.values[i] = value;
        Ok(())
    }

    fn require_same_shape(&self, other: &Matrix, op: &str) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(AlgebraError::DimensionMismatch(format!(
                "{} requires equal shapes, got {} x {} and {} x {}",
                op, self.rows, self.cols, other.rows, other.cols
            )));
        }
        Ok(())
    }

    /// Element-wise addition over the bound space.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.require_same_shape(other, "addition")?;
        self.zip_with(other, |x, y| self.space.add(x, y))
    }

    /// Element-wise subtraction over the bound space.
    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        self.require_same_shape(other, "subtraction")?;
        self.zip_with(other, |x, y| self.space.subtract(x, y))
    }

    /// Matrix product `self * other`.
    ///
    /// Requires `self.cols == other.rows` and produces a
    /// `self.rows x other.cols` matrix. Each term of the inner product is
    /// routed by the operands' spaces:
    ///
    /// - `self` scalar: terms are `other`'s elements scaled by `self`'s, the
    ///   result lives in `other`'s space
    /// - `other` scalar: terms are `self`'s elements scaled by `other`'s, the
    ///   result lives in `self`'s space
    /// - neither scalar: a direct product in `self`'s space, which fails with
    ///   `UnsupportedOperation` when the algebra has none (two encrypted
    ///   matrices); the whole multiplication fails and no partial matrix is
    ///   returned
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(AlgebraError::DimensionMismatch(format!(
                "cannot multiply {} x {} by {} x {}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let self_scalar = self.space.is_scalar();
        let other_scalar = other.space.is_scalar();
        let result_space = if self_scalar {
            other.space.clone()
        } else {
            self.space.clone()
        };

        let mut values = Vec::with_capacity(self.rows * other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum: Option<Element> = None;
                for k in 0..self.cols {
                    let a = &self.values[i * self.cols + k];
                    let b = &other.values[k * other.cols + j];
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
        }
        Matrix::new(self.rows, other.cols, values, result_space)
    }

    /// Element-wise product with a scalar from the matrix's own space.
    ///
    /// Use only when elements and factor are natively multiplicable in the
    /// same space; for an encrypted matrix and a plaintext factor use
    /// [`Matrix::scale`].
    pub fn multiply_scalar(&self, scalar: &Element) -> Result<Matrix> {
        self.map_with(|v| self.space.multiply(v, scalar))
    }

    /// Element-wise scaling by a factor from a companion scalar space.
    pub fn scale(&self, factor: &Element) -> Result<Matrix> {
        self.map_with(|v| self.space.scale(v, factor))
    }

    /// Horizontal concatenation `self | other`.
    ///
    /// Requires equal row counts; the result is bound to `self`'s space.
    pub fn concatenate(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows {
            return Err(AlgebraError::DimensionMismatch(format!(
                "cannot concatenate a {}-row matrix with a {}-row matrix",
                self.rows, other.rows
            )));
        }
        let cols = self.cols + other.cols;
        let mut values = Vec::with_capacity(cols * self.rows);
        for i in 0..self.rows {
            values.extend_from_slice(&self.values[i * self.cols..(i + 1) * self.cols]);
            values.extend_from_slice(&other.values[i * other.cols..(i + 1) * other.cols]);
        }
        Matrix::new(self.rows, cols, values, self.space.clone())
    }

    /// The rightmost `k` columns as a new matrix sharing the space.
    pub fn crop_horizontally(&self, k: usize) -> Result<Matrix> {
        if k > self.cols {
            return Err(AlgebraError::IndexOutOfBounds(format!(
                "cannot crop {} columns from a {}-column matrix",
                k, self.cols
            )));
        }
        let offset = self.cols - k;
        let mut values = Vec::with_capacity(k * self.rows);
        for i in 0..self.rows {
            values.extend_from_slice(&self.values[i * self.cols + offset..(i + 1) * self.cols]);
        }
        Matrix::new(self.rows, k, values, self.space.clone())
    }

    /// Reduce every element into `[0, modulus)`.
    ///
    /// Defined for plaintext integer elements only; a ciphertext element
    /// fails with `TypeMismatch`.
    pub fn modulo(&self, modulus: &BigInt) -> Result<Matrix> {
        self.map_with(|v| Ok(Element::Int(v.as_int()?.mod_floor(modulus))))
    }

    /// Map every element through `f`, building a same-shape matrix.
    ///
    /// The first error `f` produces fails the whole operation.
    pub fn apply<F>(&self, f: F) -> Result<Matrix>
    where
        F: Fn(&Element) -> Result<Element>,
    {
        self.map_with(f)
    }

    fn map_with<F>(&self, f: F) -> Result<Matrix>
    where
        F: Fn(&Element) -> Result<Element>,
    {
        let mut values = Vec::with_capacity(self.values.len());
        for v in &self.values {
            values.push(f(v)?);
        }
        Matrix::new(self.rows, self.cols, values, self.space.clone())
    }

    fn zip_with<F>(&self, other: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(&Element, &Element) -> Result<Element>,
    {
        let mut values = Vec::with_capacity(self.values.len());
        for (x, y) in self.values.iter().zip(&other.values) {
            values.push(f(x, y)?);
        }
        Matrix::new(self.rows, self.cols, values, self.space.clone())
    }
}

/// Shape and element equality; the bound space is not compared.
impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.values == other.values
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}
