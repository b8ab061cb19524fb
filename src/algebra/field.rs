use core::fmt;
use core::ops::Neg;

use crate::error::Result;
use crate::structures::poly::Poly;

/// Descriptor of a finite field F_q.
///
/// Descriptors are cheap handles: elements keep one to check compatibility
/// and to build new elements of the same field.
pub trait FiniteField: Clone + PartialEq + Eq + fmt::Debug + fmt::Display {
    /// Element type of this field.
    type Elem: FieldElement<Field = Self>;

    /// The characteristic `p`.
    fn characteristic(&self) -> u64;

    /// The number of elements `q = p^m`.
    fn size(&self) -> u64;

    /// Image of the integer `n` under the canonical map Z -> F_q.
    fn get(&self, n: i64) -> Self::Elem;

    /// The element numbered `index` in `0..size()`.
    ///
    /// Inverse of [`FieldElement::to_index`]; indices are reduced modulo
    /// `size()`.
    fn from_index(&self, index: u64) -> Self::Elem;

    #[inline]
    fn zero(&self) -> Self::Elem {
        self.get(0)
    }

    #[inline]
    fn one(&self) -> Self::Elem {
        self.get(1)
    }

    /// The polynomial with integer coefficients `coeffs`, lowest degree first.
    ///
    /// # Example
    ///
    /// ```
    /// use ffactor::{FiniteField, PrimeField};
    ///
    /// let f5 = PrimeField::new(5).unwrap();
    /// assert_eq!(f5.poly(&[-1, 0, 1]).to_string(), "4 + x^2");
    /// ```
    fn poly(&self, coeffs: &[i64]) -> Poly<Self::Elem> {
        Poly::from_i64s(self, coeffs)
    }

    /// Iterate over every element of the field, in index order.
    fn elements(&self) -> Elements<'_, Self> {
        Elements {
            field: self,
            next: 0,
        }
    }
}

/// An element of a finite field.
///
/// Binary operations return [`Error::IncompatibleField`] when the operands
/// belong to different fields, and inversion of zero returns
/// [`Error::DivisionByZero`].
///
/// [`Error::IncompatibleField`]: crate::Error::IncompatibleField
/// [`Error::DivisionByZero`]: crate::Error::DivisionByZero
pub trait FieldElement:
    Clone + PartialEq + Eq + fmt::Debug + fmt::Display + Neg<Output = Self>
{
    /// Descriptor of the field this element lives in.
    type Field: FiniteField<Elem = Self>;

    /// The field this element belongs to.
    fn field(&self) -> &Self::Field;

    fn is_zero(&self) -> bool;

    fn try_add(&self, rhs: &Self) -> Result<Self>;

    fn try_mul(&self, rhs: &Self) -> Result<Self>;

    /// Multiplicative inverse `a⁻¹`.
    fn inverse(&self) -> Result<Self>;

    /// Position of this element in the enumeration of its field.
    fn to_index(&self) -> u64;

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.try_add(&-rhs.clone())
    }

    /// `self * rhs⁻¹`.
    fn try_div(&self, rhs: &Self) -> Result<Self> {
        self.try_mul(&rhs.inverse()?)
    }

    fn is_one(&self) -> bool {
        *self == self.field().one()
    }

    /// The number of elements of the field.
    fn field_size(&self) -> u64 {
        self.field().size()
    }

    /// Zero of the same field.
    fn zero_like(&self) -> Self {
        self.field().zero()
    }

    /// One of the same field.
    fn one_like(&self) -> Self {
        self.field().one()
    }

    /// Compute `self^exp` using square-and-multiply.
    fn pow(&self, exp: u64) -> Result<Self> {
        let mut base = self.clone();
        let mut result = self.one_like();
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                result = result.try_mul(&base)?;
            }
            base = base.try_mul(&base)?;
            e >>= 1;
        }
        Ok(result)
    }
}

/// Iterator over all elements of a finite field.
///
/// Created by [`FiniteField::elements`].
#[derive(Debug, Clone)]
pub struct Elements<'a, F: FiniteField> {
    field: &'a F,
    next: u64,
}

impl<'a, F: FiniteField> Iterator for Elements<'a, F> {
    type Item = F::Elem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.field.size() {
            return None;
        }
        let elem = self.field.from_index(self.next);
        self.next += 1;
        Some(elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.field.size().saturating_sub(self.next);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
