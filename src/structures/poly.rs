use core::fmt;
use core::ops::Neg;

use crate::algebra::euclid::EuclideanDomain;
use crate::algebra::field::{FieldElement, FiniteField};
use crate::error::{Error, Result};

/// Polynomial over a finite field.
///
/// Coefficients are stored in ascending order of degree:
/// `coeffs[i]` is the coefficient of `x^i`.
///
/// The zero polynomial is represented as an empty coefficient vector; the
/// field descriptor is kept alongside so that even the zero polynomial knows
/// which ring it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Poly<E: FieldElement> {
    coeffs: Vec<E>,
    field: E::Field,
}

impl<E: FieldElement> Poly<E> {
    /// Create a polynomial from coefficients in ascending order.
    ///
    /// `coeffs[i]` is the coefficient of `x^i`.
    /// Trailing zeros are automatically removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleField`] if a coefficient does not belong
    /// to `field`.
    ///
    /// # Example
    ///
    /// ```
    /// use ffactor::{Poly, PrimeField};
    ///
    /// let f17 = PrimeField::new(17).unwrap();
    ///
    /// // 3 + 2x + x^2
    /// let p = Poly::new(&f17, vec![f17.get(3), f17.get(2), f17.get(1)]).unwrap();
    /// assert_eq!(p.degree(), Some(2));
    /// ```
    pub fn new(field: &E::Field, coeffs: Vec<E>) -> Result<Self> {
        if let Some(bad) = coeffs.iter().find(|c| c.field() != field) {
            return Err(Error::incompatible(
                format_args!("{} in {}", bad, bad.field()),
                format_args!("polynomial ring over {}", field),
            ));
        }
        let mut poly = Self {
            coeffs,
            field: field.clone(),
        };
        poly.normalize();
        Ok(poly)
    }

    /// Create a polynomial from integer coefficients in ascending order.
    ///
    /// Each integer is mapped into the field with [`FiniteField::get`]; see
    /// also [`FiniteField::poly`], which lets the element type be inferred.
    pub fn from_i64s(field: &E::Field, coeffs: &[i64]) -> Self {
        let mut poly = Self {
            coeffs: coeffs.iter().map(|&c| field.get(c)).collect(),
            field: field.clone(),
        };
        poly.normalize();
        poly
    }

    /// Create the zero polynomial.
    pub fn zero(field: &E::Field) -> Self {
        Self {
            coeffs: Vec::new(),
            field: field.clone(),
        }
    }

    /// Create the constant polynomial `1`.
    pub fn one(field: &E::Field) -> Self {
        Self::constant(field.one())
    }

    /// Create a constant polynomial from a single field element.
    ///
    /// A zero element gives the zero polynomial.
    pub fn constant(c: E) -> Self {
        let field = c.field().clone();
        if c.is_zero() {
            Self::zero(&field)
        } else {
            Self {
                coeffs: vec![c],
                field,
            }
        }
    }

    /// Create the polynomial `x`.
    pub fn x(field: &E::Field) -> Self {
        Self {
            coeffs: vec![field.zero(), field.one()],
            field: field.clone(),
        }
    }

    /// Create a monomial `c * x^n`.
    pub fn monomial(c: E, n: usize) -> Self {
        let field = c.field().clone();
        if c.is_zero() {
            return Self::zero(&field);
        }
        let mut coeffs = vec![field.zero(); n + 1];
        coeffs[n] = c;
        Self { coeffs, field }
    }

    /// Create `(x - r1)(x - r2)...(x - rn)`.
    ///
    /// # Example
    ///
    /// ```
    /// use ffactor::{FiniteField, Poly, PrimeField};
    ///
    /// let f17 = PrimeField::new(17).unwrap();
    /// let p = Poly::from_roots(&f17, &[f17.get(2), f17.get(5)]).unwrap();
    /// assert_eq!(p.eval(&f17.get(2)).unwrap().value(), 0);
    /// assert_eq!(p, f17.poly(&[10, -7, 1]));
    /// ```
    pub fn from_roots(field: &E::Field, roots: &[E]) -> Result<Self> {
        let mut result = Self::one(field);
        for root in roots {
            let factor = Self::new(field, vec![-root.clone(), field.one()])?;
            result = result.try_mul(&factor)?;
        }
        Ok(result)
    }

    /// The coefficient field.
    pub fn field(&self) -> &E::Field {
        &self.field
    }

    /// Check if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Get the degree of the polynomial.
    ///
    /// Returns `None` for the zero polynomial (degree −∞), `Some(n)`
    /// otherwise where `n` is the highest power with a non-zero coefficient.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Get the leading coefficient.
    ///
    /// Returns `None` for the zero polynomial.
    pub fn leading_coeff(&self) -> Option<&E> {
        self.coeffs.last()
    }

    /// Get the coefficient of `x^i`.
    ///
    /// Returns zero if `i` is beyond the polynomial's degree.
    pub fn coeff(&self, i: usize) -> E {
        self.coeffs
            .get(i)
            .cloned()
            .unwrap_or_else(|| self.field.zero())
    }

    /// Get a slice of all coefficients.
    pub fn coefficients(&self) -> &[E] {
        &self.coeffs
    }

    /// Remove trailing zero coefficients.
    fn normalize(&mut self) {
        while self.coeffs.last().map_or(false, |c| c.is_zero()) {
            self.coeffs.pop();
        }
    }

    fn check_same_field(&self, rhs: &Self) -> Result<()> {
        if self.field != rhs.field {
            return Err(Error::incompatible(
                format_args!("{} over {}", self, self.field),
                format_args!("{} over {}", rhs, rhs.field),
            ));
        }
        Ok(())
    }

    /// Evaluate the polynomial at a point using Horner's method.
    pub fn eval(&self, x: &E) -> Result<E> {
        let mut result = x.zero_like();
        for coeff in self.coeffs.iter().rev() {
            result = result.try_mul(x)?.try_add(coeff)?;
        }
        Ok(result)
    }

    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.check_same_field(rhs)?;
        let max_len = self.coeffs.len().max(rhs.coeffs.len());
        let mut coeffs = Vec::with_capacity(max_len);
        for i in 0..max_len {
            coeffs.push(self.coeff(i).try_add(&rhs.coeff(i))?);
        }
        let mut sum = Self {
            coeffs,
            field: self.field.clone(),
        };
        sum.normalize();
        Ok(sum)
    }

    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.check_same_field(rhs)?;
        let max_len = self.coeffs.len().max(rhs.coeffs.len());
        let mut coeffs = Vec::with_capacity(max_len);
        for i in 0..max_len {
            coeffs.push(self.coeff(i).try_sub(&rhs.coeff(i))?);
        }
        let mut diff = Self {
            coeffs,
            field: self.field.clone(),
        };
        diff.normalize();
        Ok(diff)
    }

    /// Polynomial multiplication using naive O(n*m) convolution.
    pub fn try_mul(&self, rhs: &Self) -> Result<Self> {
        self.check_same_field(rhs)?;
        if self.is_zero() || rhs.is_zero() {
            return Ok(Self::zero(&self.field));
        }

        let n = self.coeffs.len();
        let m = rhs.coeffs.len();
        let mut coeffs = vec![self.field.zero(); n + m - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] = coeffs[i + j].try_add(&a.try_mul(b)?)?;
            }
        }

        let mut product = Self {
            coeffs,
            field: self.field.clone(),
        };
        product.normalize();
        Ok(product)
    }

    /// Multiply every coefficient by `c`.
    pub fn scale(&self, c: &E) -> Result<Self> {
        let coeffs = self
            .coeffs
            .iter()
            .map(|a| a.try_mul(c))
            .collect::<Result<Vec<_>>>()?;
        Self::new(&self.field, coeffs)
    }

    /// Make the polynomial monic (leading coefficient = 1).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] for the zero polynomial.
    pub fn monic(&self) -> Result<Self> {
        match self.leading_coeff() {
            None => Err(Error::DivisionByZero(
                "the zero polynomial has no monic associate".into(),
            )),
            Some(lc) if lc.is_one() => Ok(self.clone()),
            Some(lc) => self.scale(&lc.inverse()?),
        }
    }

    /// Euclidean division: compute quotient and remainder.
    ///
    /// Returns `(q, r)` such that `self = q * divisor + r` and
    /// `deg(r) < deg(divisor)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] if the divisor is zero and
    /// [`Error::IncompatibleField`] if the rings differ.
    ///
    /// # Example
    ///
    /// ```
    /// use ffactor::{FiniteField, PrimeField};
    ///
    /// let f17 = PrimeField::new(17).unwrap();
    ///
    /// // (x^2 + 2x + 1) / (x + 1) = (x + 1), remainder 0
    /// let dividend = f17.poly(&[1, 2, 1]);
    /// let divisor = f17.poly(&[1, 1]);
    /// let (q, r) = dividend.div_rem(&divisor).unwrap();
    ///
    /// assert_eq!(q, divisor);
    /// assert!(r.is_zero());
    /// ```
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        self.check_same_field(divisor)?;
        let (divisor_deg, divisor_lc) = match (divisor.degree(), divisor.leading_coeff()) {
            (Some(d), Some(lc)) => (d, lc),
            _ => {
                return Err(Error::DivisionByZero(format!(
                    "{} divided by the zero polynomial",
                    self
                )))
            }
        };

        // If dividend degree < divisor degree, quotient is 0
        match self.degree() {
            None => return Ok((Self::zero(&self.field), Self::zero(&self.field))),
            Some(d) if d < divisor_deg => return Ok((Self::zero(&self.field), self.clone())),
            _ => {}
        }

        let lc_inv = divisor_lc.inverse()?;
        let mut remainder = self.clone();
        let mut quotient_coeffs =
            vec![self.field.zero(); self.coeffs.len() - divisor.coeffs.len() + 1];

        while let (Some(rem_deg), Some(rem_lc)) = (remainder.degree(), remainder.leading_coeff()) {
            if rem_deg < divisor_deg {
                break;
            }

            let coeff = rem_lc.try_mul(&lc_inv)?;
            let deg_diff = rem_deg - divisor_deg;

            // remainder -= coeff * x^deg_diff * divisor
            for (i, d_coeff) in divisor.coeffs.iter().enumerate() {
                let slot = &mut remainder.coeffs[i + deg_diff];
                *slot = slot.try_sub(&coeff.try_mul(d_coeff)?)?;
            }
            quotient_coeffs[deg_diff] = coeff;
            remainder.normalize();
        }

        let mut quotient = Self {
            coeffs: quotient_coeffs,
            field: self.field.clone(),
        };
        quotient.normalize();
        Ok((quotient, remainder))
    }

    /// Compute the remainder of division.
    pub fn rem(&self, divisor: &Self) -> Result<Self> {
        self.div_rem(divisor).map(|(_, r)| r)
    }

    /// Compute `self^exp mod modulus` using repeated squaring.
    pub fn pow_mod(&self, exp: u64, modulus: &Self) -> Result<Self> {
        let mut base = self.rem(modulus)?;
        let mut result = Self::one(&self.field).rem(modulus)?;
        let mut e = exp;

        while e > 0 {
            if e & 1 == 1 {
                result = result.try_mul(&base)?.rem(modulus)?;
            }
            base = base.try_mul(&base)?.rem(modulus)?;
            e >>= 1;
        }

        Ok(result)
    }

    /// Formal derivative.
    pub fn derivative(&self) -> Result<Self> {
        if self.coeffs.len() <= 1 {
            return Ok(Self::zero(&self.field));
        }

        let mut coeffs = Vec::with_capacity(self.coeffs.len() - 1);
        for (i, c) in self.coeffs.iter().enumerate().skip(1) {
            coeffs.push(c.try_mul(&self.field.get(i as i64))?);
        }
        Self::new(&self.field, coeffs)
    }

    /// Write the polynomial using `var` as the indeterminate.
    ///
    /// Nonzero terms are listed by increasing degree, e.g. `2 + x + 3*x^2`.
    /// Coefficients whose own rendering is compound are parenthesized.
    pub fn fmt_with_var(&self, f: &mut fmt::Formatter<'_>, var: &str) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (i, coeff) in self.coeffs.iter().enumerate() {
            if coeff.is_zero() {
                continue;
            }

            if !first {
                write!(f, " + ")?;
            }
            first = false;

            let rendered = coeff.to_string();
            let c = if rendered.contains(' ') {
                format!("({})", rendered)
            } else {
                rendered
            };
            match i {
                0 => write!(f, "{}", c)?,
                1 if coeff.is_one() => write!(f, "{}", var)?,
                1 => write!(f, "{}*{}", c, var)?,
                _ if coeff.is_one() => write!(f, "{}^{}", var, i)?,
                _ => write!(f, "{}*{}^{}", c, var, i)?,
            }
        }

        Ok(())
    }
}

impl<E: FieldElement> Neg for Poly<E> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        let coeffs = self.coeffs.into_iter().map(|c| -c).collect();
        Self {
            coeffs,
            field: self.field,
        }
    }
}

impl<E: FieldElement> EuclideanDomain for Poly<E> {
    fn zero_like(&self) -> Self {
        Self::zero(&self.field)
    }

    fn one_like(&self) -> Self {
        Self::one(&self.field)
    }

    fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    fn try_add(&self, rhs: &Self) -> Result<Self> {
        Poly::try_add(self, rhs)
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        Poly::try_sub(self, rhs)
    }

    fn try_mul(&self, rhs: &Self) -> Result<Self> {
        Poly::try_mul(self, rhs)
    }

    fn div_rem(&self, rhs: &Self) -> Result<(Self, Self)> {
        Poly::div_rem(self, rhs)
    }

    /// The leading coefficient as a constant polynomial.
    fn unit(&self) -> Self {
        match self.leading_coeff() {
            Some(lc) => Self::constant(lc.clone()),
            None => Self::one(&self.field),
        }
    }

    fn normal_form(&self) -> Result<Self> {
        if self.is_zero() {
            return Ok(self.clone());
        }
        self.monic()
    }
}

impl<E: FieldElement> fmt::Debug for Poly<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_var(f, "x")
    }
}

impl<E: FieldElement> fmt::Display for Poly<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(feature = "serde")]
impl<E: FieldElement + serde::Serialize> serde::Serialize for Poly<E> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as the sequence of coefficients
        self.coeffs.serialize(serializer)
    }
}
