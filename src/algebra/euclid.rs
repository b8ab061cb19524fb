//! Extended Euclidean algorithm over an arbitrary Euclidean domain.
//!
//! The algorithm is written once against [`EuclideanDomain`] and used for
//! integers and for polynomial rings alike.

use core::fmt;

use crate::error::{Error, Result};

/// A Euclidean domain: a commutative ring with division with remainder.
///
/// `unit` and `normal_form` pick a canonical associate: every element
/// factors as `a = unit(a) * normal_form(a)`. For integers the unit is the
/// sign, for polynomials over a field it is the leading coefficient.
pub trait EuclideanDomain: Clone + PartialEq + fmt::Debug {
    /// Zero of the same domain (same field, for polynomials).
    fn zero_like(&self) -> Self;

    /// One of the same domain.
    fn one_like(&self) -> Self;

    fn is_zero(&self) -> bool;

    fn try_add(&self, rhs: &Self) -> Result<Self>;

    fn try_sub(&self, rhs: &Self) -> Result<Self>;

    fn try_mul(&self, rhs: &Self) -> Result<Self>;

    /// Division with remainder: `self = q * rhs + r` with `r` smaller than
    /// `rhs` in the Euclidean norm.
    fn div_rem(&self, rhs: &Self) -> Result<(Self, Self)>;

    /// The unit `u` such that `self = u * normal_form(self)`.
    ///
    /// The unit of zero is one.
    fn unit(&self) -> Self;

    /// Canonical associate of `self`.
    fn normal_form(&self) -> Result<Self> {
        if self.is_zero() {
            return Ok(self.clone());
        }
        Ok(self.div_rem(&self.unit())?.0)
    }
}

/// Result of the extended Euclidean algorithm: `a*x + b*y = d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bezout<T> {
    /// `gcd(a, b)` in normal form.
    pub d: T,
    pub x: T,
    pub y: T,
}

/// Extended Euclidean algorithm.
///
/// Returns `d = normal_form(gcd(a, b))` and Bézout coefficients with
/// `a*x + b*y = d`. Fails with [`Error::UndefinedGcd`] when both inputs are
/// zero.
///
/// # Example
///
/// ```
/// use ffactor::algebra::euclid::extended_gcd;
///
/// let b = extended_gcd(&-12i64, &18i64).unwrap();
/// assert_eq!(b.d, 6);
/// assert_eq!(-12 * b.x + 18 * b.y, 6);
/// ```
pub fn extended_gcd<T: EuclideanDomain>(a: &T, b: &T) -> Result<Bezout<T>> {
    if a.is_zero() && b.is_zero() {
        return Err(Error::UndefinedGcd);
    }

    // Invariant: r0 = a*s0 + b*t0 and r1 = a*s1 + b*t1
    let (mut r0, mut r1) = (a.clone(), b.clone());
    let (mut s0, mut s1) = (a.one_like(), a.zero_like());
    let (mut t0, mut t1) = (a.zero_like(), a.one_like());

    while !r1.is_zero() {
        let (q, r) = r0.div_rem(&r1)?;
        if r.is_zero() {
            // r1 is the gcd; the next pair would only be ±b/d and ±a/d
            r0 = r1;
            s0 = s1;
            t0 = t1;
            break;
        }
        let s = s0.try_sub(&q.try_mul(&s1)?)?;
        let t = t0.try_sub(&q.try_mul(&t1)?)?;

        r0 = r1;
        r1 = r;
        s0 = s1;
        s1 = s;
        t0 = t1;
        t1 = t;
    }

    // Divide the whole identity by the unit of r0
    let u = r0.unit();
    Ok(Bezout {
        d: r0.div_rem(&u)?.0,
        x: s0.div_rem(&u)?.0,
        y: t0.div_rem(&u)?.0,
    })
}

/// Greatest common divisor in normal form.
pub fn gcd<T: EuclideanDomain>(a: &T, b: &T) -> Result<T> {
    extended_gcd(a, b).map(|bezout| bezout.d)
}

impl EuclideanDomain for i64 {
    fn zero_like(&self) -> Self {
        0
    }

    fn one_like(&self) -> Self {
        1
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.checked_add(*rhs)
            .ok_or_else(|| Error::Overflow(format!("{} + {}", self, rhs)))
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.checked_sub(*rhs)
            .ok_or_else(|| Error::Overflow(format!("{} - {}", self, rhs)))
    }

    fn try_mul(&self, rhs: &Self) -> Result<Self> {
        self.checked_mul(*rhs)
            .ok_or_else(|| Error::Overflow(format!("{} * {}", self, rhs)))
    }

    /// Truncating division; `|r| < |rhs|` makes it Euclidean.
    ///
    /// `i64::MIN / -1` is the only quotient that overflows.
    fn div_rem(&self, rhs: &Self) -> Result<(Self, Self)> {
        if *rhs == 0 {
            return Err(Error::DivisionByZero(format!("{} / 0", self)));
        }
        match (self.checked_div(*rhs), self.checked_rem(*rhs)) {
            (Some(q), Some(r)) => Ok((q, r)),
            _ => Err(Error::Overflow(format!("{} / {}", self, rhs))),
        }
    }

    fn unit(&self) -> Self {
        if *self < 0 {
            -1
        } else {
            1
        }
    }
}
