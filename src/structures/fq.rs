//! Extension fields F_q = F_p[a]/(m(a)).
//!
//! The descriptor holds the base prime field and the monic modulus
//! polynomial behind an `Rc`, so elements can be cloned cheaply while
//! sharing one descriptor.

use core::fmt;
use core::ops::Neg;
use std::rc::Rc;

use crate::algebra::euclid::extended_gcd;
use crate::algebra::field::{FieldElement, FiniteField};
use crate::error::{Error, Result};
use crate::structures::fp::{FpElem, PrimeField};
use crate::structures::poly::Poly;

/// Name of the adjoined root when elements are printed.
const ROOT: &str = "a";

struct Descriptor {
    base: PrimeField,
    modulus: Poly<FpElem>,
    degree: usize,
    size: u64,
}

/// Descriptor of the extension field F_p[a]/(m(a)).
///
/// # Example
///
/// ```
/// use ffactor::{ExtensionField, FieldElement, FiniteField, PrimeField};
///
/// let f3 = PrimeField::new(3).unwrap();
/// // a^2 + 1 is irreducible over F_3, giving F_9
/// let f9 = ExtensionField::new(f3.poly(&[1, 0, 1])).unwrap();
/// assert_eq!(f9.size(), 9);
///
/// let a = f9.adjoined_root();
/// assert_eq!(a.try_mul(&a).unwrap(), f9.get(-1));
/// ```
#[derive(Clone)]
pub struct ExtensionField {
    inner: Rc<Descriptor>,
}

impl ExtensionField {
    /// Build an extension field, verifying that `modulus` is irreducible.
    ///
    /// The modulus is made monic before use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtensionModulus`] if the modulus is constant,
    /// reducible, or if `p^m` does not fit in a `u64`.
    pub fn new(modulus: Poly<FpElem>) -> Result<Self> {
        let field = Self::new_unchecked(modulus)?;
        if !field.modulus().is_irreducible()? {
            return Err(Error::InvalidExtensionModulus(format!(
                "{} is reducible over {}",
                field.modulus(),
                field.base_field()
            )));
        }
        Ok(field)
    }

    /// Build an extension field without testing irreducibility.
    ///
    /// The caller guarantees that `modulus` is irreducible; with a reducible
    /// modulus the quotient ring has zero divisors and some inverses fail
    /// with [`Error::NotInvertible`].
    pub fn new_unchecked(modulus: Poly<FpElem>) -> Result<Self> {
        let base = *modulus.field();
        let degree = match modulus.degree() {
            Some(d) if d >= 1 => d,
            _ => {
                return Err(Error::InvalidExtensionModulus(format!(
                    "modulus {} must have degree at least 1",
                    modulus
                )))
            }
        };
        let size = u32::try_from(degree)
            .ok()
            .and_then(|d| base.modulus().checked_pow(d))
            .ok_or_else(|| {
                Error::InvalidExtensionModulus(format!(
                    "{}^{} elements do not fit in 64 bits",
                    base.modulus(),
                    degree
                ))
            })?;
        let modulus = modulus.monic()?;

        log::debug!("built extension field F_{} = {}[{}]/({})", size, base, ROOT, modulus);
        Ok(Self {
            inner: Rc::new(Descriptor {
                base,
                modulus,
                degree,
                size,
            }),
        })
    }

    /// The prime field this extension is built over.
    pub fn base_field(&self) -> PrimeField {
        self.inner.base
    }

    /// The monic modulus polynomial.
    pub fn modulus(&self) -> &Poly<FpElem> {
        &self.inner.modulus
    }

    /// The extension degree `m`.
    pub fn degree(&self) -> usize {
        self.inner.degree
    }

    /// The residue class of `residue` modulo the field modulus.
    pub fn element(&self, residue: &Poly<FpElem>) -> Result<FqElem> {
        Ok(FqElem {
            residue: residue.rem(self.modulus())?,
            field: self.clone(),
        })
    }

    /// The class of the indeterminate, a root of the modulus.
    pub fn adjoined_root(&self) -> FqElem {
        let x = Poly::x(&self.inner.base);
        // deg(x) < m unless m == 1, where x reduces to a constant
        let residue = x.rem(self.modulus()).unwrap_or(x);
        FqElem {
            residue,
            field: self.clone(),
        }
    }
}

impl PartialEq for ExtensionField {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.base == other.inner.base && self.inner.modulus == other.inner.modulus)
    }
}

impl Eq for ExtensionField {}

impl FiniteField for ExtensionField {
    type Elem = FqElem;

    fn characteristic(&self) -> u64 {
        self.inner.base.modulus()
    }

    fn size(&self) -> u64 {
        self.inner.size
    }

    fn get(&self, n: i64) -> FqElem {
        FqElem {
            residue: Poly::constant(self.inner.base.get(n)),
            field: self.clone(),
        }
    }

    /// Base-p digits of `index` are the residue coefficients, lowest first.
    fn from_index(&self, index: u64) -> FqElem {
        let p = self.inner.base.modulus();
        let mut rest = index % self.inner.size;
        let mut digits = Vec::with_capacity(self.inner.degree);
        while rest > 0 {
            digits.push((rest % p) as i64);
            rest /= p;
        }
        FqElem {
            residue: Poly::from_i64s(&self.inner.base, &digits),
            field: self.clone(),
        }
    }
}

impl fmt::Debug for ExtensionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtensionField({:?})", self.inner.modulus)
    }
}

impl fmt::Display for ExtensionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]/(", self.inner.base, ROOT)?;
        self.inner.modulus.fmt_with_var(f, ROOT)?;
        write!(f, ")")
    }
}

/// Element of an extension field: a residue polynomial of degree `< m`.
#[derive(Clone, PartialEq, Eq)]
pub struct FqElem {
    residue: Poly<FpElem>,
    field: ExtensionField,
}

impl FqElem {
    /// The canonical residue polynomial.
    pub fn residue(&self) -> &Poly<FpElem> {
        &self.residue
    }

    fn check_same_field(&self, rhs: &Self) -> Result<()> {
        if self.field != rhs.field {
            return Err(Error::incompatible(
                format_args!("{} in {}", self, self.field),
                format_args!("{} in {}", rhs, rhs.field),
            ));
        }
        Ok(())
    }
}

impl FieldElement for FqElem {
    type Field = ExtensionField;

    fn field(&self) -> &ExtensionField {
        &self.field
    }

    fn is_zero(&self) -> bool {
        self.residue.is_zero()
    }

    fn is_one(&self) -> bool {
        self.residue.degree() == Some(0) && self.residue.coeff(0).value() == 1
    }

    fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.check_same_field(rhs)?;
        Ok(Self {
            residue: self.residue.try_add(&rhs.residue)?,
            field: self.field.clone(),
        })
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.check_same_field(rhs)?;
        Ok(Self {
            residue: self.residue.try_sub(&rhs.residue)?,
            field: self.field.clone(),
        })
    }

    /// Polynomial product reduced modulo the field modulus.
    fn try_mul(&self, rhs: &Self) -> Result<Self> {
        self.check_same_field(rhs)?;
        let product = self.residue.try_mul(&rhs.residue)?;
        Ok(Self {
            residue: product.rem(self.field.modulus())?,
            field: self.field.clone(),
        })
    }

    /// Bézout coefficient of the residue against the modulus.
    fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::DivisionByZero(format!(
                "0 has no inverse in {}",
                self.field
            )));
        }
        let bezout = extended_gcd(&self.residue, self.field.modulus())?;
        if bezout.d.degree() != Some(0) {
            return Err(Error::NotInvertible(format!(
                "{} shares the factor {} with the modulus of {}",
                self, bezout.d, self.field
            )));
        }
        Ok(Self {
            residue: bezout.x.rem(self.field.modulus())?,
            field: self.field.clone(),
        })
    }

    fn to_index(&self) -> u64 {
        let p = self.field.characteristic();
        self.residue
            .coefficients()
            .iter()
            .rev()
            .fold(0, |acc, c| acc * p + c.value())
    }
}

impl Neg for FqElem {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            residue: -self.residue,
            field: self.field,
        }
    }
}

impl fmt::Debug for FqElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fq<{}>(", self.field.size())?;
        self.residue.fmt_with_var(f, ROOT)?;
        write!(f, ")")
    }
}

impl fmt::Display for FqElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.residue.fmt_with_var(f, ROOT)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FqElem {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.residue.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f3() -> PrimeField {
        PrimeField::new(3).unwrap()
    }

    /// F_9 = F_3[a]/(a^2 + 1)
    fn f9() -> ExtensionField {
        ExtensionField::new(f3().poly(&[1, 0, 1])).unwrap()
    }

    #[test]
    fn size_and_degree() {
        let f = f9();
        assert_eq!(f.size(), 9);
        assert_eq!(f.degree(), 2);
        assert_eq!(f.characteristic(), 3);
        assert_eq!(f.elements().count(), 9);
    }

    #[test]
    fn root_satisfies_modulus() {
        let f = f9();
        let a = f.adjoined_root();
        let a2 = a.try_mul(&a).unwrap();
        assert_eq!(a2.try_add(&f.one()).unwrap(), f.zero());
    }

    #[test]
    fn modulus_is_made_monic() {
        let f = ExtensionField::new(f3().poly(&[2, 0, 2])).unwrap();
        assert_eq!(f.modulus(), &f3().poly(&[1, 0, 1]));
        assert_eq!(f, f9());
    }

    #[test]
    fn every_nonzero_element_is_invertible() {
        let f = f9();
        for e in f.elements().filter(|e| !e.is_zero()) {
            let inv = e.inverse().unwrap();
            assert!(e.try_mul(&inv).unwrap().is_one(), "{}", e);
            assert_eq!(e.try_div(&e).unwrap(), f.one());
        }
        assert!(matches!(f.zero().inverse(), Err(Error::DivisionByZero(_))));
    }

    #[test]
    fn multiplicative_group_order() {
        // F_4 = F_2[a]/(a^2 + a + 1): every nonzero element has x^3 = 1
        let f2 = PrimeField::new(2).unwrap();
        let f4 = ExtensionField::new(f2.poly(&[1, 1, 1])).unwrap();
        for e in f4.elements().skip(1) {
            assert!(e.pow(3).unwrap().is_one());
        }
    }

    #[test]
    fn index_roundtrip() {
        let f = f9();
        for (i, e) in f.elements().enumerate() {
            assert_eq!(e.to_index(), i as u64);
        }
        // 1 + 2a has digits (1, 2) -> 1 + 2*3
        assert_eq!(f.from_index(7).residue(), &f3().poly(&[1, 2]));
    }

    #[test]
    fn reducible_modulus() {
        // a^2 - 1 = (a - 1)(a + 1)
        let reducible = f3().poly(&[-1, 0, 1]);
        assert!(matches!(
            ExtensionField::new(reducible.clone()),
            Err(Error::InvalidExtensionModulus(_))
        ));

        let ring = ExtensionField::new_unchecked(reducible).unwrap();
        let zero_divisor = ring.element(&f3().poly(&[1, 1])).unwrap();
        assert!(matches!(zero_divisor.inverse(), Err(Error::NotInvertible(_))));
    }

    #[test]
    fn invalid_moduli() {
        assert!(matches!(
            ExtensionField::new_unchecked(f3().poly(&[2])),
            Err(Error::InvalidExtensionModulus(_))
        ));
        assert!(ExtensionField::new_unchecked(Poly::zero(&f3())).is_err());

        let f2 = PrimeField::new(2).unwrap();
        let huge = f2.poly(&[1]).try_add(&Poly::monomial(f2.get(1), 64)).unwrap();
        assert!(matches!(
            ExtensionField::new_unchecked(huge),
            Err(Error::InvalidExtensionModulus(_))
        ));
    }

    #[test]
    fn mixing_fields_fails() {
        let f = f9();
        // a^2 + a + 2 is also irreducible over F_3
        let g = ExtensionField::new(f3().poly(&[2, 1, 1])).unwrap();
        assert_ne!(f, g);
        let a = f.adjoined_root();
        let b = g.adjoined_root();
        assert!(matches!(a.try_add(&b), Err(Error::IncompatibleField { .. })));
        assert!(matches!(a.try_mul(&b), Err(Error::IncompatibleField { .. })));
    }

    #[test]
    fn element_reduces() {
        let f = f9();
        // a^3 = a * a^2 = -a
        let e = f.element(&f3().poly(&[0, 0, 0, 1])).unwrap();
        assert_eq!(e, -f.adjoined_root());
    }

    #[test]
    fn display() {
        let f = f9();
        assert_eq!(f.from_index(7).to_string(), "1 + 2*a");
        assert_eq!(f.to_string(), "F_3[a]/(1 + a^2)");
        assert_eq!(f.get(5).to_string(), "2");
        assert_eq!(f.zero().to_string(), "0");
    }
}
