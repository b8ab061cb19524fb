use core::fmt;
use core::ops::Neg;

use crate::algebra::field::{FieldElement, FiniteField};
use crate::error::{Error, Result};
use crate::utils::{add_mod, extended_gcd_i64, mul_mod, MillerRabin};

/// Prime field GF(p) with a modulus chosen at runtime.
///
/// The descriptor is a `Copy` handle; two descriptors built from the same
/// modulus compare equal and are fully interchangeable.
///
/// # Example
///
/// ```
/// use ffactor::{FieldElement, PrimeField};
///
/// let f17 = PrimeField::new(17).unwrap();
/// let a = f17.get(5);
/// let b = f17.get(-3); // reduced to 14
/// assert_eq!(a.try_add(&b).unwrap(), f17.get(2));
/// assert!(PrimeField::new(15).is_err());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct PrimeField {
    p: u64,
}

impl PrimeField {
    /// Build F_p, validating `p` with the default Miller–Rabin test.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModulus`] if `p <= 0` or `p` is composite.
    pub fn new(p: i64) -> Result<Self> {
        Self::with_primality(p, &MillerRabin::default())
    }

    /// Build F_p, validating `p` with the given primality test.
    pub fn with_primality(p: i64, test: &MillerRabin) -> Result<Self> {
        if p <= 0 || !test.test(p as u64) {
            return Err(Error::InvalidModulus { modulus: p });
        }
        log::debug!("built prime field F_{} ({} Miller-Rabin rounds)", p, test.rounds());
        Ok(Self { p: p as u64 })
    }

    /// The modulus `p`.
    pub const fn modulus(&self) -> u64 {
        self.p
    }

    /// The element `n mod p`; negative integers are reduced into `[0, p)`.
    pub fn get(&self, n: i64) -> FpElem {
        FpElem {
            value: n.rem_euclid(self.p as i64) as u64,
            field: *self,
        }
    }

    /// The element `n mod p` for an unsigned representative.
    pub fn get_u64(&self, n: u64) -> FpElem {
        FpElem {
            value: n % self.p,
            field: *self,
        }
    }
}

impl FiniteField for PrimeField {
    type Elem = FpElem;

    fn characteristic(&self) -> u64 {
        self.p
    }

    fn size(&self) -> u64 {
        self.p
    }

    fn get(&self, n: i64) -> FpElem {
        PrimeField::get(self, n)
    }

    fn from_index(&self, index: u64) -> FpElem {
        self.get_u64(index)
    }
}

impl fmt::Debug for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimeField({})", self.p)
    }
}

impl fmt::Display for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F_{}", self.p)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PrimeField {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.p.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PrimeField {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let p = i64::deserialize(deserializer)?;
        PrimeField::new(p).map_err(serde::de::Error::custom)
    }
}

/// Element of a prime field, stored as its canonical representative.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FpElem {
    /// Always in `[0, p)`.
    value: u64,
    field: PrimeField,
}

impl FpElem {
    /// Get the representative in `[0, p-1]`.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// The modulus `p` of the owning field.
    pub const fn modulus(&self) -> u64 {
        self.field.p
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

impl FieldElement for FpElem {
    type Field = PrimeField;

    fn field(&self) -> &PrimeField {
        &self.field
    }

    fn is_zero(&self) -> bool {
        self.value == 0
    }

    fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.check_same_field(rhs)?;
        Ok(Self {
            value: add_mod(self.value, rhs.value, self.field.p),
            field: self.field,
        })
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.check_same_field(rhs)?;
        Ok(Self {
            value: add_mod(self.value, (-*rhs).value, self.field.p),
            field: self.field,
        })
    }

    /// Binary multiplication, safe for any modulus below 2^63.
    fn try_mul(&self, rhs: &Self) -> Result<Self> {
        self.check_same_field(rhs)?;
        Ok(Self {
            value: mul_mod(self.value, rhs.value, self.field.p),
            field: self.field,
        })
    }

    /// Inverse through the extended Euclidean algorithm on `(value, p)`.
    ///
    /// # Example
    ///
    /// ```
    /// use ffactor::{FieldElement, PrimeField};
    ///
    /// let f17 = PrimeField::new(17).unwrap();
    /// let a = f17.get(3);
    /// assert_eq!(a.try_mul(&a.inverse().unwrap()).unwrap(), f17.get(1));
    /// assert!(f17.get(0).inverse().is_err());
    /// ```
    fn inverse(&self) -> Result<Self> {
        if self.value == 0 {
            return Err(Error::DivisionByZero(format!(
                "0 has no inverse in {}",
                self.field
            )));
        }
        let p = self.field.p as i64;
        let (_, x, _) = extended_gcd_i64(self.value as i64, p)?;
        Ok(self.field.get(x))
    }

    fn to_index(&self) -> u64 {
        self.value
    }
}

impl Neg for FpElem {
    type Output = Self;

    fn neg(self) -> Self::Output {
        let value = if self.value == 0 {
            0
        } else {
            self.field.p - self.value
        };
        Self {
            value,
            field: self.field,
        }
    }
}

impl fmt::Debug for FpElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp<{}>({})", self.field.p, self.value)
    }
}

impl fmt::Display for FpElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FpElem {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f17() -> PrimeField {
        PrimeField::new(17).unwrap()
    }

    #[test]
    fn rejects_bad_moduli() {
        for p in [0i64, -7, 1, 4, 15, 561] {
            assert_eq!(PrimeField::new(p), Err(Error::InvalidModulus { modulus: p }));
        }
        assert!(PrimeField::new(2).is_ok());
        assert!(PrimeField::new(9_223_372_036_854_775_783).is_ok());
    }

    #[test]
    fn zero_round_primality_test_rejects_composites() {
        let err = PrimeField::with_primality(9, &MillerRabin::new(0)).unwrap_err();
        assert_eq!(err, Error::InvalidModulus { modulus: 9 });
        assert!(PrimeField::with_primality(9, &MillerRabin::new(0).seeded(11)).is_err());
        assert!(PrimeField::with_primality(7, &MillerRabin::new(0)).is_ok());
    }

    #[test]
    fn equal_moduli_are_interchangeable() {
        let a = PrimeField::new(13).unwrap().get(5);
        let b = PrimeField::new(13).unwrap().get(9);
        assert_eq!(a.try_add(&b).unwrap().value(), 1);
    }

    #[test]
    fn get_reduces() {
        let f = f17();
        assert_eq!(f.get(17).value(), 0);
        assert_eq!(f.get(20).value(), 3);
        assert_eq!(f.get(-1).value(), 16);
        assert_eq!(f.get(-35).value(), 16);
        assert_eq!(f.get(i64::MIN).value(), i64::MIN.rem_euclid(17) as u64);
    }

    #[test]
    fn arithmetic() {
        let f = f17();
        let a = f.get(5);
        let b = f.get(15);
        assert_eq!(a.try_add(&b).unwrap(), f.get(3));
        assert_eq!(a.try_sub(&b).unwrap(), f.get(7));
        assert_eq!(b.try_sub(&a).unwrap(), f.get(10));
        assert_eq!(a.try_mul(&b).unwrap(), f.get(75));
        assert_eq!(-a, f.get(12));
        assert_eq!(-f.get(0), f.get(0));
        assert_eq!(a.try_div(&b).unwrap().try_mul(&b).unwrap(), a);
    }

    #[test]
    fn mixing_fields_fails() {
        let a = f17().get(3);
        let b = PrimeField::new(19).unwrap().get(3);
        assert!(matches!(a.try_add(&b), Err(Error::IncompatibleField { .. })));
        assert!(matches!(a.try_sub(&b), Err(Error::IncompatibleField { .. })));
        assert!(matches!(a.try_mul(&b), Err(Error::IncompatibleField { .. })));
        assert!(matches!(a.try_div(&b), Err(Error::IncompatibleField { .. })));
        assert_ne!(a, b);
    }

    #[test]
    fn incompatible_error_names_values() {
        let a = f17().get(3);
        let b = PrimeField::new(19).unwrap().get(4);
        let message = a.try_add(&b).unwrap_err().to_string();
        assert!(message.contains("3 in F_17"), "{}", message);
        assert!(message.contains("4 in F_19"), "{}", message);
    }

    #[test]
    fn division_by_zero() {
        let f = f17();
        assert!(matches!(f.get(0).inverse(), Err(Error::DivisionByZero(_))));
        assert!(matches!(f.get(4).try_div(&f.get(0)), Err(Error::DivisionByZero(_))));
    }

    #[test]
    fn inverses_in_large_field() {
        let f = PrimeField::new(9_223_372_036_854_775_783).unwrap();
        for v in [1i64, 2, 3, 1 << 40, 9_223_372_036_854_775_782] {
            let a = f.get(v);
            assert!(a.try_mul(&a.inverse().unwrap()).unwrap().is_one());
        }
    }

    #[test]
    fn pow_and_fermat() {
        let f = f17();
        let a = f.get(3);
        assert_eq!(a.pow(0).unwrap(), f.one());
        assert_eq!(a.pow(16).unwrap(), f.one());
        assert_eq!(a.pow(2).unwrap(), f.get(9));
    }

    #[test]
    fn enumeration() {
        let f = PrimeField::new(5).unwrap();
        let values: Vec<u64> = f.elements().map(|e| e.value()).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
        assert_eq!(f.elements().count(), 5);
    }

    #[test]
    fn display() {
        let f = f17();
        assert_eq!(f.get(-1).to_string(), "16");
        assert_eq!(format!("{:?}", f.get(2)), "Fp<17>(2)");
        assert_eq!(f.to_string(), "F_17");
        assert_eq!(f.get(2).field_size(), 17);
    }
}
