use thiserror::Error;

/// Errors raised by field, polynomial and factorization operations.
///
/// Every variant is a broken precondition on the caller's side: none of them
/// is transient, so they are surfaced immediately and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The modulus of a prime field is non-positive or composite.
    #[error("cannot build F_p: modulus {modulus} is not a positive prime")]
    InvalidModulus { modulus: i64 },

    /// The modulus polynomial of an extension field is unusable.
    #[error("invalid extension modulus: {0}")]
    InvalidExtensionModulus(String),

    /// A binary operation mixed elements of two different fields.
    #[error("incompatible fields: {lhs} and {rhs}")]
    IncompatibleField { lhs: String, rhs: String },

    /// Inverse or division requested on a zero element or polynomial.
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    /// Greatest common divisor requested on two zero elements.
    #[error("gcd of two zero elements is undefined")]
    UndefinedGcd,

    /// A nonzero element has no inverse (the extension modulus is reducible).
    #[error("{0} is not invertible")]
    NotInvertible(String),

    /// An integer result does not fit in 64 bits.
    #[error("integer overflow in {0}")]
    Overflow(String),

    /// The zero polynomial has no factorization.
    #[error("cannot factor the zero polynomial")]
    ZeroPolynomial,
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    pub(crate) fn incompatible(lhs: impl ToString, rhs: impl ToString) -> Self {
        Error::IncompatibleField {
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
        }
    }
}
