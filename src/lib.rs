//! Arithmetic over finite fields and polynomial factorization.
//!
//! Prime fields F_p and extension fields F_q = F_p[a]/(m(a)) are built at
//! runtime from their modulus. Polynomials over either kind of field can be
//! divided, reduced, and factored with Berlekamp's algorithm.
//!
//! ```
//! use ffactor::{factor, FiniteField, PrimeField};
//!
//! let f5 = PrimeField::new(5).unwrap();
//! let f = f5.poly(&[-1, 0, 1]); // x^2 - 1
//! let factors = factor(&f).unwrap();
//! assert_eq!(factors, vec![(f5.poly(&[1, 1]), 1), (f5.poly(&[-1, 1]), 1)]);
//! ```

pub mod algebra;
pub mod error;
pub mod factor;
pub mod structures;
pub mod utils;

pub use algebra::euclid::{extended_gcd, gcd, Bezout, EuclideanDomain};
pub use algebra::field::{Elements, FieldElement, FiniteField};
pub use error::{Error, Result};

pub use factor::{berlekamp, factor, kernel_basis, q_matrix, square_free_factorization};
pub use structures::fp::{FpElem, PrimeField};
pub use structures::fq::{ExtensionField, FqElem};
pub use structures::matrix::Matrix;
pub use structures::poly::Poly;
pub use utils::{is_prime, MillerRabin};
