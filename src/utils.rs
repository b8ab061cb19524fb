//! Number-theoretic primitives on native 64-bit integers.
//!
//! Everything here works for any `u64` modulus without widening to `u128`:
//! products are formed by binary ("Russian peasant") multiplication on top of
//! an overflow-free modular addition.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// Number of Miller–Rabin rounds used when nothing else is configured.
///
/// A composite survives one round with probability at most 1/4, so the
/// default false-positive bound is `4^-35`.
pub const DEFAULT_ROUNDS: u32 = 35;

/// Compute `(a + b) mod m` for `a, b < m` without overflowing.
#[inline]
pub const fn add_mod(a: u64, b: u64, m: u64) -> u64 {
    // a + b >= m  <=>  a >= m - b
    if a >= m - b {
        a - (m - b)
    } else {
        a + b
    }
}

/// Compute `(a * b) mod m` by binary multiplication.
///
/// Walks the bits of `a`, doubling `b` modulo `m` at each step and adding it
/// into the accumulator whenever the current bit is set.
///
/// # Example
///
/// ```
/// use ffactor::utils::mul_mod;
///
/// let p = 9_223_372_036_854_775_783; // largest prime below 2^63
/// assert_eq!(mul_mod(p - 1, p - 1, p), 1);
/// assert_eq!(mul_mod(6, 7, 5), 2);
/// ```
pub const fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    let mut a = a % m;
    let mut b = b % m;
    let mut acc = 0;
    while a != 0 {
        if a & 1 == 1 {
            acc = add_mod(acc, b, m);
        }
        a >>= 1;
        b = add_mod(b, b, m);
    }
    acc
}

/// Compute `base^exp mod m` by square-and-multiply.
///
/// # Example
///
/// ```
/// use ffactor::utils::pow_mod;
///
/// assert_eq!(pow_mod(3, 16, 17), 1); // Fermat
/// assert_eq!(pow_mod(2, 10, 1000), 24);
/// ```
pub const fn pow_mod(base: u64, exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let mut base = base % m;
    let mut result = 1;
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        e >>= 1;
    }
    result
}

/// Extended Euclidean algorithm on signed 64-bit integers.
///
/// Returns `(d, x, y)` with `a*x + b*y = d` and `d = gcd(a, b) >= 0`.
/// Works on `|a|` and `|b|` as unsigned magnitudes and flips the signs of the
/// coefficients back at the end, so every input is accepted. The returned
/// coefficients satisfy `|x| <= |b|/d` and `|y| <= |a|/d`.
///
/// This is the fast path used for prime-field inverses; the generic version
/// lives in [`crate::algebra::euclid`].
///
/// # Errors
///
/// Returns [`Error::Overflow`] when `d = 2^63`, which happens only for
/// `(i64::MIN, 0)`, `(0, i64::MIN)` and `(i64::MIN, i64::MIN)`.
///
/// # Example
///
/// ```
/// use ffactor::utils::extended_gcd_i64;
///
/// let (d, x, y) = extended_gcd_i64(240, -46).unwrap();
/// assert_eq!(d, 2);
/// assert_eq!(240 * x + (-46) * y, 2);
/// ```
pub fn extended_gcd_i64(a: i64, b: i64) -> Result<(i64, i64, i64)> {
    let overflow = || Error::Overflow(format!("extended gcd of {} and {}", a, b));

    // Invariant: r0 = x0*|a| + y0*|b| and r1 = x1*|a| + y1*|b|
    let (mut r0, mut r1) = (a.unsigned_abs(), b.unsigned_abs());
    let (mut x0, mut x1) = (1i64, 0i64);
    let (mut y0, mut y1) = (0i64, 1i64);
    while r1 != 0 {
        let (q, r) = (r0 / r1, r0 % r1);
        if r == 0 {
            // The next pair would be ±|b|/d and ±|a|/d, which may not fit
            (r0, x0, y0) = (r1, x1, y1);
            break;
        }
        // r != 0 forces r1 >= 2, so q < 2^63
        let q = i64::try_from(q).map_err(|_| overflow())?;
        let x = q
            .checked_mul(x1)
            .and_then(|qx| x0.checked_sub(qx))
            .ok_or_else(overflow)?;
        let y = q
            .checked_mul(y1)
            .and_then(|qy| y0.checked_sub(qy))
            .ok_or_else(overflow)?;

        (r0, r1) = (r1, r);
        (x0, x1) = (x1, x);
        (y0, y1) = (y1, y);
    }

    let d = i64::try_from(r0).map_err(|_| overflow())?;
    let x = if a < 0 { -x0 } else { x0 };
    let y = if b < 0 { -y0 } else { y0 };
    Ok((d, x, y))
}

/// Miller–Rabin probabilistic primality test.
///
/// Witnesses are drawn from a [`StdRng`]. By default the generator is seeded
/// from system entropy; [`MillerRabin::seeded`] pins the seed so a run can be
/// reproduced exactly.
///
/// # Example
///
/// ```
/// use ffactor::utils::MillerRabin;
///
/// let test = MillerRabin::default().seeded(7);
/// assert!(test.test(1_000_000_007));
/// assert!(!test.test(561)); // Carmichael number
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillerRabin {
    rounds: u32,
    seed: Option<u64>,
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            seed: None,
        }
    }
}

impl MillerRabin {
    /// A test running `rounds` random witnesses per candidate.
    ///
    /// At least one witness is always tried: `0` is raised to `1`.
    pub const fn new(rounds: u32) -> Self {
        let rounds = if rounds == 0 { 1 } else { rounds };
        Self { rounds, seed: None }
    }

    /// Use a deterministic witness sequence derived from `seed`.
    pub const fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of witnesses tried per candidate.
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// The seed, if the witness sequence is deterministic.
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Test `n` for primality with this configuration.
    pub fn test(&self, n: u64) -> bool {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.test_with(n, &mut rng)
    }

    /// Test `n` for primality drawing witnesses from `rng`.
    pub fn test_with<R: Rng + ?Sized>(&self, n: u64, rng: &mut R) -> bool {
        if n == 2 || n == 3 {
            return true;
        }
        if n < 2 || n % 2 == 0 {
            return false;
        }

        // n - 1 = d * 2^r with d odd
        let mut d = n - 1;
        let mut r = 0u32;
        while d % 2 == 0 {
            d /= 2;
            r += 1;
        }

        'witness: for _ in 0..self.rounds {
            let a = rng.gen_range(2..=n - 2);
            let mut x = pow_mod(a, d, n);
            if x == 1 || x == n - 1 {
                continue;
            }
            for _ in 1..r {
                x = mul_mod(x, x, n);
                if x == n - 1 {
                    continue 'witness;
                }
            }
            // Either a nontrivial square root of 1 or a^(n-1) != 1
            return false;
        }
        true
    }
}

/// Check if `n` is prime with the default Miller–Rabin configuration.
pub fn is_prime(n: u64) -> bool {
    MillerRabin::default().test(n)
}
