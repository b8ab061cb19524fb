//! Factorization of polynomials over finite fields.
//!
//! The core is Berlekamp's algorithm for square-free polynomials. For a
//! square-free `f` of degree `n` over F_q, the polynomials `v` of degree
//! `< n` with `v^q ≡ v (mod f)` form a vector space whose dimension is the
//! number of irreducible factors of `f`, and for any nonconstant such `v`
//!
//! ```text
//! f = ∏_{s ∈ F_q} gcd(v - s, f)
//! ```
//!
//! The space is the left kernel of `Q - I`, where row `i` of `Q` holds the
//! coefficients of `x^(i·q) mod f`.
//!
//! [`square_free_factorization`] and [`factor`] extend this to arbitrary
//! nonzero polynomials.

use crate::algebra::euclid::gcd;
use crate::algebra::field::{FieldElement, FiniteField};
use crate::error::{Error, Result};
use crate::structures::matrix::Matrix;
use crate::structures::poly::Poly;

/// Build the `n × n` Berlekamp matrix of `pol`.
///
/// Row `i` holds the coefficients of `x^(i·q) mod pol`, where `q` is the
/// size of the coefficient field and `n = deg(pol)`. `x^q mod pol` is found
/// by repeated squaring and every further row costs one product, so the
/// matrix takes O(log(q)·n² + n³) field operations.
///
/// # Errors
///
/// Returns [`Error::ZeroPolynomial`] for the zero polynomial.
pub fn q_matrix<E: FieldElement>(pol: &Poly<E>) -> Result<Matrix<E>> {
    let n = pol.degree().ok_or(Error::ZeroPolynomial)?;
    let field = pol.field();

    let x_q = Poly::x(field).pow_mod(field.size(), pol)?;
    let mut power = Poly::one(field).rem(pol)?;
    let mut rows = Vec::with_capacity(n);
    for _ in 0..n {
        rows.push((0..n).map(|j| power.coeff(j)).collect());
        power = power.try_mul(&x_q)?.rem(pol)?;
    }

    Ok(Matrix::from_rows(field, rows))
}

/// Column-reduce `matrix` into an idempotent matrix with the same left kernel.
///
/// Rows are scanned top to bottom. For each row the lowest column not yet
/// used as a pivot with a nonzero entry becomes the pivot: it is scaled to
/// 1 there and the row is cleared in every other column. Column operations
/// leave the left kernel unchanged. Rows without a pivot are skipped; their
/// entries in the unused columns are already zero.
///
/// Moving the pivot column of row `k` to position `k` and zeroing the rest
/// gives `E` with `E² = E`, so the rows of `I - E` span the left kernel.
fn reduce_idempotent<E: FieldElement>(matrix: &Matrix<E>) -> Result<Matrix<E>> {
    let n = matrix.dim();
    let field = matrix.field();
    let mut m = matrix.clone();
    let mut used = vec![false; n];
    let mut pivot_of_row = vec![None; n];

    for k in 0..n {
        let Some(j) = (0..n).find(|&j| !used[j] && !m.get(k, j).is_zero()) else {
            continue;
        };

        let inv = m.get(k, j).inverse()?;
        for r in 0..n {
            let scaled = m.get(r, j).try_mul(&inv)?;
            m.set(r, j, scaled);
        }

        for i in (0..n).filter(|&i| i != j) {
            let factor = m.get(k, i).clone();
            if factor.is_zero() {
                continue;
            }
            for r in 0..n {
                let updated = m.get(r, i).try_sub(&factor.try_mul(m.get(r, j))?)?;
                m.set(r, i, updated);
            }
        }

        used[j] = true;
        pivot_of_row[k] = Some(j);
    }

    let mut reduced = Matrix::zero(field, n);
    for (k, pivot) in pivot_of_row.iter().enumerate() {
        if let Some(j) = *pivot {
            for r in 0..n {
                reduced.set(r, k, m.get(r, j).clone());
            }
        }
    }
    Ok(reduced)
}

/// Basis of the left kernel `{v : v·matrix = 0}` of a square matrix.
///
/// The basis vectors are the nonzero rows of `I - E`, with `E` the
/// idempotent reduction of `matrix`. For a Berlekamp matrix `Q - I` the
/// first vector is always `(1, 0, …, 0)`.
pub fn kernel_basis<E: FieldElement>(matrix: &Matrix<E>) -> Result<Vec<Vec<E>>> {
    let n = matrix.dim();
    let field = matrix.field();
    let reduced = reduce_idempotent(matrix)?;

    let mut basis = Vec::new();
    for i in 0..n {
        let row = (0..n)
            .map(|j| {
                let identity = if i == j { field.one() } else { field.zero() };
                identity.try_sub(reduced.get(i, j))
            })
            .collect::<Result<Vec<E>>>()?;
        if row.iter().any(|c| !c.is_zero()) {
            basis.push(row);
        }
    }
    Ok(basis)
}

/// Factor a square-free polynomial with Berlekamp's algorithm.
///
/// Returns the monic irreducible factors of `pol`, sorted by degree and then
/// by coefficients. The leading coefficient of `pol` is dropped, so the
/// product of the factors is `pol.monic()`. A constant polynomial has no
/// factors.
///
/// The splitting step tries every element of the coefficient field, so this
/// is meant for small fields.
///
/// `pol` must be square-free (see [`Poly::is_square_free`]); otherwise the
/// output is unspecified. Use [`factor`] for arbitrary input.
///
/// # Errors
///
/// Returns [`Error::ZeroPolynomial`] for the zero polynomial.
///
/// # Example
///
/// ```
/// use ffactor::{berlekamp, FiniteField, PrimeField};
///
/// let f5 = PrimeField::new(5).unwrap();
/// let factors = berlekamp(&f5.poly(&[-1, 0, 1])).unwrap(); // x^2 - 1
/// assert_eq!(factors, vec![f5.poly(&[1, 1]), f5.poly(&[-1, 1])]);
/// ```
pub fn berlekamp<E: FieldElement>(pol: &Poly<E>) -> Result<Vec<Poly<E>>> {
    let n = match pol.degree() {
        None => return Err(Error::ZeroPolynomial),
        Some(0) => return Ok(Vec::new()),
        Some(n) => n,
    };
    let field = pol.field().clone();
    let pol = pol.monic()?;
    if n == 1 {
        return Ok(vec![pol]);
    }

    let fixed = q_matrix(&pol)?.try_sub(&Matrix::identity(&field, n))?;
    let basis = kernel_basis(&fixed)?;
    let k = basis.len();
    log::debug!(
        "berlekamp: degree {} over {} (q = {}), {} irreducible factors",
        n,
        field,
        field.size(),
        k
    );

    let mut factors = vec![pol];
    // The first basis vector is the constant 1 and never splits anything
    'split: for v in basis.into_iter().skip(1) {
        if factors.len() == k {
            break;
        }
        let v = Poly::new(&field, v)?;

        let mut i = 0;
        while i < factors.len() {
            for s in field.elements() {
                if factors[i].degree() <= Some(1) {
                    break;
                }
                let g = gcd(&v.try_sub(&Poly::constant(s))?, &factors[i])?;
                if g.degree() > Some(0) && g.degree() < factors[i].degree() {
                    let quotient = factors[i].div_rem(&g)?.0;
                    log::trace!("berlekamp: {} = ({}) * ({})", factors[i], g, quotient);
                    factors[i] = quotient;
                    factors.push(g);
                    if factors.len() == k {
                        break 'split;
                    }
                }
            }
            i += 1;
        }
    }

    if factors.len() < k {
        log::warn!(
            "berlekamp: found {} of {} factors; is the input square-free?",
            factors.len(),
            k
        );
    }

    factors.sort_by_cached_key(sort_key);
    Ok(factors)
}

/// Square-free decomposition.
///
/// Returns pairs `(g, i)` with every `g` monic, square-free, nonconstant and
/// pairwise coprime, such that `∏ g^i = f.monic()`.
///
/// Works in any characteristic: when the derivative vanishes the polynomial
/// is a p-th power and its p-th root is decomposed instead.
///
/// # Errors
///
/// Returns [`Error::ZeroPolynomial`] for the zero polynomial.
pub fn square_free_factorization<E: FieldElement>(f: &Poly<E>) -> Result<Vec<(Poly<E>, usize)>> {
    if f.is_zero() {
        return Err(Error::ZeroPolynomial);
    }
    let f = f.monic()?;
    if f.degree() == Some(0) {
        return Ok(Vec::new());
    }

    let p = f.field().characteristic() as usize;
    let mut result = Vec::new();
    let df = f.derivative()?;

    if df.is_zero() {
        // f(x) = g(x^p) = h(x)^p
        for (factor, multiplicity) in square_free_factorization(&pth_root(&f)?)? {
            result.push((factor, multiplicity * p));
        }
        return Ok(result);
    }

    // Yun's loop: w collects the factors of multiplicity >= i
    let mut c = gcd(&f, &df)?;
    let mut w = f.div_rem(&c)?.0;
    let mut i = 1;
    while w.degree() > Some(0) {
        let y = gcd(&w, &c)?;
        let z = w.div_rem(&y)?.0;
        if z.degree() > Some(0) {
            result.push((z.monic()?, i));
        }
        c = c.div_rem(&y)?.0;
        w = y;
        i += 1;
    }

    // What is left has multiplicities divisible by p
    if c.degree() > Some(0) {
        for (factor, multiplicity) in square_free_factorization(&pth_root(&c)?)? {
            result.push((factor, multiplicity * p));
        }
    }

    Ok(result)
}

/// Given `f(x) = Σ a_i x^(ip)`, compute `Σ a_i^(1/p) x^i`.
///
/// In F_q the p-th root of `a` is `a^(q/p)`.
fn pth_root<E: FieldElement>(f: &Poly<E>) -> Result<Poly<E>> {
    let field = f.field();
    let p = field.characteristic();
    let exp = field.size() / p;
    let coeffs = f
        .coefficients()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i as u64 % p == 0)
        .map(|(_, c)| c.pow(exp))
        .collect::<Result<Vec<E>>>()?;
    Poly::new(field, coeffs)
}

/// Complete factorization into monic irreducible factors.
///
/// Returns `(factor, multiplicity)` pairs sorted by degree and then by
/// coefficients; the product of `factor^multiplicity` is `f.monic()`.
///
/// # Example
///
/// ```
/// use ffactor::{factor, FiniteField, PrimeField};
///
/// let f3 = PrimeField::new(3).unwrap();
/// // (x + 1)^3 = x^3 + 1 in characteristic 3
/// let factors = factor(&f3.poly(&[1, 0, 0, 1])).unwrap();
/// assert_eq!(factors, vec![(f3.poly(&[1, 1]), 3)]);
/// ```
pub fn factor<E: FieldElement>(f: &Poly<E>) -> Result<Vec<(Poly<E>, usize)>> {
    let mut result = Vec::new();
    for (part, multiplicity) in square_free_factorization(f)? {
        for irreducible in berlekamp(&part)? {
            result.push((irreducible, multiplicity));
        }
    }
    result.sort_by_cached_key(|(g, multiplicity)| (sort_key(g), *multiplicity));
    Ok(result)
}

/// Order by degree, then by coefficient indices from the constant term up.
fn sort_key<E: FieldElement>(p: &Poly<E>) -> (Option<usize>, Vec<u64>) {
    let coeffs = p.coefficients().iter().map(|c| c.to_index()).collect();
    (p.degree(), coeffs)
}

impl<E: FieldElement> Poly<E> {
    /// Whether the polynomial has no repeated irreducible factor.
    ///
    /// Constants are square-free, the zero polynomial is not.
    pub fn is_square_free(&self) -> Result<bool> {
        match self.degree() {
            None => return Ok(false),
            Some(0) => return Ok(true),
            _ => {}
        }
        let df = self.derivative()?;
        if df.is_zero() {
            return Ok(false);
        }
        Ok(gcd(self, &df)?.degree() == Some(0))
    }

    /// Test if this polynomial is irreducible over its coefficient field.
    ///
    /// A polynomial of degree `n >= 2` is irreducible if and only if it is
    /// square-free and its Berlekamp kernel is one-dimensional.
    ///
    /// Returns `false` for constant or zero polynomials.
    ///
    /// # Example
    ///
    /// ```
    /// use ffactor::{FiniteField, PrimeField};
    ///
    /// let f17 = PrimeField::new(17).unwrap();
    ///
    /// // x^2 - 3 is irreducible over F_17 (3 is not a quadratic residue)
    /// assert!(f17.poly(&[-3, 0, 1]).is_irreducible().unwrap());
    ///
    /// // x^2 - 4 = (x - 2)(x + 2)
    /// assert!(!f17.poly(&[-4, 0, 1]).is_irreducible().unwrap());
    /// ```
    pub fn is_irreducible(&self) -> Result<bool> {
        let n = match self.degree() {
            None | Some(0) => return Ok(false),
            Some(1) => return Ok(true),
            Some(n) => n,
        };
        if !self.is_square_free()? {
            return Ok(false);
        }
        let f = self.monic()?;
        let fixed = q_matrix(&f)?.try_sub(&Matrix::identity(f.field(), n))?;
        Ok(kernel_basis(&fixed)?.len() == 1)
    }

    /// Irreducible factors of a square-free polynomial; see [`berlekamp`].
    pub fn berlekamp(&self) -> Result<Vec<Self>> {
        berlekamp(self)
    }

    /// See [`square_free_factorization`].
    pub fn square_free_factorization(&self) -> Result<Vec<(Self, usize)>> {
        square_free_factorization(self)
    }

    /// See [`factor`].
    pub fn factor(&self) -> Result<Vec<(Self, usize)>> {
        factor(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::fp::{FpElem, PrimeField};
    use crate::structures::fq::ExtensionField;

    fn field(p: i64) -> PrimeField {
        PrimeField::new(p).unwrap()
    }

    /// Row-by-row construction: multiply by x once per step and keep every
    /// q-th power. Requires a monic `pol`.
    fn q_matrix_stepwise(pol: &Poly<FpElem>) -> Matrix<FpElem> {
        let f = *pol.field();
        let n = pol.degree().unwrap();
        let q = f.size() as usize;
        let mut r = vec![f.zero(); n];
        r[0] = f.one();
        let mut rows = vec![r.clone()];
        for i in 1..=(n - 1) * q {
            let top = r[n - 1];
            for j in (1..n).rev() {
                r[j] = r[j - 1].try_sub(&top.try_mul(&pol.coeff(j)).unwrap()).unwrap();
            }
            r[0] = -top.try_mul(&pol.coeff(0)).unwrap();
            if i % q == 0 {
                rows.push(r.clone());
            }
        }
        Matrix::from_rows(&f, rows)
    }

    #[test]
    fn q_matrix_matches_stepwise_construction() {
        let f = field(5);
        let cases: [&[i64]; 4] = [
            &[1, 2, 0, 1],
            &[3, 0, 1, 4, 1],
            &[-1, 0, 1],
            &[2, 1, 1, 0, 0, 1],
        ];
        for coeffs in cases {
            let pol = f.poly(coeffs);
            assert_eq!(q_matrix(&pol).unwrap(), q_matrix_stepwise(&pol), "pol = {}", pol);
        }
    }

    #[test]
    fn q_matrix_first_row_is_one() {
        let f = field(7);
        let m = q_matrix(&f.poly(&[1, 2, 3, 1])).unwrap();
        assert_eq!(m.dim(), 3);
        assert!(m.get(0, 0).is_one());
        assert!(m.get(0, 1).is_zero() && m.get(0, 2).is_zero());
    }

    #[test]
    fn reduction_is_idempotent() {
        let f = field(7);
        let pol = Poly::from_roots(&f, &[f.get(1), f.get(2), f.get(3), f.get(4)]).unwrap();
        let fixed = q_matrix(&pol).unwrap().try_sub(&Matrix::identity(&f, 4)).unwrap();
        let reduced = reduce_idempotent(&fixed).unwrap();
        assert_eq!(reduced.try_mul(&reduced).unwrap(), reduced);
    }

    #[test]
    fn kernel_vectors_are_fixed_by_frobenius() {
        let f = field(3);
        // (x^2 + 1)(x + 1)(x^3 + 2x + 1), all irreducible over F_3
        let pol = f
            .poly(&[1, 0, 1])
            .try_mul(&f.poly(&[1, 1]))
            .unwrap()
            .try_mul(&f.poly(&[1, 2, 0, 1]))
            .unwrap();
        let n = pol.degree().unwrap();
        let fixed = q_matrix(&pol).unwrap().try_sub(&Matrix::identity(&f, n)).unwrap();
        let basis = kernel_basis(&fixed).unwrap();

        assert_eq!(basis.len(), 3);
        assert_eq!(basis[0][0], f.one());
        assert!(basis[0][1..].iter().all(|c| c.is_zero()));
        for v in basis {
            let v = Poly::new(&f, v).unwrap();
            assert_eq!(v.pow_mod(3, &pol).unwrap(), v, "v = {}", v);
        }
    }

    #[test]
    fn kernel_of_zero_and_identity() {
        let f = field(5);
        assert_eq!(kernel_basis(&Matrix::<FpElem>::zero(&f, 3)).unwrap().len(), 3);
        assert!(kernel_basis(&Matrix::<FpElem>::identity(&f, 3)).unwrap().is_empty());
    }

    #[test]
    fn berlekamp_splits_linear_factors() {
        let f = field(5);
        let factors = berlekamp(&f.poly(&[-1, 0, 1])).unwrap();
        assert_eq!(factors, vec![f.poly(&[1, 1]), f.poly(&[-1, 1])]);
    }

    #[test]
    fn berlekamp_keeps_irreducible_input() {
        let f = field(3);
        let pol = f.poly(&[1, 0, 1]);
        assert_eq!(berlekamp(&pol).unwrap(), vec![pol.clone()]);
        // non-monic input comes back monic
        let scaled = pol.scale(&f.get(2)).unwrap();
        assert_eq!(berlekamp(&scaled).unwrap(), vec![pol]);
    }

    #[test]
    fn berlekamp_mixed_degrees_over_f2() {
        // x^5 + x^4 + 1 = (x^2 + x + 1)(x^3 + x + 1)
        let f = field(2);
        let factors = berlekamp(&f.poly(&[1, 0, 0, 0, 1, 1])).unwrap();
        assert_eq!(factors, vec![f.poly(&[1, 1, 1]), f.poly(&[1, 1, 0, 1])]);
    }

    #[test]
    fn berlekamp_over_extension_field() {
        // Over F_9 = F_3[a]/(a^2 + 1), x^2 + 1 = (x - a)(x + a)
        let f3 = field(3);
        let f9 = ExtensionField::new(f3.poly(&[1, 0, 1])).unwrap();
        let a = f9.adjoined_root();
        let pol = f9.poly(&[1, 0, 1]);

        let factors = berlekamp(&pol).unwrap();
        assert_eq!(factors.len(), 2);
        let expected = [
            Poly::new(&f9, vec![-a.clone(), f9.one()]).unwrap(),
            Poly::new(&f9, vec![a, f9.one()]).unwrap(),
        ];
        for e in &expected {
            assert!(factors.contains(e), "missing {}", e);
        }
    }

    #[test]
    fn berlekamp_edge_inputs() {
        let f = field(7);
        assert_eq!(berlekamp(&Poly::<FpElem>::zero(&f)), Err(Error::ZeroPolynomial));
        assert!(berlekamp(&f.poly(&[3])).unwrap().is_empty());
        assert_eq!(berlekamp(&f.poly(&[2, 4])).unwrap(), vec![f.poly(&[4, 1])]);
    }

    #[test]
    fn irreducibility() {
        let f = field(17);
        assert!(f.poly(&[-3, 0, 1]).is_irreducible().unwrap());
        assert!(!f.poly(&[-4, 0, 1]).is_irreducible().unwrap());
        // 2x^2 - 6 = 2(x^2 - 3)
        assert!(f.poly(&[-6, 0, 2]).is_irreducible().unwrap());
        assert!(!Poly::<FpElem>::zero(&f).is_irreducible().unwrap());
        assert!(!f.poly(&[5]).is_irreducible().unwrap());
        assert!(f.poly(&[5, 1]).is_irreducible().unwrap());
        // (x - 1)^2 has a one-dimensional kernel but is not square-free
        assert!(!f.poly(&[1, -2, 1]).is_irreducible().unwrap());
        // x^17 has a vanishing derivative
        assert!(!Poly::monomial(f.get(1), 17).is_irreducible().unwrap());
    }

    #[test]
    fn irreducible_cubics_over_f2() {
        let f = field(2);
        assert!(f.poly(&[1, 1, 0, 1]).is_irreducible().unwrap());
        assert!(f.poly(&[1, 0, 1, 1]).is_irreducible().unwrap());
        assert!(!f.poly(&[1, 0, 0, 1]).is_irreducible().unwrap()); // (x + 1)(x^2 + x + 1)
    }

    #[test]
    fn square_free_decomposition() {
        let f = field(17);
        let x1 = f.poly(&[-1, 1]);
        let x2 = f.poly(&[-2, 1]);
        let pol = x1.try_mul(&x1).unwrap().try_mul(&x2).unwrap();

        let parts = square_free_factorization(&pol).unwrap();
        assert_eq!(parts, vec![(x2, 1), (x1, 2)]);
        assert!(!pol.is_square_free().unwrap());
    }

    #[test]
    fn square_free_decomposition_with_pth_powers() {
        // (x + 1)^3 (x + 2) over F_3
        let f = field(3);
        let x1 = f.poly(&[1, 1]);
        let x2 = f.poly(&[2, 1]);
        let pol = x1.try_mul(&x1).unwrap().try_mul(&x1).unwrap().try_mul(&x2).unwrap();

        let parts = square_free_factorization(&pol).unwrap();
        assert_eq!(parts, vec![(x2, 1), (x1, 3)]);
    }

    #[test]
    fn pth_root_in_extension_field() {
        // Over F_4 = F_2[a]/(a^2 + a + 1): (x + a)^2 = x^2 + a^2
        let f2 = field(2);
        let f4 = ExtensionField::new(f2.poly(&[1, 1, 1])).unwrap();
        let a = f4.adjoined_root();
        let linear = Poly::new(&f4, vec![a, f4.one()]).unwrap();
        let square = linear.try_mul(&linear).unwrap();
        assert!(square.derivative().unwrap().is_zero());
        assert_eq!(pth_root(&square).unwrap(), linear);
        assert_eq!(factor(&square).unwrap(), vec![(linear, 2)]);
    }

    #[test]
    fn full_factorization() {
        // (x - 1)^2 (x^2 + 1) over F_3
        let f = field(3);
        let x1 = f.poly(&[-1, 1]);
        let q = f.poly(&[1, 0, 1]);
        let pol = x1.try_mul(&x1).unwrap().try_mul(&q).unwrap().scale(&f.get(2)).unwrap();

        assert_eq!(factor(&pol).unwrap(), vec![(x1, 2), (q, 1)]);
        assert_eq!(factor(&Poly::<FpElem>::zero(&f)), Err(Error::ZeroPolynomial));
        assert!(factor(&f.poly(&[2])).unwrap().is_empty());
    }
}
