use core::fmt;

use crate::algebra::field::{FieldElement, FiniteField};
use crate::error::{Error, Result};

/// Dense square matrix over a finite field, stored row by row.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix<E: FieldElement> {
    rows: Vec<Vec<E>>,
    field: E::Field,
}

impl<E: FieldElement> Matrix<E> {
    /// The `n × n` zero matrix.
    pub fn zero(field: &E::Field, n: usize) -> Self {
        Self {
            rows: vec![vec![field.zero(); n]; n],
            field: field.clone(),
        }
    }

    /// The `n × n` identity matrix.
    pub fn identity(field: &E::Field, n: usize) -> Self {
        let mut m = Self::zero(field, n);
        for i in 0..n {
            m.rows[i][i] = field.one();
        }
        m
    }

    /// Build a matrix from rows that are already `n` long and in `field`.
    pub(crate) fn from_rows(field: &E::Field, rows: Vec<Vec<E>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == rows.len()));
        Self {
            rows,
            field: field.clone(),
        }
    }

    /// Number of rows (and columns).
    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    pub fn field(&self) -> &E::Field {
        &self.field
    }

    pub fn get(&self, i: usize, j: usize) -> &E {
        &self.rows[i][j]
    }

    pub fn row(&self, i: usize) -> &[E] {
        &self.rows[i]
    }

    pub fn rows(&self) -> &[Vec<E>] {
        &self.rows
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: E) {
        self.rows[i][j] = value;
    }

    fn check_compatible(&self, rhs: &Self) -> Result<()> {
        if self.field != rhs.field || self.dim() != rhs.dim() {
            return Err(Error::incompatible(
                format_args!("{}x{} matrix over {}", self.dim(), self.dim(), self.field),
                format_args!("{}x{} matrix over {}", rhs.dim(), rhs.dim(), rhs.field),
            ));
        }
        Ok(())
    }

    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.check_compatible(rhs)?;
        let rows = self
            .rows
            .iter()
            .zip(&rhs.rows)
            .map(|(a, b)| a.iter().zip(b).map(|(x, y)| x.try_sub(y)).collect())
            .collect::<Result<Vec<Vec<E>>>>()?;
        Ok(Self::from_rows(&self.field, rows))
    }

    pub fn try_mul(&self, rhs: &Self) -> Result<Self> {
        self.check_compatible(rhs)?;
        let n = self.dim();
        let mut product = Self::zero(&self.field, n);
        for i in 0..n {
            for k in 0..n {
                let a = &self.rows[i][k];
                if a.is_zero() {
                    continue;
                }
                for j in 0..n {
                    let term = a.try_mul(&rhs.rows[k][j])?;
                    product.rows[i][j] = product.rows[i][j].try_add(&term)?;
                }
            }
        }
        Ok(product)
    }
}

impl<E: FieldElement> fmt::Debug for Matrix<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows.iter().map(|row| {
                row.iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            }))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::fp::{FpElem, PrimeField};

    #[test]
    fn identity_is_neutral() {
        let f = PrimeField::new(7).unwrap();
        let rows = vec![
            vec![f.get(1), f.get(2)],
            vec![f.get(3), f.get(4)],
        ];
        let m = Matrix::from_rows(&f, rows);
        let id = Matrix::identity(&f, 2);
        assert_eq!(m.try_mul(&id).unwrap(), m);
        assert_eq!(id.try_mul(&m).unwrap(), m);
        assert_eq!(m.try_sub(&m).unwrap(), Matrix::zero(&f, 2));
    }

    #[test]
    fn product() {
        let f = PrimeField::new(7).unwrap();
        let m = Matrix::from_rows(&f, vec![vec![f.get(1), f.get(2)], vec![f.get(3), f.get(4)]]);
        // [[7, 10], [15, 22]] mod 7
        let expected = Matrix::from_rows(
            &f,
            vec![vec![f.get(0), f.get(3)], vec![f.get(1), f.get(1)]],
        );
        assert_eq!(m.try_mul(&m).unwrap(), expected);
    }

    #[test]
    fn row_access() {
        let f = PrimeField::new(5).unwrap();
        let m = Matrix::from_rows(&f, vec![vec![f.get(1), f.get(2)], vec![f.get(3), f.get(4)]]);
        assert_eq!(m.row(1), &[f.get(3), f.get(4)][..]);
        assert_eq!(m.rows().len(), 2);
        assert_eq!(m.rows()[0], vec![f.get(1), f.get(2)]);
        assert_eq!(Matrix::<FpElem>::identity(&f, 3).row(2), &[f.zero(), f.zero(), f.one()][..]);
    }

    #[test]
    fn dimension_mismatch() {
        let f = PrimeField::new(7).unwrap();
        let a = Matrix::<FpElem>::identity(&f, 2);
        let b = Matrix::identity(&f, 3);
        assert!(a.try_mul(&b).is_err());
    }
}
