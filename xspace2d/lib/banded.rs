//! LU factorization of banded complex matrices without pivoting.
//!
//! The implicit Crank-Nicolson operator on an `(M - 2) × (M - 2)` interior is
//! strictly diagonally dominant with half-bandwidth `M - 2`, so Gaussian
//! elimination needs no row exchanges and all fill-in stays inside the band.
//! Storage is `n × (2 b + 1)` for half-bandwidth `b`, compared to `n²` for a
//! dense factorization.

use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    Arr1,
    error::{ LengthError, SolveError },
    sparse::CsrMatrix,
};

pub type SolveResult<T> = Result<T, SolveError>;

/// Combined `L` (unit lower, stored without its diagonal) and `U` factors of a
/// banded matrix, computed once and reused for any number of solves.
#[derive(Clone, Debug)]
pub struct BandLu {
    n: usize,
    b: usize,
    // row i holds columns i - b ..= i + b
    lu: nd::Array2<C64>,
}

impl BandLu {
    /// Factor a square sparse matrix.
    ///
    /// Returns [`SolveError::Singular`] if a pivot vanishes relative to the
    /// largest entry of `a`.
    pub fn factor(a: &CsrMatrix) -> SolveResult<Self> {
        let n = a.len();
        let b = a.bandwidth();
        let mut lu: nd::Array2<C64> = nd::Array2::zeros((n, 2 * b + 1));
        let mut scale: f64 = 0.0;
        for (i, j, aij) in a.iter() {
            lu[[i, j + b - i]] = aij;
            scale = scale.max(aij.norm());
        }
        let tol = f64::EPSILON * scale;

        let mut pivot: C64;
        let mut l: C64;
        let mut ukj: C64;
        for k in 0..n {
            pivot = lu[[k, b]];
            if !pivot.is_finite() || pivot.norm() <= tol {
                return Err(SolveError::Singular { row: k });
            }
            let last = (k + b).min(n - 1);
            for i in k + 1..=last {
                l = lu[[i, k + b - i]];
                if l.is_zero() { continue; }
                l /= pivot;
                lu[[i, k + b - i]] = l;
                for j in k + 1..=last {
                    ukj = lu[[k, j + b - k]];
                    lu[[i, j + b - i]] -= l * ukj;
                }
            }
        }
        log::debug!(
            "banded LU: n = {n}, half-bandwidth = {b}, {} stored entries",
            lu.len(),
        );
        Ok(Self { n, b, lu })
    }

    /// Size of the factored system.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.n }

    /// Half-bandwidth of the factored system.
    pub fn bandwidth(&self) -> usize { self.b }

    /// Solve `A · x = rhs` using the stored factors.
    pub fn solve<S>(&self, rhs: &Arr1<S>) -> SolveResult<nd::Array1<C64>>
    where S: nd::Data<Elem = C64>
    {
        if rhs.len() != self.n {
            return Err(LengthError(self.n, rhs.len()).into());
        }
        let (n, b) = (self.n, self.b);
        let mut x: nd::Array1<C64> = rhs.to_owned();

        // forward substitution with unit-diagonal L
        for i in 1..n {
            let acc
                = (i.saturating_sub(b)..i)
                .fold(C64::zero(), |acc, j| acc + self.lu[[i, j + b - i]] * x[j]);
            x[i] -= acc;
        }
        // backward substitution with U
        for i in (0..n).rev() {
            let acc
                = (i + 1..(i + b + 1).min(n))
                .fold(C64::zero(), |acc, j| acc + self.lu[[i, j + b - i]] * x[j]);
            x[i] = (x[i] - acc) / self.lu[[i, b]];
        }
        Ok(x)
    }
}
