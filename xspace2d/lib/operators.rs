//! Assembly of the Crank-Nicolson operators for the discretized Hamiltonian
//! ```text
//! H = -(1/2) ∇² + V
//! ```
//! on the interior of a [`Grid`].
//!
//! The Laplacian is the second-order, five-point stencil with step `h`. With
//! `r = dt / (2 h²)`, each interior cell `k` contributes
//! ```text
//! A[k, k] = 1 + 2 i r + i dt V[k] / 2      B[k, k] = 1 - 2 i r - i dt V[k] / 2
//! A[k, l] = -i r / 2                        B[k, l] = +i r / 2
//! ```
//! for every interior nearest neighbor `l` of `k`, so that
//! `A = I + i (dt/2) H` and `B = I - i (dt/2) H` share a sparsity pattern.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    error::LengthError,
    grid::Grid,
    sparse::CsrMatrix,
};

// the stencil for row `k` of `(dt/2) H`, as `(column, value)` pairs
fn half_step_hamiltonian_row(grid: &Grid, V: &[f64], dt: f64, k: usize)
    -> Vec<(usize, f64)>
{
    let r = dt / (2.0 * grid.h().powi(2));
    let (i, j) = grid.coords(k);
    let mut row: Vec<(usize, f64)> = Vec::with_capacity(5);
    row.push((k, 2.0 * r + dt * V[k] / 2.0));
    row.extend(grid.neighbors(i, j).map(|l| (l, -r / 2.0)));
    row
}

/// The pair of Crank-Nicolson operators for a fixed grid, time step, and
/// potential.
///
/// Built once with [`Operators::new`] and immutable afterward; advancing a
/// state solves `A · q' = B · q`.
#[derive(Clone, Debug)]
pub struct Operators {
    grid: Grid,
    dt: f64,
    a: CsrMatrix,
    b: CsrMatrix,
}

impl Operators {
    /// Assemble `A` and `B` from the potential `V` sampled on the interior
    /// cells of `grid` (in state-vector order).
    pub fn new<S>(grid: Grid, dt: f64, V: &Arr1<S>) -> Result<Self, LengthError>
    where S: nd::Data<Elem = f64>
    {
        LengthError::check(&grid, V)?;
        let V: Vec<f64> = V.iter().copied().collect();
        let n = grid.len();
        let one = C64::new(1.0, 0.0);
        let a = CsrMatrix::from_rows(n, |k| {
            half_step_hamiltonian_row(&grid, &V, dt, k).into_iter()
                .map(move |(l, hkl)| {
                    (l, if l == k { one + C64::i() * hkl } else { C64::i() * hkl })
                })
        });
        let b = CsrMatrix::from_rows(n, |k| {
            half_step_hamiltonian_row(&grid, &V, dt, k).into_iter()
                .map(move |(l, hkl)| {
                    (l, if l == k { one - C64::i() * hkl } else { -C64::i() * hkl })
                })
        });
        log::debug!(
            "assembled Crank-Nicolson operators: n = {}, nnz = {}, r = {:.3e}",
            n,
            a.nnz(),
            dt / (2.0 * grid.h().powi(2)),
        );
        Ok(Self { grid, dt, a, b })
    }

    /// The grid the operators were built for.
    pub fn grid(&self) -> &Grid { &self.grid }

    /// Time step.
    pub fn dt(&self) -> f64 { self.dt }

    /// Implicit-side operator `A = I + i (dt/2) H`.
    pub fn a(&self) -> &CsrMatrix { &self.a }

    /// Explicit-side operator `B = I - i (dt/2) H`.
    pub fn b(&self) -> &CsrMatrix { &self.b }

    /// Compute the right-hand side `B · q` of the linear system for one step.
    pub fn rhs<S>(&self, q: &Arr1<S>) -> Result<nd::Array1<C64>, LengthError>
    where S: nd::Data<Elem = C64>
    {
        LengthError::check(&self.grid, q)?;
        Ok(self.b.dot(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::Barrier;

    fn ops(m: usize, dt: f64, barrier: Barrier, v0: f64) -> Operators {
        let grid = Grid::new(m).unwrap();
        let V = barrier.potential(&grid, v0);
        Operators::new(grid, dt, &V).unwrap()
    }

    #[test]
    fn shared_pattern_and_sign_flip() {
        let ops = ops(12, 0.01, Barrier::TwoSlit, 50.0);
        let (a, b) = (ops.a(), ops.b());
        assert!(a.same_pattern(b));
        let two = C64::new(2.0, 0.0);
        for (i, j, aij) in a.iter() {
            let bij = b.get(i, j);
            if i == j {
                assert!((aij + bij - two).norm() < 1e-12);
                assert_eq!(aij.re, 1.0);
            } else {
                assert_eq!(aij, -bij);
                assert_eq!(aij.re, 0.0);
            }
        }
    }

    #[test]
    fn stencil_values() {
        let m = 10;
        let dt = 0.002;
        let ops = ops(m, dt, Barrier::Free, 0.0);
        let grid = ops.grid();
        let h = grid.h();
        let r = dt / (2.0 * h * h);
        let k = grid.index(4, 5);
        assert!((ops.a().get(k, k) - C64::new(1.0, 2.0 * r)).norm() < 1e-12);
        assert!((ops.b().get(k, k) - C64::new(1.0, -2.0 * r)).norm() < 1e-12);
        for l in [grid.index(3, 5), grid.index(5, 5), grid.index(4, 4), grid.index(4, 6)] {
            assert!((ops.a().get(k, l) - C64::new(0.0, -r / 2.0)).norm() < 1e-12);
            assert!((ops.b().get(k, l) - C64::new(0.0, r / 2.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn five_point_sparsity() {
        let m = 8;
        let ops = ops(m, 0.01, Barrier::Free, 0.0);
        let n = m - 2;
        let a = ops.a();
        // every interior cell has 4 links minus the ones lost at the edges
        assert_eq!(a.nnz(), n * n + 4 * n * (n - 1));
        assert_eq!(a.bandwidth(), n);
        // no link across the end of an interior row
        let grid = ops.grid();
        let last = grid.index(1, n);
        let first = grid.index(2, 1);
        assert_eq!(last + 1, first);
        assert_eq!(a.get(last, first), C64::new(0.0, 0.0));
        assert_eq!(a.get(first, last), C64::new(0.0, 0.0));
    }

    #[test]
    fn potential_enters_diagonal() {
        let dt = 0.001;
        let v0 = 1e4;
        let ops = ops(20, dt, Barrier::OneSlit, v0);
        let grid = *ops.grid();
        let h = grid.h();
        let r = dt / (2.0 * h * h);
        let wall = grid.index(10, 3);
        let slit = grid.index(10, 10);
        let expected_wall = C64::new(1.0, 2.0 * r + dt * v0 / 2.0);
        assert!((ops.a().get(wall, wall) - expected_wall).norm() < 1e-9);
        assert!((ops.a().get(slit, slit) - C64::new(1.0, 2.0 * r)).norm() < 1e-12);
    }

    #[test]
    fn length_mismatch() {
        let grid = Grid::new(10).unwrap();
        let V: nd::Array1<f64> = nd::Array1::zeros(grid.len() + 1);
        assert!(Operators::new(grid, 0.01, &V).is_err());
    }
}
