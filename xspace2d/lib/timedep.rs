//! Provides functions to compute solutions to the 2+1-dimensional
//! (time-dependent) Schrödinger equation (TDSE) on a square box with a fixed
//! zero boundary, via the Crank-Nicolson scheme.
//!
//! In all 2D arrays, the first (or zero-th) axis indexes time.

use ndarray as nd;
use ndarray_linalg::{ FactorizeInto, LUFactorized, Solve };
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    Arr1,
    banded::{ BandLu, SolveResult },
    error::{ LengthError, SolveError, TError },
    grid::Grid,
    operators::Operators,
    potential::Barrier,
    sparse::CsrMatrix,
    wavepacket::WavePacket,
    DEF_EPSILON,
    DEF_MAXITERS,
};

pub type TResult<T> = Result<T, TError>;

// above this many unknowns, a dense factorization is probably a mistake
const DENSE_WARN: usize = 4096;

/// Linear solving method selector and parameters.
#[derive(Clone, Debug, Default)]
pub enum Method {
    /// Factor `A` once with a [banded LU decomposition][BandLu] (default).
    #[default]
    BandedLu,
    /// Factor a dense copy of `A` once through LAPACK. Memory grows as the
    /// fourth power of the grid size; intended for small grids.
    DenseLu,
    /// Solve each step with Jacobi iteration, starting from the current state.
    Jacobi {
        /// Desired relative accuracy bound (default: `1e-12`).
        epsilon: Option<f64>,
        /// Maximum number of iterations (default: `1000`).
        maxiters: Option<usize>,
    },
}

// prepared form of the implicit operator, computed exactly once per propagator
enum Factorization {
    Banded(BandLu),
    Dense(LUFactorized<nd::OwnedRepr<C64>>),
    Jacobi { epsilon: f64, maxiters: usize },
}

impl std::fmt::Debug for Factorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Banded(lu)
                => f.debug_struct("Banded")
                    .field("n", &lu.len())
                    .field("bandwidth", &lu.bandwidth())
                    .finish(),
            Self::Dense(_) => f.write_str("Dense(..)"),
            Self::Jacobi { epsilon, maxiters }
                => f.debug_struct("Jacobi")
                    .field("epsilon", epsilon)
                    .field("maxiters", maxiters)
                    .finish(),
        }
    }
}

// solve A x = rhs by Jacobi iteration from an initial guess
fn jacobi(
    a: &CsrMatrix,
    rhs: &nd::Array1<C64>,
    guess: nd::Array1<C64>,
    epsilon: f64,
    maxiters: usize,
) -> SolveResult<nd::Array1<C64>>
{
    let n = a.len();
    let diag = a.diag();
    let mut x = guess;
    let mut x_next: nd::Array1<C64> = nd::Array1::zeros(n);
    let mut diff: f64;
    let mut size: f64;
    for _ in 0..maxiters {
        diff = 0.0;
        size = 0.0;
        for k in 0..n {
            let off
                = a.row(k)
                .filter(|(c, _)| *c != k)
                .fold(C64::zero(), |acc, (c, v)| acc + v * x[c]);
            x_next[k] = (rhs[k] - off) / diag[k];
            diff = diff.max((x_next[k] - x[k]).norm());
            size = size.max(x_next[k].norm());
        }
        std::mem::swap(&mut x, &mut x_next);
        if diff <= epsilon * size { return Ok(x); }
    }
    Err(SolveError::NoConvergence { iters: maxiters })
}

/// Time-stepping operator for the Crank-Nicolson scheme.
///
/// Holds the [`Operators`] for a run together with the prepared form of the
/// implicit side `A`, which is computed once on construction and reused for
/// every step.
#[derive(Debug)]
pub struct Propagator {
    ops: Operators,
    fact: Factorization,
}

impl Propagator {
    /// Prepare a propagator, factoring `A` according to `method`.
    pub fn new(ops: Operators, method: Method) -> TResult<Self> {
        let n = ops.grid().len();
        let fact
            = match method {
                Method::BandedLu => {
                    let lu = BandLu::factor(ops.a()).map_err(TError::Factor)?;
                    Factorization::Banded(lu)
                },
                Method::DenseLu => {
                    if n > DENSE_WARN {
                        log::warn!(
                            "dense LU factorization of a {n} × {n} system; \
                            consider Method::BandedLu"
                        );
                    }
                    let lu
                        = ops.a().to_dense().factorize_into()
                        .map_err(|e| TError::Factor(e.into()))?;
                    Factorization::Dense(lu)
                },
                Method::Jacobi { epsilon, maxiters } => {
                    let epsilon = epsilon.unwrap_or(DEF_EPSILON);
                    let maxiters = maxiters.unwrap_or(DEF_MAXITERS);
                    TError::check_epsilon(epsilon)?;
                    TError::check_maxiters(maxiters)?;
                    Factorization::Jacobi { epsilon, maxiters }
                },
            };
        log::debug!("prepared propagator for {n} unknowns: {fact:?}");
        Ok(Self { ops, fact })
    }

    /// The operators being applied.
    pub fn operators(&self) -> &Operators { &self.ops }

    /// The grid the propagator acts on.
    pub fn grid(&self) -> &Grid { self.ops.grid() }

    /// Time step.
    pub fn dt(&self) -> f64 { self.ops.dt() }

    /// Advance a state by one time step, solving `A · q' = B · q`.
    pub fn step<S>(&self, q: &Arr1<S>) -> SolveResult<nd::Array1<C64>>
    where S: nd::Data<Elem = C64>
    {
        let rhs = self.ops.rhs(q)?;
        match &self.fact {
            Factorization::Banded(lu) => lu.solve(&rhs),
            Factorization::Dense(lu) => Ok(lu.solve(&rhs)?),
            Factorization::Jacobi { epsilon, maxiters }
                => jacobi(self.ops.a(), &rhs, q.to_owned(), *epsilon, *maxiters),
        }
    }

    /// Like [`Self::step`], but attach the index of the step being taken to
    /// any error.
    pub fn advance<S>(&self, q: &Arr1<S>, step: usize) -> TResult<nd::Array1<C64>>
    where S: nd::Data<Elem = C64>
    {
        self.step(q).map_err(|source| TError::Step { step, source })
    }
}

/// Perform Crank-Nicolson integration for `nt` steps from an initial state,
/// returning all `nt + 1` states (including the initial one) as rows of a 2D
/// array.
///
/// See also [`Propagator::step`] to process states one at a time.
pub fn crank_nicolson<S>(prop: &Propagator, q0: &Arr1<S>, nt: usize)
    -> TResult<nd::Array2<C64>>
where S: nd::Data<Elem = C64>
{
    LengthError::check(prop.grid(), q0)?;
    let mut q: nd::Array2<C64> = nd::Array2::zeros((nt + 1, q0.len()));
    let mut q_temp: nd::Array1<C64> = q0.to_owned();
    q.slice_mut(nd::s![0, ..]).assign(q0);
    for (k, qk) in q.axis_iter_mut(nd::Axis(0)).enumerate().skip(1) {
        q_temp = prop.advance(&q_temp, k)?;
        q_temp.clone().move_into(qk);
    }
    Ok(q)
}

/// Simple record to keep track of the grid, barrier configuration, and
/// sampled potential for a run.
///
/// Arrays borrowed from this type are guaranteed to have one element per
/// interior cell of the grid, in state-vector order.
#[derive(Clone, Debug)]
pub struct System {
    grid: Grid,
    barrier: Barrier,
    v0: f64,
    V: nd::Array1<f64>,
}

impl System {
    /// Create a new `System` on a grid of `m` points per side.
    pub fn new(m: usize, barrier: Barrier, v0: f64) -> TResult<Self> {
        let grid = Grid::new(m)?;
        let V = barrier.potential(&grid, v0);
        Ok(Self { grid, barrier, v0, V })
    }

    /// Get a reference to the grid.
    pub fn get_grid(&self) -> &Grid { &self.grid }

    /// Get the barrier configuration.
    pub fn get_barrier(&self) -> Barrier { self.barrier }

    /// Get the barrier height.
    pub fn get_v0(&self) -> f64 { self.v0 }

    /// Get a reference to the potential array.
    pub fn get_V(&self) -> &nd::Array1<f64> { &self.V }

    /// Assemble the Crank-Nicolson operators for time step `dt` and prepare a
    /// [`Propagator`] with them.
    pub fn propagator(&self, dt: f64, method: Method) -> TResult<Propagator> {
        let ops = Operators::new(self.grid, dt, &self.V)?;
        Propagator::new(ops, method)
    }

    /// Thin interface to [`WavePacket::state`].
    pub fn initial_state(&self, packet: &WavePacket) -> TResult<nd::Array1<C64>> {
        packet.state(&self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{ total_probability, wf_dot };

    fn free_packet() -> WavePacket {
        WavePacket {
            center: (0.5, 0.5),
            width: (0.1, 0.1),
            momentum: (20.0, -10.0),
        }
    }

    #[test]
    fn conserves_probability() {
        let sys = System::new(24, Barrier::Free, 0.0).unwrap();
        let prop = sys.propagator(0.001, Method::BandedLu).unwrap();
        let q0 = sys.initial_state(&free_packet()).unwrap();
        let q = crank_nicolson(&prop, &q0, 20).unwrap();
        assert_eq!(q.dim(), (21, sys.get_grid().len()));
        let h = sys.get_grid().h();
        for qk in q.outer_iter() {
            assert!((total_probability(&qk, h) - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn methods_agree() {
        let sys = System::new(12, Barrier::OneSlit, 1e3).unwrap();
        let q0 = sys.initial_state(&free_packet()).unwrap();
        let banded = sys.propagator(0.0005, Method::BandedLu).unwrap();
        let dense = sys.propagator(0.0005, Method::DenseLu).unwrap();
        let jacobi
            = sys.propagator(
                0.0005,
                Method::Jacobi { epsilon: Some(1e-14), maxiters: Some(5000) },
            )
            .unwrap();
        let qb = crank_nicolson(&banded, &q0, 5).unwrap();
        let qd = crank_nicolson(&dense, &q0, 5).unwrap();
        let qj = crank_nicolson(&jacobi, &q0, 5).unwrap();
        for ((b, d), j) in qb.iter().zip(&qd).zip(&qj) {
            assert!((b - d).norm() < 1e-10);
            assert!((b - j).norm() < 1e-9);
        }
    }

    #[test]
    fn unitary_on_overlaps() {
        let sys = System::new(16, Barrier::TwoSlit, 500.0).unwrap();
        let prop = sys.propagator(0.002, Method::BandedLu).unwrap();
        let h = sys.get_grid().h();
        let p = sys.initial_state(&free_packet()).unwrap();
        let q = sys.initial_state(&WavePacket { center: (0.3, 0.6), ..free_packet() })
            .unwrap();
        let before = wf_dot(&p, &q, h);
        let p1 = prop.step(&prop.step(&p).unwrap()).unwrap();
        let q1 = prop.step(&prop.step(&q).unwrap()).unwrap();
        let after = wf_dot(&p1, &q1, h);
        assert!((before - after).norm() < 1e-10);
    }

    #[test]
    fn jacobi_reports_nonconvergence() {
        let sys = System::new(20, Barrier::Free, 0.0).unwrap();
        let prop
            = sys.propagator(
                0.01,
                Method::Jacobi { epsilon: Some(1e-15), maxiters: Some(2) },
            )
            .unwrap();
        let q0 = sys.initial_state(&free_packet()).unwrap();
        match prop.advance(&q0, 7) {
            Err(TError::Step { step, source: SolveError::NoConvergence { iters } }) => {
                assert_eq!(step, 7);
                assert_eq!(iters, 2);
            },
            other => panic!("expected non-convergence, got {other:?}"),
        }
    }

    #[test]
    fn bad_jacobi_parameters() {
        let sys = System::new(8, Barrier::Free, 0.0).unwrap();
        let bad_eps = Method::Jacobi { epsilon: Some(0.0), maxiters: None };
        assert!(matches!(sys.propagator(0.01, bad_eps), Err(TError::BadEpsilon(_))));
        let bad_iters = Method::Jacobi { epsilon: None, maxiters: Some(0) };
        assert!(matches!(sys.propagator(0.01, bad_iters), Err(TError::BadMaxiters(0))));
    }

    #[test]
    fn wrong_state_length() {
        let sys = System::new(8, Barrier::Free, 0.0).unwrap();
        let prop = sys.propagator(0.01, Method::default()).unwrap();
        let q: nd::Array1<C64> = nd::Array1::zeros(3);
        assert!(matches!(prop.step(&q), Err(SolveError::Length(_))));
        assert!(matches!(crank_nicolson(&prop, &q, 2), Err(TError::Length(_))));
    }
}
