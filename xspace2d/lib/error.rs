//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use std::path::PathBuf;
use ndarray as nd;
use ndarray_linalg::error::LinalgError;
use thiserror::Error;
use crate::{ grid::Grid, params::Field };

/// Returned when a state vector does not have one entry per interior cell of
/// the grid it is used with.
#[derive(Debug, Error)]
#[error("state vector length does not match the grid interior; expected {0}, got {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A>(grid: &Grid, q: &nd::ArrayBase<S, nd::Ix1>)
        -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        let n = grid.len();
        let nq = q.len();
        (n == nq).then_some(()).ok_or(Self(n, nq))
    }
}

/// Returned when a grid is requested with too few points per side to have a
/// non-empty interior.
#[derive(Debug, Error)]
#[error("grid must have at least 3 points per side; got {0}")]
pub struct GridError(pub usize);

impl GridError {
    pub(crate) fn check(m: usize) -> Result<(), Self> {
        (m >= 3).then_some(()).ok_or(Self(m))
    }
}

/// Returned from parameter-file loading in [`params`][crate::params].
#[derive(Debug, Error)]
pub enum ParamError {
    /// Returned when the parameter file could not be read.
    #[error("could not read parameter file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Returned when the stream ends before a value for `Field` is found.
    #[error("missing value for parameter '{0}'")]
    Missing(Field),

    /// Returned when a token cannot be parsed as a number.
    #[error("malformed value for parameter '{field}': {token:?}")]
    Malformed {
        field: Field,
        token: String,
    },

    /// Returned when an integer-valued parameter has a fractional part.
    #[error("parameter '{field}' must be an integer; got {value}")]
    NotInteger {
        field: Field,
        value: f64,
    },

    /// Returned when a value lies outside its allowed range.
    #[error("parameter '{field}' is out of range: {value}")]
    OutOfRange {
        field: Field,
        value: f64,
    },

    /// Returned when more than the expected number of values are present.
    #[error("parameter stream has {0} unexpected trailing value(s)")]
    Extra(usize),
}

/// Returned from a single linear solve in the time-stepping loop.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Returned when a zero (or numerically vanishing) pivot is encountered
    /// during banded factorization.
    #[error("singular system: vanishing pivot in row {row}")]
    Singular { row: usize },

    /// Returned when an iterative solve fails to meet its tolerance.
    #[error("iterative solve did not converge after {iters} iterations")]
    NoConvergence { iters: usize },

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// [`LinalgError`]
    #[error("linalg error: {0}")]
    Linalg(#[from] LinalgError),
}

/// Returned from time-dependent wavefunction solver functions.
#[derive(Debug, Error)]
pub enum TError {
    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when a non-positive `maxiters` value is encountered.
    #[error("maxiters must be greater than 0; got {0}")]
    BadMaxiters(usize),

    /// Returned when a wave packet evaluates to zero (or a non-finite norm) on
    /// every interior cell, so that it cannot be normalized.
    #[error("initial state has zero or non-finite norm; check packet center and widths")]
    ZeroNorm,

    /// Returned when the implicit operator could not be factored.
    #[error("failed to factor the implicit operator: {0}")]
    Factor(SolveError),

    /// Returned when the linear solve for a particular time step fails.
    #[error("solve failed at time step {step}: {source}")]
    Step {
        step: usize,
        source: SolveError,
    },

    /// [`GridError`]
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),
}

impl TError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_maxiters(maxiters: usize) -> Result<(), Self> {
        (maxiters != 0).then_some(()).ok_or(Self::BadMaxiters(maxiters))
    }
}
