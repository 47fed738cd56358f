#![allow(non_snake_case)]

//! Provides functions and higher-level constructs for automated solution of the
//! two-dimensional, time-dependent Schrödinger equation in a box with a fixed
//! zero boundary via the Crank-Nicolson scheme, with optional single- or
//! multi-slit barrier potentials.
//!
//! Provides implementations for the following numerical routines:
//! - Spatial discretization:
//!     - Five-point finite-difference Laplacian on the box interior
//!     - Slit-wall potentials
//! - Time-dependent:
//!     - Crank-Nicolson stepping with the implicit operator factored once per
//!       run, by
//!         - Banded LU decomposition (default)
//!         - Dense LU decomposition (LAPACK)
//!     - Crank-Nicolson stepping with per-step Jacobi iteration
//!
//! ```
//! use xspace2d::{ potential::Barrier, timedep::{ Method, System, crank_nicolson } };
//! use xspace2d::{ utils::total_probability, wavepacket::WavePacket };
//!
//! let sys = System::new(20, Barrier::Free, 0.0).unwrap();
//! let prop = sys.propagator(0.005, Method::BandedLu).unwrap();
//! let packet = WavePacket {
//!     center: (0.5, 0.5),
//!     width: (0.1, 0.1),
//!     momentum: (0.0, 0.0),
//! };
//! let q0 = sys.initial_state(&packet).unwrap();
//! let q = crank_nicolson(&prop, &q0, 4).unwrap();
//! let h = sys.get_grid().h();
//! assert!(q.outer_iter().all(|qk| (total_probability(&qk, h) - 1.0).abs() < 1e-9));
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod grid;
pub mod potential;
pub mod sparse;
pub mod operators;
pub mod banded;
pub mod wavepacket;
pub mod timedep;
pub mod params;
pub mod utils;

pub mod docs;

pub(crate) const DEF_EPSILON: f64 = 1e-12;
pub(crate) const DEF_MAXITERS: usize = 1000;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
