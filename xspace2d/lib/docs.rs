//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Spatial discretization](#spatial-discretization)
//! - [Crank-Nicolson](#crank-nicolson)
//! - [Solving the implicit system](#solving-the-implicit-system)
//! - [Slit walls](#slit-walls)
//!
//! # Background
//! This crate integrates the time-dependent Schrödinger equation for a single
//! particle confined to the unit square. In natural units (*ħ* = *m* = 1),
//! ```text
//!   ∂ψ
//! i -- = H ψ,    H = -½ ∇² + V(x, y)
//!   ∂t
//! ```
//! with ψ fixed at zero on the edges of the square. The potential *V* is real
//! and static, so the exact propagator *e*<sup>-*i H t*</sup> is unitary and
//! the total probability ∫ |ψ|² d*x* d*y* is conserved for all time. The aim
//! of the numerical scheme is to keep that property exactly (up to the
//! precision of a linear solve) after discretization in both space and time.
//!
//! # Spatial discretization
//! The square is sampled on *M* points per side with spacing *h* = 1/*M*,
//! ```text
//! x[i] = i h,  y[j] = j h,  i, j ∊ {0, ..., M - 1}
//! ```
//! where *i* = 0 and *i* = *M* - 1 (and likewise for *j*) are the boundary.
//! Since the boundary is pinned to zero, only the (*M* - 2)² interior cells
//! are stored, flattened row-major into a single vector:
//! ```text
//! k = (i - 1) (M - 2) + (j - 1),  i, j ∊ {1, ..., M - 2}
//! ```
//! See [`Grid`][crate::grid::Grid]. The Laplacian is replaced by the usual
//! second-order five-point stencil,
//! ```text
//!          ψ[i+1, j] + ψ[i-1, j] + ψ[i, j+1] + ψ[i, j-1] - 4 ψ[i, j]
//! ∇² ψ ≈ ----------------------------------------------------------- + O(h²)
//!                                      h²
//! ```
//! Any neighbor that falls on the boundary contributes nothing, which is how
//! the Dirichlet condition enters the matrix. Under the row-major ordering,
//! neighbors in *j* sit at *k* ± 1 and neighbors in *i* sit at *k* ± (*M* - 2).
//! Importantly, the last cell of one interior row and the first cell of the
//! next are adjacent in *k* but *not* in space, so the stencil has to be
//! applied by checking bounds in (*i*, *j*) rather than by placing entries on
//! fixed diagonals of the matrix.
//!
//! The result is a real symmetric *N* × *N* matrix (*N* = (*M* - 2)²) with
//! at most five nonzero entries per row, and a total bandwidth of *M* - 2.
//!
//! # Crank-Nicolson
//! Rather than approximating the propagator *e*<sup>-*i H dt*</sup> by a
//! truncated Taylor series (which is either unstable or non-unitary), the
//! Crank-Nicolson scheme[^1] uses the Cayley form
//! ```text
//!              1 - i H dt/2
//! e^(-i H dt) ≈ ------------ + O(dt³)
//!              1 + i H dt/2
//! ```
//! which amounts to averaging the explicit and implicit Euler steps. Writing
//! ```text
//! A = I + i (dt/2) H
//! B = I - i (dt/2) H
//! ```
//! one time step is then the solution of the linear system
//! ```text
//! A ψ(t + dt) = B ψ(t)
//! ```
//! Since *H* is Hermitian, *A* and *B* commute and *B* = *A*<sup>†</sup>, so
//! the update *A*<sup>-1</sup> *B* is exactly unitary: every eigenvalue has
//! the form (1 - *i λ dt*/2) / (1 + *i λ dt*/2) for real *λ*, which lies on
//! the unit circle. This holds for any *dt*, so the scheme is unconditionally
//! stable, and the discrete probability
//! ```text
//! P = h² Σ |ψ[k]|²
//! ```
//! is conserved up to the precision with which the linear system is solved.
//! (*Accuracy* still requires *dt* small compared to the inverse energy scale
//! of the packet, and *h* small compared to its wavelength.)
//!
//! With *r* = *dt*/(2 *h*²), the entries of *A* for an interior cell *k* are
//! ```text
//! A[k, k]  = 1 + 2 i r + i dt V[k] / 2
//! A[k, k'] = -i r / 2    for each spatial neighbor k'
//! ```
//! and *B* has the same pattern with the sign of every *H* contribution
//! flipped. See [`Operators`][crate::operators::Operators].
//!
//! # Solving the implicit system
//! The matrix *A* never changes over the course of a run, so all of the hard
//! work can be done once up front. *A* is also strictly diagonally dominant,
//! ```text
//! |A[k, k]| ≥ |1 + 2 i r| > 4 (r / 2) ≥ Σ |A[k, k']|
//! ```
//! (since |1 + 2 *i r*|² = 1 + 4 *r*² > 4 *r*²), which guarantees that
//! Gaussian elimination without pivoting never meets a zero pivot. Elimination
//! without pivoting also preserves the band structure: all fill-in stays
//! within *M* - 2 diagonals of the main one. Hence the default approach is a
//! banded LU decomposition stored as an *N* × (2 (*M* - 2) + 1) array, at a
//! cost of *O*(*N* *M*²) to factor and *O*(*N* *M*) per step, compared to
//! *O*(*N*³) and *O*(*N*²) for a dense factorization. See
//! [`BandLu`][crate::banded::BandLu].
//!
//! Two alternatives are provided for comparison, selected by
//! [`Method`][crate::timedep::Method]:
//! - a dense LU decomposition through LAPACK, which is only practical for
//!   small grids;
//! - Jacobi iteration, which needs no factorization at all and converges for
//!   the same reason that pivot-free elimination succeeds (diagonal dominance),
//!   but must be re-run at every step to a chosen tolerance, so that the
//!   probability is only conserved to roughly that tolerance.
//!
//! # Slit walls
//! The barrier potentials place a wall of height *V*₀ across the box at
//! *x* = ½, with thickness 0.02, cut by one or more openings of width 0.05
//! separated by 0.05, arranged symmetrically about *y* = ½. On a grid, each of
//! these lengths is rounded to a whole number of cells (at least one). Slit
//! widths and separations are further rounded to *odd* numbers of cells: the
//! slit block then spans an odd number of columns and can be centered exactly
//! on the column nearest *y* = ½, so that the wall and its slits look the same
//! on either side of the midline regardless of *M*. Particles with energies
//! well below *V*₀ are almost entirely reflected by the wall, while the part of
//! the packet that passes through the openings spreads out behind it and, for
//! two or more openings, interferes. See [`Barrier`][crate::potential::Barrier].
//!
//! [^1]: J. Crank and P. Nicolson, "A practical method for numerical
//! evaluation of solutions of partial differential equations of the
//! heat-conduction type." Mathematical Proceedings of the Cambridge
//! Philosophical Society **43** 1 50-67 (1947).
