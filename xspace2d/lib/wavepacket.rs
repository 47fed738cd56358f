//! Gaussian wave packets with an imposed momentum, used as initial states.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::TError,
    grid::Grid,
    timedep::TResult,
    utils::{ total_probability, wf_renormalize },
};

/// Parameters of a Gaussian wave packet
/// ```text
/// u(x, y) = exp(-(x - x_c)² / 2 σ_x² - (y - y_c)² / 2 σ_y²) exp(i (p_x x + p_y y))
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WavePacket {
    /// Center `(x_c, y_c)`.
    pub center: (f64, f64),
    /// Widths `(σ_x, σ_y)`.
    pub width: (f64, f64),
    /// Momenta `(p_x, p_y)`.
    pub momentum: (f64, f64),
}

impl WavePacket {
    /// Evaluate the (unnormalized) packet at a physical point.
    pub fn amplitude(&self, x: f64, y: f64) -> C64 {
        let (xc, yc) = self.center;
        let (sx, sy) = self.width;
        let (px, py) = self.momentum;
        let envelope
            = (
                -(x - xc).powi(2) / (2.0 * sx.powi(2))
                - (y - yc).powi(2) / (2.0 * sy.powi(2))
            ).exp();
        envelope * C64::cis(px * x + py * y)
    }

    /// Sample the packet on the interior of `grid` and normalize it so that
    /// its total probability is 1.
    ///
    /// Returns [`TError::ZeroNorm`] if the sampled packet vanishes on every
    /// interior cell (e.g. a packet centered far outside the box with a small
    /// width) or has a non-finite norm.
    pub fn state(&self, grid: &Grid) -> TResult<nd::Array1<C64>> {
        let (x, y) = grid.coordinates();
        let mut q: nd::Array1<C64>
            = x.iter().zip(&y)
            .map(|(xk, yk)| self.amplitude(*xk, *yk))
            .collect();
        let prob = total_probability(&q, grid.h());
        if !(prob > 0.0 && prob.is_finite()) { return Err(TError::ZeroNorm); }
        wf_renormalize(&mut q, grid.h());
        Ok(q)
    }
}
