//! Spatial discretization of the unit square and the mapping between interior
//! grid cells and state-vector entries.
//!
//! A grid of `M` points per side has spacing `h = 1/M`, with cell `(i, j)`
//! located at `(x, y) = (i h, j h)` for `i, j` in `0..M`. Cells on the outer
//! edge (`i` or `j` equal to `0` or `M - 1`) carry the Dirichlet boundary
//! condition and are never stored; the remaining `(M - 2)²` interior cells are
//! linearized in row-major order with `i` (the *x* index) as the slow index:
//! ```text
//! k = (i - 1) (M - 2) + (j - 1),   i, j ∊ {1, ..., M - 2}
//! ```

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    error::{ GridError, LengthError },
};

/// Square grid with a fixed zero boundary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grid {
    // points per side, including both boundary points
    m: usize,
    // spatial step
    h: f64,
}

impl Grid {
    /// Create a new grid with `m` points per side.
    ///
    /// Fails if `m < 3`, since no interior would remain.
    pub fn new(m: usize) -> Result<Self, GridError> {
        GridError::check(m)?;
        Ok(Self { m, h: (m as f64).recip() })
    }

    /// Number of points per side, including boundary points.
    pub fn m(&self) -> usize { self.m }

    /// Spatial step.
    pub fn h(&self) -> f64 { self.h }

    /// Number of interior points per side, `M - 2`.
    pub fn interior(&self) -> usize { self.m - 2 }

    /// Number of stored (interior) cells, `(M - 2)²`.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.interior().pow(2) }

    /// Return `true` if `(i, j)` is an interior cell.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        (1..=self.interior()).contains(&i) && (1..=self.interior()).contains(&j)
    }

    /// Linear state index of the interior cell `(i, j)`.
    ///
    /// *Panics if `(i, j)` is not an interior cell*.
    pub fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            self.contains(i, j),
            "grid::Grid::index: ({i}, {j}) is not an interior cell"
        );
        (i - 1) * self.interior() + (j - 1)
    }

    /// Like [`Self::index`], but return `None` for cells outside the interior
    /// instead of panicking.
    pub fn get_index(&self, i: usize, j: usize) -> Option<usize> {
        self.contains(i, j).then(|| (i - 1) * self.interior() + (j - 1))
    }

    /// Interior cell coordinates `(i, j)` of the linear state index `k`.
    ///
    /// *Panics if `k >= self.len()`*.
    pub fn coords(&self, k: usize) -> (usize, usize) {
        assert!(
            k < self.len(),
            "grid::Grid::coords: index {k} out of bounds for {} cells",
            self.len()
        );
        let n = self.interior();
        (k / n + 1, k % n + 1)
    }

    /// Physical *x* coordinate of grid row `i`.
    pub fn x(&self, i: usize) -> f64 { i as f64 * self.h }

    /// Physical *y* coordinate of grid column `j`.
    pub fn y(&self, j: usize) -> f64 { j as f64 * self.h }

    /// Iterate over all interior cells in state-vector order, yielding
    /// `(k, i, j)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (0..self.len()).map(move |k| { let (i, j) = self.coords(k); (k, i, j) })
    }

    /// State indices of the (up to four) nearest neighbors of interior cell
    /// `(i, j)` that are themselves interior cells.
    ///
    /// Neighbors are found by bounds-checking the 2D coordinates, so the
    /// last cell of one grid row is never linked to the first cell of the
    /// next.
    pub fn neighbors(&self, i: usize, j: usize)
        -> impl Iterator<Item = usize> + '_
    {
        [
            i.checked_sub(1).map(|im1| (im1, j)),
            Some((i, j + 1)),
            Some((i + 1, j)),
            j.checked_sub(1).map(|jm1| (i, jm1)),
        ]
        .into_iter()
        .flatten()
        .filter_map(move |(ii, jj)| self.get_index(ii, jj))
    }

    /// Physical coordinates of the interior cells, in state-vector order.
    pub fn coordinates(&self) -> (nd::Array1<f64>, nd::Array1<f64>) {
        let x: nd::Array1<f64> = self.cells().map(|(_, i, _)| self.x(i)).collect();
        let y: nd::Array1<f64> = self.cells().map(|(_, _, j)| self.y(j)).collect();
        (x, y)
    }

    /// Pad a state vector back out to the full `M × M` grid, with exact zeros
    /// on all boundary cells. Axis 0 indexes *x*, axis 1 indexes *y*.
    pub fn embed<S>(&self, q: &Arr1<S>) -> Result<nd::Array2<C64>, LengthError>
    where S: nd::Data<Elem = C64>
    {
        LengthError::check(self, q)?;
        let n = self.interior();
        let mut full: nd::Array2<C64> = nd::Array2::zeros((self.m, self.m));
        let interior
            = q.to_owned().into_shape((n, n))
            .expect("grid::Grid::embed: length already checked");
        full.slice_mut(nd::s![1..self.m - 1, 1..self.m - 1]).assign(&interior);
        Ok(full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_coords_bijection() {
        let grid = Grid::new(9).unwrap();
        let n = grid.interior();
        for i in 1..=n {
            for j in 1..=n {
                let k = grid.index(i, j);
                assert!(k < grid.len());
                assert_eq!(grid.coords(k), (i, j));
            }
        }
        for k in 0..grid.len() {
            let (i, j) = grid.coords(k);
            assert_eq!(grid.index(i, j), k);
        }
    }

    #[test]
    fn row_major_layout() {
        let grid = Grid::new(6).unwrap();
        assert_eq!(grid.index(1, 1), 0);
        assert_eq!(grid.index(1, 4), 3);
        assert_eq!(grid.index(2, 1), 4);
        assert_eq!(grid.index(4, 4), 15);
    }

    #[test]
    fn too_small() {
        assert!(Grid::new(2).is_err());
        assert_eq!(Grid::new(3).unwrap().len(), 1);
    }

    #[test]
    fn neighbors_do_not_wrap() {
        let grid = Grid::new(6).unwrap();
        // end of the first interior row: only (1, 3) and (2, 4)
        let mut nb: Vec<usize> = grid.neighbors(1, 4).collect();
        nb.sort_unstable();
        assert_eq!(nb, vec![grid.index(1, 3), grid.index(2, 4)]);
        // start of the second row must not see the end of the first
        let nb: Vec<usize> = grid.neighbors(2, 1).collect();
        assert!(!nb.contains(&grid.index(1, 4)));
        assert_eq!(nb.len(), 3);
        // fully interior cell
        assert_eq!(grid.neighbors(2, 2).count(), 4);
    }

    #[test]
    fn embed_has_zero_boundary() {
        let grid = Grid::new(7).unwrap();
        let q: nd::Array1<C64> = nd::Array1::from_elem(grid.len(), C64::new(1.0, -2.0));
        let full = grid.embed(&q).unwrap();
        let m = grid.m();
        assert_eq!(full.dim(), (m, m));
        for a in 0..m {
            for edge in [full[[0, a]], full[[m - 1, a]], full[[a, 0]], full[[a, m - 1]]] {
                assert_eq!(edge, C64::new(0.0, 0.0));
            }
        }
        assert_eq!(full[[2, 3]], q[grid.index(2, 3)]);
    }

    #[test]
    fn embed_checks_length() {
        let grid = Grid::new(7).unwrap();
        let q: nd::Array1<C64> = nd::Array1::zeros(grid.len() - 1);
        assert!(grid.embed(&q).is_err());
    }
}
