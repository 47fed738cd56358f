//! Barrier potentials: an open box, or a thin wall at the horizontal midpoint
//! of the box pierced by one or more slits.
//!
//! The wall is a band of grid rows perpendicular to the *x* axis, centered on
//! `x = 0.5`; slits are gaps in the wall laid out symmetrically about the
//! central column of the grid. All lengths are fixed by the associated
//! constants on [`Barrier`] and converted to whole numbers of cells for a
//! given grid, so that the wall and every slit are at least one cell wide.
//! Slit apertures and separations are rounded to odd cell counts, which keeps
//! the whole slit block centered on a single column for every grid size.

use std::ops::RangeInclusive;
use ndarray as nd;
use crate::grid::Grid;

// half-cell ties (e.g. 0.05 at M = 200) round up despite error in len · M
const ROUND_SLACK: f64 = 1e-9;

/// Potential configuration selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Barrier {
    /// No wall; the potential vanishes everywhere.
    Free,
    /// Wall with a single central slit.
    OneSlit,
    /// Wall with two slits.
    TwoSlit,
    /// Wall with three slits.
    ThreeSlit,
}

impl Barrier {
    /// *x* coordinate of the center of the wall.
    pub const WALL_CENTER: f64 = 0.5;
    /// Thickness of the wall along *x*.
    pub const WALL_THICKNESS: f64 = 0.02;
    /// Width of each slit along *y*.
    pub const SLIT_APERTURE: f64 = 0.05;
    /// Length of wall separating adjacent slits along *y*.
    pub const SLIT_SEPARATION: f64 = 0.05;

    /// Convert an integer selector to a barrier configuration.
    ///
    /// `0`, `1`, `2`, and `3` select the open box and the one-, two-, and
    /// three-slit walls, respectively. Any other value falls back to the open
    /// box, with a warning.
    pub fn from_selector(sel: i64) -> Self {
        match sel {
            0 => Self::Free,
            1 => Self::OneSlit,
            2 => Self::TwoSlit,
            3 => Self::ThreeSlit,
            _ => {
                log::warn!(
                    "unrecognized potential selector {sel}; using the open box"
                );
                Self::Free
            },
        }
    }

    /// Integer selector for this configuration; the inverse of
    /// [`Self::from_selector`] for recognized values.
    pub fn selector(&self) -> i64 { self.slit_count() as i64 }

    /// Number of slits in the wall (zero for [`Self::Free`]).
    pub fn slit_count(&self) -> usize {
        match self {
            Self::Free => 0,
            Self::OneSlit => 1,
            Self::TwoSlit => 2,
            Self::ThreeSlit => 3,
        }
    }

    /// Return `true` if `self` is `Free`.
    pub fn is_free(&self) -> bool { matches!(self, Self::Free) }

    // odd number of whole cells closest to a physical length, at least one
    fn odd_cells(grid: &Grid, len: f64) -> usize {
        let ncells = len * grid.m() as f64;
        let half = ((ncells - 1.0) / 2.0 + ROUND_SLACK).round().max(0.0) as usize;
        2 * half + 1
    }

    // grid column nearest to y = 1/2
    fn center_column(grid: &Grid) -> usize {
        ((0.5 / grid.h()).round() as usize).clamp(1, grid.interior())
    }

    /// Range of interior grid rows `i` occupied by the wall, or `None` for the
    /// open box.
    pub fn wall_rows(&self, grid: &Grid) -> Option<RangeInclusive<usize>> {
        if self.is_free() { return None; }
        let n = grid.interior();
        let ic
            = ((Self::WALL_CENTER / grid.h()).round() as usize).clamp(1, n);
        let half = (Self::WALL_THICKNESS / 2.0 / grid.h()).round() as usize;
        Some(ic.saturating_sub(half).max(1)..=(ic + half).min(n))
    }

    /// Return `true` if grid column `j` lies within one of the slits.
    ///
    /// Always `false` for the open box, which has no wall to be open in.
    pub fn is_open(&self, grid: &Grid, j: usize) -> bool {
        let nslits = self.slit_count();
        if nslits == 0 { return false; }
        let a = Self::odd_cells(grid, Self::SLIT_APERTURE);
        let s = Self::odd_cells(grid, Self::SLIT_SEPARATION);
        // odd, so that the block spans jc - total/2 ..= jc + total/2
        let total = nslits * a + (nslits - 1) * s;
        let j0 = Self::center_column(grid).saturating_sub(total / 2);
        (j0..j0 + total).contains(&j) && (j - j0) % (a + s) < a
    }

    /// Return `true` if interior cell `(i, j)` is part of the wall.
    pub fn is_wall(&self, grid: &Grid, i: usize, j: usize) -> bool {
        self.wall_rows(grid)
            .is_some_and(|rows| rows.contains(&i) && !self.is_open(grid, j))
    }

    /// Compute the potential on all interior cells, in state-vector order:
    /// `v0` inside the wall and zero everywhere else.
    pub fn potential(&self, grid: &Grid, v0: f64) -> nd::Array1<f64> {
        grid.cells()
            .map(|(_, i, j)| if self.is_wall(grid, i, j) { v0 } else { 0.0 })
            .collect()
    }
}

impl From<i64> for Barrier {
    fn from(sel: i64) -> Self { Self::from_selector(sel) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_columns(barrier: Barrier, grid: &Grid) -> Vec<usize> {
        (1..=grid.interior()).filter(|j| barrier.is_open(grid, *j)).collect()
    }

    #[test]
    fn selector_roundtrip_and_fallback() {
        for sel in 0..=3 {
            assert_eq!(Barrier::from_selector(sel).selector(), sel);
        }
        assert_eq!(Barrier::from_selector(7), Barrier::Free);
        assert_eq!(Barrier::from_selector(-1), Barrier::Free);
    }

    #[test]
    fn free_is_zero() {
        let grid = Grid::new(20).unwrap();
        let v = Barrier::Free.potential(&grid, 1e10);
        assert_eq!(v.len(), grid.len());
        assert!(v.iter().all(|vk| *vk == 0.0));
        assert!(Barrier::Free.wall_rows(&grid).is_none());
    }

    #[test]
    fn slit_layout_coarse() {
        let grid = Grid::new(20).unwrap();
        assert_eq!(Barrier::OneSlit.wall_rows(&grid), Some(10..=10));
        assert_eq!(open_columns(Barrier::OneSlit, &grid), vec![10]);
        assert_eq!(open_columns(Barrier::TwoSlit, &grid), vec![9, 11]);
        assert_eq!(open_columns(Barrier::ThreeSlit, &grid), vec![8, 10, 12]);
    }

    #[test]
    fn slit_layout_fine() {
        let grid = Grid::new(100).unwrap();
        assert_eq!(Barrier::TwoSlit.wall_rows(&grid), Some(49..=51));
        let open = open_columns(Barrier::TwoSlit, &grid);
        let expected: Vec<usize> = (43..=47).chain(53..=57).collect();
        assert_eq!(open, expected);
        // symmetric about the central column
        assert!(open.iter().all(|j| open.contains(&(100 - j))));
    }

    #[test]
    fn slits_symmetric_about_center() {
        let barriers = [Barrier::OneSlit, Barrier::TwoSlit, Barrier::ThreeSlit];
        for m in [20, 21, 40, 41, 57, 60, 100, 150, 199, 200] {
            let grid = Grid::new(m).unwrap();
            let jc = Barrier::center_column(&grid);
            for barrier in barriers {
                let open = open_columns(barrier, &grid);
                assert!(!open.is_empty(), "M = {m}, {barrier:?}: no open column");
                for j in open.iter() {
                    assert!(
                        open.contains(&(2 * jc - j)),
                        "M = {m}, {barrier:?}: {open:?} not symmetric about {jc}",
                    );
                }
            }
        }
    }

    #[test]
    fn slit_layout_even_widths() {
        // 0.05 is two cells at M = 40 and ten at M = 200
        let grid = Grid::new(40).unwrap();
        assert_eq!(open_columns(Barrier::OneSlit, &grid), vec![19, 20, 21]);
        let grid = Grid::new(200).unwrap();
        let expected: Vec<usize> = (84..=94).chain(106..=116).collect();
        assert_eq!(open_columns(Barrier::TwoSlit, &grid), expected);
    }

    #[test]
    fn wall_values() {
        let grid = Grid::new(60).unwrap();
        let v0 = 1e10;
        let v = Barrier::TwoSlit.potential(&grid, v0);
        let rows = Barrier::TwoSlit.wall_rows(&grid).unwrap();
        for (k, i, j) in grid.cells() {
            let expected
                = if rows.contains(&i) && !Barrier::TwoSlit.is_open(&grid, j) {
                    v0
                } else {
                    0.0
                };
            assert_eq!(v[k], expected);
        }
        // wall cells off the wall rows never occur
        assert!(grid.cells().all(|(k, i, _)| rows.contains(&i) || v[k] == 0.0));
    }
}
