//! Minimal compressed sparse row (CSR) storage for square complex matrices.
//!
//! Only the operations needed to apply, inspect, and factor the
//! Crank-Nicolson operators are provided.

use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::Arr1;

/// Square sparse matrix in compressed sparse row format.
///
/// Column indices within each row are sorted and unique.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    n: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<C64>,
}

impl CsrMatrix {
    /// Build an `n × n` matrix row by row.
    ///
    /// `row(k)` must return the `(column, value)` pairs of row `k`; they are
    /// sorted by column and entries with repeated columns are summed.
    ///
    /// *Panics if any column index is `>= n`*.
    pub fn from_rows<F, I>(n: usize, mut row: F) -> Self
    where
        F: FnMut(usize) -> I,
        I: IntoIterator<Item = (usize, C64)>,
    {
        let mut indptr: Vec<usize> = Vec::with_capacity(n + 1);
        let mut indices: Vec<usize> = Vec::new();
        let mut data: Vec<C64> = Vec::new();
        let mut buf: Vec<(usize, C64)> = Vec::new();
        indptr.push(0);
        for k in 0..n {
            buf.clear();
            buf.extend(row(k));
            buf.sort_unstable_by_key(|(col, _)| *col);
            for (col, val) in buf.drain(..) {
                assert!(col < n, "sparse::CsrMatrix::from_rows: column {col} out of bounds");
                let repeated
                    = indices.len() > indptr[k] && indices.last() == Some(&col);
                if repeated {
                    if let Some(acc) = data.last_mut() { *acc += val; }
                } else {
                    indices.push(col);
                    data.push(val);
                }
            }
            indptr.push(indices.len());
        }
        Self { n, indptr, indices, data }
    }

    /// Number of rows (and columns).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.n }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize { self.data.len() }

    /// Iterate over the stored `(column, value)` pairs of row `k`.
    pub fn row(&self, k: usize) -> impl Iterator<Item = (usize, C64)> + '_ {
        let range = self.indptr[k]..self.indptr[k + 1];
        self.indices[range.clone()].iter().copied()
            .zip(self.data[range].iter().copied())
    }

    /// Iterate over all stored entries as `(row, column, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, C64)> + '_ {
        (0..self.n).flat_map(move |k| self.row(k).map(move |(c, v)| (k, c, v)))
    }

    /// Get the element at `(i, j)`, which is zero if not stored.
    pub fn get(&self, i: usize, j: usize) -> C64 {
        let range = self.indptr[i]..self.indptr[i + 1];
        self.indices[range.clone()].binary_search(&j)
            .map(|p| self.data[range.start + p])
            .unwrap_or_else(|_| C64::zero())
    }

    /// Diagonal elements.
    pub fn diag(&self) -> nd::Array1<C64> {
        (0..self.n).map(|k| self.get(k, k)).collect()
    }

    /// Return `true` if `self` and `other` store entries at exactly the same
    /// positions.
    pub fn same_pattern(&self, other: &Self) -> bool {
        self.n == other.n
            && self.indptr == other.indptr
            && self.indices == other.indices
    }

    /// Largest distance `|i - j|` of any stored entry from the diagonal.
    pub fn bandwidth(&self) -> usize {
        self.iter().map(|(i, j, _)| i.abs_diff(j)).max().unwrap_or(0)
    }

    /// Compute the matrix-vector product `self · q`.
    ///
    /// *Panics if `q` does not have length `self.len()`*.
    pub fn dot<S>(&self, q: &Arr1<S>) -> nd::Array1<C64>
    where S: nd::Data<Elem = C64>
    {
        assert_eq!(q.len(), self.n, "sparse::CsrMatrix::dot: length mismatch");
        (0..self.n)
            .map(|k| {
                self.row(k).fold(C64::zero(), |acc, (c, v)| acc + v * q[c])
            })
            .collect()
    }

    /// Convert to a dense `n × n` array.
    pub fn to_dense(&self) -> nd::Array2<C64> {
        let mut a: nd::Array2<C64> = nd::Array2::zeros((self.n, self.n));
        self.iter().for_each(|(i, j, v)| { a[[i, j]] = v; });
        a
    }
}
