//! Persisting a run: the probability time series and the full-grid snapshot
//! cubes.

use std::{
    fs::{ self, File },
    io::{ BufWriter, Write },
    path::{ Path, PathBuf },
};
use anyhow::{ Context, Result, bail };
use ndarray::{ self as nd, s };
use ndarray_npy::write_npy;
use num_complex::Complex64 as C64;
use xspace2d::{
    grid::Grid,
    utils::{ probability_drift, total_probability },
};

/// Field width used for every number in the probability series.
pub const WIDTH: usize = 10;
/// Digits after the decimal point used for every number in the probability
/// series.
pub const PREC: usize = 10;

/// Format `x` in scientific notation with `prec` digits after the decimal
/// point and an explicitly signed exponent of at least two digits, right-
/// aligned in a field of at least `width` characters.
///
/// ```
/// assert_eq!(lib::output::sci(0.01, 10, 10), "1.0000000000e-02");
/// assert_eq!(lib::output::sci(-2.5e-16, 10, 3), "-2.500e-16");
/// assert_eq!(lib::output::sci(1.0, 12, 2), "    1.00e+00");
/// ```
pub fn sci(x: f64, width: usize, prec: usize) -> String {
    let raw = format!("{x:.prec$e}");
    let formatted
        = match raw.split_once('e') {
            Some((mant, exp)) => {
                let (sign, digits)
                    = exp.strip_prefix('-')
                    .map(|d| ('-', d))
                    .unwrap_or(('+', exp));
                format!("{mant}e{sign}{digits:0>2}")
            },
            None => raw,
        };
    format!("{formatted:>width$}")
}

/// Locations of all files written for a single run, named by grid size and
/// potential selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    /// `(t, P - 1)` time series.
    pub probability: PathBuf,
    /// `|u|²` cube.
    pub modulus: PathBuf,
    /// `Re u` cube.
    pub re: PathBuf,
    /// `Im u` cube.
    pub im: PathBuf,
}

impl OutputPaths {
    pub fn new<P>(outdir: P, m: usize, selector: i64) -> Self
    where P: AsRef<Path>
    {
        let outdir = outdir.as_ref();
        let tag = format!("M{m}_nslit{selector}");
        Self {
            probability: outdir.join(format!("probability_{tag}.txt")),
            modulus: outdir.join(format!("modulus_{tag}.npy")),
            re: outdir.join(format!("re_{tag}.npy")),
            im: outdir.join(format!("im_{tag}.npy")),
        }
    }
}

/// Collects the state at every time step of a run.
///
/// Each recorded state is padded out to the full grid and stored in three
/// cubes of shape `(nt + 1, M, M)` (time first), while `(t, P - 1)` is
/// streamed to the probability file immediately. [`Self::finish`] writes the
/// cubes truncated to the steps actually recorded, so that a run aborted
/// partway through still leaves a valid prefix on disk.
#[derive(Debug)]
pub struct Recorder {
    grid: Grid,
    dt: f64,
    paths: OutputPaths,
    series: BufWriter<File>,
    modulus: nd::Array3<f64>,
    re: nd::Array3<f64>,
    im: nd::Array3<f64>,
    len: usize,
}

impl Recorder {
    /// Create the output directory if needed and open the probability file
    /// for a run of `nt` steps.
    pub fn new<P>(outdir: P, grid: Grid, selector: i64, dt: f64, nt: usize)
        -> Result<Self>
    where P: AsRef<Path>
    {
        let outdir = outdir.as_ref();
        fs::create_dir_all(outdir)
            .with_context(|| format!("creating output directory {outdir:?}"))?;
        let paths = OutputPaths::new(outdir, grid.m(), selector);
        let file
            = File::create(&paths.probability)
            .with_context(|| format!("creating {:?}", paths.probability))?;
        let m = grid.m();
        Ok(Self {
            grid,
            dt,
            paths,
            series: BufWriter::new(file),
            modulus: nd::Array3::zeros((nt + 1, m, m)),
            re: nd::Array3::zeros((nt + 1, m, m)),
            im: nd::Array3::zeros((nt + 1, m, m)),
            len: 0,
        })
    }

    /// Number of states recorded so far.
    pub fn len(&self) -> usize { self.len }

    /// Return `true` if no states have been recorded.
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Paths that are (or will be) written.
    pub fn paths(&self) -> &OutputPaths { &self.paths }

    /// Record the state for the next time step, returning its total
    /// probability.
    pub fn record<S>(&mut self, q: &nd::ArrayBase<S, nd::Ix1>) -> Result<f64>
    where S: nd::Data<Elem = C64>
    {
        let cap = self.modulus.len_of(nd::Axis(0));
        if self.len >= cap {
            bail!("recorder is full: all {cap} time steps have been recorded");
        }
        let full = self.grid.embed(q)?;
        let p = total_probability(q, self.grid.h());
        let drift = probability_drift(q, self.grid.h());
        let t = self.len as f64 * self.dt;
        let line = format!("{} {}", sci(t, WIDTH, PREC), sci(drift, WIDTH, PREC));
        writeln!(self.series, "{line}")
            .with_context(|| format!("writing {:?}", self.paths.probability))?;
        let k = self.len;
        self.modulus.slice_mut(s![k, .., ..]).assign(&full.mapv(|u| u.norm_sqr()));
        self.re.slice_mut(s![k, .., ..]).assign(&full.mapv(|u| u.re));
        self.im.slice_mut(s![k, .., ..]).assign(&full.mapv(|u| u.im));
        self.len += 1;
        Ok(p)
    }

    /// Flush the probability series and write the recorded prefix of each
    /// cube.
    pub fn finish(mut self) -> Result<OutputPaths> {
        self.series.flush()
            .with_context(|| format!("writing {:?}", self.paths.probability))?;
        let n = self.len;
        let cubes = [
            (&self.paths.modulus, &self.modulus),
            (&self.paths.re, &self.re),
            (&self.paths.im, &self.im),
        ];
        for (path, cube) in cubes {
            write_npy(path, &cube.slice(s![..n, .., ..]))
                .with_context(|| format!("writing {path:?}"))?;
        }
        log::debug!("wrote {n} snapshots to {:?}", self.paths);
        Ok(self.paths)
    }
}
