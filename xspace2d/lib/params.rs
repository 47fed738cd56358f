//! Loading of run parameters from a plain-text parameter stream.
//!
//! The stream holds exactly eleven values, one per line, in the order given by
//! [`Field::ALL`]. Only the first whitespace-separated token of each line is
//! read, so values may be followed by a trailing description; blank lines and
//! lines whose first non-blank character is `#` are skipped.
//!
//! ```
//! use xspace2d::params::RunParams;
//!
//! let text = "\
//! # grid and time
//! 20       M
//! 0.005    dt
//! 0.02     T
//! # packet
//! 0.5
//! 0.5
//! 0.1
//! 0.1
//! 0.0
//! 0.0
//! 1e10     V0
//! 0        no barrier
//! ";
//! let params: RunParams = text.parse().unwrap();
//! assert_eq!(params.m, 20);
//! assert_eq!(params.nt(), 4);
//! ```

use std::{ fmt, path::Path, str::FromStr };
use crate::{
    error::ParamError,
    potential::Barrier,
    timedep::{ System, TResult },
    wavepacket::WavePacket,
};

pub type ParamResult<T> = Result<T, ParamError>;

// slack for floor(T / dt) when T is a whole multiple of dt up to rounding
const NT_SLACK: f64 = 1e-9;

/// Names of the parameters, in the order they appear in a parameter stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Grid points per side (integer).
    M,
    /// Time step.
    Dt,
    /// Final time.
    T,
    /// Packet center, *x*.
    Xc,
    /// Packet center, *y*.
    Yc,
    /// Packet width, *x*.
    SgmX,
    /// Packet width, *y*.
    SgmY,
    /// Packet momentum, *x*.
    Px,
    /// Packet momentum, *y*.
    Py,
    /// Barrier height.
    V0,
    /// Potential selector (integer).
    Potential,
}

impl Field {
    /// All fields, in stream order.
    pub const ALL: [Self; 11] = [
        Self::M,
        Self::Dt,
        Self::T,
        Self::Xc,
        Self::Yc,
        Self::SgmX,
        Self::SgmY,
        Self::Px,
        Self::Py,
        Self::V0,
        Self::Potential,
    ];

    /// Short name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::Dt => "dt",
            Self::T => "T",
            Self::Xc => "x_c",
            Self::Yc => "y_c",
            Self::SgmX => "sgm_x",
            Self::SgmY => "sgm_y",
            Self::Px => "p_x",
            Self::Py => "p_y",
            Self::V0 => "V0",
            Self::Potential => "potential",
        }
    }

    fn is_integer(&self) -> bool { matches!(self, Self::M | Self::Potential) }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated scalar parameters for a single run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunParams {
    /// Grid points per side.
    pub m: usize,
    /// Time step.
    pub dt: f64,
    /// Final time.
    pub t_final: f64,
    /// Initial wave packet.
    pub packet: WavePacket,
    /// Barrier height.
    pub v0: f64,
    /// Raw potential selector; see [`Barrier::from_selector`].
    pub selector: i64,
}

impl RunParams {
    /// Read and parse a parameter file.
    pub fn read<P>(path: P) -> ParamResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let text
            = std::fs::read_to_string(path)
            .map_err(|source| ParamError::Read { path: path.to_path_buf(), source })?;
        text.parse()
    }

    /// Number of time steps, `floor(T / dt)`.
    pub fn nt(&self) -> usize {
        (self.t_final / self.dt + NT_SLACK).floor() as usize
    }

    /// Barrier configuration named by the selector.
    pub fn barrier(&self) -> Barrier { Barrier::from_selector(self.selector) }

    /// Build the [`System`] described by these parameters.
    pub fn system(&self) -> TResult<System> {
        System::new(self.m, self.barrier(), self.v0)
    }
}

// parse the first token of a line as a finite number
fn parse_value(field: Field, token: &str) -> ParamResult<f64> {
    let value: f64
        = token.parse()
        .map_err(|_| ParamError::Malformed { field, token: token.to_string() })?;
    if !value.is_finite() {
        return Err(ParamError::OutOfRange { field, value });
    }
    if field.is_integer() && value.fract() != 0.0 {
        return Err(ParamError::NotInteger { field, value });
    }
    Ok(value)
}

fn check_range(field: Field, value: f64, ok: bool) -> ParamResult<()> {
    ok.then_some(()).ok_or(ParamError::OutOfRange { field, value })
}

impl FromStr for RunParams {
    type Err = ParamError;

    fn from_str(s: &str) -> ParamResult<Self> {
        let mut tokens
            = s.lines()
            .map(str::trim_start)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_whitespace().next());
        let mut values = [0.0_f64; 11];
        for (field, value) in Field::ALL.into_iter().zip(values.iter_mut()) {
            let token = tokens.next().ok_or(ParamError::Missing(field))?;
            *value = parse_value(field, token)?;
        }
        let extra = tokens.count();
        if extra > 0 { return Err(ParamError::Extra(extra)); }

        let [m, dt, t_final, xc, yc, sx, sy, px, py, v0, sel] = values;
        check_range(Field::M, m, m >= 3.0)?;
        check_range(Field::Dt, dt, dt > 0.0)?;
        check_range(Field::T, t_final, t_final >= 0.0)?;
        check_range(Field::SgmX, sx, sx > 0.0)?;
        check_range(Field::SgmY, sy, sy > 0.0)?;
        Ok(Self {
            m: m as usize,
            dt,
            t_final,
            packet: WavePacket {
                center: (xc, yc),
                width: (sx, sy),
                momentum: (px, py),
            },
            v0,
            selector: sel as i64,
        })
    }
}
