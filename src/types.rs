//! Core types for triangle-amplitude computation.

use core::fmt;

use crate::algo::constants::{DEFAULT_DETOUR, DEFAULT_EXCLUSION, DEFAULT_ORDER};

/// Spin structure of the rescattering, selecting the closed-form kernel.
///
/// The first five variants are the `(j, j')` combinations for which both
/// the partial-wave projection and the Feynman-parameter integrand have
/// closed forms. The last two are composite structures that exist only
/// in Feynman-parameter space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// j = 0, j' = 0.
    SScalar,
    /// j = 0, j' = 1.
    SVector,
    /// j = 1, j' = 0.
    PScalar,
    /// j = 1, j' = 1.
    PVector,
    /// j = 2, j' = 0.
    DScalar,
    /// Vector decay into a vector and a pseudoscalar.
    VectorDecay,
    /// ω → 3π helicity structure.
    Omega,
}

impl Channel {
    /// Look up the channel for total spin `j` and exchange spin `jp`.
    ///
    /// # Errors
    /// `UnsupportedWaveCombination` for any pair outside the table.
    pub fn from_spins(j: i32, jp: i32) -> Result<Self, Error> {
        match (j, jp) {
            (0, 0) => Ok(Channel::SScalar),
            (0, 1) => Ok(Channel::SVector),
            (1, 0) => Ok(Channel::PScalar),
            (1, 1) => Ok(Channel::PVector),
            (2, 0) => Ok(Channel::DScalar),
            _ => Err(Error::UnsupportedWaveCombination { j, jp }),
        }
    }

    /// `(j, j')` for projected channels, `None` for composites.
    pub fn spins(self) -> Option<(u32, u32)> {
        match self {
            Channel::SScalar => Some((0, 0)),
            Channel::SVector => Some((0, 1)),
            Channel::PScalar => Some((1, 0)),
            Channel::PVector => Some((1, 1)),
            Channel::DScalar => Some((2, 0)),
            Channel::VectorDecay | Channel::Omega => None,
        }
    }

    /// Highest `Q_{l+k}` offset `k` the projection of this channel needs.
    pub(crate) fn kernel_reach(self) -> u32 {
        match self {
            Channel::SScalar => 0,
            Channel::SVector | Channel::PScalar => 1,
            Channel::PVector | Channel::DScalar => 2,
            Channel::VectorDecay | Channel::Omega => 0,
        }
    }
}

/// Number of subtractions at `s = 0`.
///
/// The Feynman integrand subtracts its own value at zero; the dispersion
/// relation weights its integrand by `(s/s')ⁿ`. Both vanish at `s = 0` for
/// `n = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtractions {
    /// Return `mT(s)` as is.
    None,
    /// Return `mT(s) − mT(0)`.
    Once,
}

impl Subtractions {
    /// # Errors
    /// `InvalidSubtractionOrder` unless `n` is 0 or 1.
    pub fn from_count(n: i32) -> Result<Self, Error> {
        match n {
            0 => Ok(Subtractions::None),
            1 => Ok(Subtractions::Once),
            _ => Err(Error::InvalidSubtractionOrder(n)),
        }
    }

    pub fn count(self) -> u32 {
        match self {
            Subtractions::None => 0,
            Subtractions::Once => 1,
        }
    }
}

/// Quantum numbers shared by the projection and Feynman-integrand kernels.
///
/// Validated on construction: once a `QuantumNumbers` exists, every
/// kernel lookup it drives has a closed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantumNumbers {
    channel: Channel,
    l: u32,
    subtractions: Subtractions,
}

impl QuantumNumbers {
    /// Build from raw spins `j`, `jp`, orbital `l` and subtraction count `n`.
    ///
    /// # Errors
    /// - `UnsupportedWaveCombination`: `(j, jp)` has no kernel
    /// - `InvalidSubtractionOrder`: `n` is not 0 or 1
    /// - `UnsupportedKernelOrder`: `l` pushes the projection past `Q_2`
    pub fn new(j: i32, jp: i32, l: u32, n: i32) -> Result<Self, Error> {
        let channel = Channel::from_spins(j, jp)?;
        Self::with_channel(channel, l, n)
    }

    /// Build for an explicit channel, including the composite ones.
    pub fn with_channel(channel: Channel, l: u32, n: i32) -> Result<Self, Error> {
        let subtractions = Subtractions::from_count(n)?;
        let reach = l + channel.kernel_reach();
        if reach > 2 {
            return Err(Error::UnsupportedKernelOrder(reach));
        }
        Ok(Self {
            channel,
            l,
            subtractions,
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Orbital angular momentum removed from the exchange propagator.
    pub fn l(&self) -> u32 {
        self.l
    }

    pub fn subtractions(&self) -> Subtractions {
        self.subtractions
    }
}

/// Which subtracted t-kernel `Triangle::eval_feynman_kernel` convolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelOrder {
    /// Plain scalar triangle, `mT0`.
    Zero,
    /// Triangle with `k²` in the numerator, `mT1`.
    One,
}

/// Numerical settings shared by the evaluators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Gauss–Legendre order of every quadrature, inner and outer.
    pub order: usize,
    /// Half-width of the s-interval cut out around the pseudo-threshold.
    pub exclusion: f64,
    /// Margin of the half circle on which the partial-wave dispersion
    /// integral passes below the decay region.
    pub detour: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            exclusion: DEFAULT_EXCLUSION,
            detour: DEFAULT_DETOUR,
        }
    }
}

impl Settings {
    /// # Errors
    /// `InvalidOrder` for order zero, `InvalidExclusion` for a negative or
    /// non-finite exclusion, `InvalidDetour` unless the detour is positive.
    pub fn validate(&self) -> Result<(), Error> {
        if self.order == 0 {
            return Err(Error::InvalidOrder(self.order));
        }
        if !(self.exclusion.is_finite() && self.exclusion >= 0.0) {
            return Err(Error::InvalidExclusion(self.exclusion));
        }
        if !(self.detour.is_finite() && self.detour > 0.0) {
            return Err(Error::InvalidDetour(self.detour));
        }
        Ok(())
    }
}

/// Error type for triangle-amplitude computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// No closed-form kernel exists for this `(j, j')` pair.
    UnsupportedWaveCombination { j: i32, jp: i32 },
    /// Only zero or one subtraction is implemented.
    InvalidSubtractionOrder(i32),
    /// Angular kernel `Q_k` requested beyond the tabulated `k ≤ 2`.
    UnsupportedKernelOrder(u32),
    /// The channel exists only in the Feynman-parameter representation.
    FeynmanOnly(Channel),
    /// Generated node/weight counts disagree with the requested order.
    QuadratureMismatch {
        expected: usize,
        abscissas: usize,
        weights: usize,
    },
    /// Integration attempted before the quadrature table was generated.
    QuadratureNotReady,
    /// Quadrature order must be at least one.
    InvalidOrder(usize),
    /// Pseudo-threshold exclusion must be finite and non-negative.
    InvalidExclusion(f64),
    /// Contour margin around the decay region must be finite and positive.
    InvalidDetour(f64),
    /// Evaluation attempted before the named configuration step.
    Unconfigured(&'static str),
    /// A mass is negative, non-finite, or breaks the `p1 ≥ p2` convention.
    InvalidMass(&'static str),
    /// Dispersive evaluation needs `s > 0`.
    InvalidEnergy(f64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedWaveCombination { j, jp } => {
                write!(f, "j = {j} and j' = {jp} combination not available")
            }
            Error::InvalidSubtractionOrder(n) => {
                write!(
                    f,
                    "n = {n} subtractions not implemented; the integral needs n = 0 or n = 1"
                )
            }
            Error::UnsupportedKernelOrder(k) => {
                write!(f, "angular kernel Q_{k} not available (k must be at most 2)")
            }
            Error::FeynmanOnly(channel) => {
                write!(
                    f,
                    "{channel:?} has no partial-wave projection; use the Feynman representation"
                )
            }
            Error::QuadratureMismatch {
                expected,
                abscissas,
                weights,
            } => {
                write!(
                    f,
                    "wrong number of quadrature nodes: expected {expected}, got {abscissas} abscissas and {weights} weights"
                )
            }
            Error::QuadratureNotReady => {
                write!(f, "quadrature table used before ensure_ready()")
            }
            Error::InvalidOrder(n) => {
                write!(f, "invalid quadrature order {n}")
            }
            Error::InvalidExclusion(exc) => {
                write!(f, "invalid pseudo-threshold exclusion {exc}")
            }
            Error::InvalidDetour(r) => {
                write!(f, "invalid contour margin {r} around the decay region")
            }
            Error::Unconfigured(what) => {
                write!(f, "triangle not configured: {what} not set")
            }
            Error::InvalidMass(what) => {
                write!(f, "invalid mass: {what}")
            }
            Error::InvalidEnergy(s) => {
                write!(f, "invalid energy s = {s}: dispersive evaluation needs s > 0")
            }
        }
    }
}

impl core::error::Error for Error {}
