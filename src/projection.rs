//! Partial-wave projection of a cross-channel exchange.
//!
//! For a decay `M → π π π` with the exchange in the crossed channel, the
//! projection of the exchange propagator onto s-channel spin `j` reduces to
//! the angular integrals
//!
//! ```text
//! Q_k(s, t) = (1/K(s)) ∫_{t₋}^{t₊} dt' t'^k / (t − t')
//! ```
//!
//! between the Kacser-function endpoints `t∓(s)`. Only `k ≤ 2` has a closed
//! form here, which is why [`QuantumNumbers`] caps `l` per channel.
//!
//! | `(j, j')` | Combination |
//! |-----------|-------------|
//! | (0, 0) | `Q_l` |
//! | (0, 1) | `Q_{l+1} + (2s − M² − 3m²) Q_l` |
//! | (1, 0) | `[2Q_{l+1} + (s − M² − 3m²) Q_l] / K` |
//! | (1, 1) | `[2Q_{l+2} + c₁ Q_{l+1} + c₀ Q_l] / K` |
//! | (2, 0) | `[12Q_{l+2} + 12a Q_{l+1} + (3a² − K²) Q_l] / (2K²)` |
//!
//! with `a = s − M² − 3m²`; the `(2, 0)` row is `P₂` of the scattering
//! angle. The result is multiplied by the barrier ratio `(√λ / (A B))^j` and
//! divided by `t^l`.
//!
//! Every function of `s` accepts complex arguments. The dispersive path
//! leaves the real axis below the decay region, where the `−iε` of the
//! breakup factors keeps the principal branches continuous.

use num_complex::Complex64;

use crate::algo::constants::EPS;
use crate::types::{Channel, Error, QuantumNumbers};
use crate::utils::{ieps, minus_ieps};

/// Projected channels; composites are rejected on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wave {
    SScalar,
    SVector,
    PScalar,
    PVector,
    DScalar,
}

impl Wave {
    fn j(self) -> i32 {
        match self {
            Wave::SScalar | Wave::SVector => 0,
            Wave::PScalar | Wave::PVector => 1,
            Wave::DScalar => 2,
        }
    }
}

/// Angular projection kernel `Q_{jj'}(s, t)` for one decay configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionFunction {
    qns: QuantumNumbers,
    wave: Wave,
    md: f64,
    mp: f64,
    md2: f64,
    mp2: f64,
}

impl ProjectionFunction {
    /// Bind quantum numbers to a decay of mass `decay_mass` into three
    /// particles of mass `pion_mass`.
    ///
    /// # Errors
    /// - `FeynmanOnly`: composite channel
    /// - `InvalidMass`: non-positive masses or `decay_mass ≤ pion_mass`
    pub fn new(qns: QuantumNumbers, decay_mass: f64, pion_mass: f64) -> Result<Self, Error> {
        let wave = match qns.channel() {
            Channel::SScalar => Wave::SScalar,
            Channel::SVector => Wave::SVector,
            Channel::PScalar => Wave::PScalar,
            Channel::PVector => Wave::PVector,
            Channel::DScalar => Wave::DScalar,
            c @ (Channel::VectorDecay | Channel::Omega) => return Err(Error::FeynmanOnly(c)),
        };
        if !(pion_mass.is_finite() && pion_mass > 0.0) {
            return Err(Error::InvalidMass("pion mass must be positive"));
        }
        if !(decay_mass.is_finite() && decay_mass > pion_mass) {
            return Err(Error::InvalidMass("decay mass must exceed the pion mass"));
        }

        Ok(Self {
            qns,
            wave,
            md: decay_mass,
            mp: pion_mass,
            md2: decay_mass * decay_mass,
            mp2: pion_mass * pion_mass,
        })
    }

    pub fn quantum_numbers(&self) -> QuantumNumbers {
        self.qns
    }

    /// The two breakup factors `√((√s ± m)² − M² − iε)`.
    fn breakup(&self, s: Complex64) -> (Complex64, Complex64) {
        let rs = s.sqrt();
        let plus = ((rs + self.mp) * (rs + self.mp) - self.md2 - ieps::<f64>()).sqrt();
        let minus = ((rs - self.mp) * (rs - self.mp) - self.md2 - ieps::<f64>()).sqrt();
        (plus, minus)
    }

    /// `√λ(s, m², m²) = √(s (s − 4m²))`.
    fn two_body_root(&self, s: Complex64) -> Complex64 {
        (s * (s - 4.0 * self.mp2)).sqrt()
    }

    /// Kacser function `K(s)`, for `Re s > 0`.
    ///
    /// Vanishes at `s = 4m²`, at the pseudo-threshold `(M − m)²` and at
    /// `(M + m)²`.
    pub fn kacser(&self, s: impl Into<Complex64>) -> Complex64 {
        let s = s.into();
        let (plus, minus) = self.breakup(s);
        plus * minus * self.two_body_root(s) / s
    }

    fn t_bound(&self, s: Complex64, k: Complex64, sign: f64) -> Complex64 {
        let md2 = Complex64::new(self.md2, EPS);
        md2 + self.mp2 - (s + md2 - self.mp2) / 2.0 + k * (sign / 2.0)
    }

    /// Lower endpoint of the angular integration.
    pub fn t_minus(&self, s: impl Into<Complex64>) -> Complex64 {
        let s = s.into();
        self.t_bound(s, self.kacser(s), -1.0)
    }

    /// Upper endpoint of the angular integration.
    pub fn t_plus(&self, s: impl Into<Complex64>) -> Complex64 {
        let s = s.into();
        self.t_bound(s, self.kacser(s), 1.0)
    }

    /// `(√λ(s, m², m²) / (A B))^j`, removing the barrier factor of spin `j`.
    pub fn barrier_ratio(&self, s: impl Into<Complex64>) -> Complex64 {
        let j = self.wave.j();
        if j == 0 {
            return Complex64::new(1.0, 0.0);
        }
        let s = s.into();
        let (plus, minus) = self.breakup(s);
        (self.two_body_root(s) / plus / minus).powi(j)
    }

    /// Single angular kernel `Q_k(s, t)`.
    ///
    /// # Errors
    /// `UnsupportedKernelOrder` for `k > 2`.
    pub fn q_kernel(&self, k: u32, s: impl Into<Complex64>, t: f64) -> Result<Complex64, Error> {
        if k > 2 {
            return Err(Error::UnsupportedKernelOrder(k));
        }
        let s = s.into();
        let kac = self.kacser(s);
        Ok(q_table(t, kac, self.t_bound(s, kac, -1.0), self.t_bound(s, kac, 1.0))[k as usize])
    }

    /// `Q_{jj'}(s, t)` with barrier and `t^l` factors removed.
    pub fn eval(&self, s: impl Into<Complex64>, t: f64) -> Complex64 {
        let s = s.into();
        let (md2, mp2) = (self.md2, self.mp2);
        let kac = self.kacser(s);
        let q = q_table(t, kac, self.t_bound(s, kac, -1.0), self.t_bound(s, kac, 1.0));
        let l = self.qns.l() as usize;
        let a = s - md2 - 3.0 * mp2;

        let r = match self.wave {
            Wave::SScalar => q[l],
            Wave::SVector => q[l + 1] + q[l] * (s * 2.0 - md2 - 3.0 * mp2),
            Wave::PScalar => (q[l + 1] * 2.0 + q[l] * a) / kac,
            Wave::PVector => {
                let c1 = s * 5.0 - 3.0 * md2 - 9.0 * mp2;
                let c0 = s * s * 2.0 - s * (3.0 * md2 + 9.0 * mp2)
                    + md2 * md2
                    + 6.0 * md2 * mp2
                    + 9.0 * mp2 * mp2;
                (q[l + 2] * 2.0 + q[l + 1] * c1 + q[l] * c0) / kac
            }
            Wave::DScalar => {
                let d0 = a * a * 3.0 - kac * kac;
                (q[l + 2] * 12.0 + q[l + 1] * (a * 12.0) + q[l] * d0) / (kac * kac * 2.0)
            }
        };

        r * self.barrier_ratio(s) / t.powi(l as i32)
    }

    /// Pseudo-threshold `(M − m)²`, where `K(s)` vanishes inside the
    /// dispersive range.
    pub fn pseudo_threshold(&self) -> f64 {
        (self.md - self.mp) * (self.md - self.mp)
    }

    /// `(M + m)²`, the upper end of the decay region.
    pub fn upper_threshold(&self) -> f64 {
        (self.md + self.mp) * (self.md + self.mp)
    }

    /// Two-pion threshold `4m²`.
    pub fn threshold(&self) -> f64 {
        4.0 * self.mp2
    }
}

/// `[Q₀, Q₁, Q₂]` at `t` for endpoints `t∓` and Kacser value `k`.
///
/// `t` carries its own `−iε` so the logarithms stay on the lower sheet
/// when `t` lands on a real endpoint.
fn q_table(t: f64, k: Complex64, t_minus: Complex64, t_plus: Complex64) -> [Complex64; 3] {
    let tc = minus_ieps(t);
    let q0 = ((tc - t_minus).ln() - (tc - t_plus).ln()) / k;
    let q1 = q0 * t - 1.0;
    let q2 = q0 * (t * t) - t - (t_plus * t_plus - t_minus * t_minus) * 0.5 / k;
    [q0, q1, q2]
}
