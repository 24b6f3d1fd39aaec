//! Feynman-parameter representation of the triangle.
//!
//! [`FeynmanIntegrand`] is the spin-projected integrand over the three
//! Feynman parameters `x + y + z = 1` of a decay into three equal-mass
//! particles. [`FeynmanKernel`] holds the y-integrated kernels of the
//! scalar triangle with general masses, to be convolved with a
//! discontinuity in the exchange mass squared `t`.

use core::f64::consts::PI;

use num_complex::Complex64;

use crate::algo::constants::EPS;
use crate::algo::rational::{ri_log1, ri_poly1, ri_poly2};
use crate::discontinuity::BreitWigner;
use crate::quadrature::Rule;
use crate::types::{Channel, Error, QuantumNumbers, Subtractions};
use crate::utils::ieps;

/// Spin-projected Feynman-parameter integrand `mT(s)`.
///
/// Pion lines carry `x` and `y`, the exchange line carries `z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeynmanIntegrand {
    qns: QuantumNumbers,
    md2: f64,
    mp2: f64,
    mex2: Complex64,
}

impl FeynmanIntegrand {
    /// # Errors
    /// `InvalidMass` unless `decay_mass > pion_mass > 0`.
    pub fn new(
        qns: QuantumNumbers,
        decay_mass: f64,
        pion_mass: f64,
        exchange: BreitWigner,
    ) -> Result<Self, Error> {
        if !(pion_mass.is_finite() && pion_mass > 0.0) {
            return Err(Error::InvalidMass("pion mass must be positive"));
        }
        if !(decay_mass.is_finite() && decay_mass > pion_mass) {
            return Err(Error::InvalidMass("decay mass must exceed the pion mass"));
        }
        Ok(Self {
            qns,
            md2: decay_mass * decay_mass,
            mp2: pion_mass * pion_mass,
            mex2: exchange.pole(),
        })
    }

    pub fn quantum_numbers(&self) -> QuantumNumbers {
        self.qns
    }

    /// Combined propagator denominator
    /// `x m² + y m² + z M²_ex − xzM² − yzm² − xys`.
    pub fn denominator(&self, x: f64, y: f64, z: f64, s: f64) -> Complex64 {
        let (md2, mp2) = (self.md2, self.mp2);
        self.mex2 * z + (x * mp2 + y * mp2 - x * z * md2 - y * z * mp2 - x * y * s)
    }

    /// Shifted loop momentum squared `x²M² + y²m² + xy(M² + m²) − xys`.
    pub fn delta(&self, x: f64, y: f64, s: f64) -> f64 {
        let (md2, mp2) = (self.md2, self.mp2);
        x * x * md2 + y * y * mp2 + x * y * (md2 + mp2) - x * y * s
    }

    /// Unsubtracted `mT(s)` at one point of the Feynman simplex.
    pub fn m_t(&self, x: f64, y: f64, z: f64, s: f64) -> Complex64 {
        let (md2, mp2) = (self.md2, self.mp2);
        let den = self.denominator(x, y, z, s) - ieps::<f64>();
        let delta = self.delta(x, y, s);

        // Convergent and linearly divergent loop integrals
        let t0 = den.inv() / (2.0 * PI);
        let t1 = den.ln() * 2.0 / (2.0 * PI);

        match self.qns.channel() {
            Channel::SScalar => t0,
            Channel::SVector => t1 + t0 * (delta + 2.0 * s - md2 - 3.0 * mp2),
            Channel::PScalar => t0 * z,
            Channel::PVector => {
                t1 * ((3.0 * z - 1.0) / 2.0) + t0 * (z * (delta + 2.0 * s - md2 - 3.0 * mp2))
            }
            Channel::DScalar => t0 * (z * z),
            Channel::VectorDecay => {
                (t1 + t0 * delta) * (s + md2 - mp2) + t0 * ((s - md2 - mp2) * (md2 - mp2))
            }
            Channel::Omega => t1 * -2.0,
        }
    }

    /// `mT(s)` with the configured number of subtractions at `s = 0`.
    pub fn eval(&self, x: f64, y: f64, z: f64, s: f64) -> Complex64 {
        match self.qns.subtractions() {
            Subtractions::None => self.m_t(x, y, z, s),
            Subtractions::Once => self.m_t(x, y, z, s) - self.m_t(x, y, z, 0.0),
        }
    }

    /// `∫₀¹dx ∫₀^{1−x}dy eval(x, y, 1 − x − y; s)` with `y = (1 − x)v`.
    pub fn integrate(&self, rule: &Rule<'_, f64>, s: f64) -> Complex64 {
        rule.integrate(|u| {
            let inner: Complex64 = rule.integrate(|v| {
                let y = (1.0 - u) * v;
                self.eval(u, y, 1.0 - u - y, s)
            });
            inner * (1.0 - u)
        })
    }
}

/// y-integrated scalar-triangle kernels for masses `m1, m2` on the
/// internal lines and `p1, p2` on the external ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeynmanKernel {
    m1sq: f64,
    m2sq: f64,
    p1sq: f64,
    p2sq: f64,
}

/// Quadratic `a y² + b y + c` in the y Feynman parameter.
#[derive(Debug, Clone, Copy)]
struct Quadratic {
    a: Complex64,
    b: Complex64,
    c: Complex64,
}

impl FeynmanKernel {
    pub fn new(m1: f64, m2: f64, p1: f64, p2: f64) -> Self {
        Self {
            m1sq: m1 * m1,
            m2sq: m2 * m2,
            p1sq: p1 * p1,
            p2sq: p2 * p2,
        }
    }

    fn quadratic(&self, s: f64, t: f64, x: f64) -> Quadratic {
        let b = self.m2sq + (x - 1.0) * self.p2sq + x * self.p1sq - x * s - t;
        let c = (1.0 - x) * t + x * self.m1sq + x * (x - 1.0) * self.p1sq;
        Quadratic {
            a: Complex64::new(self.p2sq, 0.0),
            b: Complex64::new(b, 0.0),
            c: Complex64::new(c, 0.0),
        }
    }

    /// Closed-form y-integral of `1/(a y² + b y + c)` over `[0, 1 − x]`,
    /// written through its two roots, with `p1² → p1² + iε`.
    fn log_integrand(&self, s: f64, t: f64, x: f64) -> Complex64 {
        let p1sq = Complex64::new(self.p1sq, EPS);
        let a = Complex64::new(self.p2sq, 0.0);
        let b = p1sq * x + (self.m2sq + (x - 1.0) * self.p2sq - x * s - t);
        let c = p1sq * (x * (x - 1.0)) + ((1.0 - x) * t + x * self.m1sq);

        let sd = (b * b - a * c * 4.0).sqrt();
        let y_plus = (-b + sd) / (a * 2.0);
        let y_minus = (-b - sd) / (a * 2.0);

        let upper = (y_plus + (x - 1.0)).ln() - (y_minus + (x - 1.0)).ln();
        let lower = y_plus.ln() - y_minus.ln();
        (upper - lower) / sd
    }

    /// `∫₀¹dx ∫₀^{1−x}dy 1/(a y² + b y + c)` by roots of the quadratic.
    ///
    /// This is the kernel convolved in [`Triangle::eval_feynman`]; on the
    /// physical sheet it equals `π mt0`.
    ///
    /// [`Triangle::eval_feynman`]: crate::Triangle::eval_feynman
    pub fn log_kernel(&self, rule: &Rule<'_, f64>, s: f64, t: f64) -> Complex64 {
        rule.integrate(|x| self.log_integrand(s, t, x))
    }

    /// Scalar triangle `mT0(s, t)` from the arctangent form.
    pub fn mt0(&self, rule: &Rule<'_, f64>, s: f64, t: f64) -> Complex64 {
        let sum: Complex64 = rule.integrate(|x| {
            let q = self.quadratic(s, t, x);
            ri_poly1(1.0 - x, q.a, q.b, q.c) - ri_poly1(0.0, q.a, q.b, q.c)
        });
        sum / PI
    }

    /// Triangle with `k²` in the numerator, subtracted at `s = 0`.
    pub fn mt1(&self, rule: &Rule<'_, f64>, s: f64, t: f64) -> Complex64 {
        let poly: Complex64 = rule.integrate(|x| self.y_poly(s, t, x) - self.y_poly(0.0, t, x));
        let log: Complex64 = rule.integrate(|x| self.y_log(s, t, x) - self.y_log(0.0, t, x));
        (poly - log * 2.0) / PI
    }

    fn y_poly(&self, s: f64, t: f64, x: f64) -> Complex64 {
        let Quadratic { a, b, c } = self.quadratic(s, t, x);
        let c = c - ieps::<f64>();
        let e = Complex64::new(self.p2sq, 0.0);
        let f = Complex64::new(x * (self.p1sq + self.p2sq - s), 0.0);
        let g = Complex64::new(x * x * self.p1sq, 0.0);
        ri_poly2(1.0 - x, a, b, c, e, f, g) - ri_poly2(0.0, a, b, c, e, f, g)
    }

    fn y_log(&self, s: f64, t: f64, x: f64) -> Complex64 {
        let Quadratic { a, b, c } = self.quadratic(s, t, x);
        let c = c - ieps::<f64>();
        ri_log1(1.0 - x, a, b, c) - ri_log1(0.0, a, b, c)
    }
}
