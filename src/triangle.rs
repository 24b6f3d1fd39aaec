//! Triangle rescattering amplitude in two representations.
//!
//! A [`Triangle`] describes an external particle of mass `p1` decaying into
//! a spectator of mass `p2` and a pair on the internal lines `m1`, `m2`,
//! which rescatter through a cross-channel exchange with discontinuity
//! `disc(t)` starting at `t_thresh = (m2 + p2)²`.
//!
//! - [`Triangle::eval_feynman`] convolves `disc(t)` with the
//!   Feynman-parameter kernel of the scalar triangle.
//! - [`Triangle::eval_dispersive`] projects `disc(t)` onto the s-channel
//!   and solves the s-channel dispersion relation with pole subtraction,
//!   splitting the range at the pseudo-threshold `(p1 − p2)²`.
//!
//! The two agree up to normalization, which is what the scan demo and the
//! integration tests check.
//!
//! # Example
//!
//! ```
//! use kt_triangle::Triangle;
//! use kt_triangle::masses::M_PION;
//!
//! let mut tri = Triangle::new();
//! tri.set_exchange_mass(0.770, 0.145)?;
//! tri.set_internal_masses(M_PION, M_PION)?;
//! tri.set_external_masses(0.780, M_PION)?;
//!
//! let feynman = tri.eval_feynman(0.2)?;
//! let dispersive = tri.eval_dispersive(0.2)?;
//! assert!(feynman.norm() > 0.0 && dispersive.norm() > 0.0);
//! # Ok::<(), kt_triangle::Error>(())
//! ```

use core::f64::consts::PI;

use num_complex::Complex64;

use crate::algo::constants::EPS;
use crate::algo::dispersion::{s_dispersion_split, t_dispersion, SChannel};
use crate::discontinuity::{BreitWigner, Discontinuity};
use crate::feynman::FeynmanKernel;
use crate::quadrature::GaussLegendre;
use crate::types::{Error, KernelOrder, Settings};
use crate::utils::{csqrt, kallen, re};

/// Masses and thresholds derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Kinematics {
    m1: f64,
    m2: f64,
    m1sq: f64,
    m2sq: f64,
    p1: f64,
    p2: f64,
    p1sq: f64,
    p2sq: f64,
    s_thresh: f64,
    p_thresh: f64,
    t_thresh: f64,
}

impl Kinematics {
    fn new((m1, m2): (f64, f64), (p1, p2): (f64, f64)) -> Self {
        Self {
            m1,
            m2,
            m1sq: m1 * m1,
            m2sq: m2 * m2,
            p1,
            p2,
            p1sq: p1 * p1,
            p2sq: p2 * p2,
            s_thresh: (m1 + m2) * (m1 + m2),
            p_thresh: (p1 - p2) * (p1 - p2),
            t_thresh: (m2 + p2) * (m2 + p2),
        }
    }

    fn kacser(&self, s: f64) -> Complex64 {
        let rs = s.sqrt();
        let minus = Complex64::new((rs - self.p2) * (rs - self.p2) - self.p1sq, -EPS).sqrt();
        let plus = Complex64::new((rs + self.p2) * (rs + self.p2) - self.p1sq, -EPS).sqrt();
        minus * plus * csqrt(kallen(s, self.m1sq, self.m2sq)) / s
    }

    fn t_bound(&self, s: f64, k: Complex64, sign: f64) -> Complex64 {
        let p1sq = Complex64::new(self.p1sq, EPS);
        p1sq + self.m1sq - (p1sq + (s - self.p2sq)) * (s + self.m1sq - self.m2sq) / (2.0 * s)
            + k * (sign / 2.0)
    }

    fn projection(&self, s: f64, t: f64) -> Complex64 {
        let k = self.kacser(s);
        let t_minus = self.t_bound(s, k, -1.0);
        let t_plus = self.t_bound(s, k, 1.0);
        ((re(t) - t_minus).ln() - (re(t) - t_plus).ln()) / k
    }

    fn s_channel(&self, exclusion: f64) -> SChannel {
        SChannel {
            s_thresh: self.s_thresh,
            p_thresh: self.p_thresh,
            exclusion,
        }
    }
}

/// Triangle amplitude evaluator.
///
/// Starts unconfigured; every setter may be called again to reconfigure.
/// The quadrature table is generated on the first evaluation and survives
/// reconfiguration.
#[derive(Clone)]
pub struct Triangle<'d> {
    settings: Settings,
    quad: GaussLegendre<f64>,
    exchange: Option<BreitWigner>,
    custom: Option<&'d dyn Discontinuity>,
    internal: Option<(f64, f64)>,
    external: Option<(f64, f64)>,
    kinematics: Option<Kinematics>,
}

impl core::fmt::Debug for Triangle<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Triangle")
            .field("settings", &self.settings)
            .field("exchange", &self.exchange)
            .field("custom_discontinuity", &self.custom.is_some())
            .field("internal", &self.internal)
            .field("external", &self.external)
            .field("quadrature_ready", &self.quad.is_ready())
            .finish()
    }
}

impl Default for Triangle<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> Triangle<'d> {
    /// Unconfigured evaluator with default settings.
    pub fn new() -> Self {
        let settings = Settings::default();
        Self {
            settings,
            quad: GaussLegendre::default(),
            exchange: None,
            custom: None,
            internal: None,
            external: None,
            kinematics: None,
        }
    }

    /// Unconfigured evaluator with explicit settings.
    ///
    /// # Errors
    /// Whatever [`Settings::validate`] rejects.
    pub fn with_settings(settings: Settings) -> Result<Self, Error> {
        settings.validate()?;
        Ok(Self {
            settings,
            quad: GaussLegendre::new(settings.order)?,
            exchange: None,
            custom: None,
            internal: None,
            external: None,
            kinematics: None,
        })
    }

    /// Settings fixed at construction.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Exchange resonance. Installs its Breit–Wigner discontinuity unless
    /// one was given with [`set_discontinuity`](Self::set_discontinuity).
    pub fn set_exchange_mass(&mut self, mass: f64, width: f64) -> Result<(), Error> {
        let bw = BreitWigner::new(mass, width)
            .inspect_err(|e| log::warn!("rejected exchange: {e}"))?;
        self.exchange = Some(bw);
        log::debug!("exchange set to M = {mass}, Γ = {width}");
        Ok(())
    }

    /// Caller-owned discontinuity, taking precedence over the exchange
    /// Breit–Wigner.
    pub fn set_discontinuity(&mut self, disc: &'d dyn Discontinuity) {
        self.custom = Some(disc);
        log::debug!("custom discontinuity installed");
    }

    /// Masses of the two rescattering lines.
    pub fn set_internal_masses(&mut self, m1: f64, m2: f64) -> Result<(), Error> {
        for m in [m1, m2] {
            if !(m.is_finite() && m > 0.0) {
                let err = Error::InvalidMass("internal masses must be positive");
                log::warn!("rejected internal masses ({m1}, {m2}): {err}");
                return Err(err);
            }
        }
        self.internal = Some((m1, m2));
        self.update_kinematics();
        Ok(())
    }

    /// Masses of the decaying particle `p1` and the spectator `p2`.
    ///
    /// # Errors
    /// `InvalidMass` unless `p1 ≥ p2 > 0`.
    pub fn set_external_masses(&mut self, p1: f64, p2: f64) -> Result<(), Error> {
        let err = if !(p1.is_finite() && p2.is_finite() && p2 > 0.0) {
            Some(Error::InvalidMass("external masses must be positive"))
        } else if p1 < p2 {
            Some(Error::InvalidMass("external masses must satisfy p1 >= p2"))
        } else {
            None
        };
        if let Some(err) = err {
            log::warn!("rejected external masses ({p1}, {p2}): {err}");
            return Err(err);
        }
        self.external = Some((p1, p2));
        self.update_kinematics();
        Ok(())
    }

    fn update_kinematics(&mut self) {
        if let (Some(internal), Some(external)) = (self.internal, self.external) {
            let kin = Kinematics::new(internal, external);
            log::debug!(
                "thresholds: s = {:.6}, pseudo = {:.6}, t = {:.6}",
                kin.s_thresh,
                kin.p_thresh,
                kin.t_thresh
            );
            self.kinematics = Some(kin);
        }
    }

    /// `true` once masses and a discontinuity are set.
    pub fn is_configured(&self) -> bool {
        self.kinematics.is_some() && (self.custom.is_some() || self.exchange.is_some())
    }

    fn kinematics(&self) -> Result<&Kinematics, Error> {
        match (&self.kinematics, self.internal, self.external) {
            (Some(kin), _, _) => Ok(kin),
            (None, None, _) => Err(Error::Unconfigured("internal masses")),
            (None, _, _) => Err(Error::Unconfigured("external masses")),
        }
    }

    fn discontinuity(&self) -> Result<&dyn Discontinuity, Error> {
        match (self.custom, &self.exchange) {
            (Some(custom), _) => Ok(custom),
            (None, Some(bw)) => Ok(bw),
            (None, None) => Err(Error::Unconfigured("exchange mass")),
        }
    }

    /// Two-body threshold `(m1 + m2)²`.
    pub fn s_threshold(&self) -> Result<f64, Error> {
        Ok(self.kinematics()?.s_thresh)
    }

    /// Pseudo-threshold `(p1 − p2)²`.
    pub fn pseudo_threshold(&self) -> Result<f64, Error> {
        Ok(self.kinematics()?.p_thresh)
    }

    /// Start of the left-hand cut `(m2 + p2)²`.
    pub fn t_threshold(&self) -> Result<f64, Error> {
        Ok(self.kinematics()?.t_thresh)
    }

    /// Kacser function
    /// `√((√s − p2)² − p1² − iε) √((√s + p2)² − p1² − iε) √λ(s, m1², m2²) / s`.
    pub fn kacser(&self, s: f64) -> Result<Complex64, Error> {
        Ok(self.kinematics()?.kacser(s))
    }

    /// Lower endpoint `t₋(s)` of the angular integration.
    pub fn t_minus(&self, s: f64) -> Result<Complex64, Error> {
        let kin = self.kinematics()?;
        Ok(kin.t_bound(s, kin.kacser(s), -1.0))
    }

    /// Upper endpoint `t₊(s)` of the angular integration.
    pub fn t_plus(&self, s: f64) -> Result<Complex64, Error> {
        let kin = self.kinematics()?;
        Ok(kin.t_bound(s, kin.kacser(s), 1.0))
    }

    /// S-wave projection `[log(t − t₋) − log(t − t₊)] / K(s)`.
    pub fn projection(&self, s: f64, t: f64) -> Result<Complex64, Error> {
        Ok(self.kinematics()?.projection(s, t))
    }

    /// Amplitude from the Feynman-parameter representation.
    ///
    /// `(1/π) ∫_{t_thresh}^∞ dt disc(t) ∫₀¹dx ∫₀^{1−x}dy 1/D(x, y; s, t)`.
    pub fn eval_feynman(&mut self, s: f64) -> Result<Complex64, Error> {
        log::trace!("eval_feynman(s = {s})");
        self.quad.ensure_ready()?;
        let kin = self.kinematics()?;
        let disc = self.discontinuity()?;
        let rule = self.quad.rule()?;
        let kernel = self.kernel(kin);

        let sum: Complex64 = rule.integrate_semi_infinite(kin.t_thresh, |t| {
            disc.disc(t) * kernel.log_kernel(&rule, s, t)
        });
        Ok(sum / PI)
    }

    /// Convolution `∫_{t_thresh}^∞ dt disc(t) mT_k(s, t)` with the
    /// arctangent-form kernels of [`FeynmanKernel`].
    pub fn eval_feynman_kernel(&mut self, s: f64, order: KernelOrder) -> Result<Complex64, Error> {
        log::trace!("eval_feynman_kernel(s = {s}, {order:?})");
        self.quad.ensure_ready()?;
        let kin = self.kinematics()?;
        let disc = self.discontinuity()?;
        let rule = self.quad.rule()?;
        let kernel = self.kernel(kin);

        let sum = rule.integrate_semi_infinite(kin.t_thresh, |t| {
            let k = match order {
                KernelOrder::Zero => kernel.mt0(&rule, s, t),
                KernelOrder::One => kernel.mt1(&rule, s, t),
            };
            disc.disc(t) * k
        });
        Ok(sum)
    }

    /// Amplitude from the dispersive representation.
    ///
    /// # Errors
    /// `InvalidEnergy` unless `s > 0`; `Unconfigured` before the masses
    /// and a discontinuity are set.
    pub fn eval_dispersive(&mut self, s: f64) -> Result<Complex64, Error> {
        log::trace!("eval_dispersive(s = {s})");
        if !(s.is_finite() && s > 0.0) {
            return Err(Error::InvalidEnergy(s));
        }
        self.quad.ensure_ready()?;
        let kin = self.kinematics()?;
        let disc = self.discontinuity()?;
        let rule = self.quad.rule()?;

        let inner = |sp: f64| {
            let prefactor = csqrt(kallen(sp, kin.m1sq, kin.m2sq));
            let proj = |t| kin.projection(sp, t);
            t_dispersion(&rule, kin.t_thresh, prefactor, |t| disc.disc(t), proj)
        };
        Ok(s_dispersion_split(&rule, s, &kin.s_channel(self.settings.exclusion), inner))
    }

    fn kernel(&self, kin: &Kinematics) -> FeynmanKernel {
        FeynmanKernel::new(kin.m1, kin.m2, kin.p1, kin.p2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masses::M_PION;

    fn omega_like<'d>() -> Triangle<'d> {
        let mut tri = Triangle::new();
        tri.set_exchange_mass(0.770, 0.145).unwrap();
        tri.set_internal_masses(M_PION, M_PION).unwrap();
        tri.set_external_masses(0.780, M_PION).unwrap();
        tri
    }

    fn omega_with_order<'d>(order: usize) -> Triangle<'d> {
        let mut tri = Triangle::with_settings(Settings {
            order,
            ..Settings::default()
        })
        .unwrap();
        tri.set_exchange_mass(0.770, 0.145).unwrap();
        tri.set_internal_masses(M_PION, M_PION).unwrap();
        tri.set_external_masses(0.780, M_PION).unwrap();
        tri
    }

    fn rel(a: Complex64, b: Complex64) -> f64 {
        (a - b).norm() / b.norm()
    }

    // ── configuration ──

    #[test]
    fn unconfigured_errors() {
        let mut tri = Triangle::new();
        assert_eq!(tri.eval_feynman(0.2), Err(Error::Unconfigured("internal masses")));
        tri.set_internal_masses(M_PION, M_PION).unwrap();
        assert_eq!(tri.eval_dispersive(0.2), Err(Error::Unconfigured("external masses")));
        tri.set_external_masses(0.780, M_PION).unwrap();
        assert!(!tri.is_configured());
        assert_eq!(tri.eval_feynman(0.2), Err(Error::Unconfigured("exchange mass")));
        tri.set_exchange_mass(0.770, 0.145).unwrap();
        assert!(tri.is_configured());
    }

    #[test]
    fn external_ordering_enforced() {
        let mut tri = Triangle::new();
        assert!(tri.set_external_masses(M_PION, 0.780).is_err());
        assert!(tri.set_internal_masses(-1.0, M_PION).is_err());
        assert!(tri.set_exchange_mass(0.770, -0.1).is_err());
    }

    #[test]
    fn thresholds() {
        let tri = omega_like();
        assert!((tri.s_threshold().unwrap() - 0.07791982070308841).abs() < 1e-15);
        assert!((tri.pseudo_threshold().unwrap() - 0.4101498035757721).abs() < 1e-15);
        assert!((tri.t_threshold().unwrap() - 0.07791982070308841).abs() < 1e-15);
    }

    #[test]
    fn reconfiguration_recomputes_thresholds() {
        let mut tri = omega_like();
        tri.set_internal_masses(0.2, 0.3).unwrap();
        assert!((tri.s_threshold().unwrap() - 0.25).abs() < 1e-15);
        assert!((tri.t_threshold().unwrap() - (0.3 + M_PION).powi(2)).abs() < 1e-15);
    }

    #[test]
    fn invalid_energy() {
        let mut tri = omega_like();
        assert_eq!(tri.eval_dispersive(0.0), Err(Error::InvalidEnergy(0.0)));
        assert!(tri.eval_dispersive(-0.1).is_err());
    }

    #[test]
    fn bad_settings() {
        let settings = Settings {
            order: 0,
            ..Settings::default()
        };
        assert_eq!(Triangle::with_settings(settings).unwrap_err(), Error::InvalidOrder(0));
    }

    // ── kinematic helpers ──

    #[test]
    fn kacser_boundaries() {
        let tri = omega_like();
        // Zero at the two-body threshold
        let s_th = tri.s_threshold().unwrap();
        assert!(tri.kacser(s_th).unwrap().norm() < 1e-7);
        // Small at the pseudo-threshold
        let p_th = tri.pseudo_threshold().unwrap();
        assert!(tri.kacser(p_th).unwrap().norm() < 1e-3);
        // Real between them, imaginary in the decay region, real above (p1 + p2)²
        let k = tri.kacser(0.2).unwrap();
        assert!((k.re + 0.28777776531874116).abs() < 1e-10 && k.im.abs() < 1e-5);
        let k = tri.kacser(0.6).unwrap();
        assert!((k.im + 0.2014288252835003).abs() < 1e-10 && k.re.abs() < 1e-6);
        let k = tri.kacser(0.9456).unwrap();
        assert!((k.re - 0.22164794038600785).abs() < 1e-10 && k.im.abs() < 1e-5);
    }

    #[test]
    fn endpoints_and_projection() {
        let tri = omega_like();
        let tm = tri.t_minus(0.2).unwrap();
        let tp = tri.t_plus(0.2).unwrap();
        assert!(rel(tm, Complex64::new(0.37730881542302874, 9.124660982035626e-07)) < 1e-12);
        assert!(rel(tp, Complex64::new(0.08953105010428755, 8.753390179643745e-08)) < 1e-12);
        let p = tri.projection(0.2, 0.6).unwrap();
        assert!(rel(p, Complex64::new(2.882584840154803, 5.3792758976722905e-06)) < 1e-10);
        let p = tri.projection(0.6, 0.6).unwrap();
        assert!(rel(p, Complex64::new(1.7467303445961864, 1.5013501230035846e-06)) < 1e-10);
    }

    // ── evaluation ──

    #[test]
    fn feynman_reference_values() {
        let mut tri = omega_like();
        let v = tri.eval_feynman(0.2).unwrap();
        assert!(rel(v, Complex64::new(3.9926356810281503, 6.822809088002817)) < 1e-7, "{v}");
        let v = tri.eval_feynman(0.5).unwrap();
        assert!(rel(v, Complex64::new(0.9691557407096849, 4.9946306203789845)) < 1e-7, "{v}");
    }

    #[test]
    fn dispersive_reference_values() {
        let mut tri = omega_like();
        let v = tri.eval_dispersive(0.2).unwrap();
        assert!(rel(v, Complex64::new(1.2331490014513027, 2.231185661668849)) < 1e-7, "{v}");
        let v = tri.eval_dispersive(0.5).unwrap();
        assert!(rel(v, Complex64::new(0.32513325619442157, 1.5945849016656684)) < 1e-7, "{v}");
    }

    #[test]
    fn t_dispersion_reference_value() {
        let mut tri = omega_like();
        tri.quad.ensure_ready().unwrap();
        let kin = *tri.kinematics().unwrap();
        let rule = tri.quad.rule().unwrap();
        let bw = BreitWigner::new(0.770, 0.145).unwrap();
        let prefactor = csqrt(kallen(0.2, kin.m1sq, kin.m2sq));
        let proj = |t| kin.projection(0.2, t);
        let v = t_dispersion(&rule, kin.t_thresh, prefactor, |t| bw.disc(t), proj);
        assert!(rel(v, Complex64::new(0.4260090714878686, 0.1404108306941654)) < 1e-9);
    }

    #[test]
    fn custom_discontinuity_overrides_exchange() {
        let bw = BreitWigner::new(0.770, 0.145).unwrap();
        let doubled = move |t: f64| bw.disc(t) * 2.0;
        let mut tri = omega_like();
        let single = tri.eval_feynman(0.3).unwrap();
        tri.set_discontinuity(&doubled);
        let double = tri.eval_feynman(0.3).unwrap();
        assert!((double - single * 2.0).norm() < 1e-12 * double.norm());
    }

    #[test]
    fn kernel_order_one_subtracted() {
        let mut tri = omega_with_order(24);
        let zero = tri.eval_feynman_kernel(0.0, KernelOrder::One).unwrap();
        assert_eq!(zero, Complex64::new(0.0, 0.0));
        let v = tri.eval_feynman_kernel(0.2, KernelOrder::One).unwrap();
        assert!(rel(v, Complex64::new(-0.8963220566165, 1.1670875154808116)) < 1e-6, "{v}");
    }

    #[test]
    fn kernel_order_zero_matches_log_kernel() {
        // Same scalar triangle; only the placement of −iε differs
        let mut tri = omega_with_order(48);
        let kernel = tri.eval_feynman_kernel(0.5, KernelOrder::Zero).unwrap();
        let direct = tri.eval_feynman(0.5).unwrap();
        assert!(rel(kernel, direct) < 1e-5, "{kernel} vs {direct}");
    }

    #[test]
    fn quadrature_survives_reconfiguration() {
        let mut tri = omega_like();
        tri.eval_feynman(0.1).unwrap();
        let ptr = tri.quad.nodes().unwrap().0.as_ptr();
        tri.set_external_masses(0.9, M_PION).unwrap();
        tri.eval_feynman(0.1).unwrap();
        assert_eq!(tri.quad.nodes().unwrap().0.as_ptr(), ptr);
    }
}
