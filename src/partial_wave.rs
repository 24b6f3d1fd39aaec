//! Partial-wave triangle for a decay into three equal-mass particles.
//!
//! Binds one [`QuantumNumbers`] to a decay `M → π π π` with an exchange
//! resonance in the crossed channels and evaluates the projected amplitude
//! both from the Feynman-parameter integrand and from the dispersion
//! relation. Here all three thresholds are pion thresholds:
//! `s_thresh = t_thresh = 4m²`, and the pseudo-threshold is `(M − m)²`.
//!
//! The two representations agree channel by channel once both carry the
//! same subtractions: the Feynman integrand returns `mT(s) − mT(0)` and the
//! dispersion integrand is weighted by `s/s'`. With one subtraction the
//! vector-exchange waves lose the scheme-dependent constant of their `T(1)`
//! terms, which is otherwise the only difference between the two.

use num_complex::Complex64;

use crate::algo::dispersion::{s_dispersion_contour, t_dispersion, DecayRegion};
use crate::discontinuity::{BreitWigner, Discontinuity};
use crate::feynman::FeynmanIntegrand;
use crate::projection::ProjectionFunction;
use crate::quadrature::GaussLegendre;
use crate::types::{Error, QuantumNumbers, Settings};

/// Spin-projected triangle in both representations.
#[derive(Clone)]
pub struct PartialWaveTriangle<'d> {
    settings: Settings,
    quad: GaussLegendre<f64>,
    integrand: FeynmanIntegrand,
    // None for the composite channels
    projection: Option<ProjectionFunction>,
    exchange: BreitWigner,
    custom: Option<&'d dyn Discontinuity>,
    mp2: f64,
    p_thresh: f64,
    q_thresh: f64,
}

impl core::fmt::Debug for PartialWaveTriangle<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PartialWaveTriangle")
            .field("settings", &self.settings)
            .field("quantum_numbers", &self.integrand.quantum_numbers())
            .field("exchange", &self.exchange)
            .field("custom_discontinuity", &self.custom.is_some())
            .finish()
    }
}

impl<'d> PartialWaveTriangle<'d> {
    /// Default settings.
    ///
    /// # Errors
    /// `InvalidMass` unless `decay_mass > pion_mass > 0`.
    pub fn new(
        qns: QuantumNumbers,
        decay_mass: f64,
        pion_mass: f64,
        exchange: BreitWigner,
    ) -> Result<Self, Error> {
        Self::with_settings(Settings::default(), qns, decay_mass, pion_mass, exchange)
    }

    pub fn with_settings(
        settings: Settings,
        qns: QuantumNumbers,
        decay_mass: f64,
        pion_mass: f64,
        exchange: BreitWigner,
    ) -> Result<Self, Error> {
        settings.validate()?;
        let integrand = FeynmanIntegrand::new(qns, decay_mass, pion_mass, exchange)?;
        let projection = match ProjectionFunction::new(qns, decay_mass, pion_mass) {
            Ok(p) => Some(p),
            Err(Error::FeynmanOnly(channel)) => {
                log::debug!("{channel:?}: Feynman representation only");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            settings,
            quad: GaussLegendre::new(settings.order)?,
            integrand,
            projection,
            exchange,
            custom: None,
            mp2: pion_mass * pion_mass,
            p_thresh: (decay_mass - pion_mass) * (decay_mass - pion_mass),
            q_thresh: (decay_mass + pion_mass) * (decay_mass + pion_mass),
        })
    }

    pub fn quantum_numbers(&self) -> QuantumNumbers {
        self.integrand.quantum_numbers()
    }

    /// Replace the exchange Breit–Wigner in the dispersive `t` integral.
    ///
    /// The Feynman integrand keeps the exchange pole `M² − iMΓ`.
    pub fn set_discontinuity(&mut self, disc: &'d dyn Discontinuity) {
        self.custom = Some(disc);
    }

    /// `4m²`, which is both the s- and t-channel threshold.
    pub fn threshold(&self) -> f64 {
        4.0 * self.mp2
    }

    pub fn pseudo_threshold(&self) -> f64 {
        self.p_thresh
    }

    /// `(M + m)²`, the upper end of the decay region.
    pub fn upper_threshold(&self) -> f64 {
        self.q_thresh
    }

    /// Feynman-parameter integral over the simplex.
    pub fn eval_feynman(&mut self, s: f64) -> Result<Complex64, Error> {
        log::trace!("partial-wave eval_feynman(s = {s})");
        self.quad.ensure_ready()?;
        let rule = self.quad.rule()?;
        Ok(self.integrand.integrate(&rule, s))
    }

    /// Dispersion relation over the projected discontinuity, with the
    /// subtractions of the quantum numbers.
    ///
    /// The s' integral passes below the decay region on a half circle of
    /// margin [`Settings::detour`], where the projected waves with `j ≥ 1`
    /// are too singular for a cut-out interval.
    ///
    /// # Errors
    /// `FeynmanOnly` for composite channels, `InvalidEnergy` unless `s > 0`.
    pub fn eval_dispersive(&mut self, s: f64) -> Result<Complex64, Error> {
        log::trace!("partial-wave eval_dispersive(s = {s})");
        let projection = self
            .projection
            .ok_or(Error::FeynmanOnly(self.integrand.quantum_numbers().channel()))?;
        if !(s.is_finite() && s > 0.0) {
            return Err(Error::InvalidEnergy(s));
        }
        self.quad.ensure_ready()?;
        let rule = self.quad.rule()?;
        let disc: &dyn Discontinuity = match self.custom {
            Some(custom) => custom,
            None => &self.exchange,
        };

        let threshold = self.threshold();
        let mp2 = self.mp2;
        let inner = |sp: Complex64| {
            let prefactor = (sp * (sp - 4.0 * mp2)).sqrt();
            t_dispersion(&rule, threshold, prefactor, |t| disc.disc(t), |t| projection.eval(sp, t))
        };
        let region = DecayRegion {
            s_thresh: threshold,
            p_thresh: self.p_thresh,
            q_thresh: self.q_thresh,
            detour: self.settings.detour,
        };
        let n = self.integrand.quantum_numbers().subtractions().count();
        Ok(s_dispersion_contour(&rule, s, &region, n, inner))
    }
}
