//! Left-hand-cut discontinuities fed into the `t` integrals.

use num_complex::Complex64;

use crate::types::Error;

/// Discontinuity of the exchanged line shape across its cut.
///
/// Called at every node of the `t` quadrature, from the cut threshold
/// out to large `t`. It should be smooth there.
pub trait Discontinuity {
    fn disc(&self, t: f64) -> Complex64;
}

impl<F> Discontinuity for F
where
    F: Fn(f64) -> Complex64,
{
    #[inline]
    fn disc(&self, t: f64) -> Complex64 {
        self(t)
    }
}

/// Fixed-width Breit–Wigner resonance.
///
/// `disc(t) = Im 1/(M² − iMΓ − t) = MΓ / ((M² − t)² + M²Γ²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreitWigner {
    mass: f64,
    width: f64,
}

impl BreitWigner {
    /// # Errors
    /// `InvalidMass` unless `mass > 0` and `width ≥ 0`, both finite.
    pub fn new(mass: f64, width: f64) -> Result<Self, Error> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(Error::InvalidMass("exchange mass must be positive"));
        }
        if !(width.is_finite() && width >= 0.0) {
            return Err(Error::InvalidMass("exchange width must be non-negative"));
        }
        Ok(Self { mass, width })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Complex pole position `M² − iMΓ`.
    pub fn pole(&self) -> Complex64 {
        Complex64::new(self.mass * self.mass, -self.mass * self.width)
    }
}

impl Discontinuity for BreitWigner {
    #[inline]
    fn disc(&self, t: f64) -> Complex64 {
        let m2 = self.mass * self.mass;
        let mg = self.mass * self.width;
        let dt = m2 - t;
        Complex64::new(mg / (dt * dt + mg * mg), 0.0)
    }
}
