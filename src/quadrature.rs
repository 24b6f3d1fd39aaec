//! Cached fixed-order Gauss–Legendre quadrature.
//!
//! A [`GaussLegendre`] owns the node table for one order. The table is built
//! lazily by [`GaussLegendre::ensure_ready`] and then borrowed as a
//! [`Rule`], which carries the actual integration routines. Splitting the two
//! keeps the integrators infallible: the only failure mode (using the table
//! before it exists) is reported once, when the rule is borrowed.
//!
//! All integrals are taken over the canonical `[0, 1]` table:
//!
//! | Domain | Mapping | Jacobian |
//! |--------|---------|----------|
//! | `[0, 1]` | identity | 1 |
//! | `[a, b]` | `a + (b − a)u` | `b − a` |
//! | `[a, ∞)` | `a + tan(πu/2)` | `(π/2)/cos²(πu/2)` |

use core::ops::{Add, Mul};

use num_traits::Zero;

use crate::algo::constants::DEFAULT_ORDER;
use crate::algo::legendre::gauleg;
use crate::machine::KtFloat;
use crate::types::Error;

/// Generation state of a quadrature table.
#[derive(Debug, Clone, PartialEq)]
enum State<T> {
    NotReady,
    Ready { abscissas: Vec<T>, weights: Vec<T> },
}

/// Gauss–Legendre table of a fixed order, generated at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre<T> {
    order: usize,
    state: State<T>,
}

impl<T: KtFloat> GaussLegendre<T> {
    /// Create an empty table for `order` nodes.
    ///
    /// # Errors
    /// `InvalidOrder` if `order` is zero.
    pub fn new(order: usize) -> Result<Self, Error> {
        if order == 0 {
            return Err(Error::InvalidOrder(order));
        }
        Ok(Self {
            order,
            state: State::NotReady,
        })
    }

    /// Create and immediately generate the table.
    pub fn eager(order: usize) -> Result<Self, Error> {
        let mut quad = Self::new(order)?;
        quad.ensure_ready()?;
        Ok(quad)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready { .. })
    }

    /// Generate the nodes and weights if that has not happened yet.
    ///
    /// Calling this again is a no-op: the stored table is neither
    /// recomputed nor moved.
    ///
    /// # Errors
    /// `QuadratureMismatch` if the generated table does not hold exactly
    /// `order` abscissas and weights.
    pub fn ensure_ready(&mut self) -> Result<(), Error> {
        if self.is_ready() {
            return Ok(());
        }

        let (abscissas, weights) = gauleg(T::zero(), T::one(), self.order);
        if abscissas.len() != self.order || weights.len() != self.order {
            return Err(Error::QuadratureMismatch {
                expected: self.order,
                abscissas: abscissas.len(),
                weights: weights.len(),
            });
        }

        log::debug!("generated {}-point Gauss-Legendre table", self.order);
        self.state = State::Ready { abscissas, weights };
        Ok(())
    }

    /// Borrow the `(abscissas, weights)` on `[0, 1]`.
    ///
    /// # Errors
    /// `QuadratureNotReady` before [`ensure_ready`](Self::ensure_ready).
    pub fn nodes(&self) -> Result<(&[T], &[T]), Error> {
        match &self.state {
            State::Ready { abscissas, weights } => Ok((abscissas, weights)),
            State::NotReady => Err(Error::QuadratureNotReady),
        }
    }

    /// Borrow the table as an integration rule.
    ///
    /// # Errors
    /// `QuadratureNotReady` before [`ensure_ready`](Self::ensure_ready).
    pub fn rule(&self) -> Result<Rule<'_, T>, Error> {
        let (abscissas, weights) = self.nodes()?;
        Ok(Rule { abscissas, weights })
    }
}

impl<T: KtFloat> Default for GaussLegendre<T> {
    /// Empty table of the default order.
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            state: State::NotReady,
        }
    }
}

/// Borrowed view of a generated table.
#[derive(Debug, Clone, Copy)]
pub struct Rule<'a, T> {
    abscissas: &'a [T],
    weights: &'a [T],
}

impl<T: KtFloat> Rule<'_, T> {
    pub fn len(&self) -> usize {
        self.abscissas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abscissas.is_empty()
    }

    /// `(abscissa, weight)` pairs on `[0, 1]`.
    pub fn iter(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.abscissas.iter().copied().zip(self.weights.iter().copied())
    }

    /// `∫₀¹ f(u) du`.
    pub fn integrate<R, F>(&self, mut f: F) -> R
    where
        R: Zero + Add<Output = R> + Mul<T, Output = R>,
        F: FnMut(T) -> R,
    {
        self.iter().fold(R::zero(), |acc, (u, w)| acc + f(u) * w)
    }

    /// `∫ₐᵇ f(x) dx` by linear mapping of the unit table.
    pub fn integrate_interval<R, F>(&self, a: T, b: T, mut f: F) -> R
    where
        R: Zero + Add<Output = R> + Mul<T, Output = R>,
        F: FnMut(T) -> R,
    {
        let len = b - a;
        self.iter()
            .fold(R::zero(), |acc, (u, w)| acc + f(a + len * u) * (w * len))
    }

    /// `∫ₐ^∞ f(x) dx` with `x = a + tan(πu/2)`.
    ///
    /// The integrand must decay fast enough for the mapped integrand to
    /// stay bounded as `u → 1`.
    pub fn integrate_semi_infinite<R, F>(&self, a: T, mut f: F) -> R
    where
        R: Zero + Add<Output = R> + Mul<T, Output = R>,
        F: FnMut(T) -> R,
    {
        let half_pi = T::FRAC_PI_2();
        self.iter().fold(R::zero(), |acc, (u, w)| {
            let (x, jac) = tangent_map(a, u, half_pi);
            acc + f(x) * (w * jac)
        })
    }
}

/// Point and Jacobian of `x = a + tan(πu/2)`.
#[inline]
fn tangent_map<T: KtFloat>(a: T, u: T, half_pi: T) -> (T, T) {
    let theta = half_pi * u;
    let cos = theta.cos();
    (a + theta.tan(), half_pi / (cos * cos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn ready(order: usize) -> GaussLegendre<f64> {
        GaussLegendre::eager(order).unwrap()
    }

    // ── cache state ──

    #[test]
    fn zero_order_rejected() {
        assert_eq!(GaussLegendre::<f64>::new(0), Err(Error::InvalidOrder(0)));
    }

    #[test]
    fn default_order() {
        let quad = GaussLegendre::<f64>::default();
        assert_eq!(quad.order(), 64);
        assert!(!quad.is_ready());
    }

    #[test]
    fn not_ready_until_generated() {
        let mut quad = GaussLegendre::<f64>::new(8).unwrap();
        assert!(!quad.is_ready());
        assert_eq!(quad.nodes().unwrap_err(), Error::QuadratureNotReady);
        assert!(quad.rule().is_err());
        quad.ensure_ready().unwrap();
        assert!(quad.is_ready());
        let (x, w) = quad.nodes().unwrap();
        assert_eq!(x.len(), 8);
        assert_eq!(w.len(), 8);
    }

    #[test]
    fn ensure_ready_idempotent() {
        let mut quad = GaussLegendre::<f64>::new(32).unwrap();
        quad.ensure_ready().unwrap();
        let before = quad.clone();
        let ptr = quad.nodes().unwrap().0.as_ptr();

        quad.ensure_ready().unwrap();
        quad.ensure_ready().unwrap();

        assert_eq!(quad, before);
        // Same allocation: nothing was regenerated
        assert_eq!(quad.nodes().unwrap().0.as_ptr(), ptr);
    }

    // ── integrators ──

    #[test]
    fn unit_interval_polynomial() {
        let quad = ready(5);
        let rule = quad.rule().unwrap();
        let v: f64 = rule.integrate(|u| 5.0 * u.powi(4));
        assert!((v - 1.0).abs() < 1e-14);
    }

    #[test]
    fn linear_mapping() {
        let quad = ready(16);
        let rule = quad.rule().unwrap();
        // ∫₁³ 1/x = ln 3
        let v: f64 = rule.integrate_interval(1.0, 3.0, |x| 1.0 / x);
        assert!((v - 3.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn tangent_mapping_inverse_square() {
        let quad = ready(20);
        let rule = quad.rule().unwrap();
        let v: f64 = rule.integrate_semi_infinite(1.0, |x| 1.0 / (x * x));
        assert!((v - 1.0).abs() < 1e-6, "∫₁^∞ x⁻² = {v}");
    }

    #[test]
    fn tangent_mapping_exponential() {
        let quad = ready(20);
        let rule = quad.rule().unwrap();
        let v: f64 = rule.integrate_semi_infinite(2.0, |x| (-x).exp());
        assert!((v - (-2.0_f64).exp()).abs() < 1e-5);
    }

    #[test]
    fn complex_integrand() {
        let quad = ready(12);
        let rule = quad.rule().unwrap();
        // ∫₀¹ e^{iπu} du = 2i/π
        let v: Complex64 = rule.integrate(|u| Complex64::new(0.0, core::f64::consts::PI * u).exp());
        assert!(v.re.abs() < 1e-13);
        assert!((v.im - 2.0 / core::f64::consts::PI).abs() < 1e-13);
    }

    #[test]
    fn f32_table() {
        let quad = GaussLegendre::<f32>::eager(10).unwrap();
        let rule = quad.rule().unwrap();
        let v: f32 = rule.integrate_interval(0.0, 2.0, |x| x * x);
        assert!((v - 8.0 / 3.0).abs() < 1e-5);
    }
}
