//! Twice-nested dispersion integrals.
//!
//! The inner integral runs over the cross-channel variable `t` and projects
//! the discontinuity onto the s-channel partial wave. The outer integral is
//! the s-channel Cauchy integral
//!
//! ```text
//! (1/π) ∫ ds' F(s') / (s' (s' − s − iε))
//! ```
//!
//! whose pole at `s' = s` is removed by subtracting `F(s)` from the
//! numerator and adding back the exact integral of the subtracted term.
//! That closed form sits on the `−iε` sheet, like the numerical part.
//!
//! Projected partial waves are singular like `(s' − p)^{-j-1/2}` at the
//! zeros `p` of the Kacser function, which no cut-out interval can
//! integrate for `j ≥ 1`. [`s_dispersion_contour`] instead passes below the
//! whole decay region on a half circle. The `+iε` of the decay mass moves
//! those zeros above the real axis, so the deformed path encloses no
//! singularity and the value is unchanged wherever the plain integral
//! exists.

use core::f64::consts::PI;

use num_complex::Complex64;

use crate::algo::constants::EPS;
use crate::quadrature::Rule;
use crate::utils::{minus_ieps, mul_i, re};

/// s-channel integration domain of one evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SChannel {
    /// Two-body threshold where the integral starts.
    pub s_thresh: f64,
    /// Point where the kinematic prefactor of the inner integral vanishes.
    pub p_thresh: f64,
    /// Half-width of the interval excluded around `p_thresh`.
    pub exclusion: f64,
}

/// Decay region of an `M → π π π` partial wave on the s' axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DecayRegion {
    /// Two-body threshold where the integral starts.
    pub s_thresh: f64,
    /// Pseudo-threshold `(M − m)²`.
    pub p_thresh: f64,
    /// Upper Kacser zero `(M + m)²`.
    pub q_thresh: f64,
    /// Distance the contour keeps from both zeros.
    pub detour: f64,
}

/// Inner integral `(prefactor/π) ∫_{t_thresh}^∞ dt disc(t) proj(t)`.
pub(crate) fn t_dispersion<D, P>(
    rule: &Rule<'_, f64>,
    t_thresh: f64,
    prefactor: Complex64,
    disc: D,
    proj: P,
) -> Complex64
where
    D: Fn(f64) -> Complex64,
    P: Fn(f64) -> Complex64,
{
    let integral: Complex64 = rule.integrate_semi_infinite(t_thresh + EPS, |t| disc(t) * proj(t));
    prefactor * integral / PI
}

/// Full outer integral, split around the pseudo-threshold when it lies
/// above the threshold.
pub(crate) fn s_dispersion_split<F>(
    rule: &Rule<'_, f64>,
    s: f64,
    channel: &SChannel,
    f: F,
) -> Complex64
where
    F: Fn(f64) -> Complex64,
{
    let sub = f(s);
    let low = channel.s_thresh + EPS;

    if channel.p_thresh < channel.s_thresh {
        return s_dispersion_inf(rule, s, low, sub, &f);
    }

    let upper = channel.p_thresh + channel.exclusion;
    let below = channel.p_thresh - channel.exclusion;
    if below <= low {
        log::warn!(
            "pseudo-threshold {} within exclusion of threshold {}; integrating from {upper}",
            channel.p_thresh,
            channel.s_thresh
        );
        return s_dispersion_inf(rule, s, upper, sub, &f);
    }

    s_dispersion(rule, s, low, below, sub, &f) + s_dispersion_inf(rule, s, upper, sub, &f)
}

/// `(1/π) ∫ ds' (s/s')ⁿ F(s')/(s'(s' − s − iε))` from threshold to infinity.
///
/// The path follows the real axis up to `p_thresh − detour`, then a lower
/// half circle to `q_thresh + detour`, then the real axis again. `F` is
/// evaluated at complex `s'` on the half circle. The pole term is
/// subtracted as in [`s_dispersion`] unless `s` lies within `detour/2` of a
/// Kacser zero, where `F(s)` itself diverges; the pole then sits well inside
/// the half circle and needs no treatment.
pub(crate) fn s_dispersion_contour<F>(
    rule: &Rule<'_, f64>,
    s: f64,
    region: &DecayRegion,
    n: u32,
    f: F,
) -> Complex64
where
    F: Fn(Complex64) -> Complex64,
{
    let low = region.s_thresh + EPS;
    let left = (region.p_thresh - region.detour).max(low);
    let right = region.q_thresh + region.detour;
    let (centre, radius) = ((left + right) / 2.0, (right - left) / 2.0);

    let near_zero = (s - region.p_thresh).abs() < region.detour / 2.0
        || (s - region.q_thresh).abs() < region.detour / 2.0;
    let sub = if near_zero { Complex64::new(0.0, 0.0) } else { f(re(s)) };
    let weighted = |z: Complex64| f(z) * (re(s) / z).powi(n as i32);

    let axis = |x: f64| (weighted(re(x)) - sub) / (minus_ieps(x - s) * x);
    let arc = |phi: f64| {
        let e = Complex64::from_polar(1.0, phi);
        let z = e * radius + centre;
        (weighted(z) - sub) * mul_i(e) * radius / (z * (z - s))
    };

    let mut sum: Complex64 = rule.integrate_interval(PI, 2.0 * PI, arc);
    sum += rule.integrate_semi_infinite(right, &axis);
    if left > low {
        sum += rule.integrate_interval(low, left, &axis);
    } else {
        log::debug!("decay region reaches threshold {}; contour starts on it", region.s_thresh);
    }
    if !near_zero {
        sum -= (lower_sheet_ln(low - s) - low.ln()) * sub / s;
    }
    sum / PI
}

/// `(1/π) ∫_low^high ds' F(s')/(s'(s' − s − iε))` with `sub = F(s)`.
pub(crate) fn s_dispersion<F>(
    rule: &Rule<'_, f64>,
    s: f64,
    low: f64,
    high: f64,
    sub: Complex64,
    f: &F,
) -> Complex64
where
    F: Fn(f64) -> Complex64,
{
    let sum: Complex64 =
        rule.integrate_interval(low, high, |x| (f(x) - sub) / (minus_ieps(x - s) * x));

    let log_term = lower_sheet_ln(high - s) - high.ln() - lower_sheet_ln(low - s) + low.ln();
    (sum + log_term * sub / s) / PI
}

/// `(1/π) ∫_low^∞ ds' F(s')/(s'(s' − s − iε))` with `sub = F(s)`.
pub(crate) fn s_dispersion_inf<F>(
    rule: &Rule<'_, f64>,
    s: f64,
    low: f64,
    sub: Complex64,
    f: &F,
) -> Complex64
where
    F: Fn(f64) -> Complex64,
{
    let sum: Complex64 =
        rule.integrate_semi_infinite(low, |x| (f(x) - sub) / (minus_ieps(x - s) * x));

    let log_term = -(lower_sheet_ln(low - s) - low.ln()) * sub / s;
    (sum + log_term) / PI
}

/// `ln(x − i0)`: `ln|x| − iπ` for negative `x`.
#[inline]
fn lower_sheet_ln(x: f64) -> Complex64 {
    Complex64::new(x, -0.0).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadrature::GaussLegendre;

    fn f(t: f64) -> Complex64 {
        Complex64::new(1.0 / (t + 1.0), 0.0)
    }

    /// Antiderivative of `1/(x(x − s)(x + 1))`, principal value.
    fn antiderivative(x: f64, s: f64) -> f64 {
        let a = -1.0 / s;
        let b = 1.0 / (s * (s + 1.0));
        let c = 1.0 / (1.0 + s);
        a * x.ln() + b * (x - s).abs().ln() + c * (x + 1.0).ln()
    }

    // ── lower sheet ──

    #[test]
    fn lower_sheet_log() {
        let l = lower_sheet_ln(-2.0);
        assert!((l.re - 2.0_f64.ln()).abs() < 1e-15);
        assert!((l.im + PI).abs() < 1e-15);
        assert_eq!(lower_sheet_ln(3.0).im, 0.0);
    }

    // ── outer integral ──

    #[test]
    fn semi_infinite_below_threshold() {
        let quad = GaussLegendre::eager(64).unwrap();
        let rule = quad.rule().unwrap();
        let (s, low) = (0.3, 1.0);
        let v = s_dispersion_inf(&rule, s, low, f(s), &f);
        let exact = -antiderivative(low, s) / PI;
        assert!((v.re - exact).abs() < 1e-8);
        assert!(v.im.abs() < 1e-6);
    }

    #[test]
    fn semi_infinite_across_pole() {
        let quad = GaussLegendre::eager(64).unwrap();
        let rule = quad.rule().unwrap();
        let (s, low) = (2.0, 1.0);
        let v = s_dispersion_inf(&rule, s, low, f(s), &f);
        // Principal value plus iπ F(s)/s from the −iε prescription
        let exact = -antiderivative(low, s) / PI;
        assert!((v.re - exact).abs() < 1e-8);
        assert!((v.im - f(s).re / s).abs() < 1e-6);
    }

    #[test]
    fn finite_interval() {
        let quad = GaussLegendre::eager(64).unwrap();
        let rule = quad.rule().unwrap();
        for s in [0.3, 2.0] {
            let v = s_dispersion(&rule, s, 1.0, 4.0, f(s), &f);
            let exact = (antiderivative(4.0, s) - antiderivative(1.0, s)) / PI;
            assert!((v.re - exact).abs() < 1e-8, "s = {s}: {} vs {exact}", v.re);
        }
    }

    #[test]
    fn split_without_pseudo_threshold() {
        let quad = GaussLegendre::eager(64).unwrap();
        let rule = quad.rule().unwrap();
        let channel = SChannel {
            s_thresh: 1.0,
            p_thresh: 0.5,
            exclusion: 1e-4,
        };
        let v = s_dispersion_split(&rule, 0.3, &channel, f);
        let single = s_dispersion_inf(&rule, 0.3, 1.0 + EPS, f(0.3), &f);
        assert_eq!(v, single);
    }

    #[test]
    fn split_excludes_small_interval() {
        let quad = GaussLegendre::eager(64).unwrap();
        let rule = quad.rule().unwrap();
        let channel = SChannel {
            s_thresh: 1.0,
            p_thresh: 2.0,
            exclusion: 1e-4,
        };
        let v = s_dispersion_split(&rule, 0.3, &channel, f);
        let full = -antiderivative(1.0 + EPS, 0.3) / PI;
        // The excluded 2e-4 wide strip carries ~1e-5
        assert!((v.re - full).abs() < 1e-4);
    }

    // ── contour ──

    fn region() -> DecayRegion {
        DecayRegion {
            s_thresh: 1.0,
            p_thresh: 2.0,
            q_thresh: 3.0,
            detour: 0.5,
        }
    }

    fn fc(z: Complex64) -> Complex64 {
        Complex64::new(1.0, 0.0) / (z + 1.0)
    }

    #[test]
    fn contour_matches_real_axis_for_analytic_integrand() {
        let quad = GaussLegendre::eager(64).unwrap();
        let rule = quad.rule().unwrap();
        // below threshold, on the half circle's span, and close to a zero
        for s in [0.3, 2.5, 2.1, 4.0] {
            let v = s_dispersion_contour(&rule, s, &region(), 0, fc);
            let axis = s_dispersion_inf(&rule, s, 1.0 + EPS, f(s), &f);
            assert!((v - axis).norm() < 1e-5, "s = {s}: {v} vs {axis}");
        }
    }

    #[test]
    fn contour_with_one_subtraction() {
        let quad = GaussLegendre::eager(64).unwrap();
        let rule = quad.rule().unwrap();
        for s in [0.3, 2.5] {
            let v = s_dispersion_contour(&rule, s, &region(), 1, fc);
            let weighted = |x: f64| f(x) * (s / x);
            let axis = s_dispersion_inf(&rule, s, 1.0 + EPS, f(s), &weighted);
            assert!((v - axis).norm() < 1e-5, "s = {s}: {v} vs {axis}");
        }
        let small = s_dispersion_contour(&rule, 1e-8, &region(), 1, fc);
        assert!(small.norm() < 1e-6);
    }

    #[test]
    fn contour_starts_on_threshold() {
        let quad = GaussLegendre::eager(64).unwrap();
        let rule = quad.rule().unwrap();
        let wide = DecayRegion {
            detour: 2.0,
            ..region()
        };
        let v = s_dispersion_contour(&rule, 0.3, &wide, 0, fc);
        let axis = s_dispersion_inf(&rule, 0.3, 1.0 + EPS, f(0.3), &f);
        assert!((v - axis).norm() < 1e-5);
    }

    // ── inner integral ──

    #[test]
    fn t_dispersion_scales_by_prefactor() {
        let quad = GaussLegendre::eager(40).unwrap();
        let rule = quad.rule().unwrap();
        let disc = |t: f64| Complex64::new((-t).exp(), 0.0);
        let proj = |_t: f64| Complex64::new(1.0, 0.0);
        let v = t_dispersion(&rule, 0.0, Complex64::new(0.0, PI), disc, proj);
        // (iπ/π) ∫_ε^∞ e^{-t} = i e^{-ε}
        assert!(v.re.abs() < 1e-12);
        assert!((v.im - (-EPS).exp()).abs() < 1e-5);
    }
}
